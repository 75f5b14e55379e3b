//! Composite personalization objects.
//!
//! A composite object is assembled from four independently writable
//! sub-resources: `profile`, `properties`, `attributes` and a set of named
//! `records`. Each carries its own fingerprint so a save only touches the
//! parts that changed since the object was read.

use crate::fingerprint::{Fingerprint, Fingerprints};
use crate::{Error, JsonMap, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Keys of which at least one must be present in a remote composite payload.
pub const COMPOSITE_KEYS: [&str; 5] = [
    "purlCode",
    "profile",
    "properties",
    "attributes",
    "records",
];

/// The three top-level sub-resources, each written through its own endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubResource {
    Profile,
    Properties,
    Attributes,
}

impl SubResource {
    pub const ALL: [SubResource; 3] = [Self::Profile, Self::Properties, Self::Attributes];

    /// The field name used on the wire.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Properties => "properties",
            Self::Attributes => "attributes",
        }
    }
}

/// A remote personalization object.
///
/// Freshly built objects carry no fingerprints and are written in full on
/// their first save. Objects produced by [`CompositeObject::compose`] carry
/// fingerprints of the server state they were built from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompositeObject {
    /// Remote identifier (`purlCode`); `None` until the server assigns one.
    #[serde(rename = "purlCode", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub profile: JsonMap,
    #[serde(default)]
    pub properties: JsonMap,
    #[serde(default)]
    pub attributes: JsonMap,
    #[serde(default)]
    pub records: BTreeMap<String, JsonMap>,
    /// Any other server-side fields, kept verbatim and never written back.
    #[serde(flatten)]
    pub extra: JsonMap,
    #[serde(skip)]
    fingerprints: Option<Fingerprints>,
}

impl CompositeObject {
    /// Creates an empty, not yet created object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_profile(mut self, profile: JsonMap) -> Self {
        self.profile = profile;
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: JsonMap) -> Self {
        self.properties = properties;
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: JsonMap) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn with_record(mut self, label: impl Into<String>, record: JsonMap) -> Self {
        self.records.insert(label.into(), record);
        self
    }

    /// Builds an object from a raw lookup/list payload and fingerprints it.
    ///
    /// Missing or non-object sub-resources become empty maps. Fails if the
    /// payload is not an object or carries none of [`COMPOSITE_KEYS`].
    pub fn compose(raw: Value) -> Result<Self> {
        let Value::Object(mut raw) = raw else {
            return Err(Error::InvalidShape(
                "composite object payload is not a JSON object".to_string(),
            ));
        };

        if !COMPOSITE_KEYS.iter().any(|key| raw.contains_key(*key)) {
            return Err(Error::InvalidShape(format!(
                "composite object payload has none of {COMPOSITE_KEYS:?}"
            )));
        }

        let id = match raw.remove("purlCode") {
            Some(Value::String(code)) if !code.is_empty() => Some(code),
            Some(Value::Number(code)) => Some(code.to_string()),
            _ => None,
        };
        let profile = take_map(&mut raw, SubResource::Profile.key());
        let properties = take_map(&mut raw, SubResource::Properties.key());
        let attributes = take_map(&mut raw, SubResource::Attributes.key());
        let records = match raw.remove("records") {
            Some(Value::Object(records)) => records
                .into_iter()
                .map(|(label, record)| (label, into_map(record)))
                .collect(),
            _ => BTreeMap::new(),
        };

        let mut object = Self {
            id,
            profile,
            properties,
            attributes,
            records,
            extra: raw,
            fingerprints: None,
        };
        object.fingerprints = Some(Fingerprints::capture(&object));
        Ok(object)
    }

    /// Fingerprints from the last server sync, if this object was composed.
    #[must_use]
    pub fn fingerprints(&self) -> Option<&Fingerprints> {
        self.fingerprints.as_ref()
    }

    /// Returns a top-level sub-resource.
    #[must_use]
    pub fn sub_resource(&self, which: SubResource) -> &JsonMap {
        match which {
            SubResource::Profile => &self.profile,
            SubResource::Properties => &self.properties,
            SubResource::Attributes => &self.attributes,
        }
    }

    /// Returns a top-level sub-resource mutably.
    pub fn sub_resource_mut(&mut self, which: SubResource) -> &mut JsonMap {
        match which {
            SubResource::Profile => &mut self.profile,
            SubResource::Properties => &mut self.properties,
            SubResource::Attributes => &mut self.attributes,
        }
    }

    /// Whether a sub-resource differs from its last-synced content.
    /// Objects without fingerprints report every sub-resource as changed.
    #[must_use]
    pub fn is_changed(&self, which: SubResource) -> bool {
        match &self.fingerprints {
            Some(fingerprints) => {
                fingerprints.get(which) != &Fingerprint::of(self.sub_resource(which))
            }
            None => true,
        }
    }

    /// Whether a named record differs from its last-synced content.
    /// A label unknown at last sync is always changed.
    #[must_use]
    pub fn is_record_changed(&self, label: &str) -> bool {
        let Some(record) = self.records.get(label) else {
            return false;
        };
        match self.fingerprints.as_ref().and_then(|f| f.record(label)) {
            Some(previous) => previous != &Fingerprint::of(record),
            None => true,
        }
    }

    /// True when there is neither an id nor any sub-resource content.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.id.is_none()
            && self.profile.is_empty()
            && self.properties.is_empty()
            && self.attributes.is_empty()
            && self.records.is_empty()
    }
}

/// Content equality: compares identity and sub-resources, ignoring
/// fingerprints.
impl PartialEq for CompositeObject {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.profile == other.profile
            && self.properties == other.properties
            && self.attributes == other.attributes
            && self.records == other.records
            && self.extra == other.extra
    }
}

fn take_map(raw: &mut JsonMap, key: &str) -> JsonMap {
    raw.remove(key).map(into_map).unwrap_or_default()
}

fn into_map(value: Value) -> JsonMap {
    match value {
        Value::Object(map) => map,
        _ => JsonMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compose_normalizes_missing_and_non_object_fields() {
        let object = CompositeObject::compose(json!({
            "purlCode": "JaneDoe",
            "profile": {"firstName": "Jane"},
            "properties": [1, 2],
            "attributes": null,
            "records": "nope"
        }))
        .unwrap();

        assert_eq!(object.id.as_deref(), Some("JaneDoe"));
        assert_eq!(object.profile["firstName"], "Jane");
        assert!(object.properties.is_empty());
        assert!(object.attributes.is_empty());
        assert!(object.records.is_empty());

        let fingerprints = object.fingerprints().unwrap();
        assert_eq!(
            fingerprints.get(SubResource::Attributes),
            &Fingerprint::of(&JsonMap::new())
        );
    }

    #[test]
    fn compose_rejects_unrecognized_payloads() {
        assert!(CompositeObject::compose(json!({"hello": "world"})).is_err());
        assert!(CompositeObject::compose(json!([1])).is_err());
        assert!(CompositeObject::compose(Value::Null).is_err());
    }

    #[test]
    fn compose_keeps_unknown_fields_as_extra() {
        let object =
            CompositeObject::compose(json!({"purlCode": "X1", "createdAt": "2024-01-01"})).unwrap();
        assert_eq!(object.extra["createdAt"], "2024-01-01");
    }

    #[test]
    fn fresh_object_is_fully_changed() {
        let object = CompositeObject::new().with_record("visit", JsonMap::new());
        assert!(object.fingerprints().is_none());
        for which in SubResource::ALL {
            assert!(object.is_changed(which));
        }
        assert!(object.is_record_changed("visit"));
    }

    #[test]
    fn composed_object_is_unchanged_until_mutated() {
        let mut object = CompositeObject::compose(json!({
            "purlCode": "X1",
            "profile": {"a": 1},
            "records": {"visit": {"count": 1}, "order": {"sku": "p-1"}}
        }))
        .unwrap();

        assert!(!object.is_changed(SubResource::Profile));
        assert!(!object.is_record_changed("visit"));

        object.profile.insert("b".into(), json!(2));
        object.records.get_mut("visit").unwrap().insert("count".into(), json!(2));
        object.records.insert("new".into(), JsonMap::new());

        assert!(object.is_changed(SubResource::Profile));
        assert!(!object.is_changed(SubResource::Properties));
        assert!(object.is_record_changed("visit"));
        assert!(!object.is_record_changed("order"));
        assert!(object.is_record_changed("new"));
    }

    #[test]
    fn serialization_skips_fingerprints() {
        let object = CompositeObject::compose(json!({"purlCode": "X1"})).unwrap();
        let wire = serde_json::to_value(&object).unwrap();
        assert_eq!(
            wire,
            json!({"purlCode": "X1", "profile": {}, "properties": {}, "attributes": {}, "records": {}})
        );
    }

    #[test]
    fn equality_ignores_fingerprints() {
        let composed = CompositeObject::compose(json!({"purlCode": "X1"})).unwrap();
        let fresh = CompositeObject::new().with_id("X1");
        assert_eq!(composed, fresh);
    }
}
