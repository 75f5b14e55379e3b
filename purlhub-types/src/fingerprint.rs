//! Content fingerprints for change detection.
//!
//! A fingerprint is the hex SHA-256 of a sub-document's canonical JSON
//! form. Object keys are emitted in sorted order at every depth, so the
//! fingerprint only depends on content, never on insertion order.

use crate::object::{CompositeObject, SubResource};
use crate::JsonMap;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Hex-encoded SHA-256 of a canonically serialized JSON map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprints a JSON object map.
    #[must_use]
    pub fn of(map: &JsonMap) -> Self {
        let mut hasher = Sha256::new();
        feed_object(map, &mut hasher);
        Self(hex::encode(hasher.finalize()))
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn feed_object(map: &JsonMap, hasher: &mut Sha256) {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    hasher.update(b"{");
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            hasher.update(b",");
        }
        hasher.update(Value::String(key.clone()).to_string().as_bytes());
        hasher.update(b":");
        feed_value(value, hasher);
    }
    hasher.update(b"}");
}

fn feed_value(value: &Value, hasher: &mut Sha256) {
    match value {
        Value::Object(map) => feed_object(map, hasher),
        Value::Array(items) => {
            hasher.update(b"[");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    hasher.update(b",");
                }
                feed_value(item, hasher);
            }
            hasher.update(b"]");
        }
        scalar => hasher.update(scalar.to_string().as_bytes()),
    }
}

/// Fingerprints of every sub-resource of a composite object, taken at the
/// moment it was last read from (or written to) the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprints {
    profile: Fingerprint,
    properties: Fingerprint,
    attributes: Fingerprint,
    records: BTreeMap<String, Fingerprint>,
}

impl Fingerprints {
    pub(crate) fn capture(object: &CompositeObject) -> Self {
        Self {
            profile: Fingerprint::of(&object.profile),
            properties: Fingerprint::of(&object.properties),
            attributes: Fingerprint::of(&object.attributes),
            records: object
                .records
                .iter()
                .map(|(label, record)| (label.clone(), Fingerprint::of(record)))
                .collect(),
        }
    }

    /// Fingerprint of a top-level sub-resource.
    #[must_use]
    pub fn get(&self, which: SubResource) -> &Fingerprint {
        match which {
            SubResource::Profile => &self.profile,
            SubResource::Properties => &self.properties,
            SubResource::Attributes => &self.attributes,
        }
    }

    /// Fingerprint of a named record, if it existed at last sync.
    #[must_use]
    pub fn record(&self, label: &str) -> Option<&Fingerprint> {
        self.records.get(label)
    }
}
