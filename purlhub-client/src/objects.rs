//! Personalization objects of one node.
//!
//! Objects are split into four remotely independent sub-resources, each
//! written through its own endpoint. [`ObjectStore::save`] compares every
//! sub-resource against the fingerprint taken when the object was read and
//! only writes the ones that changed.
//!
//! # Save order
//!
//! 1. `profile`, `properties` and `attributes` are written concurrently.
//! 2. Once all three have settled, changed records are written
//!    concurrently, using any `purlCode` assigned in step 1.
//!
//! A failed write fails the save after its siblings settle. Writes that
//! already succeeded are not rolled back; saving again only repeats the
//! sub-resources that still differ.

use crate::bound::Bound;
use crate::client::{ApiClient, ApiResponse};
use crate::error::{ApiError, ApiResult};
use crate::validate::{require_lookup_code, require_purl_code};
use futures::future::join_all;
use purlhub_types::{CompositeObject, JsonMap, SubResource};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, trace};

const LIST_ENDPOINT: &str = "purlProfilesList";
const PROFILE_ENDPOINT: &str = "purlProfile";
const PROPERTIES_ENDPOINT: &str = "purlProperties";
const ATTRIBUTES_ENDPOINT: &str = "purlAttributesList";
const RECORD_ENDPOINT: &str = "purlRecord";

/// Reads, partially writes and enumerates the objects of one node.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    client: Arc<ApiClient>,
    prefix: String,
}

/// Result of one sub-resource write.
struct WriteOutcome {
    purl_code: Option<String>,
    data: JsonMap,
}

impl ObjectStore {
    pub(crate) fn new(client: Arc<ApiClient>, prefix: String) -> Self {
        debug!("Attached object store @ {}", prefix);
        Self { client, prefix }
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.prefix, name)
    }

    /// Builds a fingerprinted object from a raw lookup/list payload.
    pub fn compose(raw: Value) -> ApiResult<CompositeObject> {
        Ok(CompositeObject::compose(raw)?)
    }

    /// Pairs an object with this store.
    pub fn bind(&self, object: CompositeObject) -> Bound<ObjectStore, CompositeObject> {
        Bound::new(self.clone(), object)
    }

    /// Looks up one object by `purlCode` with every attribute and record
    /// attached.
    pub async fn get(&self, id: &str) -> ApiResult<CompositeObject> {
        let code = require_lookup_code(id)?;

        debug!("Getting Object [{}]", code);
        let query = [
            ("containsFilter", json!({ "purlCode": code }).to_string()),
            ("attachAttributes", "all".to_string()),
            ("attachRecords", "all".to_string()),
        ];
        let response = self.client.get(&self.endpoint(LIST_ENDPOINT), &query).await?;

        let raw = response
            .into_list()?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("object {code} Not Found!")))?;
        trace!("Object [{}]: {}", code, raw);
        Self::compose(raw)
    }

    /// Lists every object matching `filter`, following offset pagination
    /// until the reported total is reached.
    pub async fn list(&self, filter: Option<&JsonMap>) -> ApiResult<Vec<CompositeObject>> {
        let filter = filter.map(serde_json::to_string).transpose()?;

        debug!("Scanning Objects...");
        let (mut raw, mut total) = self.batch(filter.as_deref(), 0).await?;

        while (raw.len() as u64) < total {
            let (batch, reported) = self.batch(filter.as_deref(), raw.len()).await?;
            total = reported;
            if batch.is_empty() {
                if (raw.len() as u64) < total {
                    return Err(ApiError::InvalidResponse(format!(
                        "object listing stalled at {} of {} objects",
                        raw.len(),
                        total
                    )));
                }
                break;
            }
            raw.extend(batch);
        }

        debug!("Found [{}] Objects", raw.len());
        raw.into_iter().map(Self::compose).collect()
    }

    async fn batch(&self, filter: Option<&str>, offset: usize) -> ApiResult<(Vec<Value>, u64)> {
        let mut query = vec![("offset", offset.to_string())];
        if let Some(filter) = filter {
            query.push(("containsFilter", filter.to_string()));
        }

        let response = self.client.get(&self.endpoint(LIST_ENDPOINT), &query).await?;
        let total = response.total.unwrap_or(0);
        Ok((response.into_list()?, total))
    }

    /// Writes every changed sub-resource and returns the recomposed object.
    ///
    /// Objects without fingerprints (never read from the server) are written
    /// in full; empty top-level sub-resources are never written.
    pub async fn save(&self, mut object: CompositeObject) -> ApiResult<CompositeObject> {
        if let Some(id) = &object.id {
            object.id = Some(require_purl_code(id)?);
        }
        if object.is_blank() {
            return Err(ApiError::InvalidArgument(
                "Some data (obj) is required!".to_string(),
            ));
        }

        let code = object.id.clone();
        let writes = SubResource::ALL
            .into_iter()
            .filter(|which| !object.sub_resource(*which).is_empty() && object.is_changed(*which))
            .map(|which| {
                let data = object.sub_resource(which);
                let code = code.as_deref();
                async move { (which, self.write_sub_resource(which, data, code).await) }
            });
        let outcomes = join_all(writes)
            .await
            .into_iter()
            .map(|(which, outcome)| outcome.map(|outcome| (which, outcome)))
            .collect::<ApiResult<Vec<_>>>()?;

        for (which, outcome) in outcomes {
            if outcome.purl_code.is_some() {
                object.id = outcome.purl_code;
            }
            *object.sub_resource_mut(which) = outcome.data;
        }

        let code = object.id.clone();
        let writes = object
            .records
            .iter()
            .filter(|(label, _)| object.is_record_changed(label))
            .map(|(label, record)| {
                let code = code.as_deref();
                async move { (label.clone(), self.write_record(label, record, code).await) }
            });
        let outcomes = join_all(writes)
            .await
            .into_iter()
            .map(|(label, outcome)| outcome.map(|outcome| (label, outcome)))
            .collect::<ApiResult<Vec<_>>>()?;

        for (label, outcome) in outcomes {
            if outcome.purl_code.is_some() {
                object.id = outcome.purl_code;
            }
            object.records.insert(label, outcome.data);
        }

        Self::compose(serde_json::to_value(&object)?)
    }

    async fn write_sub_resource(
        &self,
        which: SubResource,
        data: &JsonMap,
        code: Option<&str>,
    ) -> ApiResult<WriteOutcome> {
        let (endpoint, payload) = match which {
            SubResource::Profile => {
                let mut payload = json!({ "profileData": data });
                with_code(&mut payload, code);
                (PROFILE_ENDPOINT, payload)
            }
            SubResource::Properties => {
                let mut payload = json!({ "propertiesData": data, "viewMode": "inheritance" });
                with_code(&mut payload, code);
                (PROPERTIES_ENDPOINT, payload)
            }
            SubResource::Attributes => {
                let mut row = Value::Object(data.clone());
                with_code(&mut row, code);
                (ATTRIBUTES_ENDPOINT, json!({ "dataSet": [row] }))
            }
        };

        debug!("Saving [{}] Object: {}", which.key(), payload);
        let response = self.client.post(&self.endpoint(endpoint), &payload).await?;

        let returned = match which {
            SubResource::Attributes => first_row(response.data),
            _ => response.data,
        };
        Ok(outcome(response.purl_code, returned, data))
    }

    async fn write_record(
        &self,
        label: &str,
        data: &JsonMap,
        code: Option<&str>,
    ) -> ApiResult<WriteOutcome> {
        let mut payload = json!({ "recordLabel": label, "recordData": data });
        with_code(&mut payload, code);

        debug!("Saving [record:{}] Object: {}", label, payload);
        let response = self
            .client
            .post(&self.endpoint(RECORD_ENDPOINT), &payload)
            .await?;
        let ApiResponse {
            data: returned,
            purl_code,
            ..
        } = response;
        Ok(outcome(purl_code, returned, data))
    }

    /// Deletes an object with all of its sub-resources and returns the
    /// server's last snapshot of it.
    pub async fn remove(&self, id: &str) -> ApiResult<Value> {
        let code = require_purl_code(id)?;

        info!("Removing Object [{}]", code);
        let response = self
            .client
            .delete(
                &self.endpoint(PROFILE_ENDPOINT),
                &[],
                Some(&json!({ "purlCode": code })),
            )
            .await?;
        Ok(response.data)
    }
}

fn with_code(payload: &mut Value, code: Option<&str>) {
    if let (Some(code), Value::Object(map)) = (code, payload) {
        map.insert("purlCode".to_string(), Value::String(code.to_string()));
    }
}

/// Attribute writes answer with the written batch; the object's row is the
/// first one, minus its `purlCode`.
fn first_row(data: Value) -> Value {
    let mut row = match data {
        Value::Array(rows) => rows.into_iter().next().unwrap_or(Value::Null),
        other => other,
    };
    if let Value::Object(map) = &mut row {
        map.remove("purlCode");
    }
    row
}

/// The server's canonical form when it sent one, otherwise what was written.
fn outcome(purl_code: Option<String>, returned: Value, written: &JsonMap) -> WriteOutcome {
    let data = match returned {
        Value::Object(map) => map,
        _ => written.clone(),
    };
    WriteOutcome { purl_code, data }
}

impl Bound<ObjectStore, CompositeObject> {
    /// Saves this object through its store and takes the saved state.
    /// On failure the local edits are kept.
    pub async fn save(&mut self) -> ApiResult<()> {
        let saved = self.store().save((**self).clone()).await?;
        self.replace(saved);
        Ok(())
    }

    /// Deletes this object; the returned snapshot is no longer bound.
    pub async fn remove(self) -> ApiResult<Value> {
        let id = self
            .id
            .clone()
            .ok_or_else(|| ApiError::InvalidArgument("A purlCode is required!".to_string()))?;
        self.store().remove(&id).await
    }
}
