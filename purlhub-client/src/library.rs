//! Asset library of one account.
//!
//! Assets are addressed by `(context, filename)`, where the context is one of
//! the library folders ([`AssetContext`]) and the filename may contain
//! directories. Extra request options are sent as query parameters on reads
//! and removals and merged into the body on saves.

use crate::bound::Bound;
use crate::client::{encode_path, ApiClient};
use crate::error::{ApiError, ApiResult};
use crate::validate::require_path;
use purlhub_types::text::trim_slashes;
use purlhub_types::{Asset, AssetContext, JsonMap};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// CRUD over `<account>/library/assets`.
#[derive(Debug, Clone)]
pub struct LibraryStore {
    client: Arc<ApiClient>,
    prefix: String,
}

impl LibraryStore {
    pub(crate) fn new(client: Arc<ApiClient>, account_path: String) -> Self {
        Self {
            client,
            prefix: format!("{account_path}/library/assets"),
        }
    }

    fn path(&self, context: AssetContext, filename: &str) -> String {
        format!("{}/{}/{}", self.prefix, context, encode_path(filename))
    }

    /// Pairs an asset with this store.
    pub fn bind(&self, asset: Asset) -> Bound<LibraryStore, Asset> {
        Bound::new(self.clone(), asset)
    }

    pub async fn get(
        &self,
        context: &str,
        filename: &str,
        options: Option<&JsonMap>,
    ) -> ApiResult<Asset> {
        let context = AssetContext::parse(context)?;
        let filename = require_path(filename, "filename")?;

        debug!("Getting Asset [{}/{}]", context, filename);
        let response = self
            .client
            .get(&self.path(context, &filename), &query(options))
            .await?;
        let item = item(response.data, &context, &filename)?;
        trace!("Asset [{}/{}]: {}", context, filename, item);
        Ok(Asset::from_remote(item)?)
    }

    /// Lists the assets of a context, optionally below a directory.
    pub async fn list(
        &self,
        context: &str,
        directory: Option<&str>,
        options: Option<&JsonMap>,
    ) -> ApiResult<Vec<Asset>> {
        let context = AssetContext::parse(context)?;
        let directory = match directory.map(trim_slashes) {
            Some(dir) if !dir.is_empty() => format!("{}/", encode_path(&dir)),
            _ => String::new(),
        };

        debug!("Scanning Assets [{}/{}]", context, directory);
        let response = self
            .client
            .get(
                &format!("{}/{}/{}", self.prefix, context, directory),
                &query(options),
            )
            .await?;
        response
            .into_list()?
            .into_iter()
            .map(|raw| Asset::from_remote(raw).map_err(ApiError::from))
            .collect()
    }

    /// Creates or updates the asset stored at `context/filename`. When the
    /// asset's own filename differs from `filename` the asset is renamed.
    pub async fn save(
        &self,
        context: &str,
        filename: &str,
        asset: &Asset,
        options: Option<&JsonMap>,
    ) -> ApiResult<Asset> {
        let context = AssetContext::parse(context)?;
        let filename = require_path(filename, "filename")?;
        let new_filename = require_path(&asset.filename, "filename")?;
        let content_type = asset
            .content_type
            .as_deref()
            .filter(|content_type| !content_type.is_empty())
            .ok_or_else(|| {
                ApiError::InvalidArgument(
                    "A valid asset (obj) is required! contentType is missing".to_string(),
                )
            })?;
        if asset.metadata.context.is_none() {
            return Err(ApiError::InvalidArgument(
                "Some metadata is required! context is missing".to_string(),
            ));
        }

        let mut body = JsonMap::new();
        body.insert("contentType".into(), Value::String(content_type.to_string()));
        if let Some(content) = &asset.utf8_content {
            body.insert("utf8Content".into(), Value::String(content.clone()));
        }
        if let Some(uri) = &asset.public_cdn_uri {
            body.insert("publicCdnURI".into(), Value::String(uri.clone()));
        }
        let metadata = &asset.metadata;
        for (key, value) in [
            ("description", metadata.description.clone().map(Value::String)),
            ("author", metadata.author.clone().map(Value::String)),
            ("sharing", metadata.sharing.clone()),
            ("tags", metadata.tags.clone()),
        ] {
            if let Some(value) = value.filter(|v| !v.is_null()) {
                body.insert(key.into(), value);
            }
        }
        if let Some(extra) = asset.extra.clone().filter(|v| !v.is_null()) {
            body.insert("extraData".into(), extra);
        }
        if new_filename != filename {
            body.insert("renameTo".into(), Value::String(new_filename));
        }
        if let Some(options) = options {
            body.extend(options.clone());
        }

        debug!("Saving Asset [{}/{}] w/ {:?}", context, filename, body);
        let response = self
            .client
            .post(&self.path(context, &filename), &Value::Object(body))
            .await?;
        Ok(Asset::from_remote(item(response.data, &context, &filename)?)?)
    }

    /// Deletes an asset and returns the server's last snapshot of it.
    pub async fn remove(
        &self,
        context: &str,
        filename: &str,
        options: Option<&JsonMap>,
    ) -> ApiResult<Value> {
        let context = AssetContext::parse(context)?;
        let filename = require_path(filename, "filename")?;

        info!("Removing Asset [{}/{}]", context, filename);
        let response = self
            .client
            .delete(&self.path(context, &filename), &query(options), None)
            .await?;
        Ok(match response.data {
            Value::Object(mut data) => data.remove("item").unwrap_or(Value::Null),
            other => other,
        })
    }
}

/// Request options as query parameters; strings are sent verbatim, other
/// values as JSON text.
fn query(options: Option<&JsonMap>) -> Vec<(&str, String)> {
    options
        .into_iter()
        .flatten()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.as_str(), value)
        })
        .collect()
}

/// Asset endpoints answer with `{ "item": ... }`.
fn item(data: Value, context: &AssetContext, filename: &str) -> ApiResult<Value> {
    match data {
        Value::Object(mut data) => match data.remove("item") {
            Some(Value::Null) | None => None,
            Some(item) => Some(item),
        },
        _ => None,
    }
    .ok_or_else(|| ApiError::NotFound(format!("asset {context}/{filename} Not Found!")))
}

impl Bound<LibraryStore, Asset> {
    fn location(&self) -> ApiResult<(AssetContext, String)> {
        let context = self.context()?;
        let filename = self.id().unwrap_or(&self.filename).to_string();
        Ok((context, filename))
    }

    /// Saves this asset under the filename it was loaded with, renaming it
    /// when its filename was edited.
    pub async fn save(&mut self) -> ApiResult<()> {
        let (context, filename) = self.location()?;
        let saved = self
            .store()
            .save(context.as_str(), &filename, &**self, None)
            .await?;
        self.replace(saved);
        Ok(())
    }

    pub async fn remove(self) -> ApiResult<Value> {
        let (context, filename) = self.location()?;
        self.store().remove(context.as_str(), &filename, None).await
    }
}
