//! Asset library entries.

use crate::text::{pluralize, trim_slashes};
use crate::{Error, JsonMap, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The library folder an asset lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetContext {
    Layouts,
    Sections,
    Templates,
    Images,
    Videos,
    Documents,
}

impl AssetContext {
    /// Parses a context name. Surrounding slashes are ignored and the
    /// singular form is accepted (`template` == `templates`).
    pub fn parse(raw: &str) -> Result<Self> {
        match pluralize(&trim_slashes(raw)).as_str() {
            "layouts" => Ok(Self::Layouts),
            "sections" => Ok(Self::Sections),
            "templates" => Ok(Self::Templates),
            "images" => Ok(Self::Images),
            "videos" => Ok(Self::Videos),
            "documents" => Ok(Self::Documents),
            _ => Err(Error::InvalidValue(format!(
                "a valid context is required, got {raw:?}"
            ))),
        }
    }

    /// The URL segment for this context.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Layouts => "layouts",
            Self::Sections => "sections",
            Self::Templates => "templates",
            Self::Images => "images",
            Self::Videos => "videos",
            Self::Documents => "documents",
        }
    }
}

impl fmt::Display for AssetContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetContext {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Descriptive metadata attached to an asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharing: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Value>,
}

/// A file stored in an account's asset library.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub metadata: AssetMetadata,
    /// Inline text content for text-based assets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utf8_content: Option<String>,
    #[serde(
        default,
        rename = "publicCdnURI",
        skip_serializing_if = "Option::is_none"
    )]
    pub public_cdn_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Caller-defined data, written as `extraData`.
    #[serde(default, alias = "extraData", skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
    #[serde(flatten)]
    pub other: JsonMap,
    #[serde(skip)]
    loaded_filename: Option<String>,
}

impl Asset {
    #[must_use]
    pub fn new(
        filename: impl Into<String>,
        context: AssetContext,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: Some(content_type.into()),
            metadata: AssetMetadata {
                context: Some(context.as_str().to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Parses a server payload, remembering the filename it was stored under.
    pub fn from_remote(value: Value) -> Result<Self> {
        let mut asset: Asset = serde_json::from_value(value)?;
        asset.loaded_filename = Some(asset.filename.clone());
        Ok(asset)
    }

    /// The filename this asset is stored under remotely, if it was loaded.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.loaded_filename.as_deref()
    }

    /// The asset's context, parsed from its metadata.
    pub fn context(&self) -> Result<AssetContext> {
        let raw = self
            .metadata
            .context
            .as_deref()
            .ok_or_else(|| Error::InvalidValue("asset metadata has no context".to_string()))?;
        AssetContext::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn context_accepts_singular_and_slashes() {
        assert_eq!(AssetContext::parse("template").unwrap(), AssetContext::Templates);
        assert_eq!(AssetContext::parse("/images/").unwrap(), AssetContext::Images);
        assert_eq!("videos".parse::<AssetContext>().unwrap(), AssetContext::Videos);
    }

    #[test]
    fn context_rejects_unknown_names() {
        let err = AssetContext::parse("music").unwrap_err();
        assert!(err.to_string().contains("context is required"));
        assert!(AssetContext::parse("").is_err());
    }

    #[test]
    fn from_remote_remembers_filename() {
        let asset = Asset::from_remote(json!({
            "filename": "welcome.html",
            "contentType": "text/html",
            "metadata": {"context": "template", "author": "ops"},
            "publicCdnURI": "https://cdn.example/welcome.html",
            "length": 42
        }))
        .unwrap();

        assert_eq!(asset.id(), Some("welcome.html"));
        assert_eq!(asset.context().unwrap(), AssetContext::Templates);
        assert_eq!(asset.length, Some(42));
        assert_eq!(
            asset.public_cdn_uri.as_deref(),
            Some("https://cdn.example/welcome.html")
        );
    }

    #[test]
    fn new_asset_has_context_and_no_id() {
        let asset = Asset::new("a.css", AssetContext::Sections, "text/css");
        assert_eq!(asset.id(), None);
        assert_eq!(asset.context().unwrap(), AssetContext::Sections);
    }
}
