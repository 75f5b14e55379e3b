//! Tenant accounts.

use crate::JsonMap;
use serde::{Deserialize, Serialize};

/// A purlHub tenant account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account name; also the account's URL segment.
    pub account_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// IANA zone name, e.g. `America/Denver`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
    /// Server-managed fields, kept verbatim.
    #[serde(flatten)]
    pub extra: JsonMap,
}

impl Account {
    #[must_use]
    pub fn new(account_name: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            ..Default::default()
        }
    }

    /// True when at least one editable field besides the name is set.
    #[must_use]
    pub fn has_settings(&self) -> bool {
        self.alias.is_some()
            || self.enabled.is_some()
            || self.time_zone.is_some()
            || self.subscription.is_some()
    }
}
