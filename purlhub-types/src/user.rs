//! Account users.

use crate::{JsonMap, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// A login belonging to an account.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub login: String,
    /// The server reports this field as `passwd`.
    #[serde(default, alias = "passwd", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "deserialize_roles")]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,
    #[serde(flatten)]
    pub extra: JsonMap,
    #[serde(skip)]
    loaded_login: Option<String>,
}

impl User {
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: Some(password.into()),
            ..Default::default()
        }
    }

    /// Parses a server payload, remembering the login it was stored under.
    pub fn from_remote(value: Value) -> Result<Self> {
        let mut user: User = serde_json::from_value(value)?;
        user.loaded_login = Some(user.login.clone());
        Ok(user)
    }

    /// The login this user is stored under remotely, if it was loaded.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.loaded_login.as_deref()
    }

    /// The new login when a loaded user's login was edited.
    #[must_use]
    pub fn renamed_to(&self) -> Option<&str> {
        match &self.loaded_login {
            Some(loaded) if *loaded != self.login => Some(&self.login),
            _ => None,
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("roles", &self.roles)
            .field("enabled", &self.enabled)
            .field("locked", &self.locked)
            .field("time_zone", &self.time_zone)
            .field("screen_name", &self.screen_name)
            .field("reference", &self.reference)
            .field("account_name", &self.account_name)
            .finish_non_exhaustive()
    }
}

/// Roles arrive either as a list or as one comma-joined string.
fn deserialize_roles<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Roles {
        Joined(String),
        List(Vec<String>),
    }

    Ok(match Option::<Roles>::deserialize(deserializer)? {
        Some(Roles::Joined(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Roles::List(list)) => list,
        None => Vec::new(),
    })
}
