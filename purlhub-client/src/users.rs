//! Users of one account.

use crate::bound::Bound;
use crate::client::{encode_path, ApiClient};
use crate::error::{ApiError, ApiResult};
use crate::validate::require_path;
use purlhub_types::{JsonMap, User};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// CRUD over `<account>/users`.
#[derive(Debug, Clone)]
pub struct UserStore {
    client: Arc<ApiClient>,
    prefix: String,
}

impl UserStore {
    pub(crate) fn new(client: Arc<ApiClient>, account_path: String) -> Self {
        Self {
            client,
            prefix: format!("{account_path}/users"),
        }
    }

    fn path(&self, login: &str) -> String {
        format!("{}/{}", self.prefix, encode_path(login))
    }

    /// Pairs a user with this store.
    pub fn bind(&self, user: User) -> Bound<UserStore, User> {
        Bound::new(self.clone(), user)
    }

    pub async fn get(&self, login: &str) -> ApiResult<User> {
        let login = require_path(login, "user name")?;

        debug!("Getting User [{}]", login);
        let response = self.client.get(&self.path(&login), &[]).await?;
        Ok(User::from_remote(response.into_data(&format!("user {login}"))?)?)
    }

    pub async fn list(&self) -> ApiResult<Vec<User>> {
        debug!("Scanning Users...");
        let response = self.client.get(&format!("{}/", self.prefix), &[]).await?;
        response
            .into_list()?
            .into_iter()
            .map(|raw| User::from_remote(raw).map_err(ApiError::from))
            .collect()
    }

    /// Creates or updates a user. A loaded user whose login was edited is
    /// renamed on the server.
    pub async fn save(&self, user: &User) -> ApiResult<User> {
        let login = require_path(&user.login, "login")?;
        let password = user
            .password
            .as_deref()
            .filter(|password| password.chars().count() > 1)
            .ok_or_else(|| ApiError::InvalidArgument("A password is required!".to_string()))?;

        let mut body = JsonMap::new();
        body.insert("login".into(), Value::String(login.clone()));
        body.insert("password".into(), Value::String(password.to_string()));
        if !user.roles.is_empty() {
            body.insert("roles".into(), Value::String(user.roles.join(",")));
        }
        if let Some(enabled) = user.enabled {
            body.insert("enabled".into(), Value::Bool(enabled));
        }
        if let Some(locked) = user.locked {
            body.insert("locked".into(), Value::Bool(locked));
        }
        for (key, value) in [
            ("timeZone", &user.time_zone),
            ("screenName", &user.screen_name),
            ("reference", &user.reference),
        ] {
            if let Some(value) = value {
                body.insert(key.into(), Value::String(value.clone()));
            }
        }

        let target = match user.id() {
            Some(loaded) => {
                if let Some(new_login) = user.renamed_to() {
                    body.insert("newLogin".into(), Value::String(new_login.to_string()));
                }
                loaded.to_string()
            }
            None => login,
        };

        debug!("Saving User [{}]", target);
        let response = self
            .client
            .post(&self.path(&target), &Value::Object(body))
            .await?;
        Ok(User::from_remote(response.into_data(&format!("user {target}"))?)?)
    }

    pub async fn remove(&self, login: &str) -> ApiResult<Value> {
        let login = require_path(login, "user name")?;

        info!("Removing User [{}]", login);
        let response = self.client.delete(&self.path(&login), &[], None).await?;
        Ok(response.data)
    }
}

impl Bound<UserStore, User> {
    pub async fn save(&mut self) -> ApiResult<()> {
        let saved = self.store().save(&**self).await?;
        self.replace(saved);
        Ok(())
    }

    /// Deletes this user under the login it was loaded with.
    pub async fn remove(self) -> ApiResult<Value> {
        let login = self.id().unwrap_or(&self.login).to_string();
        self.store().remove(&login).await
    }
}
