//! Tenant accounts and their child stores.

use crate::bound::Bound;
use crate::client::{encode_path, from_data, ApiClient};
use crate::error::{ApiError, ApiResult};
use crate::library::LibraryStore;
use crate::nodes::NodeStore;
use crate::users::UserStore;
use crate::validate::require_path;
use purlhub_types::{Account, JsonMap};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

const ACCOUNTS_ROOT: &str = "admin/rest/accounts";

/// CRUD over `/admin/rest/accounts`.
#[derive(Debug, Clone)]
pub struct AccountStore {
    client: Arc<ApiClient>,
}

impl AccountStore {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    fn path(name: &str) -> String {
        format!("{ACCOUNTS_ROOT}/{}", encode_path(name))
    }

    /// Pairs an account with this store.
    pub fn bind(&self, account: Account) -> Bound<AccountStore, Account> {
        Bound::new(self.clone(), account)
    }

    pub async fn get(&self, name: &str) -> ApiResult<Account> {
        let name = require_path(name, "account name")?;

        debug!("Getting Account [{}]", name);
        let response = self.client.get(&Self::path(&name), &[]).await?;
        let data = response.into_data(&format!("account {name}"))?;
        from_data(data)
    }

    pub async fn list(&self) -> ApiResult<Vec<Account>> {
        debug!("Scanning Accounts...");
        let response = self.client.get(&format!("{ACCOUNTS_ROOT}/"), &[]).await?;
        response
            .into_list()?
            .into_iter()
            .map(from_data)
            .collect()
    }

    /// Creates or updates an account. At least one of alias, enabled,
    /// timeZone or subscription must be set.
    pub async fn save(&self, account: &Account) -> ApiResult<Account> {
        let name = require_path(&account.account_name, "account name")?;
        if !account.has_settings() {
            return Err(ApiError::InvalidArgument(
                "An account (obj) is required! Set alias, enabled, timeZone or subscription"
                    .to_string(),
            ));
        }

        let mut body = JsonMap::new();
        body.insert("accountName".into(), Value::String(name.clone()));
        if let Some(alias) = &account.alias {
            body.insert("alias".into(), Value::String(alias.clone()));
        }
        if let Some(enabled) = account.enabled {
            body.insert("enabled".into(), Value::Bool(enabled));
        }
        if let Some(time_zone) = &account.time_zone {
            body.insert("timeZone".into(), Value::String(time_zone.clone()));
        }
        if let Some(subscription) = &account.subscription {
            body.insert("subscription".into(), Value::String(subscription.clone()));
        }

        debug!("Saving Account [{}] w/ {:?}", name, body);
        let response = self
            .client
            .post(&Self::path(&name), &Value::Object(body))
            .await?;
        let data = response.into_data(&format!("account {name}"))?;
        from_data(data)
    }

    /// Deletes an account and everything under it.
    pub async fn remove(&self, name: &str) -> ApiResult<Value> {
        let name = require_path(name, "account name")?;

        info!("Removing Account [{}]", name);
        let response = self.client.delete(&Self::path(&name), &[], None).await?;
        Ok(response.data)
    }

    /// Users of an account.
    pub fn users(&self, name: &str) -> ApiResult<UserStore> {
        let name = require_path(name, "account name")?;
        Ok(UserStore::new(Arc::clone(&self.client), Self::path(&name)))
    }

    /// Node hierarchy of an account.
    pub fn nodes(&self, name: &str) -> ApiResult<NodeStore> {
        let name = require_path(name, "account name")?;
        Ok(NodeStore::new(
            Arc::clone(&self.client),
            Self::path(&name),
            name,
        ))
    }

    /// Asset library of an account.
    pub fn library(&self, name: &str) -> ApiResult<LibraryStore> {
        let name = require_path(name, "account name")?;
        Ok(LibraryStore::new(Arc::clone(&self.client), Self::path(&name)))
    }
}

impl Bound<AccountStore, Account> {
    pub async fn save(&mut self) -> ApiResult<()> {
        let saved = self.store().save(&**self).await?;
        self.replace(saved);
        Ok(())
    }

    /// Deletes this account; the returned snapshot is no longer bound.
    pub async fn remove(self) -> ApiResult<Value> {
        self.store().remove(&self.account_name).await
    }

    pub fn users(&self) -> ApiResult<UserStore> {
        self.store().users(&self.account_name)
    }

    pub fn nodes(&self) -> ApiResult<NodeStore> {
        self.store().nodes(&self.account_name)
    }

    pub fn library(&self) -> ApiResult<LibraryStore> {
        self.store().library(&self.account_name)
    }
}
