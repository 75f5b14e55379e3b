//! Node hierarchy of one account.

use crate::bound::Bound;
use crate::client::{encode_path, ApiClient};
use crate::error::{ApiError, ApiResult};
use crate::objects::ObjectStore;
use crate::validate::require_path;
use purlhub_types::{JsonMap, Node};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// CRUD over `<account>/nodes`.
#[derive(Debug, Clone)]
pub struct NodeStore {
    client: Arc<ApiClient>,
    prefix: String,
    account_name: String,
}

impl NodeStore {
    pub(crate) fn new(client: Arc<ApiClient>, account_path: String, account_name: String) -> Self {
        Self {
            client,
            prefix: format!("{account_path}/nodes"),
            account_name,
        }
    }

    fn path(&self, node_path: &str) -> String {
        format!("{}/{}", self.prefix, encode_path(node_path))
    }

    /// Pairs a node with this store.
    pub fn bind(&self, node: Node) -> Bound<NodeStore, Node> {
        Bound::new(self.clone(), node)
    }

    pub async fn get(&self, path: &str) -> ApiResult<Node> {
        let path = require_path(path, "node path")?;

        debug!("Getting Node [{}]", path);
        let response = self.client.get(&self.path(&path), &[]).await?;
        let raw = match response.into_data(&format!("node {path}"))? {
            Value::Array(items) => items
                .into_iter()
                .next()
                .ok_or_else(|| ApiError::NotFound(format!("node {path} Not Found!")))?,
            single => single,
        };
        Ok(Node::from_remote(raw)?)
    }

    pub async fn list(&self) -> ApiResult<Vec<Node>> {
        debug!("Scanning Nodes...");
        let response = self.client.get(&format!("{}/", self.prefix), &[]).await?;
        response
            .into_list()?
            .into_iter()
            .map(|raw| Node::from_remote(raw).map_err(ApiError::from))
            .collect()
    }

    /// Creates or updates a node. A loaded node whose name was edited is
    /// renamed on the server.
    pub async fn save(&self, node: &Node) -> ApiResult<Node> {
        let node_class = node
            .classification()
            .filter(|class| !class.is_empty())
            .ok_or_else(|| {
                ApiError::InvalidArgument(
                    "A node (obj) is required! nodeClass is missing".to_string(),
                )
            })?;
        let target = require_path(node.id().unwrap_or(&node.path()), "node path")?;

        let mut body = JsonMap::new();
        body.insert("classification".into(), Value::String(node_class.to_string()));
        if let Some(status) = node.status {
            body.insert("status".into(), serde_json::to_value(status)?);
        }
        if let Some(description) = &node.description {
            body.insert("description".into(), Value::String(description.clone()));
        }
        if let Some(new_name) = node.renamed_to() {
            body.insert("newName".into(), Value::String(new_name.to_string()));
        }

        debug!("Saving Node [{}] w/ {:?}", target, body);
        let response = self
            .client
            .post(&self.path(&target), &Value::Object(body))
            .await?;
        Ok(Node::from_remote(response.into_data(&format!("node {target}"))?)?)
    }

    pub async fn remove(&self, path: &str) -> ApiResult<Value> {
        let path = require_path(path, "node path")?;

        info!("Removing Node [{}]", path);
        let response = self.client.delete(&self.path(&path), &[], None).await?;
        Ok(response.data)
    }

    /// Personalization objects stored under a node path.
    pub fn objects_at(&self, node_path: &str) -> ApiResult<ObjectStore> {
        let node_path = require_path(node_path, "node path")?;
        Ok(ObjectStore::new(
            Arc::clone(&self.client),
            format!(
                "admin/rest/{}/{}",
                encode_path(&self.account_name),
                encode_path(&node_path)
            ),
        ))
    }

    /// Personalization objects stored under a node.
    pub fn objects(&self, node: &Node) -> ApiResult<ObjectStore> {
        self.objects_at(node.id().unwrap_or(&node.path()))
    }
}

impl Bound<NodeStore, Node> {
    pub async fn save(&mut self) -> ApiResult<()> {
        let saved = self.store().save(&**self).await?;
        self.replace(saved);
        Ok(())
    }

    /// Deletes this node under the path it was loaded with.
    pub async fn remove(self) -> ApiResult<Value> {
        let path = self.id().map_or_else(|| self.path(), str::to_string);
        self.store().remove(&path).await
    }

    pub fn objects(&self) -> ApiResult<ObjectStore> {
        self.store().objects(self)
    }
}
