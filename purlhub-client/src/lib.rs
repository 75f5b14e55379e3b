//! HTTP binding for the purlHub REST API.
//!
//! Provides typed, rate-limited access to:
//! - Accounts, and the users of each account
//! - The node hierarchy of an account
//! - Personalization objects stored under a node
//! - The asset library of an account
//!
//! # Architecture
//!
//! An [`Api`] owns one [`ApiClient`] (HTTP Basic auth, JSON envelope
//! handling) and one [`Throttle`]. Stores are cheap handles onto that
//! client, each rooted at a path:
//!
//! ```text
//! Api
//!  └─ AccountStore            admin/rest/accounts/<name>
//!      ├─ UserStore           .../<name>/users/<login>
//!      ├─ LibraryStore        .../<name>/library/assets/<context>/<file>
//!      └─ NodeStore           .../<name>/nodes/<path>
//!          └─ ObjectStore     admin/rest/<name>/<path>/purl*
//! ```
//!
//! Stores return plain values from `purlhub-types`. `bind()` pairs a value
//! with its store so it can be saved or removed in place, see [`Bound`].
//!
//! # Example
//!
//! ```no_run
//! use purlhub_client::{Api, ApiConfig};
//!
//! # async fn run() -> purlhub_client::ApiResult<()> {
//! let api = Api::new(ApiConfig::new("https://api.purlhub.com", "admin", "secret")?)?;
//! let objects = api.accounts().nodes("acme")?.objects_at("default")?;
//!
//! let mut object = objects.bind(objects.get("PURL-1").await?);
//! object.properties.insert("tier".into(), "gold".into());
//! object.save().await?; // only `purlProperties` is written
//! # Ok(())
//! # }
//! ```

mod accounts;
mod api;
mod bound;
mod client;
mod config;
mod error;
mod library;
mod nodes;
mod objects;
mod throttle;
mod users;
mod validate;

pub use accounts::AccountStore;
pub use api::Api;
pub use bound::Bound;
pub use client::{ApiClient, ApiResponse};
pub use config::{
    normalize_base_url, ApiConfig, ThrottleConfig, ENV_API_LOGIN, ENV_API_PASSWORD, ENV_API_ROOT,
};
pub use error::{ApiError, ApiResult};
pub use library::LibraryStore;
pub use nodes::NodeStore;
pub use objects::ObjectStore;
pub use throttle::{Throttle, ThrottlePermit};
pub use users::UserStore;

pub use purlhub_types::{
    Account, Asset, AssetContext, AssetMetadata, CompositeObject, Fingerprint, Fingerprints,
    JsonMap, Node, NodeStatus, SubResource, User,
};
