//! Core type definitions for the purlHub SDK.
//!
//! This crate defines the plain value types exchanged with the purlHub
//! REST API:
//! - Composite personalization objects and their content fingerprints
//! - Accounts, users and hierarchical nodes
//! - Library assets and their contexts
//!
//! Nothing here performs I/O. The HTTP binding lives in `purlhub-client`.

mod account;
mod asset;
mod fingerprint;
mod node;
mod object;
pub mod text;
mod user;

pub use account::Account;
pub use asset::{Asset, AssetContext, AssetMetadata};
pub use fingerprint::{Fingerprint, Fingerprints};
pub use node::{Node, NodeStatus};
pub use object::{CompositeObject, SubResource, COMPOSITE_KEYS};
pub use user::User;

/// JSON object map used for every free-form sub-document.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A remote payload did not have the expected shape.
    #[error("invalid shape: {0}")]
    InvalidShape(String),

    /// A caller-supplied value is outside the accepted domain.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}
