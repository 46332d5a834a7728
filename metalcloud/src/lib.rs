//! Client for the bare metal cloud JSON-RPC API

pub mod client;
pub mod error;
pub mod id;
pub mod jsonrpc;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use client::MetalCloudClient;
pub use error::{ApiError, Result};
pub use id::IdOrLabel;
pub use jsonrpc::{ClientSettings, JsonRpcClient};
pub use types::{
    Infrastructure, InstanceArray, InstanceArrayOperation, OperatingSystem, OsAsset, OsTemplate,
    OsTemplateCredentials, Secret, User,
};
