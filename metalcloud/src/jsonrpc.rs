use crate::client::MetalCloudClient;
use crate::error::{ApiError, Result};
use crate::id::IdOrLabel;
use crate::types::{
    Infrastructure, InstanceArray, InstanceArrayOperation, OsAsset, OsTemplate, Secret, User,
};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::cell::Cell;

/// Connection settings for [`JsonRpcClient`]
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub endpoint: String,
    pub api_key: String,
    /// Email or ID of the user the API key belongs to
    pub user: String,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: &'a [Json],
    id: u64,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Json,
    #[serde(default)]
    error: Option<RpcFault>,
}

#[derive(Deserialize)]
struct RpcFault {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Blocking JSON-RPC 2.0 client for the API endpoint
pub struct JsonRpcClient {
    http: Client,
    settings: ClientSettings,
    next_id: Cell<u64>,
}

impl JsonRpcClient {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let http = Client::builder().timeout(None).build()?;
        Ok(Self {
            http,
            settings,
            next_id: Cell::new(1),
        })
    }

    fn call_raw(&self, method: &str, params: Vec<Json>) -> Result<Json> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        tracing::debug!(method, id, endpoint = %self.settings.endpoint, "calling remote procedure");

        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params: &params,
            id,
        };
        let response = self
            .http
            .post(&self.settings.endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        let parsed: RpcResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(ApiError::Status {
                    method: method.to_string(),
                    status: status.as_u16(),
                });
            }
            Err(source) => {
                return Err(ApiError::Decode {
                    method: method.to_string(),
                    source,
                });
            }
        };

        if let Some(fault) = parsed.error {
            tracing::debug!(method, id, code = fault.code, "remote procedure failed");
            return Err(ApiError::Remote {
                method: method.to_string(),
                code: fault.code,
                message: fault.message,
            });
        }
        Ok(parsed.result)
    }

    fn call<T: DeserializeOwned>(&self, method: &str, params: Vec<Json>) -> Result<T> {
        let result = self.call_raw(method, params)?;
        decode(method, result)
    }

    fn call_unit(&self, method: &str, params: Vec<Json>) -> Result<()> {
        self.call_raw(method, params).map(|_| ())
    }

    /// Collections come back either as an array or as an object keyed by label
    fn call_collection<T: DeserializeOwned>(&self, method: &str, params: Vec<Json>) -> Result<Vec<T>> {
        let items = match self.call_raw(method, params)? {
            Json::Array(items) => items,
            Json::Object(map) => map.into_iter().map(|(_, item)| item).collect(),
            Json::Null => Vec::new(),
            other => {
                return Err(ApiError::Other(format!(
                    "{} returned {} instead of a collection",
                    method, other
                )));
            }
        };
        items.into_iter().map(|item| decode(method, item)).collect()
    }

    fn user(&self) -> Json {
        match IdOrLabel::parse(&self.settings.user) {
            IdOrLabel::Id(id) => Json::from(id),
            IdOrLabel::Label(email) => Json::from(email),
        }
    }
}

fn decode<T: DeserializeOwned>(method: &str, value: Json) -> Result<T> {
    serde_json::from_value(value).map_err(|source| ApiError::Decode {
        method: method.to_string(),
        source,
    })
}

fn encode<T: Serialize>(method: &str, value: &T) -> Result<Json> {
    serde_json::to_value(value).map_err(|source| ApiError::Encode {
        method: method.to_string(),
        source,
    })
}

impl MetalCloudClient for JsonRpcClient {
    fn infrastructure_get(&self, infrastructure: &IdOrLabel) -> Result<Infrastructure> {
        let method = "infrastructure_get";
        self.call(method, vec![encode(method, infrastructure)?])
    }

    fn instance_arrays(&self, infrastructure_id: i64) -> Result<Vec<InstanceArray>> {
        self.call_collection("instance_arrays", vec![infrastructure_id.into()])
    }

    fn instance_array_get(&self, instance_array: &IdOrLabel) -> Result<InstanceArray> {
        let method = "instance_array_get";
        self.call(method, vec![encode(method, instance_array)?])
    }

    fn instance_array_create(
        &self,
        infrastructure_id: i64,
        instance_array: &InstanceArray,
    ) -> Result<InstanceArray> {
        let method = "instance_array_create";
        self.call(
            method,
            vec![infrastructure_id.into(), encode(method, instance_array)?],
        )
    }

    fn instance_array_edit(
        &self,
        instance_array_id: i64,
        operation: &InstanceArrayOperation,
        swap_existing_instances_hardware: Option<bool>,
        keep_detaching_drives: Option<bool>,
    ) -> Result<InstanceArray> {
        let method = "instance_array_edit";
        self.call(
            method,
            vec![
                instance_array_id.into(),
                encode(method, operation)?,
                swap_existing_instances_hardware.into(),
                keep_detaching_drives.into(),
                Json::Null,
                Json::Null,
            ],
        )
    }

    fn instance_array_delete(&self, instance_array_id: i64) -> Result<()> {
        self.call_unit("instance_array_delete", vec![instance_array_id.into()])
    }

    fn os_templates(&self) -> Result<Vec<OsTemplate>> {
        self.call_collection("os_templates", vec![self.user()])
    }

    fn os_template_get(&self, template_id: i64, decrypt_password: bool) -> Result<OsTemplate> {
        self.call(
            "os_template_get",
            vec![template_id.into(), decrypt_password.into()],
        )
    }

    fn os_template_create(&self, template: &OsTemplate) -> Result<OsTemplate> {
        let method = "os_template_create";
        self.call(method, vec![self.user(), encode(method, template)?])
    }

    fn os_template_update(&self, template_id: i64, template: &OsTemplate) -> Result<OsTemplate> {
        let method = "os_template_update";
        self.call(method, vec![template_id.into(), encode(method, template)?])
    }

    fn os_template_delete(&self, template_id: i64) -> Result<()> {
        self.call_unit("os_template_delete", vec![template_id.into()])
    }

    fn os_template_make_public(&self, template_id: i64) -> Result<()> {
        self.call_unit("os_template_make_public", vec![template_id.into()])
    }

    fn os_template_make_private(&self, template_id: i64, user_id: i64) -> Result<()> {
        self.call_unit(
            "os_template_make_private",
            vec![template_id.into(), user_id.into()],
        )
    }

    fn os_template_add_os_asset(
        &self,
        template_id: i64,
        asset_id: i64,
        path: &str,
        variables_json: &str,
    ) -> Result<()> {
        self.call_unit(
            "os_template_add_os_asset",
            vec![
                template_id.into(),
                asset_id.into(),
                path.into(),
                variables_json.into(),
            ],
        )
    }

    fn os_assets(&self) -> Result<Vec<OsAsset>> {
        self.call_collection("os_assets", vec![self.user()])
    }

    fn os_asset_get(&self, asset_id: i64) -> Result<OsAsset> {
        self.call("os_asset_get", vec![asset_id.into()])
    }

    fn os_asset_create(&self, asset: &OsAsset) -> Result<OsAsset> {
        let method = "os_asset_create";
        self.call(method, vec![self.user(), encode(method, asset)?])
    }

    fn os_asset_update(&self, asset_id: i64, asset: &OsAsset) -> Result<OsAsset> {
        let method = "os_asset_update";
        self.call(method, vec![asset_id.into(), encode(method, asset)?])
    }

    fn os_asset_delete(&self, asset_id: i64) -> Result<()> {
        self.call_unit("os_asset_delete", vec![asset_id.into()])
    }

    fn os_asset_make_public(&self, asset_id: i64) -> Result<OsAsset> {
        self.call("os_asset_make_public", vec![asset_id.into()])
    }

    fn os_asset_make_private(&self, asset_id: i64, user_id: i64) -> Result<OsAsset> {
        self.call(
            "os_asset_make_private",
            vec![asset_id.into(), user_id.into()],
        )
    }

    fn secrets(&self, usage: Option<&str>) -> Result<Vec<Secret>> {
        self.call_collection("secrets", vec![self.user(), usage.into()])
    }

    fn secret_get(&self, secret_id: i64) -> Result<Secret> {
        self.call("secret_get", vec![secret_id.into()])
    }

    fn secret_create(&self, secret: &Secret) -> Result<Secret> {
        let method = "secret_create";
        self.call(method, vec![self.user(), encode(method, secret)?])
    }

    fn secret_delete(&self, secret_id: i64) -> Result<()> {
        self.call_unit("secret_delete", vec![secret_id.into()])
    }

    fn user_get(&self, user_id: i64) -> Result<User> {
        self.call("user_get", vec![user_id.into()])
    }

    fn user_get_by_email(&self, email: &str) -> Result<User> {
        self.call("user_get_by_email", vec![email.into()])
    }
}
