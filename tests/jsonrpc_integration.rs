//! JSON-RPC client against a local mock API server.
//!
//! The client is blocking, so every call runs on the blocking pool while the
//! mock server keeps serving on the async runtime.

use metalcloud::{
    ApiError, ClientSettings, IdOrLabel, InstanceArrayOperation, JsonRpcClient, MetalCloudClient,
    OsAsset,
};
use metalcloud_tests::{API_KEY, USER, rpc_error, rpc_result, settings};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

async fn with_client<T, F>(settings: ClientSettings, call: F) -> T
where
    F: FnOnce(&JsonRpcClient) -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let client = JsonRpcClient::new(settings).expect("client builds");
        call(&client)
    })
    .await
    .expect("blocking task completes")
}

#[tokio::test(flavor = "multi_thread")]
async fn test_collection_keyed_by_label_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api"))
        .and(header("authorization", format!("Bearer {}", API_KEY).as_str()))
        .and(body_partial_json(json!({
            "jsonrpc": "2.0",
            "method": "secrets",
            "params": [USER, null]
        })))
        .respond_with(rpc_result(json!({
            "deploy-key": {"secret_id": 10, "secret_name": "deploy-key", "secret_usage": "ssh"},
            "db": {"secret_id": 11, "secret_name": "db"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let secrets = with_client(settings(&server.uri()), |client| client.secrets(None))
        .await
        .unwrap();

    assert_eq!(secrets.len(), 2);
    let names: Vec<&str> = secrets.iter().map(|s| s.secret_name.as_str()).collect();
    assert!(names.contains(&"deploy-key"));
    assert!(names.contains(&"db"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_collection_as_array_and_null() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "os_assets"})))
        .respond_with(rpc_result(json!([
            {"os_asset_id": 1, "os_asset_filename": "grub.efi"},
            {"os_asset_id": 2, "os_asset_filename": "pxe.ipxe"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "os_templates"})))
        .respond_with(rpc_result(json!(null)))
        .mount(&server)
        .await;

    let (assets, templates) = with_client(settings(&server.uri()), |client| {
        (client.os_assets(), client.os_templates())
    })
    .await;

    let assets = assets.unwrap();
    assert_eq!(assets.len(), 2);
    assert_eq!(assets[1].os_asset_filename, "pxe.ipxe");
    assert!(templates.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_numeric_user_is_sent_as_number() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "os_templates", "params": [42]})))
        .respond_with(rpc_result(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut numeric = settings(&server.uri());
    numeric.user = "42".to_string();
    let templates = with_client(numeric, |client| client.os_templates())
        .await
        .unwrap();
    assert!(templates.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_label_reference_is_sent_as_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "infrastructure_get",
            "params": ["demo"]
        })))
        .respond_with(rpc_result(json!({
            "infrastructure_id": 100,
            "infrastructure_label": "demo"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let infrastructure = with_client(settings(&server.uri()), |client| {
        client.infrastructure_get(&IdOrLabel::parse("demo"))
    })
    .await
    .unwrap();
    assert_eq!(infrastructure.infrastructure_id, 100);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_instance_array_edit_sends_six_params() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "instance_array_edit",
            "params": [
                12,
                {"instance_array_label": "web", "instance_array_instance_count": 4},
                true,
                null,
                null,
                null
            ]
        })))
        .respond_with(rpc_result(json!({"instance_array_id": 12})))
        .expect(1)
        .mount(&server)
        .await;

    let operation = InstanceArrayOperation {
        instance_array_id: 12,
        instance_array_label: "web".to_string(),
        instance_array_instance_count: 4,
        ..Default::default()
    };
    let edited = with_client(settings(&server.uri()), move |client| {
        client.instance_array_edit(12, &operation, Some(true), None)
    })
    .await
    .unwrap();
    assert_eq!(edited.instance_array_id, 12);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_sends_user_then_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "os_asset_create",
            "params": [USER, {"os_asset_filename": "boot.ipxe", "os_asset_contents_base64": "IyFpcHhl"}]
        })))
        .respond_with(rpc_result(json!({"os_asset_id": 77, "os_asset_filename": "boot.ipxe"})))
        .expect(1)
        .mount(&server)
        .await;

    let asset = OsAsset {
        os_asset_filename: "boot.ipxe".to_string(),
        os_asset_contents_base64: Some("IyFpcHhl".to_string()),
        ..Default::default()
    };
    let created = with_client(settings(&server.uri()), move |client| {
        client.os_asset_create(&asset)
    })
    .await
    .unwrap();
    assert_eq!(created.os_asset_id, 77);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remote_error_is_reported_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_error(-32000, "Secret 99 does not exist."))
        .mount(&server)
        .await;

    let err = with_client(settings(&server.uri()), |client| client.secret_delete(99))
        .await
        .unwrap_err();

    match &err {
        ApiError::Remote {
            method: called,
            code,
            message,
        } => {
            assert_eq!(called, "secret_delete");
            assert_eq!(*code, -32000);
            assert_eq!(message, "Secret 99 does not exist.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), "Secret 99 does not exist.");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_http_failure_without_rpc_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = with_client(settings(&server.uri()), |client| client.user_get(1))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 502, .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unexpected_result_shape_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!("not a user")))
        .mount(&server)
        .await;

    let err = with_client(settings(&server.uri()), |client| {
        client.user_get_by_email(USER)
    })
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_endpoint_is_http_error() {
    let err = with_client(settings("http://127.0.0.1:1"), |client| client.os_asset_delete(1))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Http(_)));
}
