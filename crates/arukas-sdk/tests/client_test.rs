// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Client operation tests for arukas-sdk, driven through MockTransport.

use std::sync::Arc;

use arukas_sdk::transport::Method;
use arukas_sdk::{
    ArukasClient, MockTransport, PLAN_FREE, Port, RequestParam, SdkError, ServiceStatus,
    TransportError,
};
use serde_json::json;

const APP_ID: &str = "2b21fe8c-1ed4-4213-9b77-216de6d69d3c";
const SERVICE_ID: &str = "01BEF829-72E4-48F9-81DA-E3B41A1EDAC9";

fn app_body() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "data": {
            "type": "apps",
            "id": APP_ID,
            "attributes": {"name": "test-app"},
            "relationships": {
                "service": {"data": {"type": "services", "id": SERVICE_ID}}
            }
        }
    }))
    .unwrap()
}

fn service_body(status: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "data": {
            "type": "services",
            "id": SERVICE_ID,
            "attributes": {
                "image": "nginx:latest",
                "instances": 1,
                "ports": ["80/tcp"],
                "status": status,
                "end-point": "test-app.arukascloud.io"
            }
        }
    }))
    .unwrap()
}

fn create_param() -> RequestParam {
    RequestParam::new("test-app", "nginx:latest")
        .with_port(Port::tcp(80))
        .with_env("FOO", "BAR")
        .with_plan(PLAN_FREE)
}

fn client(mock: &Arc<MockTransport>) -> ArukasClient {
    ArukasClient::with_transport(Arc::clone(mock))
}

// ============================================================================
// create_app
// ============================================================================

#[tokio::test]
async fn test_create_app_success() {
    let mock = Arc::new(MockTransport::new().with_post(Ok(app_body())));
    let app = client(&mock).create_app(&create_param()).await.unwrap();

    let expected: arukas_sdk::AppData = serde_json::from_slice(&app_body()).unwrap();
    assert_eq!(app, expected);
    assert_eq!(app.app_id(), Some(APP_ID));
    assert_eq!(app.service_id(), Some(SERVICE_ID));
    assert_eq!(app.name(), "test-app");
}

#[tokio::test]
async fn test_create_app_sends_app_and_service() {
    let mock = Arc::new(MockTransport::new().with_post(Ok(app_body())));
    client(&mock).create_app(&create_param()).await.unwrap();

    let calls = mock.calls().await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::Post);
    assert_eq!(calls[0].path, "/apps");

    let body = calls[0].json_body().unwrap();
    assert_eq!(body["data"][0]["type"], "apps");
    assert_eq!(body["data"][0]["attributes"]["name"], "test-app");
    assert_eq!(body["data"][1]["type"], "services");
    assert_eq!(body["data"][1]["attributes"]["image"], "nginx:latest");
    assert_eq!(body["data"][1]["attributes"]["instances"], 1);
    assert_eq!(
        body["data"][1]["attributes"]["ports"],
        json!([{"protocol": "tcp", "number": 80}])
    );
    assert_eq!(
        body["data"][1]["attributes"]["environment"],
        json!([{"key": "FOO", "value": "BAR"}])
    );
    assert_eq!(
        body["data"][1]["relationships"]["service-plan"]["data"],
        json!({"type": "service-plans", "id": "jp-tokyo/free"})
    );
}

#[tokio::test]
async fn test_create_app_invalid_params_sends_nothing() {
    let mock = Arc::new(MockTransport::new().with_post(Ok(app_body())));
    let client = client(&mock);

    let invalid = [
        RequestParam::default(),
        create_param().with_port(Port::new("ssh", 22)),
        create_param().with_port(Port::tcp(65536)),
        create_param().with_plan("foobar"),
        create_param().with_region("foobar"),
    ];
    for param in invalid {
        let err = client.create_app(&param).await.unwrap_err();
        assert!(matches!(err, SdkError::Validation { .. }), "{:?}", err);
    }

    assert!(mock.calls().await.is_empty());
}

#[tokio::test]
async fn test_create_app_returns_transport_error_as_is() {
    let failure = TransportError::Status {
        status: 500,
        path: "/apps".to_string(),
        body: "boom".to_string(),
    };
    let mock = Arc::new(MockTransport::new().with_post(Err(failure.clone())));

    match client(&mock).create_app(&create_param()).await {
        Err(SdkError::Transport(err)) => assert_eq!(err, failure),
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_app_invalid_json_is_decode_error() {
    let mock = Arc::new(MockTransport::new().with_post(Ok(br#"{ "invalid": "#.to_vec())));
    let err = client(&mock).create_app(&create_param()).await.unwrap_err();
    assert!(matches!(err, SdkError::Decode(_)));
}

// ============================================================================
// Apps
// ============================================================================

#[tokio::test]
async fn test_read_app() {
    let mock = Arc::new(MockTransport::new().with_get(Ok(app_body())));
    let app = client(&mock).read_app(APP_ID).await.unwrap();
    assert_eq!(app.app_id(), Some(APP_ID));

    let calls = mock.calls().await;
    assert_eq!(calls[0].method, Method::Get);
    assert_eq!(calls[0].path, format!("/apps/{}", APP_ID));
}

#[tokio::test]
async fn test_read_app_not_found() {
    let mock = Arc::new(MockTransport::new().with_get(Err(TransportError::NotFound {
        path: format!("/apps/{}", APP_ID),
    })));
    let err = client(&mock).read_app(APP_ID).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_list_apps_empty() {
    let mock = Arc::new(MockTransport::new().with_get(Ok(br#"{"data": []}"#.to_vec())));
    let apps = client(&mock).list_apps().await.unwrap();
    assert!(apps.data.is_empty());
    assert_eq!(mock.calls().await[0].path, "/apps");
}

#[tokio::test]
async fn test_delete_app() {
    let mock = Arc::new(MockTransport::new());
    client(&mock).delete_app(APP_ID).await.unwrap();

    let calls = mock.calls().await;
    assert_eq!(calls[0].method, Method::Delete);
    assert_eq!(calls[0].path, format!("/apps/{}", APP_ID));
}

#[tokio::test]
async fn test_delete_app_error() {
    let failure = TransportError::Request("connection reset".to_string());
    let mock = Arc::new(MockTransport::new().with_delete(Err(failure)));
    let err = client(&mock).delete_app(APP_ID).await.unwrap_err();
    assert!(matches!(err, SdkError::Transport(TransportError::Request(_))));
}

// ============================================================================
// Services
// ============================================================================

#[tokio::test]
async fn test_read_service() {
    let mock = Arc::new(MockTransport::new().with_get(Ok(service_body("running"))));
    let service = client(&mock).read_service(SERVICE_ID).await.unwrap();

    assert_eq!(service.status(), ServiceStatus::Running);
    assert_eq!(service.ports(), &[Port::tcp(80)]);
    assert_eq!(service.end_point(), Some("test-app.arukascloud.io"));
    assert_eq!(mock.calls().await[0].path, format!("/services/{}", SERVICE_ID));
}

#[tokio::test]
async fn test_read_service_not_found() {
    let mock = Arc::new(MockTransport::new().with_get(Err(TransportError::NotFound {
        path: format!("/services/{}", SERVICE_ID),
    })));
    let err = client(&mock).read_service(SERVICE_ID).await.unwrap_err();
    assert!(matches!(err, SdkError::NotFound(_)));
}

#[tokio::test]
async fn test_list_services() {
    let body = serde_json::to_vec(&json!({
        "data": [
            {"type": "services", "id": SERVICE_ID,
             "attributes": {"ports": ["80/tcp"], "status": "stopped"}},
            {"type": "services", "id": "d6bf0fb8-4dd5-4baa-a0d2-8e4a1b8e1a54",
             "attributes": {"ports": [{"protocol": "udp", "number": 34197}], "status": "running"}}
        ]
    }))
    .unwrap();
    let mock = Arc::new(MockTransport::new().with_get(Ok(body)));
    let services = client(&mock).list_services().await.unwrap();

    assert_eq!(services.data.len(), 2);
    assert_eq!(services.data[0].status(), ServiceStatus::Stopped);
    assert_eq!(services.data[1].ports(), &[Port::udp(34197)]);
    assert_eq!(mock.calls().await[0].path, "/services");
}

#[tokio::test]
async fn test_update_service() {
    let mock = Arc::new(MockTransport::new().with_patch(Ok(service_body("running"))));
    let param = RequestParam::new("", "nginx:1.25")
        .with_instances(2)
        .with_port(Port::tcp(8080));

    let service = client(&mock)
        .update_service(SERVICE_ID, &param)
        .await
        .unwrap();
    assert_eq!(service.service_id(), Some(SERVICE_ID));

    let calls = mock.calls().await;
    assert_eq!(calls[0].method, Method::Patch);
    assert_eq!(calls[0].path, format!("/services/{}", SERVICE_ID));

    let body = calls[0].json_body().unwrap();
    assert_eq!(body["data"]["type"], "services");
    assert_eq!(body["data"]["id"], SERVICE_ID);
    assert_eq!(body["data"]["attributes"]["image"], "nginx:1.25");
    assert_eq!(body["data"]["attributes"]["instances"], 2);
    assert!(body["data"].get("relationships").is_none());
}

#[tokio::test]
async fn test_update_service_invalid_params_sends_nothing() {
    let mock = Arc::new(MockTransport::new());
    let err = client(&mock)
        .update_service(SERVICE_ID, &RequestParam::new("", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::Validation { field: "image", .. }));
    assert!(mock.calls().await.is_empty());
}

// ============================================================================
// Power
// ============================================================================

#[tokio::test]
async fn test_power_on_and_off() {
    let mock = Arc::new(MockTransport::new());
    let client = client(&mock);

    client.power_on(SERVICE_ID).await.unwrap();
    client.power_off(SERVICE_ID).await.unwrap();

    let calls = mock.calls().await;
    let power_path = format!("/services/{}/power", SERVICE_ID);
    assert_eq!(calls[0].method, Method::Post);
    assert_eq!(calls[0].path, power_path);
    assert_eq!(calls[0].body, None);
    assert_eq!(calls[1].method, Method::Delete);
    assert_eq!(calls[1].path, power_path);
}

#[tokio::test]
async fn test_power_on_error() {
    let mock = Arc::new(MockTransport::new().with_post(Err(TransportError::Status {
        status: 409,
        path: format!("/services/{}/power", SERVICE_ID),
        body: "already running".to_string(),
    })));
    let err = client(&mock).power_on(SERVICE_ID).await.unwrap_err();
    assert!(matches!(
        err,
        SdkError::Transport(TransportError::Status { status: 409, .. })
    ));
}

// ============================================================================
// IDs
// ============================================================================

#[tokio::test]
async fn test_invalid_ids_are_rejected_locally() {
    let mock = Arc::new(MockTransport::new());
    let client = client(&mock);

    for id in ["", "not-a-uuid", "../apps"] {
        assert!(matches!(
            client.read_app(id).await,
            Err(SdkError::Validation { field: "id", .. })
        ));
        assert!(matches!(
            client.delete_app(id).await,
            Err(SdkError::Validation { field: "id", .. })
        ));
        assert!(matches!(
            client.read_service(id).await,
            Err(SdkError::Validation { field: "id", .. })
        ));
        assert!(matches!(
            client.power_on(id).await,
            Err(SdkError::Validation { field: "id", .. })
        ));
        assert!(matches!(
            client.power_off(id).await,
            Err(SdkError::Validation { field: "id", .. })
        ));
    }

    assert!(mock.calls().await.is_empty());
}
