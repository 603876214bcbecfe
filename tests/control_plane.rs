//! Control-plane registration over HTTP.

use serde_json::json;
use stub_server::{RouteSpec, StubConfig, StubServer};

mod common;

fn control_url(stub: &StubServer) -> String {
    format!("{}{}", stub.url(), stub.config().control.path)
}

#[tokio::test]
async fn test_dynamic_route() {
    let stub = common::started_stub();
    let client = common::client();

    let res = client
        .post(control_url(&stub))
        .json(&json!({
            "method": "GET",
            "path": "/dynamic",
            "status": 201,
            "body": "created",
            "headers": { "Content-Type": "text/plain" }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);

    let res = client.get(format!("{}/dynamic", stub.url())).send().await.unwrap();
    assert_eq!(res.status(), 201);
    assert_eq!(res.headers()["content-type"], "text/plain");
    assert_eq!(res.text().await.unwrap(), "created");

    stub.shutdown().await;
}

#[tokio::test]
async fn test_templated_route_with_query_constraint() {
    let stub = common::started_stub();
    let client = common::client();

    let res = client
        .post(control_url(&stub))
        .json(&json!({
            "method": "GET",
            "path": "/users/:id/orders/:orderId",
            "query": { "status": "shipped" },
            "status": 200,
            "body": "matched"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);

    let base = format!("{}/users/42/orders/24", stub.url());

    let res = client.get(format!("{base}?status=shipped")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "matched");

    let res = client.get(format!("{base}?status=shipped&page=3")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let res = client.get(format!("{base}?status=pending")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    let res = client.post(format!("{base}?status=shipped")).send().await.unwrap();
    assert_eq!(res.status(), 405);

    stub.shutdown().await;
}

#[tokio::test]
async fn test_malformed_payloads_are_rejected() {
    let stub = common::started_stub();
    let client = common::client();

    let res = client
        .post(control_url(&stub))
        .body("{\"method\": ")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert!(res.text().await.unwrap().starts_with("invalid JSON"));

    let res = client
        .post(control_url(&stub))
        .json(&json!({ "path": "/no-method" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let res = client
        .post(control_url(&stub))
        .json(&json!({ "method": "GET", "path": "/x", "status": 42 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    assert_eq!(stub.registry().exact_route_count(), 0);
    assert_eq!(stub.registry().templated_route_count(), 0);

    let res = client.get(control_url(&stub)).send().await.unwrap();
    assert_eq!(res.status(), 405);

    stub.shutdown().await;
}

#[tokio::test]
async fn test_programmatic_route_spec() {
    let stub = common::started_stub();
    stub.add_route(RouteSpec {
        method: "delete".into(),
        path: "/items/:id".into(),
        status: Some(204),
        ..RouteSpec::default()
    })
    .unwrap();

    let client = common::client();
    let res = client.delete(format!("{}/items/9", stub.url())).send().await.unwrap();
    assert_eq!(res.status(), 204);

    let res = client.get(format!("{}/items/9", stub.url())).send().await.unwrap();
    assert_eq!(res.status(), 405);

    stub.shutdown().await;
}

#[tokio::test]
async fn test_config_file_routes() {
    common::init_tracing();
    let config = stub_server::config::parse_config(
        r#"
        [[routes]]
        method = "GET"
        path = "/health"
        body = "green"
        "#,
    )
    .unwrap();
    let stub = StubServer::new(config);
    stub.start().unwrap();

    let res = common::client().get(format!("{}/health", stub.url())).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "green");

    stub.shutdown().await;
}

#[tokio::test]
async fn test_control_plane_can_be_disabled() {
    common::init_tracing();
    let mut config = StubConfig::default();
    config.control.enabled = false;
    let stub = StubServer::new(config);
    stub.start().unwrap();

    let res = common::client()
        .post(control_url(&stub))
        .json(&json!({ "method": "GET", "path": "/x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    stub.shutdown().await;
}
