//! End-to-end tests of the demo application over HTTP.

use axum::body::Body;
use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use copilot::config::{parse_config, AppConfig};
use copilot::demo::demo_router;
use copilot::HttpServer;

mod common;
use common::{call, start_server};

#[tokio::test]
async fn test_demo_over_tcp() {
    let config = AppConfig::default();
    let (addr, shutdown) = start_server(config.clone(), demo_router(&config).unwrap()).await;
    let base = format!("http://{addr}");
    let client = reqwest::Client::new();

    let res = client.get(format!("{base}/hello")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "Hi there!");

    let res = client
        .get(format!("{base}/api/retrieve?id=test"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let json: serde_json::Value = res.json().await.unwrap();
    assert_eq!(json, serde_json::json!({"id": "test", "result": "success"}));

    let res = client
        .post(format!("{base}/api/retrieve"))
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 405);
    assert_eq!(res.text().await.unwrap(), "Must use GET method");

    shutdown.trigger();
}

#[tokio::test]
async fn test_demo_routes() {
    let router = demo_router(&AppConfig::default()).unwrap();

    let cases = [
        (Method::GET, "/hello.json", StatusCode::OK, "Hi there!"),
        (Method::GET, "/Hello/there", StatusCode::OK, "Hi there!"),
        (Method::GET, "/multi/handler", StatusCode::OK, "Success"),
        (
            Method::GET,
            "/api/retrieve",
            StatusCode::BAD_REQUEST,
            "You must call this URL with the query string ?id=test",
        ),
        (
            Method::GET,
            "/api/retrieve?id=other",
            StatusCode::BAD_REQUEST,
            "You must call this URL with the query string ?id=test",
        ),
        (
            Method::DELETE,
            "/api/retrieve",
            StatusCode::METHOD_NOT_ALLOWED,
            "Must use GET method",
        ),
        (
            Method::GET,
            "/cause/an/error",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error: This is an error message.",
        ),
        (
            Method::GET,
            "/error/multi/handler",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error: Skip to the error handler.",
        ),
        (
            Method::POST,
            "/anything",
            StatusCode::METHOD_NOT_ALLOWED,
            "Error: Method Not Allowed",
        ),
        (Method::GET, "/helloworld", StatusCode::NOT_FOUND, "Custom Not Found"),
        (Method::PUT, "/nowhere", StatusCode::NOT_FOUND, "Custom Not Found"),
    ];

    for (method, url, status, body) in cases {
        let (got_status, got_body) = call(&router, method.clone(), url).await;
        assert_eq!(got_status, status, "{method} {url}");
        assert_eq!(got_body, body, "{method} {url}");
    }
}

#[tokio::test]
async fn test_static_routes_answer_before_demo() {
    let config = parse_config(
        r#"
        [[routes]]
        path = "/hello"
        method = "get"
        status = 203
        body = "static hello"
        content_type = "text/plain"
        "#,
    )
    .unwrap();
    let server = HttpServer::new(config.clone(), demo_router(&config).unwrap());

    let response = server
        .app()
        .oneshot(
            axum::http::Request::builder()
                .uri("/hello")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NON_AUTHORITATIVE_INFORMATION);
    assert_eq!(response.headers()["content-type"], "text/plain");
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"static hello");

    // Method filter on the static route leaves POST to the demo layers.
    let response = server
        .app()
        .oneshot(
            axum::http::Request::builder()
                .method("POST")
                .uri("/hello")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
