//! End-to-end resolution through the HTTP middleware.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rest_route::config::{AppConfig, RuleConfig};

mod common;

#[tokio::test]
async fn test_item_and_collection_actions() {
    let cases = [
        ("GET", "/users/123", "Users", "view"),
        ("HEAD", "/users/123", "Users", "view"),
        ("PUT", "/users/123", "Users", "update"),
        ("PATCH", "/users/123/", "Users", "update"),
        ("DELETE", "/users/123", "Users", "delete"),
        ("GET", "/users", "", "index"),
        ("POST", "/users", "", "create"),
        ("OPTIONS", "/users/123", "Users", "options"),
        ("PUT", "/users", "", "options"),
    ];

    for (method, uri, controller, action) in cases {
        let (status, body) = common::send(common::app(AppConfig::default()), common::request(method, uri)).await;
        assert_eq!(status, StatusCode::OK, "{method} {uri}");
        if method == "HEAD" {
            continue;
        }
        let body = body.expect("json body");
        assert_eq!(body["controller"], controller, "{method} {uri}");
        assert_eq!(body["method"], action, "{method} {uri}");
        assert_eq!(body["verb"], method, "{method} {uri}");
    }
}

#[tokio::test]
async fn test_nested_controller_and_identifier() {
    let (_, body) = common::send(
        common::app(AppConfig::default()),
        common::request("GET", "/shop/orders/77"),
    )
    .await;
    let body = body.unwrap();
    assert_eq!(body["controller"], "Shop\\Orders");
    assert_eq!(body["identifier"], "77");
    assert_eq!(body["source"], "pattern");
}

#[tokio::test]
async fn test_override_header() {
    let request = Request::builder()
        .method("POST")
        .uri("/users/9")
        .header("X-HTTP-Method-Override", "delete")
        .body(Body::empty())
        .unwrap();
    let (_, body) = common::send(common::app(AppConfig::default()), request).await;
    let body = body.unwrap();
    assert_eq!(body["method"], "delete");
    assert_eq!(body["verb"], "DELETE");
}

#[tokio::test]
async fn test_form_field_beats_header() {
    let request = Request::builder()
        .method("POST")
        .uri("/users/9")
        .header("content-type", "application/x-www-form-urlencoded")
        .header("X-HTTP-Method-Override", "DELETE")
        .body(Body::from("name=x&_method=put"))
        .unwrap();
    let (_, body) = common::send(common::app(AppConfig::default()), request).await;
    assert_eq!(body.unwrap()["method"], "update");
}

#[tokio::test]
async fn test_form_field_ignored_for_non_form_bodies() {
    let request = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"_method":"put"}"#))
        .unwrap();
    let (_, body) = common::send(common::app(AppConfig::default()), request).await;
    assert_eq!(body.unwrap()["method"], "create");
}

#[tokio::test]
async fn test_oversized_form_is_rejected() {
    let mut config = AppConfig::default();
    config.server.max_form_bytes = 8;
    let request = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("_method=patch&padding=aaaaaaaaaaaa"))
        .unwrap();
    let (status, _) = common::send(common::app(config), request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_broken_form_body_is_bad_request() {
    let chunks: Vec<Result<&'static str, std::io::Error>> = vec![
        Ok("_method=pa"),
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "client went away")),
    ];
    let request = Request::builder()
        .method("POST")
        .uri("/users/1")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from_stream(futures_util::stream::iter(chunks)))
        .unwrap();
    let (status, _) = common::send(common::app(AppConfig::default()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_verb_resolves_to_options() {
    let (status, body) = common::send(
        common::app(AppConfig::default()),
        common::request("PURGE", "/cache/items"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(body["method"], "options");
    assert_eq!(body["verb"], "PURGE");
}

#[tokio::test]
async fn test_cached_path_ignores_verb() {
    let mut config = AppConfig::default();
    config
        .route
        .cache
        .insert("/login".into(), ("Auth".into(), "login".into()));

    for method in ["GET", "POST", "DELETE"] {
        let (_, body) = common::send(common::app(config.clone()), common::request(method, "/login/")).await;
        let body = body.unwrap();
        assert_eq!(body["controller"], "Auth");
        assert_eq!(body["method"], "login");
        assert_eq!(body["source"], "cache");
    }
}

#[tokio::test]
async fn test_path_strategy_outside_rest_prefixes() {
    let mut config = AppConfig::default();
    config.route.rest.prefixes = vec!["/api".into()];

    let (_, body) = common::send(common::app(config.clone()), common::request("GET", "/api/users/1")).await;
    assert_eq!(body.unwrap()["method"], "view");

    let (_, body) = common::send(common::app(config.clone()), common::request("GET", "/site/about")).await;
    let body = body.unwrap();
    assert_eq!(body["controller"], "Site");
    assert_eq!(body["method"], "About");
    assert_eq!(body["source"], "path");

    // The path strategy has nothing to route at the root.
    let (status, body) = common::send(common::app(config), common::request("GET", "/")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.is_none());
}

#[tokio::test]
async fn test_configured_rules_when_enabled() {
    let mut config = AppConfig::default();
    config.route.rest.apply_rules = true;
    config.route.rest.rules.push(RuleConfig {
        pattern: "POST {id}".into(),
        action: "update".into(),
    });

    let (_, body) = common::send(common::app(config), common::request("POST", "/users/3")).await;
    assert_eq!(body.unwrap()["method"], "update");
}

#[tokio::test]
async fn test_custom_override_names() {
    let mut config = AppConfig::default();
    config.route.rest.method_param = "verb".into();
    config.route.rest.override_header = "X-Verb".into();

    let request = Request::builder()
        .method("GET")
        .uri("/users/3")
        .header("x-verb", "patch")
        .body(Body::empty())
        .unwrap();
    let (_, body) = common::send(common::app(config.clone()), request).await;
    assert_eq!(body.unwrap()["method"], "update");

    let request = Request::builder()
        .method("POST")
        .uri("/users/3")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("verb=delete"))
        .unwrap();
    let (_, body) = common::send(common::app(config), request).await;
    assert_eq!(body.unwrap()["method"], "delete");
}
