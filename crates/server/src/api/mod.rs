use crate::config::AppState;
use anyhow::Result;
use axum::{
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

mod handlers;

/// Start the API server
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Create the API router
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/mcp", post(handlers::mcp))
        .route("/api/health", get(health_check))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "devroast",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Secrets, ServerConfig};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use devroast_core::auth::AuthConfig;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const TOKEN: &str = "secret-token";

    fn create_test_router() -> Router {
        let secrets = Secrets {
            auth: AuthConfig {
                token: TOKEN.to_string(),
                validation_id: "919876543210".to_string(),
            },
            github_token: None,
            roast_api_key: None,
        };
        let mut config = ServerConfig::default();
        // Nothing listens here; tests never reach upstream
        config.github.api_url = "http://127.0.0.1:1".to_string();
        config.leetcode.graphql_url = "http://127.0.0.1:1/graphql".to_string();

        create_router(AppState::new(&config, secrets).unwrap())
    }

    fn mcp_request(body: &str, bearer: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/mcp")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_test_router();
        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "devroast");
    }

    #[tokio::test]
    async fn test_tools_list_without_token() {
        let app = create_test_router();
        let body = json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}).to_string();
        let response = app.oneshot(mcp_request(&body, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let names: Vec<&str> = body["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec!["get_github_profile_data", "get_leetcode_profile_data", "validate"]
        );
    }

    #[tokio::test]
    async fn test_validate_with_bearer() {
        let app = create_test_router();
        let body = json!({
            "jsonrpc": "2.0",
            "id": "abc",
            "method": "tools/call",
            "params": {"name": "validate", "arguments": {}}
        })
        .to_string();
        let response = app.oneshot(mcp_request(&body, Some(TOKEN))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], "abc");
        assert_eq!(body["result"]["content"][0]["text"], "919876543210");
    }

    #[tokio::test]
    async fn test_tool_call_with_wrong_token() {
        let app = create_test_router();
        let body = json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": {"name": "get_github_profile_data", "arguments": {"username": "octocat"}}
        })
        .to_string();
        let response = app.oneshot(mcp_request(&body, Some("wrong"))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["error"]["data"]["kind"], "Unauthorized");
        assert!(body.get("result").is_none());
    }

    #[tokio::test]
    async fn test_unparseable_body() {
        let app = create_test_router();
        let response = app.oneshot(mcp_request("{not json", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], -32700);
        assert_eq!(body["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_notification_accepted() {
        let app = create_test_router();
        let body = json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string();
        let response = app.oneshot(mcp_request(&body, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
}
