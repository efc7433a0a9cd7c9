//! JSON API over the analytics queries.
//!
//! The server only parses identifiers and maps errors onto status codes; all
//! computation happens in [`crate::analytics`].

pub mod error;
pub mod handlers;

use anyhow::{Context, Result};
use axum::{Router, http::HeaderValue, routing::get};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::dataset::Dataset;

pub use handlers::AppState;

/// Create the HTTP router with all routes configured
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/students/{student_id}/exists", get(handlers::student_exists))
        .route(
            "/api/students/{student_id}/assessments",
            get(handlers::student_assessments),
        )
        .route("/api/students/{student_id}/summary", get(handlers::student_summary))
        .route("/api/students/{student_id}/modules", get(handlers::student_modules))
        .route("/api/students/{student_id}/rank", get(handlers::student_rank))
        .route(
            "/api/assessments/{assessment_id}/analytics",
            get(handlers::assessment_analytics),
        )
        .with_state(state)
}

/// CORS for the configured frontend origin, with credentials.
pub fn cors_layer(frontend_origin: &str) -> Result<CorsLayer> {
    let origin: HeaderValue = frontend_origin
        .parse()
        .with_context(|| format!("Invalid frontend origin '{frontend_origin}'"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Serves the API until Ctrl-C.
#[tracing::instrument(skip_all, fields(addr = %config.addr()))]
pub async fn serve(config: &ServerConfig, dataset: Dataset) -> Result<()> {
    let state = Arc::new(AppState { dataset });
    let app = create_router(state).layer(cors_layer(&config.frontend_origin)?);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!(%addr, origin = %config.frontend_origin, "Serving student analytics API");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(tokio::signal::ctrl_c()))
        .await
        .context("Server error")?;

    Ok(())
}

/// Resolves once `signal` fires. A signal that cannot be installed is logged
/// and the future never resolves, so the server runs until it is killed.
async fn shutdown_signal(signal: impl Future<Output = std::io::Result<()>>) {
    if let Err(e) = signal.await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::{assessment, registration, student};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let dataset = Dataset::new(
            vec![
                assessment(1, 100, Some(50.0)),
                assessment(1, 101, Some(60.0)),
                assessment(2, 100, Some(90.0)),
            ],
            vec![registration(1, "AAA", false), registration(2, "AAA", true)],
            vec![student(1, "AAA"), student(2, "AAA")],
        );
        create_router(Arc::new(AppState { dataset }))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(test_router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_exists_tolerates_malformed_id() {
        let (status, body) = get_json(test_router(), "/api/students/abc/exists").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exists"], false);

        let (_, body) = get_json(test_router(), "/api/students/1/exists").await;
        assert_eq!(body["exists"], true);
    }

    #[tokio::test]
    async fn test_summary_wire_format() {
        let (status, body) = get_json(test_router(), "/api/students/1/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["studentId"], "1");
        assert_eq!(body["average"], 55.0);
        assert_eq!(body["status"], "bronze");
        assert_eq!(body["predicted_next"]["id_assessment"], 102);
        assert_eq!(body["predicted_next"]["score"], 70.0);
    }

    #[tokio::test]
    async fn test_summary_rejects_malformed_id() {
        let (status, body) = get_json(test_router(), "/api/students/12x/summary").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "student_id must be an integer");
    }

    #[tokio::test]
    async fn test_modules() {
        let (status, body) = get_json(test_router(), "/api/students/2/modules").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_assessment_analytics() {
        let (status, body) =
            get_json(test_router(), "/api/assessments/100/analytics?student_id=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["student_score"], 90.0);
        assert_eq!(body["percentile"], 75.0);
        assert_eq!(body["status"], "diamond");
        assert_eq!(body["position_in_status"], 1);
        assert_eq!(body["group_size_in_status"], 1);
        assert_eq!(body["bins"].as_array().unwrap().len(), 11);
    }

    #[tokio::test]
    async fn test_assessment_analytics_errors() {
        let (status, _) = get_json(test_router(), "/api/assessments/100/analytics").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) =
            get_json(test_router(), "/api/assessments/555/analytics?student_id=1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rank() {
        let (status, body) = get_json(test_router(), "/api/students/1/rank").await;
        assert_eq!(status, StatusCode::OK);
        // Peers through AAA: 2 (avg 90) then 1 (avg 55).
        assert_eq!(body["position"], 2);
        assert_eq!(body["total"], 2);
        assert_eq!(body["percentile"], 25.0);
        assert_eq!(body["student_average"], 55.0);
        assert_eq!(body["modules"], serde_json::json!(["AAA"]));
    }

    #[tokio::test]
    async fn test_student_assessments() {
        let (status, body) = get_json(test_router(), "/api/students/1/assessments").await;
        assert_eq!(status, StatusCode::OK);
        let rows = body["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id_assessment"], 100);
        assert_eq!(rows[0]["score"], 50.0);
        assert!(rows[0]["task"].is_null());
        assert_eq!(rows[1]["id_assessment"], 101);

        let (status, body) = get_json(test_router(), "/api/students/404/assessments").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["rows"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rank_not_found() {
        let (status, body) = get_json(test_router(), "/api/students/77/rank").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "No scored assessments for student 77");
    }

    #[tokio::test]
    async fn test_shutdown_signal() {
        let fired = tokio::time::timeout(
            Duration::from_millis(50),
            shutdown_signal(async { Ok(()) }),
        )
        .await;
        assert!(fired.is_ok());

        let failed = tokio::time::timeout(
            Duration::from_millis(50),
            shutdown_signal(async { Err(std::io::Error::other("no signal handler")) }),
        )
        .await;
        assert!(failed.is_err(), "a failed signal install must not stop the server");
    }

    #[tokio::test]
    async fn test_cors_allows_frontend_origin() {
        let router = test_router().layer(cors_layer("http://localhost:5173").unwrap());
        let response = router
            .oneshot(
                Request::get("/health")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }
}
