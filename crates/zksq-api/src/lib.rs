//! # zksq-api — Axum API for the Demonstration
//!
//! The HTTP surface the rendering collaborator (the demonstration page)
//! drives. The API owns nothing but transport concerns: sessions, grids
//! and the workflow state machine live in `zksq-workflow`.
//!
//! ## API Surface
//!
//! | Route                                       | Operation                |
//! |---------------------------------------------|--------------------------|
//! | `POST /v1/sessions`                         | Start a session          |
//! | `GET /v1/sessions/{id}`                     | Current session view     |
//! | `PUT /v1/sessions/{id}/cells/{row}/{col}`   | Edit one cell            |
//! | `POST /v1/sessions/{id}/prove`              | Run the prove cycle      |
//! | `POST /v1/sessions/{id}/advance`            | Hand over to the Verifier|
//! | `POST /v1/sessions/{id}/verify`             | Run the verify cycle     |
//! | `POST /v1/sessions/{id}/reset`              | Restart the walkthrough  |
//! | `POST /v1/sessions/{id}/solution`           | Fill the solution in     |
//! | `POST /v1/sessions/{id}/reveal`             | Toggle solution display  |
//!
//! Health probes (`/health/*`) and `/openapi.json` are mounted alongside.
//! Everything is unauthenticated — the API backs a single-user
//! demonstration.

#![forbid(unsafe_code)]

pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use crate::state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::sessions::router())
        .merge(openapi::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .with_state(state);

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the artifacts are usable and the session
/// store is accessible.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    // The mock verification key must carry its scheme tag; a malformed
    // artifact set would fail every verify cycle.
    if state.primary_verification_key().get("scheme").is_none() {
        return (StatusCode::SERVICE_UNAVAILABLE, "verification key degraded").into_response();
    }

    let _ = state.session_count();

    (StatusCode::OK, "ready").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn liveness_is_ok() {
        let app = app(AppState::new());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/health/liveness")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_is_ok_with_generated_artifacts() {
        let app = app(AppState::new());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/health/readiness")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn openapi_spec_is_served() {
        let app = app(AppState::new());
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
