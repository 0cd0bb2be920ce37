//! # Session Routes
//!
//! The workflow surface the rendering collaborator drives: session
//! creation, grid editing and the four state-machine transitions. Every
//! handler returns the full session view so the front end re-renders from
//! one response.
//!
//! Cycle failures (incorrect solution, rejected proof) are NOT HTTP
//! errors — they come back as outcomes inside the view, mirroring the
//! notifications the demonstration shows. HTTP errors are reserved for
//! guard violations: unknown session, wrong phase, locked cell.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use zksq_workflow::{CycleKind, OperationOutcome, SessionSnapshot};

use crate::error::AppError;
use crate::state::AppState;

/// Request body for a cell edit. An empty value clears the cell.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EditCellRequest {
    /// The digit string to store; empty to clear.
    pub value: String,
}

/// Request body for the solution-reveal toggle.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RevealRequest {
    /// Whether to render solutions instead of entered values.
    pub revealed: bool,
}

/// One cell as the front end renders it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CellView {
    /// The displayed value: the entered digits, or the solution while
    /// revealed, or the empty string.
    pub value: String,
    /// Given cells render read-only.
    pub locked: bool,
}

/// The grid as the front end renders it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GridView {
    /// Order N of the N×N grid.
    pub order: usize,
    /// Whether solutions are being rendered.
    pub solution_revealed: bool,
    /// Rows in order, each row's cells in order.
    pub rows: Vec<Vec<CellView>>,
}

/// One cycle outcome with its notification text.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OutcomeView {
    /// `pending`, `success` or `failure`.
    pub status: String,
    /// Machine-readable failure cause, for failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    /// The short notification text.
    pub message: String,
    /// The backend's own error text, for diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl OutcomeView {
    fn from_outcome(outcome: &OperationOutcome, kind: CycleKind) -> Self {
        let (status, cause, detail) = match outcome {
            OperationOutcome::Pending => ("pending", None, None),
            OperationOutcome::Success => ("success", None, None),
            OperationOutcome::Failure { cause, detail } => (
                "failure",
                Some(cause.as_str().to_string()),
                Some(detail.clone()),
            ),
        };
        Self {
            status: status.to_string(),
            cause,
            message: outcome.message(kind).to_string(),
            detail,
        }
    }
}

/// The full session view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionView {
    /// Session identifier.
    pub session_id: Uuid,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// `PROVING` or `VERIFYING`.
    pub phase: String,
    /// Whether a cycle is in flight.
    pub pending: bool,
    /// The puzzle's target sum.
    pub target_sum: u64,
    /// The grid as rendered.
    pub grid: GridView,
    /// Outcome of the last prove cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prove_outcome: Option<OutcomeView>,
    /// Outcome of the last verify cycle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_outcome: Option<OutcomeView>,
    /// The stored proof rendered as JSON.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof: Option<serde_json::Value>,
}

impl SessionView {
    fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        let order = snapshot.grid.order();
        let rows = (0..order)
            .map(|r| {
                (0..order)
                    .map(|c| CellView {
                        value: snapshot
                            .grid
                            .display_value(r, c)
                            .unwrap_or_default()
                            .to_string(),
                        locked: snapshot
                            .grid
                            .cell(r, c)
                            .map(|cell| cell.is_locked())
                            .unwrap_or_default(),
                    })
                    .collect()
            })
            .collect();
        Self {
            session_id: snapshot.id,
            created_at: snapshot.created_at,
            phase: snapshot.phase.as_str().to_string(),
            pending: snapshot.pending,
            target_sum: snapshot.target_sum,
            grid: GridView {
                order,
                solution_revealed: snapshot.grid.solution_revealed(),
                rows,
            },
            prove_outcome: snapshot
                .prove_outcome
                .as_ref()
                .map(|o| OutcomeView::from_outcome(o, CycleKind::Prove)),
            verify_outcome: snapshot
                .verify_outcome
                .as_ref()
                .map(|o| OutcomeView::from_outcome(o, CycleKind::Verify)),
            proof: snapshot.proof,
        }
    }
}

/// Build the session router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions", post(create_session))
        .route("/v1/sessions/:session_id", get(get_session))
        .route("/v1/sessions/:session_id/cells/:row/:col", put(edit_cell))
        .route("/v1/sessions/:session_id/prove", post(prove))
        .route("/v1/sessions/:session_id/advance", post(advance))
        .route("/v1/sessions/:session_id/verify", post(verify))
        .route("/v1/sessions/:session_id/reset", post(reset))
        .route("/v1/sessions/:session_id/solution", post(load_solution))
        .route("/v1/sessions/:session_id/reveal", post(set_reveal))
}

fn lookup(state: &AppState, id: Uuid) -> Result<std::sync::Arc<zksq_workflow::DemoSession>, AppError> {
    state.session(id).ok_or_else(|| AppError::session_not_found(id))
}

/// POST /v1/sessions — Start a new demonstration session.
#[utoipa::path(
    post,
    path = "/v1/sessions",
    responses(
        (status = 201, description = "Session created in the PROVING phase", body = SessionView),
    ),
    tag = "sessions"
)]
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let session = state.create_session();
    (
        StatusCode::CREATED,
        Json(SessionView::from_snapshot(session.snapshot())),
    )
}

/// GET /v1/sessions/{session_id} — The current session view.
#[utoipa::path(
    get,
    path = "/v1/sessions/{session_id}",
    params(("session_id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Current session view", body = SessionView),
        (status = 404, description = "Unknown session", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = lookup(&state, session_id)?;
    Ok(Json(SessionView::from_snapshot(session.snapshot())))
}

/// PUT /v1/sessions/{session_id}/cells/{row}/{col} — Edit one cell.
#[utoipa::path(
    put,
    path = "/v1/sessions/{session_id}/cells/{row}/{col}",
    params(
        ("session_id" = Uuid, Path, description = "Session identifier"),
        ("row" = usize, Path, description = "Row index"),
        ("col" = usize, Path, description = "Column index"),
    ),
    request_body = EditCellRequest,
    responses(
        (status = 200, description = "Cell updated", body = SessionView),
        (status = 404, description = "Unknown session or cell", body = crate::error::ErrorBody),
        (status = 409, description = "Cell is a given or the session is not PROVING", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn edit_cell(
    State(state): State<AppState>,
    Path((session_id, row, col)): Path<(Uuid, usize, usize)>,
    Json(request): Json<EditCellRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = lookup(&state, session_id)?;
    session.edit_cell(row, col, request.value.trim())?;
    Ok(Json(SessionView::from_snapshot(session.snapshot())))
}

/// POST /v1/sessions/{session_id}/prove — Run the prove cycle.
///
/// Returns 200 with the outcome in the view whether the cycle succeeded
/// or failed; a cycle already in flight leaves the view pending.
#[utoipa::path(
    post,
    path = "/v1/sessions/{session_id}/prove",
    params(("session_id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Prove cycle completed or already pending", body = SessionView),
        (status = 404, description = "Unknown session", body = crate::error::ErrorBody),
        (status = 409, description = "Session is not in the PROVING phase", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn prove(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = lookup(&state, session_id)?;
    session.submit().await?;
    Ok(Json(SessionView::from_snapshot(session.snapshot())))
}

/// POST /v1/sessions/{session_id}/advance — Hand over to the Verifier.
#[utoipa::path(
    post,
    path = "/v1/sessions/{session_id}/advance",
    params(("session_id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Session advanced to VERIFYING", body = SessionView),
        (status = 404, description = "Unknown session", body = crate::error::ErrorBody),
        (status = 409, description = "No successful proof to advance with", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn advance(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = lookup(&state, session_id)?;
    session.advance()?;
    Ok(Json(SessionView::from_snapshot(session.snapshot())))
}

/// POST /v1/sessions/{session_id}/verify — Run the verify cycle.
#[utoipa::path(
    post,
    path = "/v1/sessions/{session_id}/verify",
    params(("session_id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Verify cycle completed or already pending", body = SessionView),
        (status = 404, description = "Unknown session", body = crate::error::ErrorBody),
        (status = 409, description = "Session is not in the VERIFYING phase", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn verify(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = lookup(&state, session_id)?;
    session.verify().await?;
    Ok(Json(SessionView::from_snapshot(session.snapshot())))
}

/// POST /v1/sessions/{session_id}/reset — Restart the demonstration.
#[utoipa::path(
    post,
    path = "/v1/sessions/{session_id}/reset",
    params(("session_id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Session reset to the initial PROVING state", body = SessionView),
        (status = 404, description = "Unknown session", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn reset(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = lookup(&state, session_id)?;
    session.reset();
    Ok(Json(SessionView::from_snapshot(session.snapshot())))
}

/// POST /v1/sessions/{session_id}/solution — Fill the solution in.
#[utoipa::path(
    post,
    path = "/v1/sessions/{session_id}/solution",
    params(("session_id" = Uuid, Path, description = "Session identifier")),
    responses(
        (status = 200, description = "Solution loaded into the grid", body = SessionView),
        (status = 404, description = "Unknown session", body = crate::error::ErrorBody),
        (status = 409, description = "Session is not in the PROVING phase", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn load_solution(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = lookup(&state, session_id)?;
    session.load_solution()?;
    Ok(Json(SessionView::from_snapshot(session.snapshot())))
}

/// POST /v1/sessions/{session_id}/reveal — Toggle solution display.
#[utoipa::path(
    post,
    path = "/v1/sessions/{session_id}/reveal",
    params(("session_id" = Uuid, Path, description = "Session identifier")),
    request_body = RevealRequest,
    responses(
        (status = 200, description = "Reveal toggle applied", body = SessionView),
        (status = 404, description = "Unknown session", body = crate::error::ErrorBody),
    ),
    tag = "sessions"
)]
pub async fn set_reveal(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<RevealRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = lookup(&state, session_id)?;
    session.set_solution_revealed(request.revealed);
    Ok(Json(SessionView::from_snapshot(session.snapshot())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app() -> Router {
        router().with_state(AppState::new())
    }

    async fn body_view(resp: axum::response::Response) -> SessionView {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router) -> SessionView {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/v1/sessions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        body_view(resp).await
    }

    async fn post(app: &Router, uri: String) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_session_returns_initial_view() {
        let app = test_app();
        let view = create(&app).await;
        assert_eq!(view.phase, "PROVING");
        assert!(!view.pending);
        assert_eq!(view.target_sum, 111);
        assert_eq!(view.grid.order, 3);
        assert_eq!(view.grid.rows[0][2].value, "7");
        assert!(view.grid.rows[0][2].locked);
        assert_eq!(view.grid.rows[0][0].value, "");
        assert!(view.prove_outcome.is_none());
        assert!(view.proof.is_none());
    }

    #[tokio::test]
    async fn unknown_session_is_404() {
        let app = test_app();
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/sessions/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn edit_cell_updates_the_view() {
        let app = test_app();
        let view = create(&app).await;
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/v1/sessions/{}/cells/0/0", view.session_id))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"value": "31"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let view = body_view(resp).await;
        assert_eq!(view.grid.rows[0][0].value, "31");
    }

    #[tokio::test]
    async fn editing_a_given_is_409() {
        let app = test_app();
        let view = create(&app).await;
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/v1/sessions/{}/cells/1/1", view.session_id))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"value": "99"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn editing_out_of_bounds_is_404() {
        let app = test_app();
        let view = create(&app).await;
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/v1/sessions/{}/cells/7/0", view.session_id))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"value": "1"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn verify_before_advance_is_409() {
        let app = test_app();
        let view = create(&app).await;
        let resp = post(&app, format!("/v1/sessions/{}/verify", view.session_id)).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn reveal_toggle_changes_rendered_values_only() {
        let app = test_app();
        let view = create(&app).await;
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/v1/sessions/{}/reveal", view.session_id))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"revealed": true}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        let view = body_view(resp).await;
        assert!(view.grid.solution_revealed);
        assert_eq!(view.grid.rows[0][0].value, "31");
        assert_eq!(view.grid.rows[2][2].value, "43");
    }
}
