use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::public::{CommentsResponse, PollResponse},
    services::public_service,
    state::SharedState,
};

/// Public read-only endpoints that expose the current poll.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/api/poll", get(get_poll))
        .route("/api/comments", get(get_comments))
}

#[utoipa::path(
    get,
    path = "/api/poll",
    tag = "poll",
    responses((status = 200, description = "Current poll tally", body = PollResponse))
)]
/// Return the current tally, voter count and next scheduled reset.
pub async fn get_poll(State(state): State<SharedState>) -> Json<PollResponse> {
    Json(public_service::get_poll(&state).await)
}

#[utoipa::path(
    get,
    path = "/api/comments",
    tag = "poll",
    responses((status = 200, description = "Comments posted this week", body = CommentsResponse))
)]
/// Return the comment board for the current poll period.
pub async fn get_comments(State(state): State<SharedState>) -> Json<CommentsResponse> {
    Json(public_service::get_comments(&state).await)
}
