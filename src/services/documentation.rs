use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the weekly poll backend.
#[openapi(
    paths(
        crate::routes::health::status,
        crate::routes::health::healthcheck,
        crate::routes::public::get_poll,
        crate::routes::public::get_comments,
        crate::routes::websocket::ws_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::public::StatusResponse,
            crate::dto::public::PollResponse,
            crate::dto::public::CommentsResponse,
            crate::dto::poll::PollOptionDto,
            crate::dto::poll::CommentDto,
            crate::dto::ws::VoteRequest,
            crate::dto::ws::AddCommentRequest,
            crate::dto::ws::ResetPollRequest,
            crate::dto::ws::PollStatePayload,
            crate::dto::ws::PollUpdatePayload,
            crate::dto::ws::PollResetPayload,
            crate::dto::ws::MessagePayload,
        )
    ),
    tags(
        (name = "health", description = "Health and status endpoints"),
        (name = "poll", description = "Read-only poll snapshots"),
        (name = "clients", description = "WebSocket channel for live poll clients"),
    )
)]
pub struct ApiDoc;
