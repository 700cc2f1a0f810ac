use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::dto::poll::{CommentDto, PollOptionDto};

/// Why an inbound frame could not be turned into a [`ClientMessage`].
#[derive(Debug, Error)]
pub enum InboundMessageError {
    #[error("malformed message: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid message: {0}")]
    Invalid(#[from] ValidationErrors),
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq)]
/// Requests accepted from poll WebSocket clients, framed as `{"event": ..., "data": ...}`.
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    Vote(VoteRequest),
    AddComment(AddCommentRequest),
    ResetPoll(ResetPollRequest),
}

impl ClientMessage {
    /// Parse a text frame and validate its payload.
    pub fn from_json_str(text: &str) -> Result<Self, InboundMessageError> {
        let message: Self = serde_json::from_str(text)?;
        message.validate()?;
        Ok(message)
    }
}

impl Validate for ClientMessage {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            Self::Vote(request) => request.validate(),
            Self::AddComment(_) => Ok(()),
            Self::ResetPoll(request) => request.validate(),
        }
    }
}

/// Cast a vote for one option.
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    #[validate(custom(function = "crate::dto::validation::validate_option_id"))]
    pub option_id: String,
}

/// Post a comment. Length and blankness are checked by the poll store so the
/// sender gets a proper error back.
#[derive(Debug, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
pub struct AddCommentRequest {
    pub text: String,
}

/// Ask for a manual reset. A missing password never matches.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate, PartialEq, Eq)]
pub struct ResetPollRequest {
    #[serde(default)]
    #[validate(length(max = 256))]
    pub password: Option<String>,
}

/// Messages pushed from the server, framed as `{"event": ..., "data": ...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Snapshot sent once to a newly connected client.
    PollState(PollStatePayload),
    /// Full comment list sent once to a newly connected client.
    Comments(Vec<CommentDto>),
    /// Broadcast after an accepted vote.
    PollUpdate(PollUpdatePayload),
    /// Broadcast after a manual or scheduled reset.
    PollReset(PollResetPayload),
    /// Broadcast after an accepted comment.
    CommentAdded(CommentDto),
    /// Rejection reported to the sender only.
    Error(MessagePayload),
    /// Acknowledgement of a manual reset, sent to the requester only.
    ResetSuccess(MessagePayload),
    /// Denied manual reset, sent to the requester only.
    ResetError(MessagePayload),
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Current poll as seen by one connection.
pub struct PollStatePayload {
    pub poll_data: Vec<PollOptionDto>,
    pub has_voted: bool,
    /// Next scheduled reset, milliseconds since the Unix epoch.
    pub reset_time: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Tally broadcast after a vote.
pub struct PollUpdatePayload {
    pub poll_data: Vec<PollOptionDto>,
    pub voter_count: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Fresh poll broadcast after a reset.
pub struct PollResetPayload {
    pub poll_data: Vec<PollOptionDto>,
    pub reset_time: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
/// Free-form human-readable message.
pub struct MessagePayload {
    pub message: String,
}

impl MessagePayload {
    /// Wrap `message` into a payload.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
