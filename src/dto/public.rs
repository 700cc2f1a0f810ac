use std::time::SystemTime;

use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::{
    format_system_time,
    poll::{CommentDto, PollOptionDto},
};

/// Root status payload with process health and aggregate counters.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
    /// RFC 3339 timestamp of when the status was produced.
    pub timestamp: String,
    pub connected_clients: usize,
    pub voter_count: usize,
    pub total_votes: u64,
    pub comment_count: usize,
}

impl StatusResponse {
    /// Build an "ok" status stamped with `now`.
    pub fn ok(
        now: SystemTime,
        connected_clients: usize,
        voter_count: usize,
        total_votes: u64,
        comment_count: usize,
    ) -> Self {
        Self {
            status: "ok".into(),
            message: "Weekly poll WebSocket server".into(),
            timestamp: format_system_time(now),
            connected_clients,
            voter_count,
            total_votes,
            comment_count,
        }
    }
}

/// Current poll tally exposed over HTTP.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PollResponse {
    pub poll_data: Vec<PollOptionDto>,
    pub voter_count: usize,
    /// Next scheduled reset, milliseconds since the Unix epoch.
    pub reset_time: i64,
}

/// Current comment board exposed over HTTP.
#[derive(Debug, Serialize, ToSchema)]
pub struct CommentsResponse {
    pub comments: Vec<CommentDto>,
}
