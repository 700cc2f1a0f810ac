use serde::Serialize;
use utoipa::ToSchema;

use crate::state::poll::{Comment, PollOption};

/// Poll option as shown to clients, including its running tally.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PollOptionDto {
    pub id: String,
    pub name: String,
    pub votes: u32,
    pub color: String,
}

impl From<&PollOption> for PollOptionDto {
    fn from(option: &PollOption) -> Self {
        Self {
            id: option.id.clone(),
            name: option.name.clone(),
            votes: option.votes,
            color: option.color.clone(),
        }
    }
}

/// Comment board entry; `timestamp` is in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub text: String,
    pub timestamp: i64,
}

impl From<&Comment> for CommentDto {
    fn from(comment: &Comment) -> Self {
        Self {
            text: comment.text.clone(),
            timestamp: comment.timestamp,
        }
    }
}

/// Convert a slice of store options into their wire representation.
pub fn poll_data(options: &[PollOption]) -> Vec<PollOptionDto> {
    options.iter().map(PollOptionDto::from).collect()
}

/// Convert a slice of store comments into their wire representation.
pub fn comment_list(comments: &[Comment]) -> Vec<CommentDto> {
    comments.iter().map(CommentDto::from).collect()
}
