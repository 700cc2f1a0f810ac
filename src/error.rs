use thiserror::Error;

use crate::state::poll::{CommentRejection, MAX_COMMENT_CHARS, VoteRejection};

/// Rejections of a client request, reported only to the connection that sent it.
///
/// None of these are fatal and none of them mutate state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    /// The connection already has a vote counted in this poll period.
    #[error("already voted")]
    AlreadyVoted,
    /// The requested option id is not part of the poll.
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    /// The comment is blank once trimmed.
    #[error("empty comment")]
    EmptyComment,
    /// The comment exceeds the length limit.
    #[error("comment too long ({0} characters)")]
    CommentTooLong(usize),
    /// The manual reset password did not match.
    #[error("bad reset password")]
    BadPassword,
}

impl RequestError {
    /// Human-readable message sent back to the client.
    pub fn client_message(&self) -> String {
        match self {
            RequestError::AlreadyVoted => "You have already voted!".into(),
            RequestError::UnknownOption(id) => format!("Unknown poll option `{id}`"),
            RequestError::EmptyComment => "Comment cannot be empty".into(),
            RequestError::CommentTooLong(_) => {
                format!("Comment must be {MAX_COMMENT_CHARS} characters or fewer")
            }
            RequestError::BadPassword => "Invalid password".into(),
        }
    }
}

impl From<VoteRejection> for RequestError {
    fn from(err: VoteRejection) -> Self {
        match err {
            VoteRejection::AlreadyVoted => RequestError::AlreadyVoted,
            VoteRejection::UnknownOption(id) => RequestError::UnknownOption(id),
        }
    }
}

impl From<CommentRejection> for RequestError {
    fn from(err: CommentRejection) -> Self {
        match err {
            CommentRejection::Empty => RequestError::EmptyComment,
            CommentRejection::TooLong { length } => RequestError::CommentTooLong(length),
        }
    }
}
