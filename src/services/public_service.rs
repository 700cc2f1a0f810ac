//! Service helpers that expose read-only projections of the current poll.

use std::time::SystemTime;

use crate::{
    dto::{
        poll::{comment_list, poll_data},
        public::{CommentsResponse, PollResponse, StatusResponse},
    },
    state::SharedState,
};

/// Process status together with aggregate counters.
pub async fn get_status(state: &SharedState) -> StatusResponse {
    let (voter_count, total_votes, comment_count) = state
        .read_poll(|poll| (poll.voter_count(), poll.total_votes(), poll.comments().len()))
        .await;

    StatusResponse::ok(
        SystemTime::now(),
        state.connections().len(),
        voter_count,
        total_votes,
        comment_count,
    )
}

/// Current tally, voter count and next scheduled reset.
pub async fn get_poll(state: &SharedState) -> PollResponse {
    state
        .read_poll(|poll| PollResponse {
            poll_data: poll_data(poll.options()),
            voter_count: poll.voter_count(),
            reset_time: poll.reset_time().timestamp_millis(),
        })
        .await
}

/// Every comment posted during the current poll period, oldest first.
pub async fn get_comments(state: &SharedState) -> CommentsResponse {
    state
        .read_poll(|poll| CommentsResponse {
            comments: comment_list(poll.comments()),
        })
        .await
}
