//! Session gateway: registers connections and turns client requests into poll
//! mutations followed by broadcasts.

use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::{
        poll::{comment_list, poll_data},
        ws::{ClientMessage, MessagePayload, PollStatePayload, ServerMessage},
    },
    error::RequestError,
    services::poll_events::{
        broadcast_comment_added, broadcast_poll_reset, broadcast_poll_update,
        send_message_to_websocket, send_rejection, send_to_connection,
    },
    state::{ClientConnection, SharedState, poll::ResetReason},
};

const RESET_SUCCESS_MESSAGE: &str = "Poll reset successfully";

/// Register a new connection and send it the current snapshot and comment list.
///
/// The connection id doubles as the voter identity. Registration happens under
/// the poll lock so no broadcast can slip between the snapshot and the first
/// fan-out this connection takes part in.
pub async fn connect(state: &SharedState, tx: mpsc::UnboundedSender<Message>) -> Uuid {
    let connection_id = Uuid::new_v4();
    let poll = state.poll().lock().await;

    state.connections().insert(
        connection_id,
        ClientConnection {
            id: connection_id,
            tx: tx.clone(),
        },
    );

    let snapshot = ServerMessage::PollState(PollStatePayload {
        poll_data: poll_data(poll.options()),
        has_voted: poll.has_voted(&connection_id),
        reset_time: poll.reset_time().timestamp_millis(),
    });
    let comments = ServerMessage::Comments(comment_list(poll.comments()));

    let delivered = send_message_to_websocket(&tx, &snapshot)
        .and_then(|()| send_message_to_websocket(&tx, &comments));
    if delivered.is_err() {
        state.connections().remove(&connection_id);
        drop(poll);
        debug!(%connection_id, "client went away before the snapshot was sent");
        return connection_id;
    }
    drop(poll);

    info!(%connection_id, "client connected");
    connection_id
}

/// Remove a connection from the live set. Its vote, if any, stays counted.
pub fn disconnect(state: &SharedState, connection_id: Uuid) {
    state.connections().remove(&connection_id);
    info!(%connection_id, "client disconnected");
}

/// Dispatch one client request, reporting any rejection to the sender only.
pub async fn handle_request(state: &SharedState, connection_id: Uuid, request: ClientMessage) {
    let result = match request {
        ClientMessage::Vote(request) => vote(state, connection_id, &request.option_id).await,
        ClientMessage::AddComment(request) => {
            add_comment(state, connection_id, &request.text).await
        }
        ClientMessage::ResetPoll(reset) => {
            reset_poll(state, connection_id, reset.password.as_deref()).await
        }
    };

    if let Err(err) = result {
        warn!(%connection_id, error = %err, "request rejected");
        send_rejection(state, connection_id, &err);
    }
}

/// Record a vote and broadcast the new tally to every connection.
pub async fn vote(
    state: &SharedState,
    connection_id: Uuid,
    option_id: &str,
) -> Result<(), RequestError> {
    let mut poll = state.poll().lock().await;
    let tally = poll.record_vote(connection_id, option_id)?;
    broadcast_poll_update(state, &tally);

    info!(
        %connection_id,
        option = %option_id,
        voters = tally.voter_count,
        "vote recorded"
    );
    Ok(())
}

/// Append a comment and broadcast it to every connection.
pub async fn add_comment(
    state: &SharedState,
    connection_id: Uuid,
    text: &str,
) -> Result<(), RequestError> {
    let mut poll = state.poll().lock().await;
    let comment = poll.add_comment(text, Utc::now())?;
    broadcast_comment_added(state, &comment);

    info!(%connection_id, length = comment.text.len(), "comment added");
    Ok(())
}

/// Reset the poll if `password` matches the shared secret.
///
/// Everyone receives the fresh poll; only the requester gets the acknowledgement.
/// The scheduled reset time is left as is.
pub async fn reset_poll(
    state: &SharedState,
    connection_id: Uuid,
    password: Option<&str>,
) -> Result<(), RequestError> {
    let config = state.config();
    let authorised = password.is_some_and(|candidate| config.reset_password_matches(candidate));
    if !authorised {
        return Err(RequestError::BadPassword);
    }

    let mut poll = state.poll().lock().await;
    let reset = poll.reset(ResetReason::Manual, Utc::now());
    broadcast_poll_reset(state, &reset);
    send_to_connection(
        state,
        connection_id,
        &ServerMessage::ResetSuccess(MessagePayload::new(RESET_SUCCESS_MESSAGE)),
    );

    info!(%connection_id, "poll manually reset");
    Ok(())
}

/// Perform the scheduled reset if `now` has reached the stored reset time.
///
/// Returns whether a reset happened.
pub async fn run_scheduled_reset(state: &SharedState, now: DateTime<Utc>) -> bool {
    let mut poll = state.poll().lock().await;
    if !poll.is_reset_due(now) {
        return false;
    }

    let reset = poll.reset(ResetReason::Scheduled, now);
    broadcast_poll_reset(state, &reset);

    info!(next_reset = %reset.reset_time, "poll automatically reset for the new week");
    true
}
