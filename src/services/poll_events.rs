use axum::extract::ws::{Message, Utf8Bytes};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dto::{
        poll::{CommentDto, poll_data},
        ws::{MessagePayload, PollResetPayload, PollUpdatePayload, ServerMessage},
    },
    error::RequestError,
    state::{
        SharedState,
        poll::{Comment, PollReset, VoteTally},
    },
};

/// The writer side of a socket has gone away.
#[derive(Debug, Error)]
#[error("connection closed")]
pub struct ConnectionClosed;

/// Serialize a payload and push it onto the provided WebSocket sender.
///
/// Serialization failures are logged and swallowed since retrying cannot help;
/// a closed writer is reported so the caller can drop the connection.
pub fn send_message_to_websocket<T>(
    tx: &mpsc::UnboundedSender<Message>,
    value: &T,
) -> Result<(), ConnectionClosed>
where
    T: ?Sized + serde::Serialize + std::fmt::Debug,
{
    let payload = match serde_json::to_string(value) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "failed to serialize message `{value:?}`");
            return Ok(());
        }
    };

    tx.send(Message::Text(payload.into()))
        .map_err(|_| ConnectionClosed)
}

/// Send a message to a single live connection, dropping it from the registry
/// if its writer has closed.
pub fn send_to_connection(state: &SharedState, connection_id: Uuid, message: &ServerMessage) {
    let Some(tx) = state
        .connections()
        .get(&connection_id)
        .map(|connection| connection.tx.clone())
    else {
        debug!(%connection_id, "connection gone before reply could be sent");
        return;
    };

    if send_message_to_websocket(&tx, message).is_err() {
        state.connections().remove(&connection_id);
    }
}

/// Fan a message out to every live connection.
///
/// The payload is serialized once; connections whose writer has closed are
/// removed from the registry.
pub fn broadcast(state: &SharedState, message: &ServerMessage) {
    let payload: Utf8Bytes = match serde_json::to_string(message) {
        Ok(payload) => payload.into(),
        Err(err) => {
            warn!(error = %err, "failed to serialize broadcast `{message:?}`");
            return;
        }
    };

    let closed: Vec<Uuid> = state
        .connections()
        .iter()
        .filter(|entry| entry.tx.send(Message::Text(payload.clone())).is_err())
        .map(|entry| *entry.key())
        .collect();

    for connection_id in closed {
        debug!(%connection_id, "dropping closed connection during broadcast");
        state.connections().remove(&connection_id);
    }
}

/// Broadcast the tally after an accepted vote.
pub fn broadcast_poll_update(state: &SharedState, tally: &VoteTally) {
    let message = ServerMessage::PollUpdate(PollUpdatePayload {
        poll_data: poll_data(&tally.options),
        voter_count: tally.voter_count,
    });
    broadcast(state, &message);
}

/// Broadcast the fresh poll after a manual or scheduled reset.
pub fn broadcast_poll_reset(state: &SharedState, reset: &PollReset) {
    let message = ServerMessage::PollReset(PollResetPayload {
        poll_data: poll_data(&reset.options),
        reset_time: reset.reset_time.timestamp_millis(),
    });
    broadcast(state, &message);
}

/// Broadcast a newly accepted comment.
pub fn broadcast_comment_added(state: &SharedState, comment: &Comment) {
    broadcast(state, &ServerMessage::CommentAdded(CommentDto::from(comment)));
}

/// Report a rejected request back to the connection that sent it.
pub fn send_rejection(state: &SharedState, connection_id: Uuid, err: &RequestError) {
    let payload = MessagePayload::new(err.client_message());
    let message = match err {
        RequestError::BadPassword => ServerMessage::ResetError(payload),
        _ => ServerMessage::Error(payload),
    };
    send_to_connection(state, connection_id, &message);
}
