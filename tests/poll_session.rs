//! Drives the live poll through the gateway with in-memory channels standing in for sockets.

use axum::extract::ws::Message;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use uuid::Uuid;

use weekly_poll_back::{
    config::{AppConfig, DEFAULT_RESET_PASSWORD},
    dto::ws::ClientMessage,
    services::poll_service,
    state::{AppState, SharedState, poll::PollStore},
};

struct TestClient {
    id: Uuid,
    rx: UnboundedReceiver<Message>,
}

impl TestClient {
    async fn connect(state: &SharedState) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = poll_service::connect(state, tx).await;
        Self { id, rx }
    }

    async fn send(&self, state: &SharedState, frame: Value) {
        let request = ClientMessage::from_json_str(&frame.to_string()).unwrap();
        poll_service::handle_request(state, self.id, request).await;
    }

    fn events(&mut self) -> Vec<Value> {
        let mut events = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            if let Message::Text(text) = message {
                events.push(serde_json::from_str(text.as_str()).unwrap());
            }
        }
        events
    }

    fn last(&mut self, event: &str) -> Value {
        self.events()
            .into_iter()
            .filter(|value| value["event"] == event)
            .last()
            .unwrap_or_else(|| panic!("no `{event}` event received"))["data"]
            .clone()
    }
}

fn votes(poll_data: &Value, id: &str) -> u64 {
    poll_data
        .as_array()
        .unwrap()
        .iter()
        .find(|option| option["id"] == id)
        .and_then(|option| option["votes"].as_u64())
        .unwrap()
}

fn fresh_state() -> SharedState {
    let start: DateTime<Utc> = DateTime::parse_from_rfc3339("2025-01-06T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    AppState::with_store(AppConfig::default(), PollStore::new(start))
}

#[tokio::test]
async fn three_clients_vote_comment_and_reset() {
    let state = fresh_state();
    let mut alice = TestClient::connect(&state).await;
    let mut bob = TestClient::connect(&state).await;
    let mut carol = TestClient::connect(&state).await;

    let initial = carol.last("pollState");
    assert_eq!(initial["hasVoted"], false);
    let reset_time = initial["resetTime"].clone();
    alice.events();
    bob.events();

    alice
        .send(&state, json!({"event": "vote", "data": {"optionId": "movie"}}))
        .await;
    for client in [&mut alice, &mut bob, &mut carol] {
        let update = client.last("pollUpdate");
        assert_eq!(votes(&update["pollData"], "movie"), 1);
        assert_eq!(update["voterCount"], 1);
    }

    alice
        .send(&state, json!({"event": "vote", "data": {"optionId": "game"}}))
        .await;
    assert_eq!(
        alice.last("error")["message"],
        "You have already voted!"
    );
    assert!(bob.events().is_empty());
    assert!(carol.events().is_empty());

    bob.send(
        &state,
        json!({"event": "addComment", "data": {"text": "let's do a movie"}}),
    )
    .await;
    for client in [&mut alice, &mut bob, &mut carol] {
        assert_eq!(client.last("commentAdded")["text"], "let's do a movie");
    }

    carol
        .send(
            &state,
            json!({"event": "resetPoll", "data": {"password": DEFAULT_RESET_PASSWORD}}),
        )
        .await;
    let carol_events = carol.events();
    assert!(carol_events.iter().any(|value| value["event"] == "resetSuccess"));
    for client in [&mut alice, &mut bob] {
        let reset = client.last("pollReset");
        assert_eq!(votes(&reset["pollData"], "movie"), 0);
        assert_eq!(reset["resetTime"], reset_time);
    }

    let snapshot = state.read_poll(|poll| poll.snapshot()).await;
    assert!(snapshot.comments.is_empty());
    assert_eq!(snapshot.voter_count, 0);
}

#[tokio::test]
async fn late_joiner_sees_existing_state() {
    let state = fresh_state();
    let mut voter = TestClient::connect(&state).await;
    voter
        .send(&state, json!({"event": "vote", "data": {"optionId": "friend-choose"}}))
        .await;
    voter
        .send(&state, json!({"event": "addComment", "data": {"text": "char pls"}}))
        .await;

    let mut late = TestClient::connect(&state).await;
    let events = late.events();

    assert_eq!(events[0]["event"], "pollState");
    assert_eq!(events[0]["data"]["hasVoted"], false);
    assert_eq!(votes(&events[0]["data"]["pollData"], "friend-choose"), 1);
    assert_eq!(events[1]["event"], "comments");
    assert_eq!(events[1]["data"][0]["text"], "char pls");
}

#[tokio::test]
async fn concurrent_votes_are_all_counted_once() {
    let state = fresh_state();
    let mut clients = Vec::new();
    for _ in 0..24 {
        clients.push(TestClient::connect(&state).await);
    }

    let options = ["movie", "game", "friend-choose"];
    let mut handles = Vec::new();
    for (index, client) in clients.iter().enumerate() {
        let state = state.clone();
        let id = client.id;
        let option = options[index % options.len()];
        handles.push(tokio::spawn(async move {
            // Each client tries twice; only the first may count.
            let _ = poll_service::vote(&state, id, option).await;
            let _ = poll_service::vote(&state, id, option).await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let (total, voters) = state
        .read_poll(|poll| (poll.total_votes(), poll.voter_count()))
        .await;
    assert_eq!(total, 24);
    assert_eq!(voters, 24);
}
