use std::collections::HashSet;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::state::schedule::next_thursday_midnight_eastern;

/// Longest comment accepted, counted in characters of the raw input.
pub const MAX_COMMENT_CHARS: usize = 500;

/// Identity used to enforce one vote per session; equal to the connection id.
pub type VoterId = Uuid;

/// One selectable poll choice with its running tally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOption {
    pub id: String,
    pub name: String,
    pub votes: u32,
    /// Display hint consumed by the chart renderer.
    pub color: String,
}

impl PollOption {
    fn seeded(id: &str, name: &str, color: &str) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            votes: 0,
            color: color.into(),
        }
    }
}

/// Options every poll period starts from.
pub fn seeded_options() -> Vec<PollOption> {
    vec![
        PollOption::seeded("movie", "Movie", "#8884d8"),
        PollOption::seeded("game", "Game", "#82ca9d"),
        PollOption::seeded("friend-choose", "Char", "#ffc658"),
    ]
}

/// A trimmed message posted to the comment board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Why a poll reset happened; only scheduled resets move the schedule forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    Scheduled,
    Manual,
}

/// Reasons a vote is turned down. The store is left untouched on rejection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoteRejection {
    #[error("voter has already voted in this poll period")]
    AlreadyVoted,
    #[error("unknown poll option `{0}`")]
    UnknownOption(String),
}

/// Reasons a comment is turned down. The store is left untouched on rejection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommentRejection {
    #[error("comment is empty")]
    Empty,
    #[error("comment is {length} characters long (max {max})", max = MAX_COMMENT_CHARS)]
    TooLong { length: usize },
}

/// Tally returned after an accepted vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteTally {
    pub options: Vec<PollOption>,
    pub voter_count: usize,
}

/// Fresh option list and schedule returned after a reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReset {
    pub options: Vec<PollOption>,
    pub reset_time: DateTime<Utc>,
}

/// Read-only copy of the poll handed to new connections and HTTP views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSnapshot {
    pub options: Vec<PollOption>,
    pub comments: Vec<Comment>,
    pub reset_time: DateTime<Utc>,
    pub voter_count: usize,
}

/// In-memory poll state: options, voters, comments and the next scheduled reset.
///
/// The store knows nothing about connections; callers serialize access to it
/// and fan results out themselves.
#[derive(Debug)]
pub struct PollStore {
    options: Vec<PollOption>,
    voters: HashSet<VoterId>,
    comments: Vec<Comment>,
    reset_time: DateTime<Utc>,
}

impl PollStore {
    /// Seed a new poll period whose reset is the next Thursday boundary after `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            options: seeded_options(),
            voters: HashSet::new(),
            comments: Vec::new(),
            reset_time: next_thursday_midnight_eastern(now),
        }
    }

    /// Count one vote for `option_id` on behalf of `voter`.
    pub fn record_vote(
        &mut self,
        voter: VoterId,
        option_id: &str,
    ) -> Result<VoteTally, VoteRejection> {
        if self.voters.contains(&voter) {
            return Err(VoteRejection::AlreadyVoted);
        }

        let option = self
            .options
            .iter_mut()
            .find(|option| option.id == option_id)
            .ok_or_else(|| VoteRejection::UnknownOption(option_id.to_string()))?;

        option.votes += 1;
        self.voters.insert(voter);

        Ok(VoteTally {
            options: self.options.clone(),
            voter_count: self.voters.len(),
        })
    }

    /// Append a comment stamped with `now`, trimming surrounding whitespace.
    pub fn add_comment(
        &mut self,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<Comment, CommentRejection> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CommentRejection::Empty);
        }

        let length = text.chars().count();
        if length > MAX_COMMENT_CHARS {
            return Err(CommentRejection::TooLong { length });
        }

        let comment = Comment {
            text: trimmed.to_string(),
            timestamp: now.timestamp_millis(),
        };
        self.comments.push(comment.clone());
        Ok(comment)
    }

    /// Restore the seeded options and clear voters and comments.
    ///
    /// A manual reset keeps the current schedule; a scheduled one moves it to
    /// the next Thursday boundary after `now`.
    pub fn reset(&mut self, reason: ResetReason, now: DateTime<Utc>) -> PollReset {
        self.options = seeded_options();
        self.voters.clear();
        self.comments.clear();
        if reason == ResetReason::Scheduled {
            self.reset_time = next_thursday_midnight_eastern(now);
        }

        PollReset {
            options: self.options.clone(),
            reset_time: self.reset_time,
        }
    }

    /// Whether the scheduled reset instant has been reached.
    pub fn is_reset_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.reset_time
    }

    pub fn has_voted(&self, voter: &VoterId) -> bool {
        self.voters.contains(voter)
    }

    pub fn options(&self) -> &[PollOption] {
        &self.options
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn reset_time(&self) -> DateTime<Utc> {
        self.reset_time
    }

    pub fn voter_count(&self) -> usize {
        self.voters.len()
    }

    /// Sum of the votes across every option.
    pub fn total_votes(&self) -> u64 {
        self.options
            .iter()
            .map(|option| u64::from(option.votes))
            .sum()
    }

    pub fn snapshot(&self) -> PollSnapshot {
        PollSnapshot {
            options: self.options.clone(),
            comments: self.comments.clone(),
            reset_time: self.reset_time,
            voter_count: self.voters.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-08T15:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn votes_for(store: &PollStore, id: &str) -> u32 {
        store
            .options()
            .iter()
            .find(|option| option.id == id)
            .map(|option| option.votes)
            .unwrap()
    }

    #[test]
    fn new_store_is_seeded_and_empty() {
        let store = PollStore::new(now());
        let ids: Vec<_> = store.options().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["movie", "game", "friend-choose"]);
        assert_eq!(store.total_votes(), 0);
        assert_eq!(store.voter_count(), 0);
        assert!(store.comments().is_empty());
        assert!(store.reset_time() > now());
    }

    #[test]
    fn accepted_vote_increments_option_and_voters() {
        let mut store = PollStore::new(now());
        let voter = Uuid::new_v4();

        let tally = store.record_vote(voter, "movie").unwrap();

        assert_eq!(tally.voter_count, 1);
        assert_eq!(votes_for(&store, "movie"), 1);
        assert!(store.has_voted(&voter));
    }

    #[test]
    fn second_vote_from_same_voter_is_rejected_without_change() {
        let mut store = PollStore::new(now());
        let voter = Uuid::new_v4();
        store.record_vote(voter, "movie").unwrap();

        let err = store.record_vote(voter, "game").unwrap_err();

        assert_eq!(err, VoteRejection::AlreadyVoted);
        assert_eq!(votes_for(&store, "movie"), 1);
        assert_eq!(votes_for(&store, "game"), 0);
        assert_eq!(store.voter_count(), 1);
    }

    #[test]
    fn unknown_option_is_rejected_and_voter_stays_unvoted() {
        let mut store = PollStore::new(now());
        let voter = Uuid::new_v4();

        let err = store.record_vote(voter, "concert").unwrap_err();

        assert_eq!(err, VoteRejection::UnknownOption("concert".into()));
        assert!(!store.has_voted(&voter));
        assert_eq!(store.total_votes(), 0);
        assert!(store.record_vote(voter, "game").is_ok());
    }

    #[test]
    fn votes_always_match_voter_count() {
        let mut store = PollStore::new(now());
        let voters: Vec<_> = (0..12).map(|_| Uuid::new_v4()).collect();
        let choices = ["movie", "game", "friend-choose", "nope"];

        for (round, voter) in voters.iter().cycle().take(36).enumerate() {
            let _ = store.record_vote(*voter, choices[round % choices.len()]);
            assert_eq!(store.total_votes(), store.voter_count() as u64);
        }
    }

    #[test]
    fn comment_validation() {
        let mut store = PollStore::new(now());

        assert_eq!(store.add_comment("", now()), Err(CommentRejection::Empty));
        assert_eq!(store.add_comment("   ", now()), Err(CommentRejection::Empty));
        assert_eq!(
            store.add_comment(&"a".repeat(501), now()),
            Err(CommentRejection::TooLong { length: 501 })
        );
        assert!(store.comments().is_empty());

        let accepted = store.add_comment(&"é".repeat(500), now()).unwrap();
        assert_eq!(accepted.text.chars().count(), 500);
    }

    #[test]
    fn comment_length_counts_surrounding_whitespace() {
        let mut store = PollStore::new(now());

        let padded = format!("hi{}", " ".repeat(499));
        assert_eq!(
            store.add_comment(&padded, now()),
            Err(CommentRejection::TooLong { length: 501 })
        );
        assert!(store.comments().is_empty());

        let at_limit = format!("  {}  ", "b".repeat(496));
        let accepted = store.add_comment(&at_limit, now()).unwrap();
        assert_eq!(accepted.text, "b".repeat(496));
        assert_eq!(store.comments().len(), 1);
    }

    #[test]
    fn comment_is_trimmed_and_timestamped() {
        let mut store = PollStore::new(now());

        let comment = store.add_comment(" hi ", now()).unwrap();

        assert_eq!(comment.text, "hi");
        assert_eq!(comment.timestamp, now().timestamp_millis());
        assert_eq!(store.comments(), [comment]);
    }

    #[test]
    fn manual_reset_keeps_schedule() {
        let mut store = PollStore::new(now());
        let scheduled = store.reset_time();
        store.record_vote(Uuid::new_v4(), "movie").unwrap();
        store.add_comment("let's do a movie", now()).unwrap();

        let outcome = store.reset(ResetReason::Manual, now() + Duration::days(30));

        assert_eq!(outcome.reset_time, scheduled);
        assert_eq!(store.reset_time(), scheduled);
        assert_eq!(store.options(), seeded_options().as_slice());
        assert_eq!(store.voter_count(), 0);
        assert!(store.comments().is_empty());
    }

    #[test]
    fn scheduled_reset_moves_to_following_week() {
        let mut store = PollStore::new(now());
        let due = store.reset_time();
        let voter = Uuid::new_v4();
        store.record_vote(voter, "game").unwrap();
        store.add_comment("gg", now()).unwrap();

        assert!(!store.is_reset_due(due - Duration::milliseconds(1)));
        assert!(store.is_reset_due(due));

        let outcome = store.reset(ResetReason::Scheduled, due);

        assert_eq!(outcome.reset_time, due + Duration::days(7));
        assert_eq!(store.total_votes(), 0);
        assert!(!store.has_voted(&voter));
        assert!(store.comments().is_empty());
    }

    #[test]
    fn snapshot_reflects_current_state() {
        let mut store = PollStore::new(now());
        store.record_vote(Uuid::new_v4(), "friend-choose").unwrap();
        store.add_comment("hello", now()).unwrap();

        let snapshot = store.snapshot();

        assert_eq!(snapshot.voter_count, 1);
        assert_eq!(snapshot.comments.len(), 1);
        assert_eq!(snapshot.reset_time, store.reset_time());
        assert_eq!(snapshot.options, store.options());
    }
}
