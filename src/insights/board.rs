//! Per-user insights state: the latest text and whether a request is running.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::user::UserID;

#[derive(Debug, Default)]
struct Entry {
    loading: bool,
    text: Option<String>,
}

/// The insights shown to each user.
///
/// At most one request per user runs at a time. Starting one hands out a
/// [PendingInsights] guard that clears the loading flag when it is dropped,
/// whether or not the request succeeded.
#[derive(Debug, Clone, Default)]
pub struct InsightsBoard {
    entries: Arc<Mutex<HashMap<UserID, Entry>>>,
}

impl InsightsBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserID, Entry>> {
        // The map stays consistent even if a holder panicked.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark a request for `user_id` as running.
    ///
    /// Returns `None` if one is already running.
    pub fn begin(&self, user_id: UserID) -> Option<PendingInsights> {
        let mut entries = self.lock();
        let entry = entries.entry(user_id).or_default();

        if entry.loading {
            return None;
        }

        entry.loading = true;

        Some(PendingInsights {
            board: self.clone(),
            user_id,
        })
    }

    pub fn is_loading(&self, user_id: UserID) -> bool {
        self.lock()
            .get(&user_id)
            .is_some_and(|entry| entry.loading)
    }

    /// The text of the last successful request, if any.
    pub fn latest(&self, user_id: UserID) -> Option<String> {
        self.lock()
            .get(&user_id)
            .and_then(|entry| entry.text.clone())
    }
}

/// A running insights request. Dropping it clears the loading flag.
#[derive(Debug)]
pub struct PendingInsights {
    board: InsightsBoard,
    user_id: UserID,
}

impl PendingInsights {
    /// Replace the user's insights with `text` and end the request.
    pub fn finish(self, text: String) {
        if let Some(entry) = self.board.lock().get_mut(&self.user_id) {
            entry.text = Some(text);
        }
    }
}

impl Drop for PendingInsights {
    fn drop(&mut self) {
        let mut entries = self.board.lock();

        match entries.get_mut(&self.user_id) {
            // Users with no insights yet keep no entry between requests.
            Some(entry) if entry.text.is_none() => {
                entries.remove(&self.user_id);
            }
            Some(entry) => entry.loading = false,
            None => {}
        }
    }
}

#[cfg(test)]
mod insights_board_tests {
    use crate::user::UserID;

    use super::InsightsBoard;

    #[test]
    fn second_request_is_refused_while_loading() {
        let board = InsightsBoard::new();
        let user_id = UserID::new(1);

        let pending = board.begin(user_id);

        assert!(pending.is_some());
        assert!(board.is_loading(user_id));
        assert!(board.begin(user_id).is_none());
    }

    #[test]
    fn other_users_are_not_blocked() {
        let board = InsightsBoard::new();
        let _pending = board.begin(UserID::new(1)).unwrap();

        assert!(board.begin(UserID::new(2)).is_some());
    }

    #[test]
    fn finish_stores_text_and_clears_loading() {
        let board = InsightsBoard::new();
        let user_id = UserID::new(1);

        board
            .begin(user_id)
            .unwrap()
            .finish("Spend less on coffee.".to_owned());

        assert!(!board.is_loading(user_id));
        assert_eq!(
            board.latest(user_id).as_deref(),
            Some("Spend less on coffee.")
        );
    }

    #[test]
    fn dropped_request_keeps_previous_text() {
        let board = InsightsBoard::new();
        let user_id = UserID::new(1);
        board.begin(user_id).unwrap().finish("first".to_owned());

        let pending = board.begin(user_id).unwrap();
        drop(pending);

        assert!(!board.is_loading(user_id));
        assert_eq!(board.latest(user_id).as_deref(), Some("first"));
        assert!(board.begin(user_id).is_some());
    }

    #[test]
    fn failed_first_request_leaves_no_entry() {
        let board = InsightsBoard::new();
        let user_id = UserID::new(1);

        drop(board.begin(user_id).unwrap());

        assert!(board.lock().is_empty());
        assert!(!board.is_loading(user_id));
        assert_eq!(board.latest(user_id), None);
        assert!(board.begin(user_id).is_some());
    }
}
