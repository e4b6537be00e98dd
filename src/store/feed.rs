//! Change notification for the store's collections.

use std::{
    collections::HashMap,
    fmt::Debug,
    sync::{Arc, Mutex},
};

use tokio::sync::watch;

use crate::{Error, store::Record, user::UserID};

/// The full contents of a user's collection at one point in time.
pub type Snapshot<K> = Arc<[Record<K>]>;

/// The live queries on one kind of record, one watch channel per user.
///
/// A channel exists only while at least one [Subscription] for that user is
/// alive.
pub struct Feed<K> {
    senders: Arc<Mutex<HashMap<UserID, watch::Sender<Snapshot<K>>>>>,
}

// Implemented by hand so that `K` does not need to be `Clone` or `Default`.
impl<K> Clone for Feed<K> {
    fn clone(&self) -> Self {
        Self {
            senders: Arc::clone(&self.senders),
        }
    }
}

impl<K> Default for Feed<K> {
    fn default() -> Self {
        Self {
            senders: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K> Debug for Feed<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Feed").finish_non_exhaustive()
    }
}

impl<K> Feed<K> {
    /// Push `records` to every subscriber of `user_id`'s collection.
    pub fn publish(&self, user_id: UserID, records: Vec<Record<K>>) {
        let Ok(senders) = self.senders.lock() else {
            tracing::error!("could not acquire feed lock, dropping update for user {user_id}");
            return;
        };

        if let Some(sender) = senders.get(&user_id) {
            sender.send_replace(records.into());
        }
    }

    /// Register a listener on `user_id`'s collection.
    ///
    /// `current` is the collection as read by the caller. It seeds the channel
    /// when this is the first subscriber, otherwise the channel already holds
    /// the latest published snapshot.
    ///
    /// # Errors
    ///
    /// Returns [Error::DatabaseLockError] if the feed lock is poisoned.
    pub fn subscribe(
        &self,
        user_id: UserID,
        current: Vec<Record<K>>,
    ) -> Result<Subscription<K>, Error> {
        let mut senders = self
            .senders
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        let receiver = match senders.get(&user_id) {
            Some(sender) => sender.subscribe(),
            None => {
                let (sender, receiver) = watch::channel(current.into());
                senders.insert(user_id, sender);
                receiver
            }
        };

        tracing::debug!("user {user_id} subscribed to a live query");

        Ok(Subscription {
            user_id,
            receiver: Some(receiver),
            feed: self.clone(),
        })
    }

    /// The number of live subscriptions on `user_id`'s collection.
    pub fn subscriber_count(&self, user_id: UserID) -> usize {
        self.senders
            .lock()
            .map(|senders| {
                senders
                    .get(&user_id)
                    .map_or(0, |sender| sender.receiver_count())
            })
            .unwrap_or(0)
    }

    fn release(&self, user_id: UserID, receiver: watch::Receiver<Snapshot<K>>) {
        let Ok(mut senders) = self.senders.lock() else {
            tracing::error!("could not acquire feed lock to release subscription of user {user_id}");
            return;
        };

        drop(receiver);

        if senders
            .get(&user_id)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            senders.remove(&user_id);
        }

        tracing::debug!("user {user_id} released a live query");
    }
}

/// The cancellation handle of a live query.
///
/// Dropping the subscription, or calling [Subscription::unsubscribe],
/// releases the listener.
pub struct Subscription<K> {
    user_id: UserID,
    receiver: Option<watch::Receiver<Snapshot<K>>>,
    feed: Feed<K>,
}

impl<K> Subscription<K> {
    /// The latest snapshot, marking it as seen.
    pub fn current(&mut self) -> Snapshot<K> {
        match self.receiver.as_mut() {
            Some(receiver) => Arc::clone(&receiver.borrow_and_update()),
            None => Vec::new().into(),
        }
    }

    /// Whether a snapshot has been published since the last one was seen.
    pub fn has_changed(&self) -> bool {
        self.receiver
            .as_ref()
            .is_some_and(|receiver| receiver.has_changed().unwrap_or(false))
    }

    /// Wait for the next write to the collection and return the new snapshot.
    ///
    /// Returns `None` once the feed has shut down.
    pub async fn changed(&mut self) -> Option<Snapshot<K>> {
        let receiver = self.receiver.as_mut()?;
        receiver.changed().await.ok()?;

        Some(Arc::clone(&receiver.borrow_and_update()))
    }

    /// Release the listener now rather than when the subscription is dropped.
    pub fn unsubscribe(self) {}
}

impl<K> Drop for Subscription<K> {
    fn drop(&mut self) {
        if let Some(receiver) = self.receiver.take() {
            self.feed.release(self.user_id, receiver);
        }
    }
}

impl<K> Debug for Subscription<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod feed_tests {
    use crate::{store::Record, user::UserID};

    use super::Feed;

    fn record(id: i64) -> Record<&'static str> {
        Record { id, fields: "test" }
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let feed = Feed::<&str>::default();

        feed.publish(UserID::new(1), vec![record(1)]);

        assert_eq!(feed.subscriber_count(UserID::new(1)), 0);
    }

    #[tokio::test]
    async fn later_subscribers_see_latest_published_snapshot() {
        let feed = Feed::default();
        let user_id = UserID::new(1);
        let _first = feed.subscribe(user_id, vec![]).unwrap();

        feed.publish(user_id, vec![record(1)]);
        // A stale read from the caller must not replace the published value.
        let mut second = feed.subscribe(user_id, vec![]).unwrap();

        assert_eq!(second.current().to_vec(), vec![record(1)]);
    }

    #[tokio::test]
    async fn publish_only_reaches_the_same_user() {
        let feed = Feed::default();
        let mut alice = feed.subscribe(UserID::new(1), vec![]).unwrap();
        let bob = feed.subscribe(UserID::new(2), vec![]).unwrap();

        feed.publish(UserID::new(1), vec![record(3)]);

        assert!(!bob.has_changed());
        assert_eq!(alice.changed().await.unwrap().to_vec(), vec![record(3)]);
    }

    #[test]
    fn channel_is_removed_with_last_subscriber() {
        let feed = Feed::<&str>::default();
        let user_id = UserID::new(1);
        let subscription = feed.subscribe(user_id, vec![]).unwrap();

        drop(subscription);

        assert!(feed.senders.lock().unwrap().is_empty());
    }
}
