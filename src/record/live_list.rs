//! A local mirror of one of the user's collections.

use crate::{
    Error,
    store::{Record, RecordKind, Snapshot, Store, Subscription},
    user::UserID,
};

/// The records of the signed-in user, kept current by a live query.
///
/// With no identity the list is empty and nothing is subscribed.
#[derive(Debug)]
pub struct LiveList<K> {
    subscription: Option<Subscription<K>>,
    records: Snapshot<K>,
}

impl<K> Default for LiveList<K> {
    fn default() -> Self {
        Self {
            subscription: None,
            records: Vec::new().into(),
        }
    }
}

impl<K: RecordKind> LiveList<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow the collection of `user_id`, or clear the list when `None`.
    ///
    /// Any previous subscription is released first, so a list never listens
    /// to two users at once.
    ///
    /// # Errors
    ///
    /// Returns an error if the store could not start the live query. The list
    /// is left empty in that case.
    pub fn set_identity(&mut self, store: &Store, user_id: Option<UserID>) -> Result<(), Error> {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }

        self.records = Vec::new().into();

        if let Some(user_id) = user_id {
            let mut subscription = store.subscribe::<K>(user_id)?;
            self.records = subscription.current();
            self.subscription = Some(subscription);
        }

        Ok(())
    }

    /// Wait for the next change to the collection and adopt it.
    ///
    /// Returns `false` if there is nothing to wait on.
    pub async fn changed(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };

        match subscription.changed().await {
            Some(records) => {
                self.records = records;
                true
            }
            None => false,
        }
    }

    /// The records in store order.
    pub fn records(&self) -> &[Record<K>] {
        &self.records
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }
}
