//! The per-user document store for transactions and goals.
//!
//! Records live in SQLite tables partitioned by user, addressed as
//! `users/{user_id}/transactions` and `users/{user_id}/goals`. Every write
//! publishes the new contents of the affected collection to its [Feed] so that
//! live lists can re-render without polling.

mod feed;
mod record;

use std::{
    fmt::Display,
    sync::{Arc, Mutex},
};

use rusqlite::Connection;

pub use feed::{Feed, Snapshot, Subscription};
pub use record::{Record, RecordKind};

use crate::{Error, database_id::RecordId, goal::Goal, transaction::Transaction, user::UserID};

/// The kinds of record a user owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// The user's transactions.
    Transactions,
    /// The user's savings goals.
    Goals,
}

impl Collection {
    /// The SQLite table that backs the collection.
    pub fn table_name(self) -> &'static str {
        match self {
            Collection::Transactions => "\"transaction\"",
            Collection::Goals => "goal",
        }
    }

    /// The document path of the collection owned by `user_id`.
    pub fn path(self, user_id: UserID) -> CollectionPath {
        CollectionPath {
            user_id,
            collection: self,
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Collection::Transactions => write!(f, "transactions"),
            Collection::Goals => write!(f, "goals"),
        }
    }
}

/// A user's sub-collection, displayed as `users/{user_id}/{collection}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollectionPath {
    user_id: UserID,
    collection: Collection,
}

impl Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "users/{}/{}", self.user_id, self.collection)
    }
}

/// Shared handle to the database and the live feeds of both collections.
///
/// The connection lock is always taken before a feed lock, and held while the
/// snapshot for a write or a new subscription is read. A subscriber therefore
/// never misses a write made after it subscribed.
#[derive(Debug, Clone)]
pub struct Store {
    connection: Arc<Mutex<Connection>>,
    transactions: Feed<Transaction>,
    goals: Feed<Goal>,
}

impl Store {
    /// Wrap a database connection whose tables have already been created.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            connection,
            transactions: Feed::default(),
            goals: Feed::default(),
        }
    }

    /// The underlying database connection, for the tables outside the store.
    pub fn connection(&self) -> &Arc<Mutex<Connection>> {
        &self.connection
    }

    pub(crate) fn transaction_feed(&self) -> &Feed<Transaction> {
        &self.transactions
    }

    pub(crate) fn goal_feed(&self) -> &Feed<Goal> {
        &self.goals
    }

    /// Add a new record to the user's collection, returning it with the
    /// store-assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired or the SQL query fails.
    pub fn create<K: RecordKind>(&self, user_id: UserID, fields: K) -> Result<Record<K>, Error> {
        let connection = self.lock()?;

        let id = fields.insert(user_id, &connection)?;
        self.publish::<K>(user_id, &connection)?;

        tracing::debug!("created record {id} in {}", K::COLLECTION.path(user_id));

        Ok(Record { id, fields })
    }

    /// Overwrite every field of the record `id` in the user's collection.
    ///
    /// # Errors
    ///
    /// Returns [Error::UpdateMissingRecord] if the user has no record with `id`.
    pub fn replace<K: RecordKind>(
        &self,
        user_id: UserID,
        id: RecordId,
        fields: K,
    ) -> Result<Record<K>, Error> {
        let connection = self.lock()?;

        if fields.update(id, user_id, &connection)? == 0 {
            return Err(Error::UpdateMissingRecord(K::COLLECTION));
        }

        self.publish::<K>(user_id, &connection)?;

        Ok(Record { id, fields })
    }

    /// Remove the record `id` from the user's collection.
    ///
    /// # Errors
    ///
    /// Returns [Error::DeleteMissingRecord] if the user has no record with `id`.
    pub fn delete<K: RecordKind>(&self, user_id: UserID, id: RecordId) -> Result<(), Error> {
        let connection = self.lock()?;

        let rows_affected = connection.execute(
            &format!(
                "DELETE FROM {} WHERE id = ?1 AND user_id = ?2",
                K::COLLECTION.table_name()
            ),
            (id, user_id.as_i64()),
        )?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingRecord(K::COLLECTION));
        }

        self.publish::<K>(user_id, &connection)
    }

    /// Get every record in the user's collection in arrival order.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired or the SQL query fails.
    pub fn list<K: RecordKind>(&self, user_id: UserID) -> Result<Vec<Record<K>>, Error> {
        let connection = self.lock()?;

        K::select_all(user_id, &connection)
    }

    /// Get the record `id` from the user's collection.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if the user has no record with `id`.
    pub fn get<K: RecordKind>(&self, user_id: UserID, id: RecordId) -> Result<Record<K>, Error> {
        let connection = self.lock()?;

        K::select(id, user_id, &connection)
    }

    /// Start a live query on the user's collection.
    ///
    /// The subscription starts with the current contents of the collection and
    /// is notified after every subsequent write. Dropping it releases the
    /// listener.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be acquired or the SQL query fails.
    pub fn subscribe<K: RecordKind>(&self, user_id: UserID) -> Result<Subscription<K>, Error> {
        let connection = self.lock()?;
        let records = K::select_all(user_id, &connection)?;

        K::feed(self).subscribe(user_id, records)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }

    fn publish<K: RecordKind>(&self, user_id: UserID, connection: &Connection) -> Result<(), Error> {
        let feed = K::feed(self);

        if feed.subscriber_count(user_id) == 0 {
            return Ok(());
        }

        let records = K::select_all(user_id, connection)?;
        feed.publish(user_id, records);

        Ok(())
    }
}
