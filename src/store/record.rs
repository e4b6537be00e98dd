//! Stored documents and the per-kind table mapping.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::RecordId,
    store::{Collection, Feed, Store},
    user::UserID,
};

/// A stored document: the store-assigned ID plus the fields of the record kind.
///
/// Serializes flat, e.g. `{"id": 1, "amount": 4.5, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<K> {
    /// The ID assigned by the store when the record was created.
    pub id: RecordId,
    /// The user editable fields.
    #[serde(flatten)]
    pub fields: K,
}

/// A kind of record with its own collection, table and live feed.
pub trait RecordKind: Clone + Send + Sync + 'static {
    /// The collection records of this kind are stored in.
    const COLLECTION: Collection;

    /// The live feed for this kind of record.
    fn feed(store: &Store) -> &Feed<Self>;

    /// Create the backing table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the SQL query fails.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;

    /// Insert the fields as a new row owned by `user_id` and return its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the SQL query fails.
    fn insert(&self, user_id: UserID, connection: &Connection) -> Result<RecordId, Error>;

    /// Overwrite the row `id` owned by `user_id`, returning the number of rows changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the SQL query fails.
    fn update(&self, id: RecordId, user_id: UserID, connection: &Connection)
    -> Result<usize, Error>;

    /// Every row owned by `user_id`, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the SQL query fails.
    fn select_all(user_id: UserID, connection: &Connection) -> Result<Vec<Record<Self>>, Error>;

    /// The row `id` owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if there is no such row.
    fn select(id: RecordId, user_id: UserID, connection: &Connection)
    -> Result<Record<Self>, Error>;
}
