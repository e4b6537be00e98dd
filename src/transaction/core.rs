//! The transaction record and its table.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::RecordId,
    store::{Collection, Feed, Record, RecordKind, Store},
    user::UserID,
};

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The amount of money spent or earned.
    pub amount: f64,
    /// A free-form grouping such as "food" or "rent".
    pub category: String,
    /// A text description of what the transaction was for.
    pub description: String,
}

impl RecordKind for Transaction {
    const COLLECTION: Collection = Collection::Transactions;

    fn feed(store: &Store) -> &Feed<Self> {
        store.transaction_feed()
    }

    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
            )",
            (),
        )?;

        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transaction_user_id ON \"transaction\"(user_id)",
            (),
        )?;

        Ok(())
    }

    fn insert(&self, user_id: UserID, connection: &Connection) -> Result<RecordId, Error> {
        connection.execute(
            "INSERT INTO \"transaction\" (user_id, amount, category, description)
             VALUES (?1, ?2, ?3, ?4)",
            (
                user_id.as_i64(),
                self.amount,
                &self.category,
                &self.description,
            ),
        )?;

        Ok(connection.last_insert_rowid())
    }

    fn update(
        &self,
        id: RecordId,
        user_id: UserID,
        connection: &Connection,
    ) -> Result<usize, Error> {
        connection
            .execute(
                "UPDATE \"transaction\" SET amount = ?1, category = ?2, description = ?3
                 WHERE id = ?4 AND user_id = ?5",
                (
                    self.amount,
                    &self.category,
                    &self.description,
                    id,
                    user_id.as_i64(),
                ),
            )
            .map_err(Error::from)
    }

    fn select_all(user_id: UserID, connection: &Connection) -> Result<Vec<Record<Self>>, Error> {
        connection
            .prepare(
                "SELECT id, amount, category, description FROM \"transaction\"
                 WHERE user_id = :user_id ORDER BY id ASC",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
            .map(|maybe_record| maybe_record.map_err(Error::from))
            .collect()
    }

    fn select(
        id: RecordId,
        user_id: UserID,
        connection: &Connection,
    ) -> Result<Record<Self>, Error> {
        connection
            .query_row(
                "SELECT id, amount, category, description FROM \"transaction\"
                 WHERE id = ?1 AND user_id = ?2",
                (id, user_id.as_i64()),
                map_transaction_row,
            )
            .map_err(Error::from)
    }
}

fn map_transaction_row(row: &Row) -> Result<Record<Transaction>, rusqlite::Error> {
    Ok(Record {
        id: row.get(0)?,
        fields: Transaction {
            amount: row.get(1)?,
            category: row.get(2)?,
            description: row.get(3)?,
        },
    })
}
