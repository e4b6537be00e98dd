//! The goal record and its table.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::RecordId,
    store::{Collection, Feed, Record, RecordKind, Store},
    user::UserID,
};

/// An amount of money the user is saving towards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// What the user is saving for.
    pub name: String,
    /// The amount the user wants to save.
    pub target_amount: f64,
    /// The amount saved so far.
    pub current_amount: f64,
}

impl RecordKind for Goal {
    const COLLECTION: Collection = Collection::Goals;

    fn feed(store: &Store) -> &Feed<Self> {
        store.goal_feed()
    }

    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS goal (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                target_amount REAL NOT NULL,
                current_amount REAL NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
            )",
            (),
        )?;

        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_goal_user_id ON goal(user_id)",
            (),
        )?;

        Ok(())
    }

    fn insert(&self, user_id: UserID, connection: &Connection) -> Result<RecordId, Error> {
        connection.execute(
            "INSERT INTO goal (user_id, name, target_amount, current_amount)
             VALUES (?1, ?2, ?3, ?4)",
            (
                user_id.as_i64(),
                &self.name,
                self.target_amount,
                self.current_amount,
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
                "UPDATE goal SET name = ?1, target_amount = ?2, current_amount = ?3
                 WHERE id = ?4 AND user_id = ?5",
                (
                    &self.name,
                    self.target_amount,
                    self.current_amount,
                    id,
                    user_id.as_i64(),
                ),
            )
            .map_err(Error::from)
    }

    fn select_all(user_id: UserID, connection: &Connection) -> Result<Vec<Record<Self>>, Error> {
        connection
            .prepare(
                "SELECT id, name, target_amount, current_amount FROM goal
                 WHERE user_id = :user_id ORDER BY id ASC",
            )?
            .query_map(&[(":user_id", &user_id.as_i64())], map_goal_row)?
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
                "SELECT id, name, target_amount, current_amount FROM goal
                 WHERE id = ?1 AND user_id = ?2",
                (id, user_id.as_i64()),
                map_goal_row,
            )
            .map_err(Error::from)
    }
}

fn map_goal_row(row: &Row) -> Result<Record<Goal>, rusqlite::Error> {
    Ok(Record {
        id: row.get(0)?,
        fields: Goal {
            name: row.get(1)?,
            target_amount: row.get(2)?,
            current_amount: row.get(3)?,
        },
    })
}
