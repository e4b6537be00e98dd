//! Creates the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, goal::Goal, store::RecordKind, transaction::Transaction, user::create_user_table};

/// Create the user, transaction and goal tables if they do not already exist.
///
/// # Errors
///
/// Returns an error if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    Transaction::create_table(&transaction)?;
    Goal::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
