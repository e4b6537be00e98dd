use serde::Deserialize;

use crate::{
    record::{Draft, DraftError, number, required},
    transaction::Transaction,
};

/// The transaction form as typed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionDraft {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

impl Draft for TransactionDraft {
    type Kind = Transaction;

    fn from_record(fields: &Transaction) -> Self {
        Self {
            amount: fields.amount.to_string(),
            category: fields.category.clone(),
            description: fields.description.clone(),
        }
    }

    fn parse(&self) -> Result<Transaction, DraftError> {
        Ok(Transaction {
            amount: number("Amount", &self.amount)?,
            category: required("Category", &self.category)?,
            description: required("Description", &self.description)?,
        })
    }
}
