//! The edit state of a record form and the submit flow.

use std::fmt::Debug;

use serde::de::DeserializeOwned;

use crate::{
    Error,
    database_id::RecordId,
    store::{Record, RecordKind, Store},
    user::UserID,
};

/// The fields of a record exactly as typed by the user.
///
/// A draft only becomes a record after [Draft::parse] succeeds.
pub trait Draft: Default + Clone + Debug + PartialEq + DeserializeOwned + Send + 'static {
    /// The kind of record the draft parses into.
    type Kind: RecordKind;

    /// Fill a draft with the fields of an existing record.
    fn from_record(fields: &Self::Kind) -> Self;

    /// Validate the draft and convert it into record fields.
    ///
    /// # Errors
    ///
    /// Returns a [DraftError] naming the first field that is blank or not a
    /// finite number.
    fn parse(&self) -> Result<Self::Kind, DraftError>;
}

/// Why a draft could not be turned into a record.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum DraftError {
    /// A required field was left empty.
    #[error("{0} is required.")]
    Missing(&'static str),

    /// A numeric field was not a finite number.
    #[error("{0} must be a number.")]
    NotANumber(&'static str),
}

/// Check that `value` is not blank.
pub fn required(label: &'static str, value: &str) -> Result<String, DraftError> {
    if value.trim().is_empty() {
        return Err(DraftError::Missing(label));
    }

    Ok(value.to_owned())
}

/// Parse `value` as a finite number. NaN and infinities are rejected.
pub fn number(label: &'static str, value: &str) -> Result<f64, DraftError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(DraftError::Missing(label));
    }

    match value.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(DraftError::NotANumber(label)),
    }
}

/// Why submitting a form did not store a record.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SubmitError {
    /// The draft failed validation, nothing was sent to the store.
    #[error(transparent)]
    Invalid(#[from] DraftError),

    /// The store rejected the write.
    #[error(transparent)]
    Store(#[from] Error),
}

/// A draft plus the ID of the record being edited, if any.
///
/// Submitting creates a new record unless a record is being edited, in which
/// case every field of that record is replaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordForm<D> {
    draft: D,
    editing_id: Option<RecordId>,
}

impl<D: Draft> RecordForm<D> {
    /// An empty form for creating a new record.
    pub fn new() -> Self {
        Self::default()
    }

    /// A form restored from a posted draft.
    pub fn with_draft(draft: D, editing_id: Option<RecordId>) -> Self {
        Self { draft, editing_id }
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    pub fn editing_id(&self) -> Option<RecordId> {
        self.editing_id
    }

    /// Load `record` into the form for editing.
    pub fn edit(&mut self, record: &Record<D::Kind>) {
        self.draft = D::from_record(&record.fields);
        self.editing_id = Some(record.id);
    }

    /// Discard the draft and stop editing.
    pub fn cancel(&mut self) {
        self.draft = D::default();
        self.editing_id = None;
    }

    /// Parse the draft and write it to the user's collection.
    ///
    /// On success the form is reset. On failure the draft is left untouched
    /// so the user can correct it.
    ///
    /// # Errors
    ///
    /// Returns [SubmitError::Invalid] if the draft does not parse, or
    /// [SubmitError::Store] if the create or replace failed.
    pub fn submit(
        &mut self,
        store: &Store,
        user_id: UserID,
    ) -> Result<Record<D::Kind>, SubmitError> {
        let fields = self.draft.parse()?;

        let record = match self.editing_id {
            Some(id) => store.replace(user_id, id, fields)?,
            None => store.create(user_id, fields)?,
        };

        self.cancel();

        Ok(record)
    }

    /// Delete a record straight away. There is no confirmation and no undo.
    ///
    /// # Errors
    ///
    /// Returns an error if the record does not exist or the store failed.
    pub fn delete(&self, store: &Store, user_id: UserID, id: RecordId) -> Result<(), Error> {
        store.delete::<D::Kind>(user_id, id)
    }
}
