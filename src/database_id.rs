//! Database ID type definition.

/// Alias for the integer type used for mapping to database IDs.
pub type DatabaseId = i64;

/// The store-assigned ID of a transaction or goal document.
///
/// IDs are unique within a user's collection and increase in arrival order.
pub type RecordId = DatabaseId;
