//! The parts of the transactions and goals screens that do not depend on the
//! kind of record: the live list, the form and the route handlers.

mod endpoints;
mod form;
mod live_list;
mod view;

pub use endpoints::{
    RecordState, create_record, delete_record, get_edit_form, get_empty_form, get_records_page,
    stream_records, update_record,
};
pub use form::{Draft, DraftError, RecordForm, SubmitError, number, required};
pub use live_list::LiveList;
pub use view::RecordView;
