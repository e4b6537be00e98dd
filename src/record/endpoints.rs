//! Route handlers shared by the transactions and goals pages.
//!
//! Each handler is generic over the [RecordView] it serves and is routed once
//! per kind, e.g. `get(get_records_page::<Transaction>)`.

use std::convert::Infallible;

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures::{Stream, StreamExt, stream};

use crate::{
    AppState,
    database_id::RecordId,
    record::{
        LiveList, RecordForm, RecordView, SubmitError,
        view::{SNAPSHOT_EVENT, record_form_view, record_list_view, record_page_view},
    },
    store::{Record, Store},
    user::UserID,
};

/// The state needed by the record route handlers.
#[derive(Debug, Clone)]
pub struct RecordState {
    /// The store holding every user's transactions and goals.
    pub store: Store,
}

impl FromRef<AppState> for RecordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// Renders the page with an empty form and the user's records.
pub async fn get_records_page<V: RecordView>(
    State(state): State<RecordState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    match state.store.list::<V>(user_id) {
        Ok(records) => record_page_view(&records).into_response(),
        Err(error) => {
            tracing::error!("could not list {}: {error}", V::COLLECTION.path(user_id));
            error.into_response()
        }
    }
}

/// Streams the rendered list, once on connect and again after every change.
///
/// The live list lives inside the stream, so the subscription is released
/// when the client disconnects.
pub async fn stream_records<V: RecordView>(
    State(state): State<RecordState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    let mut list = LiveList::<V>::new();

    if let Err(error) = list.set_identity(&state.store, Some(user_id)) {
        tracing::error!(
            "could not subscribe to {}: {error}",
            V::COLLECTION.path(user_id)
        );
        return error.into_response();
    }

    Sse::new(snapshot_stream(list))
        .keep_alive(KeepAlive::default())
        .into_response()
}

fn snapshot_stream<V: RecordView>(
    list: LiveList<V>,
) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
    let initial = snapshot_event(list.records());

    let updates = stream::unfold(list, |mut list| async move {
        if !list.changed().await {
            return None;
        }

        let event = snapshot_event(list.records());
        Some((event, list))
    });

    stream::once(async move { initial }).chain(updates)
}

fn snapshot_event<V: RecordView>(records: &[Record<V>]) -> Result<Event, Infallible> {
    let markup = record_list_view(records).into_string();

    // SSE data lines cannot carry carriage returns.
    Ok(Event::default()
        .event(SNAPSHOT_EVENT)
        .data(markup.replace('\r', "")))
}

/// Creates a record from the posted draft and responds with an empty form.
pub async fn create_record<V: RecordView>(
    State(state): State<RecordState>,
    Extension(user_id): Extension<UserID>,
    Form(draft): Form<V::Draft>,
) -> Response {
    submit_form::<V>(&state.store, user_id, RecordForm::with_draft(draft, None))
}

/// Replaces every field of a record and responds with an empty form.
pub async fn update_record<V: RecordView>(
    State(state): State<RecordState>,
    Extension(user_id): Extension<UserID>,
    Path(record_id): Path<RecordId>,
    Form(draft): Form<V::Draft>,
) -> Response {
    submit_form::<V>(
        &state.store,
        user_id,
        RecordForm::with_draft(draft, Some(record_id)),
    )
}

/// Validation errors are shown in the form. Store errors are only logged and
/// answered with 204 so htmx leaves the form as it is.
fn submit_form<V: RecordView>(
    store: &Store,
    user_id: UserID,
    mut form: RecordForm<V::Draft>,
) -> Response {
    match form.submit(store, user_id) {
        Ok(record) => {
            tracing::info!("saved record {} in {}", record.id, V::COLLECTION.path(user_id));
            record_form_view::<V>(&form, None).into_response()
        }
        Err(SubmitError::Invalid(error)) => {
            record_form_view::<V>(&form, Some(&error)).into_response()
        }
        Err(SubmitError::Store(error)) => {
            tracing::error!(
                "could not save {:?} in {}: {error}",
                form.draft(),
                V::COLLECTION.path(user_id)
            );
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

/// Deletes a record without asking for confirmation.
///
/// The list is updated through the record stream, so the response has no body.
pub async fn delete_record<V: RecordView>(
    State(state): State<RecordState>,
    Extension(user_id): Extension<UserID>,
    Path(record_id): Path<RecordId>,
) -> Response {
    match RecordForm::<V::Draft>::new().delete(&state.store, user_id, record_id) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!(
                "could not delete record {record_id} in {}: {error}",
                V::COLLECTION.path(user_id)
            );
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

/// Responds with the form filled in from an existing record.
pub async fn get_edit_form<V: RecordView>(
    State(state): State<RecordState>,
    Extension(user_id): Extension<UserID>,
    Path(record_id): Path<RecordId>,
) -> Response {
    match state.store.get::<V>(user_id, record_id) {
        Ok(record) => {
            let mut form = RecordForm::<V::Draft>::new();
            form.edit(&record);
            record_form_view::<V>(&form, None).into_response()
        }
        Err(error) => {
            tracing::warn!(
                "could not load record {record_id} in {} for editing: {error}",
                V::COLLECTION.path(user_id)
            );
            error.into_response()
        }
    }
}

/// Responds with an empty form, abandoning any edit in progress.
pub async fn get_empty_form<V: RecordView>() -> Response {
    let mut form = RecordForm::<V::Draft>::new();
    form.cancel();

    record_form_view::<V>(&form, None).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use futures::StreamExt;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        PasswordHash,
        db::initialize,
        endpoints::{self, format_endpoint},
        goal::Goal,
        record::LiveList,
        store::Store,
        test_utils::{
            assert_form_error_message, assert_form_input_with_value, assert_hx_endpoint,
            assert_no_content, assert_status_ok, assert_valid_html, body_text, must_get_form,
            parse_html_document, parse_html_fragment, record_card_ids,
        },
        transaction::{Transaction, TransactionDraft},
        user::{UserID, create_user},
    };

    use super::{
        RecordState, create_record, delete_record, get_edit_form, get_empty_form,
        get_records_page, snapshot_stream, update_record,
    };

    fn get_state() -> (RecordState, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_user(
            "test@example.com".parse().unwrap(),
            PasswordHash::new_unchecked("hunter2"),
            &connection,
        )
        .unwrap();

        (
            RecordState {
                store: Store::new(Arc::new(Mutex::new(connection))),
            },
            user.id,
        )
    }

    fn coffee_draft() -> TransactionDraft {
        TransactionDraft {
            amount: "4.50".to_owned(),
            category: "food".to_owned(),
            description: "coffee".to_owned(),
        }
    }

    fn coffee() -> Transaction {
        Transaction {
            amount: 4.5,
            category: "food".to_owned(),
            description: "coffee".to_owned(),
        }
    }

    #[tokio::test]
    async fn page_renders_form_and_records() {
        let (state, user_id) = get_state();
        let record = state.store.create(user_id, coffee()).unwrap();

        let response = get_records_page::<Transaction>(State(state), Extension(user_id)).await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_eq!(record_card_ids(&html), vec![record.id]);
        let list = html
            .select(&Selector::parse("#record-list").unwrap())
            .next()
            .expect("record list missing");
        assert_eq!(
            list.value().attr("sse-connect"),
            Some(endpoints::TRANSACTIONS_STREAM)
        );
    }

    #[tokio::test]
    async fn page_shows_empty_message() {
        let (state, user_id) = get_state();

        let response = get_records_page::<Goal>(State(state), Extension(user_id)).await;

        assert_status_ok(&response);
        let text = body_text(response).await;
        assert!(text.contains("No goals found. Add a new goal to get started!"));
    }

    #[tokio::test]
    async fn create_stores_record_and_returns_empty_form() {
        let (state, user_id) = get_state();

        let response = create_record::<Transaction>(
            State(state.clone()),
            Extension(user_id),
            Form(coffee_draft()),
        )
        .await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::TRANSACTIONS_API, "hx-post");
        assert_form_input_with_value(&form, "description", "text", "");
        let records = state.store.list::<Transaction>(user_id).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields, coffee());
    }

    #[tokio::test]
    async fn create_with_invalid_amount_keeps_draft() {
        let (state, user_id) = get_state();
        let draft = TransactionDraft {
            amount: "lots".to_owned(),
            ..coffee_draft()
        };

        let response =
            create_record::<Transaction>(State(state.clone()), Extension(user_id), Form(draft))
                .await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Amount must be a number.");
        assert_form_input_with_value(&form, "description", "text", "coffee");
        assert!(state.store.list::<Transaction>(user_id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_record() {
        let (state, user_id) = get_state();
        let record = state.store.create(user_id, coffee()).unwrap();
        let draft = TransactionDraft {
            amount: "5".to_owned(),
            category: "treats".to_owned(),
            description: "cake".to_owned(),
        };

        let response = update_record::<Transaction>(
            State(state.clone()),
            Extension(user_id),
            Path(record.id),
            Form(draft),
        )
        .await;

        assert_status_ok(&response);
        let got = state.store.get::<Transaction>(user_id, record.id).unwrap();
        assert_eq!(got.fields.description, "cake");
        assert_eq!(got.fields.category, "treats");
        assert_eq!(got.fields.amount, 5.0);
    }

    #[tokio::test]
    async fn update_missing_record_returns_no_content() {
        let (state, user_id) = get_state();

        let response = update_record::<Transaction>(
            State(state),
            Extension(user_id),
            Path(42),
            Form(coffee_draft()),
        )
        .await;

        assert_no_content(&response);
    }

    #[tokio::test]
    async fn delete_removes_record() {
        let (state, user_id) = get_state();
        let record = state.store.create(user_id, coffee()).unwrap();

        let response =
            delete_record::<Transaction>(State(state.clone()), Extension(user_id), Path(record.id))
                .await;

        assert_status_ok(&response);
        assert!(state.store.list::<Transaction>(user_id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_of_other_users_record_is_refused() {
        let (state, user_id) = get_state();
        let record = state.store.create(user_id, coffee()).unwrap();

        let response = delete_record::<Transaction>(
            State(state.clone()),
            Extension(UserID::new(user_id.as_i64() + 1)),
            Path(record.id),
        )
        .await;

        assert_no_content(&response);
        assert_eq!(state.store.list::<Transaction>(user_id).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn edit_form_is_filled_from_record() {
        let (state, user_id) = get_state();
        let goal = state
            .store
            .create(
                user_id,
                Goal {
                    name: "Bike".to_owned(),
                    target_amount: 800.0,
                    current_amount: 120.5,
                },
            )
            .unwrap();

        let response =
            get_edit_form::<Goal>(State(state), Extension(user_id), Path(goal.id)).await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, &format_endpoint(endpoints::GOAL, goal.id), "hx-put");
        assert_form_input_with_value(&form, "name", "text", "Bike");
        assert_form_input_with_value(&form, "targetAmount", "number", "800");
        assert_form_input_with_value(&form, "currentAmount", "number", "120.5");
    }

    #[tokio::test]
    async fn edit_form_for_missing_record_is_not_found() {
        let (state, user_id) = get_state();

        let response = get_edit_form::<Goal>(State(state), Extension(user_id), Path(3)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_form_posts_to_create() {
        let response = get_empty_form::<Goal>().await;

        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::GOALS_API, "hx-post");
        assert_form_input_with_value(&form, "name", "text", "");
    }

    #[tokio::test]
    async fn stream_sends_snapshot_then_changes() {
        let (state, user_id) = get_state();
        let mut list = LiveList::<Transaction>::new();
        list.set_identity(&state.store, Some(user_id)).unwrap();
        let mut stream = Box::pin(snapshot_stream(list));

        assert!(stream.next().await.is_some());

        state.store.create(user_id, coffee()).unwrap();
        assert!(stream.next().await.is_some());
    }

    #[tokio::test]
    async fn dropping_stream_releases_subscription() {
        let (state, user_id) = get_state();
        let mut list = LiveList::<Transaction>::new();
        list.set_identity(&state.store, Some(user_id)).unwrap();
        let stream = snapshot_stream(list);

        drop(stream);

        assert_eq!(state.store.transaction_feed().subscriber_count(user_id), 0);
    }
}
