//! Markup shared by the transactions and goals pages.

use std::fmt::Debug;

use maud::{Markup, html};

use crate::{
    endpoints::format_endpoint,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, base, loading_spinner, sse_extension,
    },
    navigation::NavBar,
    record::{Draft, DraftError, RecordForm},
    store::{Record, RecordKind},
};

/// The id of the form element, targeted by the edit and cancel actions.
pub const FORM_ID: &str = "record-form";
/// The server-sent event carrying a freshly rendered list.
pub const SNAPSHOT_EVENT: &str = "snapshot";

/// How a kind of record is presented and which routes serve it.
pub trait RecordView: RecordKind + Debug + PartialEq {
    /// The draft edited in this kind's form.
    type Draft: Draft<Kind = Self>;

    /// The page heading, e.g. "Transactions".
    const TITLE: &'static str;
    /// The singular noun used on buttons, e.g. "Transaction".
    const NOUN: &'static str;
    /// The page listing the records.
    const PAGE: &'static str;
    /// The route records are created at.
    const CREATE: &'static str;
    /// The route a single record is replaced or deleted at.
    const RECORD: &'static str;
    /// The route of the form pre-filled with a record.
    const EDIT_FORM: &'static str;
    /// The route of an empty form.
    const EMPTY_FORM: &'static str;
    /// The server-sent event stream of the rendered list.
    const STREAM: &'static str;
    /// Shown in place of the list when the collection is empty.
    const EMPTY_MESSAGE: &'static str;

    /// The body of the card for a record, without the actions.
    fn card(record: &Record<Self>) -> Markup;

    /// The inputs of the form, filled from `draft`.
    fn form_fields(draft: &Self::Draft) -> Markup;
}

/// The create/edit form. Submitting swaps the form for the response.
pub fn record_form_view<V: RecordView>(
    form: &RecordForm<V::Draft>,
    error: Option<&DraftError>,
) -> Markup {
    let heading = match form.editing_id() {
        Some(_) => format!("Edit {}", V::NOUN),
        None => format!("Add New {}", V::NOUN),
    };
    let update_url = form
        .editing_id()
        .map(|id| format_endpoint(V::RECORD, id));

    html! {
        form
            id=(FORM_ID)
            class="w-full space-y-4 md:space-y-6"
            hx-post=[update_url.is_none().then_some(V::CREATE)]
            hx-put=[update_url.as_deref()]
            hx-target="this"
            hx-swap="outerHTML"
            hx-disabled-elt="find button"
        {
            h2 class="text-lg font-semibold" { (heading) }

            (V::form_fields(form.draft()))

            @if let Some(error) = error
            {
                p class="text-red-500 text-base" { (error) }
            }

            div class="flex gap-4"
            {
                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="inline htmx-indicator" { (loading_spinner()) }
                    @if form.editing_id().is_some() { "Update" } @else { "Add" }
                }

                @if form.editing_id().is_some()
                {
                    button
                        type="button"
                        class=(BUTTON_SECONDARY_STYLE)
                        hx-get=(V::EMPTY_FORM)
                        hx-target={ "#" (FORM_ID) }
                        hx-swap="outerHTML"
                    {
                        "Cancel"
                    }
                }
            }
        }
    }
}

/// The cards for every record, or the empty message.
pub fn record_list_view<V: RecordView>(records: &[Record<V>]) -> Markup {
    html! {
        @if records.is_empty()
        {
            p class="text-center text-gray-500 dark:text-gray-400" { (V::EMPTY_MESSAGE) }
        }
        @else
        {
            ul class="space-y-4"
            {
                @for record in records
                {
                    li class=(CARD_STYLE) data-record-id=(record.id)
                    {
                        (V::card(record))

                        div class="mt-2 flex items-center gap-4 text-sm"
                        {
                            button
                                type="button"
                                class=(LINK_STYLE)
                                hx-get=(format_endpoint(V::EDIT_FORM, record.id))
                                hx-target={ "#" (FORM_ID) }
                                hx-swap="outerHTML"
                            {
                                "Edit"
                            }

                            button
                                type="button"
                                class=(BUTTON_DELETE_STYLE)
                                hx-delete=(format_endpoint(V::RECORD, record.id))
                                hx-swap="none"
                            {
                                "Delete"
                            }
                        }
                    }
                }
            }
        }
    }
}

/// The full page: navigation, the form and the live list.
///
/// The list is rendered once here and then replaced by every event on the
/// record stream.
pub fn record_page_view<V: RecordView>(records: &[Record<V>]) -> Markup {
    let nav_bar = NavBar::new(V::PAGE).into_html();
    let form = RecordForm::<V::Draft>::new();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-md space-y-6"
            {
                h1 class="text-xl font-bold" { (V::TITLE) }

                (record_form_view::<V>(&form, None))

                div
                    id="record-list"
                    hx-ext="sse"
                    sse-connect=(V::STREAM)
                    sse-swap=(SNAPSHOT_EVENT)
                {
                    (record_list_view(records))
                }
            }
        }
    };

    base(V::TITLE, &[sse_extension()], &content)
}
