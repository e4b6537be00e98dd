use maud::{Markup, html};

use crate::{
    endpoints,
    html::{TAG_BADGE_STYLE, form_input, format_currency},
    record::RecordView,
    store::Record,
    transaction::{Transaction, TransactionDraft},
};

impl RecordView for Transaction {
    type Draft = TransactionDraft;

    const TITLE: &'static str = "Transactions";
    const NOUN: &'static str = "Transaction";
    const PAGE: &'static str = endpoints::TRANSACTIONS_VIEW;
    const CREATE: &'static str = endpoints::TRANSACTIONS_API;
    const RECORD: &'static str = endpoints::TRANSACTION;
    const EDIT_FORM: &'static str = endpoints::EDIT_TRANSACTION_FORM;
    const EMPTY_FORM: &'static str = endpoints::TRANSACTION_FORM;
    const STREAM: &'static str = endpoints::TRANSACTIONS_STREAM;
    const EMPTY_MESSAGE: &'static str = "No transactions found. Add a new one to get started!";

    fn card(record: &Record<Self>) -> Markup {
        let transaction = &record.fields;

        html! {
            div class="flex items-start justify-between gap-3"
            {
                div class="text-sm font-semibold tabular-nums text-gray-900 dark:text-white"
                { (format_currency(transaction.amount)) }

                span class=(TAG_BADGE_STYLE) { (transaction.category) }
            }

            p class="mt-1 text-sm text-gray-500 dark:text-gray-400" { (transaction.description) }
        }
    }

    fn form_fields(draft: &TransactionDraft) -> Markup {
        html! {
            (form_input("Amount", "amount", "number", &draft.amount, "Amount"))
            (form_input("Category", "category", "text", &draft.category, "Category"))
            (form_input("Description", "description", "text", &draft.description, "Description"))
        }
    }
}
