//! Assertions shared by the route handler tests.

#![allow(missing_docs)]

mod form;
mod html;
mod http;

pub(crate) use form::{
    assert_form_error_message, assert_form_input_with_value, assert_hx_endpoint, must_get_form,
    record_card_ids,
};
pub(crate) use html::{assert_valid_html, body_text, parse_html_document, parse_html_fragment};
pub(crate) use http::{assert_hx_redirect, assert_no_content, assert_status_ok};
