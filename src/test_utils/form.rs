use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&Selector::parse("form").unwrap())
        .next()
        .expect("No form found")
}

/// Assert that `form` sends its request to `endpoint` via the htmx `attribute`,
/// e.g. "hx-post" or "hx-put".
#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    let got = form
        .value()
        .attr(attribute)
        .unwrap_or_else(|| panic!("{attribute} attribute missing"));

    assert_eq!(
        got, endpoint,
        "want form with attribute {attribute}=\"{endpoint}\", got {got:?}"
    );
}

/// Assert that `form` has a required input called `name` of type `type_`
/// holding `value`.
#[track_caller]
pub(crate) fn assert_form_input_with_value(
    form: &ElementRef<'_>,
    name: &str,
    type_: &str,
    value: &str,
) {
    let selector = Selector::parse(&format!("input[name=\"{name}\"]")).unwrap();
    let input = form
        .select(&selector)
        .next()
        .unwrap_or_else(|| panic!("No input found with name \"{name}\""));
    let input = input.value();

    assert_eq!(
        input.attr("type").unwrap_or_default(),
        type_,
        "want input {name} with type \"{type_}\""
    );
    assert_eq!(
        input.attr("value").unwrap_or_default(),
        value,
        "want input {name} with value \"{value}\""
    );
    assert!(
        input.attr("required").is_some(),
        "want input with name {name} to have the required attribute but got none"
    );
}

/// Assert that the validation message shown in `form` reads `want_error_message`.
#[track_caller]
pub(crate) fn assert_form_error_message(form: &ElementRef<'_>, want_error_message: &str) {
    let error_message = form
        .select(&Selector::parse("p.text-red-500").unwrap())
        .next()
        .expect("No error message found")
        .text()
        .collect::<String>();

    assert_eq!(want_error_message, error_message.trim());
}

/// The IDs of the record cards in a rendered list, in display order.
#[track_caller]
pub(crate) fn record_card_ids(html: &Html) -> Vec<i64> {
    html.select(&Selector::parse("li[data-record-id]").unwrap())
        .map(|card| {
            card.value()
                .attr("data-record-id")
                .and_then(|id| id.parse().ok())
                .expect("Record card with an invalid ID")
        })
        .collect()
}
