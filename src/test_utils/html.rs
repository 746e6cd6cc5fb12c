//! Parsing rendered pages and checking the forms and alerts in them.

use axum::{body::Body, response::Response};
use scraper::{ElementRef, Html, Selector};

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    String::from_utf8_lossy(&bytes).into_owned()
}

pub(crate) async fn parse_html_document(response: Response<Body>) -> Html {
    Html::parse_document(&body_text(response).await)
}

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    Html::parse_fragment(&body_text(response).await)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(html.errors.is_empty(), "HTML parse errors: {:?}", html.errors);
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|error| panic!("bad selector {css:?}: {error}"))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

/// Assert that `html` holds an alert whose headline is `want_message`.
#[track_caller]
pub(crate) fn assert_alert_message(html: &Html, want_message: &str) {
    let headline = html
        .select(&selector("div[role] span.font-medium"))
        .next()
        .map(text_of);

    assert_eq!(headline.as_deref(), Some(want_message), "alert headline");
}

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    html.select(&selector("form")).next().expect("No form found")
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef<'_>, endpoint: &str, attribute: &str) {
    assert_eq!(
        form.value().attr(attribute),
        Some(endpoint),
        "form attribute {attribute}"
    );
}

#[track_caller]
fn find_input<'a>(form: &ElementRef<'a>, name: &str) -> ElementRef<'a> {
    form.select(&selector(&format!("input[name={name:?}]")))
        .next()
        .unwrap_or_else(|| panic!("No input named {name:?}"))
}

/// Assert that `form` has a required input called `name` of type `type_`.
#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef<'_>, name: &str, type_: &str) {
    let input = find_input(form, name);

    assert_eq!(input.value().attr("type"), Some(type_), "type of input {name:?}");
    assert!(
        input.value().attr("required").is_some(),
        "input {name:?} should be required"
    );
}

/// Like [assert_form_input], and the input is prefilled with `value`.
#[track_caller]
pub(crate) fn assert_form_input_with_value(
    form: &ElementRef<'_>,
    name: &str,
    type_: &str,
    value: &str,
) {
    assert_form_input(form, name, type_);

    let input = find_input(form, name);
    assert_eq!(
        input.value().attr("value").unwrap_or_default(),
        value,
        "value of input {name:?}"
    );
}

#[track_caller]
fn first_button<'a>(form: &ElementRef<'a>) -> ElementRef<'a> {
    let button = form.select(&selector("button")).next().expect("No button found");
    assert_eq!(button.value().attr("type"), Some("submit"), "button type");

    button
}

#[track_caller]
pub(crate) fn assert_form_submit_button(form: &ElementRef<'_>) {
    first_button(form);
}

#[track_caller]
pub(crate) fn assert_form_submit_button_with_text(form: &ElementRef<'_>, text: &str) {
    assert_eq!(text_of(first_button(form)), text);
}

/// Assert that the first paragraph in `form` reads `want_error_message`.
///
/// Forms render their error message before any other paragraph.
#[track_caller]
pub(crate) fn assert_form_error_message(form: &ElementRef<'_>, want_error_message: &str) {
    let message = form.select(&selector("p")).next().map(text_of);

    assert_eq!(message.as_deref(), Some(want_error_message), "form error");
}
