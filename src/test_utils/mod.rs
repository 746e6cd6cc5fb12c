#![allow(missing_docs)]

mod db;
mod html;
mod response;

pub(crate) use db::must_create_test_connection;
pub(crate) use html::{
    assert_alert_message, assert_form_error_message, assert_form_input,
    assert_form_input_with_value, assert_form_submit_button, assert_form_submit_button_with_text,
    assert_hx_endpoint, assert_valid_html, must_get_form, parse_html_document,
    parse_html_fragment,
};
pub(crate) use response::{assert_hx_redirect, assert_status_ok};
