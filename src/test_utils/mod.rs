#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

use rusqlite::Connection;

use crate::{AppState, db::initialize};

pub(crate) use form::{
    assert_form_action, assert_form_input_with_value, assert_form_submit_button_with_text,
    must_get_form,
};
pub(crate) use html::{assert_valid_html, parse_html_document};
pub(crate) use http::{assert_redirect, assert_status_ok};

/// An in-memory database with the tables created and the seed data inserted.
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");
    connection
}

/// App state backed by a fresh in-memory database.
pub(crate) fn get_test_app_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(connection, "foobar", "Etc/UTC").expect("Could not create app state.")
}
