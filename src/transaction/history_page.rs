//! The purchase history page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};
use time_tz::Tz;

use crate::{
    AppState, Error, endpoints,
    html::{
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, link,
    },
    navigation::NavBar,
    timezone::{get_offset_at, try_get_timezone},
    transaction::{TransactionSummary, get_transaction_history},
    user::User,
};

/// The state needed for the purchase history page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the logged-in user's purchases, newest first.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Extension(user): Extension<User>,
) -> Result<Response, Error> {
    let local_timezone = try_get_timezone(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let history = get_transaction_history(user.id, &connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve purchases for {}: {error}", user.id)
    })?;

    Ok(transactions_view(&history, local_timezone).into_response())
}

const LOCAL_TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

/// Format `date_time` in `local_timezone` as "YYYY-MM-DD HH:MM".
fn format_local_time(date_time: OffsetDateTime, local_timezone: &Tz) -> String {
    let local = date_time.to_offset(get_offset_at(local_timezone, date_time));

    local
        .format(LOCAL_TIME_FORMAT)
        .unwrap_or_else(|_| local.to_string())
}

fn transactions_view(history: &[TransactionSummary], local_timezone: &Tz) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW, true).into_html();

    let transaction_card = |summary: &TransactionSummary| {
        html!(
            article
                class="w-full bg-white rounded-lg shadow dark:bg-gray-800"
                data-transaction-id=(summary.id)
            {
                header class="flex justify-between px-6 py-4"
                {
                    h2 class="font-semibold" { "Order #" (summary.id) }
                    span class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        (format_local_time(summary.created_at, local_timezone))
                    }
                }

                @if summary.lines.is_empty() {
                    p class="px-6 pb-4 text-gray-500 dark:text-gray-400" { "No items." }
                } @else {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Product" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Quantity" }
                            }
                        }

                        tbody
                        {
                            @for line in &summary.lines {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        @match &line.product_name {
                                            Some(name) => { (name) }
                                            None => { span class="italic" { "Unavailable product" } }
                                        }
                                    }
                                    td class=(TABLE_CELL_STYLE) { (line.quantity) }
                                }
                            }
                        }
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-3xl space-y-4"
            {
                h1 class="text-xl font-bold" { "Purchases" }

                @for summary in history {
                    (transaction_card(summary))
                }

                @if history.is_empty() {
                    p
                    {
                        "You have not bought anything yet. "
                        (link(endpoints::ROOT, "Browse the menu"))
                    }
                }
            }
        }
    );

    base("Purchases", &content)
}
