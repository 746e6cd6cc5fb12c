//! The transactions page: a list of the user's transactions, optionally
//! narrowed to one account, with the new and edit transaction sheets.

use axum::{
    Extension,
    extract::{Query, State},
    http::Uri,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    account::{Account, get_account, get_all_accounts},
    auth::UserID,
    category::get_category,
    db::lock_connection,
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    sheet::{Sheet, SheetQuery, edit_sheet_url, new_sheet_url, sheet_delete_button, sheet_view},
    timezone::local_today,
    transaction::{
        TransactionState,
        core::{TransactionFilter, TransactionListItem, get_transaction, get_transactions},
        form::{TransactionForm, TransactionFormAction, render_transaction_form},
    },
};

const DELETE_TRANSACTION_CONFIRM_MESSAGE: &str =
    "Are you sure you want to delete this transaction?";

/// The query parameters for the transactions page.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsPageQuery {
    #[serde(flatten)]
    pub sheet: SheetQuery,
    /// Only show the transactions in this account.
    pub account_id: Option<String>,
}

/// Append the account filter to a URL for the transactions page.
fn with_account_filter(url: &str, account: Option<&Account>) -> String {
    match account {
        None => url.to_owned(),
        Some(account) => {
            let separator = if url.contains('?') { '&' } else { '?' };
            format!("{url}{separator}account_id={}", account.id)
        }
    }
}

#[derive(Deserialize)]
struct AccountFilterQuery {
    account_id: Option<String>,
}

/// The transactions page URL to return to after a change made from
/// `current_url`, keeping its account filter.
pub(crate) fn transactions_view_url(current_url: Option<&Uri>) -> String {
    let account_id = current_url
        .filter(|uri| uri.path() == endpoints::TRANSACTIONS_VIEW)
        .and_then(Uri::query)
        .and_then(|query| serde_urlencoded::from_str::<AccountFilterQuery>(query).ok())
        .and_then(|query| query.account_id)
        .filter(|account_id| !account_id.trim().is_empty());

    account_id
        .and_then(|account_id| serde_urlencoded::to_string([("account_id", account_id)]).ok())
        .map(|query| format!("{}?{query}", endpoints::TRANSACTIONS_VIEW))
        .unwrap_or_else(|| endpoints::TRANSACTIONS_VIEW.to_owned())
}

fn account_filter_links(accounts: &[Account], selected: Option<&Account>) -> Markup {
    let pill_style = |is_selected: bool| {
        if is_selected {
            "px-3 py-1 rounded-full text-sm bg-blue-600 text-white"
        } else {
            "px-3 py-1 rounded-full text-sm bg-gray-100 text-gray-700 \
            hover:bg-gray-200 dark:bg-gray-700 dark:text-gray-200"
        }
    };

    html! {
        nav class="flex flex-wrap gap-2" aria-label="Filter by account"
        {
            a
                href=(endpoints::TRANSACTIONS_VIEW)
                class=(pill_style(selected.is_none()))
                aria-current=[selected.is_none().then_some("page")]
            {
                "All accounts"
            }

            @for account in accounts {
                @let is_selected = selected.is_some_and(|selected| selected.id == account.id);
                a
                    href=(with_account_filter(endpoints::TRANSACTIONS_VIEW, Some(account)))
                    class=(pill_style(is_selected))
                    aria-current=[is_selected.then_some("page")]
                {
                    (account.name)
                }
            }
        }
    }
}

fn transaction_row(item: &TransactionListItem, selected: Option<&Account>) -> Markup {
    let transaction = &item.transaction;
    let amount_style = if transaction.amount.is_negative() {
        "text-right whitespace-nowrap"
    } else {
        "text-right whitespace-nowrap text-green-600 dark:text-green-400"
    };

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(transaction.date) { (transaction.date) }
            }

            td class=(TABLE_CELL_STYLE)
            {
                span class="font-medium text-gray-900 dark:text-white" { (transaction.payee) }

                @if !transaction.notes.is_empty() {
                    br;
                    span class="text-xs" { (transaction.notes) }
                }
            }

            td class=(TABLE_CELL_STYLE) { (item.account_name) }

            td class=(TABLE_CELL_STYLE)
            {
                @match &item.category_name {
                    Some(name) => { (name) }
                    None => { span class="italic text-gray-400" { "Uncategorised" } }
                }
            }

            td class={ (TABLE_CELL_STYLE) " " (amount_style) }
            {
                (format_currency(transaction.amount))
            }

            td class=(TABLE_CELL_STYLE)
            {
                (edit_delete_action_links(
                    &with_account_filter(
                        &edit_sheet_url(endpoints::TRANSACTIONS_VIEW, &transaction.id),
                        selected,
                    ),
                    &format_endpoint(endpoints::TRANSACTION, &transaction.id),
                    DELETE_TRANSACTION_CONFIRM_MESSAGE,
                    "closest tr",
                    "delete",
                ))
            }
        }
    }
}

fn transactions_view(
    items: &[TransactionListItem],
    accounts: &[Account],
    selected: Option<&Account>,
    sheet: Option<Markup>,
) -> Markup {
    let new_transaction_url =
        with_account_filter(&new_sheet_url(endpoints::TRANSACTIONS_VIEW), selected);

    let content = html! {
        (NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold"
                    {
                        "Transactions"
                        @if let Some(account) = selected {
                            span class="font-normal text-gray-500 dark:text-gray-400"
                            {
                                " in " (account.name)
                            }
                        }
                    }

                    a href=(new_transaction_url) class=(LINK_STYLE) { "New Transaction" }
                }

                @if !accounts.is_empty() {
                    (account_filter_links(accounts, selected))
                }

                div class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Payee" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Account" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class={ (TABLE_CELL_STYLE) " text-right" } { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for item in items {
                                (transaction_row(item, selected))
                            }

                            @if items.is_empty() {
                                tr
                                {
                                    td
                                        colspan="6"
                                        class="px-6 py-4 text-center"
                                    {
                                        "No transactions yet. Create a transaction "
                                        a href=(new_transaction_url) class=(LINK_STYLE) { "here" }
                                        "."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }

        @if let Some(sheet) = sheet {
            (sheet)
        }
    };

    base("Transactions", &content)
}

fn edit_transaction_sheet_content(
    transaction_id: &str,
    today: Date,
    user_id: UserID,
    connection: &Connection,
) -> Result<Markup, Error> {
    let transaction = match get_transaction(transaction_id, user_id, connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => {
            return Ok(html! {
                p class="text-gray-500 dark:text-gray-400" { "Transaction not found" }
            });
        }
        Err(error) => return Err(error),
    };

    let account = get_account(&transaction.account_id, user_id, connection)?;
    let category = transaction
        .category_id
        .as_deref()
        .map(|category_id| get_category(category_id, user_id, connection))
        .transpose()?;
    let values = TransactionForm::from_transaction(
        &transaction,
        account.name.as_ref(),
        category.as_ref().map(|category| category.name.as_ref()),
    );

    let form = render_transaction_form(
        TransactionFormAction::Edit {
            transaction_id: &transaction.id,
        },
        &values,
        today,
        None,
        user_id,
        connection,
    )?;

    Ok(html! {
        (form)
        (sheet_delete_button(
            &format_endpoint(endpoints::TRANSACTION, &transaction.id),
            DELETE_TRANSACTION_CONFIRM_MESSAGE,
            "Delete Transaction",
        ))
    })
}

/// Renders the transactions page, with a sheet on top if one is open.
///
/// An `account_id` that is not one of the user's accounts is ignored.
pub async fn get_transactions_page(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TransactionsPageQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let accounts = get_all_accounts(user_id, &connection)?;
    let selected = query
        .account_id
        .as_deref()
        .and_then(|account_id| accounts.iter().find(|account| account.id == account_id));
    let filter = TransactionFilter {
        account_id: selected.map(|account| account.id.clone()),
    };
    let items = get_transactions(user_id, &filter, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    let close_url = with_account_filter(endpoints::TRANSACTIONS_VIEW, selected);
    let sheet = match Sheet::from_query(&query.sheet) {
        Sheet::Closed => None,
        Sheet::New => {
            let mut values = TransactionForm::empty(today);
            if let Some(account) = selected {
                values.account = account.name.to_string();
            }
            let form = render_transaction_form(
                TransactionFormAction::Create,
                &values,
                today,
                None,
                user_id,
                &connection,
            )?;

            Some(sheet_view(
                "New Transaction",
                "Record money spent or earned.",
                &close_url,
                &form,
            ))
        }
        Sheet::Edit(transaction_id) => {
            let content =
                edit_transaction_sheet_content(&transaction_id, today, user_id, &connection)?;

            Some(sheet_view(
                "Edit Transaction",
                "Edit an existing transaction.",
                &close_url,
                &content,
            ))
        }
    };

    Ok(transactions_view(&items, &accounts, selected, sheet).into_response())
}
