//! Lists a user's accounts, with the new and edit account sheets on top.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    account::{
        Account, AccountState,
        core::{get_account, get_all_accounts},
        form::{AccountFormAction, account_form},
    },
    auth::UserID,
    db::lock_connection,
    endpoints::{self, format_endpoint},
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links,
    },
    navigation::NavBar,
    sheet::{Sheet, SheetQuery, edit_sheet_url, new_sheet_url, sheet_delete_button, sheet_view},
};

pub(crate) const DELETE_ACCOUNT_CONFIRM_MESSAGE: &str =
    "Are you sure you want to delete this account? All of its transactions will be deleted too.";

fn accounts_view(accounts: &[Account], sheet: Option<Markup>) -> Markup {
    let new_account_url = new_sheet_url(endpoints::ACCOUNTS_VIEW);
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW).into_html();

    let table_row = |account: &Account| {
        let action_links = edit_delete_action_links(
            &edit_sheet_url(endpoints::ACCOUNTS_VIEW, &account.id),
            &format_endpoint(endpoints::ACCOUNT, &account.id),
            DELETE_ACCOUNT_CONFIRM_MESSAGE,
            "closest tr",
            "delete",
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (account.name)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    a
                        href=(format!("{}?account_id={}", endpoints::TRANSACTIONS_VIEW, account.id))
                        class=(LINK_STYLE)
                    {
                        "View transactions"
                    }
                }

                td class=(TABLE_CELL_STYLE) { (action_links) }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Accounts" }

                    a href=(new_account_url) class=(LINK_STYLE) { "New Account" }
                }

                div class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Transactions" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for account in accounts {
                                (table_row(account))
                            }

                            @if accounts.is_empty() {
                                tr
                                {
                                    td
                                        colspan="3"
                                        class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        "No accounts yet. Create an account "
                                        a href=(new_account_url) class=(LINK_STYLE) { "here" }
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
    );

    base("Accounts", &content)
}

fn new_account_sheet() -> Markup {
    sheet_view(
        "New Account",
        "Create a new account to track your transactions.",
        endpoints::ACCOUNTS_VIEW,
        &account_form(AccountFormAction::Create, "", None),
    )
}

fn edit_account_sheet(account: Option<&Account>) -> Markup {
    let content = match account {
        Some(account) => html! {
            (account_form(AccountFormAction::Edit { account_id: &account.id }, account.name.as_ref(), None))
            (sheet_delete_button(
                &format_endpoint(endpoints::ACCOUNT, &account.id),
                DELETE_ACCOUNT_CONFIRM_MESSAGE,
                "Delete Account",
            ))
        },
        None => html! {
            p class="text-gray-500 dark:text-gray-400" { "Account not found" }
        },
    };

    sheet_view(
        "Edit Account",
        "Edit an existing account.",
        endpoints::ACCOUNTS_VIEW,
        &content,
    )
}

/// Renders the accounts page, with a sheet on top if one is open.
pub async fn get_accounts_page(
    State(state): State<AccountState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<SheetQuery>,
) -> Result<Response, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let accounts = get_all_accounts(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get all accounts: {error}"))?;

    let sheet = match Sheet::from_query(&query) {
        Sheet::Closed => None,
        Sheet::New => Some(new_account_sheet()),
        Sheet::Edit(account_id) => match get_account(&account_id, user_id, &connection) {
            Ok(account) => Some(edit_account_sheet(Some(&account))),
            Err(Error::NotFound) => Some(edit_account_sheet(None)),
            Err(error) => return Err(error),
        },
    };

    Ok(accounts_view(&accounts, sheet).into_response())
}
