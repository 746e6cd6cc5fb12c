//! Every route the server answers.
//!
//! Routes with a `{param}` segment are filled in with [format_endpoint].

// Pages.
pub const ROOT: &str = "/";
pub const TRANSACTIONS_VIEW: &str = "/transactions";
pub const ACCOUNTS_VIEW: &str = "/accounts";
pub const CATEGORIES_VIEW: &str = "/categories";
pub const REGISTER_VIEW: &str = "/register";
pub const LOG_IN_VIEW: &str = "/log_in";
/// Where htmx clients are sent after an unrecoverable error.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
pub const STATIC: &str = "/static";

// API.
pub const LOG_IN_API: &str = "/api/log_in";
pub const LOG_OUT: &str = "/api/log_out";
/// Registration posts here.
pub const USERS: &str = "/api/users";
pub const ACCOUNTS_API: &str = "/api/accounts";
pub const ACCOUNT: &str = "/api/accounts/{account_id}";
pub const CATEGORIES_API: &str = "/api/categories";
pub const CATEGORY: &str = "/api/categories/{category_id}";
pub const TRANSACTIONS_API: &str = "/api/transactions";
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";

/// Put `id` in place of the first `{param}` segment of `endpoint_path`.
///
/// Paths without a parameter come back unchanged. An unclosed `{` swallows
/// the rest of the path.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let Some((before, param_and_after)) = endpoint_path.split_once('{') else {
        return endpoint_path.to_owned();
    };

    let after = param_and_after
        .split_once('}')
        .map_or("", |(_, after)| after);

    [before, id, after].concat()
}

#[cfg(test)]
mod tests {
    use axum::http::Uri;

    use super::*;

    #[test]
    fn every_route_parses_as_a_uri() {
        let routes = [
            ROOT,
            TRANSACTIONS_VIEW,
            ACCOUNTS_VIEW,
            CATEGORIES_VIEW,
            REGISTER_VIEW,
            LOG_IN_VIEW,
            INTERNAL_ERROR_VIEW,
            STATIC,
            LOG_IN_API,
            LOG_OUT,
            USERS,
            ACCOUNTS_API,
            ACCOUNT,
            CATEGORIES_API,
            CATEGORY,
            TRANSACTIONS_API,
            TRANSACTION,
        ];

        for route in routes {
            assert!(route.parse::<Uri>().is_ok(), "{route} is not a valid URI");
        }
    }

    #[test]
    fn fills_in_the_parameter() {
        let cases = [
            ("/hello/{world_id}", "/hello/abc123"),
            ("/hello/{world}", "/hello/abc123"),
            ("/hello/{world}/bye", "/hello/abc123/bye"),
            ("/hello/world", "/hello/world"),
            ("/hello/{world", "/hello/abc123"),
        ];

        for (path, want) in cases {
            let got = format_endpoint(path, "abc123");

            assert_eq!(got, want);
            assert!(got.parse::<Uri>().is_ok());
        }
    }

    #[test]
    fn formatted_routes_point_at_one_entity() {
        assert_eq!(format_endpoint(ACCOUNT, "a1"), "/api/accounts/a1");
        assert_eq!(format_endpoint(CATEGORY, "c1"), "/api/categories/c1");
        assert_eq!(format_endpoint(TRANSACTION, "t1"), "/api/transactions/t1");
    }
}
