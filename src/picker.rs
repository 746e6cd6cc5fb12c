//! A text input that suggests existing accounts or categories and creates a
//! new one when the typed name does not match any of them.

use maud::{Markup, html};

use crate::{
    Error,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The settings for a select-or-create input.
pub struct Picker<'a> {
    /// The form field name. Also used as the input ID.
    pub name: &'a str,
    pub label: &'a str,
    pub placeholder: &'a str,
    /// The names of the user's existing entities.
    pub options: &'a [String],
    /// The initial text of the input.
    pub value: &'a str,
    pub required: bool,
}

impl Picker<'_> {
    pub fn into_html(self) -> Markup {
        let list_id = format!("{}-options", self.name);

        html! {
            div
            {
                label for=(self.name) class=(FORM_LABEL_STYLE)
                {
                    (self.label)
                    @if !self.required {
                        span class="font-normal text-gray-500 dark:text-gray-400" { " (optional)" }
                    }
                }

                input
                    type="text"
                    name=(self.name)
                    id=(self.name)
                    list=(list_id)
                    value=(self.value)
                    placeholder=(self.placeholder)
                    autocomplete="off"
                    required[self.required]
                    class=(FORM_TEXT_INPUT_STYLE);

                datalist id=(list_id)
                {
                    @for name in self.options {
                        option value=(name) {}
                    }
                }
            }
        }
    }
}

/// Resolve the text typed into a picker to the ID of an entity.
///
/// `get_or_create` receives the trimmed name and should return the ID of the
/// matching entity, creating it first if there is none.
///
/// # Errors
///
/// Returns any error from `get_or_create`.
pub fn resolve_picker_value<F>(value: &str, get_or_create: F) -> Result<Option<String>, Error>
where
    F: FnOnce(&str) -> Result<String, Error>,
{
    let name = value.trim();

    if name.is_empty() {
        return Ok(None);
    }

    get_or_create(name).map(Some)
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::Error;

    use super::{Picker, resolve_picker_value};

    #[test]
    fn input_is_bound_to_datalist() {
        let options = ["Cash".to_owned(), "Credit Card".to_owned()];
        let markup = Picker {
            name: "account",
            label: "Account",
            placeholder: "Select or create an account",
            options: &options,
            value: "Cash",
            required: true,
        }
        .into_html()
        .into_string();
        let fragment = Html::parse_fragment(&markup);

        let input = fragment
            .select(&Selector::parse("input[name=account]").unwrap())
            .next()
            .expect("want picker input");
        assert_eq!(input.value().attr("list"), Some("account-options"));
        assert_eq!(input.value().attr("value"), Some("Cash"));
        assert!(input.value().attr("required").is_some());

        let got_options = fragment
            .select(&Selector::parse("datalist#account-options option").unwrap())
            .filter_map(|option| option.value().attr("value"))
            .collect::<Vec<_>>();
        assert_eq!(got_options, ["Cash", "Credit Card"]);
    }

    #[test]
    fn optional_picker_is_not_required() {
        let markup = Picker {
            name: "category",
            label: "Category",
            placeholder: "",
            options: &[],
            value: "",
            required: false,
        }
        .into_html()
        .into_string();
        let fragment = Html::parse_fragment(&markup);

        let input = fragment
            .select(&Selector::parse("input[name=category]").unwrap())
            .next()
            .expect("want picker input");
        assert!(input.value().attr("required").is_none());
    }

    #[test]
    fn blank_value_resolves_to_none() {
        let got = resolve_picker_value("   ", |_| panic!("should not be called"));

        assert_eq!(got, Ok(None));
    }

    #[test]
    fn name_is_trimmed_before_lookup() {
        let got = resolve_picker_value("  Groceries ", |name| {
            assert_eq!(name, "Groceries");
            Ok("abc".to_owned())
        });

        assert_eq!(got, Ok(Some("abc".to_owned())));
    }

    #[test]
    fn lookup_errors_are_returned() {
        let got = resolve_picker_value("Groceries", |_| Err(Error::DatabaseLockError));

        assert_eq!(got, Err(Error::DatabaseLockError));
    }
}
