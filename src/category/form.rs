use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, submit_button},
};

/// The form for creating a category, or editing the category with the given ID.
pub(crate) fn category_form(
    category_id: Option<&str>,
    name: &str,
    error_message: Option<&str>,
) -> Markup {
    let hx_post = category_id
        .is_none()
        .then_some(endpoints::CATEGORIES_API);
    let hx_put = category_id.map(|id| format_endpoint(endpoints::CATEGORY, id));
    let button_text = if category_id.is_some() {
        "Save Changes"
    } else {
        "Create Category"
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#name, #submit-button"
            class="w-full space-y-4 md:space-y-6"
        {
            @if let Some(error_message) = error_message {
                p class="text-red-500 text-base" { (error_message) }
            }

            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    type="text"
                    name="name"
                    id="name"
                    value=(name)
                    placeholder="e.g. Food, Entertainment, ..."
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            (submit_button(button_text))
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{
        endpoints,
        test_utils::{
            assert_form_error_message, assert_form_input_with_value,
            assert_form_submit_button_with_text, assert_hx_endpoint, assert_valid_html,
            must_get_form,
        },
    };

    use super::category_form;

    #[test]
    fn new_category_form() {
        let html = Html::parse_fragment(&category_form(None, "", None).into_string());
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::CATEGORIES_API, "hx-post");
        assert_form_input_with_value(&form, "name", "text", "");
        assert_form_submit_button_with_text(&form, "Create Category");

        let input = form
            .select(&Selector::parse("input[name=name]").unwrap())
            .next()
            .unwrap();
        assert_eq!(
            input.value().attr("placeholder"),
            Some("e.g. Food, Entertainment, ...")
        );
    }

    #[test]
    fn edit_category_form_with_error() {
        let html = Html::parse_fragment(
            &category_form(Some("xyz"), "", Some("Error: Category name cannot be empty"))
                .into_string(),
        );

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/categories/xyz", "hx-put");
        assert_form_submit_button_with_text(&form, "Save Changes");
        assert_form_error_message(&form, "Error: Category name cannot be empty");
    }
}
