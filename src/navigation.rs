//! The navigation bar: a header on wide screens and a tab bar at the bottom on
//! small ones.

use maud::{Markup, html};

use crate::endpoints;

/// Where a link is drawn. Each layout styles the current page differently.
#[derive(Debug, Clone, Copy)]
enum Layout {
    Header,
    TabBar,
}

impl Layout {
    fn link_style(self, is_current: bool) -> &'static str {
        match (self, is_current) {
            (Layout::Header, true) => {
                "rounded-md px-3 py-2 text-sm font-semibold text-teal-700 \
                bg-teal-50 dark:bg-teal-900/40 dark:text-teal-200"
            }
            (Layout::Header, false) => {
                "rounded-md px-3 py-2 text-sm font-medium text-gray-600 \
                hover:bg-gray-100 hover:text-gray-900 dark:text-gray-300 \
                dark:hover:bg-gray-800 dark:hover:text-white"
            }
            (Layout::TabBar, true) => {
                "flex items-center justify-center rounded-lg px-2 py-2 text-xs \
                font-semibold text-teal-700 bg-teal-50 dark:bg-teal-900/40 \
                dark:text-teal-200"
            }
            (Layout::TabBar, false) => {
                "flex items-center justify-center rounded-lg px-2 py-2 text-xs \
                font-medium text-gray-500 hover:text-teal-700 dark:text-gray-400"
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn render(&self, layout: Layout) -> Markup {
        html! {
            a
                href=(self.url)
                class=(layout.link_style(self.is_current))
                aria-current=[self.is_current.then_some("page")]
            {
                span class="truncate" { (self.title) }
            }
        }
    }
}

/// Links to the three main pages and to log out.
pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// The bar with the link to `active_endpoint` marked as the current page.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let pages = [
            (endpoints::TRANSACTIONS_VIEW, "Transactions"),
            (endpoints::ACCOUNTS_VIEW, "Accounts"),
            (endpoints::CATEGORIES_VIEW, "Categories"),
        ];

        let mut links = pages
            .into_iter()
            .map(|(url, title)| Link {
                url,
                title,
                is_current: url == active_endpoint,
            })
            .collect::<Vec<_>>();
        links.push(Link {
            url: endpoints::LOG_OUT,
            title: "Log out",
            is_current: false,
        });

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        html! {
            header class="border-b border-gray-200 bg-white dark:border-gray-800 dark:bg-gray-900"
            {
                nav class="mx-auto flex max-w-5xl items-center justify-between px-4 py-3"
                {
                    a href=(endpoints::ROOT) class="text-xl font-bold text-teal-700 dark:text-teal-400"
                    {
                        "Buddy"
                    }

                    ul class="hidden gap-1 lg:flex"
                    {
                        @for link in &self.links {
                            li { (link.render(Layout::Header)) }
                        }
                    }
                }
            }

            nav
                aria-label="Primary"
                class="fixed inset-x-0 bottom-0 z-40 border-t border-gray-200 bg-white/95
                    backdrop-blur lg:hidden dark:border-gray-800 dark:bg-gray-900/95"
            {
                ul class="grid grid-cols-4 gap-1 px-3 py-2"
                {
                    @for link in &self.links {
                        li class="min-w-0" { (link.render(Layout::TabBar)) }
                    }
                }
            }
        }
    }
}
