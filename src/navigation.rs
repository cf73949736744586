//! This file defines the templates and a convenience function for creating the navigation bar.

use maud::{Markup, html};

use crate::endpoints;

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-amber-700 rounded-sm md:bg-transparent
        md:text-amber-700 md:p-0 dark:text-white md:dark:text-amber-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        md:hover:bg-transparent md:border-0 md:hover:text-amber-700 md:p-0
        dark:text-white md:dark:hover:text-amber-500 dark:hover:bg-gray-700
        dark:hover:text-white md:dark:hover:bg-transparent"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    /// The log-in link is only shown when `is_logged_in` is `false`.
    pub fn new(active_endpoint: &str, is_logged_in: bool) -> NavBar<'_> {
        let mut links = vec![
            Link {
                url: endpoints::ROOT,
                title: "Menu",
                is_current: active_endpoint == endpoints::ROOT,
            },
            Link {
                url: endpoints::CART_VIEW,
                title: "Cart",
                is_current: active_endpoint == endpoints::CART_VIEW,
            },
            Link {
                url: endpoints::TRANSACTIONS_VIEW,
                title: "Purchases",
                is_current: active_endpoint == endpoints::TRANSACTIONS_VIEW,
            },
        ];

        if !is_logged_in {
            links.push(Link {
                url: endpoints::LOG_IN_VIEW,
                title: "Log in",
                is_current: active_endpoint == endpoints::LOG_IN_VIEW,
            });
        }

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::ROOT)
                        class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        span
                            class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Cafe"
                        }
                    }

                    ul
                        class="font-medium flex flex-row space-x-4 md:space-x-8
                        rtl:space-x-reverse dark:bg-gray-900"
                    {
                        @for link in self.links {
                            li { (link.into_html()) }
                        }
                    }
                }
            }
        )
    }
}
