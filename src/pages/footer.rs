use leptos::prelude::*;

pub const POWERED_BY: &str = "Powered by Redis and Golang";
pub const MADE_BY: &str = "Made by ";
pub const AUTHOR_NAME: &str = "Hemanth Reddy";
pub const AUTHOR_URL: &str = "https://schadokar.dev";

/// Attribution footer shown at the bottom of every page.
#[component]
pub fn Footer() -> impl IntoView {
    view! {
        <footer class="app-footer">
            <div class="footer-line">
                <h2 class="footer-heading">{POWERED_BY}</h2>
            </div>
            <div class="footer-line">
                <h2 class="footer-heading footer-credit">
                    {MADE_BY}
                    <a
                        href=AUTHOR_URL
                        target="_blank"
                        rel="noopener noreferrer"
                        class="footer-link"
                    >
                        {AUTHOR_NAME}
                    </a>
                </h2>
            </div>
        </footer>
    }
}
