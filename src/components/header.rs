use leptos::prelude::*;
use leptos_router::components::A;

/// Header component that shows the signed-in user and a logout button.
/// Expects a `ReadSignal<Option<String>>` holding the current username.
#[component]
pub fn Header(username: ReadSignal<Option<String>>) -> impl IntoView {
    view! {
        <header class="app-header">
            <div class="header-content">
                <A href="/">
                    <h1 class="app-title">"Chat"</h1>
                </A>
                <div class="header-actions">
                    <Show
                        when=move || username.get().is_some()
                        fallback=|| view! {
                            <A href="/" attr:class="header-button">
                                "Login"
                            </A>
                        }
                    >
                        <div style="display: flex; gap: 0.5rem; align-items: center;">
                            <span class="header-user">
                                {move || username.get().unwrap_or_default()}
                            </span>
                            <A href="/chat" attr:class="header-button">
                                "Chats"
                            </A>
                            <button
                                class="header-button"
                                on:click=move |_| {
                                    crate::session::sign_out();
                                    #[cfg(feature = "hydrate")]
                                    {
                                        if let Some(window) = web_sys::window() {
                                            window.location().set_href("/").ok();
                                        }
                                    }
                                }
                                type="button"
                            >
                                "Logout"
                            </button>
                        </div>
                    </Show>
                </div>
            </div>
        </header>
    }
}
