use crate::{components::header::Header, pages::footer::Footer};
use leptos::prelude::*;
use leptos_router::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    pub fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Log in to chat",
            AuthMode::Register => "Create an account",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Register",
        }
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            AuthMode::Login => "New here? Register",
            AuthMode::Register => "Already registered? Log in",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }
}

#[component]
pub fn HomePage() -> impl IntoView {
    let (mode, set_mode) = signal(AuthMode::Login);
    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_message, set_error_message) = signal(Option::<String>::None);
    let (success_message, set_success_message) = signal(Option::<String>::None);

    let (current_user, set_current_user) = signal(Option::<String>::None);

    // Pick up an existing session once hydrated
    #[cfg(feature = "hydrate")]
    Effect::new(move |_| {
        set_current_user.set(crate::session::current_user());
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = set_current_user;

    let navigate = hooks::use_navigate();

    let handle_submit = move |_| {
        let credentials = crate::shared::Credentials {
            username: username.get().trim().to_string(),
            password: password.get(),
        };
        let current_mode = mode.get();
        let navigate = navigate.clone();

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            if credentials.username.is_empty() || credentials.password.is_empty() {
                set_error_message.set(Some("Please enter a username and password".to_string()));
                return;
            }

            set_is_submitting.set(true);
            set_error_message.set(None);
            set_success_message.set(None);

            let result = match current_mode {
                AuthMode::Login => crate::client::login(&credentials).await,
                AuthMode::Register => crate::client::register(&credentials).await,
            };

            match result {
                Ok(response) if response.status => match current_mode {
                    AuthMode::Login => {
                        crate::session::sign_in(&credentials.username);
                        set_current_user.set(Some(credentials.username.clone()));
                        navigate("/chat", Default::default());
                    }
                    AuthMode::Register => {
                        set_success_message
                            .set(Some("Registered! You can log in now.".to_string()));
                        set_mode.set(AuthMode::Login);
                    }
                },
                Ok(response) => {
                    set_error_message.set(Some(
                        response
                            .message
                            .unwrap_or_else(|| "Request was rejected".to_string()),
                    ));
                }
                Err(e) => {
                    leptos::logging::error!("Authentication request failed: {}", e);
                    set_error_message.set(Some(e));
                }
            }
            set_is_submitting.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (credentials, current_mode, navigate, set_success_message);
            set_error_message.set(Some(
                "Client-side functionality not available in SSR".to_string(),
            ));
            set_is_submitting.set(false);
        }
    };

    view! {
        <div class="app-container">
            <Header username=current_user/>

            <div class="login-content">
                <div class="login-container">
                    <h1 class="login-title">{move || mode.get().title()}</h1>

                    <form
                        class="login-form"
                        on:submit=move |ev| {
                            ev.prevent_default();
                            handle_submit(());
                        }
                    >
                        <div class="form-group">
                            <label for="username" class="form-label">"Username"</label>
                            <input
                                type="text"
                                id="username"
                                name="username"
                                class="form-input"
                                placeholder="Enter your username"
                                prop:value=username
                                on:input=move |ev| {
                                    set_username.set(event_target_value(&ev));
                                }
                                prop:disabled=is_submitting
                            />
                        </div>

                        <div class="form-group">
                            <label for="password" class="form-label">"Password"</label>
                            <input
                                type="password"
                                id="password"
                                name="password"
                                class="form-input"
                                placeholder="Enter your password"
                                prop:value=password
                                on:input=move |ev| {
                                    set_password.set(event_target_value(&ev));
                                }
                                prop:disabled=is_submitting
                            />
                        </div>

                        <Show
                            when=move || error_message.get().is_some()
                            fallback=|| view! { <div></div> }
                        >
                            <div class="error-message">
                                {move || error_message.get().unwrap_or_default()}
                            </div>
                        </Show>

                        <Show
                            when=move || success_message.get().is_some()
                            fallback=|| view! { <div></div> }
                        >
                            <div class="success-message">
                                {move || success_message.get().unwrap_or_default()}
                            </div>
                        </Show>

                        <button
                            type="submit"
                            class="login-button"
                            prop:disabled=is_submitting
                        >
                            {move || {
                                if is_submitting.get() {
                                    "Please wait..."
                                } else {
                                    mode.get().submit_label()
                                }
                            }}
                        </button>
                    </form>

                    <button
                        type="button"
                        class="link-button"
                        on:click=move |_| {
                            set_error_message.set(None);
                            set_mode.update(|m| *m = m.toggled());
                        }
                    >
                        {move || mode.get().toggle_label()}
                    </button>
                </div>
            </div>

            <Footer/>
        </div>
    }
}
