use crate::{
    components::header::Header,
    pages::footer::Footer,
    shared::{Chat, ContactList},
};
use leptos::prelude::*;

/// Formats a Unix timestamp for the conversation view.
pub fn format_timestamp(timestamp: i64) -> String {
    let secs = timestamp.rem_euclid(86_400);
    format!("{:02}:{:02}", secs / 3600, (secs % 3600) / 60)
}

/// Which side of the conversation a message is drawn on.
pub fn message_class(chat: &Chat, me: &str) -> &'static str {
    if chat.from == me {
        "chat-message chat-message-sent"
    } else {
        "chat-message chat-message-received"
    }
}

#[component]
pub fn ChatPage() -> impl IntoView {
    let (current_user, set_current_user) = signal(Option::<String>::None);
    let (contacts, set_contacts) = signal(Vec::<ContactList>::new());
    let (selected, set_selected) = signal(Option::<String>::None);
    let (messages, set_messages) = signal(Vec::<Chat>::new());
    let (new_contact, set_new_contact) = signal(String::new());
    let (draft, set_draft) = signal(String::new());
    let (error_message, set_error_message) = signal(Option::<String>::None);

    // Reload trigger bumped after every send
    let (refresh, set_refresh) = signal(0u32);

    #[cfg(feature = "hydrate")]
    Effect::new(move |_| {
        set_current_user.set(crate::session::current_user());
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = set_current_user;

    #[cfg(feature = "hydrate")]
    Effect::new(move |_| {
        refresh.track();
        let Some(me) = current_user.get() else {
            return;
        };
        leptos::task::spawn_local(async move {
            match crate::client::contact_list(&me).await {
                Ok(response) => set_contacts.set(response.data.unwrap_or_default()),
                Err(e) => leptos::logging::error!("Failed to load contacts: {}", e),
            }
        });
    });

    #[cfg(feature = "hydrate")]
    Effect::new(move |_| {
        refresh.track();
        let (Some(me), Some(other)) = (current_user.get(), selected.get()) else {
            set_messages.set(Vec::new());
            return;
        };
        leptos::task::spawn_local(async move {
            match crate::client::chat_history(&me, &other).await {
                Ok(response) => {
                    // Oldest at the top of the conversation
                    let mut chats = response.data.unwrap_or_default();
                    chats.reverse();
                    set_messages.set(chats);
                }
                Err(e) => leptos::logging::error!("Failed to load chat history: {}", e),
            }
        });
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = (set_contacts, set_messages, refresh);

    let add_contact = move |_| {
        let name = new_contact.get().trim().to_string();
        if name.is_empty() {
            return;
        }

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::client::verify_contact(&name).await {
                Ok(response) if response.status => {
                    set_error_message.set(None);
                    set_new_contact.set(String::new());
                    set_selected.set(Some(name));
                }
                Ok(response) => set_error_message.set(response.message),
                Err(e) => set_error_message.set(Some(e)),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = name;
            set_error_message.set(Some(
                "Client-side functionality not available in SSR".to_string(),
            ));
        }
    };

    let send_message = move |_| {
        let (Some(me), Some(other)) = (current_user.get(), selected.get()) else {
            return;
        };
        let text = draft.get();
        if text.trim().is_empty() {
            return;
        }

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let request = crate::shared::SendChatRequest {
                from: me,
                to: other,
                message: text,
            };
            match crate::client::send_chat(&request).await {
                Ok(response) if response.status => {
                    set_draft.set(String::new());
                    set_refresh.update(|n| *n += 1);
                }
                Ok(response) => set_error_message.set(response.message),
                Err(e) => set_error_message.set(Some(e)),
            }
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (me, other, text, set_refresh);
        }
    };

    view! {
        <div class="app-container">
            <Header username=current_user/>

            <div class="main-content">
                <Show
                    when=move || current_user.get().is_some()
                    fallback=|| view! {
                        <div class="chat-signed-out">
                            <a href="/">"Log in"</a>
                            " to start chatting."
                        </div>
                    }
                >
                    <div class="chat-layout">
                        <aside class="contact-panel">
                            <form
                                class="contact-form"
                                on:submit=move |ev| {
                                    ev.prevent_default();
                                    add_contact(());
                                }
                            >
                                <input
                                    type="text"
                                    class="form-input"
                                    placeholder="Start a chat with..."
                                    prop:value=new_contact
                                    on:input=move |ev| {
                                        set_new_contact.set(event_target_value(&ev));
                                    }
                                />
                            </form>
                            <ul class="contact-list">
                                <For
                                    each=move || contacts.get()
                                    key=|contact| contact.username.clone()
                                    children=move |contact| {
                                        let name = contact.username.clone();
                                        let is_selected = {
                                            let name = name.clone();
                                            move || selected.get().as_deref() == Some(name.as_str())
                                        };
                                        view! {
                                            <li
                                                class="contact-item"
                                                class:selected=is_selected
                                                on:click=move |_| set_selected.set(Some(name.clone()))
                                            >
                                                {contact.username}
                                            </li>
                                        }
                                    }
                                />
                            </ul>
                        </aside>

                        <section class="conversation">
                            <Show
                                when=move || error_message.get().is_some()
                                fallback=|| view! { <div></div> }
                            >
                                <div class="error-message">
                                    {move || error_message.get().unwrap_or_default()}
                                </div>
                            </Show>

                            <h2 class="conversation-title">
                                {move || selected.get().unwrap_or_else(|| "Pick a contact".to_string())}
                            </h2>

                            <div class="message-list">
                                <For
                                    each=move || messages.get()
                                    key=|chat| chat.id.clone()
                                    children=move |chat| {
                                        let me = current_user.get_untracked().unwrap_or_default();
                                        let class = message_class(&chat, &me);
                                        view! {
                                            <div class=class>
                                                <span class="chat-text">{chat.message}</span>
                                                <span class="chat-time">{format_timestamp(chat.timestamp)}</span>
                                            </div>
                                        }
                                    }
                                />
                            </div>

                            <form
                                class="message-form"
                                on:submit=move |ev| {
                                    ev.prevent_default();
                                    send_message(());
                                }
                            >
                                <input
                                    type="text"
                                    class="form-input"
                                    placeholder="Type a message"
                                    prop:value=draft
                                    on:input=move |ev| {
                                        set_draft.set(event_target_value(&ev));
                                    }
                                    prop:disabled=move || selected.get().is_none()
                                />
                                <button type="submit" class="send-button">"Send"</button>
                            </form>
                        </section>
                    </div>
                </Show>
            </div>

            <Footer/>
        </div>
    }
}
