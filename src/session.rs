//! Browser-side record of the signed-in user, kept in `localStorage`.

pub const USERNAME_KEY: &str = "chat_username";

#[cfg(feature = "hydrate")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().unwrap_or(None)
}

#[cfg(feature = "hydrate")]
pub fn current_user() -> Option<String> {
    storage()?
        .get_item(USERNAME_KEY)
        .unwrap_or(None)
        .filter(|name| !name.is_empty())
}

#[cfg(feature = "hydrate")]
pub fn sign_in(username: &str) {
    if let Some(storage) = storage() {
        let _ = storage.set_item(USERNAME_KEY, username);
    }
}

#[cfg(feature = "hydrate")]
pub fn sign_out() {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(USERNAME_KEY);
    }
}

// Nothing is stored while rendering on the server
#[cfg(not(feature = "hydrate"))]
pub fn current_user() -> Option<String> {
    None
}

#[cfg(not(feature = "hydrate"))]
pub fn sign_in(_username: &str) {}

#[cfg(not(feature = "hydrate"))]
pub fn sign_out() {}
