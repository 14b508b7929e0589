//! Browser-side calls to the JSON API.

use crate::shared::{
    ApiResponse, Chat, ContactList, ContactRequest, Credentials, SendChatRequest,
};

async fn read_response<T>(response: gloo_net::http::Response) -> Result<ApiResponse<T>, String>
where
    T: serde::de::DeserializeOwned,
{
    if !response.ok() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(format!("Request failed ({}): {}", status, error_text));
    }

    response
        .json::<ApiResponse<T>>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

async fn post<B, T>(url: &str, body: &B) -> Result<ApiResponse<T>, String>
where
    B: serde::Serialize,
    T: serde::de::DeserializeOwned,
{
    let response = gloo_net::http::Request::post(url)
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    read_response(response).await
}

async fn get<T>(url: &str) -> Result<ApiResponse<T>, String>
where
    T: serde::de::DeserializeOwned,
{
    let response = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    read_response(response).await
}

pub async fn register(credentials: &Credentials) -> Result<ApiResponse<()>, String> {
    post("/api/register", credentials).await
}

pub async fn login(credentials: &Credentials) -> Result<ApiResponse<()>, String> {
    post("/api/login", credentials).await
}

pub async fn verify_contact(username: &str) -> Result<ApiResponse<()>, String> {
    let request = ContactRequest {
        username: username.to_string(),
    };
    post("/api/verify-contact", &request).await
}

pub async fn send_chat(request: &SendChatRequest) -> Result<ApiResponse<String>, String> {
    post("/api/chat", request).await
}

pub async fn contact_list(username: &str) -> Result<ApiResponse<Vec<ContactList>>, String> {
    get(&format!(
        "/api/contact-list?username={}",
        urlencoding::encode(username)
    ))
    .await
}

pub async fn chat_history(u1: &str, u2: &str) -> Result<ApiResponse<Vec<Chat>>, String> {
    get(&format!(
        "/api/chat-history?u1={}&u2={}",
        urlencoding::encode(u1),
        urlencoding::encode(u2)
    ))
    .await
}
