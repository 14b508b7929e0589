#![recursion_limit = "256"]
#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use axum::Router;
    use chat_app::*;
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use tower_http::services::ServeDir;
    use tracing::{error, info};

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let data_dir = data_dir_from_env();
    info!("Chat data directory: `{}`", data_dir);

    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        error!("Failed to create data directory {}: {}", data_dir, e);
        std::process::exit(1);
    }

    let database = match database::init_db(&data_dir).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = AppState { database };

    // Setting get_configuration(None) means we'll be using cargo-leptos's env values
    let conf = match get_configuration(None) {
        Ok(conf) => conf,
        Err(e) => {
            error!("Invalid leptos configuration: {}", e);
            std::process::exit(1);
        }
    };
    let leptos_options = conf.leptos_options;
    let addr = leptos_options.site_addr;
    let routes = generate_route_list(App);

    let pkg_dir = format!("{}/pkg", leptos_options.site_root);

    let api_routes = Router::new()
        .nest("/api", api::create_api_routes())
        .with_state(app_state);

    let static_routes = Router::new().nest_service("/pkg", ServeDir::new(&pkg_dir));

    // Fallback catches everything not matched above
    let leptos_app = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let leptos_options = leptos_options.clone();
            move || shell(leptos_options.clone())
        })
        .fallback(leptos_axum::file_and_error_handler(shell))
        .with_state(leptos_options);

    // Static and API routes first, then the leptos fallback
    let app = static_routes.merge(api_routes).merge(leptos_app);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    info!("Chat server listening on http://{}", &addr);
    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        error!("Server error: {}", e);
    }
}

#[cfg(not(feature = "ssr"))]
pub fn main() {
    // no client-side main function
    // see lib.rs for hydration function instead
}

#[cfg(feature = "ssr")]
const DEFAULT_DATA_DIR: &str = "/tmp/chat/";

#[cfg(feature = "ssr")]
fn data_dir_from_env() -> String {
    resolve_data_dir(std::env::var("CHAT_DATA_DIR").ok())
}

#[cfg(feature = "ssr")]
fn resolve_data_dir(value: Option<String>) -> String {
    match value {
        Some(dir) if !dir.trim().is_empty() => dir,
        _ => {
            tracing::warn!("CHAT_DATA_DIR not set, using {}", DEFAULT_DATA_DIR);
            DEFAULT_DATA_DIR.to_string()
        }
    }
}

#[cfg(test)]
#[cfg(feature = "ssr")]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use chat_app::{api, database, App, AppState};
    use leptos_axum::generate_route_list;
    use tempfile::tempdir;
    use tower::ServiceExt;

    #[test]
    fn test_resolve_data_dir_default() {
        assert_eq!(resolve_data_dir(None), DEFAULT_DATA_DIR);
        assert_eq!(resolve_data_dir(Some("  ".to_string())), DEFAULT_DATA_DIR);
    }

    #[test]
    fn test_resolve_data_dir_from_value() {
        assert_eq!(
            resolve_data_dir(Some("/var/lib/chat".to_string())),
            "/var/lib/chat"
        );
    }

    #[test]
    fn test_route_list_contains_pages() {
        let routes = generate_route_list(App);
        assert!(routes.len() >= 2, "both pages should be routable");
    }

    #[tokio::test]
    async fn test_api_mounted_under_prefix() {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let database = database::init_db(temp_dir.path().to_str().unwrap())
            .await
            .expect("Failed to initialize test database");

        let app = Router::new()
            .nest("/api", api::create_api_routes())
            .with_state(AppState { database });

        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/contact-list?username=nobody")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let result: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(result["status"], true);
        assert_eq!(result["total"], 0);
    }
}
