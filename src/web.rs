use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};
use crate::chat::ChatService;
use crate::config::TravelChatConfig;
use crate::llm::OpenAiClient;
use crate::location_table::LocationTable;
use crate::session::SessionStore;

/// Load the location table and connect the chat client described by `config`
pub fn build_state(config: &TravelChatConfig) -> Result<AppState> {
    let locations = LocationTable::load(
        Path::new(&config.data.locations_path),
        config.data.delimiter_char(),
    )?;
    if locations.is_empty() {
        tracing::warn!("Location table is empty; the map will have no markers");
    }

    let llm = OpenAiClient::from_config(&config.llm).context("Failed to create the chat client")?;
    tracing::info!(model = llm.model(), "Chat client ready");
    let chat = ChatService::new(
        Arc::new(llm),
        config.assistant.persona,
        config.llm.max_tokens,
    );

    Ok(AppState {
        locations: Arc::new(locations),
        sessions: SessionStore::new(),
        chat: Arc::new(chat),
        map: config.map.clone(),
        click_tolerance_km: config.assistant.click_tolerance_km,
    })
}

/// API under `/api`, static front-end as fallback
pub fn app(state: AppState, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(state))
        .fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run(config: &TravelChatConfig) -> Result<()> {
    let state = build_state(config)?;
    let app = app(state, &config.server.static_dir);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://localhost:{}", config.server.port);
    axum::serve(listener, app).await.context("Web server failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::io::Write;
    use tower::ServiceExt;

    fn config_with(locations: &Path, api_key: Option<&str>) -> TravelChatConfig {
        let mut config = TravelChatConfig::default();
        config.data.locations_path = locations.to_string_lossy().into_owned();
        config.llm.api_key = api_key.map(str::to_owned);
        config
    }

    fn locations_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "address;latitude;longitude\nKraków;50.0617;19.9373").unwrap();
        file
    }

    #[test]
    fn build_state_requires_api_key() {
        let file = locations_file();
        let err = build_state(&config_with(file.path(), None)).err().unwrap();
        assert!(format!("{err:#}").contains("API key"));
    }

    #[test]
    fn build_state_fails_on_missing_locations() {
        let config = config_with(Path::new("/nope/locations.csv"), Some("sk-test-123456"));
        assert!(build_state(&config).is_err());
    }

    #[tokio::test]
    async fn app_serves_api_under_prefix() {
        let file = locations_file();
        let state = build_state(&config_with(file.path(), Some("sk-test-123456"))).unwrap();
        assert_eq!(state.locations.len(), 1);

        let app = app(state, "does-not-exist");
        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
