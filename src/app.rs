use std::sync::Arc;

use crate::{
    middlewares::auth::auth_middleware,
    routes::apply_routes,
    services::places_client::places_service::{PlacesService, PlacesServiceConfig},
    types::app_state::AppState,
    utils::rest_caller::{RestCaller, RestCallerConfig},
};
use axum::{middleware, Router};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

pub struct AppConfig {
    pub places: PlacesServiceConfig,
    pub caller: RestCallerConfig,
    pub auth_key: Option<String>,
    /// Cancelled on shutdown so in-flight fetches stop waiting.
    pub cancel: CancellationToken,
}

pub fn gen_app(config: AppConfig) -> Router {
    let cors_middleware = CorsLayer::permissive();
    let caller = RestCaller::new(config.caller, config.cancel.clone());
    let state = AppState {
        places_service: PlacesService::new(config.places, Arc::new(caller), config.cancel),
        auth_key: config.auth_key,
    };

    apply_routes(Router::new())
        .layer(cors_middleware)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

#[cfg(test)]
pub struct MockApp {
    pub app: Router,
    pub google_server: mockito::ServerGuard,
}

#[cfg(test)]
pub async fn gen_mock_app(auth_key: Option<String>) -> MockApp {
    use std::time::Duration;

    let google_server = mockito::Server::new_async().await;

    let app = gen_app(AppConfig {
        places: PlacesServiceConfig {
            api_key: "key".to_string(),
            host: google_server.url(),
            page_delay: Duration::ZERO,
        },
        caller: RestCallerConfig::default(),
        auth_key,
        cancel: CancellationToken::new(),
    });

    MockApp { app, google_server }
}
