use crate::{
    services::places_client::types::{
        filter_spec::{split_terms, FilterSpec},
        google_text_search_response::Place,
    },
    types::app_state::AppState,
    utils::{app_error::AppError, validated_query::ValidatedQuery},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Validate, Deserialize)]
pub struct GetLocationsPayload {
    /// Comma-separated search entities, fetched in order.
    #[validate(length(min = 1, message = "Must be at least 1 character"))]
    pub query: String,
    pub contains: Option<String>,
    pub matches: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct GetLocationsResponseData {
    pub locations: Vec<Place>,
}

#[derive(Serialize, Deserialize)]
pub struct GetLocationsResponse {
    pub data: GetLocationsResponseData,
}

pub async fn get_locations(
    State(state): State<AppState>,
    ValidatedQuery(payload): ValidatedQuery<GetLocationsPayload>,
) -> Result<Response, AppError> {
    let entities = split_terms(Some(payload.query.as_str()));
    if entities.is_empty() {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "Invalid query: no search entities given",
        ));
    }

    let filter =
        FilterSpec::from_comma_lists(payload.contains.as_deref(), payload.matches.as_deref());

    let locations = state
        .places_service
        .fetch_all_locations(&entities, &filter)
        .await?;

    Ok((
        StatusCode::OK,
        Json(GetLocationsResponse {
            data: GetLocationsResponseData { locations },
        }),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::Request,
    };
    use mockito::Matcher;
    use serde_json::json;
    use tower::ServiceExt;
    use tracing_test::traced_test;

    use crate::{app::gen_mock_app, utils::app_error::AppErrorBody};

    use super::*;

    fn place(id: &str, name: &str) -> serde_json::Value {
        json!({"place_id": id, "name": name, "geometry": {"location": {"lat": 1.0, "lng": 2.0}}})
    }

    #[tokio::test]
    #[traced_test]
    async fn test_get_locations() {
        let mut mock_app = gen_mock_app(None).await;

        let brooklyn = mock_app
            .google_server
            .mock("GET", "/maps/api/place/textsearch/json")
            .match_query(Matcher::UrlEncoded("query".into(), "Whole Foods Brooklyn".into()))
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "results": [place("1", "Whole Foods Market"), place("2", "Key Food")],
                    "status": "OK"
                })
                .to_string(),
            )
            .create_async()
            .await;
        let queens = mock_app
            .google_server
            .mock("GET", "/maps/api/place/textsearch/json")
            .match_query(Matcher::UrlEncoded("query".into(), "Whole Foods Queens".into()))
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "results": [place("1", "Whole Foods Market"), place("3", "Whole Foods Market Queens")],
                    "status": "OK"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/locations?query=Whole%20Foods%20Brooklyn,Whole%20Foods%20Queens&contains=whole%20foods")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        brooklyn.assert_async().await;
        queens.assert_async().await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: GetLocationsResponse = serde_json::from_slice(&body).unwrap();

        let ids: Vec<&str> = body
            .data
            .locations
            .iter()
            .map(|l| l.place_id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[tokio::test]
    async fn test_missing_query() {
        let mock_app = gen_mock_app(None).await;

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/locations?contains=x")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_entities() {
        let mock_app = gen_mock_app(None).await;

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/locations?query=%20,%20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: AppErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.message, "Invalid query: no search entities given");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_upstream_failure() {
        let mut mock_app = gen_mock_app(None).await;

        let mock = mock_app
            .google_server
            .mock("GET", "/maps/api/place/textsearch/json")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let response = mock_app
            .app
            .oneshot(
                Request::builder()
                    .uri("/locations?query=Whole%20Foods")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(logs_contain("Failed to fetch locations"));
    }
}
