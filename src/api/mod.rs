//! HTTP surface of the scraper: `/scrape`, `/sites` and `/`.
//! Thin layer over the pipeline; every response carries the
//! `{"success": ...}` envelope.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::error;

use crate::pipeline::{self, Fetch, ScrapeError};
use crate::sites::Catalog;

pub struct AppState {
    pub catalog: Catalog,
    pub fetcher: Box<dyn Fetch>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/scrape", get(scrape))
        .route("/sites", get(sites))
        .route("/", get(home))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ScrapeParams {
    url: Option<String>,
}

async fn scrape(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScrapeParams>,
) -> (StatusCode, Json<Value>) {
    let Some(url) = params.url.filter(|u| !u.trim().is_empty()) else {
        return failure(StatusCode::BAD_REQUEST, "URL parameter is required");
    };

    match pipeline::scrape(&state.catalog, state.fetcher.as_ref(), &url).await {
        Ok(record) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": record })),
        ),
        Err(err @ ScrapeError::InvalidUrl(_)) => {
            failure(StatusCode::BAD_REQUEST, &err.to_string())
        }
        Err(err) => {
            error!(%url, error = %err, "scrape failed");
            failure(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

async fn sites(State(state): State<Arc<AppState>>) -> Json<Value> {
    let sites: serde_json::Map<String, Value> = state
        .catalog
        .sites()
        .map(|(suffix, display)| (suffix.to_string(), Value::String(display.to_string())))
        .collect();

    Json(json!({ "success": true, "sites": sites }))
}

async fn home(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "message": "Car Scout API",
        "supported_sites": state.catalog.supported(),
        "endpoints": {
            "/scrape": "GET /scrape?url=<car-url> - Scrape car data",
            "/sites": "GET /sites - List supported websites",
        },
        "example": "/scrape?url=https://www.cars.com/vehicledetail/example/",
    }))
}

fn failure(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({ "success": false, "error": message })),
    )
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::pipeline::identity::IdentityProfile;
    use crate::pipeline::traits::{FetchError, RawDocument};

    struct NoNetwork;

    #[async_trait]
    impl Fetch for NoNetwork {
        async fn fetch(
            &self,
            _url: &str,
            _identity: &IdentityProfile,
        ) -> Result<RawDocument, FetchError> {
            panic!("input validation must reject before any network call");
        }
    }

    fn state() -> Arc<AppState> {
        Arc::new(AppState {
            catalog: Catalog::new().unwrap(),
            fetcher: Box::new(NoNetwork),
        })
    }

    #[tokio::test]
    async fn missing_url_is_a_bad_request() {
        let (status, Json(body)) =
            scrape(State(state()), Query(ScrapeParams { url: None })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn invalid_url_is_rejected_before_fetching() {
        let (status, Json(body)) = scrape(
            State(state()),
            Query(ScrapeParams {
                url: Some("Odometer: 50,000 km".to_string()),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn unsupported_host_is_a_server_error() {
        let (status, Json(body)) = scrape(
            State(state()),
            Query(ScrapeParams {
                url: Some("https://example.com/car/1".to_string()),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("Supported sites"));
    }

    #[tokio::test]
    async fn sites_lists_display_names() {
        let Json(body) = sites(State(state())).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["sites"]["cars.com"], "Cars.com");
        assert_eq!(body["sites"]["manheim.com.au"], "Manheim Australia");
    }
}
