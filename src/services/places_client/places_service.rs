use std::{collections::HashSet, sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use urlencoding::encode;

use crate::utils::{cancellation::sleep_or_cancel, rest_caller::Caller};

use super::types::{
    filter_spec::FilterSpec,
    google_text_search_response::{GoogleTextSearchResponse, Place},
    places_service_error::PlacesServiceError,
};

const TEXT_SEARCH_PATH: &str = "/maps/api/place/textsearch/json";

#[derive(Clone, Debug)]
pub struct PlacesServiceConfig {
    pub api_key: String,
    pub host: String,
    /// Wait before requesting a continuation page. Google rejects page
    /// tokens that are used too soon after they were issued.
    pub page_delay: Duration,
}

#[derive(Clone)]
pub struct PlacesService {
    config: PlacesServiceConfig,
    caller: Arc<dyn Caller>,
    cancel: CancellationToken,
}

impl PlacesService {
    pub fn new(
        config: PlacesServiceConfig,
        caller: Arc<dyn Caller>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            caller,
            cancel,
        }
    }

    /// Fetches every entity in order and merges the results, keeping the
    /// first occurrence of each `place_id`. The first failing entity aborts
    /// the whole run.
    pub async fn fetch_all_locations<S: AsRef<str>>(
        &self,
        entities: &[S],
        filter: &FilterSpec,
    ) -> Result<Vec<Place>, PlacesServiceError> {
        debug!(
            entities = entities.len(),
            contains = ?filter.contains,
            matches = ?filter.matches,
            "fetching all locations"
        );

        let mut result = Vec::new();
        let mut seen = HashSet::new();

        for entity in entities {
            let locations = self.fetch_locations(entity.as_ref(), filter).await?;

            for location in locations {
                if seen.insert(location.place_id.clone()) {
                    result.push(location);
                }
            }
        }

        info!(count = result.len(), "fetched unique locations");

        Ok(result)
    }

    /// Fetches every page of results for one entity, keeping the places
    /// accepted by `filter` in page order.
    pub async fn fetch_locations(
        &self,
        entity: &str,
        filter: &FilterSpec,
    ) -> Result<Vec<Place>, PlacesServiceError> {
        if entity.trim().is_empty() {
            return Err(PlacesServiceError::MissingEntity);
        }

        let mut result = Vec::new();
        let mut page = self.fetch_page(&self.construct_url(entity)).await?;
        let mut pages = 1;

        loop {
            result.extend(page.results.into_iter().filter(|p| filter.accepts(&p.name)));

            let Some(token) = page.next_page_token else {
                break;
            };

            if !sleep_or_cancel(&self.cancel, self.config.page_delay).await {
                return Err(PlacesServiceError::Cancelled);
            }

            page = self.fetch_page(&self.construct_next_url(&token)).await?;
            pages += 1;
        }

        debug!(entity, pages, kept = result.len(), "fetched locations");

        Ok(result)
    }

    async fn fetch_page(&self, url: &str) -> Result<GoogleTextSearchResponse, PlacesServiceError> {
        let bytes = self.caller.get(url).await?;
        let page: GoogleTextSearchResponse = serde_json::from_slice(&bytes)?;

        if !matches!(page.status.as_str(), "OK" | "ZERO_RESULTS" | "") {
            warn!(status = %page.status, "text search returned a non-OK status");
        }

        Ok(page)
    }

    fn construct_url(&self, entity: &str) -> String {
        format!(
            "{}{}?query={}&key={}",
            self.config.host,
            TEXT_SEARCH_PATH,
            build_query(entity),
            self.config.api_key
        )
    }

    fn construct_next_url(&self, token: &str) -> String {
        format!(
            "{}{}?pagetoken={}&key={}",
            self.config.host,
            TEXT_SEARCH_PATH,
            encode(token),
            self.config.api_key
        )
    }
}

/// "Whole Foods  in NYC" -> "Whole+Foods+in+NYC"
fn build_query(entity: &str) -> String {
    entity
        .split_whitespace()
        .map(|word| encode(word).into_owned())
        .collect::<Vec<_>>()
        .join("+")
}
