use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

use skytrips_core::flight_api::FlightOffersRequest;
use skytrips_core::iata::Airport;
use skytrips_core::repository::{BoxError, FlightSearchClient};

use crate::app_config::FlightApiConfig;
use crate::StoreError;

/// reqwest client for the upstream flight API.
#[derive(Clone)]
pub struct HttpFlightClient {
    client: Client,
    base_url: String,
    offers_path: String,
    airports_path: String,
}

#[derive(Debug, Deserialize)]
struct AirportsResponse {
    data: Vec<Airport>,
}

impl HttpFlightClient {
    pub fn new(config: &FlightApiConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            offers_path: config.offers_path.clone(),
            airports_path: config.airports_path.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl FlightSearchClient for HttpFlightClient {
    async fn search_offers(
        &self,
        request: &FlightOffersRequest,
    ) -> Result<serde_json::Value, BoxError> {
        let response = self
            .client
            .post(self.url(&self.offers_path))
            .json(request)
            .send()
            .await
            .map_err(StoreError::from)?;

        if !response.status().is_success() {
            let err = StoreError::from_response(response).await;
            error!("Flight offers search failed: {}", err);
            return Err(err.into());
        }

        let body: serde_json::Value = response.json().await.map_err(StoreError::from)?;
        info!(
            "Flight offers search returned {} offer(s) for {} leg(s)",
            body["data"].as_array().map(|a| a.len()).unwrap_or(0),
            request.origin_destinations.len()
        );
        Ok(body)
    }

    async fn search_airports(&self, keyword: &str) -> Result<Vec<Airport>, BoxError> {
        let response = self
            .client
            .get(self.url(&self.airports_path))
            .query(&[("keyword", keyword), ("subType", "AIRPORT")])
            .send()
            .await
            .map_err(StoreError::from)?;

        if !response.status().is_success() {
            return Err(StoreError::from_response(response).await.into());
        }

        let body: AirportsResponse = response.json().await.map_err(StoreError::from)?;
        Ok(body.data)
    }
}
