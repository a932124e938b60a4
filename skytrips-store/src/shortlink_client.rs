use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use skytrips_core::repository::{BoxError, ShortLinkStore};

use crate::app_config::ShortLinkConfig;
use crate::StoreError;

/// Client for the external short-link service.
///
/// `POST /api/shortlinks/create` registers `{ shortHash, params }`;
/// `GET /api/shortlinks/{hash}` answers `{ params }` or 404.
#[derive(Clone)]
pub struct HttpShortLinkStore {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateShortLink<'a> {
    short_hash: &'a str,
    params: &'a str,
}

#[derive(Debug, Deserialize)]
struct ShortLinkRecord {
    params: String,
}

impl HttpShortLinkStore {
    pub fn new(config: &ShortLinkConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ShortLinkStore for HttpShortLinkStore {
    async fn create(&self, short_hash: &str, token: &str) -> Result<(), BoxError> {
        let response = self
            .client
            .post(format!("{}/api/shortlinks/create", self.base_url))
            .json(&CreateShortLink { short_hash, params: token })
            .send()
            .await
            .map_err(StoreError::from)?;

        if !response.status().is_success() {
            return Err(StoreError::from_response(response).await.into());
        }

        info!("Registered short link {}", short_hash);
        Ok(())
    }

    async fn resolve(&self, short_hash: &str) -> Result<Option<String>, BoxError> {
        let response = self
            .client
            .get(format!("{}/api/shortlinks/{}", self.base_url, short_hash))
            .send()
            .await
            .map_err(StoreError::from)?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let record: ShortLinkRecord = response.json().await.map_err(StoreError::from)?;
                Ok(Some(record.params))
            }
            _ => Err(StoreError::from_response(response).await.into()),
        }
    }
}
