#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Warehouse data-access layer.
//!
//! Proxies queries to BigQuery over its REST API and returns typed rows.
//! Free-text level labels are normalized into closed enums here, at the
//! boundary, and read results are held in an explicit TTL cache with an
//! invalidation entry point. Nothing above this crate sees raw label text
//! or ambient cache state.

pub mod cache;
pub mod client;
pub mod normalize;
pub mod queries;
mod retry;

pub use queries::ShopFilters;

use std::time::Duration;

use thiserror::Error;

use cafe_map_warehouse_models::{AnalysisSite, Shop, Station};

use crate::cache::TtlCache;
use crate::client::BigQueryClient;

/// How long cached warehouse reads stay fresh.
const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Errors that can occur in the warehouse layer.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// HTTP request to the warehouse failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The warehouse returned a non-success status.
    #[error("warehouse returned status {status}: {message}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Error body or message from the warehouse.
        message: String,
    },

    /// The query job did not complete within the request deadline.
    #[error("query did not complete within the request deadline")]
    Incomplete,

    /// A result column could not be decoded into the expected type.
    #[error("failed to decode column {column}: {reason}")]
    Decode {
        /// Column name.
        column: String,
        /// What went wrong.
        reason: String,
    },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}

/// Connection settings for the warehouse.
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    /// GCP project that owns the dataset.
    pub project_id: String,
    /// Dataset holding the analysis tables.
    pub dataset: String,
    /// OAuth bearer token for the REST API.
    pub access_token: String,
    /// API endpoint, overridable for tests.
    pub endpoint: String,
}

impl WarehouseConfig {
    /// Reads the configuration from the environment.
    ///
    /// `GCP_PROJECT_ID` and `BIGQUERY_ACCESS_TOKEN` are required;
    /// `BIGQUERY_DATASET` defaults to `cafe_analysis`.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError::Config`] if a required variable is missing.
    pub fn from_env() -> Result<Self, WarehouseError> {
        let project_id = std::env::var("GCP_PROJECT_ID").map_err(|_| WarehouseError::Config {
            message: "GCP_PROJECT_ID environment variable not set".to_string(),
        })?;
        let access_token =
            std::env::var("BIGQUERY_ACCESS_TOKEN").map_err(|_| WarehouseError::Config {
                message: "BIGQUERY_ACCESS_TOKEN environment variable not set".to_string(),
            })?;
        let dataset =
            std::env::var("BIGQUERY_DATASET").unwrap_or_else(|_| "cafe_analysis".to_string());
        let endpoint = std::env::var("BIGQUERY_ENDPOINT")
            .unwrap_or_else(|_| "https://bigquery.googleapis.com".to_string());

        Ok(Self {
            project_id,
            dataset,
            access_token,
            endpoint,
        })
    }
}

/// Warehouse handle: the REST client plus the read caches.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct Warehouse {
    client: BigQueryClient,
    sites_cache: TtlCache<Vec<AnalysisSite>>,
    stations_cache: TtlCache<Vec<Station>>,
    shops_cache: TtlCache<Vec<Shop>>,
}

impl Warehouse {
    /// Creates a warehouse handle from an explicit configuration.
    #[must_use]
    pub fn new(config: WarehouseConfig) -> Self {
        Self {
            client: BigQueryClient::new(config),
            sites_cache: TtlCache::new(CACHE_TTL),
            stations_cache: TtlCache::new(CACHE_TTL),
            shops_cache: TtlCache::new(CACHE_TTL),
        }
    }

    /// Creates a warehouse handle from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError::Config`] if required variables are missing.
    pub fn from_env() -> Result<Self, WarehouseError> {
        Ok(Self::new(WarehouseConfig::from_env()?))
    }

    /// Drops all cached reads. The next query for each table hits the
    /// warehouse again.
    pub async fn clear_cache(&self) {
        self.sites_cache.invalidate().await;
        self.stations_cache.invalidate().await;
        self.shops_cache.invalidate().await;
        log::info!("Warehouse caches cleared");
    }
}
