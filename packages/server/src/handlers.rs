//! HTTP handler functions for the cafe map API.

use actix_web::{HttpResponse, web};
use cafe_map_ai::AiError;
use cafe_map_ai::providers::create_provider_from_env;
use cafe_map_scoring::score_site;
use cafe_map_server_models::{
    ApiHealth, BatchCalculateRequest, BatchItem, BatchResponse, CalculateRequest,
    CalculateResponse, CompareRequest, CompareResponse, ExplainRequest, ExplainResponse,
    MapDataCounts, MapDataQueryParams, MapDataResponse, ShopQueryParams, SiteQueryParams,
    TopQueryParams,
};
use cafe_map_site_models::ScoreResult;
use cafe_map_warehouse::ShopFilters;
use cafe_map_warehouse_models::AnalysisSite;

use crate::AppState;

const DEFAULT_TOP_N: usize = 10;

fn internal_error(message: &str) -> HttpResponse {
    HttpResponse::InternalServerError().json(serde_json::json!({ "error": message }))
}

/// `GET /health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/sites`
///
/// Paginated site search with station, score range, level, zone, and
/// recommendation filters.
pub async fn sites(
    state: web::Data<AppState>,
    params: web::Query<SiteQueryParams>,
) -> HttpResponse {
    let filters = match params.to_filters() {
        Ok(filters) => filters,
        Err(message) => {
            return HttpResponse::BadRequest().json(serde_json::json!({ "error": message }));
        }
    };

    match state.warehouse.search_sites(&filters).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => {
            log::error!("Failed to query sites: {e}");
            internal_error("Failed to query sites")
        }
    }
}

/// Takes the first `n` sites, optionally restricted to one station.
///
/// Input is expected in score order, best first, which is how the
/// warehouse returns it.
fn top_n(mut sites: Vec<AnalysisSite>, n: usize, station: Option<&str>) -> Vec<AnalysisSite> {
    if let Some(name) = station {
        sites.retain(|site| site.station == name);
    }
    sites.truncate(n);
    sites
}

/// `GET /api/sites/top`
///
/// Highest-scoring sites, optionally for a single station.
pub async fn top_sites(
    state: web::Data<AppState>,
    params: web::Query<TopQueryParams>,
) -> HttpResponse {
    match state.warehouse.sites().await {
        Ok(all) => {
            let n = params.n.unwrap_or(DEFAULT_TOP_N);
            HttpResponse::Ok().json(top_n(all, n, params.station.as_deref()))
        }
        Err(e) => {
            log::error!("Failed to query top sites: {e}");
            internal_error("Failed to query top sites")
        }
    }
}

/// `GET /api/sites/stations`
pub async fn stations(state: web::Data<AppState>) -> HttpResponse {
    match state.warehouse.stations().await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => {
            log::error!("Failed to query stations: {e}");
            internal_error("Failed to query stations")
        }
    }
}

/// `GET /api/sites/shops`
pub async fn shops(
    state: web::Data<AppState>,
    params: web::Query<ShopQueryParams>,
) -> HttpResponse {
    let filters = ShopFilters {
        shop_type: params.shop_type.clone(),
        category: params.category.clone(),
        limit: params.limit,
    };

    match state.warehouse.shops(&filters).await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => {
            log::error!("Failed to query shops: {e}");
            internal_error("Failed to query shops")
        }
    }
}

/// `GET /api/sites/map-data`
///
/// Sites and stations (and optionally shops) in one response, fetched
/// from the warehouse concurrently.
pub async fn map_data(
    state: web::Data<AppState>,
    params: web::Query<MapDataQueryParams>,
) -> HttpResponse {
    let include_shops = params.include_shops.unwrap_or(false);

    let shops_future = async {
        if include_shops {
            state
                .warehouse
                .shops(&ShopFilters::default())
                .await
                .map(Some)
        } else {
            Ok(None)
        }
    };

    match futures::try_join!(
        state.warehouse.sites(),
        state.warehouse.stations(),
        shops_future
    ) {
        Ok((sites, stations, shops)) => {
            let counts = MapDataCounts {
                sites: sites.len(),
                stations: stations.len(),
                shops: shops.as_ref().map_or(0, Vec::len),
            };
            HttpResponse::Ok().json(MapDataResponse {
                sites,
                stations,
                shops,
                counts,
            })
        }
        Err(e) => {
            log::error!("Failed to assemble map data: {e}");
            internal_error("Failed to assemble map data")
        }
    }
}

/// `GET /api/sites/station/{name}`
pub async fn station_detail(
    state: web::Data<AppState>,
    name: web::Path<String>,
) -> HttpResponse {
    match state.warehouse.station_detail(&name).await {
        Ok(Some(detail)) => HttpResponse::Ok().json(detail),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("station not found: {name}")
        })),
        Err(e) => {
            log::error!("Failed to query station detail: {e}");
            internal_error("Failed to query station detail")
        }
    }
}

/// `GET /api/sites/meta/stations`
pub async fn station_list(state: web::Data<AppState>) -> HttpResponse {
    match state.warehouse.station_list().await {
        Ok(rows) => HttpResponse::Ok().json(rows),
        Err(e) => {
            log::error!("Failed to query station list: {e}");
            internal_error("Failed to query station list")
        }
    }
}

/// `GET /api/sites/meta/stats`
pub async fn statistics(state: web::Data<AppState>) -> HttpResponse {
    match state.warehouse.statistics().await {
        Ok(stats) => HttpResponse::Ok().json(stats),
        Err(e) => {
            log::error!("Failed to compute statistics: {e}");
            internal_error("Failed to compute statistics")
        }
    }
}

/// `POST /api/sites/calculate`
///
/// Scores one candidate site. Missing required fields yield a 400 naming
/// them; the engine is not invoked in that case.
pub async fn calculate(request: web::Json<CalculateRequest>) -> HttpResponse {
    let missing = request.missing_required();
    if !missing.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "missing required fields",
            "missing": missing,
        }));
    }

    match score_site(&request.to_site_input()) {
        Ok(result) => HttpResponse::Ok().json(CalculateResponse {
            station: request.station.clone().unwrap_or_default(),
            lat: request.lat.unwrap_or_default(),
            lon: request.lon.unwrap_or_default(),
            result,
        }),
        Err(e) => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

fn score_one(item: &serde_json::Value) -> Result<ScoreResult, String> {
    let request: CalculateRequest = serde_json::from_value(item.clone())
        .map_err(|e| format!("malformed site entry: {e}"))?;

    let missing = request.missing_required();
    if !missing.is_empty() {
        return Err(format!("missing required fields: {}", missing.join(", ")));
    }

    score_site(&request.to_site_input()).map_err(|e| e.to_string())
}

/// Scores each batch item independently, preserving request order.
fn score_batch_items(items: &[serde_json::Value]) -> BatchResponse {
    let mut results = Vec::with_capacity(items.len());
    let mut succeeded = 0;

    for item in items {
        match score_one(item) {
            Ok(result) => {
                succeeded += 1;
                results.push(BatchItem {
                    input: item.clone(),
                    success: true,
                    result: Some(result),
                    error: None,
                });
            }
            Err(message) => results.push(BatchItem {
                input: item.clone(),
                success: false,
                result: None,
                error: Some(message),
            }),
        }
    }

    BatchResponse {
        total: items.len(),
        succeeded,
        failed: items.len() - succeeded,
        results,
    }
}

/// `POST /api/sites/calculate/batch`
///
/// Scores each item independently; one bad item never aborts the rest.
pub async fn calculate_batch(request: web::Json<BatchCalculateRequest>) -> HttpResponse {
    HttpResponse::Ok().json(score_batch_items(&request.sites))
}

/// `POST /api/sites/clear-cache`
pub async fn clear_cache(state: web::Data<AppState>) -> HttpResponse {
    state.warehouse.clear_cache().await;
    HttpResponse::Ok().json(serde_json::json!({ "cleared": true }))
}

/// `GET /api/sites/test-connection`
pub async fn test_connection(state: web::Data<AppState>) -> HttpResponse {
    match state.warehouse.test_connection().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "connected": true })),
        Err(e) => {
            log::error!("Warehouse connection probe failed: {e}");
            HttpResponse::BadGateway().json(serde_json::json!({
                "connected": false,
                "error": e.to_string(),
            }))
        }
    }
}

/// `POST /api/ai/explain`
///
/// Always produces text: with no provider configured, or on provider
/// failure, the deterministic fallback narrative is returned.
pub async fn ai_explain(request: web::Json<ExplainRequest>) -> HttpResponse {
    let explanation = match create_provider_from_env() {
        Ok(provider) => cafe_map_ai::explain_site(provider.as_ref(), &request.site).await,
        Err(e) => {
            log::warn!("No AI provider configured: {e}; using fallback narrative");
            cafe_map_ai::fallback::fallback_narrative(&request.site)
        }
    };

    HttpResponse::Ok().json(ExplainResponse { explanation })
}

/// `POST /api/ai/compare`
///
/// Requires a configured provider and at least 2 sites; comparisons have
/// no fallback narrative.
pub async fn ai_compare(request: web::Json<CompareRequest>) -> HttpResponse {
    let provider = match create_provider_from_env() {
        Ok(provider) => provider,
        Err(e) => {
            log::error!("No AI provider configured: {e}");
            return HttpResponse::ServiceUnavailable()
                .json(serde_json::json!({ "error": e.to_string() }));
        }
    };

    match cafe_map_ai::compare_sites(provider.as_ref(), &request.sites).await {
        Ok(comparison) => HttpResponse::Ok().json(CompareResponse { comparison }),
        Err(e @ AiError::NotEnoughSites { .. }) => {
            HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
        }
        Err(e) => {
            log::error!("AI comparison failed: {e}");
            HttpResponse::BadGateway()
                .json(serde_json::json!({ "error": "AI comparison failed" }))
        }
    }
}

#[cfg(test)]
mod tests {
    use cafe_map_site_models::{RecommendationTier, SupplyDemandStatus};
    use cafe_map_warehouse_models::{
        BikeShareLevel, DistanceCategory, FlowLevel, ScoreLevel, SupplyDemandLevel,
    };
    use serde_json::json;

    use super::*;

    #[test]
    fn batch_results_preserve_order_and_isolate_failures() {
        let items = vec![
            json!({"lat": 40.73, "lon": -73.99, "station": "Union Square", "dailyFlow": 42000}),
            json!({"lat": 40.75, "lon": -73.98}),
            json!("not an object"),
            json!({"lat": 40.71, "lon": -74.00, "station": "Fulton St", "dailyFlow": 0}),
        ];

        let response = score_batch_items(&items);

        assert_eq!(response.total, 4);
        assert_eq!(response.succeeded, 2);
        assert_eq!(response.failed, 2);

        assert!(response.results[0].success);
        assert!(!response.results[1].success);
        let missing = response.results[1].error.as_deref().unwrap();
        assert!(missing.contains("station"));
        assert!(missing.contains("dailyFlow"));
        assert!(!response.results[2].success);
        assert!(
            response.results[2]
                .error
                .as_deref()
                .unwrap()
                .contains("malformed")
        );
        // zero flow is valid input, not an error
        assert!(response.results[3].success);
    }

    #[test]
    fn batch_rejects_negative_distances() {
        let items = vec![json!({
            "lat": 40.73, "lon": -73.99, "station": "Union Square",
            "dailyFlow": 42000, "transitDistance": -100.0
        })];

        let response = score_batch_items(&items);
        assert_eq!(response.failed, 1);
        assert!(
            response.results[0]
                .error
                .as_deref()
                .unwrap()
                .contains("transitDistance")
        );
    }

    fn zone(station: &str, score: f64) -> AnalysisSite {
        AnalysisSite {
            point_id: format!("{station}_0-500m"),
            station: station.to_string(),
            zone_label: "0-500m".into(),
            zone_start_m: 0.0,
            base_flow: 40_000,
            distance_decay: 1.0,
            flow_accessibility: 40_000,
            flow_score: 40.0,
            flow_level: FlowLevel::Medium,
            cafe_count: 2,
            total_competitors: 4,
            supply_demand_ratio: 1.0,
            supply_demand_level: SupplyDemandLevel::Medium,
            competition_score: 50.0,
            bike_share_count: 2,
            bike_share_score: 40.0,
            bike_share_level: BikeShareLevel::Fair,
            distance_category: DistanceCategory::Walk,
            optimal_score: score,
            score_level: ScoreLevel::Fair,
            recommendation: RecommendationTier::classify(score, 1.0),
            supply_demand_status: SupplyDemandStatus::classify(1.0),
            rent: None,
            rent_score: None,
        }
    }

    #[test]
    fn top_n_truncates_and_filters_by_station() {
        let sites = vec![
            zone("Union Square", 90.0),
            zone("Fulton St", 85.0),
            zone("Union Square", 80.0),
            zone("Astor Pl", 75.0),
        ];

        let top = top_n(sites.clone(), 2, None);
        assert_eq!(top.len(), 2);
        assert!((top[0].optimal_score - 90.0).abs() < f64::EPSILON);

        let union = top_n(sites, 10, Some("Union Square"));
        assert_eq!(union.len(), 2);
        assert!(union.iter().all(|site| site.station == "Union Square"));
    }
}
