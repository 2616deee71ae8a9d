//! Warehouse query operations.
//!
//! Each public method mirrors one upstream read: analysis sites, stations,
//! shop listings, per-station detail, and aggregate statistics. Reads that
//! back the map view are cached; a failed refresh falls back to the stale
//! cache when one exists.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::LazyLock;

use cafe_map_site_models::{RecommendationTier, SupplyDemandStatus};
use cafe_map_warehouse_models::{
    AnalysisSite, CompetitionCounts, LevelCounts, ScoreLevel, Shop, SiteSearchFilters,
    SiteSearchPage, Station, StationDetail, StationSummary, Statistics, SupplyDemandLevel,
};
use regex::Regex;

use crate::client::{QueryParameter, Row};
use crate::{Warehouse, WarehouseError, normalize};

/// Columns selected from the analysis table, shared by the list, search,
/// and station-detail queries.
const SITE_COLUMNS: &str = "station, zone_label, zone_start_m, base_flow, distance_decay, \
     distance_category, flow_accessibility, flow_score, flow_level, cafe_count, \
     total_competitors, supply_demand_ratio, supply_demand_level, competition_score, \
     bike_share_count, bike_share_score, bike_share_level, optimal_score, score_level, \
     is_recommended";

/// First number in a shop's free-text status, used as a rent fallback when
/// the rent column is null.
static RENT_IN_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)").unwrap());

fn decode_site(row: &Row) -> Result<AnalysisSite, WarehouseError> {
    let station = row.require_str("station")?.to_string();
    let zone_label = row.require_str("zone_label")?.to_string();
    let zone_start_m = row.require_f64("zone_start_m")?;
    let base_flow = row.require_u64("base_flow")?;
    let flow_accessibility = row.require_u64("flow_accessibility")?;
    let supply_demand_ratio = row.require_f64("supply_demand_ratio")?;
    let optimal_score = row.require_f64("optimal_score")?;
    let bike_share_count = row.get_u32("bike_share_count").unwrap_or(0);

    // Free-text labels are resolved into closed enums here and nowhere
    // else; the tier and status come straight from the shared taxonomy so
    // they cannot drift from the engine's thresholds.
    let recommendation =
        if normalize::recommended_flag(row.get_str("is_recommended")) == Some(false) {
            // An explicit NO from the upstream job overrides the score.
            RecommendationTier::NotRecommended
        } else {
            RecommendationTier::classify(optimal_score, supply_demand_ratio)
        };

    Ok(AnalysisSite {
        point_id: format!("{station}_{zone_label}"),
        station,
        zone_label,
        zone_start_m,
        base_flow,
        distance_decay: row.get_f64("distance_decay").unwrap_or(0.0),
        flow_accessibility,
        flow_score: row.get_f64("flow_score").unwrap_or(0.0),
        flow_level: normalize::flow_level(row.get_str("flow_level"), flow_accessibility),
        cafe_count: row.get_u32("cafe_count").unwrap_or(0),
        total_competitors: row.get_u32("total_competitors").unwrap_or(0),
        supply_demand_ratio,
        supply_demand_level: normalize::supply_demand_level(
            row.get_str("supply_demand_level"),
            supply_demand_ratio,
        ),
        competition_score: row.get_f64("competition_score").unwrap_or(0.0),
        bike_share_count,
        bike_share_score: row.get_f64("bike_share_score").unwrap_or(0.0),
        bike_share_level: normalize::bike_share_level(
            row.get_str("bike_share_level"),
            bike_share_count,
        ),
        distance_category: normalize::distance_category(
            row.get_str("distance_category"),
            zone_start_m,
        ),
        optimal_score,
        score_level: normalize::score_level(row.get_str("score_level"), optimal_score),
        recommendation,
        supply_demand_status: SupplyDemandStatus::classify(supply_demand_ratio),
        rent: None,
        rent_score: None,
    })
}

fn decode_station(row: &Row) -> Result<Station, WarehouseError> {
    Ok(Station {
        name: row.require_str("station_name")?.to_string(),
        lat: row.require_f64("lat")?,
        lon: row.require_f64("lon")?,
        daily_flow: row.require_u64("daily_flow")?,
    })
}

fn decode_shop(row: &Row) -> Shop {
    // Two generations of source columns: the typo'd ones came first.
    let distance_m = row.get_f64("distance").or_else(|| row.get_f64("disrtance"));
    let lon = row.get_f64("longitude").or_else(|| row.get_f64("longtitude"));
    let status = row.get_str("status").map(ToString::to_string);
    let rent = row.get_f64("rent").or_else(|| {
        status
            .as_deref()
            .and_then(|s| RENT_IN_STATUS.captures(s))
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
    });

    Shop {
        station: row.get_str("station").map(ToString::to_string),
        shop_type: row.get_str("shop_type").map(ToString::to_string),
        name: row.get_str("shop_name").map(ToString::to_string),
        distance_m,
        address: row.get_str("address").map(ToString::to_string),
        lat: row.get_f64("latitude"),
        lon,
        status,
        rent,
    }
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// Attaches the per-station median rent (and its sub-score) from shop
/// listings onto the analysis sites.
fn attach_rents(sites: &mut [AnalysisSite], shops: &[Shop]) {
    let mut by_station: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for shop in shops {
        if let (Some(station), Some(rent)) = (shop.station.as_deref(), shop.rent) {
            if rent.is_finite() {
                by_station.entry(station).or_default().push(rent);
            }
        }
    }

    let medians: BTreeMap<&str, f64> = by_station
        .into_iter()
        .filter_map(|(station, mut rents)| median(&mut rents).map(|m| (station, m)))
        .collect();

    for site in sites {
        if let Some(&rent) = medians.get(site.station.as_str()) {
            site.rent = Some(rent);
            site.rent_score = Some(cafe_map_scoring::rent_sub_score(Some(rent)));
        }
    }
}

/// Filters accepted by [`Warehouse::shops`].
#[derive(Debug, Clone, Default)]
pub struct ShopFilters {
    /// Listing type filter.
    pub shop_type: Option<String>,
    /// Category filter.
    pub category: Option<String>,
    /// Maximum rows to return.
    pub limit: Option<u64>,
}

impl ShopFilters {
    const fn is_unfiltered(&self) -> bool {
        self.shop_type.is_none() && self.category.is_none()
    }
}

impl Warehouse {
    /// All analysis sites ordered by score, with station-median rents
    /// attached. Cached; a failed refresh falls back to the stale cache.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError`] if the query fails and no cached result
    /// exists.
    pub async fn sites(&self) -> Result<Vec<AnalysisSite>, WarehouseError> {
        if let Some(cached) = self.sites_cache.get().await {
            log::debug!("Returning cached analysis sites");
            return Ok(cached);
        }

        let sql = format!(
            "SELECT {SITE_COLUMNS} FROM {} ORDER BY optimal_score DESC",
            self.client.table("main_analysis")
        );

        let rows = match self.client.query(&sql, Vec::new()).await {
            Ok(rows) => rows,
            Err(e) => {
                if let Some(stale) = self.sites_cache.get_stale().await {
                    log::warn!("Site query failed ({e}); returning stale cache");
                    return Ok(stale);
                }
                return Err(e);
            }
        };

        let mut sites = rows
            .iter()
            .map(decode_site)
            .collect::<Result<Vec<_>, _>>()?;

        // Rent is best-effort: sites are still useful without it.
        match self.shops(&ShopFilters::default()).await {
            Ok(shops) => attach_rents(&mut sites, &shops),
            Err(e) => log::warn!("Failed to attach rents to sites: {e}"),
        }

        self.sites_cache.put(sites.clone()).await;
        log::info!("Fetched {} analysis sites", sites.len());
        Ok(sites)
    }

    /// Searches analysis sites with filters and pagination. Uncached.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError`] if either the page or the count query
    /// fails.
    pub async fn search_sites(
        &self,
        filters: &SiteSearchFilters,
    ) -> Result<SiteSearchPage, WarehouseError> {
        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<QueryParameter> = Vec::new();

        if let Some(station) = &filters.station {
            conditions.push("station = @station".to_string());
            params.push(QueryParameter::string("station", station));
        }
        if let Some(min) = filters.min_score {
            conditions.push("optimal_score >= @minScore".to_string());
            params.push(QueryParameter::float("minScore", min));
        }
        if let Some(max) = filters.max_score {
            conditions.push("optimal_score <= @maxScore".to_string());
            params.push(QueryParameter::float("maxScore", max));
        }
        if let Some(zone) = &filters.zone {
            conditions.push("zone_label = @zone".to_string());
            params.push(QueryParameter::string("zone", zone));
        }
        // Level columns are free text in the warehouse, so the filters do a
        // case-folded substring match; rows are normalized after decoding.
        for (column, value) in [
            (
                "supply_demand_level",
                filters.supply_demand_level.map(|v| v.as_ref().to_string()),
            ),
            (
                "score_level",
                filters.score_level.map(|v| v.as_ref().to_string()),
            ),
            (
                "flow_level",
                filters.flow_level.map(|v| v.as_ref().to_string()),
            ),
            (
                "bike_share_level",
                filters.bike_share_level.map(|v| v.as_ref().to_string()),
            ),
            (
                "distance_category",
                filters.distance_category.map(|v| v.as_ref().to_string()),
            ),
            (
                "is_recommended",
                filters
                    .is_recommended
                    .map(|v| if v { "YES" } else { "NO" }.to_string()),
            ),
        ] {
            if let Some(value) = value {
                conditions.push(format!(
                    "UPPER(CAST({column} AS STRING)) LIKE CONCAT('%', @{column}, '%')"
                ));
                params.push(QueryParameter::string(column, &value));
            }
        }

        let mut where_clause = String::new();
        if !conditions.is_empty() {
            let _ = write!(where_clause, "WHERE {}", conditions.join(" AND "));
        }

        let table = self.client.table("main_analysis");
        let limit = if filters.limit == 0 { 100 } else { filters.limit };
        let offset = filters.offset;

        let sql = format!(
            "SELECT {SITE_COLUMNS} FROM {table} {where_clause} \
             ORDER BY optimal_score DESC LIMIT @limit OFFSET @offset"
        );
        let mut page_params = params.clone();
        page_params.push(QueryParameter::int("limit", i64::try_from(limit).unwrap_or(100)));
        page_params.push(QueryParameter::int("offset", i64::try_from(offset).unwrap_or(0)));

        let rows = self.client.query(&sql, page_params).await?;
        let data = rows
            .iter()
            .map(decode_site)
            .collect::<Result<Vec<_>, _>>()?;

        let count_sql = format!("SELECT COUNT(*) AS total FROM {table} {where_clause}");
        let count_rows = self.client.query(&count_sql, params).await?;
        let total = count_rows
            .first()
            .ok_or_else(|| WarehouseError::Decode {
                column: "total".to_string(),
                reason: "count query returned no rows".to_string(),
            })?
            .require_u64("total")?;

        Ok(SiteSearchPage {
            data,
            total,
            limit,
            offset,
            has_more: offset + limit < total,
        })
    }

    /// All transit stations with coordinates and flow, best-flow first.
    /// Cached with stale fallback.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError`] if the query fails and no cached result
    /// exists.
    pub async fn stations(&self) -> Result<Vec<Station>, WarehouseError> {
        if let Some(cached) = self.stations_cache.get().await {
            return Ok(cached);
        }

        let sql = format!(
            "SELECT station_name, lat, lon, daily_flow FROM {} ORDER BY daily_flow DESC",
            self.client.table("station_locations")
        );

        let rows = match self.client.query(&sql, Vec::new()).await {
            Ok(rows) => rows,
            Err(e) => {
                if let Some(stale) = self.stations_cache.get_stale().await {
                    log::warn!("Station query failed ({e}); returning stale cache");
                    return Ok(stale);
                }
                return Err(e);
            }
        };

        let stations = rows
            .iter()
            .map(decode_station)
            .collect::<Result<Vec<_>, _>>()?;
        self.stations_cache.put(stations.clone()).await;
        log::info!("Fetched {} stations", stations.len());
        Ok(stations)
    }

    /// Shop listings, with the source's typo'd columns reconciled and rent
    /// recovered from the status text where the rent column is null. Only
    /// the unfiltered read is cached.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError`] if the query fails and no cached result
    /// exists.
    pub async fn shops(&self, filters: &ShopFilters) -> Result<Vec<Shop>, WarehouseError> {
        if filters.is_unfiltered() {
            if let Some(cached) = self.shops_cache.get().await {
                return Ok(cached);
            }
        }

        let mut conditions: Vec<&str> = Vec::new();
        let mut params: Vec<QueryParameter> = Vec::new();
        if let Some(shop_type) = &filters.shop_type {
            conditions.push("shop_type = @shopType");
            params.push(QueryParameter::string("shopType", shop_type));
        }
        if let Some(category) = &filters.category {
            conditions.push("category = @category");
            params.push(QueryParameter::string("category", category));
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filters.limit.unwrap_or(10_000);
        params.push(QueryParameter::int("limit", i64::try_from(limit).unwrap_or(10_000)));

        let sql = format!(
            "SELECT station, shop_type, shop_name, \
             SAFE_CAST(disrtance AS FLOAT64) AS disrtance, \
             SAFE_CAST(distance AS FLOAT64) AS distance, \
             address, \
             SAFE_CAST(latitude AS FLOAT64) AS latitude, \
             SAFE_CAST(longtitude AS FLOAT64) AS longtitude, \
             SAFE_CAST(longitude AS FLOAT64) AS longitude, \
             status, \
             SAFE_CAST(rent AS FLOAT64) AS rent \
             FROM {} {where_clause} LIMIT @limit",
            self.client.table("shop_listings")
        );

        let rows = match self.client.query(&sql, params).await {
            Ok(rows) => rows,
            Err(e) => {
                if filters.is_unfiltered() {
                    if let Some(stale) = self.shops_cache.get_stale().await {
                        log::warn!("Shop query failed ({e}); returning stale cache");
                        return Ok(stale);
                    }
                }
                return Err(e);
            }
        };

        let shops: Vec<Shop> = rows.iter().map(decode_shop).collect();
        if filters.is_unfiltered() {
            self.shops_cache.put(shops.clone()).await;
        }
        log::info!("Fetched {} shops", shops.len());
        Ok(shops)
    }

    /// A station with all of its analysis zones, or `None` if the station
    /// is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError`] if either query fails.
    pub async fn station_detail(
        &self,
        station_name: &str,
    ) -> Result<Option<StationDetail>, WarehouseError> {
        let station_sql = format!(
            "SELECT station_name, lat, lon, daily_flow FROM {} WHERE station_name = @name",
            self.client.table("station_locations")
        );
        let rows = self
            .client
            .query(&station_sql, vec![QueryParameter::string("name", station_name)])
            .await?;
        let Some(station_row) = rows.first() else {
            return Ok(None);
        };
        let station = decode_station(station_row)?;

        let zones_sql = format!(
            "SELECT {SITE_COLUMNS} FROM {} WHERE station = @name ORDER BY optimal_score DESC",
            self.client.table("main_analysis")
        );
        let zone_rows = self
            .client
            .query(&zones_sql, vec![QueryParameter::string("name", station_name)])
            .await?;
        let zones = zone_rows
            .iter()
            .map(decode_site)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(StationDetail { station, zones }))
    }

    /// Distinct station names with flow, for filter dropdowns.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError`] if the query fails.
    pub async fn station_list(&self) -> Result<Vec<StationSummary>, WarehouseError> {
        let sql = format!(
            "SELECT DISTINCT station_name, daily_flow FROM {} ORDER BY daily_flow DESC",
            self.client.table("station_locations")
        );
        let rows = self.client.query(&sql, Vec::new()).await?;
        rows.iter()
            .map(|row| {
                Ok(StationSummary {
                    name: row.require_str("station_name")?.to_string(),
                    daily_flow: row.require_u64("daily_flow")?,
                })
            })
            .collect()
    }

    /// Aggregate statistics, computed from the normalized site rows so the
    /// band counts use the closed enums rather than re-deriving thresholds
    /// in SQL.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError`] if the underlying site read fails.
    pub async fn statistics(&self) -> Result<Statistics, WarehouseError> {
        let sites = self.sites().await?;
        Ok(compute_statistics(&sites))
    }

    /// Probes warehouse connectivity with a trivial query.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError`] if the probe fails.
    pub async fn test_connection(&self) -> Result<(), WarehouseError> {
        self.client.query("SELECT 1 AS probe", Vec::new()).await?;
        Ok(())
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_statistics(sites: &[AnalysisSite]) -> Statistics {
    let total_sites = sites.len() as u64;
    let mut stations: Vec<&str> = sites.iter().map(|s| s.station.as_str()).collect();
    stations.sort_unstable();
    stations.dedup();

    let sum_score: f64 = sites.iter().map(|s| s.optimal_score).sum();
    let sum_ratio: f64 = sites.iter().map(|s| s.supply_demand_ratio).sum();
    let count = sites.len().max(1) as f64;

    let count_tier = |f: &dyn Fn(&AnalysisSite) -> bool| sites.iter().filter(|s| f(s)).count() as u64;

    let min_score = if sites.is_empty() {
        0.0
    } else {
        sites
            .iter()
            .map(|s| s.optimal_score)
            .fold(f64::INFINITY, f64::min)
    };

    Statistics {
        total_sites,
        total_stations: stations.len() as u64,
        avg_score: sum_score / count,
        max_score: sites.iter().map(|s| s.optimal_score).fold(0.0, f64::max),
        min_score,
        avg_supply_demand_ratio: sum_ratio / count,
        total_cafes: sites.iter().map(|s| u64::from(s.cafe_count)).sum(),
        recommended_count: count_tier(&|s| {
            matches!(
                s.recommendation,
                RecommendationTier::StronglyRecommended | RecommendationTier::Recommended
            )
        }),
        not_recommended_count: count_tier(&|s| {
            matches!(
                s.recommendation,
                RecommendationTier::ConsiderWithCaution | RecommendationTier::NotRecommended
            )
        }),
        score_levels: LevelCounts {
            excellent: count_tier(&|s| s.score_level == ScoreLevel::Excellent),
            good: count_tier(&|s| s.score_level == ScoreLevel::Good),
            fair: count_tier(&|s| s.score_level == ScoreLevel::Fair),
            poor: count_tier(&|s| s.score_level == ScoreLevel::Poor),
        },
        competition_levels: CompetitionCounts {
            low: count_tier(&|s| s.supply_demand_level == SupplyDemandLevel::Low),
            medium: count_tier(&|s| s.supply_demand_level == SupplyDemandLevel::Medium),
            high: count_tier(&|s| s.supply_demand_level == SupplyDemandLevel::High),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_row(station: &str, zone: &str, score: &str, ratio: &str) -> Row {
        Row::from_pairs(&[
            ("station", Some(station)),
            ("zone_label", Some(zone)),
            ("zone_start_m", Some("250")),
            ("base_flow", Some("40000")),
            ("distance_decay", Some("1.0")),
            ("distance_category", Some("WALK")),
            ("flow_accessibility", Some("40000")),
            ("flow_score", Some("40.0")),
            ("flow_level", Some("MEDIUM")),
            ("cafe_count", Some("3")),
            ("total_competitors", Some("5")),
            ("supply_demand_ratio", Some(ratio)),
            ("supply_demand_level", None),
            ("competition_score", Some("75.0")),
            ("bike_share_count", Some("4")),
            ("bike_share_score", Some("80.0")),
            ("bike_share_level", None),
            ("optimal_score", Some(score)),
            ("score_level", None),
            ("is_recommended", None),
        ])
    }

    #[test]
    fn decode_site_normalizes_levels_and_classifies() {
        let site = decode_site(&site_row("Union Square", "0-500m", "88.5", "0.3")).unwrap();
        assert_eq!(site.point_id, "Union Square_0-500m");
        assert_eq!(
            site.recommendation,
            RecommendationTier::StronglyRecommended
        );
        assert_eq!(
            site.supply_demand_status,
            SupplyDemandStatus::Undersupplied
        );
        assert_eq!(site.score_level, ScoreLevel::Excellent);
        assert_eq!(site.supply_demand_level, SupplyDemandLevel::Low);
    }

    #[test]
    fn explicit_not_recommended_label_wins() {
        let row = Row::from_pairs(&[
            ("station", Some("Union Square")),
            ("zone_label", Some("0-500m")),
            ("zone_start_m", Some("250")),
            ("base_flow", Some("40000")),
            ("flow_accessibility", Some("40000")),
            ("supply_demand_ratio", Some("0.1")),
            ("optimal_score", Some("95.0")),
            ("is_recommended", Some("NO")),
        ]);
        let site = decode_site(&row).unwrap();
        assert_eq!(site.recommendation, RecommendationTier::NotRecommended);
    }

    #[test]
    fn decode_site_fails_on_missing_required_column() {
        let row = Row::from_pairs(&[("station", Some("Union Square"))]);
        assert!(matches!(
            decode_site(&row),
            Err(WarehouseError::Decode { .. })
        ));
    }

    #[test]
    fn decode_shop_reconciles_typo_columns_and_status_rent() {
        let row = Row::from_pairs(&[
            ("station", Some("Union Square")),
            ("shop_type", Some("storefront")),
            ("shop_name", Some("Corner Coffee")),
            ("disrtance", Some("340.5")),
            ("distance", None),
            ("address", Some("12 Main St")),
            ("latitude", Some("25.03")),
            ("longtitude", Some("121.56")),
            ("longitude", None),
            ("status", Some("available, asking 1450 monthly")),
            ("rent", None),
        ]);
        let shop = decode_shop(&row);
        assert_eq!(shop.distance_m, Some(340.5));
        assert_eq!(shop.lon, Some(121.56));
        assert_eq!(shop.rent, Some(1450.0));
    }

    #[test]
    fn rent_column_beats_status_extraction() {
        let row = Row::from_pairs(&[
            ("rent", Some("1200")),
            ("status", Some("asking 9999")),
        ]);
        assert_eq!(decode_shop(&row).rent, Some(1200.0));
    }

    #[test]
    fn median_handles_odd_and_even_counts() {
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(median(&mut []), None);
    }

    #[test]
    fn attach_rents_uses_station_median() {
        let mut sites = vec![
            decode_site(&site_row("Union Square", "0-500m", "70.0", "0.5")).unwrap(),
            decode_site(&site_row("Riverside", "0-500m", "70.0", "0.5")).unwrap(),
        ];
        let shops = vec![
            Shop {
                station: Some("Union Square".into()),
                rent: Some(1000.0),
                shop_type: None,
                name: None,
                distance_m: None,
                address: None,
                lat: None,
                lon: None,
                status: None,
            },
            Shop {
                station: Some("Union Square".into()),
                rent: Some(1400.0),
                shop_type: None,
                name: None,
                distance_m: None,
                address: None,
                lat: None,
                lon: None,
                status: None,
            },
        ];
        attach_rents(&mut sites, &shops);
        assert_eq!(sites[0].rent, Some(1200.0));
        assert_eq!(sites[0].rent_score, Some(100.0));
        assert_eq!(sites[1].rent, None);
        assert_eq!(sites[1].rent_score, None);
    }

    #[test]
    fn statistics_counts_by_closed_enums() {
        let sites = vec![
            decode_site(&site_row("A", "z1", "88.0", "0.3")).unwrap(),
            decode_site(&site_row("A", "z2", "72.0", "0.6")).unwrap(),
            decode_site(&site_row("B", "z1", "40.0", "1.5")).unwrap(),
        ];
        let stats = compute_statistics(&sites);
        assert_eq!(stats.total_sites, 3);
        assert_eq!(stats.total_stations, 2);
        assert_eq!(stats.recommended_count, 2);
        assert_eq!(stats.not_recommended_count, 1);
        assert_eq!(stats.score_levels.excellent, 1);
        assert_eq!(stats.score_levels.poor, 1);
        assert_eq!(stats.competition_levels.high, 1);
        assert_eq!(stats.total_cafes, 9);
    }
}
