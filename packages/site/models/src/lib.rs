#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Site scoring value types and the recommendation taxonomy.
//!
//! This crate defines the canonical input and output types for the site
//! scoring engine, plus the two categorical classifications derived from a
//! score: [`RecommendationTier`] and [`SupplyDemandStatus`]. The threshold
//! logic for both lives here and nowhere else, so the structured API result
//! and the rule-based narrative fallback can never drift apart.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Raw measurements for one candidate location.
///
/// All distances are in meters, counts are within the analysis radius, and
/// `daily_flow` is the pedestrian count per day at the reference transit
/// station. `daily_flow = 0` is a valid (if degenerate) input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInput {
    /// Pedestrian count per day at the reference transit station.
    pub daily_flow: u64,
    /// Meters from the site to the nearest transit station.
    #[serde(default)]
    pub transit_distance: f64,
    /// Meters to the nearest bike-share dock. `None` means no nearby dock.
    #[serde(default)]
    pub bike_share_distance: Option<f64>,
    /// Competing businesses within the analysis radius.
    #[serde(default)]
    pub competitor_count: u32,
    /// Bike-share docks within the analysis radius.
    #[serde(default)]
    pub bike_share_count: u32,
    /// Monthly rent estimate. `None` means unknown, which is distinct from
    /// zero and must not penalize or reward the site.
    #[serde(default)]
    pub rent: Option<f64>,
}

/// The four normalized sub-scores, each in `[0, 100]` rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubScores {
    /// Foot-traffic sub-score derived from flow accessibility.
    pub flow: f64,
    /// Competitive-pressure sub-score derived from the supply/demand ratio.
    pub supply_demand: f64,
    /// Bike-share infrastructure sub-score.
    pub bike_share: f64,
    /// Rent affordability sub-score (neutral 50.0 when rent is unknown).
    pub rent: f64,
}

/// Computed scoring output for one site. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Estimated effective daily foot traffic reaching the site.
    pub flow_accessibility: u64,
    /// Competitor count normalized by flow. `999.0` when flow is zero.
    pub supply_demand_ratio: f64,
    /// The four normalized sub-scores.
    pub sub_scores: SubScores,
    /// Weighted composite in `[0, 100]`, rounded to one decimal.
    pub composite_score: f64,
    /// Categorical recommendation derived from composite score and ratio.
    pub recommendation_tier: RecommendationTier,
    /// Categorical competition status derived from the ratio alone.
    pub supply_demand_status: SupplyDemandStatus,
}

/// Ordered recommendation tiers for a scored site.
///
/// The top two tiers gate on both the composite score and the supply/demand
/// ratio: a high-scoring but oversaturated site cannot reach them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendationTier {
    /// Composite ≥ 85 and ratio < 0.5.
    StronglyRecommended,
    /// Composite ≥ 70 and ratio < 0.7.
    Recommended,
    /// Composite ≥ 60, regardless of ratio.
    ConsiderWithCaution,
    /// Everything else.
    NotRecommended,
}

impl RecommendationTier {
    /// Classifies a composite score and supply/demand ratio into a tier.
    ///
    /// Evaluated top-down, first match wins.
    #[must_use]
    pub fn classify(composite_score: f64, supply_demand_ratio: f64) -> Self {
        if composite_score >= 85.0 && supply_demand_ratio < 0.5 {
            Self::StronglyRecommended
        } else if composite_score >= 70.0 && supply_demand_ratio < 0.7 {
            Self::Recommended
        } else if composite_score >= 60.0 {
            Self::ConsiderWithCaution
        } else {
            Self::NotRecommended
        }
    }

    /// Human-readable label for display surfaces.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::StronglyRecommended => "strongly recommended",
            Self::Recommended => "recommended",
            Self::ConsiderWithCaution => "consider with caution",
            Self::NotRecommended => "not recommended",
        }
    }
}

/// Ordered competition status labels derived from the supply/demand ratio.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplyDemandStatus {
    /// Ratio < 0.5: demand clearly outstrips supply.
    Undersupplied,
    /// Ratio < 0.7: healthy competitive pressure.
    ModerateCompetition,
    /// Ratio < 1.0: little room left in the market.
    NearSaturation,
    /// Ratio ≥ 1.0: supply meets or exceeds demand.
    MarketSaturated,
}

impl SupplyDemandStatus {
    /// Classifies a supply/demand ratio into a status, evaluated top-down.
    #[must_use]
    pub fn classify(supply_demand_ratio: f64) -> Self {
        if supply_demand_ratio < 0.5 {
            Self::Undersupplied
        } else if supply_demand_ratio < 0.7 {
            Self::ModerateCompetition
        } else if supply_demand_ratio < 1.0 {
            Self::NearSaturation
        } else {
            Self::MarketSaturated
        }
    }

    /// Human-readable label for display surfaces.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Undersupplied => "undersupplied",
            Self::ModerateCompetition => "moderate competition",
            Self::NearSaturation => "near saturation",
            Self::MarketSaturated => "market saturated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strongly_recommended_requires_low_ratio() {
        assert_eq!(
            RecommendationTier::classify(90.0, 0.4),
            RecommendationTier::StronglyRecommended
        );
        // Same score, saturated market: falls past both gated tiers.
        assert_eq!(
            RecommendationTier::classify(95.0, 0.8),
            RecommendationTier::ConsiderWithCaution
        );
    }

    #[test]
    fn recommended_requires_moderate_ratio() {
        assert_eq!(
            RecommendationTier::classify(75.0, 0.6),
            RecommendationTier::Recommended
        );
        assert_eq!(
            RecommendationTier::classify(75.0, 0.7),
            RecommendationTier::ConsiderWithCaution
        );
    }

    #[test]
    fn caution_tier_ignores_ratio() {
        assert_eq!(
            RecommendationTier::classify(60.0, 5.0),
            RecommendationTier::ConsiderWithCaution
        );
    }

    #[test]
    fn below_sixty_is_not_recommended() {
        assert_eq!(
            RecommendationTier::classify(59.9, 0.0),
            RecommendationTier::NotRecommended
        );
    }

    #[test]
    fn tier_boundary_values() {
        assert_eq!(
            RecommendationTier::classify(85.0, 0.49),
            RecommendationTier::StronglyRecommended
        );
        // Ratio exactly at the ceiling falls to the next tier.
        assert_eq!(
            RecommendationTier::classify(85.0, 0.5),
            RecommendationTier::Recommended
        );
        assert_eq!(
            RecommendationTier::classify(70.0, 0.69),
            RecommendationTier::Recommended
        );
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(
            SupplyDemandStatus::classify(0.0),
            SupplyDemandStatus::Undersupplied
        );
        assert_eq!(
            SupplyDemandStatus::classify(0.5),
            SupplyDemandStatus::ModerateCompetition
        );
        assert_eq!(
            SupplyDemandStatus::classify(0.7),
            SupplyDemandStatus::NearSaturation
        );
        assert_eq!(
            SupplyDemandStatus::classify(1.0),
            SupplyDemandStatus::MarketSaturated
        );
        assert_eq!(
            SupplyDemandStatus::classify(999.0),
            SupplyDemandStatus::MarketSaturated
        );
    }

    #[test]
    fn tier_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&RecommendationTier::StronglyRecommended).unwrap();
        assert_eq!(json, "\"STRONGLY_RECOMMENDED\"");
        let back: RecommendationTier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RecommendationTier::StronglyRecommended);
    }

    #[test]
    fn site_input_optional_fields_default() {
        let input: SiteInput = serde_json::from_str(r#"{"dailyFlow": 20000}"#).unwrap();
        assert_eq!(input.daily_flow, 20_000);
        assert!(input.transit_distance.abs() < f64::EPSILON);
        assert!(input.bike_share_distance.is_none());
        assert_eq!(input.competitor_count, 0);
        assert_eq!(input.bike_share_count, 0);
        assert!(input.rent.is_none());
    }
}
