//! Scoring pipeline: flow accessibility, supply/demand ratio, the four
//! sub-scores, and the weighted composite with categorical labels.

use cafe_map_site_models::{
    RecommendationTier, ScoreResult, SiteInput, SubScores, SupplyDemandStatus,
};

use crate::ScoreError;
use crate::decay::combined_decay;

/// Sentinel supply/demand ratio for zero-flow sites.
///
/// Large enough to floor the supply sub-score and block the gated
/// recommendation tiers, so a zero-flow site always lands on
/// "not recommended" without ever dividing by zero.
pub const RATIO_SENTINEL: f64 = 999.0;

/// Flow unit used to normalize competitor counts (competitors per 10k daily
/// passengers).
const RATIO_FLOW_UNIT: f64 = 10_000.0;

/// Composite weights. Must sum to exactly 1.0; asserted in tests.
const FLOW_WEIGHT: f64 = 0.40;
const SUPPLY_DEMAND_WEIGHT: f64 = 0.30;
const BIKE_SHARE_WEIGHT: f64 = 0.20;
const RENT_WEIGHT: f64 = 0.10;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Estimated effective daily foot traffic reaching a site, after decay.
///
/// `daily_flow = 0` yields 0 regardless of the decay coefficients.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn flow_accessibility(
    daily_flow: u64,
    transit_distance_m: f64,
    bike_share_distance_m: Option<f64>,
) -> u64 {
    let decay = combined_decay(transit_distance_m, bike_share_distance_m);
    (daily_flow as f64 * decay).round() as u64
}

/// Competitor count normalized by flow, rounded to 2 decimal places.
///
/// Zero flow is a degenerate denominator and returns [`RATIO_SENTINEL`]
/// instead of dividing.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn supply_demand_ratio(competitor_count: u32, daily_flow: u64) -> f64 {
    if daily_flow == 0 {
        return RATIO_SENTINEL;
    }
    round2(f64::from(competitor_count) / (daily_flow as f64 / RATIO_FLOW_UNIT))
}

#[allow(clippy::cast_precision_loss)]
fn flow_sub_score(flow_accessibility: u64) -> f64 {
    round1((flow_accessibility as f64 / 1000.0).min(100.0))
}

fn supply_demand_sub_score(ratio: f64) -> f64 {
    round1((100.0 - ratio * 50.0).max(0.0))
}

fn bike_share_sub_score(bike_share_count: u32) -> f64 {
    round1((f64::from(bike_share_count) * 20.0).min(100.0))
}

/// Rent affordability sub-score: a step function where higher rent scores
/// lower. Unknown rent is neutral (50.0), never a penalty or a reward.
#[must_use]
pub fn rent_sub_score(rent: Option<f64>) -> f64 {
    let Some(rent) = rent else {
        return 50.0;
    };
    if rent <= 1200.0 {
        100.0
    } else if rent <= 1400.0 {
        85.0
    } else if rent <= 1600.0 {
        70.0
    } else if rent <= 1800.0 {
        55.0
    } else if rent <= 2000.0 {
        40.0
    } else {
        0.0
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), ScoreError> {
    if !value.is_finite() {
        return Err(ScoreError::InvalidField {
            field,
            reason: format!("expected a finite number, got {value}"),
        });
    }
    if value < 0.0 {
        return Err(ScoreError::InvalidField {
            field,
            reason: format!("expected a non-negative number, got {value}"),
        });
    }
    Ok(())
}

fn validate(input: &SiteInput) -> Result<(), ScoreError> {
    require_non_negative("transitDistance", input.transit_distance)?;
    if let Some(d) = input.bike_share_distance {
        require_non_negative("bikeShareDistance", d)?;
    }
    if let Some(r) = input.rent {
        require_non_negative("rent", r)?;
    }
    Ok(())
}

/// Scores a single site.
///
/// # Errors
///
/// Returns [`ScoreError::InvalidField`] if a distance or rent value is
/// negative or not a finite number. Zero flow and missing optional fields
/// are not errors.
pub fn score_site(input: &SiteInput) -> Result<ScoreResult, ScoreError> {
    validate(input)?;

    let flow_accessibility = flow_accessibility(
        input.daily_flow,
        input.transit_distance,
        input.bike_share_distance,
    );
    let ratio = supply_demand_ratio(input.competitor_count, input.daily_flow);

    let sub_scores = SubScores {
        flow: flow_sub_score(flow_accessibility),
        supply_demand: supply_demand_sub_score(ratio),
        bike_share: bike_share_sub_score(input.bike_share_count),
        rent: rent_sub_score(input.rent),
    };

    let composite_score = round1(
        sub_scores.flow * FLOW_WEIGHT
            + sub_scores.supply_demand * SUPPLY_DEMAND_WEIGHT
            + sub_scores.bike_share * BIKE_SHARE_WEIGHT
            + sub_scores.rent * RENT_WEIGHT,
    );

    Ok(ScoreResult {
        flow_accessibility,
        supply_demand_ratio: ratio,
        sub_scores,
        composite_score,
        recommendation_tier: RecommendationTier::classify(composite_score, ratio),
        supply_demand_status: SupplyDemandStatus::classify(ratio),
    })
}

/// Scores an ordered batch of sites.
///
/// Results are returned in input order and each element succeeds or fails
/// independently: one malformed site never prevents scoring the rest.
#[must_use]
pub fn score_batch(inputs: &[SiteInput]) -> Vec<Result<ScoreResult, ScoreError>> {
    inputs.iter().map(score_site).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> SiteInput {
        SiteInput {
            daily_flow: 20_000,
            transit_distance: 100.0,
            bike_share_distance: None,
            competitor_count: 0,
            bike_share_count: 0,
            rent: None,
        }
    }

    #[test]
    fn weights_sum_to_one() {
        let total = FLOW_WEIGHT + SUPPLY_DEMAND_WEIGHT + BIKE_SHARE_WEIGHT + RENT_WEIGHT;
        assert!((total - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn full_decay_passes_flow_through() {
        // 100m from the station: pedestrian decay is 1.0, so accessibility
        // equals the raw flow exactly.
        assert_eq!(flow_accessibility(20_000, 100.0, None), 20_000);
    }

    #[test]
    fn zero_flow_uses_sentinel_and_is_not_recommended() {
        let input = SiteInput {
            daily_flow: 0,
            competitor_count: 10,
            bike_share_count: 5,
            ..base_input()
        };
        let result = score_site(&input).unwrap();
        assert_eq!(result.flow_accessibility, 0);
        assert!((result.supply_demand_ratio - RATIO_SENTINEL).abs() < f64::EPSILON);
        assert!((result.sub_scores.supply_demand - 0.0).abs() < f64::EPSILON);
        assert_eq!(
            result.recommendation_tier,
            cafe_map_site_models::RecommendationTier::NotRecommended
        );
        assert_eq!(
            result.supply_demand_status,
            cafe_map_site_models::SupplyDemandStatus::MarketSaturated
        );
    }

    #[test]
    fn ratio_rounds_to_two_decimals() {
        // 7 / (30000 / 10000) = 2.333... -> 2.33
        assert!((supply_demand_ratio(7, 30_000) - 2.33).abs() < f64::EPSILON);
    }

    #[test]
    fn flow_sub_score_saturates_at_hundred() {
        assert!((flow_sub_score(100_000) - 100.0).abs() < f64::EPSILON);
        assert!((flow_sub_score(250_000) - 100.0).abs() < f64::EPSILON);
        assert!((flow_sub_score(50_000) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn supply_sub_score_floors_at_zero() {
        assert!((supply_demand_sub_score(2.0) - 0.0).abs() < f64::EPSILON);
        assert!((supply_demand_sub_score(6.0) - 0.0).abs() < f64::EPSILON);
        assert!((supply_demand_sub_score(0.0) - 100.0).abs() < f64::EPSILON);
        assert!((supply_demand_sub_score(1.0) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bike_share_sub_score_saturates_at_five_docks() {
        assert!((bike_share_sub_score(5) - 100.0).abs() < f64::EPSILON);
        assert!((bike_share_sub_score(12) - 100.0).abs() < f64::EPSILON);
        assert!((bike_share_sub_score(3) - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rent_sub_score_steps() {
        assert!((rent_sub_score(Some(1200.0)) - 100.0).abs() < f64::EPSILON);
        assert!((rent_sub_score(Some(1400.0)) - 85.0).abs() < f64::EPSILON);
        assert!((rent_sub_score(Some(1600.0)) - 70.0).abs() < f64::EPSILON);
        assert!((rent_sub_score(Some(1800.0)) - 55.0).abs() < f64::EPSILON);
        assert!((rent_sub_score(Some(2000.0)) - 40.0).abs() < f64::EPSILON);
        assert!((rent_sub_score(Some(2000.1)) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_rent_is_neutral() {
        let without = score_site(&base_input()).unwrap();
        assert!((without.sub_scores.rent - 50.0).abs() < f64::EPSILON);

        // Everything else identical: only the rent sub-score moves.
        let with = score_site(&SiteInput {
            rent: Some(1000.0),
            ..base_input()
        })
        .unwrap();
        assert!((with.sub_scores.rent - 100.0).abs() < f64::EPSILON);
        assert!((with.sub_scores.flow - without.sub_scores.flow).abs() < f64::EPSILON);
    }

    #[test]
    fn more_competitors_never_raises_composite() {
        let mut previous = f64::INFINITY;
        for competitors in [0, 1, 2, 5, 10, 50, 200] {
            let result = score_site(&SiteInput {
                competitor_count: competitors,
                ..base_input()
            })
            .unwrap();
            assert!(result.composite_score <= previous);
            previous = result.composite_score;
        }
    }

    #[test]
    fn saturated_ratio_blocks_gated_tiers() {
        // Flow saturates (150k reach), 5 docks saturate, but 30 competitors
        // against 150k flow give ratio 2.0: supply floors to 0 and the
        // composite of 65.0 can only reach the caution tier.
        let input = SiteInput {
            daily_flow: 150_000,
            transit_distance: 100.0,
            competitor_count: 30,
            bike_share_count: 5,
            ..base_input()
        };
        let result = score_site(&input).unwrap();
        assert!((result.supply_demand_ratio - 2.0).abs() < f64::EPSILON);
        assert!((result.sub_scores.flow - 100.0).abs() < f64::EPSILON);
        assert!((result.sub_scores.supply_demand - 0.0).abs() < f64::EPSILON);
        assert!((result.composite_score - 65.0).abs() < f64::EPSILON);
        assert_eq!(
            result.recommendation_tier,
            cafe_map_site_models::RecommendationTier::ConsiderWithCaution
        );
    }

    #[test]
    fn undersupplied_high_scorer_is_strongly_recommended() {
        let input = SiteInput {
            daily_flow: 150_000,
            transit_distance: 100.0,
            competitor_count: 3,
            bike_share_count: 5,
            rent: Some(1100.0),
            ..base_input()
        };
        let result = score_site(&input).unwrap();
        // ratio 0.2 -> supply 90; composite 40 + 27 + 20 + 10 = 97.0
        assert!((result.composite_score - 97.0).abs() < f64::EPSILON);
        assert_eq!(
            result.recommendation_tier,
            cafe_map_site_models::RecommendationTier::StronglyRecommended
        );
        assert_eq!(
            result.supply_demand_status,
            cafe_map_site_models::SupplyDemandStatus::Undersupplied
        );
    }

    #[test]
    fn negative_distance_names_the_field() {
        let err = score_site(&SiteInput {
            transit_distance: -5.0,
            ..base_input()
        })
        .unwrap_err();
        match err {
            ScoreError::InvalidField { field, .. } => assert_eq!(field, "transitDistance"),
        }
    }

    #[test]
    fn nan_rent_is_rejected() {
        let err = score_site(&SiteInput {
            rent: Some(f64::NAN),
            ..base_input()
        })
        .unwrap_err();
        match err {
            ScoreError::InvalidField { field, .. } => assert_eq!(field, "rent"),
        }
    }

    #[test]
    fn batch_preserves_order_and_isolates_failures() {
        let inputs = vec![
            base_input(),
            SiteInput {
                transit_distance: f64::NAN,
                ..base_input()
            },
            SiteInput {
                daily_flow: 50_000,
                ..base_input()
            },
        ];
        let results = score_batch(&inputs);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
        assert_eq!(results[2].as_ref().unwrap().flow_accessibility, 50_000);
    }

    #[test]
    fn bike_share_dock_extends_catchment() {
        // 1800m from transit: walking alone decays to 0.2, but a dock at
        // 150m restores 0.8 of the base flow.
        let without = flow_accessibility(10_000, 1800.0, None);
        let with = flow_accessibility(10_000, 1800.0, Some(150.0));
        assert_eq!(without, 2_000);
        assert_eq!(with, 8_000);
    }
}
