//! Normalization of free-text warehouse labels into closed enums.
//!
//! The analysis tables carry level columns as free text written by several
//! generations of upstream jobs (`"EXCELLENT"`, `"Good"`, `"high comp."`,
//! sometimes empty). Each function here fuzzily matches the label and falls
//! back to the numeric signal when the text is missing or unrecognized, so
//! every row leaving this crate carries a closed enum.

use cafe_map_warehouse_models::{
    BikeShareLevel, DistanceCategory, FlowLevel, ScoreLevel, SupplyDemandLevel,
};

fn token(label: Option<&str>) -> String {
    label.unwrap_or_default().trim().to_uppercase()
}

/// Score band from the label, or from the composite score when the label is
/// unusable.
#[must_use]
pub fn score_level(label: Option<&str>, optimal_score: f64) -> ScoreLevel {
    let t = token(label);
    if t.contains("EXCELLENT") {
        ScoreLevel::Excellent
    } else if t.contains("GOOD") {
        ScoreLevel::Good
    } else if t.contains("FAIR") {
        ScoreLevel::Fair
    } else if t.contains("POOR") {
        ScoreLevel::Poor
    } else if optimal_score >= 85.0 {
        ScoreLevel::Excellent
    } else if optimal_score >= 70.0 {
        ScoreLevel::Good
    } else if optimal_score >= 60.0 {
        ScoreLevel::Fair
    } else {
        ScoreLevel::Poor
    }
}

/// Foot-traffic band from the label, or from the effective reach.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn flow_level(label: Option<&str>, flow_accessibility: u64) -> FlowLevel {
    let t = token(label);
    if t.contains("HIGH") {
        FlowLevel::High
    } else if t.contains("MEDIUM") || t.contains("MODERATE") {
        FlowLevel::Medium
    } else if t.contains("LOW") {
        FlowLevel::Low
    } else if flow_accessibility as f64 >= 50_000.0 {
        FlowLevel::High
    } else if flow_accessibility as f64 >= 10_000.0 {
        FlowLevel::Medium
    } else {
        FlowLevel::Low
    }
}

/// Competition band from the label, or from the supply/demand ratio.
#[must_use]
pub fn supply_demand_level(label: Option<&str>, supply_demand_ratio: f64) -> SupplyDemandLevel {
    let t = token(label);
    // "LOW"/"HIGH" here describe competition, not flow; check the longer
    // tokens first so "MEDIUM-HIGH" style labels land on the stricter band.
    if t.contains("HIGH") || t.contains("SATURAT") {
        SupplyDemandLevel::High
    } else if t.contains("MEDIUM") || t.contains("MODERATE") {
        SupplyDemandLevel::Medium
    } else if t.contains("LOW") || t.contains("UNDERSUPPL") {
        SupplyDemandLevel::Low
    } else if supply_demand_ratio < 0.5 {
        SupplyDemandLevel::Low
    } else if supply_demand_ratio < 1.0 {
        SupplyDemandLevel::Medium
    } else {
        SupplyDemandLevel::High
    }
}

/// Bike-share band from the label, or from the dock count.
#[must_use]
pub fn bike_share_level(label: Option<&str>, bike_share_count: u32) -> BikeShareLevel {
    let t = token(label);
    if t.contains("EXCELLENT") {
        BikeShareLevel::Excellent
    } else if t.contains("GOOD") {
        BikeShareLevel::Good
    } else if t.contains("FAIR") {
        BikeShareLevel::Fair
    } else if t.contains("POOR") || t.contains("NONE") {
        BikeShareLevel::Poor
    } else {
        match bike_share_count {
            0 => BikeShareLevel::Poor,
            1 | 2 => BikeShareLevel::Fair,
            3 | 4 => BikeShareLevel::Good,
            _ => BikeShareLevel::Excellent,
        }
    }
}

/// Access mode category from the label, or from the zone start distance.
#[must_use]
pub fn distance_category(label: Option<&str>, zone_start_m: f64) -> DistanceCategory {
    let t = token(label);
    if t.contains("WALK") {
        DistanceCategory::Walk
    } else if t.contains("BIKE") {
        DistanceCategory::BikeShare
    } else if t.contains("TRANSIT") || t.contains("TRANSFER") {
        DistanceCategory::Transit
    } else if t.contains("FAR") {
        DistanceCategory::Far
    } else if zone_start_m < 500.0 {
        DistanceCategory::Walk
    } else if zone_start_m < 1500.0 {
        DistanceCategory::BikeShare
    } else if zone_start_m < 2500.0 {
        DistanceCategory::Transit
    } else {
        DistanceCategory::Far
    }
}

/// Recommendation flag from the label, when present.
///
/// Upstream jobs wrote `YES`/`NO`, `TRUE`/`FALSE`, and bare booleans over
/// the years. `None` means the label is unusable and the caller should fall
/// back to classifying the numeric score.
#[must_use]
pub fn recommended_flag(label: Option<&str>) -> Option<bool> {
    let t = token(label);
    if t.is_empty() {
        return None;
    }
    if t.contains("YES") || t == "TRUE" || t == "1" {
        Some(true)
    } else if t.contains("NO") || t == "FALSE" || t == "0" {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_wins_over_numeric_fallback() {
        assert_eq!(score_level(Some("excellent"), 10.0), ScoreLevel::Excellent);
        assert_eq!(flow_level(Some(" High "), 0), FlowLevel::High);
    }

    #[test]
    fn numeric_fallback_when_label_missing() {
        assert_eq!(score_level(None, 86.0), ScoreLevel::Excellent);
        assert_eq!(score_level(Some("??"), 64.0), ScoreLevel::Fair);
        assert_eq!(flow_level(None, 55_000), FlowLevel::High);
        assert_eq!(flow_level(None, 500), FlowLevel::Low);
    }

    #[test]
    fn fuzzy_substring_matching() {
        assert_eq!(
            supply_demand_level(Some("near saturation"), 0.0),
            SupplyDemandLevel::High
        );
        assert_eq!(
            distance_category(Some("walkable"), 9_999.0),
            DistanceCategory::Walk
        );
        assert_eq!(
            bike_share_level(Some("good coverage"), 0),
            BikeShareLevel::Good
        );
    }

    #[test]
    fn supply_demand_numeric_bands() {
        assert_eq!(supply_demand_level(None, 0.4), SupplyDemandLevel::Low);
        assert_eq!(supply_demand_level(None, 0.8), SupplyDemandLevel::Medium);
        assert_eq!(supply_demand_level(None, 1.2), SupplyDemandLevel::High);
    }

    #[test]
    fn distance_numeric_bands() {
        assert_eq!(distance_category(None, 100.0), DistanceCategory::Walk);
        assert_eq!(distance_category(None, 900.0), DistanceCategory::BikeShare);
        assert_eq!(distance_category(None, 2_000.0), DistanceCategory::Transit);
        assert_eq!(distance_category(None, 3_000.0), DistanceCategory::Far);
    }

    #[test]
    fn recommended_flag_variants() {
        assert_eq!(recommended_flag(Some("YES")), Some(true));
        assert_eq!(recommended_flag(Some("true")), Some(true));
        assert_eq!(recommended_flag(Some("NO")), Some(false));
        assert_eq!(recommended_flag(Some("maybe")), None);
        assert_eq!(recommended_flag(None), None);
    }
}
