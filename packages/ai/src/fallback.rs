//! Deterministic fallback narrative used when no LLM provider is
//! configured or the provider call fails.

use cafe_map_site_models::RecommendationTier;
use cafe_map_warehouse_models::AnalysisSite;

/// Builds a rule-based explanation for a site.
///
/// The verdict paragraph is keyed off the same tier classification the
/// scoring engine uses, so the fallback never contradicts the numbers
/// it is describing.
#[must_use]
pub fn fallback_narrative(site: &AnalysisSite) -> String {
    let tier = RecommendationTier::classify(site.optimal_score, site.supply_demand_ratio);

    let verdict = match tier {
        RecommendationTier::StronglyRecommended => {
            "**Verdict: strongly recommended.** High foot traffic with clearly unmet demand. \
             Competitors have not caught up to the flow through this zone, so a well-run cafe \
             should capture share quickly. Move early; gaps like this close."
        }
        RecommendationTier::Recommended => {
            "**Verdict: recommended.** Solid fundamentals with moderate competition. The flow \
             supports another operator, but differentiation matters here. Lead with product \
             quality or a format the incumbents do not offer."
        }
        RecommendationTier::ConsiderWithCaution => {
            "**Verdict: consider with caution.** The numbers work only under the right \
             conditions. Validate rent against projected volume and visit at peak hours before \
             committing. A niche concept fares better than a generic one in this zone."
        }
        RecommendationTier::NotRecommended => {
            "**Verdict: not recommended.** Either the reachable flow is too thin or the market \
             is already saturated. Capital is better deployed at a stronger zone nearby."
        }
    };

    let mut body = format!(
        "## {station} ({zone})\n\n\
         Composite score **{score:.1}/100** ({level}). Effective daily reach is \
         **{reach}** people after distance decay, against **{competitors}** nearby \
         competitors ({cafes} of them cafes). Supply/demand ratio: **{ratio:.2}** \
         ({sd_level} competition). Bike-share coverage: {docks} docks ({bike_level}).\n\n",
        station = site.station,
        zone = site.zone_label,
        score = site.optimal_score,
        level = site.score_level,
        reach = site.flow_accessibility,
        competitors = site.total_competitors,
        cafes = site.cafe_count,
        ratio = site.supply_demand_ratio,
        sd_level = site.supply_demand_level,
        docks = site.bike_share_count,
        bike_level = site.bike_share_level,
    );

    if let Some(rent) = site.rent {
        let score = site
            .rent_score
            .map_or_else(String::new, |s| format!(" (rent score {s:.0}/100)"));
        body.push_str(&format!("Median asking rent: **{rent:.0}/month**{score}.\n\n"));
    }

    body.push_str(verdict);
    body
}
