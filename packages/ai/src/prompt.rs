//! Prompt builders for site explanation and comparison.

use std::fmt::Write as _;

use cafe_map_warehouse_models::AnalysisSite;

/// System prompt shared by the explain and compare calls.
pub const SYSTEM_PROMPT: &str = "You are a commercial real-estate siting consultant advising \
cafe operators. Ground every claim in the numbers provided; do not invent statistics. Answer \
in concise markdown with key figures bolded.";

fn fmt_rent(site: &AnalysisSite) -> String {
    site.rent
        .map_or_else(|| "unknown".to_string(), |r| format!("{r:.0}/month"))
}

/// One-site data panel shared by both prompts.
fn site_panel(site: &AnalysisSite) -> String {
    format!(
        "- Location: {station}, zone {zone}\n\
         - Composite score: {score:.1} / 100 ({level})\n\
         - Effective daily reach: {reach} ({flow_level} flow)\n\
         - Supply/demand ratio: {ratio:.2} ({competition} competition)\n\
         - Competitors: {cafes} cafes, {competitors} total nearby businesses\n\
         - Bike-share docks: {docks} ({bike_level})\n\
         - Access: {access} (zone starts {start:.0} m from the station)\n\
         - Median asking rent: {rent}",
        station = site.station,
        zone = site.zone_label,
        score = site.optimal_score,
        level = site.score_level,
        reach = site.flow_accessibility,
        flow_level = site.flow_level,
        ratio = site.supply_demand_ratio,
        competition = site.supply_demand_level,
        cafes = site.cafe_count,
        competitors = site.total_competitors,
        docks = site.bike_share_count,
        bike_level = site.bike_share_level,
        access = site.distance_category,
        start = site.zone_start_m,
        rent = fmt_rent(site),
    )
}

/// Builds the single-site explanation prompt.
#[must_use]
pub fn build_explain_prompt(site: &AnalysisSite) -> String {
    format!(
        "Assess the following candidate cafe site.\n\n\
         ## Site data\n{panel}\n\n\
         ## Requested analysis\n\
         1. Strategic value: the location's position in the transit network and its draw.\n\
         2. Competitive position: differentiate, or ride the cluster? Use the supply/demand \
         numbers.\n\
         3. Product positioning: what format fits this spot (grab-and-go, specialty, \
         work-friendly)?\n\
         4. Target audience: who passes through here, and when.\n\
         5. Business strategy: three to five concrete recommendations.\n\
         6. Verdict: a 1-10 confidence rating with a one-sentence justification.\n\n\
         Keep each section to at most two short paragraphs.",
        panel = site_panel(site),
    )
}

/// Builds the multi-site comparison prompt.
#[must_use]
pub fn build_compare_prompt(sites: &[AnalysisSite]) -> String {
    let mut body = format!("Compare the following {} candidate cafe sites.\n", sites.len());
    for (index, site) in sites.iter().enumerate() {
        let _ = write!(
            body,
            "\n### Site {n}: {station}, zone {zone}\n{panel}\n",
            n = index + 1,
            station = site.station,
            zone = site.zone_label,
            panel = site_panel(site),
        );
    }
    body.push_str(
        "\nProvide:\n\
         1. A ranking with rationale.\n\
         2. The core strength and main risk of each site.\n\
         3. Which type of operator each site suits.\n\
         4. A final pick if only one can be chosen, and why.",
    );
    body
}
