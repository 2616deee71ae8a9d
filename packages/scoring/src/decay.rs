//! Distance decay model.
//!
//! Two step functions map a physical distance to a unitless coefficient in
//! `[0, 1]`: the fraction of station-level foot traffic assumed to
//! realistically reach a site at that distance. The combined decay used by
//! the flow estimator is the maximum of the two, not the sum: a site is
//! reached by whichever mode gives better access.

/// Walking decay from the transit station, by distance in meters.
#[must_use]
pub fn pedestrian_decay(transit_distance_m: f64) -> f64 {
    if transit_distance_m <= 500.0 {
        1.0
    } else if transit_distance_m <= 1000.0 {
        0.7
    } else if transit_distance_m <= 1500.0 {
        0.4
    } else if transit_distance_m <= 2000.0 {
        0.2
    } else {
        0.05
    }
}

/// Bike-share decay, nonzero only when a dock is within 200 m of the site.
///
/// Beyond 4000 m of transit distance no amount of bike-share access
/// compensates, so the coefficient drops to zero.
#[must_use]
pub fn bike_share_decay(bike_distance_m: f64, transit_distance_m: f64) -> f64 {
    if bike_distance_m > 200.0 {
        return 0.0;
    }
    if transit_distance_m <= 2500.0 {
        0.8
    } else if transit_distance_m <= 3000.0 {
        0.6
    } else if transit_distance_m <= 4000.0 {
        0.4
    } else {
        0.0
    }
}

/// Combined decay coefficient: the better of the two access modes.
///
/// `bike_distance_m = None` means no nearby dock, so only walking applies.
#[must_use]
pub fn combined_decay(transit_distance_m: f64, bike_distance_m: Option<f64>) -> f64 {
    let walk = pedestrian_decay(transit_distance_m);
    let bike = bike_distance_m.map_or(0.0, |d| bike_share_decay(d, transit_distance_m));
    walk.max(bike)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pedestrian_decay_steps() {
        assert!((pedestrian_decay(0.0) - 1.0).abs() < f64::EPSILON);
        assert!((pedestrian_decay(500.0) - 1.0).abs() < f64::EPSILON);
        assert!((pedestrian_decay(500.1) - 0.7).abs() < f64::EPSILON);
        assert!((pedestrian_decay(1000.0) - 0.7).abs() < f64::EPSILON);
        assert!((pedestrian_decay(1500.0) - 0.4).abs() < f64::EPSILON);
        assert!((pedestrian_decay(2000.0) - 0.2).abs() < f64::EPSILON);
        assert!((pedestrian_decay(2000.1) - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn bike_decay_requires_close_dock() {
        assert!((bike_share_decay(201.0, 1000.0) - 0.0).abs() < f64::EPSILON);
        assert!((bike_share_decay(200.0, 2500.0) - 0.8).abs() < f64::EPSILON);
        assert!((bike_share_decay(200.0, 3000.0) - 0.6).abs() < f64::EPSILON);
        assert!((bike_share_decay(200.0, 4000.0) - 0.4).abs() < f64::EPSILON);
        assert!((bike_share_decay(200.0, 4000.1) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn combined_takes_maximum_not_sum() {
        // Walk 0.2 (1800m), bike 0.8 (dock at 100m, transit within 2500m).
        let combined = combined_decay(1800.0, Some(100.0));
        assert!((combined - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn combined_without_dock_is_walk_only() {
        assert!((combined_decay(100.0, None) - 1.0).abs() < f64::EPSILON);
        assert!((combined_decay(2100.0, None) - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn distant_dock_never_helps() {
        // Dock exists but is too far away to matter.
        assert!((combined_decay(1800.0, Some(500.0)) - 0.2).abs() < f64::EPSILON);
    }
}
