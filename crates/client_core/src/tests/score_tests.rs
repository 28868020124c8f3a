use super::*;

#[test]
fn similarity_boundaries_belong_to_the_higher_band() {
    assert_eq!(band(0.85, Scale::Similarity), Band::High);
    assert_eq!(band(0.8499, Scale::Similarity), Band::Medium);
    assert_eq!(band(0.70, Scale::Similarity), Band::Medium);
    assert_eq!(band(0.6999, Scale::Similarity), Band::Low);
}

#[test]
fn compliance_boundaries_belong_to_the_higher_band() {
    assert_eq!(compliance_band(85), Band::High);
    assert_eq!(compliance_band(84), Band::Medium);
    assert_eq!(compliance_band(70), Band::Medium);
    assert_eq!(compliance_band(69), Band::Low);
}

#[test]
fn out_of_range_scores_clamp_to_nearest_band() {
    assert_eq!(band(1.7, Scale::Similarity), Band::High);
    assert_eq!(band(-0.3, Scale::Similarity), Band::Low);
    assert_eq!(compliance_band(250), Band::High);
    assert_eq!(compliance_band(-5), Band::Low);
    assert_eq!(band(f64::INFINITY, Scale::Compliance), Band::High);
    assert_eq!(band(f64::NEG_INFINITY, Scale::Compliance), Band::Low);
    assert_eq!(band(f64::NAN, Scale::Similarity), Band::Low);
}

#[test]
fn banding_is_monotonic_in_both_scales() {
    for scale in [Scale::Similarity, Scale::Compliance] {
        let max = match scale {
            Scale::Similarity => 1.0,
            Scale::Compliance => 100.0,
        };
        let mut previous = band(-1.0, scale);
        for step in 0..=1000 {
            let score = max * f64::from(step) / 1000.0;
            let current = band(score, scale);
            assert!(current >= previous, "{scale:?} band dropped at {score}");
            previous = current;
        }
    }
}

#[test]
fn compliance_bands_map_to_traffic_light_tones() {
    assert_eq!(compliance_band(90).tone(), Tone::Green);
    assert_eq!(compliance_band(73).tone(), Tone::Amber);
    assert_eq!(compliance_band(10).tone(), Tone::Red);
}

#[test]
fn similarity_percent_rounds_and_clamps() {
    assert_eq!(similarity_percent(0.914), 91);
    assert_eq!(similarity_percent(1.2), 100);
    assert_eq!(similarity_percent(-0.1), 0);
    assert_eq!(similarity_percent(f64::NAN), 0);
}
