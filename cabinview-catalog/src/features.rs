use serde::Serialize;

use crate::cabin::CabinSpecs;

const COMPARATIVE_RANK: &str = "Comparative rank unavailable";

// Used when a spec string has no leading number
const FALLBACK_BED_LENGTH_CM: u32 = 198;
const FALLBACK_SCREEN_INCHES: u32 = 18;
const FALLBACK_WIFI_MBPS: u32 = 15;
const FALLBACK_CABIN_AGE_YEARS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorStatus {
    Excellent,
    Fair,
    Poor,
}

impl IndicatorStatus {
    /// Grades `value` against two thresholds. With `lower_is_better` the
    /// thresholds are upper bounds instead of lower bounds.
    pub fn grade(value: u32, excellent: u32, fair: u32, lower_is_better: bool) -> Self {
        let (hits_excellent, hits_fair) = if lower_is_better {
            (value <= excellent, value <= fair)
        } else {
            (value >= excellent, value >= fair)
        };

        if hits_excellent {
            IndicatorStatus::Excellent
        } else if hits_fair {
            IndicatorStatus::Fair
        } else {
            IndicatorStatus::Poor
        }
    }

    fn pick(self, excellent: &str, fair: &str, poor: &str) -> String {
        match self {
            IndicatorStatus::Excellent => excellent,
            IndicatorStatus::Fair => fair,
            IndicatorStatus::Poor => poor,
        }
        .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tooltip {
    pub description: String,
    pub rank: String,
    pub average: &'static str,
    pub best: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub icon: &'static str,
    pub name: &'static str,
    pub value: String,
    pub status: IndicatorStatus,
    pub tooltip: Tooltip,
}

/// The six at-a-glance indicators shown on an offer card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureIndicators {
    pub bed_length: Feature,
    pub aisle_access: Feature,
    pub wifi: Feature,
    pub screen_size: Feature,
    pub privacy: Feature,
    pub cabin_age: Feature,
}

impl FeatureIndicators {
    pub fn extract(specs: &CabinSpecs) -> Self {
        let bed_length_cm = leading_number(specs.bed_length).unwrap_or(FALLBACK_BED_LENGTH_CM);
        let screen_inches = leading_number(specs.screen_size).unwrap_or(FALLBACK_SCREEN_INCHES);
        let wifi_mbps = leading_number(specs.wifi_speed).unwrap_or(FALLBACK_WIFI_MBPS);
        let cabin_age_years = leading_number(specs.cabin_age).unwrap_or(FALLBACK_CABIN_AGE_YEARS);

        let bed = IndicatorStatus::grade(bed_length_cm, 203, 198, false);
        let aisle = if specs.direct_aisle_access == "Yes - all seats" {
            IndicatorStatus::Excellent
        } else {
            IndicatorStatus::Fair
        };
        let wifi = IndicatorStatus::grade(wifi_mbps, 30, 15, false);
        let screen = IndicatorStatus::grade(screen_inches, 21, 17, false);
        let privacy = if specs.privacy_features.contains(&"Closing door") {
            IndicatorStatus::Excellent
        } else if specs.privacy_features.contains(&"High dividers") {
            IndicatorStatus::Fair
        } else {
            IndicatorStatus::Poor
        };
        let age = IndicatorStatus::grade(cabin_age_years, 3, 6, true);

        Self {
            bed_length: feature(
                "🛏️",
                "Bed Length",
                specs.bed_length.to_string(),
                bed,
                bed.pick(
                    "Excellent - Among the longest available",
                    "Fair - Acceptable length",
                    "Poor - Shorter than average",
                ),
                "198cm",
                "205cm",
            ),
            aisle_access: feature(
                "🚪",
                "Aisle Access",
                specs.configuration.to_string(),
                aisle,
                aisle.pick("Excellent - Direct aisle access", "Fair - Limited access", "Fair - Limited access"),
                "1-2-1 configuration",
                "1-2-1 Direct",
            ),
            wifi: feature(
                "📡",
                "WiFi",
                format!("{}, {}", specs.wifi_pricing, specs.wifi_speed),
                wifi,
                wifi.pick(
                    "Excellent - Fast and reliable",
                    "Fair - Moderate speed",
                    "Poor - Slow connection",
                ),
                "25 Mbps",
                "50+ Mbps",
            ),
            screen_size: feature(
                "📺",
                "Screen Size",
                specs.screen_size.to_string(),
                screen,
                screen.pick("Excellent - Large display", "Fair - Standard size", "Poor - Small screen"),
                "19.5\"",
                "24\"",
            ),
            privacy: feature(
                "🔒",
                "Privacy",
                specs.privacy_features.first().copied().unwrap_or("Standard").to_string(),
                privacy,
                privacy.pick(
                    "Excellent - Full privacy suite",
                    "Fair - Partial privacy",
                    "Poor - Limited privacy",
                ),
                "Enclosed Suite",
                "Door Suite",
            ),
            cabin_age: feature(
                "🎂",
                "Cabin Age",
                specs.cabin_age.to_string(),
                age,
                age.pick(
                    "Excellent - Brand new cabin",
                    "Fair - Moderately aged",
                    "Poor - Outdated cabin",
                ),
                "6 years",
                "2 years",
            ),
        }
    }
}

fn feature(
    icon: &'static str,
    name: &'static str,
    value: String,
    status: IndicatorStatus,
    description: String,
    average: &'static str,
    best: &'static str,
) -> Feature {
    Feature {
        icon,
        name,
        value,
        status,
        tooltip: Tooltip {
            description,
            rank: COMPARATIVE_RANK.to_string(),
            average,
            best,
        },
    }
}

/// Integer prefix of a display string: `"205cm (81 inches)"` -> 205,
/// `"21.5 inches"` -> 21, `"Free"` -> None.
fn leading_number(s: &str) -> Option<u32> {
    let s = s.trim_start();
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cabin::{lookup, DEFAULT_CABIN_SPECS};

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("205cm (81 inches)"), Some(205));
        assert_eq!(leading_number("21.5 inches"), Some(21));
        assert_eq!(leading_number("50+ Mbps"), Some(50));
        assert_eq!(leading_number("Free"), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(IndicatorStatus::grade(203, 203, 198, false), IndicatorStatus::Excellent);
        assert_eq!(IndicatorStatus::grade(198, 203, 198, false), IndicatorStatus::Fair);
        assert_eq!(IndicatorStatus::grade(197, 203, 198, false), IndicatorStatus::Poor);
        assert_eq!(IndicatorStatus::grade(3, 3, 6, true), IndicatorStatus::Excellent);
        assert_eq!(IndicatorStatus::grade(6, 3, 6, true), IndicatorStatus::Fair);
        assert_eq!(IndicatorStatus::grade(11, 3, 6, true), IndicatorStatus::Poor);
    }

    #[test]
    fn test_flagship_cabin_scores_excellent() {
        let indicators = FeatureIndicators::extract(lookup("LH", "359", "BUSINESS"));
        assert_eq!(indicators.bed_length.status, IndicatorStatus::Excellent);
        assert_eq!(indicators.aisle_access.status, IndicatorStatus::Excellent);
        assert_eq!(indicators.wifi.status, IndicatorStatus::Excellent);
        assert_eq!(indicators.screen_size.status, IndicatorStatus::Excellent);
        assert_eq!(indicators.privacy.status, IndicatorStatus::Excellent);
        assert_eq!(indicators.cabin_age.status, IndicatorStatus::Excellent);
        assert_eq!(indicators.wifi.value, "Free, 50+ Mbps");
    }

    #[test]
    fn test_legacy_cabin_scores_poor() {
        let indicators = FeatureIndicators::extract(lookup("LH", "346", "BUSINESS"));
        assert_eq!(indicators.bed_length.status, IndicatorStatus::Poor);
        assert_eq!(indicators.aisle_access.status, IndicatorStatus::Fair);
        assert_eq!(indicators.wifi.status, IndicatorStatus::Poor);
        assert_eq!(indicators.screen_size.status, IndicatorStatus::Poor);
        assert_eq!(indicators.privacy.status, IndicatorStatus::Poor);
        assert_eq!(indicators.cabin_age.status, IndicatorStatus::Poor);
        assert_eq!(indicators.cabin_age.tooltip.description, "Poor - Outdated cabin");
    }

    #[test]
    fn test_default_cabin() {
        let indicators = FeatureIndicators::extract(&DEFAULT_CABIN_SPECS);
        assert_eq!(indicators.bed_length.status, IndicatorStatus::Fair);
        assert_eq!(indicators.privacy.value, "Dividers");
        assert_eq!(indicators.privacy.tooltip.rank, COMPARATIVE_RANK);
    }
}
