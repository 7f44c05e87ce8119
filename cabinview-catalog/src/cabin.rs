use serde::Serialize;

/// Cabin experience data for one airline/aircraft/cabin combination.
///
/// Values are display strings; [`crate::features`] parses the numeric ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinSpecs {
    // Seat & sleep
    pub seat_width: &'static str,
    pub seat_pitch: &'static str,
    pub recline: &'static str,
    pub bed_length: &'static str,
    pub bed_width: &'static str,
    pub bed_type: &'static str,
    pub comfort_features: &'static [&'static str],
    pub bedding: &'static [&'static str],

    // Entertainment
    pub screen_size: &'static str,
    pub resolution: &'static str,
    pub system_name: &'static str,
    pub content_library: &'static str,
    pub audio: &'static [&'static str],
    pub gaming: &'static str,

    // Connectivity
    pub wifi_availability: &'static str,
    pub wifi_speed: &'static str,
    pub wifi_pricing: &'static str,
    pub power_outlets: &'static [&'static str],
    pub device_storage: &'static str,
    pub holders: &'static str,

    // Dining
    pub service_style: &'static str,
    pub menu_quality: &'static str,
    pub beverages: &'static [&'static str],
    pub timing_options: &'static str,

    // Privacy & layout
    pub configuration: &'static str,
    pub direct_aisle_access: &'static str,
    pub privacy_features: &'static [&'static str],
    pub window_vs_aisle: &'static str,
    pub total_seats: &'static str,

    // Environment
    pub cabin_altitude: &'static str,
    pub noise_level: &'static str,
    pub air_quality: &'static str,
    pub lighting_control: &'static str,
    pub temperature_control: &'static str,
    pub cabin_age: &'static str,
}

/// Returned for any combination not present in [`CABIN_SPECS`].
pub static DEFAULT_CABIN_SPECS: CabinSpecs = CabinSpecs {
    seat_width: "21 inches",
    seat_pitch: "60 inches",
    recline: "Fully flat 180°",
    bed_length: "198cm (78 inches)",
    bed_width: "53cm (21 inches)",
    bed_type: "Fully flat bed",
    comfort_features: &["Adjustable headrest", "Footrest"],
    bedding: &["Blanket", "Pillow"],

    screen_size: "18 inches",
    resolution: "Full HD",
    system_name: "In-flight entertainment system",
    content_library: "200+ entertainment options",
    audio: &["Headphones included"],
    gaming: "Limited gaming available",

    wifi_availability: "Available",
    wifi_speed: "15 Mbps",
    wifi_pricing: "Varies by airline",
    power_outlets: &["110V AC outlet", "USB port"],
    device_storage: "Storage compartments",
    holders: "Basic device holder",

    service_style: "Menu service",
    menu_quality: "Premium dining",
    beverages: &["Wine", "Spirits", "Soft drinks"],
    timing_options: "Set meal times",

    configuration: "1-2-1",
    direct_aisle_access: "Most seats",
    privacy_features: &["Dividers"],
    window_vs_aisle: "Window preferred",
    total_seats: "40 business class seats",

    cabin_altitude: "6,500 feet",
    noise_level: "Moderate",
    air_quality: "Standard filtration",
    lighting_control: "Cabin lighting",
    temperature_control: "Climate controlled",
    cabin_age: "5 years",
};

/// Known combinations keyed by `{AIRLINE}_{AIRCRAFT}_{CABIN}`.
pub static CABIN_SPECS: &[(&str, CabinSpecs)] = &[
    // Lufthansa A350-900 Business (Allegris)
    (
        "LH_359_BUSINESS",
        CabinSpecs {
            seat_width: "22 inches",
            seat_pitch: "76 inches",
            recline: "Fully flat 180°",
            bed_length: "205cm (81 inches)",
            bed_width: "55cm (22 inches)",
            bed_type: "Fully flat bed with memory foam",
            comfort_features: &["Adjustable headrest", "Footrest", "Lumbar support", "Massage function"],
            bedding: &["Memory foam mattress pad", "Duvet", "2 pillows"],

            screen_size: "24 inches",
            resolution: "4K Ultra HD",
            system_name: "Allegris Entertainment",
            content_library: "300+ movies, 200+ TV shows",
            audio: &["Noise-canceling headphones", "Bluetooth connectivity"],
            gaming: "Xbox controller compatible",

            wifi_availability: "Complimentary throughout flight",
            wifi_speed: "50+ Mbps",
            wifi_pricing: "Free",
            power_outlets: &["110V AC outlet", "USB-A port", "USB-C port"],
            device_storage: "Multiple storage compartments",
            holders: "Adjustable phone and tablet holders",

            service_style: "On-demand dining",
            menu_quality: "Star chef designed menu",
            beverages: &["Premium wines", "Champagne", "Spirits", "Fresh juice bar"],
            timing_options: "Dine anytime during flight",

            configuration: "1-2-1 (all aisle access)",
            direct_aisle_access: "Yes - all seats",
            privacy_features: &["Closing door", "High dividers", "Personal suite"],
            window_vs_aisle: "Both have equal benefits",
            total_seats: "32 business class seats",

            cabin_altitude: "6,000 feet",
            noise_level: "Very quiet",
            air_quality: "Advanced HEPA filtration, 50% humidity",
            lighting_control: "Personal LED controls with presets",
            temperature_control: "Individual climate zones",
            cabin_age: "2 years",
        },
    ),
    // Lufthansa A340-600 Business (legacy)
    (
        "LH_346_BUSINESS",
        CabinSpecs {
            seat_width: "20 inches",
            seat_pitch: "60 inches",
            recline: "Fully flat 180°",
            bed_length: "193cm (76 inches)",
            bed_width: "51cm (20 inches)",
            bed_type: "Fully flat bed",
            comfort_features: &["Basic headrest"],
            bedding: &["Blanket", "Pillow"],

            screen_size: "15 inches",
            resolution: "Standard definition",
            system_name: "Legacy entertainment",
            content_library: "100+ entertainment options",
            audio: &["Basic headphones"],
            gaming: "No gaming",

            wifi_availability: "Available for purchase",
            wifi_speed: "5 Mbps",
            wifi_pricing: "$24.95 per flight",
            power_outlets: &["110V AC outlet"],
            device_storage: "Minimal storage",
            holders: "No holders",

            service_style: "Tray service",
            menu_quality: "Basic menu",
            beverages: &["House wines", "Beer"],
            timing_options: "Fixed meal times",

            configuration: "2-2-2 (no aisle access)",
            direct_aisle_access: "No - middle seats blocked",
            privacy_features: &["Minimal dividers"],
            window_vs_aisle: "Aisle seats slightly better",
            total_seats: "48 business class seats",

            cabin_altitude: "8,000 feet",
            noise_level: "Louder",
            air_quality: "Basic filtration, 30% humidity",
            lighting_control: "Cabin lights only",
            temperature_control: "Cabin climate control",
            cabin_age: "11 years",
        },
    ),
    // Qatar Airways A350-900 Qsuite
    (
        "QR_359_BUSINESS",
        CabinSpecs {
            seat_width: "21.5 inches",
            seat_pitch: "74 inches",
            recline: "Fully flat 180°",
            bed_length: "203cm (80 inches)",
            bed_width: "54cm (21.5 inches)",
            bed_type: "Fully flat bed",
            comfort_features: &["Adjustable headrest", "Footrest", "Lumbar support", "Massage function"],
            bedding: &["Mattress pad", "Duvet", "2 pillows"],

            screen_size: "21.5 inches",
            resolution: "Full HD",
            system_name: "Oryx One",
            content_library: "4000+ entertainment options",
            audio: &["Noise-canceling headphones", "Bluetooth connectivity"],
            gaming: "Gaming options available",

            wifi_availability: "Complimentary throughout flight",
            wifi_speed: "30 Mbps",
            wifi_pricing: "Free",
            power_outlets: &["110V AC outlet", "USB-A port", "USB-C port"],
            device_storage: "Multiple storage compartments",
            holders: "Phone and tablet holders",

            service_style: "On-demand dining",
            menu_quality: "Award-winning cuisine",
            beverages: &["Premium wines", "Champagne", "Spirits", "Fresh juices"],
            timing_options: "Dine anytime during flight",

            configuration: "1-2-1 (all aisle access)",
            direct_aisle_access: "Yes - all seats",
            privacy_features: &["Closing door", "High dividers", "Personal suite"],
            window_vs_aisle: "Both have equal benefits",
            total_seats: "36 business class seats",

            cabin_altitude: "6,000 feet",
            noise_level: "Very quiet",
            air_quality: "Advanced filtration, 45% humidity",
            lighting_control: "Personal LED controls",
            temperature_control: "Individual climate zones",
            cabin_age: "4 years",
        },
    ),
    // Singapore Airlines A350-900 Business
    (
        "SQ_359_BUSINESS",
        CabinSpecs {
            seat_width: "25 inches",
            seat_pitch: "60 inches",
            recline: "Fully flat 180°",
            bed_length: "198cm (78 inches)",
            bed_width: "63cm (25 inches)",
            bed_type: "Fully flat bed",
            comfort_features: &["Adjustable headrest", "Footrest", "Lumbar support"],
            bedding: &["Mattress pad", "Blanket", "Pillow"],

            screen_size: "18 inches",
            resolution: "Full HD",
            system_name: "KrisWorld",
            content_library: "1800+ entertainment options",
            audio: &["Noise-canceling headphones"],
            gaming: "Limited gaming options",

            wifi_availability: "Complimentary throughout flight",
            wifi_speed: "25 Mbps",
            wifi_pricing: "Free",
            power_outlets: &["110V AC outlet", "USB-A port"],
            device_storage: "Storage compartments",
            holders: "Phone holder",

            service_style: "Menu service",
            menu_quality: "Premium cuisine",
            beverages: &["Premium wines", "Champagne", "Spirits"],
            timing_options: "Set meal times with flexibility",

            configuration: "1-2-1 (all aisle access)",
            direct_aisle_access: "Yes - all seats",
            privacy_features: &["High dividers", "Enclosed suite (no door)"],
            window_vs_aisle: "Both have equal benefits",
            total_seats: "42 business class seats",

            cabin_altitude: "6,000 feet",
            noise_level: "Quiet",
            air_quality: "HEPA filtration, 40% humidity",
            lighting_control: "Mood lighting controls",
            temperature_control: "Zone climate control",
            cabin_age: "5 years",
        },
    ),
    // Emirates 777-300ER Business
    (
        "EK_77W_BUSINESS",
        CabinSpecs {
            seat_width: "20.5 inches",
            seat_pitch: "72 inches",
            recline: "Fully flat 180°",
            bed_length: "195cm (77 inches)",
            bed_width: "52cm (20.5 inches)",
            bed_type: "Fully flat bed",
            comfort_features: &["Adjustable headrest", "Footrest"],
            bedding: &["Mattress pad", "Blanket", "Pillow"],

            screen_size: "23 inches",
            resolution: "Full HD",
            system_name: "ICE",
            content_library: "5000+ entertainment options",
            audio: &["Noise-canceling headphones"],
            gaming: "Gaming available",

            wifi_availability: "Complimentary throughout flight",
            wifi_speed: "15 Mbps",
            wifi_pricing: "Free",
            power_outlets: &["110V AC outlet", "USB port"],
            device_storage: "Storage compartments",
            holders: "Device holder",

            service_style: "Menu service",
            menu_quality: "Multi-course dining",
            beverages: &["Premium wines", "Spirits"],
            timing_options: "Set meal times",

            configuration: "1-2-1 (all aisle access)",
            direct_aisle_access: "Yes - all seats",
            privacy_features: &["High dividers", "Enclosed suite (no door)"],
            window_vs_aisle: "Both have equal benefits",
            total_seats: "42 business class seats",

            cabin_altitude: "7,000 feet",
            noise_level: "Moderate",
            air_quality: "Standard filtration, 35% humidity",
            lighting_control: "Cabin mood lighting",
            temperature_control: "Cabin climate control",
            cabin_age: "7 years",
        },
    ),
    // American Airlines 787-9 Business
    (
        "AA_789_BUSINESS",
        CabinSpecs {
            seat_width: "21 inches",
            seat_pitch: "64 inches",
            recline: "Fully flat 180°",
            bed_length: "193cm (76 inches)",
            bed_width: "53cm (21 inches)",
            bed_type: "Fully flat bed",
            comfort_features: &["Adjustable headrest"],
            bedding: &["Blanket", "Pillow"],

            screen_size: "16 inches",
            resolution: "HD",
            system_name: "Panasonic eX3",
            content_library: "300+ entertainment options",
            audio: &["Basic headphones"],
            gaming: "No gaming",

            wifi_availability: "Available for purchase",
            wifi_speed: "10 Mbps",
            wifi_pricing: "$19.95 per flight",
            power_outlets: &["110V AC outlet", "USB port"],
            device_storage: "Limited storage",
            holders: "No holders",

            service_style: "Tray service",
            menu_quality: "Standard menu",
            beverages: &["House wines", "Beer", "Spirits"],
            timing_options: "Fixed meal times",

            configuration: "1-2-1 (all aisle access)",
            direct_aisle_access: "Yes - all seats",
            privacy_features: &["Low dividers"],
            window_vs_aisle: "Window seats preferred",
            total_seats: "44 business class seats",

            cabin_altitude: "6,000 feet",
            noise_level: "Moderate",
            air_quality: "Standard filtration, 40% humidity",
            lighting_control: "Basic cabin lighting",
            temperature_control: "Cabin climate control",
            cabin_age: "6 years",
        },
    ),
];

/// Composite key used by [`CABIN_SPECS`].
pub fn cabin_key(airline_code: &str, aircraft_code: &str, cabin: &str) -> String {
    format!("{}_{}_{}", airline_code, aircraft_code, cabin)
}

/// Looks up cabin specs. A miss is not an error: it yields [`DEFAULT_CABIN_SPECS`].
pub fn lookup(airline_code: &str, aircraft_code: &str, cabin: &str) -> &'static CabinSpecs {
    let key = cabin_key(airline_code, aircraft_code, cabin);
    CABIN_SPECS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, specs)| specs)
        .unwrap_or(&DEFAULT_CABIN_SPECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let specs = lookup("QR", "359", "BUSINESS");
        assert_eq!(specs.system_name, "Oryx One");
        assert_eq!(specs.privacy_features[0], "Closing door");
    }

    #[test]
    fn test_unknown_combination_returns_default() {
        assert_eq!(lookup("ZZ", "999", "FIRST"), &DEFAULT_CABIN_SPECS);
        // Same airline and aircraft, different cabin
        assert_eq!(lookup("LH", "359", "ECONOMY"), &DEFAULT_CABIN_SPECS);
        // Keys are case sensitive
        assert_eq!(lookup("lh", "359", "BUSINESS"), &DEFAULT_CABIN_SPECS);
    }

    #[test]
    fn test_keys_are_unique() {
        for (i, (key, _)) in CABIN_SPECS.iter().enumerate() {
            assert!(
                CABIN_SPECS.iter().skip(i + 1).all(|(other, _)| other != key),
                "duplicate key {}",
                key
            );
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(lookup("EK", "77W", "BUSINESS")).unwrap();
        assert_eq!(value["systemName"], "ICE");
        assert_eq!(value["powerOutlets"][1], "USB port");
    }
}
