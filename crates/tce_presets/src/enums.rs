//! Enum value-set presets.
//!
//! Allowed-value lists for common categorical data (US states, country
//! codes, units of measure) plus the boolean recognition tokens shared by
//! type conformance and boolean normalization.

/// Boolean tokens recognized as true (lowercased, trimmed).
pub const BOOL_TRUE_TOKENS: &[&str] = &["true", "yes", "1", "t", "y", "on"];

/// Boolean tokens recognized as false (lowercased, trimmed).
pub const BOOL_FALSE_TOKENS: &[&str] = &["false", "no", "0", "f", "n", "off"];

/// Interprets a string as a boolean token. Matching is case-insensitive and
/// ignores surrounding whitespace; unrecognized tokens return `None`.
pub fn parse_bool_token(value: &str) -> Option<bool> {
    let lowered = value.trim().to_lowercase();
    if BOOL_TRUE_TOKENS.contains(&lowered.as_str()) {
        Some(true)
    } else if BOOL_FALSE_TOKENS.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// US state 2-letter codes (including DC).
pub const US_STATE_2_LETTER: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM",
    "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY",
];

/// US state full names (uppercased).
pub const US_STATE_FULL_NAME: &[&str] = &[
    "ALABAMA",
    "ALASKA",
    "ARIZONA",
    "ARKANSAS",
    "CALIFORNIA",
    "COLORADO",
    "CONNECTICUT",
    "DELAWARE",
    "DISTRICT OF COLUMBIA",
    "FLORIDA",
    "GEORGIA",
    "HAWAII",
    "IDAHO",
    "ILLINOIS",
    "INDIANA",
    "IOWA",
    "KANSAS",
    "KENTUCKY",
    "LOUISIANA",
    "MAINE",
    "MARYLAND",
    "MASSACHUSETTS",
    "MICHIGAN",
    "MINNESOTA",
    "MISSISSIPPI",
    "MISSOURI",
    "MONTANA",
    "NEBRASKA",
    "NEVADA",
    "NEW HAMPSHIRE",
    "NEW JERSEY",
    "NEW MEXICO",
    "NEW YORK",
    "NORTH CAROLINA",
    "NORTH DAKOTA",
    "OHIO",
    "OKLAHOMA",
    "OREGON",
    "PENNSYLVANIA",
    "RHODE ISLAND",
    "SOUTH CAROLINA",
    "SOUTH DAKOTA",
    "TENNESSEE",
    "TEXAS",
    "UTAH",
    "VERMONT",
    "VIRGINIA",
    "WASHINGTON",
    "WEST VIRGINIA",
    "WISCONSIN",
    "WYOMING",
];

/// ISO 3166-1 alpha-2 country codes.
pub const COUNTRY_ISO3166_ALPHA2: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX", "AZ",
    "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS",
    "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN",
    "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM", "DO", "DZ", "EC", "EE",
    "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF",
    "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
    "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR", "IS", "IT", "JE", "JM",
    "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN", "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC",
    "LI", "LK", "LR", "LS", "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK",
    "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA",
    "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG",
    "PH", "PK", "PL", "PM", "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
    "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS",
    "ST", "SV", "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO",
    "TR", "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

/// ANSI packaging units of measure.
pub const UOM_ANSI_PACKAGING: &[&str] = &[
    // General packaging
    "EA", "PK", "CT", "CS", "BX", "BG", "RL", "TU", "CN", "BT", "JR",
    // Bulk / logistics
    "PL", "SK", "DR", "TN", "LB", "KG",
    // Healthcare / medical / lab
    "VL", "AM", "SY", "KT", "TR", "DV",
    // Length / material
    "FT", "IN", "YD",
];

/// Extended ANSI X12 units of measure (packaging plus common extras).
pub const UOM_ANSI_X12_EXTRAS: &[&str] = &[
    "DZ", "GR", "PR", "SET", "GL", "QT", "PT", "OZ", "ML", "LT", "MG", "SF", "HR", "DA", "WK",
    "MO", "YR",
];

/// Names of all enum presets.
pub const ENUM_PRESET_NAMES: &[&str] = &[
    "us_state_2_letter",
    "us_state_full_name",
    "us_state_code_or_name",
    "country_iso3166_alpha2",
    "uom_ansi_packaging",
    "uom_ansi_x12",
];

/// Returns the allowed values for an enum preset, or `None` if unknown.
///
/// Composite presets (`us_state_code_or_name`, `uom_ansi_x12`) return the
/// union of their component sets.
pub fn enum_preset_values(preset_name: &str) -> Option<Vec<&'static str>> {
    match preset_name {
        "us_state_2_letter" => Some(US_STATE_2_LETTER.to_vec()),
        "us_state_full_name" => Some(US_STATE_FULL_NAME.to_vec()),
        "us_state_code_or_name" => {
            let mut values = US_STATE_2_LETTER.to_vec();
            values.extend_from_slice(US_STATE_FULL_NAME);
            Some(values)
        }
        "country_iso3166_alpha2" => Some(COUNTRY_ISO3166_ALPHA2.to_vec()),
        "uom_ansi_packaging" => Some(UOM_ANSI_PACKAGING.to_vec()),
        "uom_ansi_x12" => {
            let mut values = UOM_ANSI_PACKAGING.to_vec();
            values.extend_from_slice(UOM_ANSI_X12_EXTRAS);
            Some(values)
        }
        _ => None,
    }
}

/// Validates a value against an enum preset. Matching uppercases and trims
/// the candidate when `case_insensitive` is set (preset values are stored
/// uppercased).
pub fn validate_with_enum_preset(value: &str, preset_name: &str, case_insensitive: bool) -> bool {
    let Some(values) = enum_preset_values(preset_name) else {
        return false;
    };
    if case_insensitive {
        let candidate = value.trim().to_uppercase();
        values.iter().any(|v| *v == candidate)
    } else {
        let candidate = value.trim();
        values.iter().any(|v| *v == candidate)
    }
}
