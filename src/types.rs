//! Core data structures for the geopost-stats aggregation engine.
//!
//! This module contains the fundamental types used throughout the
//! partition-decode-classify-aggregate pipeline, along with the static
//! lookup tables that drive suburb/state normalization.

/// A minimally-typed post record as decoded from the source JSON.
///
/// Only the two fields the engine actually needs are kept; everything else
/// in the source object is ignored (see design note on avoiding a general
/// DOM in favor of a direct, narrow struct).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub author_id: String,
    /// `includes.places[0].full_name`, e.g. `"Melbourne, Victoria"`.
    /// `None` if the record has no place information (`FieldMissingError`).
    pub full_name: Option<String>,
}

/// Canonical order of the eight Greater Capital City regions (index 0..7).
pub const CANONICAL_GCC: [&str; 8] = [
    "1gsyd", "2gmel", "3gbri", "4gade", "5gper", "6ghob", "7gdar", "8acte",
];

/// Display label for each canonical GCC, used by T2's report column.
pub const GCC_CITY_LABEL: [(&str, &str); 8] = [
    ("1gsyd", "Sydney"),
    ("2gmel", "Melbourne"),
    ("3gbri", "Brisbane"),
    ("4gade", "Adelaide"),
    ("5gper", "Perth"),
    ("6ghob", "Hobart"),
    ("7gdar", "Darwin"),
    ("8acte", "Canberra"),
];

/// Maps a `ste` digit character to the canonical (lowercase) state name.
///
/// Digit 9 ("Other Territories") is kept here so the reference loader can
/// recognize and skip it by name; it never appears in `CANONICAL_GCC`.
pub fn state_name_for_digit(digit: &str) -> Option<&'static str> {
    match digit {
        "1" => Some("new south wales"),
        "2" => Some("victoria"),
        "3" => Some("queensland"),
        "4" => Some("south australia"),
        "5" => Some("western australia"),
        "6" => Some("tasmania"),
        "7" => Some("northern territory"),
        "8" => Some("australian capital territory"),
        "9" => Some("other territories"),
        _ => None,
    }
}

/// Maps a lowercased state abbreviation (as it appears inside `"City (ABBR)"`)
/// to the canonical lowercase state name. Note `vic.` and `tas.` carry a
/// trailing period in source data, matched verbatim here.
pub fn state_name_for_abbr(abbr: &str) -> Option<&'static str> {
    match abbr {
        "nsw" => Some("new south wales"),
        "vic." => Some("victoria"),
        "qld" => Some("queensland"),
        "sa" => Some("south australia"),
        "wa" => Some("western australia"),
        "tas." => Some("tasmania"),
        "nt" => Some("northern territory"),
        "act" => Some("australian capital territory"),
        _ => None,
    }
}

/// Maps a lowercased capital-city name to the canonical lowercase state name.
pub fn state_name_for_capital(city: &str) -> Option<&'static str> {
    match city {
        "sydney" => Some("new south wales"),
        "melbourne" => Some("victoria"),
        "brisbane" => Some("queensland"),
        "adelaide" => Some("south australia"),
        "perth" => Some("western australia"),
        "hobart" => Some("tasmania"),
        "darwin" => Some("northern territory"),
        "canberra" => Some("australian capital territory"),
        _ => None,
    }
}

/// The eight canonical (lowercase) state names that can ever qualify a post.
/// "other territories" is deliberately excluded: it never reaches
/// `CANONICAL_GCC` since state 9 is filtered at reference-load time.
pub const QUALIFYING_STATES: [&str; 8] = [
    "new south wales",
    "victoria",
    "queensland",
    "south australia",
    "western australia",
    "tasmania",
    "northern territory",
    "australian capital territory",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_gcc_has_eight_entries() {
        assert_eq!(CANONICAL_GCC.len(), 8);
        assert_eq!(GCC_CITY_LABEL.len(), 8);
    }

    #[test]
    fn state_digit_nine_is_other_territories() {
        assert_eq!(state_name_for_digit("9"), Some("other territories"));
        assert!(!QUALIFYING_STATES.contains(&"other territories"));
    }

    #[test]
    fn abbreviations_are_case_and_punctuation_sensitive() {
        assert_eq!(state_name_for_abbr("vic."), Some("victoria"));
        assert_eq!(state_name_for_abbr("vic"), None);
        assert_eq!(state_name_for_abbr("nsw"), Some("new south wales"));
    }

    #[test]
    fn capital_city_lookup() {
        assert_eq!(state_name_for_capital("canberra"), Some("australian capital territory"));
        assert_eq!(state_name_for_capital("unknown-town"), None);
    }
}
