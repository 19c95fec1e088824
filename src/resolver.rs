//! Resolver & Classifier (C5): normalizes a record's place string and
//! decides whether it qualifies for a Greater Capital City region.

use crate::reference::ReferenceIndex;
use crate::types::{
    state_name_for_abbr, state_name_for_capital, state_name_for_digit, CANONICAL_GCC,
};

/// Outcome of classifying one record against the [`ReferenceIndex`].
pub enum Classification {
    /// The record qualified: `gcc_index` is the 0..7 index into
    /// [`CANONICAL_GCC`] and `gcc` is that region's code string.
    Qualified { gcc_index: usize, gcc: &'static str },
    Rejected,
}

/// Strips a trailing parenthesized qualifier, trims, and lowercases. Same
/// normalization the reference index applies to suburb names, applied here
/// to the record's suburb side.
fn normalize_suburb(raw: &str) -> String {
    raw.split(" (").next().unwrap_or(raw).trim().to_lowercase()
}

/// Resolves the state side of a `"Suburb, State"` pair to a canonical
/// lowercase state name, handling three forms: a full state name, a bare
/// abbreviation, or a `"City (ABBR)"` form carrying both. Parenthesized
/// abbreviation wins when present; otherwise a bare abbreviation, then a
/// capital-city name, then the token itself as a full state name.
fn normalize_state(raw: &str) -> Option<&'static str> {
    let lower = raw.trim().to_lowercase();

    if let Some(open) = lower.find('(') {
        if let Some(close) = lower[open..].find(')') {
            let abbr = lower[open + 1..open + close].trim();
            if let Some(state) = state_name_for_abbr(abbr) {
                return Some(state);
            }
        }
    }

    if let Some(state) = state_name_for_abbr(&lower) {
        return Some(state);
    }

    if let Some(state) = state_name_for_capital(&lower) {
        return Some(state);
    }

    // Fall through: treat the token as a state full-name already, matched
    // against the digit table's values so only the nine known names pass.
    for digit in 1..=9u8 {
        if let Some(state) = state_name_for_digit(&digit.to_string()) {
            if state == lower {
                return Some(state);
            }
        }
    }
    None
}

fn gcc_index_of(gcc: &str) -> Option<usize> {
    CANONICAL_GCC.iter().position(|&c| c == gcc)
}

/// Classifies one record's `full_name` field against `reference`.
///
/// `full_name` is `None` for a record missing `includes.places[0].full_name`,
/// already folded into [`Classification::Rejected`] since there is nothing
/// to resolve.
pub fn classify(full_name: Option<&str>, reference: &ReferenceIndex) -> Classification {
    let Some(full_name) = full_name else {
        return Classification::Rejected;
    };

    let Some((suburb_part, state_part)) = full_name.split_once(", ") else {
        return Classification::Rejected;
    };

    let suburb = normalize_suburb(suburb_part);
    let Some(state) = normalize_state(state_part) else {
        return Classification::Rejected;
    };

    if !reference.suburb_exists(state, &suburb) {
        return Classification::Rejected;
    }

    let Some(gcc) = reference.gcc_for_state(state) else {
        return Classification::Rejected;
    };
    // `gcc_for_state` only ever returns a non-rural, non-territory-9 code
    // (rural and territory-9 suburbs are filtered at load time), so this is
    // always one of the eight canonical codes.
    let Some(gcc_index) = gcc_index_of(gcc) else {
        return Classification::Rejected;
    };

    Classification::Qualified {
        gcc_index,
        gcc: CANONICAL_GCC[gcc_index],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::load_reference_index;
    use std::io::Write;

    fn reference_with(json: &str) -> ReferenceIndex {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(json.as_bytes()).unwrap();
        f.flush().unwrap();
        load_reference_index(f.path()).unwrap()
    }

    fn melbourne_reference() -> ReferenceIndex {
        reference_with(r#"{"Melbourne (City)": {"ste": "2", "gcc": "2gmel", "sal": "20660"}}"#)
    }

    #[test]
    fn single_record_matching() {
        let reference = melbourne_reference();
        match classify(Some("Melbourne, Victoria"), &reference) {
            Classification::Qualified { gcc_index, gcc } => {
                assert_eq!(gcc_index, 1);
                assert_eq!(gcc, "2gmel");
            }
            Classification::Rejected => panic!("expected qualification"),
        }
    }

    #[test]
    fn unqualified_state_is_rejected() {
        let reference = melbourne_reference();
        assert!(matches!(
            classify(Some("Melbourne, New South Wales"), &reference),
            Classification::Rejected
        ));
    }

    #[test]
    fn abbreviation_mapping() {
        let reference = reference_with(
            r#"{"Sydney": {"ste": "1", "gcc": "1gsyd", "sal": "10001"}}"#,
        );
        match classify(Some("Sydney, NSW"), &reference) {
            Classification::Qualified { gcc_index, .. } => assert_eq!(gcc_index, 0),
            Classification::Rejected => panic!("expected qualification"),
        }
    }

    #[test]
    fn parenthesized_suburb_qualifies_with_bare_abbreviation() {
        let reference = melbourne_reference();
        match classify(Some("Melbourne, Vic."), &reference) {
            Classification::Qualified { .. } => {}
            Classification::Rejected => panic!("expected qualification"),
        }
    }

    #[test]
    fn city_abbr_parenthesized_form_qualifies() {
        let reference = reference_with(
            r#"{"Sydney": {"ste": "1", "gcc": "1gsyd", "sal": "10001"}}"#,
        );
        match classify(Some("Sydney, Sydney (NSW)"), &reference) {
            Classification::Qualified { gcc_index, .. } => assert_eq!(gcc_index, 0),
            Classification::Rejected => panic!("expected qualification"),
        }
    }

    #[test]
    fn missing_place_is_rejected() {
        let reference = melbourne_reference();
        assert!(matches!(classify(None, &reference), Classification::Rejected));
    }

    #[test]
    fn single_component_full_name_is_rejected() {
        let reference = melbourne_reference();
        assert!(matches!(
            classify(Some("Melbourne"), &reference),
            Classification::Rejected
        ));
    }
}
