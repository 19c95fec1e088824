//! Reference Index (C1): suburb-name → region lookup, loaded once at startup.

use ahash::{AHashMap, AHashSet};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::RefLoadError;
use crate::types::state_name_for_digit;

#[derive(Debug, Deserialize)]
struct SuburbEntryRaw {
    ste: String,
    gcc: String,
    #[allow(dead_code)]
    #[serde(default)]
    sal: String,
}

/// Read-only, shared lookup built once from the suburb reference file.
///
/// `state_suburbs[state]` holds every non-rural, non-territory-9 suburb name
/// (lowercased, trimmed, qualifier-stripped) known for that state.
/// `state_gcc[state]` holds that state's Greater Capital City code.
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    state_suburbs: AHashMap<String, AHashSet<String>>,
    state_gcc: AHashMap<String, String>,
}

impl ReferenceIndex {
    pub fn suburb_exists(&self, state: &str, suburb: &str) -> bool {
        self.state_suburbs
            .get(state)
            .map(|set| set.contains(suburb))
            .unwrap_or(false)
    }

    pub fn gcc_for_state(&self, state: &str) -> Option<&str> {
        self.state_gcc.get(state).map(|s| s.as_str())
    }
}

/// True when `gcc`'s second character marks it rural/rest-of-state (`^.r.*`).
fn is_rural(gcc: &str) -> bool {
    gcc.as_bytes().get(1) == Some(&b'r')
}

/// Strips a trailing parenthesized qualifier (e.g. `"Melbourne (City)"` →
/// `"melbourne"`), trims, and lowercases.
fn normalize_suburb_name(raw: &str) -> String {
    raw.split(" (").next().unwrap_or(raw).trim().to_lowercase()
}

pub fn load_reference_index(path: &Path) -> Result<ReferenceIndex, RefLoadError> {
    let file = File::open(path).map_err(|source| RefLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let raw: AHashMap<String, SuburbEntryRaw> =
        serde_json::from_reader(reader).map_err(|source| RefLoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let mut index = ReferenceIndex::default();
    for (name, entry) in raw {
        if entry.ste == "9" {
            continue;
        }
        if is_rural(&entry.gcc) {
            continue;
        }
        let state = state_name_for_digit(&entry.ste).ok_or_else(|| RefLoadError::UnknownState {
            suburb: name.clone(),
            digit: entry.ste.clone(),
        })?;

        let key = normalize_suburb_name(&name);
        index
            .state_suburbs
            .entry(state.to_string())
            .or_default()
            .insert(key);
        index
            .state_gcc
            .entry(state.to_string())
            .or_insert_with(|| entry.gcc.clone());
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_ref_file(json: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(json.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn indexes_qualifying_suburb() {
        let f = write_ref_file(
            r#"{"Melbourne (City)": {"ste": "2", "gcc": "2gmel", "sal": "20660"}}"#,
        );
        let idx = load_reference_index(f.path()).unwrap();
        assert!(idx.suburb_exists("victoria", "melbourne"));
        assert_eq!(idx.gcc_for_state("victoria"), Some("2gmel"));
    }

    #[test]
    fn skips_rural_and_territory_nine() {
        let f = write_ref_file(
            r#"{
                "Ballarat": {"ste": "2", "gcc": "2rvic", "sal": "20910"},
                "Jervis Bay": {"ste": "9", "gcc": "9oter", "sal": "90001"}
            }"#,
        );
        let idx = load_reference_index(f.path()).unwrap();
        assert!(!idx.suburb_exists("victoria", "ballarat"));
        assert!(!idx.suburb_exists("other territories", "jervis bay"));
    }

    #[test]
    fn unknown_state_digit_is_an_error() {
        let f = write_ref_file(r#"{"Nowhere": {"ste": "0", "gcc": "0gxyz", "sal": "1"}}"#);
        let err = load_reference_index(f.path()).unwrap_err();
        assert!(matches!(err, RefLoadError::UnknownState { .. }));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_reference_index(Path::new("/no/such/file.json")).unwrap_err();
        assert!(matches!(err, RefLoadError::Open { .. }));
    }
}
