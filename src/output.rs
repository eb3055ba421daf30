//! JSON writers for harvested data and processed upload information.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;

/// Write a value as pretty-printed JSON.
///
/// Output ends with a newline so the files diff cleanly between runs.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    fs::write(path, text)?;
    tracing::info!(path = %path.display(), "wrote output file");
    Ok(())
}

/// Output filename for one harvested keyword.
#[must_use]
pub fn keyword_filename(keyword: &str) -> String {
    format!("results_{keyword}.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::types::KmbRecord;

    #[test]
    fn test_write_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        let mut data = BTreeMap::new();
        data.insert("1".to_string(), KmbRecord::new("1"));
        write_json(&path, &data).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with('\n'));
        let back: BTreeMap<String, KmbRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(back["1"].id, "1");
    }

    #[test]
    fn test_keyword_filename() {
        assert_eq!(keyword_filename("katt"), "results_katt.json");
    }
}
