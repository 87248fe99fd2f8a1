//! Anchor file catalog: one `<prefix>_<year>.json` file per form year.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::patterns::ANCHOR_FILE;

/// Path of the anchor file for `prefix` and `year` inside `dir`.
pub fn anchors_path(dir: &Path, prefix: &str, year: &str) -> PathBuf {
    dir.join(format!("{}_{}.json", prefix, year))
}

/// Years with an anchor file for `prefix`, sorted ascending.
///
/// A missing directory yields an empty list.
pub fn available_years(dir: &Path, prefix: &str) -> std::io::Result<Vec<String>> {
    if !dir.is_dir() {
        debug!("Anchor directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut years = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(caps) = ANCHOR_FILE.captures(name) {
            if &caps["prefix"] == prefix {
                years.push(caps["year"].to_string());
            }
        }
    }

    years.sort();
    Ok(years)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_available_years() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["1040_2024.json", "1040_2023.json", "1120_2024.json", "notes.txt"] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }

        assert_eq!(
            available_years(dir.path(), "1040").unwrap(),
            vec!["2023".to_string(), "2024".to_string()]
        );
        assert_eq!(available_years(dir.path(), "1120").unwrap(), vec!["2024".to_string()]);
        assert!(available_years(&dir.path().join("missing"), "1040").unwrap().is_empty());
    }

    #[test]
    fn test_anchors_path() {
        assert_eq!(
            anchors_path(Path::new("src/anchors"), "1040", "2024"),
            PathBuf::from("src/anchors/1040_2024.json")
        );
    }
}
