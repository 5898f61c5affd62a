//! Database values exported as JSON.
//!
//! ```json
//! [
//!   { "table": "product", "column": "picture", "value": "shoe.jpg", "prefix": "media/products/" },
//!   { "table": "page", "column": "body", "value": "<p><img src=\"/media/a.jpg\"></p>", "html": true }
//! ]
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::scan::FieldValue;

/// One stored value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseRecord {
    pub table: String,
    pub column: String,
    pub value: String,
    /// Value is an HTML fragment rather than a single path.
    #[serde(default)]
    pub html: bool,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub images_only: bool,
}

impl DatabaseRecord {
    pub fn field(&self) -> FieldValue<'_> {
        FieldValue::new(&self.table, &self.column, &self.value)
            .with_prefix(&self.prefix)
            .images_only(self.images_only)
    }
}

/// Read a records file.
pub fn load_records(path: &Path) -> Result<Vec<DatabaseRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse records file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        fs::write(
            &path,
            r#"[
                {"table": "product", "column": "picture", "value": "shoe.jpg", "prefix": "media/products/", "images_only": true},
                {"table": "page", "column": "body", "value": "<img src=\"/media/a.jpg\">", "html": true}
            ]"#,
        )
        .unwrap();

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert!(!records[0].html);
        assert!(records[0].images_only);
        assert_eq!(records[1].prefix, "");

        let field = records[0].field();
        assert_eq!(field.location(), "product.picture");
        assert_eq!(field.prefix, "media/products/");
    }

    #[test]
    fn test_load_records_errors() {
        let dir = TempDir::new().unwrap();
        assert!(load_records(&dir.path().join("missing.json")).is_err());

        let path = dir.path().join("bad.json");
        fs::write(&path, r#"[{"table": "t"}]"#).unwrap();
        let err = load_records(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
