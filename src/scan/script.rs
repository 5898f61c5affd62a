//! Script string literals pointing into `assets/images/`.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{Reference, ScanSummary, Scanner};
use crate::media::{OccurrenceKind, ScanError};

static IMAGE_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"assets/images/[^"'`\s()]+"#).expect("script image pattern")
});

impl Scanner<'_> {
    /// Scan every script under `dir` with one of `extensions`.
    pub fn scan_scripts(
        &mut self,
        dir: &Path,
        extensions: &[String],
    ) -> Result<ScanSummary, ScanError> {
        self.scan_files(dir, extensions, "script", |content, _| {
            Ok(Some(extract_literals(content)))
        })
    }
}

fn extract_literals(content: &str) -> Vec<Reference> {
    IMAGE_LITERAL
        .find_iter(content)
        .map(|m| Reference::new(OccurrenceKind::JsImage, m.as_str()))
        .collect()
}
