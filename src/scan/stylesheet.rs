//! Stylesheet `url(...)` references.
//!
//! Stylesheets live below the public root and point back up into it:
//!
//! ```text
//! url('../../fonts/Roboto.woff2')  -> fonts/Roboto.woff2          (.css-font)
//! url(../images/bg/hero.jpg)       -> assets/images/bg/hero.jpg   (.css-image)
//! url('../icons/x.svg')            -> UnknownAssetCategory
//! ```
//!
//! Only `url()` values starting with at least one `../` are considered.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::{Reference, ScanSummary, Scanner};
use crate::media::{OccurrenceKind, ScanError};

/// One alternative per quoting style, each with three groups: whole
/// reference, parent segment, remainder. Quoted remainders may hold spaces.
static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"url\(\s*(?:"#,
        r#"'((?:\.\./)+([^/'"()\s]+)/([^'\n]+))'"#,
        r#"|"((?:\.\./)+([^/'"()\s]+)/([^"\n]+))""#,
        r#"|((?:\.\./)+([^/'"()\s]+)/([^'"()\s]+))"#,
        r#")\s*\)"#,
    ))
    .expect("css url pattern")
});

/// First group of the matched alternative.
const ALTERNATIVES: [usize; 3] = [1, 4, 7];

impl Scanner<'_> {
    /// Scan every stylesheet under `dir` with one of `extensions`.
    ///
    /// A `url()` whose parent segment is neither `fonts` nor `images` aborts
    /// the scan with [`ScanError::UnknownAssetCategory`].
    pub fn scan_stylesheets(
        &mut self,
        dir: &Path,
        extensions: &[String],
    ) -> Result<ScanSummary, ScanError> {
        self.scan_files(dir, extensions, "stylesheet", |content, file| {
            extract_urls(content, file).map(Some)
        })
    }
}

fn extract_urls(content: &str, file: &Path) -> Result<Vec<Reference>, ScanError> {
    CSS_URL
        .captures_iter(content)
        .map(|caps| {
            let group = ALTERNATIVES
                .into_iter()
                .find(|&i| caps.get(i).is_some())
                .unwrap_or(ALTERNATIVES[2]);
            let rest = &caps[group + 2];
            match &caps[group + 1] {
                "fonts" => Ok(Reference::new(OccurrenceKind::CssFont, format!("fonts/{rest}"))),
                "images" => Ok(Reference::new(
                    OccurrenceKind::CssImage,
                    format!("assets/images/{rest}"),
                )),
                category => Err(ScanError::UnknownAssetCategory {
                    category: category.to_string(),
                    reference: caps[group].to_string(),
                    file: file.to_path_buf(),
                }),
            }
        })
        .collect()
}
