//! Template and markup files.

use std::path::Path;

use super::{Reference, ScanSummary, Scanner};
use crate::media::{OccurrenceKind, ScanError};
use crate::utils::html::{DomParser, LinkTag, has_link_markers};

impl Scanner<'_> {
    /// Scan every template under `dir` with one of `extensions`.
    pub fn scan_templates(
        &mut self,
        dir: &Path,
        extensions: &[String],
    ) -> Result<ScanSummary, ScanError> {
        let dom = self.dom;
        self.scan_files(dir, extensions, "template", |content, _| {
            Ok(extract_links(dom, content))
        })
    }
}

/// `None` when the markup holds no `<img`/`<a` tag at all.
fn extract_links(dom: &dyn DomParser, content: &str) -> Option<Vec<Reference>> {
    if !has_link_markers(content) {
        return None;
    }

    let references = dom
        .links(content)
        .into_iter()
        .map(|link| {
            let kind = match link.tag {
                LinkTag::Img => OccurrenceKind::TemplateAsset,
                LinkTag::Anchor => OccurrenceKind::TemplateLink,
            };
            Reference::new(kind, link.value)
        })
        .collect();
    Some(references)
}
