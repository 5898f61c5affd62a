//! Stored database values: whole-path fields and HTML content.

use super::{ApplyOptions, Reference, ScanSummary, Scanner};
use crate::media::{OccurrenceKind, ScanError};
use crate::utils::html::LinkTag;

/// Only links into the media tree are tracked in stored HTML.
const CONTENT_MARKER: &str = "media/";

/// A stored value and where it came from.
#[derive(Debug, Clone, Copy)]
pub struct FieldValue<'a> {
    pub table: &'a str,
    pub column: &'a str,
    pub value: &'a str,
    /// Folder prepended to whole-path field values (`media/products/`).
    pub prefix: &'a str,
    /// Reject anything but images.
    pub images_only: bool,
}

impl<'a> FieldValue<'a> {
    pub fn new(table: &'a str, column: &'a str, value: &'a str) -> Self {
        Self {
            table,
            column,
            value,
            prefix: "",
            images_only: false,
        }
    }

    pub fn with_prefix(mut self, prefix: &'a str) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn images_only(mut self, images_only: bool) -> Self {
        self.images_only = images_only;
        self
    }

    /// `table.column`
    pub fn location(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }
}

impl Scanner<'_> {
    /// Classify a field holding a single file path.
    ///
    /// Returns whether an occurrence was recorded.
    pub fn scan_database_field(&mut self, field: &FieldValue<'_>) -> Result<bool, ScanError> {
        if field.value.is_empty() {
            return Ok(false);
        }

        let raw = format!("{}{}", field.prefix, field.value);
        self.apply(
            &raw,
            OccurrenceKind::MediaFile,
            &field.location(),
            ApplyOptions {
                images_only: field.images_only,
                hooked: false,
                track_asset_syntax: true,
            },
        )
    }

    /// Extract `img[src]` / `a[href]` references into the media tree from
    /// stored HTML. Every value is parsed; there is no marker pre-filter.
    pub fn scan_database_content(
        &mut self,
        field: &FieldValue<'_>,
    ) -> Result<ScanSummary, ScanError> {
        let mut summary = ScanSummary {
            sources: 1,
            ..ScanSummary::default()
        };

        let references: Vec<Reference> = self
            .dom
            .links(field.value)
            .into_iter()
            .filter(|link| link.value.contains(CONTENT_MARKER))
            .map(|link| {
                let kind = match link.tag {
                    LinkTag::Img => OccurrenceKind::ContentImage,
                    LinkTag::Anchor => OccurrenceKind::ContentLink,
                };
                Reference::new(kind, link.value)
            })
            .collect();

        let location = field.location();
        let options = ApplyOptions {
            images_only: field.images_only,
            hooked: false,
            track_asset_syntax: false,
        };

        summary.references = references.len();
        for reference in references {
            if self.apply(&reference.raw, reference.kind, &location, options)? {
                summary.recorded += 1;
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{AssetRegistry, Context, Occurrence};

    #[test]
    fn test_field_records_mediafile() {
        let mut registry = AssetRegistry::new();
        let mut scanner = Scanner::new(&mut registry);

        let field = FieldValue::new("product", "picture", "shoe.jpg").with_prefix("media/products/");
        assert!(scanner.scan_database_field(&field).unwrap());

        let asset = scanner.registry().get("media/products/shoe.jpg").unwrap();
        assert_eq!(asset.folder, "products/");
        assert_eq!(
            asset.occurrences(Context::Database),
            &[Occurrence::new("product.picture", "media.mediafile", false)]
        );
    }

    #[test]
    fn test_field_empty_or_rejected() {
        let mut registry = AssetRegistry::new();
        let mut scanner = Scanner::new(&mut registry);

        assert!(!scanner.scan_database_field(&FieldValue::new("t", "c", "")).unwrap());
        assert!(
            !scanner
                .scan_database_field(&FieldValue::new("t", "c", "media/notes.txt"))
                .unwrap()
        );
        assert!(
            !scanner
                .scan_database_field(&FieldValue::new("t", "c", "media/doc.pdf").images_only(true))
                .unwrap()
        );
        assert!(scanner.registry().is_empty());
    }

    #[test]
    fn test_content_filters_media_links() {
        let mut registry = AssetRegistry::new();
        let mut scanner = Scanner::new(&mut registry);

        let html = r#"<p><a href="/media/docs/guide.pdf">guide</a>
            <img src="/media/photo.jpg">
            <img src="/assets/images/logo.png">
            <a href="https://example.com/media/x.jpg">ext</a></p>"#;
        let summary = scanner
            .scan_database_content(&FieldValue::new("page", "body", html))
            .unwrap();

        assert_eq!(summary.references, 3);
        assert_eq!(summary.recorded, 2);

        let registry = scanner.registry();
        assert_eq!(registry.len(), 2);
        // images come before links
        let keys: Vec<&String> = registry.all().keys().collect();
        assert_eq!(keys, ["media/photo_jpg", "media/docs/guide_pdf"]);

        let photo = registry.get("media/photo.jpg").unwrap();
        assert_eq!(
            photo.occurrences(Context::Database)[0],
            Occurrence::new("page.body", "media.content-image", false)
        );
        let guide = registry.get("media/docs/guide.pdf").unwrap();
        assert_eq!(guide.occurrences(Context::Database)[0].kind, "media.content-link");
    }

    #[test]
    fn test_content_without_tags_records_nothing() {
        let mut registry = AssetRegistry::new();
        let mut scanner = Scanner::new(&mut registry);

        let summary = scanner
            .scan_database_content(&FieldValue::new("page", "body", "plain media/a.png text"))
            .unwrap();
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.references, 0);
        assert!(scanner.registry().is_empty());
    }

    #[test]
    fn test_content_uppercase_markup() {
        let mut registry = AssetRegistry::new();
        let mut scanner = Scanner::new(&mut registry);

        let html = "<P><IMG SRC=\"/media/photo.jpg\"></P><a\r\nhref=\"/media/doc.pdf\">doc</a>";
        let summary = scanner
            .scan_database_content(&FieldValue::new("page", "body", html))
            .unwrap();

        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.recorded, 2);
        let registry = scanner.registry();
        assert_eq!(
            registry.get("media/photo.jpg").unwrap().occurrences(Context::Database)[0].kind,
            "media.content-image"
        );
        assert_eq!(
            registry.get("media/doc.pdf").unwrap().occurrences(Context::Database)[0].kind,
            "media.content-link"
        );
    }
}
