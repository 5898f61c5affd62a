//! HTML reference extraction.
//!
//! Provides:
//! - [`DomParser`] - the capability the scanners consume: parse a fragment
//!   and yield `img[src]` / `a[href]` values
//! - [`TlParser`] - default implementation on top of `tl`
//! - [`unescape()`] - character reference decoding for attribute values

use std::borrow::Cow;

/// Element a reference was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTag {
    /// `<img src>`
    Img,
    /// `<a href>`
    Anchor,
}

/// A `src`/`href` attribute value found in an HTML fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomLink {
    pub tag: LinkTag,
    /// Decoded attribute value.
    pub value: String,
}

/// HTML fragment parsing capability.
pub trait DomParser: Send + Sync {
    /// All `img[src]` values followed by all `a[href]` values, each in
    /// document order. Elements without the attribute are skipped.
    fn links(&self, html: &str) -> Vec<DomLink>;
}

/// `tl`-backed parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct TlParser;

impl DomParser for TlParser {
    fn links(&self, html: &str) -> Vec<DomLink> {
        let Ok(dom) = tl::parse(html, tl::ParserOptions::default()) else {
            return Vec::new();
        };

        let mut images = Vec::new();
        let mut anchors = Vec::new();

        for node in dom.nodes() {
            let Some(tag) = node.as_tag() else { continue };
            let name = tag.name().as_utf8_str();

            let (attr, links, kind) = if name.eq_ignore_ascii_case("img") {
                ("src", &mut images, LinkTag::Img)
            } else if name.eq_ignore_ascii_case("a") {
                ("href", &mut anchors, LinkTag::Anchor)
            } else {
                continue;
            };

            let value = tag
                .attributes()
                .iter()
                .find_map(|(key, value)| key.eq_ignore_ascii_case(attr).then_some(value).flatten());
            if let Some(value) = value {
                links.push(DomLink {
                    tag: kind,
                    value: unescape(&value).into_owned(),
                });
            }
        }

        images.extend(anchors);
        images
    }
}

/// Cheap pre-filter: does the markup contain an `<img` or `<a` tag at all?
///
/// Tag names match case-insensitively; `<a` must be followed by whitespace
/// or `>` so that `<abbr>` and friends do not count.
pub fn has_link_markers(html: &str) -> bool {
    let bytes = html.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|&(_, &b)| b == b'<')
        .any(|(i, _)| {
            let tag = &bytes[i + 1..];
            let img = tag.get(..3).is_some_and(|name| name.eq_ignore_ascii_case(b"img"));
            let anchor = tag.first().is_some_and(|b| b.eq_ignore_ascii_case(&b'a'))
                && tag
                    .get(1)
                    .is_some_and(|&b| b.is_ascii_whitespace() || b == b'>');
            img || anchor
        })
}

/// Longest entity name looked at between `&` and `;`.
const MAX_ENTITY_LEN: usize = 10;

/// Decode character references in an attribute value.
///
/// Unknown or unterminated references are kept as written.
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let decoded = tail
            .find(';')
            .filter(|&end| end <= MAX_ENTITY_LEN)
            .and_then(|end| Some((end, decode_entity(&tail[..end])?)));
        match decoded {
            Some((end, c)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
