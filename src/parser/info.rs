//! Document information dictionary.

use lopdf::{Dictionary, Document as LopdfDocument, Object};

use crate::model::Metadata;

use super::backend::decode_text_simple;

/// Read `/Info` from the trailer into [`Metadata`].
///
/// Missing or malformed entries are left as `None`.
pub(crate) fn read_metadata(doc: &LopdfDocument) -> Metadata {
    let mut metadata = Metadata::with_version(doc.version.to_string());
    metadata.page_count = doc.get_pages().len() as u32;
    metadata.encrypted = doc.is_encrypted();

    let info = match doc.trailer.get(b"Info") {
        Ok(Object::Reference(r)) => doc.get_dictionary(*r).ok(),
        Ok(Object::Dictionary(d)) => Some(d),
        _ => None,
    };

    let Some(info) = info else {
        return metadata;
    };

    metadata.title = get_text(info, b"Title");
    metadata.author = get_text(info, b"Author");
    metadata.subject = get_text(info, b"Subject");
    metadata.keywords = get_text(info, b"Keywords");
    metadata.creator = get_text(info, b"Creator");
    metadata.producer = get_text(info, b"Producer");
    metadata.created = get_text(info, b"CreationDate").and_then(|s| parse_pdf_date(&s));
    metadata.modified = get_text(info, b"ModDate").and_then(|s| parse_pdf_date(&s));

    metadata
}

/// Text string entry; empty strings count as absent.
fn get_text(dict: &Dictionary, key: &[u8]) -> Option<String> {
    let text = match dict.get(key).ok()? {
        Object::String(bytes, _) => decode_text_simple(bytes),
        Object::Name(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        _ => return None,
    };
    let text = text.trim_end_matches('\0').trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSSOHH'mm').
///
/// The offset part is ignored; missing fields default to their minimum.
pub fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);

    if s.len() < 4 {
        return None;
    }

    let field = |range: std::ops::Range<usize>, default: u32| -> u32 {
        s.get(range).and_then(|v| v.parse().ok()).unwrap_or(default)
    };

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month = field(4..6, 1);
    let day = field(6..8, 1);
    let hour = field(8..10, 0);
    let minute = field(10..12, 0);
    let second = field(12..14, 0);

    chrono::NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, second))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}
