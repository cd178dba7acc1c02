//! Inline image removal.
//!
//! lopdf's content parser has no support for `BI ... ID ... EI` sequences:
//! it stops at the binary data and reports success with whatever came
//! before. Those segments are cut out of the raw content stream first.

use std::borrow::Cow;

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0c' | b'\0')
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

/// Whether `data[pos..]` starts with the operator `op` as a whole token.
fn operator_at(data: &[u8], pos: usize, op: &[u8]) -> bool {
    if !data[pos..].starts_with(op) {
        return false;
    }
    let before = pos == 0 || {
        let prev = data[pos - 1];
        prev != b'/' && (is_whitespace(prev) || is_delimiter(prev))
    };
    let after = data
        .get(pos + op.len())
        .map_or(true, |&b| is_whitespace(b) || is_delimiter(b));
    before && after
}

/// End offset (exclusive) of the inline image whose dictionary starts at
/// `start`, just past its `EI`.
fn inline_image_end(data: &[u8], start: usize) -> Option<usize> {
    let id = (start..data.len()).find(|&i| operator_at(data, i, b"ID"))?;
    // One whitespace byte separates `ID` from the sample data.
    let samples = id + 3;

    (samples..data.len())
        .find(|&i| is_whitespace(data[i - 1]) && operator_at(data, i, b"EI"))
        .map(|ei| ei + 2)
}

/// Byte ranges of the inline images in a content stream.
fn inline_images(data: &[u8]) -> Vec<(usize, usize)> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < data.len() {
        let b = data[i];
        if depth > 0 {
            match b {
                b'\\' => i += 1,
                b'(' => depth += 1,
                b')' => depth -= 1,
                _ => {}
            }
            i += 1;
            continue;
        }

        match b {
            b'(' => depth = 1,
            b'%' => {
                while i < data.len() && data[i] != b'\n' && data[i] != b'\r' {
                    i += 1;
                }
                continue;
            }
            b'B' if operator_at(data, i, b"BI") => match inline_image_end(data, i + 2) {
                Some(end) => {
                    segments.push((i, end));
                    i = end;
                    continue;
                }
                None => {
                    log::warn!("Unterminated inline image at offset {}", i);
                    segments.push((i, data.len()));
                    break;
                }
            },
            _ => {}
        }
        i += 1;
    }

    segments
}

/// Content stream with every inline image replaced by a single space,
/// plus the number of images removed.
pub(crate) fn strip_inline_images(data: &[u8]) -> (Cow<'_, [u8]>, usize) {
    let segments = inline_images(data);
    if segments.is_empty() {
        return (Cow::Borrowed(data), 0);
    }

    let mut out = Vec::with_capacity(data.len());
    let mut last = 0;
    for &(start, end) in &segments {
        out.extend_from_slice(&data[last..start]);
        out.push(b' ');
        last = end;
    }
    out.extend_from_slice(&data[last..]);

    (Cow::Owned(out), segments.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_binary(prefix: &[u8], samples: &[u8], suffix: &[u8]) -> Vec<u8> {
        let mut data = prefix.to_vec();
        data.extend_from_slice(samples);
        data.extend_from_slice(suffix);
        data
    }

    #[test]
    fn test_no_inline_images_borrows() {
        let (out, count) = strip_inline_images(b"BT (Hello) Tj ET");
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(count, 0);
    }

    #[test]
    fn test_strips_binary_segment() {
        let data = with_binary(
            b"BT (Before) Tj ET\nBI /W 2 /H 2 /CS /G /BPC 8 ID ",
            &[0x00, 0xFF, b'(', 0x80],
            b"\nEI\nBT (After) Tj ET",
        );

        let (out, count) = strip_inline_images(&data);
        assert_eq!(count, 1);
        assert_eq!(&*out, b"BT (Before) Tj ET\n \nBT (After) Tj ET");
    }

    #[test]
    fn test_multiple_inline_images() {
        let data = b"BI /W 1 /H 1 ID x EI (a) Tj BI /W 1 /H 1 ID y EI (b) Tj";
        let (out, count) = strip_inline_images(data);
        assert_eq!(count, 2);
        assert_eq!(&*out, b"  (a) Tj   (b) Tj");
    }

    #[test]
    fn test_operator_names_inside_strings_and_names_are_ignored() {
        let data = b"BT (BI and EI) Tj /BI Do % BI comment\nET";
        let (_, count) = strip_inline_images(data);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_ei_must_follow_whitespace() {
        // "xEI" inside the samples is not the end marker.
        let data = b"BI /W 3 /H 1 ID xEIy EI (tail) Tj";
        let (out, count) = strip_inline_images(data);
        assert_eq!(count, 1);
        assert_eq!(&*out, b"  (tail) Tj");
    }

    #[test]
    fn test_unterminated_inline_image_drops_remainder() {
        let (out, count) = strip_inline_images(b"(keep) Tj BI /W 1 ID \x01\x02");
        assert_eq!(count, 1);
        assert_eq!(&*out, b"(keep) Tj  ");
    }
}
