//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for the document operations the page
//! walker needs, isolating the concrete PDF library (lopdf) from the walk.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use crate::error::{Error, Result};
use crate::model::{
    Image, Metadata, ObjectRef, OpCode, Operand, Operator, OperatorList, TextContent, TextItem,
};

use super::info::read_metadata;
use super::inline::strip_inline_images;

/// Page identifier: (object number, generation number).
pub type PageId = ObjectRef;

/// Nested form XObjects deeper than this are not entered.
const MAX_FORM_DEPTH: usize = 8;

/// Upper bound on `/Parent` hops when looking for inherited resources.
const MAX_INHERIT_DEPTH: usize = 32;

/// Filters whose output is an encoded image rather than raw samples.
const IMAGE_CODECS: &[&str] = &["DCTDecode", "JPXDecode", "JBIG2Decode", "CCITTFaxDecode"];

/// A page fetched from a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRef {
    /// Page number (1-indexed)
    pub number: u32,
    /// Backend object id of the page dictionary
    pub id: PageId,
}

/// Abstract interface for PDF document access.
///
/// Implementations provide page lookup, text content, operator lists and
/// image resolution without exposing any concrete PDF library types.
pub trait PdfBackend {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Document metadata.
    fn metadata(&self) -> Metadata;

    /// Fetch a page by 1-based number.
    fn page(&self, page_num: u32) -> Result<PageRef>;

    /// Ordered text fragments of a page.
    fn text_content(&self, page: &PageRef) -> Result<TextContent>;

    /// Drawing operations of a page together with its object store.
    fn operator_list(&self, page: &PageRef) -> Result<OperatorList>;

    /// Resolve an object from a page's store into an image.
    ///
    /// Returns `None` when the object is missing, is not an image, or its
    /// payload cannot be decoded.
    fn load_image(&self, object: ObjectRef) -> Option<Image>;
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

// ---------------------------------------------------------------------------
// LopdfBackend — concrete implementation backed by lopdf
// ---------------------------------------------------------------------------

/// What a `Do` operand names in the current resources.
enum XObject<'a> {
    Image(ObjectId),
    Form { id: ObjectId, stream: &'a Stream },
    /// Referenced but not classifiable (no subtype, not a stream)
    Unclassified(ObjectId),
    Missing,
}

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
}

impl LopdfBackend {
    /// Parse a document from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self::from_document(doc))
    }

    /// Wrap an already loaded `lopdf::Document`.
    pub fn from_document(doc: LopdfDocument) -> Self {
        let pages = doc.get_pages();
        Self { doc, pages }
    }

    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Resources of a page, inherited from ancestors when absent.
    fn page_resources(&self, page_id: ObjectId) -> Option<&Dictionary> {
        let mut node = self.doc.get_dictionary(page_id).ok()?;
        for _ in 0..MAX_INHERIT_DEPTH {
            if let Ok(resources) = node.get(b"Resources") {
                return self.resolve_dict(resources);
            }
            let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
            node = self.doc.get_dictionary(parent).ok()?;
        }
        None
    }

    fn page_operations(&self, page: &PageRef) -> std::result::Result<Vec<Operation>, lopdf::Error> {
        let data = self.doc.get_page_content(page.id)?;
        let (data, inline) = strip_inline_images(&data);
        if inline > 0 {
            log::debug!("Page {}: ignoring {} inline image(s)", page.number, inline);
        }
        Ok(Content::decode(&data)?.operations)
    }

    fn lookup_xobject<'a>(&'a self, resources: Option<&'a Dictionary>, name: &[u8]) -> XObject<'a> {
        let entry = resources
            .and_then(|res| res.get(b"XObject").ok())
            .and_then(|obj| self.resolve_dict(obj))
            .and_then(|xobjects| xobjects.get(name).ok());

        let Some(Ok(id)) = entry.map(Object::as_reference) else {
            return XObject::Missing;
        };

        let Ok(stream) = self.doc.get_object(id).and_then(Object::as_stream) else {
            return XObject::Unclassified(id);
        };

        match stream.dict.get(b"Subtype").and_then(Object::as_name) {
            Ok(b"Image") => XObject::Image(id),
            Ok(b"Form") => XObject::Form { id, stream },
            _ => XObject::Unclassified(id),
        }
    }

    fn form_resources<'a>(&'a self, stream: &'a Stream) -> Option<&'a Dictionary> {
        stream
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|res| self.resolve_dict(res))
    }

    fn form_operations(&self, id: ObjectId, stream: &Stream) -> Option<Vec<Operation>> {
        let data = stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone());
        let (data, _) = strip_inline_images(&data);
        match Content::decode(&data) {
            Ok(content) => Some(content.operations),
            Err(e) => {
                log::debug!("Skipping form XObject {:?}: {}", id, e);
                None
            }
        }
    }

    fn font_dict<'a>(&'a self, resources: Option<&'a Dictionary>, font: &[u8]) -> Option<&'a Dictionary> {
        resources
            .and_then(|res| res.get(b"Font").ok())
            .and_then(|fonts| self.resolve_dict(fonts))
            .and_then(|fonts| fonts.get(font).ok())
            .and_then(|f| self.resolve_dict(f))
    }

    /// Decode a string operand using the current font's encoding.
    fn decode_string(&self, resources: Option<&Dictionary>, font: Option<&[u8]>, obj: &Object) -> Option<String> {
        let Object::String(bytes, _) = obj else {
            return None;
        };

        if let Some(font_dict) = font.and_then(|name| self.font_dict(resources, name)) {
            if let Ok(enc) = font_dict.get_font_encoding(&self.doc) {
                if let Ok(text) = LopdfDocument::decode_text(&enc, bytes) {
                    return Some(text);
                }
            }
        }
        Some(decode_text_simple(bytes))
    }

    fn collect_text<'a>(
        &'a self,
        operations: &[Operation],
        resources: Option<&'a Dictionary>,
        depth: usize,
        visited: &mut Vec<ObjectId>,
        content: &mut TextContent,
    ) {
        let mut font: Option<Vec<u8>> = None;

        for op in operations {
            let shown = match op.operator.as_str() {
                "Tf" => {
                    font = op
                        .operands
                        .first()
                        .and_then(|o| o.as_name().ok())
                        .map(<[u8]>::to_vec);
                    continue;
                }
                "Tj" | "'" => op
                    .operands
                    .first()
                    .and_then(|o| self.decode_string(resources, font.as_deref(), o)),
                "\"" => op
                    .operands
                    .get(2)
                    .and_then(|o| self.decode_string(resources, font.as_deref(), o)),
                "TJ" => op.operands.first().and_then(|o| o.as_array().ok()).map(|parts| {
                    parts
                        .iter()
                        .filter_map(|part| self.decode_string(resources, font.as_deref(), part))
                        .collect::<String>()
                }),
                "Do" => {
                    let Some(name) = op.operands.first().and_then(|o| o.as_name().ok()) else {
                        continue;
                    };
                    if let XObject::Form { id, stream } = self.lookup_xobject(resources, name) {
                        if depth < MAX_FORM_DEPTH && !visited.contains(&id) {
                            if let Some(form_ops) = self.form_operations(id, stream) {
                                let form_resources = self.form_resources(stream).or(resources);
                                visited.push(id);
                                self.collect_text(&form_ops, form_resources, depth + 1, visited, content);
                                visited.pop();
                            }
                        }
                    }
                    continue;
                }
                _ => continue,
            };

            if let Some(text) = shown.filter(|t| !t.is_empty()) {
                let mut item = TextItem::new(text);
                if let Some(ref name) = font {
                    item = item.with_font(String::from_utf8_lossy(name));
                }
                content.push(item);
            }
        }
    }

    fn collect_operators<'a>(
        &'a self,
        operations: &[Operation],
        resources: Option<&'a Dictionary>,
        prefix: &str,
        depth: usize,
        visited: &mut Vec<ObjectId>,
        list: &mut OperatorList,
    ) {
        for op in operations {
            let args: Vec<Operand> = op.operands.iter().map(convert_object).collect();

            let code = match op.operator.as_str() {
                "Tf" => OpCode::SetFont,
                "Tj" | "TJ" | "'" | "\"" => OpCode::ShowText,
                "Do" => match op.operands.first().and_then(|o| o.as_name().ok()) {
                    Some(name) => {
                        let key = format!("{}{}", prefix, String::from_utf8_lossy(name));
                        self.push_xobject(key, name, resources, depth, visited, list);
                        continue;
                    }
                    None => OpCode::Other(op.operator.clone()),
                },
                other => OpCode::Other(other.to_string()),
            };

            list.push(Operator::new(code, args));
        }
    }

    fn push_xobject<'a>(
        &'a self,
        key: String,
        name: &[u8],
        resources: Option<&'a Dictionary>,
        depth: usize,
        visited: &mut Vec<ObjectId>,
        list: &mut OperatorList,
    ) {
        match self.lookup_xobject(resources, name) {
            XObject::Form { id, stream } => {
                list.push(Operator::new(
                    OpCode::PaintFormXObjectBegin,
                    vec![Operand::Name(key.clone())],
                ));
                if depth < MAX_FORM_DEPTH && !visited.contains(&id) {
                    if let Some(form_ops) = self.form_operations(id, stream) {
                        let form_resources = self.form_resources(stream).or(resources);
                        let prefix = format!("{}/", key);
                        visited.push(id);
                        self.collect_operators(&form_ops, form_resources, &prefix, depth + 1, visited, list);
                        visited.pop();
                    }
                } else {
                    log::debug!("Not entering form XObject {} (depth {})", key, depth);
                }
                list.push(Operator::new(OpCode::PaintFormXObjectEnd, Vec::new()));
            }
            XObject::Image(id) | XObject::Unclassified(id) => {
                list.objs.insert(key.clone(), id);
                list.push(Operator::paint_image(key));
            }
            XObject::Missing => list.push(Operator::paint_image(key)),
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn metadata(&self) -> Metadata {
        read_metadata(&self.doc)
    }

    fn page(&self, page_num: u32) -> Result<PageRef> {
        self.pages
            .get(&page_num)
            .map(|id| PageRef {
                number: page_num,
                id: *id,
            })
            .ok_or(Error::PageFetch {
                page: page_num,
                page_count: self.page_count(),
            })
    }

    fn text_content(&self, page: &PageRef) -> Result<TextContent> {
        let operations = self.page_operations(page).map_err(|e| Error::TextContent {
            page: page.number,
            message: e.to_string(),
        })?;

        let resources = self.page_resources(page.id);
        let mut content = TextContent::new();
        self.collect_text(&operations, resources, 0, &mut Vec::new(), &mut content);

        log::debug!("Page {}: {} text fragments", page.number, content.items.len());
        Ok(content)
    }

    fn operator_list(&self, page: &PageRef) -> Result<OperatorList> {
        let operations = self.page_operations(page).map_err(|e| Error::OperatorList {
            page: page.number,
            message: e.to_string(),
        })?;

        let resources = self.page_resources(page.id);
        let mut list = OperatorList::new();
        self.collect_operators(&operations, resources, "", 0, &mut Vec::new(), &mut list);

        log::debug!("Page {}: {} operators", page.number, list.len());
        Ok(list)
    }

    fn load_image(&self, object: ObjectRef) -> Option<Image> {
        let stream = match self.doc.get_object(object).and_then(Object::as_stream) {
            Ok(stream) => stream,
            Err(e) => {
                log::debug!("Object {:?} is not an image stream: {}", object, e);
                return None;
            }
        };
        let dict = &stream.dict;

        if let Ok(subtype) = dict.get(b"Subtype").and_then(Object::as_name) {
            if subtype != b"Image" {
                log::debug!("Object {:?} is not an image XObject", object);
                return None;
            }
        }

        let filters = stream_filters(dict);
        let data = match decode_image_payload(stream, &filters) {
            Ok(data) => data,
            Err(e) => {
                log::debug!("Cannot decode image {:?}: {}", object, e);
                return None;
            }
        };

        if data.is_empty() {
            log::debug!("Image {:?} has an empty payload", object);
            return None;
        }

        let codec = filters
            .iter()
            .rev()
            .find(|f| IMAGE_CODECS.contains(&f.as_str()))
            .map(String::as_str);
        let mut image = Image::new(data, Image::mime_for_filter(codec));

        let dimension = |key: &[u8]| {
            dict.get(key)
                .and_then(Object::as_i64)
                .ok()
                .and_then(|v| u32::try_from(v).ok())
        };
        if let (Some(w), Some(h)) = (dimension(b"Width"), dimension(b"Height")) {
            image = image.with_dimensions(w, h);
        }

        if let Some(bits) = dict
            .get(b"BitsPerComponent")
            .and_then(Object::as_i64)
            .ok()
            .and_then(|b| u8::try_from(b).ok())
        {
            image = image.with_bits_per_component(bits);
        }

        let color_space = match dict.get(b"ColorSpace") {
            Ok(Object::Name(n)) => Some(String::from_utf8_lossy(n).into_owned()),
            Ok(Object::Array(arr)) => arr
                .first()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).into_owned()),
            _ => None,
        };
        if let Some(cs) = color_space {
            image = image.with_color_space(cs);
        }

        Some(image)
    }
}

/// Filter names of a stream, in decoding order.
fn stream_filters(dict: &Dictionary) -> Vec<String> {
    match dict.get(b"Filter") {
        Ok(Object::Name(n)) => vec![String::from_utf8_lossy(n).into_owned()],
        Ok(Object::Array(arr)) => arr
            .iter()
            .filter_map(|o| o.as_name().ok())
            .map(|n| String::from_utf8_lossy(n).into_owned())
            .collect(),
        _ => Vec::new(),
    }
}

/// Undo the transport filters of an image stream.
///
/// Decoding stops at the first image codec, whose input is kept as the
/// payload. lopdf refuses to decompress streams marked `/Subtype /Image`,
/// so the leading filters run on a copy without the subtype.
fn decode_image_payload(stream: &Stream, filters: &[String]) -> lopdf::Result<Vec<u8>> {
    let transport: Vec<Object> = filters
        .iter()
        .take_while(|f| !IMAGE_CODECS.contains(&f.as_str()))
        .map(|f| Object::Name(f.clone().into_bytes()))
        .collect();
    if transport.is_empty() {
        return Ok(stream.content.clone());
    }

    let mut dict = stream.dict.clone();
    dict.remove(b"Subtype");
    dict.set("Filter", Object::Array(transport));
    // Decode parameters of the first filter apply to the whole chain.
    if let Ok(Object::Array(params)) = stream.dict.get(b"DecodeParms") {
        match params.first() {
            Some(first @ Object::Dictionary(_)) => dict.set("DecodeParms", first.clone()),
            _ => {
                dict.remove(b"DecodeParms");
            }
        }
    }

    Stream::new(dict, stream.content.clone()).decompressed_content()
}

/// Convert a `lopdf::Object` to [`Operand`].
fn convert_object(obj: &Object) -> Operand {
    match obj {
        Object::Integer(i) => Operand::Integer(*i),
        Object::Real(r) => Operand::Real(*r),
        Object::Name(n) => Operand::Name(String::from_utf8_lossy(n).into_owned()),
        Object::String(b, _) => Operand::Str(b.clone()),
        Object::Array(arr) => Operand::Array(arr.iter().map(convert_object).collect()),
        _ => Operand::Other,
    }
}
