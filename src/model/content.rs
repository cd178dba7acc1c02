//! Page content: text fragments and drawing operators.

use std::collections::HashMap;

/// Object identifier: (object number, generation number).
pub type ObjectRef = (u32, u16);

/// A fragment of text produced by one text-showing operator.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    /// Decoded string content
    pub text: String,

    /// Font resource name active when the fragment was shown
    pub font: Option<String>,
}

impl TextItem {
    /// Create a fragment.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: None,
        }
    }

    /// Set the font resource name.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }
}

/// Ordered text fragments of a single page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextContent {
    pub items: Vec<TextItem>,
}

impl TextContent {
    /// Create an empty text content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment.
    pub fn push(&mut self, item: TextItem) {
        self.items.push(item);
    }

    /// Linear page text: fragments in order, joined by a single space.
    pub fn page_text(&self) -> String {
        self.items
            .iter()
            .map(|item| item.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the page produced no fragments.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<TextItem> for TextContent {
    fn from_iter<I: IntoIterator<Item = TextItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// A value from a content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Integer(i64),
    Real(f32),
    Name(String),
    Str(Vec<u8>),
    Array(Vec<Operand>),
    Other,
}

impl Operand {
    /// Name or store key carried by this operand.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Name(name) => Some(name),
            _ => None,
        }
    }
}

/// Classified drawing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpCode {
    /// `Tf`
    SetFont,
    /// `Tj`, `TJ`, `'` or `"`
    ShowText,
    /// `Do` on an image XObject; the first argument is the store key
    PaintImageXObject,
    /// `Do` on a form XObject; the form's operators follow
    PaintFormXObjectBegin,
    /// End of an inlined form XObject
    PaintFormXObjectEnd,
    /// Anything else, by operator name
    Other(String),
}

/// A single drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    pub code: OpCode,
    pub args: Vec<Operand>,
}

impl Operator {
    /// Create an operator.
    pub fn new(code: OpCode, args: Vec<Operand>) -> Self {
        Self { code, args }
    }

    /// Shorthand for a paint-image operator referencing `key`.
    pub fn paint_image(key: impl Into<String>) -> Self {
        Self::new(OpCode::PaintImageXObject, vec![Operand::Name(key.into())])
    }

    /// Check if this operator paints an image XObject.
    pub fn is_paint_image(&self) -> bool {
        self.code == OpCode::PaintImageXObject
    }
}

/// Page-scoped lookup from operator names to document objects.
///
/// Names used on the page itself are stored as-is; names used inside a
/// form XObject are prefixed with the form's key and a `/`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectStore {
    entries: HashMap<String, ObjectRef>,
}

impl ObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object under `key`.
    pub fn insert(&mut self, key: impl Into<String>, object: ObjectRef) {
        self.entries.insert(key.into(), object);
    }

    /// Look up an object by key.
    pub fn get(&self, key: &str) -> Option<ObjectRef> {
        self.entries.get(key).copied()
    }
}

/// Drawing operations of a page, in content stream order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatorList {
    pub ops: Vec<Operator>,
    pub objs: ObjectStore,
}

impl OperatorList {
    /// Create an empty operator list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operator.
    pub fn push(&mut self, op: Operator) {
        self.ops.push(op);
    }

    /// Paint-image operators with their index in the list and store key.
    pub fn image_ops(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.ops.iter().enumerate().filter_map(|(index, op)| {
            if op.is_paint_image() {
                op.args.first().and_then(Operand::as_name).map(|key| (index, key))
            } else {
                None
            }
        })
    }

    /// Number of operators.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_text_joins_with_single_space() {
        let content: TextContent = ["Hello", "world", "again"]
            .into_iter()
            .map(TextItem::new)
            .collect();
        assert_eq!(content.page_text(), "Hello world again");
    }

    #[test]
    fn test_page_text_empty() {
        let content = TextContent::new();
        assert!(content.is_empty());
        assert_eq!(content.page_text(), "");
    }

    #[test]
    fn test_image_ops_indices() {
        let mut list = OperatorList::new();
        assert!(list.is_empty());
        list.push(Operator::new(OpCode::Other("q".to_string()), vec![]));
        list.push(Operator::paint_image("Im1"));
        list.push(Operator::new(OpCode::Other("Q".to_string()), vec![]));
        list.push(Operator::paint_image("Fm1/Im2"));

        let found: Vec<_> = list.image_ops().collect();
        assert_eq!(found, vec![(1, "Im1"), (3, "Fm1/Im2")]);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_image_op_without_name_is_ignored() {
        let mut list = OperatorList::new();
        list.push(Operator::new(OpCode::PaintImageXObject, vec![]));
        assert_eq!(list.image_ops().count(), 0);
    }

    #[test]
    fn test_object_store_lookup() {
        let mut store = ObjectStore::new();
        store.insert("Im1", (7, 0));
        assert_eq!(store.get("Im1"), Some((7, 0)));
        assert_eq!(store.get("Im2"), None);
    }

    #[test]
    fn test_operand_accessors() {
        assert_eq!(Operand::Integer(42).as_name(), None);
        assert_eq!(Operand::Name("F1".to_string()).as_name(), Some("F1"));
        assert_eq!(Operand::Other.as_name(), None);
    }
}
