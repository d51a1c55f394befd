//! Declarative description of how response XML maps to result values.

/// Type a leaf's text is converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    /// Signed integer; non-numeric text is an error.
    Integer,
    /// Trimmed text.
    Text,
    /// ISO date or datetime reduced to `YYYY-MM-DD`.
    Date,
    /// ISO datetime kept verbatim.
    DateTime,
}

/// What happens when a field's source is absent from the XML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absence fails the whole call.
    Required,
    /// Absence omits the key.
    Optional,
    /// Absence yields the shape's empty value (`""`, `[]` or `{}`).
    OrEmpty,
}

/// Extraction rule for one value.
///
/// Paths are relative to the node the shape is applied to; see
/// [`crate::xml`] for the path syntax.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Scalar read from an element's text or an attribute.
    Leaf { path: String, kind: LeafKind },

    /// Fixed-key object whose fields are read relative to `path`.
    ///
    /// An empty path reads the fields from the current node, which turns
    /// flat sibling elements into a nested object.
    Object { path: String, fields: Vec<Field> },

    /// Sequence built from every element matching `path`.
    ///
    /// The last path segment is the repeating element; the list is absent
    /// only when its container is.
    List { path: String, item: Box<Shape> },

    /// Text leaf split into a sequence of trimmed, non-empty strings.
    Delimited { path: String, separator: char },

    /// Open-ended object with one text entry per child element of `path`.
    ///
    /// Children listed in `keys` (element name, result key) take the given
    /// key; any other child is keyed by its element name in snake case.
    /// Absent when the element at `path` is.
    Entries {
        path: String,
        keys: Vec<(String, String)>,
    },

    /// Union of object-producing shapes. Later parts overwrite earlier ones
    /// on key collision; absent parts are skipped.
    Merge(Vec<Shape>),
}

impl Shape {
    /// Integer leaf.
    #[must_use]
    pub fn integer(path: impl Into<String>) -> Self {
        Self::leaf(path, LeafKind::Integer)
    }

    /// Text leaf.
    #[must_use]
    pub fn text(path: impl Into<String>) -> Self {
        Self::leaf(path, LeafKind::Text)
    }

    /// Date leaf.
    #[must_use]
    pub fn date(path: impl Into<String>) -> Self {
        Self::leaf(path, LeafKind::Date)
    }

    /// Datetime leaf.
    #[must_use]
    pub fn datetime(path: impl Into<String>) -> Self {
        Self::leaf(path, LeafKind::DateTime)
    }

    /// Leaf of the given kind.
    #[must_use]
    pub fn leaf(path: impl Into<String>, kind: LeafKind) -> Self {
        Self::Leaf {
            path: path.into(),
            kind,
        }
    }

    /// Object read from the element at `path`.
    #[must_use]
    pub fn object(path: impl Into<String>, fields: impl IntoIterator<Item = Field>) -> Self {
        Self::Object {
            path: path.into(),
            fields: fields.into_iter().collect(),
        }
    }

    /// Object read from the current node.
    #[must_use]
    pub fn flat(fields: impl IntoIterator<Item = Field>) -> Self {
        Self::object("", fields)
    }

    /// List of `item` over the elements matching `path`.
    #[must_use]
    pub fn list(path: impl Into<String>, item: Shape) -> Self {
        Self::List {
            path: path.into(),
            item: Box::new(item),
        }
    }

    /// Text leaf split on `separator`.
    #[must_use]
    pub fn delimited(path: impl Into<String>, separator: char) -> Self {
        Self::Delimited {
            path: path.into(),
            separator,
        }
    }

    /// Open-ended text map over the children of `path`.
    #[must_use]
    pub fn entries<E, K>(path: impl Into<String>, keys: impl IntoIterator<Item = (E, K)>) -> Self
    where
        E: Into<String>,
        K: Into<String>,
    {
        Self::Entries {
            path: path.into(),
            keys: keys
                .into_iter()
                .map(|(element, key)| (element.into(), key.into()))
                .collect(),
        }
    }

    /// Merge of object-producing shapes.
    #[must_use]
    pub fn merge(parts: impl IntoIterator<Item = Shape>) -> Self {
        Self::Merge(parts.into_iter().collect())
    }
}

/// A keyed value inside an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Key in the result map.
    pub key: String,

    /// How the value is extracted.
    pub shape: Shape,

    /// Handling of an absent source.
    pub presence: Presence,
}

impl Field {
    /// Create a field.
    #[must_use]
    pub fn new(key: impl Into<String>, shape: Shape, presence: Presence) -> Self {
        Self {
            key: key.into(),
            shape,
            presence,
        }
    }

    /// Field whose absence is an error.
    #[must_use]
    pub fn required(key: impl Into<String>, shape: Shape) -> Self {
        Self::new(key, shape, Presence::Required)
    }

    /// Field omitted when absent.
    #[must_use]
    pub fn optional(key: impl Into<String>, shape: Shape) -> Self {
        Self::new(key, shape, Presence::Optional)
    }

    /// Field replaced by an empty value when absent.
    #[must_use]
    pub fn or_empty(key: impl Into<String>, shape: Shape) -> Self {
        Self::new(key, shape, Presence::OrEmpty)
    }
}

/// Where the repeating result items live and how each one is read.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemsSpec {
    /// Path from the root element to the repeating element.
    pub path: String,

    /// Shape applied to every matching element.
    pub shape: Shape,
}

impl ItemsSpec {
    /// Create an items specification.
    #[must_use]
    pub fn new(path: impl Into<String>, shape: Shape) -> Self {
        Self {
            path: path.into(),
            shape,
        }
    }
}
