//! Document model: named fields with storage and indexing options.

/// Indexing and storage options for a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextOption {
    /// Whether the verbatim value is retrievable at query time.
    pub stored: bool,

    /// Whether the value contributes postings.
    pub indexed: bool,

    /// Whether the value is run through the analyzer. An untokenized
    /// indexed field produces a single exact-match term.
    pub tokenized: bool,
}

impl TextOption {
    /// Stored and indexed as a single exact-match term.
    pub const STORED_UNTOKENIZED: TextOption = TextOption {
        stored: true,
        indexed: true,
        tokenized: false,
    };

    /// Analyzed into postings, not retrievable verbatim.
    pub const INDEXED_ONLY: TextOption = TextOption {
        stored: false,
        indexed: true,
        tokenized: true,
    };

    /// A field that is neither stored nor indexed is useless.
    pub fn is_valid(&self) -> bool {
        self.stored || self.indexed
    }
}

impl Default for TextOption {
    fn default() -> Self {
        TextOption {
            stored: true,
            indexed: true,
            tokenized: true,
        }
    }
}

/// A named field with its value and indexing options.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// The field name.
    pub name: String,

    /// The field value.
    pub value: String,

    /// The field indexing options.
    pub option: TextOption,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, value: impl Into<String>, option: TextOption) -> Self {
        Field {
            name: name.into(),
            value: value.into(),
            option,
        }
    }
}

/// One indexable unit: an ordered set of named fields.
///
/// A document represents one file, or one page within a multi-page file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    fields: Vec<Field>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Document { fields: Vec::new() }
    }

    /// Start building a document fluently.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }

    /// Append a field, preserving insertion order.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Iterate over the fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Value of the first field with the given name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A builder for constructing documents in a fluent manner.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        DocumentBuilder {
            document: Document::new(),
        }
    }

    /// Add a text field with the given options.
    pub fn add_text<S: Into<String>, T: Into<String>>(
        mut self,
        name: S,
        value: T,
        option: TextOption,
    ) -> Self {
        self.document.add_field(Field::new(name, value, option));
        self
    }

    pub fn build(self) -> Document {
        self.document
    }
}

/// Stored fields of one document, retrievable at query time.
///
/// Lookup by document id is a direct keyed access on the reader side;
/// this record only holds the field name/value pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredDocument {
    fields: Vec<(String, String)>,
}

impl StoredDocument {
    /// Create an empty record.
    pub fn new() -> Self {
        StoredDocument { fields: Vec::new() }
    }

    /// Append a stored field value.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Value of the first field with the given name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over stored name/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of stored fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record holds no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
