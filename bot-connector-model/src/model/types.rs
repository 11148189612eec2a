/*!
 * Record type system
 *
 * A record type is a named, ordered list of field descriptors. The order is
 * fixed at registration and drives:
 *
 * - the key order of the JSON wire form
 * - the line order of the debug rendering
 * - the combination order of the record hash
 *
 * Field types are a small closed set. Nested records are referenced by type
 * name and resolved through the [`Registry`](super::registry::Registry).
 */

use std::{collections::HashMap, fmt, slice::Iter};

use derive_builder::Builder;
use derive_getters::Getters;
use itertools::Itertools;
use serde_derive::{Deserialize, Serialize};

use crate::error::Error;

/// Semantic type of a record field
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Arbitrary-length character sequences
    String,
    /// True or False
    Boolean,
    /// Decimal amount, kept as its literal text
    Decimal,
    /// Nested record of the named type
    Record(String),
    /// Either a plain string or a nested record of the named type
    Any(String),
    /// One of a fixed set of symbols
    Enum(Vec<String>),
}

impl FieldType {
    /// Name of the record type this field refers to, if any
    pub fn referenced_type(&self) -> Option<&str> {
        match self {
            FieldType::Record(name) | FieldType::Any(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Boolean => write!(f, "boolean"),
            FieldType::Decimal => write!(f, "decimal"),
            FieldType::Record(name) => write!(f, "record {name}"),
            FieldType::Any(name) => write!(f, "string or record {name}"),
            FieldType::Enum(symbols) => write!(f, "one of [{}]", symbols.iter().join(", ")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Getters)]
#[serde(rename_all = "camelCase")]
/// A named field of a record type. The name doubles as the JSON key.
pub struct FieldDescriptor {
    /// Wire name
    name: String,
    /// Datatype
    #[serde(rename = "type")]
    field_type: FieldType,
    /// Optional or required
    required: bool,
    /// Human readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    doc: Option<String>,
}

impl FieldDescriptor {
    /// Creates a new FieldDescriptor
    ///
    /// # Arguments
    /// * `name` - Wire name of the field, unique within its record type
    /// * `field_type` - The semantic type of this field
    /// * `required` - Whether the field must be present on the wire
    /// * `doc` - Optional documentation string for this field
    pub fn new(name: &str, field_type: FieldType, required: bool, doc: Option<&str>) -> Self {
        Self {
            name: name.to_owned(),
            field_type,
            required,
            doc: doc.map(ToOwned::to_owned),
        }
    }

    /// Creates an optional field without documentation
    pub fn optional(name: &str, field_type: FieldType) -> Self {
        Self::new(name, field_type, false, None)
    }

    /// Attach a documentation string
    pub fn with_doc(mut self, doc: &str) -> Self {
        self.doc = Some(doc.to_owned());
        self
    }
}

/// Schema of a record: a name and its ordered fields
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Builder, Getters)]
#[serde(try_from = "RecordTypeDef")]
#[builder(build_fn(private, name = "build_unchecked", error = "Error"))]
pub struct RecordType {
    /// Type name
    #[builder(setter(into))]
    name: String,
    /// Type documentation
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(setter(into, strip_option), default)]
    doc: Option<String>,
    /// Fields in wire order
    #[builder(setter(each(name = "with_field")), default)]
    fields: Vec<FieldDescriptor>,
    /// Lookup for index by wire name
    #[serde(skip_serializing)]
    #[builder(setter(skip))]
    #[getter(skip)]
    lookup: HashMap<String, usize>,
}

impl RecordTypeBuilder {
    /// Build the record type, rejecting duplicate field names
    pub fn build(&self) -> Result<RecordType, Error> {
        let unchecked = self.build_unchecked()?;
        let mut record_type = RecordType::try_new(&unchecked.name, unchecked.fields)?;
        record_type.doc = unchecked.doc;
        Ok(record_type)
    }
}

impl RecordType {
    /// Creates a new RecordType
    ///
    /// Fails with [`Error::DuplicateField`] if two descriptors share a name.
    pub fn try_new(name: &str, fields: Vec<FieldDescriptor>) -> Result<Self, Error> {
        if let Some(duplicate) = fields.iter().map(|field| &field.name).duplicates().next() {
            return Err(Error::DuplicateField(name.to_owned(), duplicate.clone()));
        }
        let lookup = fields
            .iter()
            .enumerate()
            .map(|(idx, field)| (field.name.clone(), idx))
            .collect();
        Ok(RecordType {
            name: name.to_owned(),
            doc: None,
            fields,
            lookup,
        })
    }

    /// Creates a new RecordTypeBuilder
    pub fn builder() -> RecordTypeBuilder {
        RecordTypeBuilder::default()
    }

    /// Position of the field with the given wire name
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.lookup.get(name).copied()
    }

    /// Gets a reference to the field with the given wire name
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index_of(name).map(|idx| &self.fields[idx])
    }

    /// Returns the number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the type declares no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate the fields in wire order
    pub fn iter(&self) -> Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }
}

#[derive(Deserialize)]
struct RecordTypeDef {
    name: String,
    #[serde(default)]
    doc: Option<String>,
    fields: Vec<FieldDescriptor>,
}

impl TryFrom<RecordTypeDef> for RecordType {
    type Error = Error;
    fn try_from(value: RecordTypeDef) -> Result<Self, Self::Error> {
        let mut record_type = RecordType::try_new(&value.name, value.fields)?;
        record_type.doc = value.doc;
        Ok(record_type)
    }
}
