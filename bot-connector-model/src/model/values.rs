/*!
 * Values and record instances
 *
 * A [`Record`] holds one slot per field of its [`RecordType`]. A slot is
 * either absent (`None`) or holds a [`Value`] whose shape matches the field
 * type. Equality, hashing and rendering all walk the slots in declaration
 * order.
 */

use std::{
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
    sync::Arc,
};

use rust_decimal::Decimal;
use serde_json::{Number, Value as JsonValue};

use crate::error::Error;

use super::types::{FieldDescriptor, FieldType, RecordType};

/// Decimal amount that keeps its literal wire form.
///
/// `"3.50"` and `"3.5"` are different amounts, and so are `"3.5"` and `3.5`:
/// comparison and hashing use the literal, the numeric parse only validates
/// text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Amount(Literal);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Literal {
    Text(String),
    Number(Number),
}

impl Amount {
    /// Whether the amount was given as a JSON number
    pub fn is_number(&self) -> bool {
        matches!(self.0, Literal::Number(_))
    }

    /// Numeric value of the amount, `None` if it doesn't fit a [`Decimal`]
    pub fn to_decimal(&self) -> Option<Decimal> {
        match &self.0 {
            Literal::Text(text) => parse_decimal(text),
            Literal::Number(number) => parse_decimal(&number.to_string()),
        }
    }
}

impl From<Number> for Amount {
    fn from(value: Number) -> Self {
        Amount(Literal::Number(value))
    }
}

impl From<&Amount> for JsonValue {
    fn from(value: &Amount) -> Self {
        match &value.0 {
            Literal::Text(text) => JsonValue::String(text.clone()),
            Literal::Number(number) => JsonValue::Number(number.clone()),
        }
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

impl FromStr for Amount {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_decimal(s).ok_or_else(|| {
            Error::MalformedValue("amount".to_owned(), s.to_owned(), "decimal".to_owned())
        })?;
        Ok(Amount(Literal::Text(s.to_owned())))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Literal::Text(text) => f.write_str(text),
            Literal::Number(number) => write!(f, "{number}"),
        }
    }
}

/// Value of an opaque field.
///
/// Objects that read back exactly as the field's hint type are kept as
/// [`AnyValue::Record`]; every other wire shape is kept verbatim in
/// [`AnyValue::Json`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyValue {
    /// String variant
    Text(String),
    /// Structured variant of the hint type
    Record(Record),
    /// Any other shape: objects off the hint type, numbers, booleans, arrays
    Json(JsonValue),
}

impl Hash for AnyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            AnyValue::Text(text) => text.hash(state),
            AnyValue::Record(record) => record.hash(state),
            AnyValue::Json(value) => hash_json(value, state),
        }
    }
}

/// Object keys are hashed in sorted order, since object equality ignores key
/// order.
fn hash_json<H: Hasher>(value: &JsonValue, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        JsonValue::Null => (),
        JsonValue::Bool(value) => value.hash(state),
        JsonValue::Number(number) => number.to_string().hash(state),
        JsonValue::String(text) => text.hash(state),
        JsonValue::Array(items) => {
            items.len().hash(state);
            items.iter().for_each(|item| hash_json(item, state));
        }
        JsonValue::Object(object) => {
            object.len().hash(state);
            let mut entries: Vec<_> = object.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            for (key, value) in entries {
                key.hash(state);
                hash_json(value, state);
            }
        }
    }
}

/// Value of a present field
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    /// UTF-8 text, also used for enum symbols
    String(String),
    /// True or False
    Boolean(bool),
    /// Decimal amount
    Decimal(Amount),
    /// Nested record
    Record(Record),
    /// Opaque field value
    Any(AnyValue),
}

impl Value {
    /// Short name of the value's shape, used in error messages
    pub fn shape(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Boolean(_) => "boolean",
            Value::Decimal(_) => "decimal",
            Value::Record(_) => "record",
            Value::Any(AnyValue::Text(_)) => "string",
            Value::Any(AnyValue::Record(_)) => "record",
            Value::Any(AnyValue::Json(JsonValue::Null)) => "null",
            Value::Any(AnyValue::Json(_)) => "json",
        }
    }

    /// Check the value against a field descriptor, normalizing opaque fields
    /// into [`Value::Any`].
    pub(crate) fn conform(self, field: &FieldDescriptor) -> Result<Value, Error> {
        let mismatch = |value: &Value| {
            Error::TypeMismatch(
                field.name().clone(),
                field.field_type().to_string(),
                value.shape().to_owned(),
            )
        };
        match (field.field_type(), self) {
            (FieldType::String, value @ Value::String(_)) => Ok(value),
            (FieldType::Boolean, value @ Value::Boolean(_)) => Ok(value),
            (FieldType::Decimal, value @ Value::Decimal(_)) => Ok(value),
            (FieldType::Record(name), Value::Record(record)) => {
                if record.type_name() == name {
                    Ok(Value::Record(record))
                } else {
                    Err(Error::TypeMismatch(
                        field.name().clone(),
                        field.field_type().to_string(),
                        format!("record {}", record.type_name()),
                    ))
                }
            }
            (FieldType::Any(_), Value::String(text))
            | (FieldType::Any(_), Value::Any(AnyValue::Json(JsonValue::String(text)))) => {
                Ok(Value::Any(AnyValue::Text(text)))
            }
            (FieldType::Any(hint), Value::Record(record))
            | (FieldType::Any(hint), Value::Any(AnyValue::Record(record))) => {
                if record.type_name() == hint {
                    Ok(Value::Any(AnyValue::Record(record)))
                } else {
                    Err(Error::TypeMismatch(
                        field.name().clone(),
                        field.field_type().to_string(),
                        format!("record {}", record.type_name()),
                    ))
                }
            }
            (FieldType::Any(_), value @ Value::Any(AnyValue::Json(JsonValue::Null))) => {
                Err(mismatch(&value))
            }
            (FieldType::Any(_), value @ Value::Any(_)) => Ok(value),
            (FieldType::Enum(symbols), Value::String(symbol)) => {
                if symbols.contains(&symbol) {
                    Ok(Value::String(symbol))
                } else {
                    Err(Error::TypeMismatch(
                        field.name().clone(),
                        field.field_type().to_string(),
                        symbol,
                    ))
                }
            }
            (_, value) => Err(mismatch(&value)),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Amount> for Value {
    fn from(value: Amount) -> Self {
        Value::Decimal(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Record(value)
    }
}

impl From<AnyValue> for Value {
    fn from(value: AnyValue) -> Self {
        Value::Any(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(text) | Value::Any(AnyValue::Text(text)) => f.write_str(text),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Decimal(amount) => write!(f, "{amount}"),
            Value::Record(record) | Value::Any(AnyValue::Record(record)) => {
                write!(f, "{record}")
            }
            Value::Any(AnyValue::Json(value)) => write!(f, "{value}"),
        }
    }
}

/// An instance of a record type.
///
/// Created empty through [`Registry::record`](super::registry::Registry::record)
/// or [`Record::new`] and filled with [`Record::set`]. Setters mutate the
/// instance in place; chaining only returns the same instance again.
#[derive(Clone)]
pub struct Record {
    record_type: Arc<RecordType>,
    fields: Vec<Option<Value>>,
}

impl Record {
    /// Create an instance with every field absent
    pub fn new(record_type: Arc<RecordType>) -> Self {
        let fields = vec![None; record_type.len()];
        Record {
            record_type,
            fields,
        }
    }

    /// Name of the record type
    pub fn type_name(&self) -> &str {
        self.record_type.name()
    }

    /// The record type of this instance
    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.record_type
    }

    fn index_of(&self, name: &str) -> Result<usize, Error> {
        self.record_type
            .index_of(name)
            .ok_or_else(|| Error::UnknownField(self.type_name().to_owned(), name.to_owned()))
    }

    /// Value of a field, `None` if the field is absent
    pub fn get(&self, name: &str) -> Result<Option<&Value>, Error> {
        let idx = self.index_of(name)?;
        Ok(self.fields[idx].as_ref())
    }

    /// Set a field, replacing any previous value.
    ///
    /// Returns the same instance so calls can be chained:
    /// `record.set("label", "Coffee")?.set("pending", true)?;`
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, Error> {
        let idx = self.index_of(name)?;
        let value = value.into().conform(&self.record_type.fields()[idx])?;
        self.fields[idx] = Some(value);
        Ok(self)
    }

    /// By-value variant of [`Record::set`]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self, Error> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Make a field absent again
    pub fn unset(&mut self, name: &str) -> Result<&mut Self, Error> {
        let idx = self.index_of(name)?;
        self.fields[idx] = None;
        Ok(self)
    }

    /// Iterate fields and their values in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&FieldDescriptor, Option<&Value>)> {
        self.record_type
            .iter()
            .zip(self.fields.iter().map(Option::as_ref))
    }

    /// Number of present fields
    pub fn present(&self) -> usize {
        self.fields.iter().filter(|value| value.is_some()).count()
    }

    /// Deterministic hash over the type name and every field in order.
    /// Absent fields contribute a fixed marker.
    pub fn hash_code(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.type_name() == other.type_name() && self.fields == other.fields
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_name().hash(state);
        // Option hashes a distinct discriminant for None
        self.fields.hash(state);
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(field, value)| (field.name(), value)))
            .finish()
    }
}

impl Record {
    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        writeln!(f, "{} {{", self.type_name())?;
        for (field, value) in self.iter() {
            write!(f, "{indent}  {}: ", field.name())?;
            match value {
                Some(Value::Record(record) | Value::Any(AnyValue::Record(record))) => {
                    record.render(f, depth + 1)?
                }
                Some(value) => write!(f, "{value}")?,
                None => f.write_str("null")?,
            }
            writeln!(f)?;
        }
        write!(f, "{indent}}}")
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}
