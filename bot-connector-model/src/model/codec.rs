/*!
 * JSON wire form of records
 *
 * Encoding writes one object per record, keys in declaration order, absent
 * fields left out. Decoding walks the keys of an object, reads the ones the
 * record type declares and skips the rest.
 */

use std::{fmt, str::FromStr, sync::Arc};

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{
    de::{DeserializeSeed, Error as SerdeError},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::{instrument, trace};

use crate::error::Error;

use super::{
    registry::Registry,
    types::{FieldDescriptor, FieldType, RecordType},
    values::{Amount, AnyValue, Record, Value},
};

/// Knobs for decoding wire objects
#[derive(Debug, Clone, PartialEq, Eq, Builder, Getters)]
#[builder(build_fn(error = "Error"), setter(prefix = "with"))]
pub struct DecodeOptions {
    /// Skip keys the record type doesn't declare instead of failing
    #[builder(default = "true")]
    ignore_unknown_fields: bool,
    /// Fail if a field marked as required is missing
    #[builder(default = "false")]
    enforce_required: bool,
}

impl DecodeOptions {
    /// Builder starting from the default options
    pub fn builder() -> DecodeOptionsBuilder {
        DecodeOptionsBuilder::default()
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            ignore_unknown_fields: true,
            enforce_required: false,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::String(text) | Value::Any(AnyValue::Text(text)) => {
                serializer.serialize_str(text)
            }
            Value::Boolean(value) => serializer.serialize_bool(*value),
            Value::Decimal(amount) => JsonValue::from(amount).serialize(serializer),
            Value::Record(record) | Value::Any(AnyValue::Record(record)) => {
                record.serialize(serializer)
            }
            Value::Any(AnyValue::Json(value)) => value.serialize(serializer),
        }
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.present()))?;
        for (field, value) in self.iter() {
            if let Some(value) = value {
                map.serialize_entry(field.name(), value)?;
            }
        }
        map.end()
    }
}

impl From<&Value> for JsonValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(text) | Value::Any(AnyValue::Text(text)) => {
                JsonValue::String(text.clone())
            }
            Value::Boolean(value) => JsonValue::Bool(*value),
            Value::Decimal(amount) => amount.into(),
            Value::Record(record) | Value::Any(AnyValue::Record(record)) => record.into(),
            Value::Any(AnyValue::Json(value)) => value.clone(),
        }
    }
}

impl From<&Record> for JsonValue {
    fn from(record: &Record) -> Self {
        JsonValue::Object(JsonMap::from_iter(record.iter().filter_map(
            |(field, value)| value.map(|value| (field.name().clone(), JsonValue::from(value))),
        )))
    }
}

impl Record {
    /// Wire form of the record
    pub fn to_json(&self) -> JsonValue {
        self.into()
    }
}

fn malformed(field: &FieldDescriptor, value: &JsonValue) -> Error {
    Error::MalformedValue(
        field.name().clone(),
        value.to_string(),
        field.field_type().to_string(),
    )
}

impl Registry {
    /// Decode a wire object into an instance of the named type using the
    /// default [`DecodeOptions`]
    pub fn decode(&self, type_name: &str, value: JsonValue) -> Result<Record, Error> {
        self.decode_with(type_name, value, &DecodeOptions::default())
    }

    /// Decode JSON text into an instance of the named type
    pub fn decode_str(&self, type_name: &str, json: &str) -> Result<Record, Error> {
        self.decode(type_name, serde_json::from_str(json)?)
    }

    /// Decode a wire object into an instance of the named type
    #[instrument(level = "debug", skip(self, value, options))]
    pub fn decode_with(
        &self,
        type_name: &str,
        value: JsonValue,
        options: &DecodeOptions,
    ) -> Result<Record, Error> {
        self.decode_record(self.lookup(type_name)?, value, options)
    }

    fn decode_record(
        &self,
        record_type: Arc<RecordType>,
        value: JsonValue,
        options: &DecodeOptions,
    ) -> Result<Record, Error> {
        let object = match value {
            JsonValue::Object(object) => object,
            other => {
                return Err(Error::MalformedValue(
                    record_type.name().clone(),
                    other.to_string(),
                    "object".to_owned(),
                ))
            }
        };
        let mut record = Record::new(record_type.clone());
        for (key, value) in object {
            let Some(field) = record_type.get(&key) else {
                if *options.ignore_unknown_fields() {
                    trace!("Ignoring unknown field {} of {}", key, record_type.name());
                    continue;
                }
                return Err(Error::UnknownField(record_type.name().clone(), key));
            };
            if let Some(value) = self.decode_value(field, value, options)? {
                record.set(&key, value)?;
            }
        }
        if *options.enforce_required() {
            if let Some((field, _)) = record
                .iter()
                .find(|(field, value)| *field.required() && value.is_none())
            {
                return Err(Error::MissingRequired(
                    record_type.name().clone(),
                    field.name().clone(),
                ));
            }
        }
        Ok(record)
    }

    fn decode_value(
        &self,
        field: &FieldDescriptor,
        value: JsonValue,
        options: &DecodeOptions,
    ) -> Result<Option<Value>, Error> {
        let decoded = match (field.field_type(), value) {
            (_, JsonValue::Null) => return Ok(None),
            (FieldType::String, JsonValue::String(text)) => Value::String(text),
            (FieldType::Boolean, JsonValue::Bool(value)) => Value::Boolean(value),
            (FieldType::Decimal, JsonValue::String(text)) => Value::Decimal(
                Amount::from_str(&text)
                    .map_err(|_| malformed(field, &JsonValue::String(text.clone())))?,
            ),
            (FieldType::Decimal, JsonValue::Number(number)) => Value::Decimal(number.into()),
            (FieldType::Record(name), object @ JsonValue::Object(_)) => {
                Value::Record(self.decode_record(self.lookup(name)?, object, options)?)
            }
            (FieldType::Any(_), JsonValue::String(text)) => Value::Any(AnyValue::Text(text)),
            (FieldType::Any(name), JsonValue::Object(object)) => {
                Value::Any(self.decode_opaque(self.lookup(name)?, object)?)
            }
            (FieldType::Any(_), other) => Value::Any(AnyValue::Json(other)),
            (FieldType::Enum(symbols), JsonValue::String(symbol)) if symbols.contains(&symbol) => {
                Value::String(symbol)
            }
            (_, other) => return Err(malformed(field, &other)),
        };
        Ok(Some(decoded))
    }

    /// An object in an opaque field becomes a record of the hint type only
    /// if every key is declared and the record encodes back to the same
    /// object. Anything else is kept as raw JSON.
    fn decode_opaque(
        &self,
        hint: Arc<RecordType>,
        object: JsonMap<String, JsonValue>,
    ) -> Result<AnyValue, Error> {
        let object = JsonValue::Object(object);
        match self.decode_record(hint.clone(), object.clone(), &EXACT) {
            Ok(record) if JsonValue::from(&record) == object => Ok(AnyValue::Record(record)),
            Ok(_) | Err(Error::MalformedValue(..)) | Err(Error::UnknownField(..)) => {
                trace!("Keeping object as raw JSON, it is not a {}", hint.name());
                Ok(AnyValue::Json(object))
            }
            Err(err) => Err(err),
        }
    }
}

const EXACT: DecodeOptions = DecodeOptions {
    ignore_unknown_fields: false,
    enforce_required: false,
};

/// Deserialize a record of a given type straight from any serde deserializer
pub struct RecordSeed<'a> {
    registry: &'a Registry,
    type_name: &'a str,
    options: DecodeOptions,
}

impl<'a> RecordSeed<'a> {
    /// Seed for `type_name` in `registry` with the default decode options
    pub fn new(registry: &'a Registry, type_name: &'a str) -> Self {
        RecordSeed {
            registry,
            type_name,
            options: DecodeOptions::default(),
        }
    }

    /// Use the given decode options
    pub fn with_options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }
}

impl fmt::Debug for RecordSeed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSeed")
            .field("type_name", &self.type_name)
            .field("options", &self.options)
            .finish()
    }
}

impl<'de> DeserializeSeed<'de> for RecordSeed<'_> {
    type Value = Record;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = JsonValue::deserialize(deserializer)?;
        self.registry
            .decode_with(self.type_name, value, &self.options)
            .map_err(D::Error::custom)
    }
}
