/*!
Defining the [Registry] that maps record type names to their schema.

A registry is filled once and only read afterwards. Nested record fields name
their type, so decoding resolves them through the same registry.
*/

use std::{collections::BTreeMap, sync::Arc};

use tracing::debug;

use crate::error::Error;

use super::{
    types::{FieldDescriptor, RecordType},
    values::Record,
};

/// Registered record types by name
#[derive(Debug, Clone, Default)]
pub struct Registry {
    types: BTreeMap<String, Arc<RecordType>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record type from its name and ordered fields
    ///
    /// # Errors
    /// * [`Error::DuplicateField`] if two fields share a wire name
    /// * [`Error::DuplicateType`] if the name is already registered
    pub fn register_type(
        &mut self,
        name: &str,
        fields: Vec<FieldDescriptor>,
    ) -> Result<&mut Self, Error> {
        self.register(RecordType::try_new(name, fields)?)
    }

    /// Register an already built record type
    pub fn register(&mut self, record_type: RecordType) -> Result<&mut Self, Error> {
        if self.types.contains_key(record_type.name()) {
            return Err(Error::DuplicateType(record_type.name().clone()));
        }
        debug!(
            "Registering record type {} with {} fields",
            record_type.name(),
            record_type.len()
        );
        self.types
            .insert(record_type.name().clone(), Arc::new(record_type));
        Ok(self)
    }

    /// Schema of the named record type
    pub fn lookup(&self, name: &str) -> Result<Arc<RecordType>, Error> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownType(name.to_owned()))
    }

    /// Whether the named record type is registered
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Create an empty instance of the named record type
    pub fn record(&self, name: &str) -> Result<Record, Error> {
        Ok(Record::new(self.lookup(name)?))
    }

    /// Names of all registered types in sorted order
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Check that every nested record reference names a registered type
    pub fn check_references(&self) -> Result<(), Error> {
        self.types
            .values()
            .flat_map(|record_type| record_type.iter())
            .filter_map(|field| field.field_type().referenced_type())
            .try_for_each(|name| self.lookup(name).map(|_| ()))
    }
}
