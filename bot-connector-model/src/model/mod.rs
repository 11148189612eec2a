/*!
 * Model
*/
pub mod codec;
pub mod connector;
pub mod registry;
pub mod types;
pub mod values;

pub use codec::{DecodeOptions, RecordSeed};
pub use connector::CONNECTOR;
pub use registry::Registry;
pub use types::{FieldDescriptor, FieldType, RecordType};
pub use values::{Amount, AnyValue, Record, Value};
