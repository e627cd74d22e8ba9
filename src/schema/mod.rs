pub mod collections;
mod bson_type;
mod export;
mod shape;
mod validator;

pub use bson_type::BsonType;
pub use export::{render, ExportedSchema, SchemaExporter};
pub use shape::{CollectionSchema, Constraint, FieldSpec, ObjectShape};
pub use validator::{DocumentValidator, ValidationReport, Violation, ViolationKind};
