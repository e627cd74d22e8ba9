//! The five validated collections of the educational platform
//!
//! Each submodule declares one entity. They share three conventions, kept
//! here so every declaration uses them identically:
//!
//! - references are ObjectIds (single) or arrays of ObjectIds (many); only
//!   the type is checked, never that the target exists
//! - `creation_date` / `update_date` timestamps
//! - the embedded file object (`file_name`, `mime_type`, `size`, `data`)

mod classes;
mod institutions;
mod messages;
mod resources;
mod users;

pub use classes::classes;
pub use institutions::educational_institutions;
pub use messages::messages;
pub use resources::educational_resources;
pub use users::users;

use super::shape::{CollectionSchema, Constraint, ObjectShape};

/// Exactly one `@`, a non-empty local part, and a dotted domain
pub const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// All collections in registration order
pub fn all() -> Vec<CollectionSchema> {
    vec![
        users(),
        educational_institutions(),
        classes(),
        educational_resources(),
        messages(),
    ]
}

pub fn by_name(name: &str) -> Option<CollectionSchema> {
    all().into_iter().find(|schema| schema.name == name)
}

pub fn names() -> Vec<&'static str> {
    all().iter().map(|schema| schema.name).collect()
}

fn reference() -> Constraint {
    Constraint::object_id()
}

fn references() -> Constraint {
    Constraint::array_of(Constraint::object_id())
}

fn email() -> Constraint {
    Constraint::matching(EMAIL_PATTERN)
}

fn with_timestamps(shape: ObjectShape) -> ObjectShape {
    shape
        .optional("creation_date", Constraint::date())
        .optional("update_date", Constraint::date())
}

/// Binary payload stored inline in the owning document
fn file_object() -> ObjectShape {
    ObjectShape::new()
        .required("file_name", Constraint::string())
        .required("mime_type", Constraint::string())
        .required("size", Constraint::int())
        .required("data", Constraint::bin_data())
}

/// [`file_object`] with per-field descriptions, as declared on resources
fn described_file_object() -> ObjectShape {
    let mut shape = file_object();
    for field in &mut shape.fields {
        field.description = match field.name {
            "mime_type" => Some("MIME type of the file (e.g., 'application/pdf', 'video/mp4')"),
            "size" => Some("File size in bytes"),
            "data" => Some("Binary data of the file"),
            _ => None,
        };
    }
    shape
}
