use super::{described_file_object, reference, with_timestamps};
use crate::schema::shape::{CollectionSchema, Constraint, FieldSpec, ObjectShape};

pub const RESOURCE_TYPES: &[&str] = &["document", "video", "audio", "image"];

/// Teaching material with its file stored inline.
///
/// This is the only closed shape: fields outside the declaration are
/// rejected. `_id` is declared because the engine adds it to every document
/// before the validator runs.
pub fn educational_resources() -> CollectionSchema {
    let shape = ObjectShape::new()
        .optional("_id", Constraint::object_id())
        .required("title", Constraint::string())
        .optional("description", Constraint::string())
        .field(
            FieldSpec::required("type", Constraint::one_of(RESOURCE_TYPES))
                .describe("Type of educational resource"),
        )
        .field(
            FieldSpec::required("file", Constraint::object(described_file_object()))
                .describe("Information about the attached file"),
        )
        .required("class_id", reference())
        .required("teacher_id", reference());

    let shape = with_timestamps(shape)
        .closed()
        .describe("Stores files directly in the document");

    CollectionSchema::new("educational_resources", shape)
}
