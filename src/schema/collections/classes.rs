use super::{reference, references, with_timestamps};
use crate::schema::shape::{CollectionSchema, Constraint, ObjectShape};

/// A class taught by one teacher within one institution
pub fn classes() -> CollectionSchema {
    let shape = ObjectShape::new()
        .required("name", Constraint::string())
        .optional("description", Constraint::string())
        .required("teacher_id", reference())
        .optional("student_ids", references())
        .required("educational_institution_id", reference())
        .optional("resource_ids", references());

    CollectionSchema::new("classes", with_timestamps(shape))
}
