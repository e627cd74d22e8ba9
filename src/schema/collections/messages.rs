use super::{file_object, reference};
use crate::schema::shape::{CollectionSchema, Constraint, FieldSpec, ObjectShape};

/// Messages between users, optionally tied to a class
pub fn messages() -> CollectionSchema {
    let shape = ObjectShape::new()
        .required("content", Constraint::string())
        .required("sender_id", reference())
        .required(
            "recipient_ids",
            Constraint::non_empty_array_of(Constraint::object_id()),
        )
        .optional("class_id", reference())
        .required("sent_date", Constraint::date())
        .optional("read_date", Constraint::date())
        .field(
            FieldSpec::optional(
                "attachments",
                Constraint::array_of(Constraint::object(file_object())),
            )
            .describe("Files attached to the message"),
        );

    CollectionSchema::new("messages", shape)
}
