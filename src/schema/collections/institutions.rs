use super::{email, references, with_timestamps};
use crate::schema::shape::{CollectionSchema, Constraint, ObjectShape};

/// Schools and other institutions
pub fn educational_institutions() -> CollectionSchema {
    let location = ObjectShape::new()
        .optional("department", Constraint::string())
        .optional("province", Constraint::string())
        .optional("district", Constraint::string())
        .optional("latitude", Constraint::double())
        .optional("longitude", Constraint::double());

    let shape = ObjectShape::new()
        .required("name", Constraint::string())
        .required("address", Constraint::string())
        .optional("phone", Constraint::string())
        .optional("email", email())
        .optional("location", Constraint::object(location))
        .optional("teacher_ids", references())
        .optional("student_ids", references());

    CollectionSchema::new("educational_institutions", with_timestamps(shape))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::collections::{fixtures, EMAIL_PATTERN};
    use crate::schema::DocumentValidator;
    use mongodb::bson::oid::ObjectId;
    use mongodb::bson::{doc, Document};

    fn school() -> Document {
        doc! { "name": "IE 2045 San Martin", "address": "Jr. Lima 450" }
    }

    fn check(document: &Document) -> Vec<String> {
        DocumentValidator::validate(&educational_institutions(), document).messages()
    }

    #[test]
    fn test_rendered_validator() {
        fixtures::assert_same_validator(
            educational_institutions().validator(),
            doc! { "$jsonSchema": {
                "bsonType": "object",
                "required": ["name", "address"],
                "properties": {
                    "name": { "bsonType": "string" },
                    "address": { "bsonType": "string" },
                    "phone": { "bsonType": "string" },
                    "email": { "bsonType": "string", "pattern": EMAIL_PATTERN },
                    "location": {
                        "bsonType": "object",
                        "properties": {
                            "department": { "bsonType": "string" },
                            "province": { "bsonType": "string" },
                            "district": { "bsonType": "string" },
                            "latitude": { "bsonType": "double" },
                            "longitude": { "bsonType": "double" },
                        },
                    },
                    "teacher_ids": { "bsonType": "array", "items": { "bsonType": "objectId" } },
                    "student_ids": { "bsonType": "array", "items": { "bsonType": "objectId" } },
                    "creation_date": { "bsonType": "date" },
                    "update_date": { "bsonType": "date" },
                },
            }},
        );
    }

    #[test]
    fn test_minimal_institution_accepted() {
        assert!(check(&school()).is_empty());
    }

    #[test]
    fn test_each_required_field() {
        for (field, document) in fixtures::without_each_field(&school(), &["name", "address"]) {
            assert_eq!(check(&document), vec![format!("{}: missing required field", field)]);
        }
    }

    #[test]
    fn test_location_and_members() {
        let mut institution = school();
        institution.insert(
            "location",
            doc! {
                "department": "Lima",
                "province": "Lima",
                "district": "Comas",
                "latitude": -11.9378,
                "longitude": -77.0622,
            },
        );
        institution.insert("teacher_ids", vec![ObjectId::new()]);
        institution.insert("student_ids", Vec::<ObjectId>::new());
        assert!(check(&institution).is_empty(), "{:?}", check(&institution));

        // Partial locations are fine, every part is optional
        institution.insert("location", doc! { "district": "Comas" });
        assert!(check(&institution).is_empty());
    }

    #[test]
    fn test_coordinates_must_be_doubles() {
        let mut institution = school();
        institution.insert("location", doc! { "latitude": -12 });
        assert_eq!(
            check(&institution),
            vec!["location.latitude: expected double, found int".to_string()]
        );
    }

    #[test]
    fn test_email_pattern() {
        let mut institution = school();
        institution.insert("email", "a@b.co");
        assert!(check(&institution).is_empty());

        institution.insert("email", "contacto-at-colegio.pe");
        assert_eq!(check(&institution).len(), 1);

        institution.insert("email", "a@b@colegio.pe");
        assert_eq!(check(&institution).len(), 1);
    }
}
