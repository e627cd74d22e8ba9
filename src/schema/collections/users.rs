use super::{email, reference, references, with_timestamps};
use crate::schema::shape::{CollectionSchema, Constraint, ObjectShape};

pub const ROLES: &[&str] = &["teacher", "student", "parent"];
pub const GENDERS: &[&str] = &["male", "female", "other"];

/// Teachers, students and parents
pub fn users() -> CollectionSchema {
    let name = ObjectShape::new()
        .required("first_name", Constraint::string())
        .optional("middle_name", Constraint::string())
        .required("paternal_last_name", Constraint::string())
        .required("maternal_last_name", Constraint::string());

    let shape = ObjectShape::new()
        .required("name", Constraint::object(name))
        .required("email", email())
        // Stored as given; hashing belongs to the application
        .required("password", Constraint::string())
        .required("role", Constraint::one_of(ROLES))
        .optional("birth_date", Constraint::date())
        .optional("gender", Constraint::one_of(GENDERS))
        .optional("address", Constraint::string())
        .optional("phone", Constraint::string())
        .optional("educational_institution_id", reference())
        .optional("class_ids", references());

    CollectionSchema::new("users", with_timestamps(shape))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::collections::{fixtures, EMAIL_PATTERN};
    use crate::schema::{DocumentValidator, ViolationKind};
    use mongodb::bson::oid::ObjectId;
    use mongodb::bson::{doc, DateTime, Document};

    fn ana() -> Document {
        doc! {
            "name": {
                "first_name": "Ana",
                "paternal_last_name": "Lopez",
                "maternal_last_name": "Diaz",
            },
            "email": "ana@x.com",
            "password": "h",
            "role": "student",
        }
    }

    fn check(document: &Document) -> Vec<String> {
        DocumentValidator::validate(&users(), document).messages()
    }

    #[test]
    fn test_rendered_validator() {
        fixtures::assert_same_validator(
            users().validator(),
            doc! { "$jsonSchema": {
                "bsonType": "object",
                "required": ["name", "email", "password", "role"],
                "properties": {
                    "name": {
                        "bsonType": "object",
                        "required": ["first_name", "paternal_last_name", "maternal_last_name"],
                        "properties": {
                            "first_name": { "bsonType": "string" },
                            "middle_name": { "bsonType": "string" },
                            "paternal_last_name": { "bsonType": "string" },
                            "maternal_last_name": { "bsonType": "string" },
                        },
                    },
                    "email": { "bsonType": "string", "pattern": EMAIL_PATTERN },
                    "password": { "bsonType": "string" },
                    "role": { "enum": ["teacher", "student", "parent"] },
                    "birth_date": { "bsonType": "date" },
                    "gender": { "enum": ["male", "female", "other"] },
                    "address": { "bsonType": "string" },
                    "phone": { "bsonType": "string" },
                    "educational_institution_id": { "bsonType": "objectId" },
                    "class_ids": { "bsonType": "array", "items": { "bsonType": "objectId" } },
                    "creation_date": { "bsonType": "date" },
                    "update_date": { "bsonType": "date" },
                },
            }},
        );
    }

    #[test]
    fn test_minimal_user_accepted() {
        assert!(check(&ana()).is_empty());
    }

    #[test]
    fn test_full_user_accepted() {
        let mut user = ana();
        user.insert(
            "name",
            doc! {
                "first_name": "Ana",
                "middle_name": "Maria",
                "paternal_last_name": "Lopez",
                "maternal_last_name": "Diaz",
            },
        );
        user.insert("birth_date", DateTime::now());
        user.insert("gender", "female");
        user.insert("address", "Av. Grau 123");
        user.insert("phone", "+51 999 888 777");
        user.insert("educational_institution_id", ObjectId::new());
        user.insert("class_ids", vec![ObjectId::new(), ObjectId::new()]);
        user.insert("creation_date", DateTime::now());
        user.insert("update_date", DateTime::now());
        user.insert("nickname", "ani");

        assert!(check(&user).is_empty(), "{:?}", check(&user));
    }

    #[test]
    fn test_each_required_field() {
        for (field, document) in
            fixtures::without_each_field(&ana(), &["name", "email", "password", "role"])
        {
            assert_eq!(check(&document), vec![format!("{}: missing required field", field)]);
        }
    }

    #[test]
    fn test_each_required_name_part() {
        for part in ["first_name", "paternal_last_name", "maternal_last_name"] {
            let mut user = ana();
            user.get_document_mut("name").unwrap().remove(part);
            assert_eq!(
                check(&user),
                vec![format!("name.{}: missing required field", part)]
            );
        }
    }

    #[test]
    fn test_role_enum() {
        for role in ROLES {
            let mut user = ana();
            user.insert("role", *role);
            assert!(check(&user).is_empty(), "{} rejected", role);
        }

        for role in ["admin", "Teacher", ""] {
            let mut user = ana();
            user.insert("role", role);
            let report = DocumentValidator::validate(&users(), &user);
            assert!(matches!(
                report.violations.as_slice(),
                [v] if v.path == "role" && matches!(v.kind, ViolationKind::NotInEnum { .. })
            ));
        }
    }

    #[test]
    fn test_gender_enum() {
        let mut user = ana();
        user.insert("gender", "other");
        assert!(check(&user).is_empty());

        user.insert("gender", "unknown");
        assert_eq!(check(&user).len(), 1);
    }

    #[test]
    fn test_email_pattern() {
        let mut user = ana();
        user.insert("email", "a@b.co");
        assert!(check(&user).is_empty());

        for bad in ["ana.x.com", "ana@x@y.com", "ana@localhost", "@x.com"] {
            user.insert("email", bad);
            assert_eq!(check(&user).len(), 1, "{} accepted", bad);
        }
    }

    #[test]
    fn test_references_are_object_ids() {
        let mut user = ana();
        user.insert("educational_institution_id", "inst-1");
        assert_eq!(
            check(&user),
            vec!["educational_institution_id: expected objectId, found string".to_string()]
        );

        let mut user = ana();
        user.insert("class_ids", vec![ObjectId::new().to_hex()]);
        assert_eq!(
            check(&user),
            vec!["class_ids.0: expected objectId, found string".to_string()]
        );
    }

    #[test]
    fn test_birth_date_must_be_date() {
        let mut user = ana();
        user.insert("birth_date", "2010-04-12");
        assert_eq!(check(&user).len(), 1);
    }
}
