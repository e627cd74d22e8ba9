//! Declarative document shapes
//!
//! A collection schema is plain data: an [`ObjectShape`] maps field names to
//! [`Constraint`]s. The same declaration is rendered into the `$jsonSchema`
//! validator handed to the engine and evaluated in-process by
//! [`DocumentValidator`](super::DocumentValidator).

use super::bson_type::BsonType;
use mongodb::bson::{doc, Bson, Document};
use sha2::{Digest, Sha256};

/// Constraint on a single field value
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Value must carry the BSON type; strings may also need to match a pattern
    Typed {
        bson_type: BsonType,
        pattern: Option<&'static str>,
    },
    /// Value must be one of a closed set of strings
    Enum(&'static [&'static str]),
    /// Embedded document with its own shape
    Object(ObjectShape),
    /// Array whose every element satisfies `items`
    Array {
        items: Box<Constraint>,
        min_items: Option<u32>,
    },
}

impl Constraint {
    pub fn of_type(bson_type: BsonType) -> Self {
        Constraint::Typed {
            bson_type,
            pattern: None,
        }
    }

    pub fn string() -> Self {
        Self::of_type(BsonType::String)
    }

    pub fn matching(pattern: &'static str) -> Self {
        Constraint::Typed {
            bson_type: BsonType::String,
            pattern: Some(pattern),
        }
    }

    pub fn object_id() -> Self {
        Self::of_type(BsonType::ObjectId)
    }

    pub fn date() -> Self {
        Self::of_type(BsonType::Date)
    }

    pub fn int() -> Self {
        Self::of_type(BsonType::Int)
    }

    pub fn double() -> Self {
        Self::of_type(BsonType::Double)
    }

    pub fn bin_data() -> Self {
        Self::of_type(BsonType::BinData)
    }

    pub fn one_of(values: &'static [&'static str]) -> Self {
        Constraint::Enum(values)
    }

    pub fn object(shape: ObjectShape) -> Self {
        Constraint::Object(shape)
    }

    pub fn array_of(items: Constraint) -> Self {
        Constraint::Array {
            items: Box::new(items),
            min_items: None,
        }
    }

    pub fn non_empty_array_of(items: Constraint) -> Self {
        Constraint::Array {
            items: Box::new(items),
            min_items: Some(1),
        }
    }

    pub fn to_json_schema(&self) -> Document {
        match self {
            Constraint::Typed { bson_type, pattern } => {
                let mut rendered = doc! { "bsonType": bson_type.alias() };
                if let Some(pattern) = pattern {
                    rendered.insert("pattern", *pattern);
                }
                rendered
            }
            Constraint::Enum(values) => {
                let values: Vec<Bson> = values.iter().map(|v| Bson::String(v.to_string())).collect();
                doc! { "enum": values }
            }
            Constraint::Object(shape) => shape.to_json_schema(),
            Constraint::Array { items, min_items } => {
                let mut rendered = doc! { "bsonType": "array" };
                if let Some(min) = min_items {
                    rendered.insert("minItems", *min as i32);
                }
                rendered.insert("items", items.to_json_schema());
                rendered
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub constraint: Constraint,
    pub required: bool,
    pub description: Option<&'static str>,
}

impl FieldSpec {
    pub fn required(name: &'static str, constraint: Constraint) -> Self {
        Self {
            name,
            constraint,
            required: true,
            description: None,
        }
    }

    pub fn optional(name: &'static str, constraint: Constraint) -> Self {
        Self {
            name,
            constraint,
            required: false,
            description: None,
        }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    fn to_json_schema(&self) -> Document {
        let mut rendered = self.constraint.to_json_schema();
        if let Some(description) = self.description {
            rendered.insert("description", description);
        }
        rendered
    }
}

/// Shape of a document or embedded object.
///
/// Open shapes tolerate undeclared fields; closed shapes reject them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectShape {
    pub fields: Vec<FieldSpec>,
    pub closed: bool,
    pub description: Option<&'static str>,
}

impl ObjectShape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn required(self, name: &'static str, constraint: Constraint) -> Self {
        self.field(FieldSpec::required(name, constraint))
    }

    pub fn optional(self, name: &'static str, constraint: Constraint) -> Self {
        self.field(FieldSpec::optional(name, constraint))
    }

    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect()
    }

    pub fn to_json_schema(&self) -> Document {
        let mut rendered = doc! { "bsonType": "object" };

        // The engine rejects an empty `required` array
        let required = self.required_fields();
        if !required.is_empty() {
            rendered.insert("required", required);
        }

        let mut properties = Document::new();
        for field in &self.fields {
            properties.insert(field.name, field.to_json_schema());
        }
        rendered.insert("properties", properties);

        if self.closed {
            rendered.insert("additionalProperties", false);
        }
        if let Some(description) = self.description {
            rendered.insert("description", description);
        }

        rendered
    }
}

/// A named collection bound to its strict validator
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSchema {
    pub name: &'static str,
    pub shape: ObjectShape,
}

impl CollectionSchema {
    pub const VALIDATION_LEVEL: &'static str = "strict";
    pub const VALIDATION_ACTION: &'static str = "error";

    pub fn new(name: &'static str, shape: ObjectShape) -> Self {
        Self { name, shape }
    }

    /// The `validator` option for collection creation
    pub fn validator(&self) -> Document {
        doc! { "$jsonSchema": self.shape.to_json_schema() }
    }

    /// The full `create` command for this collection
    pub fn create_command(&self) -> Document {
        doc! {
            "create": self.name,
            "validator": self.validator(),
            "validationLevel": Self::VALIDATION_LEVEL,
            "validationAction": Self::VALIDATION_ACTION,
        }
    }

    /// SHA-256 of the validator rendered as canonical extended JSON
    pub fn checksum(&self) -> String {
        let rendered = Bson::Document(self.validator()).into_relaxed_extjson();
        compute_checksum(rendered.to_string().as_bytes())
    }
}

/// Compute SHA256 checksum of data
pub(crate) fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
