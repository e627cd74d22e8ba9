//! BSON type aliases understood by `$jsonSchema`
//!
//! Only the aliases the collection schemas use are modelled. Matching is
//! exact: `int` accepts 32-bit integers only, `double` accepts doubles only,
//! mirroring the engine's own `bsonType` checks.

use mongodb::bson::Bson;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BsonType {
    String,
    Object,
    Array,
    ObjectId,
    Date,
    Int,
    Double,
    BinData,
}

impl BsonType {
    /// The `bsonType` alias written into validator documents
    pub fn alias(&self) -> &'static str {
        match self {
            BsonType::String => "string",
            BsonType::Object => "object",
            BsonType::Array => "array",
            BsonType::ObjectId => "objectId",
            BsonType::Date => "date",
            BsonType::Int => "int",
            BsonType::Double => "double",
            BsonType::BinData => "binData",
        }
    }

    pub fn matches(&self, value: &Bson) -> bool {
        matches!(
            (self, value),
            (BsonType::String, Bson::String(_))
                | (BsonType::Object, Bson::Document(_))
                | (BsonType::Array, Bson::Array(_))
                | (BsonType::ObjectId, Bson::ObjectId(_))
                | (BsonType::Date, Bson::DateTime(_))
                | (BsonType::Int, Bson::Int32(_))
                | (BsonType::Double, Bson::Double(_))
                | (BsonType::BinData, Bson::Binary(_))
        )
    }

    /// Alias of the type a value actually carries, for violation messages
    pub fn alias_of(value: &Bson) -> &'static str {
        match value {
            Bson::Double(_) => "double",
            Bson::String(_) => "string",
            Bson::Array(_) => "array",
            Bson::Document(_) => "object",
            Bson::Boolean(_) => "bool",
            Bson::Null => "null",
            Bson::Int32(_) => "int",
            Bson::Int64(_) => "long",
            Bson::Binary(_) => "binData",
            Bson::ObjectId(_) => "objectId",
            Bson::DateTime(_) => "date",
            Bson::Decimal128(_) => "decimal",
            Bson::Timestamp(_) => "timestamp",
            Bson::RegularExpression(_) => "regex",
            _ => "other",
        }
    }
}

impl fmt::Display for BsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.alias())
    }
}
