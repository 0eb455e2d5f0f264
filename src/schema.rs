//! Schema descriptor for record batches.
//!
//! The evaluator never enforces types against a schema; it is carried only
//! so diagnostics can name the fields a source actually exposes.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataType {
    String,
    Integer,
    Long,
    Double,
    Boolean,
    Date,
    Timestamp,
    Array(Box<DataType>),
    Struct(Vec<StructField>),
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::String => write!(f, "string"),
            DataType::Integer => write!(f, "int"),
            DataType::Long => write!(f, "bigint"),
            DataType::Double => write!(f, "double"),
            DataType::Boolean => write!(f, "boolean"),
            DataType::Date => write!(f, "date"),
            DataType::Timestamp => write!(f, "timestamp"),
            DataType::Array(inner) => write!(f, "array<{inner}>"),
            DataType::Struct(fields) => {
                write!(f, "struct<")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", field.name, field.data_type)?;
                }
                write!(f, ">")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl StructField {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        StructField {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructType {
    fields: Vec<StructField>,
}

impl StructType {
    pub fn new(fields: Vec<StructField>) -> Self {
        StructType { fields }
    }

    pub fn fields(&self) -> &[StructField] {
        &self.fields
    }

    /// Look up a field by exact name.
    pub fn field(&self, name: &str) -> Option<&StructField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Serialize the schema to a JSON string (array of field objects with
    /// name, data_type, nullable). Useful for hosts that need the schema
    /// without this crate's types.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize the schema to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "struct<")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", field.name, field.data_type)?;
            if !field.nullable {
                write!(f, " not null")?;
            }
        }
        write!(f, ">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders_schema() -> StructType {
        StructType::new(vec![
            StructField::new("id", DataType::Long, false),
            StructField::new("qty", DataType::Long, true),
            StructField::new("name", DataType::String, true),
        ])
    }

    #[test]
    fn test_field_lookup() {
        let schema = orders_schema();
        assert!(schema.field("qty").is_some());
        assert!(schema.field("QTY").is_none());
        assert!(schema.field("missing").is_none());
    }

    #[test]
    fn test_field_names_order() {
        assert_eq!(orders_schema().field_names(), vec!["id", "qty", "name"]);
    }

    #[test]
    fn test_display_summary() {
        let schema = orders_schema();
        assert_eq!(
            schema.to_string(),
            "struct<id: bigint not null, qty: bigint, name: string>"
        );
    }

    #[test]
    fn test_to_json_roundtrip() {
        let schema = orders_schema();
        let json = schema.to_json().unwrap();
        assert!(json.contains("\"name\":\"qty\""));
        let parsed: StructType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, schema);

        let pretty = schema.to_json_pretty().unwrap();
        assert!(pretty.contains('\n'));
    }

    #[test]
    fn test_nested_type_display() {
        let dt = DataType::Array(Box::new(DataType::Struct(vec![StructField::new(
            "score",
            DataType::Double,
            true,
        )])));
        assert_eq!(dt.to_string(), "array<struct<score: double>>");
    }
}
