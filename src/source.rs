//! Record sources: the seam between the evaluator and the engine that
//! actually produces rows.
//!
//! The evaluator never performs I/O; a source only promises ordered record
//! iteration and, optionally, a schema snapshot used to enrich diagnostics.

use crate::error::QualityError;
use crate::record::{records_from_json, Record};
use crate::schema::StructType;

/// An ordered batch of structured records produced by an external engine.
pub trait RecordSource {
    /// Schema snapshot, if the source knows one. Used only for descriptive
    /// error messages, never for enforcement.
    fn schema(&self) -> Option<StructType> {
        None
    }

    /// Ordered iteration over the records.
    fn records(&self) -> Box<dyn Iterator<Item = Record> + '_>;
}

/// In-memory record source.
#[derive(Debug, Clone, Default)]
pub struct Rows {
    schema: Option<StructType>,
    rows: Vec<Record>,
}

impl Rows {
    pub fn new(rows: Vec<Record>) -> Self {
        Rows { schema: None, rows }
    }

    /// Parse a JSON array of objects into a source.
    pub fn from_json(text: &str) -> Result<Self, QualityError> {
        Ok(Rows::new(records_from_json(text)?))
    }

    /// Attach a schema snapshot for richer diagnostics.
    pub fn with_schema(mut self, schema: StructType) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RecordSource for Rows {
    fn schema(&self) -> Option<StructType> {
        self.schema.clone()
    }

    fn records(&self) -> Box<dyn Iterator<Item = Record> + '_> {
        Box::new(self.rows.iter().cloned())
    }
}
