//! # Store Contract
//!
//! This module defines the document-store abstraction. The [`DocStore`] trait
//! is the fixed contract the driver programs against; the store's actual
//! semantics (durability, indexing, replication, conflict handling) belong to
//! whichever implementation sits behind it and are out of scope here.
//!
//! ## Implementations
//!
//! - [`memory::InMemoryStore`]: in-memory double for the scripted demo and
//!   for tests. No persistence, no indexes.
//!
//! ## Views
//!
//! [`DocStore::query`] rows come from a [`ViewSpec`]: either a named field
//! index (the row key is that field's value) or a map function run against
//! every document, emitting zero or more `(key, value)` pairs through an
//! [`Emitter`]. Keys collate null < bool < number < string < list < map.

use serde::Serialize;

use crate::error::Result;
use crate::model::TodoItem;
use crate::value::DocValue;

pub mod memory;

/// Response to a successful [`DocStore::put`]; carries the assigned id.
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    pub id: String,
}

/// Response to a successful [`DocStore::del`].
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub id: String,
}

/// Options for [`DocStore::all_docs`].
#[derive(Debug, Clone, Default)]
pub struct AllDocsOptions {
    /// Only return the row whose document id equals this key.
    pub key: Option<String>,
    /// Maximum number of rows.
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllDocsRow {
    pub id: String,
    pub doc: TodoItem,
}

/// One page of records, in id order.
#[derive(Debug, Clone, Serialize)]
pub struct AllDocsPage {
    pub rows: Vec<AllDocsRow>,
}

/// Collects the `(key, value)` pairs a map function emits for one document.
#[derive(Debug, Default)]
pub struct Emitter {
    pairs: Vec<(DocValue, DocValue)>,
}

impl Emitter {
    pub fn emit(&mut self, key: impl Into<DocValue>, value: impl Into<DocValue>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn into_pairs(self) -> Vec<(DocValue, DocValue)> {
        self.pairs
    }
}

/// How query rows are produced.
pub enum ViewSpec {
    /// Index on a serialized document field; rows get `(field value, null)`.
    Field(String),
    /// Map function run against every document.
    Map(Box<dyn Fn(&TodoItem, &mut Emitter)>),
}

impl ViewSpec {
    pub fn field(name: impl Into<String>) -> Self {
        ViewSpec::Field(name.into())
    }

    pub fn map(f: impl Fn(&TodoItem, &mut Emitter) + 'static) -> Self {
        ViewSpec::Map(Box::new(f))
    }
}

/// Options for [`DocStore::query`]. Filters compose; `limit` applies after
/// sorting.
#[derive(Debug, Default)]
pub struct QueryOptions {
    /// Only rows whose key collates equal to this value.
    pub key: Option<DocValue>,
    /// Only rows whose key matches one of these values.
    pub keys: Option<Vec<DocValue>>,
    /// Inclusive key range.
    pub range: Option<(DocValue, DocValue)>,
    /// Only rows whose key starts with this value (string or list keys).
    pub prefix: Option<DocValue>,
    /// Maximum number of rows.
    pub limit: Option<usize>,
    /// Sort by descending key order instead of ascending.
    pub descending: bool,
    /// Attach the full document to each row.
    pub include_docs: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryRow {
    pub key: DocValue,
    pub value: DocValue,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<TodoItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub rows: Vec<QueryRow>,
}

/// Abstract interface to the document store.
pub trait DocStore {
    /// Insert or replace a document. An empty id gets a fresh one assigned.
    fn put(&mut self, doc: TodoItem) -> Result<PutResponse>;

    /// Remove the document with this id.
    fn del(&mut self, id: &str) -> Result<DeleteResponse>;

    /// Fetch a document by id; absent or deleted ids report not-found.
    fn get(&self, id: &str) -> Result<TodoItem>;

    /// List documents in id order.
    fn all_docs(&self, options: &AllDocsOptions) -> Result<AllDocsPage>;

    /// Run a view over every document and return the matching rows.
    fn query(&self, view: &ViewSpec, options: &QueryOptions) -> Result<QueryResult>;
}
