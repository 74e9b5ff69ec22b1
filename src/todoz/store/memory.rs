use std::cmp::Ordering;
use std::collections::BTreeMap;

use uuid::Uuid;

use super::{
    AllDocsOptions, AllDocsPage, AllDocsRow, DeleteResponse, DocStore, Emitter, PutResponse,
    QueryOptions, QueryResult, QueryRow, ViewSpec,
};
use crate::error::{Result, TodozError};
use crate::model::TodoItem;
use crate::value::DocValue;

/// In-memory store double for the demo and tests.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    docs: BTreeMap<String, TodoItem>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn eval_view(view: &ViewSpec, doc: &TodoItem) -> Result<Vec<(DocValue, DocValue)>> {
        match view {
            ViewSpec::Field(name) => {
                let fields = DocValue::from_serialize(doc)?;
                Ok(match fields.field(name) {
                    Some(key) => vec![(key, DocValue::Null)],
                    None => Vec::new(),
                })
            }
            ViewSpec::Map(map) => {
                let mut emitter = Emitter::default();
                map(doc, &mut emitter);
                Ok(emitter.into_pairs())
            }
        }
    }
}

fn key_matches(options: &QueryOptions, key: &DocValue) -> bool {
    if let Some(wanted) = &options.key {
        if key.collate(wanted) != Ordering::Equal {
            return false;
        }
    }
    if let Some(any_of) = &options.keys {
        if !any_of.iter().any(|k| key.collate(k) == Ordering::Equal) {
            return false;
        }
    }
    if let Some((start, end)) = &options.range {
        if key.collate(start) == Ordering::Less || key.collate(end) == Ordering::Greater {
            return false;
        }
    }
    if let Some(prefix) = &options.prefix {
        if !key.starts_with(prefix) {
            return false;
        }
    }
    true
}

impl DocStore for InMemoryStore {
    fn put(&mut self, mut doc: TodoItem) -> Result<PutResponse> {
        if doc.id.is_empty() {
            doc.id = Uuid::new_v4().to_string();
        }
        let id = doc.id.clone();
        self.docs.insert(id.clone(), doc);
        Ok(PutResponse { id })
    }

    fn del(&mut self, id: &str) -> Result<DeleteResponse> {
        if self.docs.remove(id).is_none() {
            return Err(TodozError::NotFound(id.to_string()));
        }
        Ok(DeleteResponse { id: id.to_string() })
    }

    fn get(&self, id: &str) -> Result<TodoItem> {
        self.docs
            .get(id)
            .cloned()
            .ok_or_else(|| TodozError::NotFound(id.to_string()))
    }

    fn all_docs(&self, options: &AllDocsOptions) -> Result<AllDocsPage> {
        let mut rows: Vec<AllDocsRow> = self
            .docs
            .values()
            .filter(|doc| options.key.as_deref().map_or(true, |key| doc.id == key))
            .map(|doc| AllDocsRow {
                id: doc.id.clone(),
                doc: doc.clone(),
            })
            .collect();
        if let Some(limit) = options.limit {
            rows.truncate(limit);
        }
        Ok(AllDocsPage { rows })
    }

    fn query(&self, view: &ViewSpec, options: &QueryOptions) -> Result<QueryResult> {
        let mut rows = Vec::new();
        for doc in self.docs.values() {
            for (key, value) in Self::eval_view(view, doc)? {
                if !key_matches(options, &key) {
                    continue;
                }
                rows.push(QueryRow {
                    key,
                    value,
                    id: doc.id.clone(),
                    doc: options.include_docs.then(|| doc.clone()),
                });
            }
        }
        rows.sort_by(|a, b| a.key.collate(&b.key).then_with(|| a.id.cmp(&b.id)));
        if options.descending {
            rows.reverse();
        }
        if let Some(limit) = options.limit {
            rows.truncate(limit);
        }
        Ok(QueryResult { rows })
    }
}

// --- Test Fixtures ---

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use crate::model::TodoDraft;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_todo(mut self, id: &str, title: &str, completed: bool, tags: &[&str]) -> Self {
            let doc = TodoItem::build(TodoDraft {
                id: Some(id.to_string()),
                title: Some(title.to_string()),
                completed: Some(completed),
                tags: Some(tags.iter().map(|tag| tag.to_string()).collect()),
                ..TodoDraft::default()
            });
            self.store.put(doc).unwrap();
            self
        }
    }
}
