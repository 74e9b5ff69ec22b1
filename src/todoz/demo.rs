//! # Scripted Walkthrough
//!
//! Seeds four todo records, then exercises every store operation in sequence:
//! put each record, delete the third, fetch one live and one deleted id, list
//! everything, and run a query. Each response is rendered into the
//! [`RESPONSE_SURFACE`] and every failure is caught at its call site and
//! logged; nothing escalates past the report.

use serde::Serialize;

use crate::messages::OpMessage;
use crate::model::{TodoDraft, TodoItem};
use crate::render::{self, SurfaceRegistry, RESPONSE_SURFACE};
use crate::store::{AllDocsOptions, DocStore, QueryOptions, ViewSpec};
use crate::value::DocValue;

/// Knobs for the query step, fed from the CLI.
#[derive(Debug, Clone, Default)]
pub struct QueryTuning {
    /// Query a named field index instead of the built-in map function.
    pub by: Option<String>,
    pub key: Option<String>,
    pub prefix: Option<String>,
    pub limit: Option<usize>,
    pub descending: bool,
    pub include_docs: bool,
}

impl QueryTuning {
    /// Field index when `--by` is given, otherwise the walkthrough's map
    /// function: one `(createdAt, tags)` pair per document.
    fn view(&self) -> ViewSpec {
        match &self.by {
            Some(field) => ViewSpec::field(field.clone()),
            None => ViewSpec::map(|doc: &TodoItem, emitter| {
                emitter.emit(doc.created_at, doc.tags.clone());
            }),
        }
    }

    fn options(&self) -> QueryOptions {
        QueryOptions {
            key: self.key.as_deref().map(DocValue::from_literal),
            prefix: self.prefix.as_deref().map(DocValue::from_literal),
            limit: self.limit,
            descending: self.descending,
            include_docs: self.include_docs,
            ..QueryOptions::default()
        }
    }
}

/// Everything a run produced: the message log plus the records the list step
/// returned, for the CLI to print.
#[derive(Debug, Default)]
pub struct DemoReport {
    pub messages: Vec<OpMessage>,
    pub listed: Vec<TodoItem>,
}

impl DemoReport {
    fn log(&mut self, message: OpMessage) {
        self.messages.push(message);
    }
}

/// The four records the walkthrough inserts.
pub fn seed_items() -> Vec<TodoItem> {
    let seeds = [
        ("unique-id-1", "My first todo item", false, "first"),
        ("unique-id-2", "My second todo item", true, "second"),
        ("unique-id-3", "My third todo item", false, "third"),
        ("unique-id-4", "My fourth todo item", true, "fourth"),
    ];
    seeds
        .iter()
        .map(|(id, title, completed, tag)| {
            TodoItem::build(TodoDraft {
                id: Some((*id).to_string()),
                title: Some((*title).to_string()),
                completed: Some(*completed),
                tags: Some(vec!["example".to_string(), (*tag).to_string()]),
                ..TodoDraft::default()
            })
        })
        .collect()
}

/// Runs the full sequence against `store`, rendering responses into
/// `surfaces`. Store failures become log entries; none are rethrown.
pub fn run<S: DocStore>(
    store: &mut S,
    surfaces: &mut SurfaceRegistry,
    tuning: &QueryTuning,
) -> DemoReport {
    let mut report = DemoReport::default();

    for item in seed_items() {
        match store.put(item) {
            Ok(response) => report.log(OpMessage::success(format!(
                "Inserted document with id: {}",
                response.id
            ))),
            Err(err) => report.log(OpMessage::error(err.to_string())),
        }
    }

    match store.del("unique-id-3") {
        Ok(response) => report.log(OpMessage::success(format!(
            "Deleted document with id: {}",
            response.id
        ))),
        Err(err) => report.log(OpMessage::error(err.to_string())),
    }

    match store.get("unique-id-1") {
        Ok(doc) => render_response(
            &mut report,
            surfaces,
            "db.get() returned the following:",
            &doc,
        ),
        Err(err) => report.log(OpMessage::error(err.to_string())),
    }

    // Fetching the deleted record reports not-found and moves on.
    if let Err(err) = store.get("unique-id-3") {
        report.log(OpMessage::error(format!("Error message: {err}")));
    }

    match store.all_docs(&AllDocsOptions::default()) {
        Ok(page) => {
            report.listed = page.rows.iter().map(|row| row.doc.clone()).collect();
            render_response(
                &mut report,
                surfaces,
                "db.all_docs() returned the following:",
                &page,
            );
        }
        Err(err) => report.log(OpMessage::error(err.to_string())),
    }

    match store.query(&tuning.view(), &tuning.options()) {
        Ok(result) => render_response(&mut report, surfaces, "Query Result", &result),
        Err(err) => report.log(OpMessage::error(err.to_string())),
    }

    report
}

fn render_response<T: Serialize>(
    report: &mut DemoReport,
    surfaces: &mut SurfaceRegistry,
    caption: &str,
    value: &T,
) {
    match DocValue::from_serialize(value) {
        Ok(value) => {
            if let Some(diagnostic) =
                render::show_response_in(surfaces, RESPONSE_SURFACE, caption, &value)
            {
                report.log(diagnostic);
            }
        }
        Err(err) => report.log(OpMessage::error(format!(
            "Error serializing response: {err}"
        ))),
    }
}
