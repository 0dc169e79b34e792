//! JSON entity parser.
//!
//! Accepts one or more concatenated JSON documents. A top-level array is
//! flattened into its elements; a top-level object is a single entity.
//!
//! Laziness is per document: each pull deserializes at most one top-level
//! document. A top-level array is therefore buffered whole on the pull that
//! reaches it, and its elements are then validated one per pull. Sources that
//! want bounded memory should send concatenated objects instead of one array.
//!
//! An element that fails validation yields [`ParsedRecord::Invalid`] and the
//! stream continues. A syntax error yields `Err` and ends the stream.

use std::collections::VecDeque;

use catalogbridge_shared::{BridgeError, Entity, LocationSpec, Result};
use futures::stream;
use serde_json::{Deserializer, Value};
use tracing::{debug, trace};

use crate::{ParsedRecord, ParserInput, RecordParser, RecordStream};

/// Parses JSON entity documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEntityParser;

impl RecordParser for JsonEntityParser {
    fn parse(&self, input: ParserInput) -> RecordStream<'_> {
        debug!(location = %input.location, bytes = input.data.len(), "parsing JSON entities");
        let mut cursor = DocumentCursor::new(input);
        Box::pin(stream::iter(std::iter::from_fn(move || cursor.next_record())))
    }
}

/// Walks a buffer of concatenated JSON documents.
struct DocumentCursor {
    data: Vec<u8>,
    offset: usize,
    pending: VecDeque<Value>,
    location: LocationSpec,
    done: bool,
}

impl DocumentCursor {
    fn new(input: ParserInput) -> Self {
        Self {
            data: input.data,
            offset: 0,
            pending: VecDeque::new(),
            location: input.location,
            done: false,
        }
    }

    fn next_record(&mut self) -> Option<Result<ParsedRecord>> {
        loop {
            if let Some(value) = self.pending.pop_front() {
                return Some(Ok(entity_from_value(value, &self.location).into()));
            }
            if self.done {
                return None;
            }

            let mut documents =
                Deserializer::from_slice(&self.data[self.offset..]).into_iter::<Value>();
            match documents.next() {
                None => self.done = true,
                Some(Err(e)) => {
                    // Cannot resync after a syntax error
                    self.done = true;
                    return Some(Err(BridgeError::parse(format!(
                        "malformed JSON in {}: {e}",
                        self.location.target
                    ))));
                }
                Some(Ok(value)) => {
                    self.offset += documents.byte_offset();
                    trace!(offset = self.offset, "document read");
                    match value {
                        Value::Array(items) => self.pending.extend(items),
                        other => self.pending.push_back(other),
                    }
                }
            }
        }
    }
}

/// Validate a JSON value and turn it into an [`Entity`].
fn entity_from_value(value: Value, location: &LocationSpec) -> Result<Entity> {
    if !value.is_object() {
        return Err(BridgeError::parse(format!(
            "expected an entity object in {}, found {}",
            location.target,
            json_type(&value)
        )));
    }

    let entity: Entity = serde_json::from_value(value)
        .map_err(|e| BridgeError::parse(format!("invalid entity in {}: {e}", location.target)))?;

    if entity.api_version.trim().is_empty() {
        return Err(BridgeError::parse(format!(
            "entity in {} has an empty apiVersion",
            location.target
        )));
    }
    if entity.kind.trim().is_empty() {
        return Err(BridgeError::parse(format!(
            "entity in {} has an empty kind",
            location.target
        )));
    }
    if entity.metadata.name.trim().is_empty() {
        return Err(BridgeError::parse(format!(
            "{} entity in {} has an empty metadata.name",
            entity.kind, location.target
        )));
    }

    Ok(entity)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn input(body: &str) -> ParserInput {
        ParserInput {
            data: body.as_bytes().to_vec(),
            location: LocationSpec::new("catalog-bridge", "http://bridge/entities"),
        }
    }

    async fn collect(body: &str) -> Vec<Result<ParsedRecord>> {
        JsonEntityParser.parse(input(body)).collect().await
    }

    fn component(name: &str) -> String {
        format!(
            r#"{{"apiVersion":"backstage.io/v1alpha1","kind":"Component","metadata":{{"name":"{name}"}}}}"#
        )
    }

    fn name_of(record: &Result<ParsedRecord>) -> &str {
        match record {
            Ok(ParsedRecord::Entity(entity)) => &entity.metadata.name,
            other => panic!("expected entity, got {other:?}"),
        }
    }

    fn invalid_message(record: &Result<ParsedRecord>) -> String {
        match record {
            Ok(ParsedRecord::Invalid(e)) => e.to_string(),
            other => panic!("expected invalid record, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn parses_array_in_order() {
        let body = format!("[{},{},{}]", component("a"), component("b"), component("c"));
        let records = collect(&body).await;
        let names: Vec<&str> = records.iter().map(name_of).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn parses_concatenated_documents() {
        let body = format!("{}\n{}\n[{}]", component("a"), component("b"), component("c"));
        let records = collect(&body).await;
        let names: Vec<&str> = records.iter().map(name_of).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn empty_input_yields_nothing() {
        assert!(collect("").await.is_empty());
        assert!(collect("  \n ").await.is_empty());
        assert!(collect("[]").await.is_empty());
    }

    #[tokio::test]
    async fn invalid_entity_does_not_stop_the_stream() {
        let body = format!(
            r#"[{}, {{"kind":"Component"}}, 42, {}]"#,
            component("a"),
            component("b")
        );
        let records = collect(&body).await;
        assert_eq!(records.len(), 4);
        assert_eq!(name_of(&records[0]), "a");
        assert!(invalid_message(&records[1]).starts_with("ParseError: invalid entity"));
        assert!(invalid_message(&records[2]).contains("found a number"));
        assert_eq!(name_of(&records[3]), "b");
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let body = r#"{"apiVersion":"v1","kind":"Component","metadata":{"name":"  "}}"#;
        let records = collect(body).await;
        assert!(invalid_message(&records[0]).contains("empty metadata.name"));
    }

    #[tokio::test]
    async fn malformed_json_ends_stream() {
        let body = format!("{} {{ not json", component("a"));
        let records = collect(&body).await;
        assert_eq!(records.len(), 2);
        assert_eq!(name_of(&records[0]), "a");
        assert!(
            records[1]
                .as_ref()
                .unwrap_err()
                .to_string()
                .contains("malformed JSON")
        );
    }

    #[tokio::test]
    async fn documents_are_pulled_lazily() {
        let body = format!("{} {{ not json", component("a"));
        let mut stream = JsonEntityParser.parse(input(&body));
        let first = stream.next().await.unwrap();
        assert_eq!(name_of(&first), "a");
        // The malformed tail is only reached on the next pull.
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn cursor_buffers_one_array_per_pull() {
        let body = format!("[{},{}] [{}]", component("a"), component("b"), component("c"));
        let mut cursor = DocumentCursor::new(input(&body));

        assert_eq!(name_of(&cursor.next_record().unwrap()), "a");
        // The first array is buffered; the second document is not read yet.
        assert_eq!(cursor.pending.len(), 1);
        assert!(cursor.offset < body.len());

        assert_eq!(name_of(&cursor.next_record().unwrap()), "b");
        assert_eq!(name_of(&cursor.next_record().unwrap()), "c");
        assert!(cursor.next_record().is_none());
    }
}
