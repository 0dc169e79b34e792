//! Record parsers: turn fetched bytes into a lazy stream of catalog entities.
//!
//! A parser never fails as a whole. A candidate that cannot become an entity
//! surfaces as [`ParsedRecord::Invalid`] and parsing carries on; an `Err` item
//! means the document cannot be read any further and is always the last item.

mod json;

use catalogbridge_shared::{BridgeError, Entity, LocationSpec, Result};
use futures::stream::BoxStream;

pub use json::JsonEntityParser;

/// Everything a parser needs to know about one fetched document.
#[derive(Debug, Clone)]
pub struct ParserInput {
    /// Raw document bytes.
    pub data: Vec<u8>,
    /// Where the bytes came from.
    pub location: LocationSpec,
}

/// One item produced by a parser.
#[derive(Debug)]
pub enum ParsedRecord {
    /// A well-formed entity.
    Entity(Entity),
    /// A candidate that failed validation. Later records are unaffected.
    Invalid(BridgeError),
}

impl From<Result<Entity>> for ParsedRecord {
    fn from(result: Result<Entity>) -> Self {
        match result {
            Ok(entity) => Self::Entity(entity),
            Err(e) => Self::Invalid(e),
        }
    }
}

/// Lazy, finite sequence of parsed records. An `Err` item ends the sequence.
pub type RecordStream<'a> = BoxStream<'a, Result<ParsedRecord>>;

/// Produces entities from raw content.
pub trait RecordParser: Send + Sync {
    /// Start parsing `input`. Records are produced as the stream is polled.
    fn parse(&self, input: ParserInput) -> RecordStream<'_>;
}
