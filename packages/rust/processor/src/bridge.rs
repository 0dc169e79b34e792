//! Reader processor for catalog bridge locations.
//!
//! Claims locations of one type, reads the target through a [`UrlReader`],
//! streams the bytes through the supplied parser, and emits every entity
//! followed by a refresh. An invalid record is reported as a general error in
//! its place and reading continues. A fetch failure, or a parser error that
//! ends the stream, is reported as a final general error with no refresh.

use std::sync::Arc;

use async_trait::async_trait;
use catalogbridge_parser::{ParsedRecord, ParserInput, RecordParser};
use catalogbridge_reader::UrlReader;
use catalogbridge_shared::{BridgeError, LocationSpec, ProcessingResult, Result};
use futures::StreamExt;
use tracing::{debug, info, instrument, warn};

use crate::{LocationProcessor, ResultSink};

/// Location type claimed by [`BridgeReaderProcessor::new`].
pub const BRIDGE_LOCATION_TYPE: &str = "catalog-bridge";

/// Upper bound on the length of emitted error messages, in characters.
pub const MAX_ERROR_MESSAGE_CHARS: usize = 5000;

/// Reads entities from a catalog bridge endpoint.
pub struct BridgeReaderProcessor {
    reader: Arc<dyn UrlReader>,
    location_type: String,
}

impl BridgeReaderProcessor {
    /// Processor for [`BRIDGE_LOCATION_TYPE`] locations.
    pub fn new(reader: Arc<dyn UrlReader>) -> Self {
        Self::with_location_type(reader, BRIDGE_LOCATION_TYPE)
    }

    /// Processor that claims a different location type.
    pub fn with_location_type(reader: Arc<dyn UrlReader>, location_type: impl Into<String>) -> Self {
        Self {
            reader,
            location_type: location_type.into(),
        }
    }

    /// Fetch, parse and emit. Returns the number of entities emitted.
    async fn ingest(
        &self,
        location: &LocationSpec,
        emit: &mut dyn ResultSink,
        parser: &dyn RecordParser,
    ) -> Result<usize> {
        let content = self.reader.read_url(&location.target).await?;

        let origin = LocationSpec::new(location.location_type.clone(), content.url);
        let mut records = parser.parse(ParserInput {
            data: content.data,
            location: origin.clone(),
        });

        let mut count = 0;
        while let Some(record) = records.next().await {
            match record? {
                ParsedRecord::Entity(entity) => {
                    debug!(kind = %entity.kind, name = %entity.metadata.name, "emitting entity");
                    emit.emit(ProcessingResult::entity(origin.clone(), entity));
                    count += 1;
                }
                ParsedRecord::Invalid(e) => {
                    warn!(error = %e, "skipping invalid record");
                    emit.emit(ProcessingResult::general_error(
                        location.clone(),
                        read_failure_message(location, &e),
                    ));
                }
            }
        }
        Ok(count)
    }
}

#[async_trait]
impl LocationProcessor for BridgeReaderProcessor {
    fn name(&self) -> &str {
        "BridgeReaderProcessor"
    }

    fn supports_location_type(&self, location_type: &str) -> bool {
        location_type == self.location_type
    }

    #[instrument(skip_all, fields(location = %location))]
    async fn read_location(
        &self,
        location: &LocationSpec,
        _optional: bool,
        emit: &mut dyn ResultSink,
        parser: &dyn RecordParser,
    ) -> bool {
        if !self.supports_location_type(&location.location_type) {
            return false;
        }

        // TODO: once the catalog owners sign off, skip the error emission for
        // optional locations whose target is not found.
        match self.ingest(location, emit, parser).await {
            Ok(count) => {
                emit.emit(ProcessingResult::refresh(location.refresh_key()));
                info!(entities = count, "location read");
            }
            Err(e) => {
                warn!(error = %e, not_found = e.is_not_found(), "location read failed");
                emit.emit(ProcessingResult::general_error(
                    location.clone(),
                    read_failure_message(location, &e),
                ));
            }
        }

        true
    }
}

/// `"Unable to read {type}, {error}"`, capped at [`MAX_ERROR_MESSAGE_CHARS`].
pub fn read_failure_message(location: &LocationSpec, error: &BridgeError) -> String {
    let mut message = format!("Unable to read {}, {error}", location.location_type);
    if let Some((cut, _)) = message.char_indices().nth(MAX_ERROR_MESSAGE_CHARS) {
        message.truncate(cut);
    }
    message
}
