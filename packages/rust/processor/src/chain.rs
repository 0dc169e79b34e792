//! Ordered processor chain.

use std::sync::Arc;

use catalogbridge_parser::RecordParser;
use catalogbridge_reader::UrlReader;
use catalogbridge_shared::LocationSpec;
use tracing::{debug, instrument};

use crate::{BridgeReaderProcessor, LocationProcessor, ResultSink};

/// Holds registered processors in priority order.
pub struct ProcessorChain {
    processors: Vec<Box<dyn LocationProcessor>>,
}

impl ProcessorChain {
    /// An empty chain that claims nothing.
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    /// A chain with all built-in processors, reading through `reader`.
    pub fn with_builtin(reader: Arc<dyn UrlReader>) -> Self {
        Self::new().register(BridgeReaderProcessor::new(reader))
    }

    /// Append a processor; earlier registrations are tried first.
    pub fn register(mut self, processor: impl LocationProcessor + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Names of the registered processors, in dispatch order.
    pub fn processor_names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// Number of registered processors.
    pub fn len(&self) -> usize {
        self.processors.len()
    }

    /// Whether no processor is registered.
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Offer `location` to each processor in turn.
    ///
    /// Returns `true` once a processor claims it, `false` if none does.
    #[instrument(skip_all, fields(location = %location))]
    pub async fn read_location(
        &self,
        location: &LocationSpec,
        optional: bool,
        emit: &mut dyn ResultSink,
        parser: &dyn RecordParser,
    ) -> bool {
        for processor in &self.processors {
            if processor.read_location(location, optional, emit, parser).await {
                debug!(processor = processor.name(), "location claimed");
                return true;
            }
        }
        debug!("no processor claimed location");
        false
    }
}

impl Default for ProcessorChain {
    fn default() -> Self {
        Self::new()
    }
}
