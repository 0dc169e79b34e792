//! Location processors and the chain that dispatches locations to them.
//!
//! This crate provides:
//! - [`LocationProcessor`] — the contract every processor in a chain honours
//! - [`BridgeReaderProcessor`] — reads catalog bridge locations
//! - [`ProcessorChain`] — walks registered processors in order
//! - [`ResultSink`] — where emissions go

mod bridge;
mod chain;
mod sink;

use async_trait::async_trait;
use catalogbridge_parser::RecordParser;
use catalogbridge_shared::LocationSpec;

pub use bridge::{
    BRIDGE_LOCATION_TYPE, BridgeReaderProcessor, MAX_ERROR_MESSAGE_CHARS, read_failure_message,
};
pub use chain::ProcessorChain;
pub use sink::{FnSink, ResultSink};

/// A processor that claims locations of one type and reads them into entities.
///
/// Processors are tried in registration order; the first to claim a location
/// handles it.
#[async_trait]
pub trait LocationProcessor: Send + Sync {
    /// Human-readable processor name for tracing.
    fn name(&self) -> &str;

    /// Whether this processor owns locations of `location_type`.
    fn supports_location_type(&self, location_type: &str) -> bool;

    /// Read `location`, sending every result to `emit`.
    ///
    /// Returns `false` without side effects when the location type is not
    /// supported. Otherwise returns `true`, whether or not the read succeeded:
    /// failures are reported through `emit`, never to the caller.
    async fn read_location(
        &self,
        location: &LocationSpec,
        optional: bool,
        emit: &mut dyn ResultSink,
        parser: &dyn RecordParser,
    ) -> bool;
}
