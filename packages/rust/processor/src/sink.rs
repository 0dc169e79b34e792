//! Result sinks: where processors send their emissions.

use catalogbridge_shared::ProcessingResult;
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

/// Accepts emissions from a processor.
///
/// Emitting never fails from the processor's point of view; a sink that
/// cannot deliver a result deals with that itself.
pub trait ResultSink: Send {
    fn emit(&mut self, result: ProcessingResult);
}

/// Collects emissions in order.
impl ResultSink for Vec<ProcessingResult> {
    fn emit(&mut self, result: ProcessingResult) {
        self.push(result);
    }
}

/// Hands emissions to a concurrently running consumer.
impl ResultSink for UnboundedSender<ProcessingResult> {
    fn emit(&mut self, result: ProcessingResult) {
        if self.send(result).is_err() {
            trace!("result receiver closed, dropping emission");
        }
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F> ResultSink for FnSink<F>
where
    F: FnMut(ProcessingResult) + Send,
{
    fn emit(&mut self, result: ProcessingResult) {
        (self.0)(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_sink_forwards_in_order() {
        let (mut tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<ProcessingResult>();
        tx.emit(ProcessingResult::refresh("a:1"));
        tx.emit(ProcessingResult::refresh("a:2"));
        drop(tx);

        assert_eq!(rx.recv().await, Some(ProcessingResult::refresh("a:1")));
        assert_eq!(rx.recv().await, Some(ProcessingResult::refresh("a:2")));
        assert_eq!(rx.recv().await, None);
    }

    #[test]
    fn channel_sink_tolerates_closed_receiver() {
        let (mut tx, rx) = tokio::sync::mpsc::unbounded_channel::<ProcessingResult>();
        drop(rx);
        tx.emit(ProcessingResult::refresh("a:1"));
    }

    #[test]
    fn fn_sink_calls_closure() {
        let mut count = 0;
        {
            let mut sink = FnSink(|_: ProcessingResult| count += 1);
            sink.emit(ProcessingResult::refresh("a:1"));
            sink.emit(ProcessingResult::refresh("a:2"));
        }
        assert_eq!(count, 2);
    }
}
