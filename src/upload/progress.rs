//! Upload progress observation.
//!
//! The archive is sent as a chunked body stream; the transport pulls the
//! next chunk only once it has accepted the previous one, so progress is
//! derived from bytes actually handed off, and 100 is reported only on the
//! poll after the final chunk, not when the body is merely enqueued.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use futures::Stream;

/// Integer-percent progress callback, invoked with values in `[0, 100]`.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// A callback that drops progress on the floor.
pub fn noop_progress() -> ProgressFn {
    Arc::new(|_| {})
}

pub(crate) const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

/// Turns byte counts into monotone percent callbacks. Re-reports of the
/// same or a lower percentage are suppressed, so observers only ever see a
/// strictly increasing sequence ending at 100.
pub struct ProgressReporter {
    last: AtomicU8,
    sink: ProgressFn,
}

impl ProgressReporter {
    pub fn new(sink: ProgressFn) -> Self {
        Self {
            last: AtomicU8::new(0),
            sink,
        }
    }

    pub fn report(&self, sent: u64, total: u64) {
        let percent = if total == 0 {
            100
        } else {
            ((sent.min(total) * 100) / total) as u8
        };
        let last = self.last.load(Ordering::Relaxed);
        if percent > last {
            self.last.store(percent, Ordering::Relaxed);
            (self.sink)(percent);
        }
    }
}

/// Chunked body stream over the archive bytes. Each poll first reports the
/// bytes already consumed by the transport, then yields the next chunk;
/// the final poll reports 100 and ends the stream.
pub(crate) fn progress_stream(
    data: Vec<u8>,
    reporter: ProgressReporter,
) -> impl Stream<Item = Result<Vec<u8>, std::io::Error>> + Send {
    let total = data.len() as u64;
    futures::stream::unfold(
        (data, 0usize, reporter),
        move |(data, offset, reporter)| async move {
            if offset > 0 || data.is_empty() {
                reporter.report(offset as u64, total);
            }
            if offset >= data.len() {
                return None;
            }
            let end = (offset + UPLOAD_CHUNK_BYTES).min(data.len());
            let chunk = data[offset..end].to_vec();
            Some((Ok(chunk), (data, end, reporter)))
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::sync::Mutex;

    fn recording_sink() -> (ProgressFn, Arc<Mutex<Vec<u8>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink_seen = Arc::clone(&seen);
        let sink: ProgressFn = Arc::new(move |pct| sink_seen.lock().unwrap().push(pct));
        (sink, seen)
    }

    async fn drain(data: Vec<u8>) -> Vec<u8> {
        let (sink, seen) = recording_sink();
        let stream = progress_stream(data, ProgressReporter::new(sink));
        futures::pin_mut!(stream);
        while let Some(chunk) = stream.next().await {
            chunk.unwrap();
        }
        let seen = seen.lock().unwrap().clone();
        seen
    }

    #[tokio::test]
    async fn test_progress_is_strictly_increasing_and_ends_at_100() {
        let seen = drain(vec![0u8; UPLOAD_CHUNK_BYTES * 5 + 17]).await;
        assert!(!seen.is_empty());
        assert!(seen.windows(2).all(|w| w[0] < w[1]), "not increasing: {seen:?}");
        assert_eq!(*seen.last().unwrap(), 100);
    }

    #[tokio::test]
    async fn test_100_is_reported_only_after_the_last_chunk() {
        let data = vec![0u8; UPLOAD_CHUNK_BYTES * 3];
        let (sink, seen) = recording_sink();
        let stream = progress_stream(data, ProgressReporter::new(sink));
        futures::pin_mut!(stream);

        // Pull every chunk; while any chunk remains un-consumed the
        // reporter must stay below 100.
        let mut chunks = 0;
        while let Some(chunk) = stream.next().await {
            chunk.unwrap();
            chunks += 1;
            if chunks < 3 {
                assert!(seen.lock().unwrap().iter().all(|&p| p < 100));
            }
        }
        assert_eq!(chunks, 3);
        assert_eq!(*seen.lock().unwrap().last().unwrap(), 100);
    }

    #[tokio::test]
    async fn test_small_payload_reports_exactly_once() {
        let seen = drain(vec![0u8; 10]).await;
        assert_eq!(seen, vec![100]);
    }

    #[tokio::test]
    async fn test_empty_payload_still_completes() {
        let seen = drain(Vec::new()).await;
        assert_eq!(seen, vec![100]);
    }

    #[test]
    fn test_reporter_suppresses_regressions() {
        let (sink, seen) = recording_sink();
        let reporter = ProgressReporter::new(sink);
        reporter.report(50, 100);
        reporter.report(40, 100);
        reporter.report(50, 100);
        reporter.report(60, 100);
        assert_eq!(*seen.lock().unwrap(), vec![50, 60]);
    }

    #[test]
    fn test_reporter_clamps_overshoot() {
        let (sink, seen) = recording_sink();
        let reporter = ProgressReporter::new(sink);
        reporter.report(250, 100);
        assert_eq!(*seen.lock().unwrap(), vec![100]);
    }
}
