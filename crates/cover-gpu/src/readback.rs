use crate::pixels::{count_from_pixels, PixelCounts};
use cover_model::CoreError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};

/// Serializes concurrent GPU buffer readbacks: `wgpu::Buffer::map_async`
/// callbacks run on the device's poll thread, so overlapping readbacks
/// against the same buffer must be ordered through one lock rather than
/// raced (spec §7 "concurrent readback safety").
#[derive(Default)]
pub struct ReadbackSerializer {
    lock: Mutex<()>,
}

impl ReadbackSerializer {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A pending pixel-count readback. Produced by a renderer after submitting
/// the render + `map_async` request; `sender`/`receiver` bridge the
/// `map_async` completion callback (which runs off the async runtime) back
/// into a future the caller can await, matching the
/// `tokio::sync::oneshot`-channel pattern used elsewhere for cross-thread
/// device handoff.
pub struct GpuReadback {
    receiver: oneshot::Receiver<Result<PixelCounts, CoreError>>,
    cancel: Option<oneshot::Sender<()>>,
}

impl GpuReadback {
    /// Constructs a readback from the sender half a renderer's `map_async`
    /// callback will resolve, and the cancellation sender that callback
    /// watches for to skip the count once the result is no longer wanted.
    pub fn new(receiver: oneshot::Receiver<Result<PixelCounts, CoreError>>, cancel: oneshot::Sender<()>) -> Self {
        Self {
            receiver,
            cancel: Some(cancel),
        }
    }

    /// Blocks the current thread until the readback completes. For callers
    /// on a synchronous path (e.g. the CLI) that can't await.
    pub fn block(self) -> Result<PixelCounts, CoreError> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|_| CoreError::ResourceUnavailable("no tokio runtime to block readback on".into()))?;
        handle.block_on(self.receiver).map_err(|_| CoreError::Cancelled)?
    }

    /// Cancels the in-flight readback. The renderer's `map_async` callback
    /// checks the cancellation channel before doing the (comparatively
    /// expensive) pixel count and skips it if cancelled.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    pub fn into_future(self) -> Pin<Box<dyn Future<Output = Result<PixelCounts, CoreError>> + Send>> {
        Box::pin(async move { self.receiver.await.map_err(|_| CoreError::Cancelled)? })
    }
}

/// Counts a mapped GPU buffer's pixels under the serializer's lock, honoring
/// cancellation. This is the body a renderer's `map_async` callback runs;
/// kept as a free function so it can be unit-tested without any actual GPU
/// buffer mapping.
pub async fn count_mapped_buffer(
    serializer: Arc<ReadbackSerializer>,
    mut cancelled: oneshot::Receiver<()>,
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    alpha_threshold: f32,
) -> Result<PixelCounts, CoreError> {
    let _guard = serializer.lock.lock().await;
    if cancelled.try_recv().is_ok() {
        return Err(CoreError::Cancelled);
    }
    Ok(count_from_pixels(&pixels, width, height, alpha_threshold))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn count_mapped_buffer_returns_counts_for_valid_buffer() {
        let serializer = Arc::new(ReadbackSerializer::new());
        let (_cancel_tx, cancel_rx) = oneshot::channel();
        let pixels = vec![255u8, 0, 0, 255];
        let result = count_mapped_buffer(serializer, cancel_rx, pixels, 1, 1, 0.75).await.unwrap();
        assert_eq!(result.red_total, 1);
        assert_eq!(result.red_blocked, 0);
    }

    #[tokio::test]
    async fn cancelled_readback_short_circuits() {
        let serializer = Arc::new(ReadbackSerializer::new());
        let (cancel_tx, cancel_rx) = oneshot::channel();
        cancel_tx.send(()).unwrap();
        let pixels = vec![255u8, 0, 0, 255];
        let result = count_mapped_buffer(serializer, cancel_rx, pixels, 1, 1, 0.75).await;
        assert!(matches!(result, Err(CoreError::Cancelled)));
    }

    #[tokio::test]
    async fn two_concurrent_readbacks_serialize_without_panicking() {
        let serializer = Arc::new(ReadbackSerializer::new());
        let (_c1, r1) = oneshot::channel();
        let (_c2, r2) = oneshot::channel();
        let first = count_mapped_buffer(Arc::clone(&serializer), r1, vec![255, 0, 0, 255], 1, 1, 0.75);
        let second = count_mapped_buffer(serializer, r2, vec![255, 0, 255, 255], 1, 1, 0.75);
        let (a, b) = tokio::join!(first, second);
        assert_eq!(a.unwrap().red_blocked, 0);
        assert_eq!(b.unwrap().red_blocked, 1);
    }
}
