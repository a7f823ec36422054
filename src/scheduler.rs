use std::thread;

use log::debug;
use palette::Srgb;

use crate::error::RecolorError;
use crate::frame::{self, Frame};

/// Fan the overlay pass out across at most `worker_count` scoped threads.
///
/// Frames are partitioned into contiguous chunks of `ceil(len / workers)`;
/// each worker owns its chunk exclusively and writes in place, so no two
/// workers touch the same frame and the output is identical for every
/// worker count. The scope join is the only synchronization point.
///
/// A panic in any worker fails the whole pass; frames are left in an
/// unspecified state and the caller must discard them.
pub fn apply_overlays(
    frames: &mut [Frame],
    overlays: &[Srgb],
    worker_count: usize,
) -> Result<(), RecolorError> {
    debug_assert_eq!(frames.len(), overlays.len());
    if frames.is_empty() {
        return Ok(());
    }

    let chunk_size = frames.len().div_ceil(worker_count.max(1));
    debug!(
        "overlay pass: {} frames in chunks of {} across {} workers",
        frames.len(),
        chunk_size,
        worker_count
    );

    let any_panicked = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(worker_count);

        for (frame_chunk, overlay_chunk) in
            frames.chunks_mut(chunk_size).zip(overlays.chunks(chunk_size))
        {
            handles.push(scope.spawn(move || {
                for (frame, overlay) in frame_chunk.iter_mut().zip(overlay_chunk) {
                    frame::apply_overlay(frame, *overlay);
                }
            }));
        }

        handles.into_iter().any(|handle| handle.join().is_err())
    });

    if any_panicked {
        return Err(RecolorError::WorkerPanic);
    }
    Ok(())
}
