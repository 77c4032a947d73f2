//! Offline host driver
//!
//! Feeds a whole buffer through `process_block` in host-sized chunks, the way
//! a realtime host would, so offline renders match live playback.

use super::buffer::AudioBuffer;
use super::processor::MultiFxProcessor;
use crate::error::{MultiFxError, Result};

/// Render `buffer` in place, `block_size` frames at a time.
///
/// The final block may be shorter.
pub fn render_offline(
    processor: &mut MultiFxProcessor,
    buffer: &mut AudioBuffer,
    block_size: usize,
) -> Result<()> {
    if block_size == 0 {
        return Err(MultiFxError::InvalidArgument {
            reason: "block size must be greater than zero".to_string(),
        });
    }

    let total = buffer.num_samples();
    let mut block = AudioBuffer::with_channels(buffer.num_channels(), block_size);
    block.sample_rate = buffer.sample_rate;

    let mut offset = 0;
    while offset < total {
        let len = block_size.min(total - offset);
        block.set_num_samples(len);
        block.copy_region_from(buffer, offset, 0, len);
        processor.process_block(&mut block);
        buffer.copy_region_from(&block, 0, offset, len);
        offset += len;
    }

    log::debug!(
        "Rendered {} frames in {} blocks of {}",
        total,
        total.div_ceil(block_size),
        block_size
    );
    Ok(())
}
