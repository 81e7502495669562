// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use tracing::debug;

use crate::audio::SampleBuffer;

use super::error::ExportError;

/// Number of slots in a grid built from `sample_count` samples.
pub fn slot_count(sample_count: usize, minimum_grid_size: usize) -> usize {
    sample_count.max(minimum_grid_size)
}

/// Lays the samples out back to back in one buffer.
///
/// Sample `i` occupies frames `[i * slot, (i + 1) * slot)` of every output channel,
/// where `slot` is the frame count of the first sample. Slots past the last sample
/// stay silent. A sample missing an output channel leaves that channel of its slot
/// silent; samples are expected to already share one length and channel layout.
///
/// Fails with [`ExportError::GridTooLarge`] when the grid can't be allocated.
pub fn assemble(
    samples: &[SampleBuffer],
    minimum_grid_size: usize,
    output_channels: usize,
    output_rate: u32,
    output_bit_depth: u16,
) -> Result<SampleBuffer, ExportError> {
    let slot_frames = samples.first().map(SampleBuffer::frame_count).unwrap_or(0);
    let slots = slot_count(samples.len(), minimum_grid_size);
    let too_large = || ExportError::GridTooLarge { slots, slot_frames };

    let total_frames = slots.checked_mul(slot_frames).ok_or_else(too_large)?;

    debug!(
        samples = samples.len(),
        slots,
        slot_frames,
        channels = output_channels,
        "Assembling grid"
    );

    let mut channels = Vec::with_capacity(output_channels);
    for _ in 0..output_channels {
        let mut channel: Vec<f32> = Vec::new();
        channel
            .try_reserve_exact(total_frames)
            .map_err(|_| too_large())?;
        channel.resize(total_frames, 0.0);
        channels.push(channel);
    }

    for (slot, sample) in samples.iter().enumerate() {
        let start = slot * slot_frames;
        for (channel_index, out) in channels.iter_mut().enumerate() {
            if let Some(channel) = sample.channel(channel_index) {
                let len = channel.len().min(slot_frames);
                out[start..start + len].copy_from_slice(&channel[..len]);
            }
        }
    }

    Ok(SampleBuffer::new(output_rate, output_bit_depth, channels))
}
