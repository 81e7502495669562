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
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use tracing::debug;

use crate::audio::SampleBuffer;

/// Input block size for the sinc resampler.
const INPUT_BLOCK_SIZE: usize = 1024;

/// Error raised when a buffer can't be resampled.
#[derive(Debug, thiserror::Error)]
pub enum ResampleError {
    #[error("invalid resampling ratio: {0}Hz -> {1}Hz")]
    InvalidRatio(u32, u32),

    #[error("resampler construction failed ({0}Hz -> {1}Hz): {2}")]
    Construction(u32, u32, #[source] rubato::ResamplerConstructionError),

    #[error("resampling failed ({0}Hz -> {1}Hz): {2}")]
    Processing(u32, u32, #[source] rubato::ResampleError),
}

/// Sinc parameters for offline, best-quality conversion.
fn best_quality_parameters() -> SincInterpolationParameters {
    SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        oversampling_factor: 256,
        interpolation: SincInterpolationType::Cubic,
        window: WindowFunction::BlackmanHarris2,
    }
}

/// Number of frames a buffer of `frames` frames has after conversion:
/// floor(frames * target / source).
pub fn resampled_frame_count(frames: usize, source_rate: u32, target_rate: u32) -> usize {
    if source_rate == 0 {
        return 0;
    }
    ((frames as u128 * target_rate as u128) / source_rate as u128) as usize
}

/// Converts the buffer to `target_rate` with band-limited sinc interpolation.
///
/// Buffers already at the target rate, and buffers without frames, are returned
/// unchanged. The output keeps the input's channel count, is exactly
/// `floor(frames * target / source)` frames long, and carries `bit_depth`.
pub fn resample(
    buffer: SampleBuffer,
    target_rate: u32,
    bit_depth: u16,
) -> Result<SampleBuffer, ResampleError> {
    let source_rate = buffer.sample_rate();
    if source_rate == target_rate || buffer.frame_count() == 0 {
        return Ok(buffer);
    }
    if source_rate == 0 || target_rate == 0 {
        return Err(ResampleError::InvalidRatio(source_rate, target_rate));
    }

    let channel_count = buffer.channel_count();
    let input_frames = buffer.frame_count();
    let expected_frames = resampled_frame_count(input_frames, source_rate, target_rate);
    let ratio = target_rate as f64 / source_rate as f64;

    debug!(
        source_rate,
        target_rate,
        channels = channel_count,
        input_frames,
        expected_frames,
        "Resampling buffer"
    );

    let mut resampler = SincFixedIn::<f32>::new(
        ratio,
        1.0,
        best_quality_parameters(),
        INPUT_BLOCK_SIZE,
        channel_count,
    )
    .map_err(|e| ResampleError::Construction(source_rate, target_rate, e))?;

    let input = buffer.into_channels();
    let delay = resampler.output_delay();
    let wanted = expected_frames + delay;
    let mut output: Vec<Vec<f32>> = vec![Vec::with_capacity(wanted); channel_count];
    let mut scratch = resampler.output_buffer_allocate(true);
    let processing_error =
        |e: rubato::ResampleError| ResampleError::Processing(source_rate, target_rate, e);

    // Full blocks.
    let mut position = 0;
    while input_frames - position >= resampler.input_frames_next() {
        let needed = resampler.input_frames_next();
        let block: Vec<&[f32]> = input
            .iter()
            .map(|ch| &ch[position..position + needed])
            .collect();
        let (consumed, produced) = resampler
            .process_into_buffer(&block, &mut scratch, None)
            .map_err(processing_error)?;
        append_frames(&mut output, &scratch, produced);
        position += consumed;
    }

    // The tail that doesn't fill a block.
    if position < input_frames {
        let tail: Vec<&[f32]> = input.iter().map(|ch| &ch[position..]).collect();
        let (_, produced) = resampler
            .process_partial_into_buffer(Some(tail.as_slice()), &mut scratch, None)
            .map_err(processing_error)?;
        append_frames(&mut output, &scratch, produced);
    }

    // Flush the filter's delay line until the delayed output is complete.
    while output_len(&output) < wanted {
        let (_, produced) = resampler
            .process_partial_into_buffer(None::<&[Vec<f32>]>, &mut scratch, None)
            .map_err(processing_error)?;
        if produced == 0 {
            break;
        }
        append_frames(&mut output, &scratch, produced);
    }

    for channel in output.iter_mut() {
        channel.drain(..delay.min(channel.len()));
        channel.resize(expected_frames, 0.0);
    }

    Ok(SampleBuffer::new(target_rate, bit_depth, output))
}

fn output_len(output: &[Vec<f32>]) -> usize {
    output.first().map(Vec::len).unwrap_or(0)
}

fn append_frames(output: &mut [Vec<f32>], scratch: &[Vec<f32>], frames: usize) {
    for (dst, src) in output.iter_mut().zip(scratch.iter()) {
        dst.extend_from_slice(&src[..frames.min(src.len())]);
    }
}
