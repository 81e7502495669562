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

//! Encodes sample buffers to integer PCM containers.
//!
//! Files are encoded fully in memory and then written with a single call, so an
//! encoding failure never leaves a file behind.

use std::io::Cursor;
use std::path::Path;

use hound::{WavSpec, WavWriter};
use tracing::debug;

use super::aiff;
use super::format::{BitDepth, FormatError, OutputFormat};
use super::SampleBuffer;

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("cannot write a buffer with no channels")]
    NoChannels,

    #[error("too many channels for the output container: {0}")]
    TooManyChannels(usize),

    #[error("too many frames for the output container: {0}")]
    TooManyFrames(usize),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("WAV encoding error: {0}")]
    Wav(#[from] hound::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Converts a float sample to an integer at the given depth. Out of range input is clipped.
#[inline]
pub(crate) fn quantize(sample: f32, depth: BitDepth) -> i32 {
    let clamped = if sample.is_nan() {
        0.0
    } else {
        sample.clamp(-1.0, 1.0)
    };
    (clamped * depth.max_amplitude() as f32).round() as i32
}

/// Encodes the buffer into the bytes of a complete file.
pub fn encode(buffer: &SampleBuffer, format: OutputFormat) -> Result<Vec<u8>, WriteError> {
    if buffer.channel_count() == 0 {
        return Err(WriteError::NoChannels);
    }
    if buffer.channel_count() > u16::MAX as usize {
        return Err(WriteError::TooManyChannels(buffer.channel_count()));
    }
    let depth = BitDepth::try_from(buffer.bit_depth())?;

    match format {
        OutputFormat::Wave => encode_wav(buffer, depth),
        OutputFormat::Aiff => aiff::encode(buffer, depth),
    }
}

fn encode_wav(buffer: &SampleBuffer, depth: BitDepth) -> Result<Vec<u8>, WriteError> {
    let spec = WavSpec {
        channels: buffer.channel_count() as u16,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: depth.bits(),
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for sample in buffer.interleaved() {
            let value = quantize(sample, depth);
            match depth {
                BitDepth::Sixteen => writer.write_sample(value as i16)?,
                BitDepth::TwentyFour => writer.write_sample(value)?,
            }
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

/// Encodes the buffer and writes it to `path`.
pub fn write_sample_file(
    buffer: &SampleBuffer,
    path: &Path,
    format: OutputFormat,
) -> Result<(), WriteError> {
    let bytes = encode(buffer, format)?;
    debug!(
        path = ?path,
        format = %format,
        bytes = bytes.len(),
        "Writing encoded grid"
    );
    std::fs::write(path, bytes)?;
    Ok(())
}
