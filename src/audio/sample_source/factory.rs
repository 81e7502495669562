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
use std::path::Path;

use crate::audio::SampleBuffer;

use super::audio::AudioSampleSource;
use super::error::SampleSourceError;
use super::traits::SampleSource;

/// Frames requested per chunk when draining a source into memory.
const READ_CHUNK_FRAMES: usize = 4096;

/// Create a SampleSource from a file, automatically detecting the file type
pub fn create_sample_source_from_file<P: AsRef<Path>>(
    path: P,
) -> Result<Box<dyn SampleSource>, SampleSourceError> {
    let audio_source = AudioSampleSource::from_file(path)?;
    Ok(Box::new(audio_source))
}

/// Drains a source completely into an in-memory buffer.
pub fn read_to_buffer<S: SampleSource>(mut source: S) -> Result<SampleBuffer, SampleSourceError> {
    let num_channels = source.channel_count() as usize;
    let capacity = source
        .duration()
        .map(|d| (d.as_secs_f64() * source.sample_rate() as f64).ceil() as usize)
        .unwrap_or(0);

    let mut channels: Vec<Vec<f32>> = vec![Vec::with_capacity(capacity); num_channels];
    let mut chunk: Vec<Vec<f32>> = vec![Vec::with_capacity(READ_CHUNK_FRAMES); num_channels];

    // A source without channels has nothing to hand out.
    if num_channels > 0 {
        loop {
            let frames = source.next_chunk(&mut chunk, READ_CHUNK_FRAMES)?;
            if frames == 0 {
                break;
            }
            for (dst, src) in channels.iter_mut().zip(chunk.iter()) {
                dst.extend_from_slice(&src[..frames]);
            }
        }
    }

    Ok(SampleBuffer::new(
        source.sample_rate(),
        source.bits_per_sample(),
        channels,
    ))
}

/// Decodes a whole file into memory.
pub fn read_sample_file<P: AsRef<Path>>(path: P) -> Result<SampleBuffer, SampleSourceError> {
    read_to_buffer(create_sample_source_from_file(path)?)
}
