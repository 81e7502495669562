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
use std::fmt;
use std::time::Duration;

/// A fully loaded, planar, multi-channel audio buffer.
///
/// Every channel always holds the same number of frames. All mutating helpers
/// apply their change to every channel so the invariant can't be broken from
/// outside this module.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    /// Sample rate in Hz.
    sample_rate: u32,
    /// Bits per sample. Only used when the buffer is written out.
    bit_depth: u16,
    /// Planar samples, one Vec per channel.
    channels: Vec<Vec<f32>>,
}

impl SampleBuffer {
    /// Creates a buffer from planar channel data.
    ///
    /// Channels shorter than the longest one are padded with silence so that
    /// every channel ends up with the same frame count.
    pub fn new(sample_rate: u32, bit_depth: u16, mut channels: Vec<Vec<f32>>) -> SampleBuffer {
        let frames = channels.iter().map(Vec::len).max().unwrap_or(0);
        for channel in channels.iter_mut() {
            channel.resize(frames, 0.0);
        }

        SampleBuffer {
            sample_rate,
            bit_depth,
            channels,
        }
    }

    /// Creates a silent buffer with the given geometry.
    pub fn silent(sample_rate: u32, bit_depth: u16, channel_count: usize, frames: usize) -> Self {
        SampleBuffer {
            sample_rate,
            bit_depth,
            channels: vec![vec![0.0; frames]; channel_count],
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bit_depth(&self) -> u16 {
        self.bit_depth
    }

    pub fn set_bit_depth(&mut self, bit_depth: u16) {
        self.bit_depth = bit_depth;
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of frames (samples per channel).
    pub fn frame_count(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.sample_rate as f64
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_secs())
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub(crate) fn channels_mut(&mut self) -> &mut [Vec<f32>] {
        &mut self.channels
    }

    /// Consumes the buffer and returns its planar channel data.
    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Resizes every channel to exactly `frames`, zero-filling when growing.
    pub fn set_frame_count(&mut self, frames: usize) {
        for channel in self.channels.iter_mut() {
            channel.resize(frames, 0.0);
        }
    }

    /// Resizes the channel list. New channels are silent and match the current
    /// frame count.
    pub fn set_channel_count(&mut self, channel_count: usize) {
        let frames = self.frame_count();
        self.channels.resize_with(channel_count, || vec![0.0; frames]);
    }

    /// Returns the samples interleaved frame by frame: L, R, L, R, ...
    pub fn interleaved(&self) -> Vec<f32> {
        let channel_count = self.channel_count();
        let mut interleaved = Vec::with_capacity(self.frame_count() * channel_count);
        for frame in 0..self.frame_count() {
            for channel in &self.channels {
                interleaved.push(channel[frame]);
            }
        }
        interleaved
    }
}

impl fmt::Display for SampleBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} channel(s), {}Hz, {}-bit, {} frames ({:.3}s)",
            self.channel_count(),
            self.sample_rate,
            self.bit_depth,
            self.frame_count(),
            self.duration_secs()
        )
    }
}
