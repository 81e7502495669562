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
use super::error::SampleSourceError;
use super::traits::SampleSource;

/// A sample source that produces planar samples from memory. Used by tests to
/// drive the chunked reading path without touching the filesystem.
pub struct MemorySampleSource {
    planar_samples: Vec<Vec<f32>>,
    /// Current position in frames
    current_frame: usize,
    sample_rate: u32,
    bits_per_sample: u16,
}

impl MemorySampleSource {
    pub fn new(planar_samples: Vec<Vec<f32>>, sample_rate: u32, bits_per_sample: u16) -> Self {
        Self {
            planar_samples,
            current_frame: 0,
            sample_rate,
            bits_per_sample,
        }
    }

    fn total_frames(&self) -> usize {
        self.planar_samples.first().map(|c| c.len()).unwrap_or(0)
    }
}

impl SampleSource for MemorySampleSource {
    fn next_chunk(
        &mut self,
        output: &mut [Vec<f32>],
        max_frames: usize,
    ) -> Result<usize, SampleSourceError> {
        if output.len() != self.planar_samples.len() {
            return Err(SampleSourceError::SampleConversionFailed(format!(
                "Output has {} channels, expected {}",
                output.len(),
                self.planar_samples.len()
            )));
        }

        for ch in output.iter_mut() {
            ch.clear();
        }

        let available = self.total_frames().saturating_sub(self.current_frame);
        let to_copy = available.min(max_frames);
        if to_copy > 0 {
            for (out_ch, src_ch) in output.iter_mut().zip(self.planar_samples.iter()) {
                out_ch.extend_from_slice(&src_ch[self.current_frame..self.current_frame + to_copy]);
            }
            self.current_frame += to_copy;
        }

        Ok(to_copy)
    }

    fn channel_count(&self) -> u16 {
        self.planar_samples.len() as u16
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    fn duration(&self) -> Option<std::time::Duration> {
        let duration_secs = self.total_frames() as f64 / self.sample_rate as f64;
        Some(std::time::Duration::from_secs_f64(duration_secs))
    }
}
