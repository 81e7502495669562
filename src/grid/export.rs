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

//! Export orchestration: turns an ordered list of sample files into one grid file.

use std::fmt;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{debug, info, span, Level};

use crate::audio::{OutputFormat, SampleBuffer, SampleFileIo};
use crate::config::GridConfiguration;

use super::assemble::{assemble, slot_count};
use super::error::ExportError;
use super::length::{cap_length, pad_to_frames};
use super::remix::remix;
use super::resample::resample;
use super::trim::trim_trailing_silence;

/// What an export produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSummary {
    /// Number of input samples placed in the grid.
    pub samples: usize,
    /// Total number of slots, including silent ones.
    pub slots: usize,
    /// Frames per slot.
    pub slot_frames: usize,
    /// Output channel count.
    pub channels: usize,
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    pub bit_depth: u16,
    pub format: OutputFormat,
}

impl GridSummary {
    fn new(samples: usize, grid: &SampleBuffer, slots: usize, format: OutputFormat) -> Self {
        GridSummary {
            samples,
            slots,
            slot_frames: grid.frame_count().checked_div(slots).unwrap_or(0),
            channels: grid.channel_count(),
            sample_rate: grid.sample_rate(),
            bit_depth: grid.bit_depth(),
            format,
        }
    }

    /// Length of one slot in seconds.
    pub fn slot_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.slot_frames as f64 / self.sample_rate as f64
    }
}

impl fmt::Display for GridSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sample(s) in {} slot(s) of {} frames ({:.3}s), {} channel(s), {}Hz, {}-bit {}",
            self.samples,
            self.slots,
            self.slot_frames,
            self.slot_secs(),
            self.channels,
            self.sample_rate,
            self.bit_depth,
            self.format
        )
    }
}

/// Reads one input and brings it to the grid's rate, trimmed and capped.
fn prepare_sample<IO: SampleFileIo + ?Sized>(
    io: &IO,
    path: &Path,
    configuration: &GridConfiguration,
) -> Result<SampleBuffer, ExportError> {
    let bit_depth = configuration.bit_depth().bits();

    let buffer = io.read(path).map_err(|source| ExportError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = ?path, buffer = %buffer, "Read sample");

    let mut buffer = resample(buffer, configuration.sample_rate(), bit_depth).map_err(
        |source| ExportError::Resample {
            path: path.to_path_buf(),
            source,
        },
    )?;
    buffer.set_bit_depth(bit_depth);

    let buffer = trim_trailing_silence(buffer);
    let buffer = cap_length(buffer, configuration.max_sample_length());

    info!(
        path = ?path,
        channels = buffer.channel_count(),
        frames = buffer.frame_count(),
        duration_ms = buffer.duration().as_millis(),
        "Sample prepared"
    );
    Ok(buffer)
}

/// Reads, resamples, trims and caps every input on a worker pool.
///
/// The result is in input order. If several inputs fail, the error for the
/// earliest one in the list is returned.
pub fn load_samples<IO: SampleFileIo + ?Sized>(
    paths: &[PathBuf],
    configuration: &GridConfiguration,
    io: &IO,
) -> Result<Vec<SampleBuffer>, ExportError> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(configuration.threads().min(paths.len().max(1)))
        .thread_name(|i| format!("gridgen-load-{i}"))
        .build()
        .map_err(|e| ExportError::WorkerPool(e.to_string()))?;

    let results: Vec<Result<SampleBuffer, ExportError>> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| prepare_sample(io, path, configuration))
            .collect()
    });

    results.into_iter().collect()
}

/// Builds the grid buffer for `paths` without writing it anywhere.
pub fn build_grid<IO: SampleFileIo + ?Sized>(
    paths: &[PathBuf],
    configuration: &GridConfiguration,
    io: &IO,
) -> Result<SampleBuffer, ExportError> {
    if paths.is_empty() {
        return Err(ExportError::EmptyInput);
    }

    let samples = load_samples(paths, configuration, io)?;

    // Every sample is at the output rate now, so the longest one in frames is
    // the longest one in time.
    let slot_frames = samples
        .iter()
        .map(SampleBuffer::frame_count)
        .max()
        .unwrap_or(0);
    let sample_rate = configuration.sample_rate();
    debug!(
        slot_frames,
        slot_secs = slot_frames as f64 / sample_rate as f64,
        "Computed common slot length"
    );

    let channel_mode = configuration.channel_mode();
    let samples: Vec<SampleBuffer> = samples
        .into_iter()
        .map(|sample| remix(sample, channel_mode))
        .map(|sample| pad_to_frames(sample, slot_frames))
        .collect();

    assemble(
        &samples,
        configuration.minimum_grid_size(),
        channel_mode.output_channels(),
        sample_rate,
        configuration.bit_depth().bits(),
    )
}

/// Builds the grid for `paths` and writes it to `destination`. The container is
/// chosen from the destination's extension. Nothing is written unless every
/// input was processed successfully.
pub fn export_grid<IO: SampleFileIo + ?Sized>(
    paths: &[PathBuf],
    destination: &Path,
    configuration: &GridConfiguration,
    io: &IO,
) -> Result<GridSummary, ExportError> {
    let span = span!(Level::INFO, "export grid");
    let _enter = span.enter();

    info!(
        inputs = paths.len(),
        destination = ?destination,
        channel_mode = %configuration.channel_mode(),
        sample_rate = configuration.sample_rate(),
        bit_depth = %configuration.bit_depth(),
        "Exporting sample grid"
    );

    let grid = build_grid(paths, configuration, io)?;
    let format = OutputFormat::from_path(destination);
    let slots = slot_count(paths.len(), configuration.minimum_grid_size());

    io.write(&grid, destination, format)
        .map_err(|source| ExportError::Write {
            path: destination.to_path_buf(),
            source,
        })?;

    let summary = GridSummary::new(paths.len(), &grid, slots, format);
    info!(destination = ?destination, summary = %summary, "Sample grid written");
    Ok(summary)
}
