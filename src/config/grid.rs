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

use config::{Config, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::ConfigError;
use crate::audio::format::validate_sample_rate;
use crate::audio::BitDepth;
use crate::grid::ChannelMode;

/// Default output sample rate.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Settings for one grid export.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GridConfiguration {
    /// Minimum number of slots. Zero means one slot per input file.
    #[serde(default)]
    minimum_grid_size: usize,

    /// How input channels are mapped onto the grid's channels.
    #[serde(default)]
    channel_mode: ChannelMode,

    /// Output bit depth (16 or 24).
    #[serde(default)]
    bit_depth: BitDepth,

    /// Output sample rate in Hz.
    #[serde(default = "default_sample_rate")]
    sample_rate: u32,

    /// Longest allowed sample, in seconds. Zero means unlimited.
    #[serde(default)]
    max_sample_length: f64,

    /// Worker threads used to load input files. Defaults to the number of CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    threads: Option<usize>,
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

impl Default for GridConfiguration {
    fn default() -> Self {
        GridConfiguration {
            minimum_grid_size: 0,
            channel_mode: ChannelMode::default(),
            bit_depth: BitDepth::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_sample_length: 0.0,
            threads: None,
        }
    }
}

impl GridConfiguration {
    /// Loads and validates a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<GridConfiguration, ConfigError> {
        let configuration = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<GridConfiguration>()?;
        configuration.validate()?;
        Ok(configuration)
    }

    /// Writes the configuration to a YAML file so it can be reused later.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let serialized = serde_yml::to_string(self)?;
        std::fs::write(path, serialized)?;
        info!(path = ?path, "Saved grid configuration");
        Ok(())
    }

    /// Checks that every value is one the pipeline accepts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_sample_rate(self.sample_rate)?;
        if !self.max_sample_length.is_finite() || self.max_sample_length < 0.0 {
            return Err(ConfigError::InvalidMaxLength(self.max_sample_length));
        }
        if self.threads == Some(0) {
            return Err(ConfigError::InvalidThreads);
        }
        Ok(())
    }

    pub fn minimum_grid_size(&self) -> usize {
        self.minimum_grid_size
    }

    pub fn channel_mode(&self) -> ChannelMode {
        self.channel_mode
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn max_sample_length(&self) -> f64 {
        self.max_sample_length
    }

    /// Worker thread count, falling back to the number of CPUs.
    pub fn threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }

    pub fn with_minimum_grid_size(mut self, minimum_grid_size: usize) -> Self {
        self.minimum_grid_size = minimum_grid_size;
        self
    }

    pub fn with_channel_mode(mut self, channel_mode: ChannelMode) -> Self {
        self.channel_mode = channel_mode;
        self
    }

    pub fn with_bit_depth(mut self, bit_depth: BitDepth) -> Self {
        self.bit_depth = bit_depth;
        self
    }

    /// Overrides the sample rate. Call `validate` afterwards.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Overrides the maximum sample length. Call `validate` afterwards.
    pub fn with_max_sample_length(mut self, max_sample_length: f64) -> Self {
        self.max_sample_length = max_sample_length;
        self
    }

    /// Overrides the worker thread count. Call `validate` afterwards.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }
}
