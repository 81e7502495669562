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
use std::path::PathBuf;

use crate::audio::{SampleSourceError, WriteError};

use super::resample::ResampleError;

/// Why an export stopped. Every variant that concerns a file names it.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no input files were given")]
    EmptyInput,

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: SampleSourceError,
    },

    #[error("failed to resample {}: {source}", .path.display())]
    Resample {
        path: PathBuf,
        #[source]
        source: ResampleError,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: WriteError,
    },

    #[error("grid of {slots} slots x {slot_frames} frames is too large to allocate")]
    GridTooLarge { slots: usize, slot_frames: usize },

    #[error("unable to start sample loading threads: {0}")]
    WorkerPool(String),
}

impl ExportError {
    /// The file the failure concerns, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ExportError::Read { path, .. }
            | ExportError::Resample { path, .. }
            | ExportError::Write { path, .. } => Some(path),
            ExportError::EmptyInput
            | ExportError::GridTooLarge { .. }
            | ExportError::WorkerPool(_) => None,
        }
    }
}
