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
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing::info;

use super::{OutputFormat, SampleBuffer, SampleFileIo, SampleSourceError, WriteError};

/// An in-memory sample file store. Reads come from buffers registered up front,
/// writes are recorded instead of touching the disk.
#[derive(Default)]
pub struct MemoryIo {
    files: HashMap<PathBuf, SampleBuffer>,
    written: Mutex<Vec<(PathBuf, OutputFormat, SampleBuffer)>>,
    fail_writes: bool,
}

impl MemoryIo {
    pub fn new() -> MemoryIo {
        MemoryIo::default()
    }

    /// Registers a buffer that will be returned when `path` is read.
    pub fn with_file<P: Into<PathBuf>>(mut self, path: P, buffer: SampleBuffer) -> MemoryIo {
        self.files.insert(path.into(), buffer);
        self
    }

    /// Makes every write fail with a permission error.
    pub fn failing_writes(mut self) -> MemoryIo {
        self.fail_writes = true;
        self
    }

    /// Returns everything written so far.
    pub fn written(&self) -> Vec<(PathBuf, OutputFormat, SampleBuffer)> {
        match self.written.lock() {
            Ok(written) => written.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SampleFileIo for MemoryIo {
    fn read(&self, path: &Path) -> Result<SampleBuffer, SampleSourceError> {
        self.files.get(path).cloned().ok_or_else(|| {
            SampleSourceError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{}: not registered", path.display()),
            ))
        })
    }

    fn write(
        &self,
        buffer: &SampleBuffer,
        path: &Path,
        format: OutputFormat,
    ) -> Result<(), WriteError> {
        if self.fail_writes {
            return Err(WriteError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only (mock)",
            )));
        }

        info!(path = ?path, format = %format, "Recording write (mock)");
        let mut written = match self.written.lock() {
            Ok(written) => written,
            Err(poisoned) => poisoned.into_inner(),
        };
        written.push((path.to_path_buf(), format, buffer.clone()));
        Ok(())
    }
}
