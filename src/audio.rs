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

mod aiff;
pub mod buffer;
pub mod format;
#[cfg(test)]
pub mod mock;
pub mod sample_source;
pub mod writer;

pub use buffer::SampleBuffer;
pub use format::{BitDepth, FormatError, OutputFormat, SUPPORTED_SAMPLE_RATES};
pub use sample_source::SampleSourceError;
pub use writer::WriteError;

/// Reads and writes whole sample files. The grid pipeline only talks to files
/// through this trait.
pub trait SampleFileIo: Send + Sync {
    /// Decodes the file at `path` into memory.
    fn read(&self, path: &Path) -> Result<SampleBuffer, SampleSourceError>;

    /// Encodes `buffer` into `path` using the given container.
    fn write(&self, buffer: &SampleBuffer, path: &Path, format: OutputFormat)
        -> Result<(), WriteError>;
}

/// Sample file access backed by the filesystem: symphonia for decoding, hound
/// and the built-in AIFF encoder for writing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileIo;

impl SampleFileIo for FileIo {
    fn read(&self, path: &Path) -> Result<SampleBuffer, SampleSourceError> {
        sample_source::read_sample_file(path)
    }

    fn write(
        &self,
        buffer: &SampleBuffer,
        path: &Path,
        format: OutputFormat,
    ) -> Result<(), WriteError> {
        writer::write_sample_file(buffer, path, format)
    }
}
