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
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

pub mod error;
pub mod grid;

pub use error::ConfigError;
pub use grid::GridConfiguration;

/// File extensions picked up when a directory is given as input.
const AUDIO_EXTENSIONS: &[&str] = &["wav", "wave", "aif", "aiff", "aifc", "flac", "mp3", "ogg"];

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Expands the given inputs into an ordered list of sample files.
///
/// Files are kept in the order given. A directory contributes the audio files
/// directly inside it, sorted by file name. Nested directories are not searched.
pub fn collect_input_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, ConfigError> {
    let mut files = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }

        let entries = fs::read_dir(input).map_err(|source| ConfigError::Input {
            path: input.clone(),
            source,
        })?;

        let mut found = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| ConfigError::Input {
                    path: input.clone(),
                    source,
                })?
                .path();
            if path.is_file() && is_audio_file(&path) {
                found.push(path);
            }
        }
        found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        debug!(directory = ?input, files = found.len(), "Expanded input directory");
        files.extend(found);
    }

    Ok(files)
}
