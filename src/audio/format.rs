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

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

/// Output sample rates a grid can be rendered at.
pub const SUPPORTED_SAMPLE_RATES: [u32; 8] =
    [11025, 12000, 22050, 24000, 44100, 48000, 88200, 96000];

/// Extensions that select the AIFF container. Anything else is written as WAV.
const AIFF_EXTENSIONS: &[&str] = &["aif", "aiff", "aifc"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Unsupported bit depth: {0} (expected 16 or 24)")]
    UnsupportedBitDepth(String),

    #[error("Unsupported sample rate: {0}Hz")]
    UnsupportedSampleRate(u32),
}

/// Integer PCM bit depth of the written grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum BitDepth {
    #[default]
    Sixteen,
    TwentyFour,
}

impl BitDepth {
    pub fn bits(self) -> u16 {
        match self {
            BitDepth::Sixteen => 16,
            BitDepth::TwentyFour => 24,
        }
    }

    /// Largest positive integer sample value at this depth.
    pub fn max_amplitude(self) -> i32 {
        (1i32 << (self.bits() - 1)) - 1
    }

    /// Bytes used to store one sample.
    pub fn bytes(self) -> usize {
        self.bits() as usize / 8
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = FormatError;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            16 => Ok(BitDepth::Sixteen),
            24 => Ok(BitDepth::TwentyFour),
            other => Err(FormatError::UnsupportedBitDepth(other.to_string())),
        }
    }
}

impl From<BitDepth> for u16 {
    fn from(depth: BitDepth) -> Self {
        depth.bits()
    }
}

impl FromStr for BitDepth {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u16>()
            .map_err(|_| FormatError::UnsupportedBitDepth(s.to_string()))
            .and_then(BitDepth::try_from)
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Checks that the rate is one a grid can be rendered at.
pub fn validate_sample_rate(sample_rate: u32) -> Result<u32, FormatError> {
    if SUPPORTED_SAMPLE_RATES.contains(&sample_rate) {
        Ok(sample_rate)
    } else {
        Err(FormatError::UnsupportedSampleRate(sample_rate))
    }
}

/// Container written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Wave,
    Aiff,
}

impl OutputFormat {
    /// Picks the container from the destination's extension. AIFF extensions
    /// select AIFF, everything else (including no extension) is WAV.
    pub fn from_path(path: &Path) -> OutputFormat {
        let is_aiff = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                AIFF_EXTENSIONS
                    .iter()
                    .any(|aiff| ext.eq_ignore_ascii_case(aiff))
            });

        if is_aiff {
            OutputFormat::Aiff
        } else {
            OutputFormat::Wave
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Wave => "wav",
            OutputFormat::Aiff => "aiff",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
