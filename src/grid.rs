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

//! The sample grid pipeline.
//!
//! Each stage takes ownership of a [`SampleBuffer`](crate::audio::SampleBuffer) and
//! returns the transformed buffer:
//!
//! read -> resample -> trim trailing silence -> cap length -> remix -> pad -> assemble -> write

pub mod assemble;
pub mod error;
pub mod export;
pub mod length;
pub mod remix;
pub mod resample;
pub mod trim;

pub use assemble::{assemble, slot_count};
pub use error::ExportError;
pub use export::{build_grid, export_grid, load_samples, GridSummary};
pub use length::{cap_length, pad_to_frames, pad_to_length, seconds_to_frames};
pub use remix::{remix, ChannelMode};
pub use resample::{resample, ResampleError};
pub use trim::trim_trailing_silence;
