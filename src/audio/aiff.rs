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

//! Minimal AIFF (not AIFF-C) PCM encoder: FORM/AIFF with COMM and SSND chunks,
//! big-endian signed integer samples.

use super::format::BitDepth;
use super::writer::{quantize, WriteError};
use super::SampleBuffer;

/// Size of the COMM chunk body.
const COMM_SIZE: u32 = 18;

/// SSND body header: offset + block size.
const SSND_HEADER_SIZE: u32 = 8;

pub(super) fn encode(buffer: &SampleBuffer, depth: BitDepth) -> Result<Vec<u8>, WriteError> {
    let channels = buffer.channel_count();
    let frames = buffer.frame_count();
    let frame_bytes = channels * depth.bytes();

    let data_size = frames
        .checked_mul(frame_bytes)
        .and_then(|size| u32::try_from(size).ok())
        .filter(|size| size.checked_add(64).is_some())
        .ok_or(WriteError::TooManyFrames(frames))?;
    let num_frames = u32::try_from(frames).map_err(|_| WriteError::TooManyFrames(frames))?;

    // Chunks must be an even number of bytes long; the pad byte isn't counted in
    // the chunk's own size but is counted in the FORM size.
    let pad = (data_size % 2) as usize;
    let ssnd_size = SSND_HEADER_SIZE + data_size;
    let form_size = 4 + (8 + COMM_SIZE) + (8 + ssnd_size) + pad as u32;

    let mut out = Vec::with_capacity(8 + form_size as usize);
    out.extend_from_slice(b"FORM");
    out.extend_from_slice(&form_size.to_be_bytes());
    out.extend_from_slice(b"AIFF");

    out.extend_from_slice(b"COMM");
    out.extend_from_slice(&COMM_SIZE.to_be_bytes());
    out.extend_from_slice(&(channels as u16).to_be_bytes());
    out.extend_from_slice(&num_frames.to_be_bytes());
    out.extend_from_slice(&depth.bits().to_be_bytes());
    out.extend_from_slice(&extended_from_u32(buffer.sample_rate()));

    out.extend_from_slice(b"SSND");
    out.extend_from_slice(&ssnd_size.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(&0u32.to_be_bytes());

    for sample in buffer.interleaved() {
        let value = quantize(sample, depth);
        match depth {
            BitDepth::Sixteen => out.extend_from_slice(&(value as i16).to_be_bytes()),
            BitDepth::TwentyFour => out.extend_from_slice(&value.to_be_bytes()[1..]),
        }
    }
    out.resize(out.len() + pad, 0);

    Ok(out)
}

/// Encodes an integer as an 80-bit IEEE 754 extended precision float, which is how
/// AIFF stores the sample rate.
fn extended_from_u32(value: u32) -> [u8; 10] {
    let mut bytes = [0u8; 10];
    if value == 0 {
        return bytes;
    }

    let value = value as u64;
    let shift = value.leading_zeros();
    let exponent = (16383 + 63 - shift) as u16;
    let mantissa = value << shift;

    bytes[..2].copy_from_slice(&exponent.to_be_bytes());
    bytes[2..].copy_from_slice(&mantissa.to_be_bytes());
    bytes
}
