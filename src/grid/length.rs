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
use tracing::debug;

use crate::audio::SampleBuffer;

/// Absorbs representation error so that e.g. 0.1s * 44100Hz floors to 4410, not 4409.
const FRAME_EPSILON: f64 = 1e-6;

/// floor(seconds * sample_rate), with negative or non-finite durations treated as zero.
pub fn seconds_to_frames(seconds: f64, sample_rate: u32) -> usize {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * sample_rate as f64 + FRAME_EPSILON).floor() as usize
}

/// Truncates the buffer to `max_seconds` if it's longer. A limit of zero or less means
/// no limit.
pub fn cap_length(mut buffer: SampleBuffer, max_seconds: f64) -> SampleBuffer {
    if max_seconds <= 0.0 {
        return buffer;
    }

    let max_frames = seconds_to_frames(max_seconds, buffer.sample_rate());
    if buffer.frame_count() > max_frames {
        debug!(
            original_frames = buffer.frame_count(),
            capped_frames = max_frames,
            max_seconds,
            "Capped sample length"
        );
        buffer.set_frame_count(max_frames);
    }
    buffer
}

/// Resizes every channel to exactly `frames`, appending silence or truncating.
pub fn pad_to_frames(mut buffer: SampleBuffer, frames: usize) -> SampleBuffer {
    buffer.set_frame_count(frames);
    buffer
}

/// Resizes every channel to floor(target_seconds * sample_rate) frames.
pub fn pad_to_length(buffer: SampleBuffer, target_seconds: f64, sample_rate: u32) -> SampleBuffer {
    pad_to_frames(buffer, seconds_to_frames(target_seconds, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(frames: usize) -> Vec<f32> {
        (0..frames).map(|i| (i + 1) as f32 / frames as f32).collect()
    }

    #[test]
    fn test_seconds_to_frames() {
        assert_eq!(seconds_to_frames(1.0, 44100), 44100);
        assert_eq!(seconds_to_frames(0.2, 44100), 8820);
        assert_eq!(seconds_to_frames(0.1, 44100), 4410);
        assert_eq!(seconds_to_frames(0.5, 11025), 5512);
        assert_eq!(seconds_to_frames(0.0, 48000), 0);
        assert_eq!(seconds_to_frames(-1.0, 48000), 0);
        assert_eq!(seconds_to_frames(f64::NAN, 48000), 0);
    }

    #[test]
    fn test_cap_length_truncates() {
        let buffer = SampleBuffer::new(44100, 16, vec![ramp(44100), ramp(44100)]);
        let capped = cap_length(buffer, 0.2);
        assert_eq!(capped.frame_count(), 8820);
        assert_eq!(capped.channel(1).unwrap()[8819], 8820.0 / 44100.0);
    }

    #[test]
    fn test_cap_length_zero_is_unlimited() {
        let buffer = SampleBuffer::new(44100, 16, vec![ramp(1000)]);
        assert_eq!(cap_length(buffer.clone(), 0.0), buffer);
        assert_eq!(cap_length(buffer.clone(), -3.0), buffer);
    }

    #[test]
    fn test_cap_length_shorter_is_untouched() {
        let buffer = SampleBuffer::new(48000, 16, vec![ramp(4800)]);
        assert_eq!(cap_length(buffer.clone(), 0.5), buffer);
        assert_eq!(cap_length(buffer.clone(), 0.1).frame_count(), 4800);
    }

    #[test]
    fn test_pad_grows_with_silence() {
        let buffer = SampleBuffer::new(44100, 16, vec![vec![0.5; 10], vec![-0.5; 10]]);
        let padded = pad_to_length(buffer, 1.0, 20);
        assert_eq!(padded.frame_count(), 20);
        for channel in padded.channels() {
            assert!(channel[10..].iter().all(|s| *s == 0.0));
        }
        assert!(padded.channel(0).unwrap()[..10].iter().all(|s| *s == 0.5));
    }

    #[test]
    fn test_pad_truncation_is_idempotent() {
        let buffer = SampleBuffer::new(44100, 16, vec![ramp(44100), ramp(44100)]);
        let twice = pad_to_length(pad_to_length(buffer.clone(), 0.75, 44100), 0.25, 44100);
        let once = pad_to_length(buffer, 0.25, 44100);
        assert_eq!(twice, once);
        assert_eq!(once.frame_count(), 11025);
    }
}
