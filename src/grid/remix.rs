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
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::audio::SampleBuffer;

/// How input channels are folded into the grid's channel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelMode {
    /// Two channels. Mono input is copied to both sides, extra channels are dropped.
    #[default]
    Stereo,
    /// The first channel only.
    MonoLeft,
    /// The second channel only (or the only channel of a mono input).
    MonoRight,
    /// The average of all channels.
    MonoMix,
}

impl ChannelMode {
    /// Number of channels a buffer has after remixing with this mode.
    pub fn output_channels(self) -> usize {
        match self {
            ChannelMode::Stereo => 2,
            ChannelMode::MonoLeft | ChannelMode::MonoRight | ChannelMode::MonoMix => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChannelMode::Stereo => "stereo",
            ChannelMode::MonoLeft => "mono-left",
            ChannelMode::MonoRight => "mono-right",
            ChannelMode::MonoMix => "mono-mix",
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Remaps the buffer's channels according to `mode`.
pub fn remix(buffer: SampleBuffer, mode: ChannelMode) -> SampleBuffer {
    match mode {
        ChannelMode::Stereo => to_stereo(buffer),
        ChannelMode::MonoLeft => to_mono_left(buffer),
        ChannelMode::MonoRight => to_mono_right(buffer),
        ChannelMode::MonoMix => to_mono_mix(buffer),
    }
}

fn to_stereo(mut buffer: SampleBuffer) -> SampleBuffer {
    if buffer.channel_count() == 1 {
        let left = buffer.channels()[0].clone();
        buffer.set_channel_count(2);
        buffer.channels_mut()[1] = left;
    } else {
        buffer.set_channel_count(2);
    }
    buffer
}

fn to_mono_left(mut buffer: SampleBuffer) -> SampleBuffer {
    buffer.set_channel_count(1);
    buffer
}

fn to_mono_right(mut buffer: SampleBuffer) -> SampleBuffer {
    if buffer.channel_count() >= 2 {
        buffer.channels_mut().swap(0, 1);
    }
    buffer.set_channel_count(1);
    buffer
}

fn to_mono_mix(buffer: SampleBuffer) -> SampleBuffer {
    let channel_count = buffer.channel_count();
    if channel_count == 1 {
        return buffer;
    }

    let sample_rate = buffer.sample_rate();
    let bit_depth = buffer.bit_depth();
    let frames = buffer.frame_count();
    let channels = buffer.into_channels();

    let mut mixed = vec![0.0f32; frames];
    if channel_count > 0 {
        for channel in &channels {
            for (sum, sample) in mixed.iter_mut().zip(channel) {
                *sum += *sample;
            }
        }
        let scale = channel_count as f32;
        for sample in mixed.iter_mut() {
            *sample /= scale;
        }
    }

    SampleBuffer::new(sample_rate, bit_depth, vec![mixed])
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MODES: [ChannelMode; 4] = [
        ChannelMode::Stereo,
        ChannelMode::MonoLeft,
        ChannelMode::MonoRight,
        ChannelMode::MonoMix,
    ];

    fn three_channels() -> SampleBuffer {
        SampleBuffer::new(
            44100,
            16,
            vec![vec![1.0, 0.1], vec![0.5, 0.2], vec![-0.5, 0.3]],
        )
    }

    #[test]
    fn test_zero_channels_every_mode() {
        for mode in ALL_MODES {
            let empty = SampleBuffer::new(44100, 16, Vec::new());
            let remixed = remix(empty, mode);
            assert_eq!(remixed.channel_count(), mode.output_channels(), "{}", mode);
            assert_eq!(remixed.frame_count(), 0, "{}", mode);
        }
    }

    #[test]
    fn test_output_channel_count_matches_mode() {
        for mode in ALL_MODES {
            for channels in 1..=6 {
                let buffer = SampleBuffer::silent(48000, 24, channels, 16);
                let remixed = remix(buffer, mode);
                assert_eq!(remixed.channel_count(), mode.output_channels());
                assert_eq!(remixed.frame_count(), 16);
            }
        }
    }

    #[test]
    fn test_stereo_duplicates_mono() {
        let buffer = SampleBuffer::new(44100, 16, vec![vec![0.25, -0.5, 0.75]]);
        let remixed = remix(buffer, ChannelMode::Stereo);
        assert_eq!(remixed.channel(0), Some(&[0.25, -0.5, 0.75][..]));
        assert_eq!(remixed.channel(1), Some(&[0.25, -0.5, 0.75][..]));
    }

    #[test]
    fn test_stereo_drops_extra_channels() {
        let remixed = remix(three_channels(), ChannelMode::Stereo);
        assert_eq!(remixed.channel(0), Some(&[1.0, 0.1][..]));
        assert_eq!(remixed.channel(1), Some(&[0.5, 0.2][..]));
    }

    #[test]
    fn test_stereo_keeps_stereo() {
        let buffer = SampleBuffer::new(44100, 16, vec![vec![0.1, 0.2], vec![0.3, 0.4]]);
        assert_eq!(remix(buffer.clone(), ChannelMode::Stereo), buffer);
    }

    #[test]
    fn test_mono_left() {
        let remixed = remix(three_channels(), ChannelMode::MonoLeft);
        assert_eq!(remixed.channels(), &[vec![1.0, 0.1]]);
    }

    #[test]
    fn test_mono_right_takes_second_channel() {
        let remixed = remix(three_channels(), ChannelMode::MonoRight);
        assert_eq!(remixed.channels(), &[vec![0.5, 0.2]]);
    }

    #[test]
    fn test_mono_right_promotes_mono_input() {
        let buffer = SampleBuffer::new(44100, 16, vec![vec![0.9, -0.9]]);
        let remixed = remix(buffer, ChannelMode::MonoRight);
        assert_eq!(remixed.channels(), &[vec![0.9, -0.9]]);
    }

    #[test]
    fn test_mono_mix_averages() {
        let remixed = remix(three_channels(), ChannelMode::MonoMix);
        assert_eq!(remixed.channel_count(), 1);
        let mixed = remixed.channel(0).unwrap();
        assert!((mixed[0] - 1.0 / 3.0).abs() < 1e-6);
        assert!((mixed[1] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_mono_mix_mono_is_noop() {
        let buffer = SampleBuffer::new(44100, 16, vec![vec![0.3, 0.6]]);
        assert_eq!(remix(buffer.clone(), ChannelMode::MonoMix), buffer);
    }

    #[test]
    fn test_channel_mode_serde_names() {
        let mode: ChannelMode = serde_yml::from_str("mono-right").unwrap();
        assert_eq!(mode, ChannelMode::MonoRight);
        assert_eq!(serde_yml::to_string(&ChannelMode::MonoMix).unwrap().trim(), "mono-mix");
        assert_eq!(ChannelMode::default(), ChannelMode::Stereo);
        assert_eq!(format!("{}", ChannelMode::MonoLeft), "mono-left");
    }
}
