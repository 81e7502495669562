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
use std::fs::File;
use std::path::Path;
use std::time::Duration;

use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, Packet};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::default::{get_codecs, get_probe};

use super::error::SampleSourceError;
use super::traits::SampleSource;

/// Bits per sample reported when the container doesn't say.
const DEFAULT_BITS_PER_SAMPLE: u16 = 16;

/// A sample source that decodes audio files (WAV, AIFF, FLAC, MP3, etc.) with symphonia
/// and hands out planar f32 samples scaled to [-1.0, 1.0].
pub struct AudioSampleSource {
    format_reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    is_finished: bool,
    /// Decoded frames that haven't been handed out yet (planar).
    pending: Vec<Vec<f32>>,
    /// Read position within `pending`, in frames.
    pending_position: usize,
    bits_per_sample: u16,
    channels: u16,
    sample_rate: u32,
    duration: Option<Duration>,
}

impl SampleSource for AudioSampleSource {
    fn next_chunk(
        &mut self,
        output: &mut [Vec<f32>],
        max_frames: usize,
    ) -> Result<usize, SampleSourceError> {
        let num_channels = self.channels as usize;
        if output.len() != num_channels {
            return Err(SampleSourceError::SampleConversionFailed(format!(
                "Output has {} channels, expected {}",
                output.len(),
                num_channels
            )));
        }

        for ch in output.iter_mut() {
            ch.clear();
        }

        let mut written = 0;
        while written < max_frames {
            let available = self.pending_frames();
            if available > 0 {
                let to_copy = available.min(max_frames - written);
                let start = self.pending_position;
                for (out_ch, pending_ch) in output.iter_mut().zip(self.pending.iter()) {
                    out_ch.extend_from_slice(&pending_ch[start..start + to_copy]);
                }
                self.pending_position += to_copy;
                written += to_copy;
                continue;
            }

            if self.is_finished {
                break;
            }

            match Self::read_and_decode_next_packet_for_track(
                self.format_reader.as_mut(),
                self.decoder.as_mut(),
                self.track_id,
            )? {
                Some((planes, _)) => {
                    self.pending = planes;
                    self.pending_position = 0;
                    // A packet that disagrees with the track's channel layout can't be
                    // copied into the caller's buffers.
                    if self.pending.len() != num_channels {
                        return Err(SampleSourceError::SampleConversionFailed(format!(
                            "Decoded packet has {} channels, expected {}",
                            self.pending.len(),
                            num_channels
                        )));
                    }
                }
                None => self.is_finished = true,
            }
        }

        Ok(written)
    }

    fn channel_count(&self) -> u16 {
        self.channels
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }
}

impl AudioSampleSource {
    /// Opens and probes an audio file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SampleSourceError> {
        // Open the file (include path in error so user sees which file failed)
        let path_ref = path.as_ref();
        let file = File::open(path_ref).map_err(|e| {
            SampleSourceError::IoError(std::io::Error::new(
                e.kind(),
                format!("{}: {}", path_ref.display(), e),
            ))
        })?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Create a hint to help the format registry guess the format
        let mut hint = Hint::new();
        if let Some(extension) = path_ref.extension().and_then(|ext| ext.to_str()) {
            hint.with_extension(extension);
        }

        let meta_opts: MetadataOptions = Default::default();
        let fmt_opts: FormatOptions = Default::default();
        let file_path = path_ref.to_string_lossy().to_string();
        let probed = get_probe()
            .format(&hint, mss, &fmt_opts, &meta_opts)
            .map_err(|e| SampleSourceError::Unsupported(format!("'{}': {}", file_path, e)))?;

        let mut format_reader = probed.format;

        let track = format_reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| {
                SampleSourceError::Unsupported(format!("'{}': no audio track found", file_path))
            })?;

        let track_id = track.id;
        let params = &track.codec_params;

        let sample_rate = params.sample_rate.ok_or_else(|| {
            SampleSourceError::SampleConversionFailed(format!(
                "'{}': sample rate not specified",
                file_path
            ))
        })?;
        let bits_per_sample = params
            .bits_per_sample
            .map(|bits| bits as u16)
            .unwrap_or(DEFAULT_BITS_PER_SAMPLE);
        let duration = params
            .n_frames
            .map(|n_frames| Duration::from_secs_f64(n_frames as f64 / sample_rate as f64));

        let decoder_opts: DecoderOptions = Default::default();
        let mut decoder = get_codecs()
            .make(params, &decoder_opts)
            .map_err(|e| SampleSourceError::Unsupported(format!("'{}': {}", file_path, e)))?;

        // Prefer container/codec metadata. If it's missing, decode the first
        // packet to find the actual channel count and keep its samples.
        let channels = params.channels.map(|c| c.count() as u16).unwrap_or(0);
        let (channels, pending) = if channels > 0 {
            (channels, Vec::new())
        } else {
            Self::detect_channels_and_prime_buffer(
                format_reader.as_mut(),
                decoder.as_mut(),
                track_id,
            )?
        };

        Ok(Self {
            format_reader,
            decoder,
            track_id,
            is_finished: false,
            pending,
            pending_position: 0,
            bits_per_sample,
            channels,
            sample_rate,
            duration,
        })
    }

    fn pending_frames(&self) -> usize {
        self.pending
            .first()
            .map(|ch| ch.len().saturating_sub(self.pending_position))
            .unwrap_or(0)
    }

    /// Reads the next packet.
    /// - `Ok(Some(packet))` if a packet was read
    /// - `Ok(None)` at end of stream
    /// - `Err(...)` otherwise; ResetRequired is passed up so the decoder can be reset.
    fn read_next_packet(
        format_reader: &mut dyn FormatReader,
    ) -> Result<Option<Packet>, SampleSourceError> {
        match format_reader.next_packet() {
            Ok(packet) => Ok(Some(packet)),
            Err(SymphoniaError::ResetRequired) => {
                Err(SampleSourceError::AudioError(SymphoniaError::ResetRequired))
            }
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                Ok(None)
            }
            // Some readers report a DecodeError at EOF instead of IoError
            Err(SymphoniaError::DecodeError(_)) => Ok(None),
            Err(e) => Err(SampleSourceError::AudioError(e)),
        }
    }

    /// Reads and decodes the next non-empty packet for the given track, resetting the
    /// decoder when asked to. Returns `Ok(None)` at end of stream.
    fn read_and_decode_next_packet_for_track(
        format_reader: &mut dyn FormatReader,
        decoder: &mut dyn Decoder,
        track_id: u32,
    ) -> Result<Option<(Vec<Vec<f32>>, usize)>, SampleSourceError> {
        loop {
            let packet = match Self::read_next_packet(format_reader) {
                Ok(Some(packet)) => packet,
                Ok(None) => return Ok(None),
                Err(SampleSourceError::AudioError(SymphoniaError::ResetRequired)) => {
                    decoder.reset();
                    continue;
                }
                Err(e) => return Err(e),
            };
            if packet.track_id() != track_id {
                continue;
            }
            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::ResetRequired) => {
                    decoder.reset();
                    decoder.decode(&packet)?
                }
                Err(e) => return Err(SampleSourceError::AudioError(e)),
            };
            let (planes, frames) = Self::decode_buffer_to_planar(decoded);
            // Header packets (e.g. Vorbis) decode to zero frames; skip them.
            if !planes.is_empty() && frames > 0 {
                return Ok(Some((planes, frames)));
            }
        }
    }

    /// Decodes the first audio packet to learn the channel count when the container
    /// doesn't report one. The decoded samples become the first pending chunk.
    fn detect_channels_and_prime_buffer(
        format_reader: &mut dyn FormatReader,
        decoder: &mut dyn Decoder,
        track_id: u32,
    ) -> Result<(u16, Vec<Vec<f32>>), SampleSourceError> {
        match Self::read_and_decode_next_packet_for_track(format_reader, decoder, track_id)? {
            Some((planes, _)) => Ok((planes.len() as u16, planes)),
            None => Err(SampleSourceError::SampleConversionFailed(
                "Channels not specified".to_string(),
            )),
        }
    }

    /// Converts a decoded buffer to planar f32 and returns it with its frame count.
    fn decode_buffer_to_planar(decoded: AudioBufferRef) -> (Vec<Vec<f32>>, usize) {
        match decoded {
            AudioBufferRef::F32(buf) => Self::copy_planes(&buf, |sample| sample),
            AudioBufferRef::F64(buf) => Self::copy_planes(&buf, |sample| sample as f32),
            AudioBufferRef::S8(buf) => Self::copy_planes(&buf, Self::scale_s8),
            AudioBufferRef::S16(buf) => Self::copy_planes(&buf, Self::scale_s16),
            AudioBufferRef::S24(buf) => {
                Self::copy_planes(&buf, |sample| Self::scale_s24(sample.inner()))
            }
            AudioBufferRef::S32(buf) => Self::copy_planes(&buf, Self::scale_s32),
            AudioBufferRef::U8(buf) => Self::copy_planes(&buf, Self::scale_u8),
            AudioBufferRef::U16(buf) => Self::copy_planes(&buf, Self::scale_u16),
            AudioBufferRef::U24(buf) => {
                Self::copy_planes(&buf, |sample| Self::scale_u24(sample.inner()))
            }
            AudioBufferRef::U32(buf) => Self::copy_planes(&buf, Self::scale_u32),
        }
    }

    fn copy_planes<T, F>(buf: &AudioBuffer<T>, convert: F) -> (Vec<Vec<f32>>, usize)
    where
        T: symphonia::core::sample::Sample,
        F: Fn(T) -> f32,
    {
        let frames = buf.frames();
        let channels = buf.spec().channels.count();
        let planes = (0..channels)
            .map(|ch| buf.chan(ch)[..frames].iter().map(|s| convert(*s)).collect())
            .collect();
        (planes, frames)
    }

    // Scaling helpers for the integer formats. `pub(crate)` so they can be tested directly.

    #[inline]
    pub(crate) fn scale_s8(sample: i8) -> f32 {
        sample as f32 / (1i64 << 7) as f32
    }

    #[inline]
    pub(crate) fn scale_s16(sample: i16) -> f32 {
        sample as f32 / (1i64 << 15) as f32
    }

    #[inline]
    pub(crate) fn scale_s24(sample: i32) -> f32 {
        sample as f32 / (1i64 << 23) as f32
    }

    #[inline]
    pub(crate) fn scale_s32(sample: i32) -> f32 {
        sample as f32 / (1i64 << 31) as f32
    }

    #[inline]
    pub(crate) fn scale_u8(sample: u8) -> f32 {
        (sample as f32 / u8::MAX as f32) * 2.0 - 1.0
    }

    #[inline]
    pub(crate) fn scale_u16(sample: u16) -> f32 {
        (sample as f32 / u16::MAX as f32) * 2.0 - 1.0
    }

    #[inline]
    pub(crate) fn scale_u24(sample: u32) -> f32 {
        let max = (1u32 << 24) - 1;
        (sample as f32 / max as f32) * 2.0 - 1.0
    }

    #[inline]
    pub(crate) fn scale_u32(sample: u32) -> f32 {
        (sample as f32 / u32::MAX as f32) * 2.0 - 1.0
    }
}
