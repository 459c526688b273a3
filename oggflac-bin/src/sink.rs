// Copyright 2023-2024 Google LLC
// Copyright 2025- oggflac developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Output sinks for decoded samples.

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use oggflac::component::StreamInfo;
use oggflac::config;
use oggflac::pcm;

/// Trait for the destinations of interleaved samples.
pub trait Sink {
    /// Writes interleaved samples in the native bit depth.
    ///
    /// Returns the number of bytes written.
    fn write_samples(&mut self, samples: &[i32]) -> Result<usize, std::io::Error>;

    /// Flushes and closes the output.
    fn finalize(self: Box<Self>) -> Result<(), std::io::Error>;
}

/// WAV writer based on `hound`.
pub struct WavSink {
    writer: hound::WavWriter<BufWriter<File>>,
    shift: u32,
    bytes_per_sample: usize,
}

impl WavSink {
    /// Creates a WAV file with the container width rounded up to bytes.
    pub fn create<P: AsRef<Path>>(path: P, info: &StreamInfo) -> Result<Self, hound::Error> {
        let bytes_per_sample = info.bits_per_sample().div_ceil(8);
        let spec = hound::WavSpec {
            channels: info.channels() as u16,
            sample_rate: info.sample_rate() as u32,
            bits_per_sample: (bytes_per_sample * 8) as u16,
            sample_format: hound::SampleFormat::Int,
        };
        Ok(Self {
            writer: hound::WavWriter::create(path, spec)?,
            shift: (bytes_per_sample * 8 - info.bits_per_sample()) as u32,
            bytes_per_sample,
        })
    }
}

pub fn into_io_error(e: hound::Error) -> std::io::Error {
    match e {
        hound::Error::IoError(e) => e,
        e => std::io::Error::new(std::io::ErrorKind::Other, e),
    }
}

impl Sink for WavSink {
    fn write_samples(&mut self, samples: &[i32]) -> Result<usize, std::io::Error> {
        for v in samples {
            self.writer
                .write_sample(v << self.shift)
                .map_err(into_io_error)?;
        }
        Ok(samples.len() * self.bytes_per_sample)
    }

    fn finalize(self: Box<Self>) -> Result<(), std::io::Error> {
        self.writer.finalize().map_err(into_io_error)
    }
}

/// Raw PCM writer following [`config::Pcm`].
pub struct RawSink {
    writer: BufWriter<File>,
    bits_per_sample: usize,
    format: config::Pcm,
    buffer: Vec<u8>,
}

impl RawSink {
    pub fn create<P: AsRef<Path>>(
        path: P,
        info: &StreamInfo,
        format: config::Pcm,
    ) -> Result<Self, std::io::Error> {
        Ok(Self {
            writer: BufWriter::new(File::create(path)?),
            bits_per_sample: info.bits_per_sample(),
            format,
            buffer: vec![],
        })
    }
}

impl Sink for RawSink {
    fn write_samples(&mut self, samples: &[i32]) -> Result<usize, std::io::Error> {
        self.buffer.clear();
        pcm::append_pcm_bytes(samples, self.bits_per_sample, &self.format, &mut self.buffer);
        self.writer.write_all(&self.buffer)?;
        Ok(self.buffer.len())
    }

    fn finalize(mut self: Box<Self>) -> Result<(), std::io::Error> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_sink_follows_pcm_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.raw");
        let info = StreamInfo::new(8000, 1, 16).unwrap();
        let format = config::Pcm {
            bytes_per_sample: 2,
            big_endian: false,
        };
        let mut sink: Box<dyn Sink> = Box::new(RawSink::create(&path, &info, format).unwrap());
        assert_eq!(sink.write_samples(&[1, -1]).unwrap(), 4);
        sink.finalize().unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), [0x01, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn wav_sink_pads_to_byte_width() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let info = StreamInfo::new(8000, 2, 12).unwrap();
        let mut sink: Box<dyn Sink> = Box::new(WavSink::create(&path, &info).unwrap());
        assert_eq!(sink.write_samples(&[1, -1]).unwrap(), 4);
        sink.finalize().unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().bits_per_sample, 16);
        let samples: Vec<i32> = reader.samples::<i32>().map(Result::unwrap).collect();
        assert_eq!(samples, [16, -16]);
    }
}
