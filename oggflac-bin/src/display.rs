// Copyright 2023 Google LLC
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

//! A module for a fancy output for "oggflac-bin".

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use oggflac::component::StreamInfo;
use oggflac::component::VorbisComment;
use termcolor::Color;
use termcolor::ColorChoice;
use termcolor::ColorSpec;
use termcolor::StandardStream;
use termcolor::WriteColor;

const CRATE_VERSION: &str = match option_env!("CARGO_PKG_VERSION") {
    Some(v) => v,
    None => "unknown",
};
const DEFAULT_CONFIG_NAME: &str = "[default]";
const UNKNOWN_NAME: &str = "[unknown]";

pub struct IoArgs {
    config_path: Option<PathBuf>,
    input_path: PathBuf,
    output_path: Option<PathBuf>,
}

fn file_name_or_unknown(path: &Path) -> String {
    path.file_name().map_or_else(
        || UNKNOWN_NAME.to_owned(),
        |s| s.to_string_lossy().to_string(),
    )
}

impl IoArgs {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>, R: AsRef<Path>>(
        config_path: &Option<P>,
        input_path: Q,
        output_path: &Option<R>,
    ) -> Self {
        Self {
            config_path: config_path.as_ref().map(|x| x.as_ref().to_path_buf()),
            input_path: input_path.as_ref().to_path_buf(),
            output_path: output_path.as_ref().map(|x| x.as_ref().to_path_buf()),
        }
    }

    pub fn output_name(&self) -> String {
        self.output_path
            .as_ref()
            .map_or_else(|| UNKNOWN_NAME.to_owned(), |p| file_name_or_unknown(p))
    }

    pub fn input_name(&self) -> String {
        file_name_or_unknown(&self.input_path)
    }

    pub fn config_name(&self) -> String {
        self.config_path.as_ref().map_or_else(
            || DEFAULT_CONFIG_NAME.to_owned(),
            |p| {
                p.file_stem().map_or_else(
                    || UNKNOWN_NAME.to_owned(),
                    |n| n.to_string_lossy().to_string(),
                )
            },
        )
    }
}

pub enum Progress {
    Started,
    Done {
        bytes_written: usize,
        samples: u64,
        decode_time: Duration,
    },
}

fn terminal_output() -> Arc<termcolor::StandardStream> {
    Arc::new(StandardStream::stderr(ColorChoice::Auto))
}

/// Show the initial banner.
pub fn show_banner() -> Result<(), std::io::Error> {
    let termout = terminal_output();
    let mut termout = termout.lock();
    termout.set_color(ColorSpec::new().set_bold(true))?;
    write!(termout, "\n{:>10} ", "oggflacdec")?;
    termout.reset()?;
    writeln!(
        termout,
        "(engine v{}, CLI v{})",
        oggflac::constant::build_info::CRATE_VERSION,
        CRATE_VERSION
    )?;
    termout.set_color(ColorSpec::new().set_dimmed(true))?;
    writeln!(
        termout,
        "{:>10} [{}]",
        "",
        oggflac::constant::build_info::FEATURES
    )?;
    termout.reset()
}

fn write_label(termout: &mut impl WriteColor, label: &str) -> Result<(), std::io::Error> {
    termout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    write!(termout, "{label:>10} ")?;
    termout.reset()
}

/// Shows STREAMINFO and Vorbis comments.
pub fn show_stream_info(
    serial: u32,
    info: &StreamInfo,
    comment: Option<&VorbisComment>,
) -> Result<(), std::io::Error> {
    let termout = terminal_output();
    let mut termout = termout.lock();
    write_label(&mut termout, "Stream")?;
    writeln!(
        termout,
        "serial={serial:#010x} {} Hz, {} ch, {} bits, {} samples",
        info.sample_rate(),
        info.channels(),
        info.bits_per_sample(),
        info.total_samples()
    )?;
    write_label(&mut termout, "Blocks")?;
    writeln!(
        termout,
        "block_size={}..={} frame_size={}..={}",
        info.min_block_size(),
        info.max_block_size(),
        info.min_frame_size(),
        info.max_frame_size()
    )?;
    if info.has_md5_digest() {
        write_label(&mut termout, "MD5")?;
        for b in info.md5_digest() {
            write!(termout, "{b:02x}")?;
        }
        writeln!(termout)?;
    }
    if let Some(comment) = comment {
        write_label(&mut termout, "Vendor")?;
        writeln!(termout, "{}", comment.vendor())?;
        for c in comment.comments() {
            write_label(&mut termout, "Comment")?;
            writeln!(termout, "{c}")?;
        }
    }
    Ok(())
}

pub fn show_progress(io: &IoArgs, progress: &Progress) -> Result<(), std::io::Error> {
    let termout = terminal_output();
    let mut termout = termout.lock();
    match *progress {
        Progress::Started => {
            termout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
            write!(termout, "{:>10} ", "Decoding")?;
            termout.reset()?;
            writeln!(
                termout,
                "{} => {} [{}]",
                io.input_name(),
                io.output_name(),
                io.config_name()
            )
        }
        Progress::Done {
            bytes_written,
            samples,
            decode_time,
        } => {
            termout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
            write!(termout, "{:>10} ", "Decoded")?;
            termout.reset()?;
            writeln!(
                termout,
                "{} [{} bytes, {} samples, {:.3} sec]",
                io.output_name(),
                bytes_written,
                samples,
                decode_time.as_secs_f64()
            )?;
            writeln!(termout)
        }
    }
}
