// Copyright 2024 Google LLC
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

//! Command-line decoder for Ogg FLAC files.

// Note that clippy attributes should be in sync with those declared in "lib.rs"
#![warn(clippy::all, clippy::nursery, clippy::pedantic, clippy::cargo)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate
)]
// Some from restriction lint-group
#![warn(
    clippy::clone_on_ref_ptr,
    clippy::create_dir,
    clippy::dbg_macro,
    clippy::empty_structs_with_brackets,
    clippy::exit,
    clippy::if_then_some_else_none,
    clippy::impl_trait_in_params,
    clippy::lossy_float_literal,
    clippy::multiple_inherent_impl,
    clippy::print_stdout,
    clippy::rc_buffer,
    clippy::rc_mutex,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::separated_literal_suffix,
    clippy::str_to_string,
    clippy::string_add,
    clippy::string_to_string,
    clippy::try_err,
    clippy::unnecessary_self_imports,
    clippy::wildcard_enum_match_arm
)]

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use clap::Parser;
use log::info;
use log::warn;

use oggflac::config;
use oggflac::error::Verified;
use oggflac::error::Verify;
use oggflac::source::FileSource;
use oggflac::FlacStream;

mod display;
mod sink;

use display::Progress;
use sink::RawSink;
use sink::Sink;
use sink::WavSink;

/// Ogg FLAC decoder.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path for the output file. WAV is written if the extension is "wav".
    #[clap(short, long)]
    output: Option<String>,
    /// Path for the input Ogg FLAC file.
    source: String,
    /// If set, load config from the specified file.
    #[clap(short, long)]
    config: Option<String>,
    /// If set, dump the config used to the specified path.
    #[clap(long)]
    dump_config: Option<String>,
    /// If set, write headerless PCM even if the output path ends with ".wav".
    #[clap(long)]
    raw: bool,
    /// If set, skip frames that fail to decode instead of aborting.
    #[clap(long)]
    keep_going: bool,
}

/// Exit codes of the decoder process.
enum ExitCode {
    #[allow(dead_code)]
    Normal = 0,
    InvalidConfig = -1,
    InputError = -2,
    DecodeError = -3,
    OutputError = -4,
}

fn load_config(path: Option<&str>) -> Result<Verified<config::Decoder>, i32> {
    let decoder_config = match path {
        None => config::Decoder::default(),
        Some(path) => {
            let conf_str = std::fs::read_to_string(path).map_err(|e| {
                eprintln!("Error: Config file read error: {e}");
                ExitCode::InvalidConfig as i32
            })?;
            toml::from_str(&conf_str).map_err(|e| {
                eprintln!("Error: Config file syntax error: {e}");
                ExitCode::InvalidConfig as i32
            })?
        }
    };
    decoder_config.into_verified().map_err(|(_, e)| {
        eprintln!("Error: {}", e.within("decoder_config"));
        ExitCode::InvalidConfig as i32
    })
}

fn create_sink(
    path: &str,
    raw: bool,
    stream_info: &oggflac::component::StreamInfo,
    pcm: &config::Pcm,
) -> Result<Box<dyn Sink>, std::io::Error> {
    let is_wav = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
    if is_wav && !raw {
        let sink = WavSink::create(path, stream_info).map_err(sink::into_io_error)?;
        Ok(Box::new(sink))
    } else {
        Ok(Box::new(RawSink::create(path, stream_info, pcm.clone())?))
    }
}

fn log_build_constants() {
    info!(
        target: "oggflac-bin::build_info::jsonl",
        "{{ version: \"{}\", features: \"{}\" }}",
        oggflac::constant::build_info::CRATE_VERSION,
        oggflac::constant::build_info::FEATURES,
    );
}

#[allow(clippy::let_underscore_must_use)]
fn main_body(args: Args) -> Result<(), i32> {
    let io_info = display::IoArgs::new(&args.config, &args.source, &args.output);
    let _ = display::show_banner();
    log_build_constants();
    let decoder_config = load_config(args.config.as_deref())?;

    if let Some(path) = &args.dump_config {
        let dumped = toml::to_string(&*decoder_config).map_err(|e| {
            eprintln!("Error: Config serialization failed: {e}");
            ExitCode::InvalidConfig as i32
        })?;
        let mut file = File::create(path).map_err(|e| {
            eprintln!("Error: Failed to create a file: {e}");
            ExitCode::OutputError as i32
        })?;
        file.write_all(dumped.as_bytes()).map_err(|e| {
            eprintln!("Error: File write failed: {e}");
            ExitCode::OutputError as i32
        })?;
    }

    let pcm_config = decoder_config.pcm.clone();
    let mut stream = FileSource::open(&args.source)
        .and_then(|src| FlacStream::open_with_config(src, decoder_config))
        .map_err(|e| {
            eprintln!("Error: Failed to open the input: {e}");
            ExitCode::InputError as i32
        })?;
    let serial = stream.serial();
    let _ = display::show_stream_info(serial, stream.stream_info(), stream.vorbis_comment());

    let Some(output) = &args.output else {
        return Ok(());
    };
    let mut sink = create_sink(output, args.raw, stream.stream_info(), &pcm_config)
        .map_err(|e| {
            eprintln!("Error: Failed to create the output: {e}");
            ExitCode::OutputError as i32
        })?;

    let _ = display::show_progress(&io_info, &Progress::Started);
    let decode_start = Instant::now();
    let mut bytes_written = 0;
    let mut samples = vec![];
    loop {
        samples.clear();
        match stream.read_samples(&mut samples) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if args.keep_going && e.is_format_error() => {
                warn!("Skipping a broken frame: {e}");
                continue;
            }
            Err(e) => {
                eprintln!("Error: {e}");
                return Err(ExitCode::DecodeError as i32);
            }
        }
        bytes_written += sink.write_samples(&samples).map_err(|e| {
            eprintln!("Error: Output write failed: {e}");
            ExitCode::OutputError as i32
        })?;
    }
    sink.finalize().map_err(|e| {
        eprintln!("Error: Output write failed: {e}");
        ExitCode::OutputError as i32
    })?;

    let _ = display::show_progress(
        &io_info,
        &Progress::Done {
            bytes_written,
            samples: stream.sample_position(),
            decode_time: decode_start.elapsed(),
        },
    );
    Ok(())
}

fn main() -> Result<(), i32> {
    env_logger::Builder::from_env("OGGFLAC_LOG")
        .format_timestamp(None)
        .init();
    main_body(Args::parse())
}
