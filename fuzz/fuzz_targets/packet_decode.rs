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

#![no_main]

use arbitrary::Arbitrary;
use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;

use oggflac::component::parser;
use oggflac::component::Decode;
use oggflac::component::StreamInfo;
use oggflac::ogg::Demuxer;
use oggflac::source::MemSource;
use oggflac::stream::PacketDecoder;

fn arbitrary_stream_info(u: &mut Unstructured) -> Result<StreamInfo, arbitrary::Error> {
    let sample_rate = u.int_in_range(1..=655_350usize)?;
    let channels = u.int_in_range(1..=8usize)?;
    let bits_per_sample = u.int_in_range(4..=32usize)?;
    let mut info = StreamInfo::new(sample_rate, channels, bits_per_sample)
        .map_err(|_| arbitrary::Error::IncorrectFormat)?;
    let block_size = u.int_in_range(16..=65535usize)?;
    info.set_block_sizes(block_size, block_size)
        .map_err(|_| arbitrary::Error::IncorrectFormat)?;
    Ok(info)
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(info) = arbitrary_stream_info(&mut u) else {
        return;
    };
    let verify_crc = bool::arbitrary(&mut u).unwrap_or(false);
    let rest = u.take_rest();

    // Frame decoder must never panic on arbitrary packets.
    if let Ok(frame) = parser::frame(rest, &info, verify_crc) {
        let signal = frame.decode();
        assert_eq!(signal.len(), frame.block_size() * frame.subframe_count());
    }

    // A failing packet must not change the state of the packet decoder.
    let mut decoder = PacketDecoder::new(verify_crc);
    let mode = decoder.mode();
    if decoder.decode_packet(rest).is_err() {
        assert_eq!(decoder.mode(), mode);
    }

    // Demuxer over arbitrary bytes.
    let mut demuxer = Demuxer::with_crc_check(MemSource::from_bytes(rest.to_vec()), verify_crc);
    if let Ok(Some(serial)) = demuxer.first_serial() {
        while let Ok(Some(_packet)) = demuxer.next_packet(serial) {}
    }
});
