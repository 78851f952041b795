extern crate clap;
extern crate mpeg2pes;
#[macro_use]
extern crate trackable;

use clap::{App, Arg};
use mpeg2pes::es::StreamId;
use mpeg2pes::pes::PesHeaderDecoder;
use std::io::Read;
use trackable::error::Failure;

const PACK_START_CODE: u8 = 0xBA;
const SYSTEM_HEADER_START_CODE: u8 = 0xBB;

fn main() {
    let matches = App::new("parse")
        .arg(
            Arg::with_name("OUTPUT_TYPE")
                .long("output-type")
                .short("o")
                .takes_value(true)
                .possible_values(&["header", "stream-id"])
                .default_value("header"),
        )
        .arg(
            Arg::with_name("STRICT")
                .long("strict")
                .short("s")
                .takes_value(false),
        )
        .get_matches();

    let mut input = Vec::new();
    track_try_unwrap!(std::io::stdin()
        .read_to_end(&mut input)
        .map_err(Failure::from_error));

    let decoder = if matches.is_present("STRICT") {
        PesHeaderDecoder::new().with_strict_marker_bits(true)
    } else {
        PesHeaderDecoder::new()
    };

    let mut seen: Vec<u8> = Vec::new();
    let mut offset = 0;
    while let Some(start) = find_start_code(&input[offset..]) {
        let pos = offset + start;
        let id = input[pos + 3];
        offset = pos + 3;
        if id == PACK_START_CODE || id == SYSTEM_HEADER_START_CODE || id < 0xBC {
            continue;
        }
        if !StreamId::new(id).has_optional_header() {
            continue;
        }

        match decoder.decode(&input[pos..]) {
            Ok(Some((header, consumed))) => {
                match matches.value_of("OUTPUT_TYPE").unwrap() {
                    "header" => println!("@{} {:?} ({} bytes)", pos, header, consumed),
                    "stream-id" => {
                        if !seen.contains(&id) {
                            seen.push(id);
                            println!("0x{:0X?}", id);
                        }
                    }
                    _ => unreachable!(),
                }
                offset = pos + consumed;
            }
            Ok(None) => {
                eprintln!("@{} truncated header", pos);
                break;
            }
            Err(e) => eprintln!("@{} {}", pos, e),
        }
    }
}

fn find_start_code(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w[0] == 0 && w[1] == 0 && w[2] == 1)
}
