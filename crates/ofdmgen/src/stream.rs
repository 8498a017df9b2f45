use std::io::{ErrorKind, Read, Write};

use ofdmgen_modem::wire::{decode_samples, encode_samples, Endianness};
use ofdmgen_modem::OfdmGenerator;

/// Feed `reader` through `generator` one call at a time until end of input.
///
/// Returns the number of calls made. Input that ends partway through a
/// call's worth of samples is an error.
pub fn run(
    generator: &mut OfdmGenerator,
    reader: &mut impl Read,
    writer: &mut impl Write,
    input_order: Endianness,
    output_order: Endianness,
) -> Result<u64, Box<dyn std::error::Error>> {
    let format = generator.format();
    let mut raw = vec![0u8; format.input_bytes()];
    let mut time_domain = Vec::with_capacity(format.output_samples);
    let mut encoded = Vec::with_capacity(format.output_bytes());
    let mut calls = 0u64;

    loop {
        let filled = read_full(reader, &mut raw)?;
        if filled == 0 {
            break;
        }
        if filled < raw.len() {
            return Err(format!(
                "input ends with a partial frame: {} of {} bytes",
                filled,
                raw.len()
            )
            .into());
        }

        let carriers = decode_samples(&raw, input_order)?;
        generator.process(&carriers, &mut time_domain)?;

        encoded.clear();
        encode_samples(&time_domain, output_order, &mut encoded);
        writer.write_all(&encoded)?;
        calls += 1;
    }

    writer.flush()?;
    log::info!("generated {} frames", calls);
    Ok(calls)
}

fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
