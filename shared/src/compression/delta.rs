use tidal_serde::{read_var_int, write_var_int, ByteReader, ByteWrite};

use super::error::DeltaError;

/// Writes `value` as a difference against `baseline`.
///
/// The block starts with `ceil(len / 8)` mask bytes, bit `i % 8` of mask byte
/// `i / 8` set when byte `i` differs. Only the differing bytes follow, in
/// ascending order.
pub fn compress_delta(
    value: &[u8],
    baseline: &[u8],
    writer: &mut dyn ByteWrite,
) -> Result<(), DeltaError> {
    if value.len() != baseline.len() {
        return Err(DeltaError::LengthMismatch {
            value: value.len(),
            baseline: baseline.len(),
        });
    }

    for (value_chunk, baseline_chunk) in value.chunks(8).zip(baseline.chunks(8)) {
        let mut mask: u8 = 0;
        for (bit, (current, previous)) in value_chunk.iter().zip(baseline_chunk).enumerate() {
            if current != previous {
                mask |= 1 << bit;
            }
        }
        writer.write_byte(mask);
    }

    for (current, previous) in value.iter().zip(baseline) {
        if current != previous {
            writer.write_byte(*current);
        }
    }

    Ok(())
}

/// Rebuilds a value from a block written by [`compress_delta`] and the same
/// baseline.
pub fn decompress_delta(reader: &mut ByteReader, baseline: &[u8]) -> Result<Vec<u8>, DeltaError> {
    let mask_length = baseline.len().div_ceil(8);
    let masks = reader.read_bytes(mask_length)?;

    let mut output = baseline.to_vec();
    for (index, byte) in output.iter_mut().enumerate() {
        if masks[index / 8] & (1 << (index % 8)) != 0 {
            *byte = reader.read_byte()?;
        }
    }

    Ok(output)
}

/// Writes the difference between two counters as a zig-zag varint, so slowly
/// moving values (ticks, sequence numbers) cost a single byte
pub fn compress_var_delta(value: u64, baseline: u64, writer: &mut dyn ByteWrite) {
    write_var_int(writer, value.wrapping_sub(baseline) as i64);
}

pub fn decompress_var_delta(reader: &mut ByteReader, baseline: u64) -> Result<u64, DeltaError> {
    let difference = read_var_int(reader)?;
    Ok(baseline.wrapping_add(difference as u64))
}
