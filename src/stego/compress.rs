// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Deflate compression of the payload.
//!
//! Streams use the zlib container (2-byte header, Adler-32 trailer) at the
//! default compression level, which is what v1 packages were written with.

use crate::stego::error::StegoError;
use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use std::io::Write;

/// Upper bound on inflated output, to stop decompression bombs.
pub const MAX_INFLATED_LEN: u64 = 512 * 1024 * 1024;

/// Compress `data` into a zlib stream.
pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len() / 2 + 16), Compression::default());
    encoder.write_all(data).expect("zlib compression into a Vec should not fail");
    encoder.finish().expect("zlib compression into a Vec should not fail")
}

/// Inflate a zlib stream.
///
/// The stream must run to its end marker; input that stops early is
/// rejected rather than returning a partial payload. Bytes after the end
/// marker are ignored.
///
/// # Errors
/// [`StegoError::CorruptData`] if the input is not a complete, valid stream
/// or inflates past [`MAX_INFLATED_LEN`].
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, StegoError> {
    let mut inflater = Decompress::new(true);
    let mut output = Vec::with_capacity(data.len().saturating_mul(3).max(64));

    loop {
        if output.len() == output.capacity() {
            output.reserve(output.len().max(4096));
        }
        let consumed = inflater.total_in() as usize;
        let (in_before, out_before) = (inflater.total_in(), inflater.total_out());
        let status = inflater
            .decompress_vec(&data[consumed..], &mut output, FlushDecompress::Finish)
            .map_err(|_| StegoError::CorruptData)?;

        if inflater.total_out() > MAX_INFLATED_LEN {
            return Err(StegoError::CorruptData);
        }
        match status {
            Status::StreamEnd => return Ok(output),
            Status::Ok | Status::BufError => {
                let stalled = inflater.total_in() == in_before && inflater.total_out() == out_before;
                if stalled && output.len() < output.capacity() {
                    // Input exhausted before the end marker.
                    return Err(StegoError::CorruptData);
                }
            }
        }
    }
}
