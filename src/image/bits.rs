// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Two-bits-per-channel LSB packing.
//!
//! Each secret byte occupies one ARGB pixel. The byte is split into four
//! 2-bit groups, most significant first, stored in the low two bits of the
//! alpha, red, green and blue channels:
//!
//! ```text
//! secret byte   b7 b6 | b5 b4 | b3 b2 | b1 b0
//! pixel bits    25 24 | 17 16 |  9  8 |  1  0
//!               alpha    red    green   blue
//! ```

use crate::stego::error::StegoError;

/// Pixel bits that carry secret data.
pub const PAYLOAD_MASK: u32 = 0x0303_0303;

/// Spread one byte over the four channel fields of a pixel.
#[inline]
fn spread(byte: u8) -> u32 {
    let b = byte as u32;
    ((b & 0xC0) << 18) | ((b & 0x30) << 12) | ((b & 0x0C) << 6) | (b & 0x03)
}

/// Gather the four channel fields of a pixel back into one byte.
#[inline]
fn gather(pixel: u32) -> u8 {
    let p = pixel & PAYLOAD_MASK;
    ((p >> 18) | (p >> 12) | (p >> 6) | p) as u8
}

fn check_range(offset: usize, len: usize, available: usize) -> Result<(), StegoError> {
    match offset.checked_add(len) {
        Some(end) if end <= available => Ok(()),
        _ => Err(StegoError::OutOfRange { offset, len, available }),
    }
}

/// Write `bytes` into `pixels`, one byte per pixel, starting at pixel `offset`.
///
/// The target bits are cleared before the secret bits are set, so carriers
/// with non-zero low bits are handled correctly. Pixels outside the written
/// range are untouched.
///
/// # Errors
/// [`StegoError::OutOfRange`] if `offset + bytes.len()` exceeds the buffer.
pub fn write_bytes(pixels: &mut [u32], bytes: &[u8], offset: usize) -> Result<(), StegoError> {
    check_range(offset, bytes.len(), pixels.len())?;
    for (pixel, &byte) in pixels[offset..].iter_mut().zip(bytes) {
        *pixel = (*pixel & !PAYLOAD_MASK) | spread(byte);
    }
    Ok(())
}

/// Read `len` bytes starting at pixel `offset`; `None` reads to the end of
/// the buffer.
///
/// # Errors
/// [`StegoError::OutOfRange`] if the requested range exceeds the buffer.
pub fn extract_bytes(
    pixels: &[u32],
    len: Option<usize>,
    offset: usize,
) -> Result<Vec<u8>, StegoError> {
    let available = pixels.len();
    let len = match len {
        Some(n) => n,
        None => available
            .checked_sub(offset)
            .ok_or(StegoError::OutOfRange { offset, len: 0, available })?,
    };
    check_range(offset, len, available)?;
    Ok(pixels[offset..offset + len].iter().map(|&p| gather(p)).collect())
}
