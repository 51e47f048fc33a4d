// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Carrier image representation.
//!
//! A carrier is a row-major buffer of 32-bit ARGB pixels (`0xAARRGGBB`).
//! [`ImageData`] is immutable once built; encoding always produces a new
//! buffer. The [`bits`] submodule reads and writes secret bytes in the
//! low bits of each channel.

pub mod bits;

use crate::stego::error::StegoError;

/// An ARGB pixel buffer with its dimensions.
///
/// Invariant: `pixels.len() == width * height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl ImageData {
    /// Wrap an ARGB pixel buffer.
    ///
    /// # Errors
    /// [`StegoError::InvalidLength`] if `pixels.len() != width * height`.
    pub fn new(pixels: Vec<u32>, width: u32, height: u32) -> Result<Self, StegoError> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(StegoError::InvalidLength { expected, actual: pixels.len() });
        }
        Ok(Self { pixels, width, height })
    }

    /// Build a carrier from tightly packed, non-premultiplied RGBA8 bytes.
    pub fn from_rgba8(rgba: &[u8], width: u32, height: u32) -> Result<Self, StegoError> {
        let count = pixel_count(width, height)?;
        let expected = count
            .checked_mul(4)
            .ok_or(StegoError::ImageTooLarge { width, height })?;
        if rgba.len() != expected {
            return Err(StegoError::InvalidLength { expected, actual: rgba.len() });
        }
        let pixels = rgba
            .chunks_exact(4)
            .map(|px| u32::from_be_bytes([px[3], px[0], px[1], px[2]]))
            .collect();
        Ok(Self { pixels, width, height })
    }

    /// Convert back to tightly packed RGBA8 bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for &px in &self.pixels {
            let [a, r, g, b] = px.to_be_bytes();
            out.extend_from_slice(&[r, g, b, a]);
        }
        out
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels, which is also the byte capacity of the carrier.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Consume the image and return its pixel buffer.
    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }
}

fn pixel_count(width: u32, height: u32) -> Result<usize, StegoError> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(StegoError::ImageTooLarge { width, height })
}
