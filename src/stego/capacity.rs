// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Carrier capacity and package size estimation.
//!
//! One package byte occupies one pixel, so a carrier holds at most
//! `width * height` package bytes, header included.

use crate::image::ImageData;
use crate::stego::error::StegoError;
use crate::stego::options::EncodingOptions;
use crate::stego::payload::Payload;
use crate::stego::versions::{self, PackageHandler};

fn handler_for(options: &EncodingOptions) -> Result<&'static PackageHandler, StegoError> {
    versions::handler(options.version_code).ok_or(StegoError::UnknownVersion(options.version_code))
}

/// Total package bytes `image` can hold.
pub fn capacity(image: &ImageData) -> usize {
    image.len()
}

/// Bytes left for the stored payload once the header for `options` is
/// written.
///
/// # Errors
/// [`StegoError::UnknownVersion`] if `options.version_code` is unsupported.
pub fn max_payload_len(image: &ImageData, options: &EncodingOptions) -> Result<usize, StegoError> {
    let header = handler_for(options)?.header_len(options.password.is_some());
    Ok(capacity(image).saturating_sub(header))
}

/// Exact number of pixels encoding `payload` with `options` would use.
///
/// Runs compression when enabled but skips encryption; the ciphertext
/// length follows from the padding rule.
///
/// # Errors
/// - [`StegoError::UnknownVersion`] if `options.version_code` is unsupported.
/// - [`StegoError::InvalidPayload`] if the payload cannot be serialized.
pub fn encoded_len(payload: &Payload, options: &EncodingOptions) -> Result<usize, StegoError> {
    handler_for(options)?.encoded_len(payload, options)
}

/// True if `payload` would fit in `image` with `options`.
pub fn fits(image: &ImageData, payload: &Payload, options: &EncodingOptions) -> Result<bool, StegoError> {
    Ok(encoded_len(payload, options)? <= capacity(image))
}
