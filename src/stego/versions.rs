// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Package format versions and their handlers.
//!
//! Every package starts with an 8-byte version code in pixels 0..8. The code
//! selects the [`PackageHandler`] that understands the rest of the layout.
//! An unknown code means the carrier holds no package this build can read;
//! a plain image and one written by a newer version look the same.

use crate::image::ImageData;
use crate::stego::error::StegoError;
use crate::stego::header::{EncodedImageState, PackageHeader};
use crate::stego::options::EncodingOptions;
use crate::stego::payload::Payload;
use crate::stego::v1;

/// Version 1.0.0. Stored on the wire as `FF FF FF FF CA CA DA CC`.
pub const VERSION_1_0_0: u64 = 0xFFFF_FFFF_CACA_DACC;

/// The version new packages are written with.
pub const CURRENT_VERSION: u64 = VERSION_1_0_0;

/// Encode/decode entry points for one package format version.
pub struct PackageHandler {
    pub version_code: u64,
    pub extract_header: fn(&ImageData) -> Result<PackageHeader, StegoError>,
    pub image_state: fn(&ImageData, Option<&PackageHeader>) -> Result<EncodedImageState, StegoError>,
    pub encode_secret: fn(&ImageData, &Payload, &EncodingOptions) -> Result<ImageData, StegoError>,
    pub decode: fn(&ImageData, &PackageHeader, Option<&str>) -> Result<Payload, StegoError>,
    /// Header length with or without password fields.
    pub header_len: fn(bool) -> usize,
    /// Exact pixel count `encode_secret` would use.
    pub encoded_len: fn(&Payload, &EncodingOptions) -> Result<usize, StegoError>,
}

impl PackageHandler {
    pub fn extract_header(&self, image: &ImageData) -> Result<PackageHeader, StegoError> {
        (self.extract_header)(image)
    }

    pub fn image_state(
        &self,
        image: &ImageData,
        header: Option<&PackageHeader>,
    ) -> Result<EncodedImageState, StegoError> {
        (self.image_state)(image, header)
    }

    pub fn encode_secret(
        &self,
        original: &ImageData,
        payload: &Payload,
        options: &EncodingOptions,
    ) -> Result<ImageData, StegoError> {
        (self.encode_secret)(original, payload, options)
    }

    pub fn decode(
        &self,
        image: &ImageData,
        header: &PackageHeader,
        password: Option<&str>,
    ) -> Result<Payload, StegoError> {
        (self.decode)(image, header, password)
    }

    pub fn header_len(&self, has_password: bool) -> usize {
        (self.header_len)(has_password)
    }

    pub fn encoded_len(&self, payload: &Payload, options: &EncodingOptions) -> Result<usize, StegoError> {
        (self.encoded_len)(payload, options)
    }
}

impl core::fmt::Debug for PackageHandler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PackageHandler")
            .field("version_code", &format_args!("{:#018x}", self.version_code))
            .finish_non_exhaustive()
    }
}

/// All handlers this build knows, oldest first.
static HANDLERS: [&PackageHandler; 1] = [&v1::HANDLER];

/// True if a handler exists for `version_code`.
pub fn is_supported(version_code: u64) -> bool {
    handler(version_code).is_some()
}

/// Handler for `version_code`, if this build supports it.
pub fn handler(version_code: u64) -> Option<&'static PackageHandler> {
    HANDLERS.iter().copied().find(|h| h.version_code == version_code)
}

/// Version codes of every supported format.
pub fn supported_versions() -> impl Iterator<Item = u64> {
    HANDLERS.iter().map(|h| h.version_code)
}
