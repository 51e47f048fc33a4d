// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Secret package encoding and decoding.
//!
//! The functions in this module are the entry points for callers. Each one
//! reads the version code (or takes it from the header or options) and
//! dispatches to the matching [`versions::PackageHandler`]:
//!
//! - [`inspect`]: what does this carrier hold?
//! - [`encode_secret`]: hide a [`Payload`] in a copy of a carrier.
//! - [`decode`]: recover the payload, verifying the password first.

pub mod error;
pub mod fields;
pub mod compress;
pub mod crypto;
pub mod payload;
pub mod options;
pub mod header;
pub mod v1;
pub mod versions;
pub mod capacity;

use log::debug;

use crate::image::bits::extract_bytes;
use crate::image::ImageData;

pub use error::{ErrorKind, StegoError};
pub use header::{EncodedImageState, PackageHeader, PackageHeaderV1, PasswordFields};
pub use options::EncodingOptions;
pub use payload::Payload;
pub use versions::{is_supported, PackageHandler, CURRENT_VERSION, VERSION_1_0_0};

/// Pixels holding the version code.
pub const VERSION_CODE_PIXELS: usize = 8;

/// Read the 8-byte big-endian version code from the first 8 pixels.
///
/// # Errors
/// [`StegoError::ImageTooSmall`] if the image has fewer than 8 pixels.
pub fn version_code(image: &ImageData) -> Result<u64, StegoError> {
    if image.len() < VERSION_CODE_PIXELS {
        return Err(StegoError::ImageTooSmall);
    }
    let bytes = extract_bytes(image.pixels(), Some(VERSION_CODE_PIXELS), 0)?;
    fields::u64_from_bytes(&bytes)
}

fn handler_for(version_code: u64) -> Result<&'static PackageHandler, StegoError> {
    versions::handler(version_code).ok_or(StegoError::UnknownVersion(version_code))
}

/// Parse the package header of `image`.
///
/// # Errors
/// [`StegoError::UnknownVersion`] if the version code has no handler, or
/// any error from the version's header parser.
pub fn extract_header(image: &ImageData) -> Result<PackageHeader, StegoError> {
    handler_for(version_code(image)?)?.extract_header(image)
}

/// State of the package in `image`.
///
/// Uses `header` when given instead of re-reading it. Carriers without a
/// recognized version code are [`EncodedImageState::NoSecret`]; a
/// recognized code followed by an unreadable header is
/// [`EncodedImageState::Corrupted`].
pub fn image_state(image: &ImageData, header: Option<&PackageHeader>) -> Result<EncodedImageState, StegoError> {
    let code = match header {
        Some(h) => h.version_code(),
        None => match version_code(image) {
            Ok(code) => code,
            Err(StegoError::ImageTooSmall) => return Ok(EncodedImageState::NoSecret),
            Err(e) => return Err(e),
        },
    };
    let Some(handler) = versions::handler(code) else {
        debug!("no handler for version {code:#018x}");
        return Ok(EncodedImageState::NoSecret);
    };
    match handler.image_state(image, header) {
        Err(StegoError::ImageTooSmall | StegoError::InvalidHeader(_)) => Ok(EncodedImageState::Corrupted),
        other => other,
    }
}

/// Result of [`inspect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub state: EncodedImageState,
    /// The parsed header, when one could be read.
    pub header: Option<PackageHeader>,
}

/// Classify a newly loaded carrier and keep its header for a later decode.
pub fn inspect(image: &ImageData) -> Result<Inspection, StegoError> {
    let handler = match version_code(image) {
        Ok(code) => versions::handler(code),
        Err(StegoError::ImageTooSmall) => None,
        Err(e) => return Err(e),
    };
    let Some(handler) = handler else {
        return Ok(Inspection { state: EncodedImageState::NoSecret, header: None });
    };
    let header = match handler.extract_header(image) {
        Ok(h) => h,
        Err(StegoError::ImageTooSmall | StegoError::InvalidHeader(_)) => {
            return Ok(Inspection { state: EncodedImageState::Corrupted, header: None });
        }
        Err(e) => return Err(e),
    };
    let state = handler.image_state(image, Some(&header))?;
    Ok(Inspection { state, header: Some(header) })
}

/// Hide `payload` in a copy of `original` using `options.version_code`.
///
/// `original` is never modified.
///
/// # Errors
/// [`StegoError::UnknownVersion`], [`StegoError::SizeLimitExceeded`], or any
/// payload/crypto error from the version's encoder.
pub fn encode_secret(
    original: &ImageData,
    payload: &Payload,
    options: &EncodingOptions,
) -> Result<ImageData, StegoError> {
    handler_for(options.version_code)?.encode_secret(original, payload, options)
}

/// Recover the payload described by `header`.
///
/// # Errors
/// [`StegoError::PasswordRequired`], [`StegoError::AuthenticationFailed`],
/// [`StegoError::Corrupted`], or any decryption/decompression/parse error.
pub fn decode(image: &ImageData, header: &PackageHeader, password: Option<&str>) -> Result<Payload, StegoError> {
    handler_for(header.version_code())?.decode(image, header, password)
}

/// True if the package described by `header` needs a password.
pub fn is_password_protected(header: &PackageHeader) -> bool {
    header.is_password_protected()
}

/// Check `password` against the hash stored in `header`.
///
/// Always `true` for packages without a password; always `false` for a
/// non-ASCII password on a protected package.
pub fn is_correct_password(password: &str, header: &PackageHeader) -> Result<bool, StegoError> {
    match header {
        PackageHeader::V1(h) => match &h.password {
            Some(fields) => crypto::verify_password(password.as_bytes(), &fields.salt, &fields.password_hash),
            None => Ok(true),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::bits::write_bytes;

    fn blank(len: usize) -> ImageData {
        ImageData::new(vec![0; len], len as u32, 1).unwrap()
    }

    #[test]
    fn version_code_needs_eight_pixels() {
        assert!(matches!(version_code(&blank(7)), Err(StegoError::ImageTooSmall)));
        assert_eq!(version_code(&blank(8)).unwrap(), 0);
    }

    #[test]
    fn tiny_and_plain_images_hold_nothing() {
        for len in [0, 5, 8, 100] {
            let img = blank(len);
            assert_eq!(image_state(&img, None).unwrap(), EncodedImageState::NoSecret);
            let found = inspect(&img).unwrap();
            assert_eq!(found.state, EncodedImageState::NoSecret);
            assert!(found.header.is_none());
        }
    }

    #[test]
    fn known_version_with_truncated_header_is_corrupted() {
        let mut pixels = vec![0u32; 20];
        write_bytes(&mut pixels, &CURRENT_VERSION.to_be_bytes(), 0).unwrap();
        let img = ImageData::new(pixels, 20, 1).unwrap();
        assert_eq!(image_state(&img, None).unwrap(), EncodedImageState::Corrupted);
        assert_eq!(inspect(&img).unwrap().state, EncodedImageState::Corrupted);
        assert!(matches!(extract_header(&img), Err(StegoError::ImageTooSmall)));
    }

    #[test]
    fn unknown_encode_version() {
        let opts = EncodingOptions::new().with_version(0x1234);
        assert!(matches!(
            encode_secret(&blank(100), &Payload::empty(), &opts),
            Err(StegoError::UnknownVersion(0x1234))
        ));
    }

    #[test]
    fn password_check_through_header() {
        let opts = EncodingOptions::new().with_password("open sesame");
        let img = encode_secret(&blank(300), &Payload::new("f", "text/plain", b"x".to_vec()), &opts).unwrap();
        let found = inspect(&img).unwrap();
        assert_eq!(found.state, EncodedImageState::SecretPassword);
        let header = found.header.unwrap();
        assert!(is_password_protected(&header));
        assert!(is_correct_password("open sesame", &header).unwrap());
        assert!(!is_correct_password("open sesame ", &header).unwrap());
    }

    #[test]
    fn unprotected_accepts_any_password() {
        let img = encode_secret(&blank(100), &Payload::empty(), &EncodingOptions::new()).unwrap();
        let header = extract_header(&img).unwrap();
        assert!(!is_password_protected(&header));
        assert!(is_correct_password("whatever", &header).unwrap());
    }
}
