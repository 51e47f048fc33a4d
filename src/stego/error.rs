// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for the package codec.
//!
//! [`StegoError`] covers every failure mode from pixel I/O through header
//! parsing, decryption and decompression. [`ErrorKind`] groups the variants
//! so callers can decide how to present a failure without matching each one.

use core::fmt;

/// Broad category of a [`StegoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The carrier or header does not match the expected layout.
    Format,
    /// The embedded data was damaged after encoding.
    Integrity,
    /// Missing or wrong password.
    Authentication,
    /// A primitive required by the package version is not available.
    Capability,
    /// The package does not fit in the carrier.
    Capacity,
}

/// Errors that can occur while encoding or decoding a secret package.
#[derive(Debug)]
pub enum StegoError {
    /// The carrier has fewer pixels than the package header needs.
    ImageTooSmall,
    /// The dimensions describe more pixels than this platform can address.
    ImageTooLarge { width: u32, height: u32 },
    /// A header field holds a value no valid package can contain.
    InvalidHeader(&'static str),
    /// A fixed-width conversion received the wrong number of bytes.
    InvalidLength { expected: usize, actual: usize },
    /// A pixel read or write would run past the end of the buffer.
    OutOfRange { offset: usize, len: usize, available: usize },
    /// The payload to encode cannot be represented in the package format.
    InvalidPayload(&'static str),
    /// No package handler is registered for this version code.
    UnknownVersion(u64),
    /// The payload hash stored in the header does not match the payload.
    Corrupted,
    /// The compressed payload is not a valid deflate stream.
    CorruptData,
    /// The package is password protected and no password was given.
    PasswordRequired,
    /// The given password does not match the stored password hash.
    AuthenticationFailed,
    /// AES-CBC padding check failed (wrong key or damaged ciphertext).
    BadPadding,
    /// Key or IV material has the wrong length for AES-256-CBC.
    InvalidKey,
    /// A primitive required by this package version is unavailable.
    Unsupported(&'static str),
    /// The assembled package is larger than the carrier's pixel count.
    SizeLimitExceeded { required: usize, available: usize },
}

impl StegoError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ImageTooSmall
            | Self::ImageTooLarge { .. }
            | Self::InvalidHeader(_)
            | Self::InvalidLength { .. }
            | Self::OutOfRange { .. }
            | Self::InvalidPayload(_)
            | Self::UnknownVersion(_) => ErrorKind::Format,
            Self::Corrupted | Self::CorruptData => ErrorKind::Integrity,
            Self::PasswordRequired
            | Self::AuthenticationFailed
            | Self::BadPadding
            | Self::InvalidKey => ErrorKind::Authentication,
            Self::Unsupported(_) => ErrorKind::Capability,
            Self::SizeLimitExceeded { .. } => ErrorKind::Capacity,
        }
    }
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageTooSmall => write!(f, "image too small to hold a package header"),
            Self::ImageTooLarge { width, height } => {
                write!(f, "image of {width}x{height} pixels is too large")
            }
            Self::InvalidHeader(what) => write!(f, "invalid package header: {what}"),
            Self::InvalidLength { expected, actual } => {
                write!(f, "expected {expected} bytes, got {actual}")
            }
            Self::OutOfRange { offset, len, available } => write!(
                f,
                "pixel range {offset}..{} exceeds buffer of {available} pixels",
                offset.saturating_add(*len)
            ),
            Self::InvalidPayload(what) => write!(f, "invalid payload: {what}"),
            Self::UnknownVersion(code) => write!(f, "unsupported package version {code:#018x}"),
            Self::Corrupted => write!(f, "payload hash mismatch"),
            Self::CorruptData => write!(f, "compressed payload is not a valid deflate stream"),
            Self::PasswordRequired => write!(f, "package is password protected"),
            Self::AuthenticationFailed => write!(f, "incorrect password"),
            Self::BadPadding => write!(f, "decryption failed (bad padding)"),
            Self::InvalidKey => write!(f, "invalid AES key or IV length"),
            Self::Unsupported(what) => write!(f, "{what} is not supported on this platform"),
            Self::SizeLimitExceeded { required, available } => write!(
                f,
                "package needs {required} pixels but the image has {available}"
            ),
        }
    }
}

impl std::error::Error for StegoError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_and_integrity_are_distinct() {
        assert_eq!(StegoError::AuthenticationFailed.kind(), ErrorKind::Authentication);
        assert_eq!(StegoError::Corrupted.kind(), ErrorKind::Integrity);
        assert_eq!(StegoError::CorruptData.kind(), ErrorKind::Integrity);
        assert_ne!(
            StegoError::AuthenticationFailed.kind(),
            StegoError::Corrupted.kind()
        );
    }

    #[test]
    fn capacity_error_reports_sizes() {
        let err = StegoError::SizeLimitExceeded { required: 65, available: 64 };
        assert_eq!(err.kind(), ErrorKind::Capacity);
        assert_eq!(err.to_string(), "package needs 65 pixels but the image has 64");
    }

    #[test]
    fn oversized_image_is_a_format_error() {
        let err = StegoError::ImageTooLarge { width: u32::MAX, height: 3 };
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(err.to_string(), "image of 4294967295x3 pixels is too large");
    }

    #[test]
    fn unknown_version_is_hex() {
        let err = StegoError::UnknownVersion(0xCAFE);
        assert_eq!(err.to_string(), "unsupported package version 0x000000000000cafe");
    }
}
