// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Package headers and carrier states.
//!
//! A header is a plain value read out of the first pixels of a carrier. It
//! is versioned: each package format version has its own header variant,
//! and [`PackageHeader`] is the tagged union over all of them.

use crate::stego::crypto::{IV_LEN, PASSWORD_HASH_LEN, SALT_LEN};

/// What a carrier holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodedImageState {
    /// No recognized package (a plain image, or one written by a newer version).
    NoSecret,
    /// A recognized package whose payload no longer matches its hash.
    Corrupted,
    /// An intact package that needs no password.
    SecretNoPassword,
    /// An intact, password-protected package.
    SecretPassword,
    /// A package this build cannot verify.
    Unsupported,
}

impl EncodedImageState {
    /// True for the two intact states.
    pub fn has_secret(self) -> bool {
        matches!(self, Self::SecretNoPassword | Self::SecretPassword)
    }
}

/// Key material stored in the header of a password-protected v1 package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordFields {
    pub salt: [u8; SALT_LEN],
    pub iv: [u8; IV_LEN],
    pub password_hash: [u8; PASSWORD_HASH_LEN],
}

/// Header of a version 1 package.
///
/// `password` is `Some` exactly when the has-password flag was set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageHeaderV1 {
    pub version_code: u64,
    /// MD5 of the payload bytes as stored in the carrier.
    pub payload_hash: [u8; 16],
    /// Number of payload bytes (pixels) after the header.
    pub payload_size: u32,
    pub compressed: bool,
    pub password: Option<PasswordFields>,
    /// First pixel of the payload.
    pub data_offset: usize,
}

impl PackageHeaderV1 {
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }
}

/// A package header of any supported version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageHeader {
    V1(PackageHeaderV1),
}

impl PackageHeader {
    pub fn version_code(&self) -> u64 {
        match self {
            Self::V1(h) => h.version_code,
        }
    }

    pub fn is_password_protected(&self) -> bool {
        match self {
            Self::V1(h) => h.has_password(),
        }
    }

    pub fn is_compressed(&self) -> bool {
        match self {
            Self::V1(h) => h.compressed,
        }
    }

    pub fn payload_size(&self) -> usize {
        match self {
            Self::V1(h) => h.payload_size as usize,
        }
    }

    pub fn payload_hash(&self) -> &[u8] {
        match self {
            Self::V1(h) => &h.payload_hash,
        }
    }

    pub fn data_offset(&self) -> usize {
        match self {
            Self::V1(h) => h.data_offset,
        }
    }

    pub fn as_v1(&self) -> Option<&PackageHeaderV1> {
        match self {
            Self::V1(h) => Some(h),
        }
    }
}

impl From<PackageHeaderV1> for PackageHeader {
    fn from(h: PackageHeaderV1) -> Self {
        Self::V1(h)
    }
}
