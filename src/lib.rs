// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # cryptopix-core
//!
//! Steganographic package codec for hiding a file inside the pixels of an
//! ARGB image. The file is framed with its name and MIME type, optionally
//! deflated, optionally encrypted with a password (PBKDF2-HMAC-SHA256 +
//! AES-256-CBC), and written two bits per channel, one byte per pixel,
//! behind a versioned header that carries an MD5 integrity hash.
//!
//! - `image`: carrier pixel buffers and the LSB bit codec.
//! - `stego`: package format, crypto, compression and version dispatch.
//!
//! The codec never touches files or the network; callers load and save
//! images themselves and hand over pixel buffers.
//!
//! # Quick start
//!
//! ```rust
//! use cryptopix_core::{decode, encode_secret, inspect, EncodedImageState, EncodingOptions, ImageData, Payload};
//!
//! let carrier = ImageData::new(vec![0xFF00_0000; 64 * 64], 64, 64).unwrap();
//! let file = Payload::new("note.txt", "text/plain", b"meet at noon".to_vec());
//! let options = EncodingOptions::new().with_password("passphrase");
//!
//! let stego = encode_secret(&carrier, &file, &options).unwrap();
//! let found = inspect(&stego).unwrap();
//! assert_eq!(found.state, EncodedImageState::SecretPassword);
//!
//! let decoded = decode(&stego, &found.header.unwrap(), Some("passphrase")).unwrap();
//! assert_eq!(decoded, file);
//! ```

pub mod image;
pub mod stego;

pub use image::ImageData;
pub use stego::{decode, encode_secret, extract_header, image_state, inspect, version_code, Inspection};
pub use stego::{is_correct_password, is_password_protected};
pub use stego::{EncodedImageState, EncodingOptions, ErrorKind, PackageHeader, PackageHeaderV1, Payload, StegoError};
pub use stego::{is_supported, CURRENT_VERSION, VERSION_1_0_0};
pub use stego::capacity::{capacity, encoded_len, fits, max_payload_len};
