// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Package format version 1.
//!
//! One package byte is stored per carrier pixel (see [`crate::image::bits`]),
//! starting at pixel 0. All integers are big-endian.
//!
//! ```text
//! [8 bytes ] version code
//! [16 bytes] MD5 of the payload bytes below
//! [4 bytes ] payload size
//! [1 byte  ] flags: bit 0 = has password, bit 1 = compressed
//! [32 bytes] salt            (only with password)
//! [16 bytes] AES-CBC IV      (only with password)
//! [32 bytes] password hash   (only with password)
//! [N bytes ] payload
//! ```
//!
//! The payload is the serialized [`Payload`], deflated if the compressed
//! flag is set, then AES-256-CBC encrypted if the password flag is set.
//! The hash covers the final stored bytes so corruption is detectable
//! without the password.

use log::{debug, trace};
use md5::{Digest, Md5};
use zeroize::Zeroizing;

use crate::image::bits::{extract_bytes, write_bytes};
use crate::image::ImageData;
use crate::stego::compress;
use crate::stego::crypto::{self, IV_LEN, PASSWORD_HASH_LEN, SALT_LEN};
use crate::stego::error::StegoError;
use crate::stego::fields::{pack_sequential_fields, u32_to_bytes, u64_to_bytes, FieldReader};
use crate::stego::header::{EncodedImageState, PackageHeader, PackageHeaderV1, PasswordFields};
use crate::stego::options::EncodingOptions;
use crate::stego::payload::{self, Payload};
use crate::stego::versions::{PackageHandler, VERSION_1_0_0};

const VERSION_CODE_LEN: usize = 8;
const PAYLOAD_HASH_LEN: usize = 16;
const PAYLOAD_SIZE_LEN: usize = 4;
const FLAGS_LEN: usize = 1;

/// Header length without password fields.
pub const MIN_HEADER_LEN: usize = VERSION_CODE_LEN + PAYLOAD_HASH_LEN + PAYLOAD_SIZE_LEN + FLAGS_LEN; // 29

/// Header length with password fields.
pub const MAX_HEADER_LEN: usize = MIN_HEADER_LEN + SALT_LEN + IV_LEN + PASSWORD_HASH_LEN; // 109

pub const FLAG_PASSWORD: u8 = 0b01;
pub const FLAG_COMPRESSED: u8 = 0b10;
const KNOWN_FLAGS: u8 = FLAG_PASSWORD | FLAG_COMPRESSED;

/// Handler table entry for version 1.
pub(crate) static HANDLER: PackageHandler = PackageHandler {
    version_code: VERSION_1_0_0,
    extract_header,
    image_state,
    encode_secret,
    decode,
    header_len,
    encoded_len,
};

/// Header length for a package with or without password fields.
pub fn header_len(has_password: bool) -> usize {
    if has_password {
        MAX_HEADER_LEN
    } else {
        MIN_HEADER_LEN
    }
}

fn md5(data: &[u8]) -> [u8; PAYLOAD_HASH_LEN] {
    Md5::digest(data).into()
}

/// Parse the header from the first pixels of `image`.
///
/// # Errors
/// - [`StegoError::ImageTooSmall`] if the image cannot hold the header
///   (29 pixels, or 109 when the password flag is set).
/// - [`StegoError::InvalidHeader`] if undefined flag bits are set.
pub fn extract_header(image: &ImageData) -> Result<PackageHeader, StegoError> {
    let pixels = image.pixels();
    if pixels.len() < MIN_HEADER_LEN {
        return Err(StegoError::ImageTooSmall);
    }

    let fixed = extract_bytes(pixels, Some(MIN_HEADER_LEN), 0)?;
    let mut reader = FieldReader::new(&fixed);
    let too_small = || StegoError::ImageTooSmall;
    let version_code = reader.take_u64().ok_or_else(too_small)?;
    let payload_hash = reader.take_array::<PAYLOAD_HASH_LEN>().ok_or_else(too_small)?;
    let payload_size = reader.take_u32().ok_or_else(too_small)?;
    let flags = reader.take_u8().ok_or_else(too_small)?;

    if flags & !KNOWN_FLAGS != 0 {
        return Err(StegoError::InvalidHeader("undefined flag bits set"));
    }
    let has_password = flags & FLAG_PASSWORD != 0;
    let compressed = flags & FLAG_COMPRESSED != 0;

    let password = if has_password {
        if pixels.len() < MAX_HEADER_LEN {
            return Err(StegoError::ImageTooSmall);
        }
        let extra = extract_bytes(pixels, Some(MAX_HEADER_LEN - MIN_HEADER_LEN), MIN_HEADER_LEN)?;
        let mut reader = FieldReader::new(&extra);
        Some(PasswordFields {
            salt: reader.take_array().ok_or_else(too_small)?,
            iv: reader.take_array().ok_or_else(too_small)?,
            password_hash: reader.take_array().ok_or_else(too_small)?,
        })
    } else {
        None
    };

    let header = PackageHeaderV1 {
        version_code,
        payload_hash,
        payload_size,
        compressed,
        password,
        data_offset: header_len(has_password),
    };
    trace!(
        "v1 header: size={} compressed={} password={} offset={}",
        header.payload_size,
        header.compressed,
        has_password,
        header.data_offset
    );
    Ok(header.into())
}

fn v1_header(image: &ImageData, header: Option<&PackageHeader>) -> Result<PackageHeaderV1, StegoError> {
    match header.and_then(PackageHeader::as_v1) {
        Some(h) => Ok(h.clone()),
        None => match extract_header(image)? {
            PackageHeader::V1(h) => Ok(h),
        },
    }
}

/// Read the stored payload bytes, or `None` if the header points past the
/// end of the carrier.
fn stored_payload(image: &ImageData, header: &PackageHeaderV1) -> Option<Vec<u8>> {
    extract_bytes(image.pixels(), Some(header.payload_size as usize), header.data_offset).ok()
}

/// Check the stored payload against the header's hash.
///
/// Uses `header` when given, otherwise extracts it from `image`.
pub fn image_state(image: &ImageData, header: Option<&PackageHeader>) -> Result<EncodedImageState, StegoError> {
    let header = v1_header(image, header)?;
    let intact = match stored_payload(image, &header) {
        Some(data) => md5(&data) == header.payload_hash,
        None => false,
    };
    let state = match (intact, header.has_password()) {
        (false, _) => EncodedImageState::Corrupted,
        (true, true) => EncodedImageState::SecretPassword,
        (true, false) => EncodedImageState::SecretNoPassword,
    };
    debug!("v1 image state: {state:?}");
    Ok(state)
}

fn check_password(options: &EncodingOptions) -> Result<(), StegoError> {
    match options.password_bytes() {
        Some(pw) if !crypto::is_valid_password(pw) => Err(StegoError::InvalidPayload("password must be ASCII")),
        _ => Ok(()),
    }
}

/// Hide `payload` in a copy of `original`.
///
/// # Errors
/// - [`StegoError::InvalidPayload`] if the password, file name or MIME type
///   is not ASCII, or the processed payload exceeds the 32-bit size field.
/// - [`StegoError::SizeLimitExceeded`] if header plus payload needs more
///   pixels than the carrier has.
pub fn encode_secret(
    original: &ImageData,
    payload: &Payload,
    options: &EncodingOptions,
) -> Result<ImageData, StegoError> {
    check_password(options)?;
    let mut body = payload::serialize(payload)?;
    if options.compress {
        body = compress::compress(&body);
    }

    let password = match options.password_bytes() {
        Some(pw) => {
            let salt = crypto::generate_salt();
            let iv = crypto::generate_iv();
            let key = crypto::derive_key(pw, &salt)?;
            let plain = Zeroizing::new(body);
            body = crypto::encrypt(&plain, &*key, &iv)?;
            Some(PasswordFields {
                salt,
                iv,
                password_hash: crypto::hash_password(&salt, pw),
            })
        }
        None => None,
    };

    let payload_size =
        u32::try_from(body.len()).map_err(|_| StegoError::InvalidPayload("payload exceeds 4 GiB"))?;
    let required = header_len(password.is_some()) + body.len();
    let available = original.len();
    if required > available {
        return Err(StegoError::SizeLimitExceeded { required, available });
    }

    let mut flags = 0u8;
    if password.is_some() {
        flags |= FLAG_PASSWORD;
    }
    if options.compress {
        flags |= FLAG_COMPRESSED;
    }

    let version = u64_to_bytes(VERSION_1_0_0);
    let hash = md5(&body);
    let size = u32_to_bytes(payload_size);
    let flag_field = [flags];
    let mut fields: Vec<&[u8]> = vec![&version[..], &hash[..], &size[..], &flag_field[..]];
    if let Some(pw) = &password {
        fields.extend_from_slice(&[&pw.salt[..], &pw.iv[..], &pw.password_hash[..]]);
    }
    fields.push(&body);
    let package = pack_sequential_fields(&fields);
    debug_assert_eq!(package.len(), required);

    let mut pixels = original.pixels().to_vec();
    write_bytes(&mut pixels, &package, 0)?;
    debug!(
        "v1 encode: {} package bytes into {available} pixels (compressed={}, password={})",
        package.len(),
        options.compress,
        password.is_some()
    );
    ImageData::new(pixels, original.width(), original.height())
}

/// Recover the payload described by `header` from `image`.
///
/// # Errors
/// - [`StegoError::PasswordRequired`] if the package is protected and
///   `password` is `None`.
/// - [`StegoError::AuthenticationFailed`] if the password is wrong or not
///   ASCII.
/// - [`StegoError::Corrupted`] if the stored payload fails its hash check.
/// - [`StegoError::BadPadding`] / [`StegoError::CorruptData`] if decryption
///   or decompression fails.
/// - [`StegoError::InvalidHeader`] if the payload fields are malformed.
pub fn decode(image: &ImageData, header: &PackageHeader, password: Option<&str>) -> Result<Payload, StegoError> {
    let header = header
        .as_v1()
        .ok_or(StegoError::InvalidHeader("not a version 1 header"))?;

    let key_iv = match &header.password {
        Some(fields) => {
            let pw = password.ok_or(StegoError::PasswordRequired)?.as_bytes();
            if !crypto::verify_password(pw, &fields.salt, &fields.password_hash)? {
                return Err(StegoError::AuthenticationFailed);
            }
            Some((crypto::derive_key(pw, &fields.salt)?, fields.iv))
        }
        None => None,
    };

    let stored = stored_payload(image, header).ok_or(StegoError::Corrupted)?;
    if md5(&stored) != header.payload_hash {
        return Err(StegoError::Corrupted);
    }

    let mut body = match key_iv {
        Some((key, iv)) => Zeroizing::new(crypto::decrypt(&stored, &*key, &iv)?),
        None => Zeroizing::new(stored),
    };
    if header.compressed {
        body = Zeroizing::new(compress::decompress(&body)?);
    }

    let payload = payload::parse(&body)?;
    debug!(
        "v1 decode: {} bytes, compressed={}, password={}",
        payload.data.len(),
        header.compressed,
        header.has_password()
    );
    Ok(payload)
}

/// Exact number of pixels [`encode_secret`] would use for `payload`.
pub fn encoded_len(payload: &Payload, options: &EncodingOptions) -> Result<usize, StegoError> {
    check_password(options)?;
    let serialized = payload::serialize(payload)?;
    let body_len = if options.compress {
        compress::compress(&serialized).len()
    } else {
        serialized.len()
    };
    Ok(match options.password {
        Some(_) => MAX_HEADER_LEN + crypto::encrypted_len(body_len),
        None => MIN_HEADER_LEN + body_len,
    })
}
