// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Corruption, authentication and capacity behavior of encoded carriers.

use cryptopix_core::image::bits::{write_bytes, PAYLOAD_MASK};
use cryptopix_core::{
    decode, encode_secret, encoded_len, extract_header, image_state, inspect, is_correct_password,
    EncodedImageState, EncodingOptions, ErrorKind, ImageData, Payload, StegoError,
};

fn zero_image(len: usize) -> ImageData {
    ImageData::new(vec![0; len], len as u32, 1).unwrap()
}

fn sample() -> Payload {
    Payload::new("diary.txt", "text/plain", b"dear diary, today I hid a file".to_vec())
}

fn flip_bit(image: &ImageData, pixel: usize, bit: u32) -> ImageData {
    let mut pixels = image.pixels().to_vec();
    pixels[pixel] ^= 1 << bit;
    ImageData::new(pixels, image.width(), image.height()).unwrap()
}

/// Bit positions inside a pixel that carry package data.
fn payload_bits() -> impl Iterator<Item = u32> {
    (0..32).filter(|b| PAYLOAD_MASK & (1 << b) != 0)
}

#[test]
fn any_flipped_payload_bit_is_detected() {
    for options in [EncodingOptions::new(), EncodingOptions::new().with_password("pw")] {
        let stego = encode_secret(&zero_image(300), &sample(), &options).unwrap();
        let header = extract_header(&stego).unwrap();
        let start = header.data_offset();
        let end = start + header.payload_size();

        for pixel in [start, (start + end) / 2, end - 1] {
            for bit in payload_bits() {
                let damaged = flip_bit(&stego, pixel, bit);
                assert_eq!(
                    image_state(&damaged, Some(&header)).unwrap(),
                    EncodedImageState::Corrupted,
                    "pixel {pixel} bit {bit}"
                );
            }
        }
    }
}

#[test]
fn flipped_hash_bit_is_detected() {
    let stego = encode_secret(&zero_image(200), &sample(), &EncodingOptions::new()).unwrap();
    let damaged = flip_bit(&stego, 12, 16);
    assert_eq!(inspect(&damaged).unwrap().state, EncodedImageState::Corrupted);
}

#[test]
fn non_payload_bits_do_not_matter() {
    let stego = encode_secret(&zero_image(200), &sample(), &EncodingOptions::new()).unwrap();
    let header = extract_header(&stego).unwrap();
    let touched = flip_bit(&stego, header.data_offset() + 3, 7);
    assert_eq!(image_state(&touched, None).unwrap(), EncodedImageState::SecretNoPassword);
}

#[test]
fn decoding_a_corrupted_carrier_fails_as_integrity_error() {
    for options in [EncodingOptions::new(), EncodingOptions::new().with_password("pw")] {
        let stego = encode_secret(&zero_image(300), &sample(), &options).unwrap();
        let header = extract_header(&stego).unwrap();
        let damaged = flip_bit(&stego, header.data_offset() + 1, 0);
        let password = options.password.as_ref().map(|p| p.as_str());

        let err = decode(&damaged, &header, password).unwrap_err();
        assert!(matches!(err, StegoError::Corrupted), "{err:?}");
        assert_eq!(err.kind(), ErrorKind::Integrity);
    }
}

#[test]
fn wrong_passwords_are_authentication_failures() {
    let options = EncodingOptions::new().with_password("s3cret!");
    let stego = encode_secret(&zero_image(300), &sample(), &options).unwrap();
    let header = extract_header(&stego).unwrap();

    assert_eq!(decode(&stego, &header, Some("s3cret!")).unwrap(), sample());
    for wrong in ["", "s3cret", "s3cret!!", "S3CRET!", " s3cret!"] {
        let err = decode(&stego, &header, Some(wrong)).unwrap_err();
        assert!(matches!(err, StegoError::AuthenticationFailed), "{wrong:?}: {err:?}");
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert!(!is_correct_password(wrong, &header).unwrap());
    }
}

#[test]
fn wrong_password_beats_corruption() {
    let options = EncodingOptions::new().with_password("right");
    let stego = encode_secret(&zero_image(300), &sample(), &options).unwrap();
    let header = extract_header(&stego).unwrap();
    let damaged = flip_bit(&stego, header.data_offset(), 1);
    assert!(matches!(
        decode(&damaged, &header, Some("wrong")),
        Err(StegoError::AuthenticationFailed)
    ));
}

#[test]
fn missing_password_is_reported() {
    let options = EncodingOptions::new().with_password("pw");
    let stego = encode_secret(&zero_image(300), &sample(), &options).unwrap();
    let header = extract_header(&stego).unwrap();
    assert!(matches!(decode(&stego, &header, None), Err(StegoError::PasswordRequired)));
}

#[test]
fn passwords_must_be_ascii() {
    let umlauts = "p\u{e4}ssw\u{f6}rd";
    let err = encode_secret(&zero_image(300), &sample(), &EncodingOptions::new().with_password(umlauts))
        .unwrap_err();
    assert!(matches!(err, StegoError::InvalidPayload(_)), "{err:?}");
    assert_eq!(err.kind(), ErrorKind::Format);

    let stego = encode_secret(&zero_image(300), &sample(), &EncodingOptions::new().with_password("passwrd"))
        .unwrap();
    let header = extract_header(&stego).unwrap();
    assert!(!is_correct_password(umlauts, &header).unwrap());
    assert!(matches!(decode(&stego, &header, Some(umlauts)), Err(StegoError::AuthenticationFailed)));
}

#[test]
fn same_input_encrypts_differently_each_time() {
    let options = EncodingOptions::new().with_password("pw");
    let a = encode_secret(&zero_image(300), &sample(), &options).unwrap();
    let b = encode_secret(&zero_image(300), &sample(), &options).unwrap();
    let (ha, hb) = (extract_header(&a).unwrap(), extract_header(&b).unwrap());
    let (pa, pb) = (ha.as_v1().unwrap(), hb.as_v1().unwrap());
    let (fa, fb) = (pa.password.as_ref().unwrap(), pb.password.as_ref().unwrap());
    assert_ne!(fa.salt, fb.salt);
    assert_ne!(fa.iv, fb.iv);
    assert_ne!(a.pixels(), b.pixels());
}

#[test]
fn capacity_boundary_is_exact() {
    for options in [
        EncodingOptions::new().with_compression(false),
        EncodingOptions::new(),
        EncodingOptions::new().with_password("pw"),
    ] {
        let needed = encoded_len(&sample(), &options).unwrap();
        assert!(encode_secret(&zero_image(needed), &sample(), &options).is_ok());

        let err = encode_secret(&zero_image(needed - 1), &sample(), &options).unwrap_err();
        match err {
            StegoError::SizeLimitExceeded { required, available } => {
                assert_eq!(required, needed);
                assert_eq!(available, needed - 1);
            }
            other => panic!("expected SizeLimitExceeded, got {other:?}"),
        }
    }
}

#[test]
fn unknown_version_code_means_no_secret() {
    let stego = encode_secret(&zero_image(200), &sample(), &EncodingOptions::new()).unwrap();
    let mut pixels = stego.into_pixels();
    write_bytes(&mut pixels, &0x0000_0002_0000_0000u64.to_be_bytes(), 0).unwrap();
    let future = ImageData::new(pixels, 200, 1).unwrap();

    let found = inspect(&future).unwrap();
    assert_eq!(found.state, EncodedImageState::NoSecret);
    assert!(found.header.is_none());
    assert!(matches!(extract_header(&future), Err(StegoError::UnknownVersion(0x2_0000_0000))));
}
