// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! The hidden file and its serialized form.
//!
//! Before compression and encryption a payload is laid out as:
//!
//! ```text
//! [4 bytes] file name length (u32 BE)
//! [N bytes] file name (ASCII)
//! [4 bytes] MIME type length (u32 BE)
//! [M bytes] MIME type (ASCII)
//! [rest   ] file contents
//! ```

use crate::stego::error::StegoError;
use crate::stego::fields::{pack_sequential_fields, u32_to_bytes, FieldReader};

/// A file to hide, or a file recovered from a carrier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Payload {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl Payload {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// A payload with no name, type or contents, to be filled in by the caller.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set_file_name(&mut self, file_name: impl Into<String>) -> &mut Self {
        self.file_name = file_name.into();
        self
    }

    pub fn set_mime_type(&mut self, mime_type: impl Into<String>) -> &mut Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn set_data(&mut self, data: impl Into<Vec<u8>>) -> &mut Self {
        self.data = data.into();
        self
    }

    /// Length of the serialized form.
    pub fn serialized_len(&self) -> usize {
        8 + self.file_name.len() + self.mime_type.len() + self.data.len()
    }
}

fn ascii_len(field: &str, what: &'static str) -> Result<[u8; 4], StegoError> {
    if !field.is_ascii() {
        return Err(StegoError::InvalidPayload(what));
    }
    let len = u32::try_from(field.len()).map_err(|_| StegoError::InvalidPayload(what))?;
    Ok(u32_to_bytes(len))
}

/// Serialize a payload into its pre-compression layout.
///
/// # Errors
/// [`StegoError::InvalidPayload`] if the file name or MIME type is not ASCII.
pub fn serialize(payload: &Payload) -> Result<Vec<u8>, StegoError> {
    let name_len = ascii_len(&payload.file_name, "file name must be ASCII")?;
    let mime_len = ascii_len(&payload.mime_type, "MIME type must be ASCII")?;
    Ok(pack_sequential_fields(&[
        &name_len,
        payload.file_name.as_bytes(),
        &mime_len,
        payload.mime_type.as_bytes(),
        &payload.data,
    ]))
}

fn read_ascii(reader: &mut FieldReader<'_>, what: &'static str) -> Result<String, StegoError> {
    let len = reader.take_u32().ok_or(StegoError::InvalidHeader(what))? as usize;
    let bytes = reader.take(len).ok_or(StegoError::InvalidHeader(what))?;
    if !bytes.is_ascii() {
        return Err(StegoError::InvalidHeader(what));
    }
    // ASCII is valid UTF-8.
    Ok(bytes.iter().map(|&b| b as char).collect())
}

/// Parse a decrypted, decompressed payload.
///
/// # Errors
/// [`StegoError::InvalidHeader`] if a declared length runs past the end of
/// the data or a text field is not ASCII.
pub fn parse(data: &[u8]) -> Result<Payload, StegoError> {
    let mut reader = FieldReader::new(data);
    let file_name = read_ascii(&mut reader, "file name length exceeds payload")?;
    let mime_type = read_ascii(&mut reader, "MIME type length exceeds payload")?;
    let data = reader.rest().to_vec();
    Ok(Payload { file_name, mime_type, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_length_prefixed() {
        let p = Payload::new("a.txt", "text/plain", b"A".to_vec());
        let bytes = serialize(&p).unwrap();
        assert_eq!(&bytes[..4], &[0, 0, 0, 5]);
        assert_eq!(&bytes[4..9], b"a.txt");
        assert_eq!(&bytes[9..13], &[0, 0, 0, 10]);
        assert_eq!(&bytes[13..23], b"text/plain");
        assert_eq!(&bytes[23..], b"A");
        assert_eq!(bytes.len(), p.serialized_len());
    }

    #[test]
    fn parse_inverts_serialize() {
        let p = Payload::new("report.pdf", "application/pdf", vec![0xFF, 0x00, 0x25]);
        assert_eq!(parse(&serialize(&p).unwrap()).unwrap(), p);
    }

    #[test]
    fn empty_fields_allowed() {
        let p = Payload::empty();
        let bytes = serialize(&p).unwrap();
        assert_eq!(bytes, vec![0; 8]);
        assert_eq!(parse(&bytes).unwrap(), p);
    }

    #[test]
    fn builder_setters() {
        let mut p = Payload::empty();
        p.set_file_name("x.bin").set_mime_type("application/octet-stream").set_data(vec![1, 2]);
        assert_eq!(p, Payload::new("x.bin", "application/octet-stream", vec![1, 2]));
    }

    #[test]
    fn non_ascii_name_rejected() {
        let p = Payload::new("übersicht.txt", "text/plain", Vec::new());
        assert!(matches!(serialize(&p), Err(StegoError::InvalidPayload(_))));
    }

    #[test]
    fn name_length_past_end_rejected() {
        // name_len = 200 but only 3 bytes follow.
        let data = [0, 0, 0, 200, b'a', b'b', b'c'];
        assert!(matches!(parse(&data), Err(StegoError::InvalidHeader(_))));
    }

    #[test]
    fn mime_length_past_end_rejected() {
        let mut data = vec![0, 0, 0, 1, b'a'];
        data.extend_from_slice(&u32::MAX.to_be_bytes());
        data.extend_from_slice(b"text");
        assert!(matches!(parse(&data), Err(StegoError::InvalidHeader(_))));
    }

    #[test]
    fn truncated_length_field_rejected() {
        assert!(matches!(parse(&[0, 0]), Err(StegoError::InvalidHeader(_))));
    }
}
