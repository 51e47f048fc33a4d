// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Big-endian field conversions and sequential field packing.

use crate::stego::error::StegoError;

/// Encode a `u32` as 4 big-endian bytes.
pub fn u32_to_bytes(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

/// Encode a `u64` as 8 big-endian bytes.
pub fn u64_to_bytes(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Decode exactly 4 big-endian bytes.
///
/// # Errors
/// [`StegoError::InvalidLength`] if `bytes` is not 4 bytes long.
pub fn u32_from_bytes(bytes: &[u8]) -> Result<u32, StegoError> {
    let arr: [u8; 4] = bytes
        .try_into()
        .map_err(|_| StegoError::InvalidLength { expected: 4, actual: bytes.len() })?;
    Ok(u32::from_be_bytes(arr))
}

/// Decode exactly 8 big-endian bytes.
///
/// # Errors
/// [`StegoError::InvalidLength`] if `bytes` is not 8 bytes long.
pub fn u64_from_bytes(bytes: &[u8]) -> Result<u64, StegoError> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StegoError::InvalidLength { expected: 8, actual: bytes.len() })?;
    Ok(u64::from_be_bytes(arr))
}

/// Concatenate fields in order into one buffer.
pub fn pack_sequential_fields(fields: &[&[u8]]) -> Vec<u8> {
    let len = fields.iter().map(|f| f.len()).sum();
    let mut out = Vec::with_capacity(len);
    for field in fields {
        out.extend_from_slice(field);
    }
    out
}

/// Forward-only cursor over packed fields.
///
/// Every read is bounds-checked and returns `None` once the buffer is
/// exhausted; callers pick the error that fits their context.
pub struct FieldReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Take the next `len` bytes.
    pub fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let field = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(field)
    }

    /// Take the next `N` bytes as an array.
    pub fn take_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        self.take(N)?.try_into().ok()
    }

    pub fn take_u8(&mut self) -> Option<u8> {
        self.take(1).map(|b| b[0])
    }

    pub fn take_u32(&mut self) -> Option<u32> {
        self.take_array::<4>().map(u32::from_be_bytes)
    }

    pub fn take_u64(&mut self) -> Option<u64> {
        self.take_array::<8>().map(u64::from_be_bytes)
    }

    /// Everything not yet read.
    pub fn rest(&mut self) -> &'a [u8] {
        let rest = &self.data[self.pos..];
        self.pos = self.data.len();
        rest
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}
