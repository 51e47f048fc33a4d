// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Per-call encoding options.

use core::fmt;

use zeroize::Zeroizing;

use crate::stego::versions::CURRENT_VERSION;

/// How a payload should be packaged.
///
/// Defaults to the current package version, no password, compression on.
#[derive(Clone)]
pub struct EncodingOptions {
    /// Package format version to write.
    pub version_code: u64,
    /// Encrypt with this password when set.
    pub password: Option<Zeroizing<String>>,
    /// Deflate the payload before encryption.
    pub compress: bool,
}

impl EncodingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(Zeroizing::new(password.into()));
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    pub fn with_version(mut self, version_code: u64) -> Self {
        self.version_code = version_code;
        self
    }

    pub fn password_bytes(&self) -> Option<&[u8]> {
        self.password.as_ref().map(|p| p.as_bytes())
    }
}

impl Default for EncodingOptions {
    fn default() -> Self {
        Self {
            version_code: CURRENT_VERSION,
            password: None,
            compress: true,
        }
    }
}

impl fmt::Debug for EncodingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodingOptions")
            .field("version_code", &format_args!("{:#018x}", self.version_code))
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("compress", &self.compress)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = EncodingOptions::default();
        assert_eq!(opts.version_code, CURRENT_VERSION);
        assert!(opts.password.is_none());
        assert!(opts.compress);
    }

    #[test]
    fn builder() {
        let opts = EncodingOptions::new().with_password("pw").with_compression(false).with_version(7);
        assert_eq!(opts.password_bytes(), Some(&b"pw"[..]));
        assert!(!opts.compress);
        assert_eq!(opts.version_code, 7);
    }

    #[test]
    fn debug_hides_password() {
        let opts = EncodingOptions::new().with_password("hunter2");
        let shown = format!("{opts:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("<redacted>"));
    }
}
