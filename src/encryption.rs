use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

/// Supplies the password when an entry is read or written. Owned by the
/// caller; the header only keeps a handle to it.
pub type PasswordFn = Arc<dyn Fn() -> Vec<u8> + Send + Sync>;

/// The AE-2 vendor version, which leaves the CRC field zero
pub const AES_VENDOR_VERSION: u16 = 2;

/// How an entry's contents are encrypted
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq, Copy, Clone)]
pub enum EncryptionMethod {
    /// Traditional PKWARE encryption
    Standard,
    /// WinZip AES with a 128 bit key
    Aes128,
    /// WinZip AES with a 192 bit key
    Aes192,
    /// WinZip AES with a 256 bit key
    Aes256,
}

impl EncryptionMethod {
    /// The strength byte stored in the WinZip AES extra field, if any
    pub fn aes_strength(self) -> Option<u8> {
        match self {
            EncryptionMethod::Standard => None,
            EncryptionMethod::Aes128 => Some(1),
            EncryptionMethod::Aes192 => Some(2),
            EncryptionMethod::Aes256 => Some(3),
        }
    }
}

/// Encryption parameters for an entry. This crate stores them for the
/// reader and writer but never interprets them.
#[derive(Serialize, Deserialize, Clone)]
pub struct Encryption {
    /// The encryption method
    pub method:       EncryptionMethod,
    /// WinZip AES vendor version, 0 for traditional encryption
    pub ae:           u16,
    /// WinZip AES key strength
    pub aes_strength: u8,
    /// Hand out plaintext before the authentication code has been checked.
    /// This exposes unauthenticated data to the caller; leave it off unless
    /// streaming requires it.
    pub defer_auth:   bool,
    #[serde(skip)]
    password:         Option<PasswordFn>,
}

impl Encryption {
    /// Parameters for `method`, reading the password from `password`
    pub fn new(method: EncryptionMethod, password: PasswordFn) -> Self {
        let aes_strength = method.aes_strength();
        Self {
            method,
            ae: aes_strength.map_or(0, |_| AES_VENDOR_VERSION),
            aes_strength: aes_strength.unwrap_or(0),
            defer_auth: false,
            password: Some(password),
        }
    }

    /// Ask the caller for the password. `None` if the parameters were
    /// deserialized and no password source has been attached since.
    pub fn password(&self) -> Option<Vec<u8>> {
        self.password.as_ref().map(|f| f())
    }

    /// Attach a password source
    pub fn set_password_fn(&mut self, password: PasswordFn) {
        self.password = Some(password)
    }
}

impl fmt::Debug for Encryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encryption")
            .field("method", &self.method)
            .field("ae", &self.ae)
            .field("aes_strength", &self.aes_strength)
            .field("defer_auth", &self.defer_auth)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
