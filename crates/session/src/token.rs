//! Credential newtypes.
//!
//! Opaque strings as far as this crate is concerned: no parsing, no
//! cryptographic validation (the backend owns both). The newtypes exist so
//! the two tokens cannot be swapped by accident and so `Debug` output never
//! leaks a secret into a log line.

use serde::{Deserialize, Serialize};

macro_rules! impl_secret_token {
    ($name:ident) => {
        #[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// The raw secret. Only the transport and the vault should need it.
            pub fn reveal(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl core::fmt::Debug for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, concat!(stringify!($name), "(\u{2022}\u{2022}\u{2022})"))
            }
        }
    };
}

impl_secret_token!(AccessToken);
impl_secret_token!(RefreshToken);
