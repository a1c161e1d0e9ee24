// Copyright (c) 2024 The CWS Host Project Authors

//! Transaction data-phase building blocks
//!
//! The flows themselves live on [`DeviceHandle`][crate::DeviceHandle];
//! this module holds the pure pieces: host authorization signing and
//! payload chunking.

pub mod auth;

pub(crate) mod chunker;

/// One transaction input for the batch flow
///
/// Batch signing (multi-input transaction formats) stages each input with
/// its own data-phase pass and collects one encrypted signature per input.
#[derive(Clone, Debug, PartialEq)]
pub struct TxInput {
    /// Serialized payload to be signed, built by the per-coin module
    pub data: Vec<u8>,

    /// Operation-type tag, transmitted as `P1`
    pub data_type: u8,
}

/// Encrypted signature bytes returned by the device.
///
/// Only the response to the final payload chunk carries this; it stays
/// opaque until decrypted with the session
/// [`SignatureKey`][crate::SignatureKey].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedSignature(pub Vec<u8>);

impl AsRef<[u8]> for EncryptedSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
