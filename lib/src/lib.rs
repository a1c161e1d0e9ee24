// Copyright (c) 2024 The CWS Host Project Authors

//! CoolWallet secure-element host interface library
//!
//! Drives transaction signing on a connected secure-element wallet over a
//! narrow APDU command channel. The library covers the host side of the
//! protocol: authorization signatures over command payloads, chunked
//! delivery of oversized payloads, the signature-key retrieval handshake,
//! and post-processing of the encrypted signatures the device returns.
//!
//! Physical transports (BLE, USB), device discovery and per-coin
//! transaction serialization are external collaborators; see [`Transport`]
//! for the seam they plug into.

pub mod transport;
pub use transport::Transport;

/// Re-export `cws-apdu` for consumers
pub use cws_apdu as apdu;

/// Re-export `k256` for host credential types
pub use k256;

mod handle;
pub use handle::DeviceHandle;

mod error;
pub use error::Error;

pub mod key_id;
pub use key_id::KeyId;

pub mod signature;
pub use signature::{
    DeviceSignature, EcdsaSignature, SignatureError, SignatureForm, SignatureKey, SignatureScheme,
};

pub mod tx;
pub use tx::{EncryptedSignature, TxInput};
