// Copyright (c) 2024 The CWS Host Project Authors

//! Key identifiers for on-device derivation-key selection
//!
//! A key id is a fixed five byte value handed to the device inside signing
//! payloads: a one byte coin-type tag followed by the account index, laid
//! out per account model. The index range is enforced by the variant types
//! themselves, there is nothing to validate at encode time.

/// Encoded width of a [`KeyId`] in bytes
pub const KEY_ID_LEN: usize = 5;

/// Selects which derived key the device uses for an operation
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyId {
    /// Address-index account model: `coin ∥ 00 00 ∥ index` (index
    /// big-endian u16)
    SimpleAccount { coin_type: u8, index: u16 },

    /// Extended account model: `coin ∥ index ∥ 00 00 00`
    ExtendedAccount { coin_type: u8, index: u8 },
}

impl KeyId {
    /// Coin-type tag for either model
    pub fn coin_type(&self) -> u8 {
        match self {
            KeyId::SimpleAccount { coin_type, .. } => *coin_type,
            KeyId::ExtendedAccount { coin_type, .. } => *coin_type,
        }
    }

    /// Encode to the fixed device layout
    pub fn encode(&self) -> [u8; KEY_ID_LEN] {
        match *self {
            KeyId::SimpleAccount { coin_type, index } => {
                let i = index.to_be_bytes();
                [coin_type, 0x00, 0x00, i[0], i[1]]
            }
            KeyId::ExtendedAccount { coin_type, index } => [coin_type, index, 0x00, 0x00, 0x00],
        }
    }

    /// Hex form as consumed at the transport edge
    pub fn to_hex(&self) -> String {
        hex::encode(self.encode())
    }

    /// Decode a simple-account key id, `None` if the reserved bytes are set
    pub fn decode_simple(b: [u8; KEY_ID_LEN]) -> Option<Self> {
        if b[1] != 0 || b[2] != 0 {
            return None;
        }

        Some(KeyId::SimpleAccount {
            coin_type: b[0],
            index: u16::from_be_bytes([b[3], b[4]]),
        })
    }

    /// Decode an extended-account key id, `None` if the reserved bytes are
    /// set
    pub fn decode_extended(b: [u8; KEY_ID_LEN]) -> Option<Self> {
        if b[2] != 0 || b[3] != 0 || b[4] != 0 {
            return None;
        }

        Some(KeyId::ExtendedAccount {
            coin_type: b[0],
            index: b[1],
        })
    }
}
