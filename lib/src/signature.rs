// Copyright (c) 2024 The CWS Host Project Authors

//! Signature post-processing
//!
//! The device never returns a signature in the clear: the result of a
//! prepare flow is an AES-256-CBC ciphertext keyed by the one-time session
//! key obtained via [`DeviceHandle::signature_key`][crate::DeviceHandle].
//! This module decrypts that output and normalises ECDSA signatures to
//! canonical (low-S) or DER form.

use k256::ecdsa::Signature as K256Signature;
use zeroize::{Zeroize, ZeroizeOnDrop};

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};

type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Signing scheme used by the selected device key
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
pub enum SignatureScheme {
    /// secp256k1 ECDSA, device output is DER encoded
    Ecdsa,
    /// EdDSA, device output is the final signature bytes
    Eddsa,
}

/// Output shape requested for an ECDSA signature
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
pub enum SignatureForm {
    /// `{r, s}` with `s` in the lower half of the curve order
    Canonical,
    /// ASN.1 DER bytes, low-S enforced before re-encoding
    Der,
}

/// Cryptographic failures during signing or post-processing
///
/// These indicate a logic or data-integrity bug upstream rather than a
/// transient condition; nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    /// Ciphertext did not decrypt under the session key
    #[error("signature decryption failed")]
    Decrypt,

    /// Malformed DER bytes, invalid scalars, or a bad host credential
    #[error("cryptographic failure: {0}")]
    Crypto(#[from] k256::ecdsa::Error),

    /// Session key must be exactly [`SignatureKey::LEN`] bytes
    #[error("signature key length invalid: {0}")]
    InvalidKeyLength(usize),

    /// Session key hex did not decode
    #[error("malformed signature key hex: {0}")]
    KeyHex(#[from] hex::FromHexError),
}

/// One-time symmetric key decrypting the signatures of a single session.
///
/// Retrieved through the key handshake, never reused across sessions, and
/// wiped from memory on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SignatureKey([u8; 32]);

impl SignatureKey {
    /// Key width in bytes (AES-256)
    pub const LEN: usize = 32;

    /// Wrap raw key bytes
    pub fn from_bytes(b: [u8; Self::LEN]) -> Self {
        Self(b)
    }

    /// Parse a key from its hex form
    pub fn from_hex(s: &str) -> Result<Self, SignatureError> {
        Self::try_from_slice(&hex::decode(s)?)
    }

    /// Wrap key bytes of checked length
    pub fn try_from_slice(b: &[u8]) -> Result<Self, SignatureError> {
        let b: [u8; Self::LEN] = b
            .try_into()
            .map_err(|_| SignatureError::InvalidKeyLength(b.len()))?;
        Ok(Self(b))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// An ECDSA signature as `{r, s}` component bytes (big-endian)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EcdsaSignature {
    pub r: [u8; 32],
    pub s: [u8; 32],
}

impl EcdsaSignature {
    fn from_k256(sig: &K256Signature) -> Self {
        let (r, s) = sig.split_bytes();
        Self {
            r: r.into(),
            s: s.into(),
        }
    }

    fn to_k256(self) -> Result<K256Signature, SignatureError> {
        let sig = K256Signature::from_scalars(self.r, self.s)?;
        Ok(sig)
    }

    /// Normalise `s` to the lower half of the curve order.
    ///
    /// Idempotent: an already-canonical signature is returned unchanged.
    pub fn canonicalize(self) -> Result<Self, SignatureError> {
        let sig = self.to_k256()?;
        let sig = sig.normalize_s().unwrap_or(sig);
        Ok(Self::from_k256(&sig))
    }

    /// Re-encode as DER, enforcing low-S first
    pub fn to_der(self) -> Result<Vec<u8>, SignatureError> {
        let sig = self.canonicalize()?.to_k256()?;
        Ok(sig.to_der().as_bytes().to_vec())
    }
}

/// A decrypted, normalised device signature
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceSignature {
    /// EdDSA signature bytes, passed through unmodified
    Eddsa(Vec<u8>),
    /// Canonical ECDSA `{r, s}`
    Canonical(EcdsaSignature),
    /// Canonical ECDSA re-encoded as DER
    Der(Vec<u8>),
}

/// Decrypt and normalise an encrypted signature returned by the device.
///
/// Decryption is AES-256-CBC with an all-zero IV: the key is single-use
/// and session-scoped, so IV reuse cannot occur across sessions. This is a
/// deliberate simplification in the device firmware and is load-bearing
/// for wire compatibility, do not change it.
pub fn decrypt_signature(
    encrypted: &[u8],
    key: &SignatureKey,
    scheme: SignatureScheme,
    form: SignatureForm,
) -> Result<DeviceSignature, SignatureError> {
    let iv = [0u8; 16];

    let plain = Aes256CbcDec::new_from_slices(key.as_bytes(), &iv)
        .map_err(|_| SignatureError::Decrypt)?
        .decrypt_padded_vec_mut::<Pkcs7>(encrypted)
        .map_err(|_| SignatureError::Decrypt)?;

    if scheme == SignatureScheme::Eddsa {
        return Ok(DeviceSignature::Eddsa(plain));
    }

    let sig = K256Signature::from_der(&plain)?;
    let sig = sig.normalize_s().unwrap_or(sig);

    match form {
        SignatureForm::Canonical => Ok(DeviceSignature::Canonical(EcdsaSignature::from_k256(&sig))),
        SignatureForm::Der => Ok(DeviceSignature::Der(sig.to_der().as_bytes().to_vec())),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // secp256k1 group order n, and n - 1 (a high-S value normalising to 1)
    const ORDER_MINUS_ONE: &str =
        "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140";

    // Fixture: AES-256-CBC(zero IV, key 000102..1f) over a 70 byte DER
    // signature with both scalars already canonical.
    const FIXTURE_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
    const FIXTURE_DER: &str = "304402201fa3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a302202b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b";
    const FIXTURE_CT: &str = "5e6fbcbd1fb36a6c5acf2369846059ab63a132aafba1f68163d0962a6bd22f70e79cf31bd086302f60f65d4027e9f8c7fa1d4a3f1a71bb510fc8f505c39bd711c35ee284bc6d04982974260c145251f4";

    // Same key over a 64 byte EdDSA signature stand-in
    const FIXTURE_EDDSA: &str = "c7c7c7c7c7c7c7c7c7c7c7c7c7c7c7c7c7c7c7c7c7c7c7c7c7c7c7c7c7c7c7c71515151515151515151515151515151515151515151515151515151515151515";
    const FIXTURE_EDDSA_CT: &str = "5e9e7e9742c0897f78fd08023d22b5085e494b66e447854e34b3e4c91be980a1690d8b7bd539cd6e1814e8022640dc55224d43265b010c18a537c5888de13aa126377e895940c89eec8b6a23d9b058a6";

    fn fixture_key() -> SignatureKey {
        SignatureKey::from_hex(FIXTURE_KEY).unwrap()
    }

    fn arr32(hex_str: &str) -> [u8; 32] {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    #[test]
    fn decrypt_reproduces_known_der_plaintext() {
        let ct = hex::decode(FIXTURE_CT).unwrap();

        let sig = decrypt_signature(
            &ct,
            &fixture_key(),
            SignatureScheme::Ecdsa,
            SignatureForm::Der,
        )
        .unwrap();

        // Fixture scalars are already low-S, so DER output matches the
        // decrypted plaintext exactly
        assert_eq!(sig, DeviceSignature::Der(hex::decode(FIXTURE_DER).unwrap()));
    }

    #[test]
    fn decrypt_canonical_components() {
        let ct = hex::decode(FIXTURE_CT).unwrap();

        let sig = decrypt_signature(
            &ct,
            &fixture_key(),
            SignatureScheme::Ecdsa,
            SignatureForm::Canonical,
        )
        .unwrap();

        let expected = EcdsaSignature {
            r: arr32("1fa3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3a3"),
            s: arr32("2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b"),
        };
        assert_eq!(sig, DeviceSignature::Canonical(expected));
    }

    #[test]
    fn eddsa_output_passes_through_unmodified() {
        let ct = hex::decode(FIXTURE_EDDSA_CT).unwrap();

        let sig = decrypt_signature(
            &ct,
            &fixture_key(),
            SignatureScheme::Eddsa,
            SignatureForm::Canonical,
        )
        .unwrap();

        assert_eq!(
            sig,
            DeviceSignature::Eddsa(hex::decode(FIXTURE_EDDSA).unwrap())
        );
    }

    #[test]
    fn decrypt_rejects_wrong_key() {
        let ct = hex::decode(FIXTURE_CT).unwrap();
        let key = SignatureKey::from_bytes([0xff; 32]);

        let r = decrypt_signature(&ct, &key, SignatureScheme::Ecdsa, SignatureForm::Der);
        assert!(matches!(
            r,
            Err(SignatureError::Decrypt | SignatureError::Crypto(_))
        ));
    }

    #[test]
    fn canonicalize_normalizes_high_s() {
        let sig = EcdsaSignature {
            r: [0x11; 32],
            s: arr32(ORDER_MINUS_ONE),
        };

        let canonical = sig.canonicalize().unwrap();

        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(canonical.r, sig.r);
        assert_eq!(canonical.s, one);
    }

    #[test]
    fn canonicalize_is_idempotent() {
        let sig = EcdsaSignature {
            r: [0x11; 32],
            s: arr32(ORDER_MINUS_ONE),
        };

        let once = sig.canonicalize().unwrap();
        assert_eq!(once.canonicalize().unwrap(), once);

        // already-canonical input comes back unchanged
        let low = EcdsaSignature {
            r: [0x11; 32],
            s: [0x2b; 32],
        };
        assert_eq!(low.canonicalize().unwrap(), low);
    }

    #[test]
    fn der_round_trip_is_stable() {
        let sig = EcdsaSignature {
            r: [0x11; 32],
            s: arr32(ORDER_MINUS_ONE),
        };

        let der = sig.to_der().unwrap();
        let parsed = K256Signature::from_der(&der).unwrap();
        assert_eq!(EcdsaSignature::from_k256(&parsed).to_der().unwrap(), der);
    }

    #[test]
    fn key_length_is_checked() {
        assert!(matches!(
            SignatureKey::try_from_slice(&[0u8; 16]),
            Err(SignatureError::InvalidKeyLength(16))
        ));
    }
}
