// Copyright (c) 2024 The CWS Host Project Authors

//! Host authorization signatures
//!
//! Every payload staged on the device is accompanied by a signature from
//! the host credential, proving the paired application authorised the
//! operation. The signed message is the would-be command header with `P2`
//! fixed to zero, followed by the payload.

use k256::ecdsa::{signature::Signer, Signature, SigningKey};

use cws_apdu::{Instruction, CWS_APDU_CLA};

use crate::signature::SignatureError;

/// Sign `CLA ∥ INS ∥ P1 ∥ 00 ∥ payload` with the host credential.
///
/// Deterministic (RFC 6979 over a SHA-256 prehash): identical inputs
/// always produce identical DER output. Credential errors propagate
/// unmodified.
pub fn command_signature(
    ins: Instruction,
    p1: u8,
    payload: &[u8],
    app_key: &SigningKey,
) -> Result<Vec<u8>, SignatureError> {
    let mut msg = Vec::with_capacity(4 + payload.len());
    msg.extend_from_slice(&[CWS_APDU_CLA, ins as u8, p1, 0x00]);
    msg.extend_from_slice(payload);

    let sig: Signature = app_key.try_sign(&msg)?;

    Ok(sig.to_der().as_bytes().to_vec())
}

#[cfg(test)]
mod test {
    use super::*;
    use k256::ecdsa::{signature::Verifier, VerifyingKey};

    fn test_key() -> SigningKey {
        SigningKey::from_slice(&[0x42; 32]).unwrap()
    }

    #[test]
    fn signature_is_deterministic() {
        let key = test_key();
        let payload = [0xaa; 100];

        let a = command_signature(Instruction::TxPrepare, 0x01, &payload, &key).unwrap();
        let b = command_signature(Instruction::TxPrepare, 0x01, &payload, &key).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn signature_covers_header_and_payload() {
        let key = test_key();
        let payload = [0xaa, 0xbb, 0xcc];

        let der = command_signature(Instruction::TxPrepare, 0x01, &payload, &key).unwrap();
        let sig = Signature::from_der(&der).unwrap();

        let msg = [
            CWS_APDU_CLA,
            Instruction::TxPrepare as u8,
            0x01,
            0x00,
            0xaa,
            0xbb,
            0xcc,
        ];
        VerifyingKey::from(&key).verify(&msg, &sig).unwrap();
    }

    #[test]
    fn distinct_instructions_produce_distinct_signatures() {
        let key = test_key();
        let payload = [0xaa; 8];

        let a = command_signature(Instruction::TxPrepare, 0x00, &payload, &key).unwrap();
        let b = command_signature(Instruction::ExecuteScript, 0x00, &payload, &key).unwrap();

        assert_ne!(a, b);
    }
}
