// Copyright (c) 2024 The CWS Host Project Authors

//! Payload chunking for the transaction data phase
//!
//! The combined `payload ∥ host-signature` buffer usually exceeds one APDU
//! and is split into [`MAX_APDU_DATA_LEN`] slices. Each slice carries a
//! position flag in `P2` so the device knows whether more data follows:
//! `0x00` for a lone chunk, otherwise the 1-based index with the high bit
//! set on the final chunk.

use cws_apdu::MAX_APDU_DATA_LEN;

/// Split `data` into ordered `(p2 flag, chunk)` pairs.
///
/// Chunks must be sent strictly in iteration order. Caller ensures `data`
/// is non-empty and spans at most 127 chunks (the index shares `P2` with
/// the final-chunk marker bit).
pub(crate) fn chunks(data: &[u8]) -> impl Iterator<Item = (u8, &[u8])> + '_ {
    let n = (data.len() + MAX_APDU_DATA_LEN - 1) / MAX_APDU_DATA_LEN;
    debug_assert!(n <= 0x7f, "payload spans too many chunks: {n}");

    data.chunks(MAX_APDU_DATA_LEN)
        .enumerate()
        .map(move |(i, c)| (position_flag(i, n), c))
}

fn position_flag(i: usize, n: usize) -> u8 {
    let index = (i + 1) as u8;

    if n == 1 {
        0x00
    } else if i + 1 == n {
        0x80 | index
    } else {
        index
    }
}
