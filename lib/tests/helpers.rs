// Copyright (c) 2024 The CWS Host Project Authors

//! Shared test helpers: a scripted mock transport standing in for a
//! connected device, plus logging setup.

use std::collections::VecDeque;
use std::str::FromStr;

use async_trait::async_trait;
use log::LevelFilter;
use simplelog::SimpleLogger;

use cws_host::{
    apdu::{ApduCommand, ApduResponse, SW_OK},
    k256::ecdsa::SigningKey,
    Transport,
};

/// Scripted transport: replays a fixed response sequence and records every
/// command sent, so tests can assert on exact wire traffic.
pub struct MockTransport {
    script: VecDeque<Result<ApduResponse, String>>,
    pub sent: Vec<ApduCommand>,
}

#[allow(unused)]
impl MockTransport {
    pub fn new(script: impl IntoIterator<Item = Result<ApduResponse, String>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            sent: vec![],
        }
    }

    /// Script of plain responses, no injected transport failures
    pub fn replying(responses: impl IntoIterator<Item = ApduResponse>) -> Self {
        Self::new(responses.into_iter().map(Ok))
    }
}

#[async_trait]
impl Transport for MockTransport {
    type Error = String;

    async fn exchange(&mut self, command: &ApduCommand) -> Result<ApduResponse, Self::Error> {
        self.sent.push(command.clone());

        self.script
            .pop_front()
            .unwrap_or_else(|| Err("response script exhausted".to_string()))
    }
}

/// Success response with the given payload
#[allow(unused)]
pub fn ok(data: impl Into<Vec<u8>>) -> ApduResponse {
    ApduResponse::new(data, SW_OK)
}

/// Device-side rejection (conditions not satisfied)
#[allow(unused)]
pub fn rejected() -> ApduResponse {
    ApduResponse::new(vec![], 0x6985)
}

/// Fixed host credential for flow tests
#[allow(unused)]
pub fn app_key() -> SigningKey {
    SigningKey::from_slice(&[0x42; 32]).unwrap()
}

#[allow(unused)]
pub fn init_logger() {
    let log_level = match std::env::var("LOG_LEVEL").map(|v| LevelFilter::from_str(&v)) {
        Ok(Ok(l)) => l,
        _ => LevelFilter::Debug,
    };

    let _ = SimpleLogger::init(log_level, simplelog::Config::default());
}
