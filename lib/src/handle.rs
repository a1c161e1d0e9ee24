// Copyright (c) 2024 The CWS Host Project Authors

//! Handle for connected secure-element devices
//!
//! This provides the transaction flows and the signature-key handshake,
//! generic over [`Transport`] implementations.

use k256::ecdsa::SigningKey;
use log::debug;

use cws_apdu::{control, tx, ApduCommand, ApduResponse, Instruction};

use crate::{
    signature::SignatureKey,
    transport::Transport,
    tx::{auth, chunker, EncryptedSignature, TxInput},
    Error,
};

/// Handle for one connected secure-element device.
///
/// Owns the transport exclusively for the lifetime of the handle: flows
/// take `&mut self`, so a second flow cannot start on the same device
/// until the first returns. There is no internal locking and no internal
/// retry; failures surface immediately and leave device session state to
/// the caller.
pub struct DeviceHandle<T: Transport> {
    t: T,
}

/// Create a [`DeviceHandle`] wrapper from a type implementing [`Transport`]
impl<T: Transport> From<T> for DeviceHandle<T> {
    fn from(t: T) -> Self {
        Self { t }
    }
}

impl<T: Transport + Send> DeviceHandle<T> {
    /// Recover the underlying transport
    pub fn into_inner(self) -> T {
        self.t
    }

    /// Issue one command, logging the round trip
    async fn request(&mut self, command: &ApduCommand) -> Result<ApduResponse, Error<T::Error>> {
        debug!("> {command}");

        let resp = self
            .t
            .exchange(command)
            .await
            .map_err(Error::Transport)?;

        debug!("< {} ({:#06x})", hex::encode(&resp.data), resp.sw);

        Ok(resp)
    }

    /// Issue one command, mapping a non-success status word to
    /// [`Error::Device`]
    async fn request_ok(&mut self, command: &ApduCommand) -> Result<ApduResponse, Error<T::Error>> {
        let resp = self.request(command).await?;

        if !resp.is_ok() {
            return Err(Error::Device(resp.sw));
        }

        Ok(resp)
    }

    /// Run one data-phase pass: authorize, chunk, stage.
    ///
    /// Signs the payload with the host credential, appends the signature
    /// and delivers the combined buffer as a sequence of `TxPrepare`
    /// chunks. Every response is checked for a success status so a
    /// device-side rejection aborts the sequence early; only the final
    /// chunk's payload is the operation result.
    async fn prepare_data(
        &mut self,
        data: &[u8],
        data_type: u8,
        app_key: &SigningKey,
    ) -> Result<EncryptedSignature, Error<T::Error>> {
        if data.is_empty() {
            return Err(Error::EmptyPayload);
        }

        let host_sig = auth::command_signature(Instruction::TxPrepare, data_type, data, app_key)?;

        let mut send = Vec::with_capacity(data.len() + host_sig.len());
        send.extend_from_slice(data);
        send.extend_from_slice(&host_sig);

        debug!(
            "staging {} bytes ({} payload + {} signature)",
            send.len(),
            data.len(),
            host_sig.len()
        );

        let mut result = Vec::new();
        for (p2, chunk) in chunker::chunks(&send) {
            let resp = self.request_ok(&tx::prepare(data_type, p2, chunk)).await?;
            result = resp.data;
        }

        Ok(EncryptedSignature(result))
    }

    /// Prepare and sign a single transaction payload.
    ///
    /// Stages the payload, finalises preparation, then invokes the
    /// optional prepare-complete callback. Returns the encrypted
    /// signature for post-processing once the session key is retrieved.
    pub async fn sign_transaction(
        &mut self,
        data: &[u8],
        data_type: u8,
        app_key: &SigningKey,
        on_prepared: Option<&mut dyn FnMut()>,
    ) -> Result<EncryptedSignature, Error<T::Error>> {
        let sig = self.prepare_data(data, data_type, app_key).await?;

        self.request_ok(&tx::finish_prepare()).await?;

        if let Some(cb) = on_prepared {
            cb();
        }

        Ok(sig)
    }

    /// Prepare and sign a batch of independent inputs.
    ///
    /// Used by multi-input transaction formats: each input runs its own
    /// data-phase pass, strictly in input order (each pass depends on
    /// prior device state), and preparation is finalised once at the end.
    /// Returns one encrypted signature per input, in input order.
    pub async fn sign_transaction_batch(
        &mut self,
        inputs: &[TxInput],
        app_key: &SigningKey,
        on_prepared: Option<&mut dyn FnMut()>,
    ) -> Result<Vec<EncryptedSignature>, Error<T::Error>> {
        debug!("batch flow over {} inputs", inputs.len());

        let mut sigs = Vec::with_capacity(inputs.len());
        for input in inputs {
            let sig = self
                .prepare_data(&input.data, input.data_type, app_key)
                .await?;
            sigs.push(sig);
        }

        self.request_ok(&tx::finish_prepare()).await?;

        if let Some(cb) = on_prepared {
            cb();
        }

        Ok(sigs)
    }

    /// Execute a pre-built script on the device and sign its output.
    ///
    /// Uploads the script blob, authorizes the argument under the
    /// `ExecuteScript` instruction with the host credential, runs the
    /// script and finalises preparation. Script and `argument ∥ signature`
    /// must each fit a single APDU; the data phase here is not chunked.
    pub async fn execute_script(
        &mut self,
        script: &[u8],
        argument: &[u8],
        app_key: &SigningKey,
        on_prepared: Option<&mut dyn FnMut()>,
    ) -> Result<EncryptedSignature, Error<T::Error>> {
        debug!("script flow ({} byte script)", script.len());

        self.request_ok(&tx::send_script(script)).await?;

        let host_sig = auth::command_signature(Instruction::ExecuteScript, 0x00, argument, app_key)?;

        let mut data = Vec::with_capacity(argument.len() + host_sig.len());
        data.extend_from_slice(argument);
        data.extend_from_slice(&host_sig);

        let resp = self.request_ok(&tx::execute_script(&data)).await?;

        self.request_ok(&tx::finish_prepare()).await?;

        if let Some(cb) = on_prepared {
            cb();
        }

        Ok(EncryptedSignature(resp.data))
    }

    /// Retrieve the session signature-decryption key.
    ///
    /// Four fixed steps: request transaction-detail acknowledgement,
    /// notify the optional authorized callback, fetch the key bytes, then
    /// clear transaction state and power the device off. The cleanup pair
    /// always runs once reached (their status words are not checked) so
    /// the device returns to idle and holds no session state.
    ///
    /// A rejected first step is a defined outcome, not a fault: the
    /// handshake returns `Ok(None)` without invoking the callback or
    /// touching the device further.
    pub async fn signature_key(
        &mut self,
        on_authorized: Option<&mut dyn FnMut()>,
    ) -> Result<Option<SignatureKey>, Error<T::Error>> {
        let detail = self.request(&tx::get_detail()).await?;
        if !detail.is_ok() {
            debug!("transaction detail not acknowledged ({:#06x})", detail.sw);
            return Ok(None);
        }

        if let Some(cb) = on_authorized {
            cb();
        }

        let resp = self.request_ok(&tx::get_signature_key()).await?;

        let _ = self.request(&tx::clear()).await?;
        let _ = self.request(&control::power_off()).await?;

        let key = SignatureKey::try_from_slice(&resp.data)?;

        Ok(Some(key))
    }
}
