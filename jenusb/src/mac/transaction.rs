//! The transaction engine: one request, one confirmation.

use super::command::{Confirm, Request};
use super::{Device, Error};
use crate::transport::{Transport, TransportError};
use crate::upper::UpperLayer;

/// Buffers of the single in-flight exchange.
///
/// Only reachable through the transaction lock, so holding a
/// `&mut Transaction` proves the lock is held.
pub struct Transaction {
    request: [u8; Request::SIZE],
    confirm: [u8; Confirm::SIZE],
    handle: u8,
}

impl Transaction {
    pub(crate) fn new() -> Self {
        Self {
            request: [0; Request::SIZE],
            confirm: [0; Confirm::SIZE],
            handle: 0,
        }
    }

    /// MSDU handle for the next data request.
    pub(crate) fn next_handle(&mut self) -> u8 {
        let handle = self.handle;
        self.handle = self.handle.wrapping_add(1);
        handle
    }
}

impl<T: Transport, U: UpperLayer> Device<T, U> {
    /// Send `request` and wait for its confirmation.
    ///
    /// A confirmation with an error status is returned as is; interpreting
    /// it is up to the caller.
    ///
    /// # Errors
    ///
    /// - [`Error::NotRunning`] if the device is closed.
    /// - [`Error::ProtocolDesync`] if the confirmation answers a different
    ///   request, and for every request after that until the device is
    ///   reopened.
    /// - [`Error::Transport`] if the write fails, if a read fails with
    ///   anything but a timeout, or if every attempt timed out.
    /// - [`Error::Malformed`] if the confirmation is too short.
    pub(crate) async fn execute(
        &self,
        transaction: &mut Transaction,
        request: &Request,
    ) -> Result<Confirm, Error> {
        if !self.state.is_running() {
            return Err(Error::NotRunning);
        }
        if self.state.is_desynchronized() {
            return Err(Error::ProtocolDesync);
        }

        let len = request.emit(&mut transaction.request);
        trace!("request {}/{}", request.sap(), request.kind());

        // A failed write is not retried: the device may have taken it.
        match self
            .transport
            .send(&transaction.request[..len], self.config.request_timeout_ms)
            .await
        {
            Ok(written) if written == len => {}
            Ok(written) => {
                error!("request write incomplete: {} of {} octets", written, len);
                return Err(Error::Transport(TransportError::Io));
            }
            Err(err) => {
                error!("request write failed: {}", err);
                return Err(Error::Transport(err));
            }
        }

        let len = self.read_confirm(transaction).await?;
        let raw = &transaction.confirm[..len];

        if raw.len() < 2 || raw[0] != request.sap() || raw[1] != request.kind() {
            error!(
                "confirmation does not match request {}/{}",
                request.sap(),
                request.kind()
            );
            self.fault(|h| h.desynchronized = true, Error::ProtocolDesync)
                .await;
            return Err(Error::ProtocolDesync);
        }

        let confirm = Confirm::parse(raw)?;
        if !confirm.outcome().is_ok() {
            warn!(
                "request {}/{} rejected: {:?}",
                request.sap(),
                request.kind(),
                confirm.outcome().reason
            );
        }
        Ok(confirm)
    }

    async fn read_confirm(&self, transaction: &mut Transaction) -> Result<usize, Error> {
        let mut attempt = 1;
        loop {
            match self
                .transport
                .recv_confirm(&mut transaction.confirm, self.config.confirm_timeout_ms)
                .await
            {
                Ok(len) => return Ok(len),
                Err(TransportError::Timeout { .. }) if attempt < self.config.confirm_attempts => {
                    trace!("confirmation timeout, attempt {}", attempt);
                    attempt += 1;
                }
                Err(err) => {
                    error!("confirmation read failed: {}", err);
                    return Err(Error::Transport(err));
                }
            }
        }
    }
}
