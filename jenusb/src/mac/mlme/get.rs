use crate::mac::command::{Confirm, Parameters, Request};
use crate::mac::constants::{pib, BROADCAST_PAN_ID, BROADCAST_SHORT_ADDRESS, UNDEFINED_SHORT_ADDRESS};
use crate::mac::transaction::Transaction;
use crate::mac::{Device, Error};
use crate::transport::Transport;
use crate::upper::UpperLayer;

/// Parameters of an MLME-GET request.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct GetRequest {
    pub attribute: u8,
    pub index: u8,
}

impl Parameters for GetRequest {
    const LEN: usize = 2;

    fn emit(&self, buffer: &mut [u8]) {
        buffer[0] = self.attribute;
        buffer[1] = self.index;
    }

    fn parse(buffer: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            attribute: buffer[0],
            index: buffer[1],
        })
    }
}

impl<T: Transport, U: UpperLayer> Device<T, U> {
    /// Read a PIB attribute from the coprocessor.
    ///
    /// A confirmed read of the PAN identifier or the short address also
    /// refreshes the cached value, as a confirmed write does. A rejected or
    /// failed read leaves the cache alone.
    pub async fn get_pib(&self, attribute: u8) -> Result<u16, Error> {
        let mut transaction = self.lock().await?;
        self.get_pib_locked(&mut transaction, attribute).await
    }

    /// Read PAN identifier and short address from the coprocessor and update
    /// the cached values with what was confirmed.
    ///
    /// Use this to pick up addresses the coprocessor assigned on its own,
    /// for example after an association. If the second read fails, the PAN
    /// identifier has already been refreshed.
    pub async fn refresh_addresses(&self) -> Result<(u16, u16), Error> {
        let mut transaction = self.lock().await?;
        let pan_id = self.get_pib_locked(&mut transaction, pib::PAN_ID).await?;
        let short_address = self
            .get_pib_locked(&mut transaction, pib::SHORT_ADDRESS)
            .await?;
        Ok((pan_id, short_address))
    }

    /// Cached PAN identifier. Never suspends.
    pub fn get_pan_id(&self) -> u16 {
        self.state.pan_id()
    }

    /// Cached short address. Never suspends.
    pub fn get_short_address(&self) -> u16 {
        self.state.short_address()
    }

    /// Cached PAN identifier and short address.
    ///
    /// # Errors
    ///
    /// [`Error::AddressNotAvailable`] while the PAN identifier is the
    /// broadcast PAN or the short address is the broadcast or undefined
    /// address.
    pub fn get_address(&self) -> Result<(u16, u16), Error> {
        let pan_id = self.get_pan_id();
        let short_address = self.get_short_address();
        if pan_id == BROADCAST_PAN_ID
            || short_address == BROADCAST_SHORT_ADDRESS
            || short_address == UNDEFINED_SHORT_ADDRESS
        {
            return Err(Error::AddressNotAvailable);
        }
        Ok((pan_id, short_address))
    }

    async fn get_pib_locked(
        &self,
        transaction: &mut Transaction,
        attribute: u8,
    ) -> Result<u16, Error> {
        let request = Request::Get(GetRequest {
            attribute,
            index: 0,
        });
        let Confirm::Get { outcome, value, .. } = self.execute(transaction, &request).await?
        else {
            return Err(Error::Malformed);
        };
        outcome.into_result()?;

        match attribute {
            pib::PAN_ID => self.state.set_pan_id(value),
            pib::SHORT_ADDRESS => self.state.set_short_address(value),
            _ => {}
        }
        Ok(value)
    }
}
