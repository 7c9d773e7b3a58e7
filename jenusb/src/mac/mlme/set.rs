use crate::mac::command::{Parameters, Request};
use crate::mac::constants::{pib, BROADCAST_PAN_ID, BROADCAST_SHORT_ADDRESS, UNDEFINED_SHORT_ADDRESS};
use crate::mac::transaction::Transaction;
use crate::mac::{Device, Error};
use crate::transport::Transport;
use crate::upper::UpperLayer;

/// Parameters of an MLME-SET request.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SetRequest {
    /// PIB attribute identifier, see [`crate::mac::constants::pib`].
    pub attribute: u8,
    /// Index into table attributes, 0 otherwise.
    pub index: u8,
    pub value: u16,
}

impl Parameters for SetRequest {
    const LEN: usize = 4;

    fn emit(&self, buffer: &mut [u8]) {
        buffer[0] = self.attribute;
        buffer[1] = self.index;
        buffer[2..4].copy_from_slice(&self.value.to_be_bytes());
    }

    fn parse(buffer: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            attribute: buffer[0],
            index: buffer[1],
            value: u16::from_be_bytes([buffer[2], buffer[3]]),
        })
    }
}

impl<T: Transport, U: UpperLayer> Device<T, U> {
    /// Used by the next higher layer to attempt to write the given value to
    /// the indicated MAC PIB attribute.
    pub async fn set_pib(&self, attribute: u8, value: u16) -> Result<(), Error> {
        let mut transaction = self.lock().await?;
        self.set_pib_locked(&mut transaction, attribute, value).await
    }

    pub async fn set_pan_id(&self, pan_id: u16) -> Result<(), Error> {
        self.set_pib(pib::PAN_ID, pan_id).await
    }

    pub async fn set_short_address(&self, short_address: u16) -> Result<(), Error> {
        self.set_pib(pib::SHORT_ADDRESS, short_address).await
    }

    /// Set PAN identifier and short address.
    ///
    /// Both are written even if the first write fails; the first failure is
    /// returned.
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] if the PAN identifier is the broadcast PAN or
    /// the short address is the broadcast or undefined address.
    pub async fn set_address(&self, pan_id: u16, short_address: u16) -> Result<(), Error> {
        if pan_id == BROADCAST_PAN_ID
            || short_address == BROADCAST_SHORT_ADDRESS
            || short_address == UNDEFINED_SHORT_ADDRESS
        {
            return Err(Error::Precondition);
        }

        let mut transaction = self.lock().await?;
        let pan = self
            .set_pib_locked(&mut transaction, pib::PAN_ID, pan_id)
            .await;
        let short = self
            .set_pib_locked(&mut transaction, pib::SHORT_ADDRESS, short_address)
            .await;
        pan.and(short)
    }

    /// Write a PIB attribute. The cached addresses follow a confirmed write.
    pub(crate) async fn set_pib_locked(
        &self,
        transaction: &mut Transaction,
        attribute: u8,
        value: u16,
    ) -> Result<(), Error> {
        let request = Request::Set(SetRequest {
            attribute,
            index: 0,
            value,
        });
        self.execute(transaction, &request)
            .await?
            .outcome()
            .into_result()?;

        match attribute {
            pib::PAN_ID => self.state.set_pan_id(value),
            pib::SHORT_ADDRESS => self.state.set_short_address(value),
            _ => {}
        }
        debug!("pib attribute {:x} set to {:x}", attribute, value);
        Ok(())
    }
}
