use crate::mac::command::{Parameters, Request};
use crate::mac::transaction::Transaction;
use crate::mac::{Device, Error};
use crate::transport::Transport;
use crate::upper::UpperLayer;

/// Parameters of an MLME-RESET request.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ResetRequest {
    /// Reset the PIB to its defaults as well.
    pub set_default_pib: bool,
}

impl Parameters for ResetRequest {
    const LEN: usize = 1;

    fn emit(&self, buffer: &mut [u8]) {
        buffer[0] = self.set_default_pib as u8;
    }

    fn parse(buffer: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            set_default_pib: buffer[0] != 0,
        })
    }
}

impl<T: Transport, U: UpperLayer> Device<T, U> {
    /// Used by the next higher layer to request a reset of the MAC, and of
    /// the PAN Information Base if `set_default_pib` is set.
    ///
    /// The cached addresses are left alone; they only follow confirmed PIB
    /// accesses.
    pub async fn reset(&self, set_default_pib: bool) -> Result<(), Error> {
        let mut transaction = self.lock().await?;
        self.reset_locked(&mut transaction, set_default_pib).await
    }

    pub(crate) async fn reset_locked(
        &self,
        transaction: &mut Transaction,
        set_default_pib: bool,
    ) -> Result<(), Error> {
        let request = Request::Reset(ResetRequest { set_default_pib });
        self.execute(transaction, &request)
            .await?
            .outcome()
            .into_result()
    }
}
