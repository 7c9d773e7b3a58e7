use jenusb_frame::{Address, NativeAddress};

use crate::mac::command::{Parameters, Request};
use crate::mac::{Device, Error, MacStatus};
use crate::transport::Transport;
use crate::upper::UpperLayer;

/// Disassociation reasons.
pub mod reason {
    /// The coordinator wishes the device to leave the PAN.
    pub const COORDINATOR_REQUEST: u8 = 0x01;
    /// The device wishes to leave the PAN.
    pub const DEVICE_REQUEST: u8 = 0x02;
}

/// Parameters of an MLME-DISASSOCIATE request.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DisassociateRequest {
    /// The peer, our coordinator or one of our devices.
    pub address: Address,
    pub reason: u8,
    pub security_enable: bool,
}

impl Parameters for DisassociateRequest {
    const LEN: usize = NativeAddress::SIZE + 2;

    fn emit(&self, buffer: &mut [u8]) {
        NativeAddress::from(self.address).emit(buffer);
        buffer[NativeAddress::SIZE] = self.reason;
        buffer[NativeAddress::SIZE + 1] = self.security_enable as u8;
    }

    fn parse(buffer: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            address: NativeAddress::parse(buffer)?.address()?,
            reason: buffer[NativeAddress::SIZE],
            security_enable: buffer[NativeAddress::SIZE + 1] != 0,
        })
    }
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DisassociateConfirm {
    pub status: MacStatus,
}

impl Parameters for DisassociateConfirm {
    const LEN: usize = 1;

    fn emit(&self, buffer: &mut [u8]) {
        buffer[0] = self.status.into();
    }

    fn parse(buffer: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            status: buffer[0].into(),
        })
    }
}

/// A peer ended an association.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DisassociateIndication {
    /// Extended address of the peer.
    pub device: u64,
    pub reason: u8,
    pub security_use: bool,
    pub acl_entry: u8,
}

impl Parameters for DisassociateIndication {
    const LEN: usize = 11;

    fn emit(&self, buffer: &mut [u8]) {
        buffer[..8].copy_from_slice(&self.device.to_be_bytes());
        buffer[8] = self.reason;
        buffer[9] = self.security_use as u8;
        buffer[10] = self.acl_entry;
    }

    fn parse(buffer: &[u8]) -> Result<Self, Error> {
        let mut device = [0u8; 8];
        device.copy_from_slice(&buffer[..8]);
        Ok(Self {
            device: u64::from_be_bytes(device),
            reason: buffer[8],
            security_use: buffer[9] != 0,
            acl_entry: buffer[10],
        })
    }
}

impl<T: Transport, U: UpperLayer> Device<T, U> {
    /// Leave the PAN, or ask one of our devices to leave it.
    ///
    /// The outcome follows as
    /// [`crate::upper::Notification::DisassociateConfirm`].
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] if `address` is not an extended address.
    pub async fn disassociate(&self, address: Address, reason: u8) -> Result<(), Error> {
        if !matches!(address, Address::Extended { .. }) {
            return Err(Error::Precondition);
        }

        let mut transaction = self.lock().await?;
        let request = Request::Disassociate(DisassociateRequest {
            address,
            reason,
            security_enable: false,
        });
        self.execute(&mut transaction, &request)
            .await?
            .outcome()
            .into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_layout() {
        let request = DisassociateRequest {
            address: Address::Extended {
                pan_id: 0x1234,
                address: 0x0a0b_0c0d_0e0f_1011,
            },
            reason: reason::DEVICE_REQUEST,
            security_enable: false,
        };

        let mut buffer = [0u8; DisassociateRequest::LEN];
        request.emit(&mut buffer);
        assert_eq!(
            buffer,
            [0x03, 0x12, 0x34, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x10, 0x11, 2, 0]
        );
        assert_eq!(DisassociateRequest::parse(&buffer).unwrap(), request);
    }

    #[test]
    fn indication_layout() {
        let buffer = [0, 0, 0, 0, 0, 0, 0, 9, 1, 0, 0];
        assert_eq!(
            DisassociateIndication::parse(&buffer).unwrap(),
            DisassociateIndication {
                device: 9,
                reason: reason::COORDINATOR_REQUEST,
                security_use: false,
                acl_entry: 0,
            }
        );
    }
}
