use jenusb_frame::{Address, NativeAddress};

use crate::mac::command::{Confirm, Parameters, Request};
use crate::mac::{ConfirmStatus, Device, Error, MacStatus};
use crate::transport::Transport;
use crate::upper::UpperLayer;

/// Bits of the capability information field.
pub mod capability {
    pub const ALTERNATE_PAN_COORDINATOR: u8 = 0x01;
    pub const FULL_FUNCTION_DEVICE: u8 = 0x02;
    pub const MAINS_POWERED: u8 = 0x04;
    pub const RX_ON_WHEN_IDLE: u8 = 0x08;
    pub const SECURITY: u8 = 0x40;
    pub const ALLOCATE_ADDRESS: u8 = 0x80;
}

/// Parameters of an MLME-ASSOCIATE request.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct AssociateRequest {
    /// The coordinator to associate with. Always an extended address.
    pub coordinator: Address,
    pub channel: u8,
    pub capability: u8,
    pub security_enable: bool,
}

impl Parameters for AssociateRequest {
    const LEN: usize = NativeAddress::SIZE + 3;

    fn emit(&self, buffer: &mut [u8]) {
        NativeAddress::from(self.coordinator).emit(buffer);
        let b = &mut buffer[NativeAddress::SIZE..Self::LEN];
        b[0] = self.channel;
        b[1] = self.capability;
        b[2] = self.security_enable as u8;
    }

    fn parse(buffer: &[u8]) -> Result<Self, Error> {
        let coordinator = NativeAddress::parse(buffer)?.address()?;
        let b = &buffer[NativeAddress::SIZE..Self::LEN];
        Ok(Self {
            coordinator,
            channel: b[0],
            capability: b[1],
            security_enable: b[2] != 0,
        })
    }
}

/// Outcome of an association attempt that was deferred.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct AssociateConfirm {
    /// The short address the coordinator allocated, `0xfffe` if we have to
    /// use our extended address.
    pub short_address: u16,
    pub status: MacStatus,
}

impl Parameters for AssociateConfirm {
    const LEN: usize = 3;

    fn emit(&self, buffer: &mut [u8]) {
        buffer[..2].copy_from_slice(&self.short_address.to_be_bytes());
        buffer[2] = self.status.into();
    }

    fn parse(buffer: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            short_address: u16::from_be_bytes([buffer[0], buffer[1]]),
            status: buffer[2].into(),
        })
    }
}

/// A device asks to associate with the PAN we coordinate.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct AssociateIndication {
    /// Extended address of the device.
    pub device: u64,
    pub capability: u8,
    pub security_use: bool,
    pub acl_entry: u8,
}

impl Parameters for AssociateIndication {
    const LEN: usize = 11;

    fn emit(&self, buffer: &mut [u8]) {
        buffer[..8].copy_from_slice(&self.device.to_be_bytes());
        buffer[8] = self.capability;
        buffer[9] = self.security_use as u8;
        buffer[10] = self.acl_entry;
    }

    fn parse(buffer: &[u8]) -> Result<Self, Error> {
        let mut device = [0u8; 8];
        device.copy_from_slice(&buffer[..8]);
        Ok(Self {
            device: u64::from_be_bytes(device),
            capability: buffer[8],
            security_use: buffer[9] != 0,
            acl_entry: buffer[10],
        })
    }
}

impl<T: Transport, U: UpperLayer> Device<T, U> {
    /// Request association with a coordinator.
    ///
    /// Returns the allocated short address if the coprocessor confirmed the
    /// association right away, and `None` if the outcome follows later as
    /// [`crate::upper::Notification::AssociateConfirm`].
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] if `coordinator` is not an extended address.
    pub async fn associate(
        &self,
        coordinator: Address,
        channel: u8,
        capability: u8,
    ) -> Result<Option<u16>, Error> {
        if !matches!(coordinator, Address::Extended { .. }) {
            return Err(Error::Precondition);
        }

        let mut transaction = self.lock().await?;
        let request = Request::Associate(AssociateRequest {
            coordinator,
            channel,
            capability,
            security_enable: false,
        });
        match self.execute(&mut transaction, &request).await? {
            Confirm::Associate {
                outcome,
                short_address,
            } => {
                outcome.into_result()?;
                Ok((outcome.status == ConfirmStatus::Success).then_some(short_address))
            }
            other => other.outcome().into_result().map(|_| None),
        }
    }

    /// Answer an association request.
    ///
    /// The coprocessor's response layout is not known, so nothing is sent.
    pub async fn associate_response(
        &self,
        _device: u64,
        _short_address: u16,
        _status: MacStatus,
    ) -> Result<(), Error> {
        warn!("association response is not supported");
        Err(Error::NotImplemented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_layout() {
        let request = AssociateRequest {
            coordinator: Address::Extended {
                pan_id: 0x1234,
                address: 0x0102_0304_0506_0708,
            },
            channel: 20,
            capability: capability::ALLOCATE_ADDRESS | capability::RX_ON_WHEN_IDLE,
            security_enable: false,
        };

        let mut buffer = [0u8; AssociateRequest::LEN];
        request.emit(&mut buffer);
        assert_eq!(
            buffer,
            [0x03, 0x12, 0x34, 1, 2, 3, 4, 5, 6, 7, 8, 20, 0x88, 0]
        );
        assert_eq!(AssociateRequest::parse(&buffer).unwrap(), request);
    }

    #[test]
    fn indication_layout() {
        let indication = AssociateIndication {
            device: 0x0011_2233_4455_6677,
            capability: capability::FULL_FUNCTION_DEVICE,
            security_use: true,
            acl_entry: 4,
        };

        let mut buffer = [0u8; AssociateIndication::LEN];
        indication.emit(&mut buffer);
        assert_eq!(
            buffer,
            [0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x02, 1, 4]
        );
        assert_eq!(AssociateIndication::parse(&buffer).unwrap(), indication);
    }

    #[test]
    fn confirm_layout() {
        let buffer = [0x00, 0x05, 0xea];
        assert_eq!(
            AssociateConfirm::parse(&buffer).unwrap(),
            AssociateConfirm {
                short_address: 5,
                status: MacStatus::NoBeacon
            }
        );
    }
}
