use crate::mac::command::{Parameters, Request};
use crate::mac::constants::{pib, COORDINATOR_SHORT_ADDRESS};
use crate::mac::{Device, Error};
use crate::transport::Transport;
use crate::upper::UpperLayer;

/// Beacon and superframe order of a nonbeacon-enabled PAN.
pub const NO_BEACONS: u8 = 15;

/// Parameters of an MLME-START request.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct StartRequest {
    pub pan_id: u16,
    pub channel: u8,
    pub beacon_order: u8,
    pub superframe_order: u8,
    /// Start a new PAN as its coordinator instead of beaconing on an
    /// existing one.
    pub pan_coordinator: bool,
    pub battery_life_extension: bool,
    pub coord_realignment: bool,
    pub security_enable: bool,
}

impl StartRequest {
    /// A nonbeacon-enabled PAN on `channel`.
    pub fn new(pan_id: u16, channel: u8, pan_coordinator: bool) -> Self {
        Self {
            pan_id,
            channel,
            beacon_order: NO_BEACONS,
            superframe_order: NO_BEACONS,
            pan_coordinator,
            battery_life_extension: false,
            coord_realignment: false,
            security_enable: false,
        }
    }
}

impl Parameters for StartRequest {
    const LEN: usize = 9;

    fn emit(&self, buffer: &mut [u8]) {
        buffer[..2].copy_from_slice(&self.pan_id.to_be_bytes());
        buffer[2] = self.channel;
        buffer[3] = self.beacon_order;
        buffer[4] = self.superframe_order;
        buffer[5] = self.pan_coordinator as u8;
        buffer[6] = self.battery_life_extension as u8;
        buffer[7] = self.coord_realignment as u8;
        buffer[8] = self.security_enable as u8;
    }

    fn parse(buffer: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            pan_id: u16::from_be_bytes([buffer[0], buffer[1]]),
            channel: buffer[2],
            beacon_order: buffer[3],
            superframe_order: buffer[4],
            pan_coordinator: buffer[5] != 0,
            battery_life_extension: buffer[6] != 0,
            coord_realignment: buffer[7] != 0,
            security_enable: buffer[8] != 0,
        })
    }
}

impl<T: Transport, U: UpperLayer> Device<T, U> {
    /// Start using a superframe configuration.
    ///
    /// A PAN coordinator always uses short address `0x0000`, so it is set
    /// first. If that fails, the start request is not sent.
    pub async fn start(&self, request: StartRequest) -> Result<(), Error> {
        let mut transaction = self.lock().await?;

        if request.pan_coordinator {
            self.set_pib_locked(&mut transaction, pib::SHORT_ADDRESS, COORDINATOR_SHORT_ADDRESS)
                .await?;
        }

        self.execute(&mut transaction, &Request::Start(request))
            .await?
            .outcome()
            .into_result()?;
        info!("started PAN {:x} on channel {}", request.pan_id, request.channel);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let request = StartRequest::new(0x1234, 11, true);
        let mut buffer = [0u8; StartRequest::LEN];
        request.emit(&mut buffer);
        assert_eq!(buffer, [0x12, 0x34, 11, 15, 15, 1, 0, 0, 0]);
        assert_eq!(StartRequest::parse(&buffer).unwrap(), request);
    }
}
