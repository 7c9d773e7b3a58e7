use jenusb_frame::{Address, NativeAddress};

use crate::mac::command::Parameters;
use crate::mac::Error;

/// Description of a PAN, as learned from one of its beacons.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PanDescriptor {
    /// Address of the coordinator that sent the beacon, raw.
    pub coordinator: NativeAddress,
    pub channel: u8,
    pub superframe_spec: u16,
    pub gts_permit: bool,
    pub link_quality: u8,
    pub timestamp: u32,
    pub security_use: bool,
    pub acl_entry: u8,
    pub security_failure: bool,
}

impl PanDescriptor {
    pub const LEN: usize = NativeAddress::SIZE + 12;

    fn emit(&self, buffer: &mut [u8]) {
        self.coordinator.emit(buffer);
        let b = &mut buffer[NativeAddress::SIZE..Self::LEN];
        b[0] = self.channel;
        b[1..3].copy_from_slice(&self.superframe_spec.to_be_bytes());
        b[3] = self.gts_permit as u8;
        b[4] = self.link_quality;
        b[5..9].copy_from_slice(&self.timestamp.to_be_bytes());
        b[9] = self.security_use as u8;
        b[10] = self.acl_entry;
        b[11] = self.security_failure as u8;
    }

    fn parse(buffer: &[u8]) -> Result<Self, Error> {
        let coordinator = NativeAddress::parse(buffer)?;
        let b = &buffer[NativeAddress::SIZE..Self::LEN];
        Ok(Self {
            coordinator,
            channel: b[0],
            superframe_spec: u16::from_be_bytes([b[1], b[2]]),
            gts_permit: b[3] != 0,
            link_quality: b[4],
            timestamp: u32::from_be_bytes([b[5], b[6], b[7], b[8]]),
            security_use: b[9] != 0,
            acl_entry: b[10],
            security_failure: b[11] != 0,
        })
    }
}

/// A beacon was received during a scan or while tracking the coordinator.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct BeaconNotifyIndication {
    pub pan_descriptor: PanDescriptor,
    /// Beacon sequence number.
    pub bsn: u8,
}

impl BeaconNotifyIndication {
    pub fn pan_id(&self) -> u16 {
        self.pan_descriptor.coordinator.pan_id
    }

    /// Short address of the coordinator, if it sent its beacon with one.
    pub fn coordinator_short_address(&self) -> Option<u16> {
        match self.pan_descriptor.coordinator.address() {
            Ok(Address::Short { address, .. }) => Some(address),
            _ => None,
        }
    }
}

impl Parameters for BeaconNotifyIndication {
    const LEN: usize = PanDescriptor::LEN + 1;

    fn emit(&self, buffer: &mut [u8]) {
        self.pan_descriptor.emit(buffer);
        buffer[PanDescriptor::LEN] = self.bsn;
    }

    fn parse(buffer: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            pan_descriptor: PanDescriptor::parse(buffer)?,
            bsn: buffer[PanDescriptor::LEN],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beacon(coordinator: Address) -> BeaconNotifyIndication {
        BeaconNotifyIndication {
            pan_descriptor: PanDescriptor {
                coordinator: coordinator.into(),
                channel: 15,
                superframe_spec: 0xcfff,
                gts_permit: false,
                link_quality: 0xd0,
                timestamp: 0x0001_0203,
                security_use: false,
                acl_entry: 0,
                security_failure: false,
            },
            bsn: 7,
        }
    }

    #[test]
    fn layout() {
        let indication = beacon(Address::Short {
            pan_id: 0xabcd,
            address: 0x0000,
        });

        let mut buffer = [0u8; BeaconNotifyIndication::LEN];
        indication.emit(&mut buffer);
        assert_eq!(buffer[..3], [0x02, 0xab, 0xcd]);
        assert_eq!(buffer[11..], [15, 0xcf, 0xff, 0, 0xd0, 0, 1, 2, 3, 0, 0, 0, 7]);
        assert_eq!(BeaconNotifyIndication::parse(&buffer).unwrap(), indication);
    }

    #[test]
    fn coordinator_address() {
        let short = beacon(Address::Short {
            pan_id: 0x1234,
            address: 0x0001,
        });
        assert_eq!(short.pan_id(), 0x1234);
        assert_eq!(short.coordinator_short_address(), Some(0x0001));

        let extended = beacon(Address::Extended {
            pan_id: 0x1234,
            address: 0x0102_0304_0506_0708,
        });
        assert_eq!(extended.pan_id(), 0x1234);
        assert_eq!(extended.coordinator_short_address(), None);
    }
}
