use core::ops::RangeInclusive;

use crate::mac::command::{Parameters, Request};
use crate::mac::constants::{ALL_CHANNELS, MAX_ENERGY_RESULTS};
use crate::mac::{Device, Error, MacStatus};
use crate::transport::Transport;
use crate::upper::UpperLayer;

/// Highest scan duration exponent the MAC accepts.
const MAX_SCAN_DURATION: u8 = 14;

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ScanType {
    EnergyDetect = 0,
    Active = 1,
    Passive = 2,
    Orphan = 3,
}

impl TryFrom<u8> for ScanType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::EnergyDetect),
            1 => Ok(Self::Active),
            2 => Ok(Self::Passive),
            3 => Ok(Self::Orphan),
            _ => Err(Error::Malformed),
        }
    }
}

/// Channels of page 0 in the 2.4 GHz band to scan.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ScanChannels {
    /// Channels 11 to 26.
    All,
    Single(u8),
    /// One bit per channel, bit 11 for channel 11.
    Mask(u32),
}

impl ScanChannels {
    /// The channel bitmask sent to the coprocessor.
    pub fn mask(&self) -> u32 {
        match self {
            ScanChannels::All => ALL_CHANNELS,
            ScanChannels::Single(channel) if *channel < 32 => 1 << channel,
            ScanChannels::Single(_) => 0,
            ScanChannels::Mask(mask) => *mask,
        }
    }

    /// Returns `true` if at least one channel is selected and all of them
    /// are in the 2.4 GHz band.
    pub fn is_valid(&self) -> bool {
        let mask = self.mask();
        mask != 0 && mask & !ALL_CHANNELS == 0
    }
}

// Lets you write `for channel in ScanChannels::All { .. }`.
impl IntoIterator for ScanChannels {
    type Item = u8;
    type IntoIter = Channels;

    fn into_iter(self) -> Self::IntoIter {
        Channels {
            mask: self.mask() & ALL_CHANNELS,
            range: 11..=26,
        }
    }
}

/// Iterator over the in-band channels of a [`ScanChannels`].
pub struct Channels {
    mask: u32,
    range: RangeInclusive<u8>,
}

impl Iterator for Channels {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let mask = self.mask;
        self.range.find(|channel| mask & (1 << channel) != 0)
    }
}

/// Parameters of an MLME-SCAN request.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ScanRequest {
    pub scan_type: ScanType,
    /// Channel bitmask, see [`ScanChannels::mask`].
    pub channels: u32,
    /// Scan duration exponent: each channel is scanned for
    /// `aBaseSuperframeDuration * (2^n + 1)` symbols.
    pub duration: u8,
}

impl Parameters for ScanRequest {
    const LEN: usize = 6;

    fn emit(&self, buffer: &mut [u8]) {
        buffer[..4].copy_from_slice(&self.channels.to_be_bytes());
        buffer[4] = self.scan_type as u8;
        buffer[5] = self.duration;
    }

    fn parse(buffer: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            channels: u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]),
            scan_type: ScanType::try_from(buffer[4])?,
            duration: buffer[5],
        })
    }
}

/// Result of a scan, delivered on the indication conduit.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ScanConfirm {
    pub status: MacStatus,
    pub scan_type: ScanType,
    /// Number of valid entries in the result list.
    pub result_count: u8,
    /// Channels that were requested but not scanned.
    pub unscanned_channels: u32,
    energy: [u8; MAX_ENERGY_RESULTS],
}

impl ScanConfirm {
    pub fn new(status: MacStatus, scan_type: ScanType, unscanned_channels: u32) -> Self {
        Self {
            status,
            scan_type,
            result_count: 0,
            unscanned_channels,
            energy: [0; MAX_ENERGY_RESULTS],
        }
    }

    /// Add one energy reading. Returns `false` when the list is full.
    pub fn push_energy(&mut self, energy: u8) -> bool {
        let count = self.result_count as usize;
        if count == MAX_ENERGY_RESULTS {
            return false;
        }
        self.energy[count] = energy;
        self.result_count += 1;
        true
    }

    /// Energy readings of an energy detection scan, one per scanned
    /// channel in ascending channel order.
    pub fn energy_detect(&self) -> Option<&[u8]> {
        match self.scan_type {
            ScanType::EnergyDetect => {
                Some(&self.energy[..(self.result_count as usize).min(MAX_ENERGY_RESULTS)])
            }
            _ => None,
        }
    }
}

impl Parameters for ScanConfirm {
    const LEN: usize = 8 + MAX_ENERGY_RESULTS;

    fn emit(&self, buffer: &mut [u8]) {
        buffer[0] = self.status.into();
        buffer[1] = self.scan_type as u8;
        buffer[2] = self.result_count;
        buffer[3] = 0;
        buffer[4..8].copy_from_slice(&self.unscanned_channels.to_be_bytes());
        buffer[8..Self::LEN].copy_from_slice(&self.energy);
    }

    fn parse(buffer: &[u8]) -> Result<Self, Error> {
        let mut energy = [0; MAX_ENERGY_RESULTS];
        energy.copy_from_slice(&buffer[8..Self::LEN]);
        Ok(Self {
            status: buffer[0].into(),
            scan_type: ScanType::try_from(buffer[1])?,
            result_count: buffer[2],
            unscanned_channels: u32::from_be_bytes([buffer[4], buffer[5], buffer[6], buffer[7]]),
            energy,
        })
    }
}

impl<T: Transport, U: UpperLayer> Device<T, U> {
    /// Initiates a channel scan over a given set of channels.
    ///
    /// Returns once the coprocessor accepted the scan. The result arrives
    /// later as [`crate::upper::Notification::ScanConfirm`].
    ///
    /// # Errors
    ///
    /// [`Error::Precondition`] if no channel or a channel outside of the
    /// 2.4 GHz band is selected, or if the duration exceeds 14.
    pub async fn scan(
        &self,
        scan_type: ScanType,
        channels: ScanChannels,
        duration: u8,
    ) -> Result<(), Error> {
        if !channels.is_valid() || duration > MAX_SCAN_DURATION {
            return Err(Error::Precondition);
        }

        let mut transaction = self.lock().await?;
        let request = Request::Scan(ScanRequest {
            scan_type,
            channels: channels.mask(),
            duration,
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
    fn channel_masks() {
        assert_eq!(ScanChannels::All.mask(), 0x07ff_f800);
        assert_eq!(ScanChannels::Single(11).mask(), 0x0000_0800);
        assert!(ScanChannels::Single(26).is_valid());
        assert!(!ScanChannels::Single(10).is_valid());
        assert!(!ScanChannels::Single(40).is_valid());
        assert!(!ScanChannels::Mask(0).is_valid());
        assert!(!ScanChannels::Mask(0x0800_0000).is_valid());
    }

    #[test]
    fn channel_iteration() {
        assert_eq!(ScanChannels::All.into_iter().count(), 16);
        assert_eq!(ScanChannels::Single(15).into_iter().collect::<std::vec::Vec<_>>(), [15]);
        assert_eq!(ScanChannels::Single(5).into_iter().count(), 0);
    }

    #[test]
    fn energy_detect_results() {
        let mut confirm = ScanConfirm::new(MacStatus::Success, ScanType::EnergyDetect, 0);
        assert!(confirm.push_energy(0x10));
        assert!(confirm.push_energy(0x80));

        let mut buffer = [0u8; ScanConfirm::LEN];
        confirm.emit(&mut buffer);
        assert_eq!(buffer[..10], [0, 0, 2, 0, 0, 0, 0, 0, 0x10, 0x80]);

        let parsed = ScanConfirm::parse(&buffer).unwrap();
        assert_eq!(parsed.energy_detect(), Some(&[0x10, 0x80][..]));

        let active = ScanConfirm::new(MacStatus::NoBeacon, ScanType::Active, 0x800);
        assert_eq!(active.energy_detect(), None);
    }

    #[test]
    fn energy_list_is_bounded() {
        let mut confirm = ScanConfirm::new(MacStatus::Success, ScanType::EnergyDetect, 0);
        for _ in 0..MAX_ENERGY_RESULTS {
            assert!(confirm.push_energy(1));
        }
        assert!(!confirm.push_energy(1));

        let mut buffer = [0u8; ScanConfirm::LEN];
        confirm.emit(&mut buffer);
        buffer[2] = 0xff;
        let parsed = ScanConfirm::parse(&buffer).unwrap();
        assert_eq!(parsed.energy_detect().unwrap().len(), MAX_ENERGY_RESULTS);
    }

    #[test]
    fn unknown_scan_type() {
        let buffer = [0, 0, 0, 0, 9, 0];
        assert_eq!(ScanRequest::parse(&buffer), Err(Error::Malformed));
    }
}
