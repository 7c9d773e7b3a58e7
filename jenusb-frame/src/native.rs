//! The coprocessor's native frame structures.
//!
//! The coprocessor exchanges MAC service data units together with explicit
//! source and destination addresses instead of complete MPDUs. All
//! multi-byte fields are big-endian.

use bitflags::bitflags;
use heapless::Vec;

use super::{Address, AddressingMode, Error, Result, UNDEFINED_SHORT_ADDRESS};

/// Maximum number of payload octets the coprocessor accepts or delivers.
pub const MAX_SDU_LEN: usize = 118;

/// A MAC service data unit as carried in the native frames.
pub type Sdu = Vec<u8, MAX_SDU_LEN>;

/// An address as laid out on the native wire.
///
/// The mode is kept as the raw byte, so that frames with a mode the
/// coprocessor should never send can still be read and rejected later.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NativeAddress {
    /// Raw addressing mode.
    pub mode: u8,
    /// PAN identifier.
    pub pan_id: u16,
    /// Short address in the first two octets or the extended address.
    pub slot: [u8; 8],
}

impl NativeAddress {
    /// Size of a native address on the wire.
    pub const SIZE: usize = 11;

    /// Read a native address from the start of `buffer`.
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        if buffer.len() < Self::SIZE {
            return Err(Error::Truncated);
        }

        let mut slot = [0u8; 8];
        slot.copy_from_slice(&buffer[3..11]);
        Ok(Self {
            mode: buffer[0],
            pan_id: u16::from_be_bytes([buffer[1], buffer[2]]),
            slot,
        })
    }

    /// Write this address into the first [`NativeAddress::SIZE`] octets of
    /// `buffer`.
    pub fn emit(&self, buffer: &mut [u8]) {
        buffer[0] = self.mode;
        buffer[1..3].copy_from_slice(&self.pan_id.to_be_bytes());
        buffer[3..11].copy_from_slice(&self.slot);
    }

    /// Interpret the raw mode and payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AddressMode`] if the mode is not one of none, short
    /// or extended.
    pub fn address(&self) -> Result<Address> {
        match AddressingMode::from(self.mode) {
            AddressingMode::Absent => Ok(Address::None),
            AddressingMode::Short => Ok(Address::Short {
                pan_id: self.pan_id,
                address: u16::from_be_bytes([self.slot[0], self.slot[1]]),
            }),
            AddressingMode::Extended => Ok(Address::Extended {
                pan_id: self.pan_id,
                address: u64::from_be_bytes(self.slot),
            }),
            AddressingMode::Unknown => Err(Error::AddressMode),
        }
    }
}

impl From<Address> for NativeAddress {
    fn from(address: Address) -> Self {
        let mut slot = [0u8; 8];
        match address {
            Address::None => {
                slot[..2].copy_from_slice(&UNDEFINED_SHORT_ADDRESS.to_be_bytes());
                Self {
                    mode: AddressingMode::Absent as u8,
                    pan_id: super::BROADCAST_PAN_ID,
                    slot,
                }
            }
            Address::Short { pan_id, address } => {
                slot[..2].copy_from_slice(&address.to_be_bytes());
                Self {
                    mode: AddressingMode::Short as u8,
                    pan_id,
                    slot,
                }
            }
            Address::Extended { pan_id, address } => Self {
                mode: AddressingMode::Extended as u8,
                pan_id,
                slot: address.to_be_bytes(),
            },
        }
    }
}

bitflags! {
    /// Transmit options of a native data request.
    #[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
    pub struct TxOptions: u8 {
        /// Request an acknowledgment from the recipient.
        const ACK = 0x01;
        /// Transmit in a guaranteed time slot.
        const GTS = 0x02;
        /// Transmit indirectly (coordinator keeps the frame pending).
        const INDIRECT = 0x04;
        /// Apply MAC security.
        const SECURITY = 0x08;
    }
}

/// A frame received by the coprocessor.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RxFrame {
    /// Source address, raw.
    pub src: NativeAddress,
    /// Destination address, raw.
    pub dst: NativeAddress,
    /// Link quality of the reception.
    pub link_quality: u8,
    /// Whether MAC security was applied to the frame.
    pub security_use: bool,
    /// ACL entry the security material was taken from.
    pub acl_entry: u8,
    /// Payload.
    pub sdu: Sdu,
}

impl RxFrame {
    /// Size of a native receive frame on the wire.
    pub const SIZE: usize = 2 * NativeAddress::SIZE + 4 + MAX_SDU_LEN;

    /// Read a receive frame from `buffer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Truncated`] if the buffer is shorter than the SDU
    /// length field announces, and [`Error::PayloadTooLong`] if the SDU
    /// length exceeds [`MAX_SDU_LEN`].
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        let header = 2 * NativeAddress::SIZE + 4;
        if buffer.len() < header {
            return Err(Error::Truncated);
        }

        let src = NativeAddress::parse(buffer)?;
        let dst = NativeAddress::parse(&buffer[NativeAddress::SIZE..])?;
        let b = &buffer[2 * NativeAddress::SIZE..];
        let sdu_len = b[3] as usize;
        if sdu_len > MAX_SDU_LEN {
            return Err(Error::PayloadTooLong);
        }
        let sdu = buffer[header..]
            .get(..sdu_len)
            .ok_or(Error::Truncated)
            .and_then(|sdu| Sdu::from_slice(sdu).map_err(|_| Error::Allocation))?;

        Ok(Self {
            src,
            dst,
            link_quality: b[0],
            security_use: b[1] != 0,
            acl_entry: b[2],
            sdu,
        })
    }

    /// Write this frame into the first [`RxFrame::SIZE`] octets of `buffer`.
    pub fn emit(&self, buffer: &mut [u8]) {
        self.src.emit(buffer);
        self.dst.emit(&mut buffer[NativeAddress::SIZE..]);
        let b = &mut buffer[2 * NativeAddress::SIZE..];
        b[0] = self.link_quality;
        b[1] = self.security_use as u8;
        b[2] = self.acl_entry;
        b[3] = self.sdu.len() as u8;
        b[4..][..self.sdu.len()].copy_from_slice(&self.sdu);
        b[4 + self.sdu.len()..][..MAX_SDU_LEN - self.sdu.len()].fill(0);
    }
}

/// A frame handed to the coprocessor for transmission.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TxFrame {
    /// Source address.
    pub src: Address,
    /// Destination address.
    pub dst: Address,
    /// Transmit options.
    pub options: TxOptions,
    /// Payload.
    pub sdu: Sdu,
}

impl TxFrame {
    /// Size of a native transmit frame on the wire.
    pub const SIZE: usize = 2 * NativeAddress::SIZE + 2 + MAX_SDU_LEN;

    /// Write this frame into the first [`TxFrame::SIZE`] octets of `buffer`.
    pub fn emit(&self, buffer: &mut [u8]) {
        NativeAddress::from(self.src).emit(buffer);
        NativeAddress::from(self.dst).emit(&mut buffer[NativeAddress::SIZE..]);
        let b = &mut buffer[2 * NativeAddress::SIZE..];
        b[0] = self.options.bits();
        b[1] = self.sdu.len() as u8;
        b[2..][..self.sdu.len()].copy_from_slice(&self.sdu);
        b[2 + self.sdu.len()..][..MAX_SDU_LEN - self.sdu.len()].fill(0);
    }

    /// Read a transmit frame from `buffer`.
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        let header = 2 * NativeAddress::SIZE + 2;
        if buffer.len() < header {
            return Err(Error::Truncated);
        }

        let src = NativeAddress::parse(buffer)?.address()?;
        let dst = NativeAddress::parse(&buffer[NativeAddress::SIZE..])?.address()?;
        let b = &buffer[2 * NativeAddress::SIZE..];
        let sdu_len = b[1] as usize;
        if sdu_len > MAX_SDU_LEN {
            return Err(Error::PayloadTooLong);
        }
        let sdu = buffer[header..]
            .get(..sdu_len)
            .ok_or(Error::Truncated)
            .and_then(|sdu| Sdu::from_slice(sdu).map_err(|_| Error::Allocation))?;

        Ok(Self {
            src,
            dst,
            options: TxOptions::from_bits_truncate(b[0]),
            sdu,
        })
    }
}
