//! Addressing fields readers and writers.

use super::FrameControl;
use super::{Error, Result};

/// PAN identifier meaning "any PAN" / not associated.
pub const BROADCAST_PAN_ID: u16 = 0xffff;
/// Short address meaning "every device".
pub const BROADCAST_SHORT_ADDRESS: u16 = 0xffff;
/// Short address meaning "no short address assigned, use the extended one".
pub const UNDEFINED_SHORT_ADDRESS: u16 = 0xfffe;

/// An IEEE 802.15.4 address together with the PAN it lives in.
///
/// The mode is the variant, so an address without a mode can not carry a
/// PAN identifier or an address payload.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Address {
    /// No address present.
    None,
    /// A 16-bit short address.
    Short {
        /// PAN identifier.
        pan_id: u16,
        /// Short address.
        address: u16,
    },
    /// A 64-bit extended address.
    Extended {
        /// PAN identifier.
        pan_id: u16,
        /// Extended address.
        address: u64,
    },
}

impl Address {
    /// Return the addressing mode of this address.
    pub fn mode(&self) -> AddressingMode {
        match self {
            Address::None => AddressingMode::Absent,
            Address::Short { .. } => AddressingMode::Short,
            Address::Extended { .. } => AddressingMode::Extended,
        }
    }

    /// Return the PAN identifier, if an address is present.
    pub fn pan_id(&self) -> Option<u16> {
        match self {
            Address::None => None,
            Address::Short { pan_id, .. } | Address::Extended { pan_id, .. } => Some(*pan_id),
        }
    }

    /// Query whether this is the short broadcast address.
    pub fn is_broadcast(&self) -> bool {
        matches!(
            self,
            Address::Short {
                address: BROADCAST_SHORT_ADDRESS,
                ..
            }
        )
    }

    /// Return the length of the address in octets, without PAN identifier.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.mode().size()
    }

    /// Returns `true` if no address is present.
    pub fn is_none(&self) -> bool {
        matches!(self, Address::None)
    }
}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Address::None => write!(f, "absent"),
            Address::Short { pan_id, address } => write!(f, "{pan_id:04x}/{address:04x}"),
            Address::Extended { pan_id, address } => {
                let b = address.to_be_bytes();
                write!(
                    f,
                    "{:04x}/{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
                    pan_id, b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]
                )
            }
        }
    }
}

/// IEEE 802.15.4 addressing mode.
///
/// The numeric values are shared by the frame control field and the
/// coprocessor's native address structure.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressingMode {
    /// No address.
    Absent = 0b00,
    /// 16-bit short address.
    Short = 0b10,
    /// 64-bit extended address.
    Extended = 0b11,
    /// Reserved value.
    Unknown,
}

impl AddressingMode {
    /// Return the size of the address in octets.
    pub fn size(&self) -> usize {
        match self {
            Self::Absent => 0,
            Self::Short => 2,
            Self::Extended => 8,
            Self::Unknown => 0,
        }
    }
}

impl From<u8> for AddressingMode {
    fn from(value: u8) -> Self {
        match value {
            0b00 => Self::Absent,
            0b10 => Self::Short,
            0b11 => Self::Extended,
            _ => Self::Unknown,
        }
    }
}

/// Byte layout of the addressing fields of a data MPDU.
///
/// Every present address is preceded by its PAN identifier, except a short
/// source address in an intra-PAN frame: there the source PAN identifier
/// equals the destination one and is left out.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct AddressingLayout {
    /// Length of the destination PAN identifier and address.
    pub dst_len: usize,
    /// Length of the source PAN identifier (if any) and address.
    pub src_len: usize,
    /// Whether the source PAN identifier is omitted.
    pub intra_pan: bool,
}

impl AddressingLayout {
    /// Compute the layout used when writing `dst` and `src` into an MPDU.
    pub fn new(dst: &Address, src: &Address) -> Self {
        let intra_pan = match (dst, src) {
            (Address::None, _) => false,
            (_, Address::Short { pan_id, .. }) => dst.pan_id() == Some(*pan_id),
            _ => false,
        };

        let dst_len = match dst {
            Address::None => 0,
            _ => 2 + dst.len(),
        };
        let src_len = match src {
            Address::None => 0,
            _ if intra_pan => src.len(),
            _ => 2 + src.len(),
        };

        Self {
            dst_len,
            src_len,
            intra_pan,
        }
    }

    /// Total length of the addressing fields in octets.
    pub fn len(&self) -> usize {
        self.dst_len + self.src_len
    }

    /// Returns `true` when neither address is present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A reader for the addressing fields following the frame control field and
/// the sequence number of an MPDU.
pub struct AddressingFields<T: AsRef<[u8]>> {
    buffer: T,
    dst_mode: AddressingMode,
    src_mode: AddressingMode,
    intra_pan: bool,
}

impl<T: AsRef<[u8]>> AddressingFields<T> {
    /// Create a new [`AddressingFields`] reader for the given frame control.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AddressMode`] for a reserved addressing mode and
    /// [`Error::Truncated`] when the buffer is too short for the addresses
    /// announced in the frame control field.
    pub fn new<F: AsRef<[u8]>>(buffer: T, fc: &FrameControl<F>) -> Result<Self> {
        let dst_mode = fc.dst_addressing_mode();
        let src_mode = fc.src_addressing_mode();
        if dst_mode == AddressingMode::Unknown || src_mode == AddressingMode::Unknown {
            return Err(Error::AddressMode);
        }

        let af = Self {
            buffer,
            dst_mode,
            src_mode,
            intra_pan: fc.intra_pan() && dst_mode != AddressingMode::Absent,
        };

        if af.buffer.as_ref().len() < af.len() {
            return Err(Error::Truncated);
        }

        Ok(af)
    }

    /// Return the length of the addressing fields in octets.
    pub fn len(&self) -> usize {
        self.dst_len() + self.src_len()
    }

    /// Returns `true` when neither address is present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn dst_len(&self) -> usize {
        match self.dst_mode {
            AddressingMode::Absent => 0,
            mode => 2 + mode.size(),
        }
    }

    fn src_len(&self) -> usize {
        match self.src_mode {
            AddressingMode::Absent => 0,
            mode if self.intra_pan => mode.size(),
            mode => 2 + mode.size(),
        }
    }

    /// Return the destination PAN identifier, if present.
    pub fn dst_pan_id(&self) -> Option<u16> {
        match self.dst_mode {
            AddressingMode::Absent => None,
            _ => {
                let b = self.buffer.as_ref();
                Some(u16::from_le_bytes([b[0], b[1]]))
            }
        }
    }

    /// Return the destination address.
    pub fn dst_address(&self) -> Address {
        let b = self.buffer.as_ref();
        read_address(self.dst_mode, self.dst_pan_id(), &b[2.min(b.len())..])
    }

    /// Return the source PAN identifier, if present. In an intra-PAN frame
    /// the destination PAN identifier is returned.
    pub fn src_pan_id(&self) -> Option<u16> {
        match self.src_mode {
            AddressingMode::Absent => None,
            _ if self.intra_pan => self.dst_pan_id(),
            _ => {
                let b = &self.buffer.as_ref()[self.dst_len()..];
                Some(u16::from_le_bytes([b[0], b[1]]))
            }
        }
    }

    /// Return the source address.
    pub fn src_address(&self) -> Address {
        let offset = self.dst_len() + if self.intra_pan { 0 } else { 2 };
        let b = self.buffer.as_ref();
        read_address(self.src_mode, self.src_pan_id(), &b[offset.min(b.len())..])
    }
}

fn read_address(mode: AddressingMode, pan_id: Option<u16>, b: &[u8]) -> Address {
    match (mode, pan_id) {
        (AddressingMode::Short, Some(pan_id)) => Address::Short {
            pan_id,
            address: u16::from_le_bytes([b[0], b[1]]),
        },
        (AddressingMode::Extended, Some(pan_id)) => {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&b[..8]);
            Address::Extended {
                pan_id,
                address: u64::from_le_bytes(raw),
            }
        }
        _ => Address::None,
    }
}

/// Write the addressing fields for `dst` and `src` into `buffer` using the
/// given layout. Returns the number of octets written.
///
/// The buffer must be at least [`AddressingLayout::len`] octets long.
pub fn emit_addressing(
    dst: &Address,
    src: &Address,
    layout: &AddressingLayout,
    buffer: &mut [u8],
) -> usize {
    let mut offset = write_address(dst, true, buffer);
    offset += write_address(src, !layout.intra_pan, &mut buffer[offset..]);
    offset
}

fn write_address(address: &Address, with_pan_id: bool, buffer: &mut [u8]) -> usize {
    let mut offset = 0;
    if let Some(pan_id) = address.pan_id() {
        if with_pan_id {
            buffer[..2].copy_from_slice(&pan_id.to_le_bytes());
            offset += 2;
        }
    }
    match address {
        Address::None => {}
        Address::Short { address, .. } => {
            buffer[offset..][..2].copy_from_slice(&address.to_le_bytes());
            offset += 2;
        }
        Address::Extended { address, .. } => {
            buffer[offset..][..8].copy_from_slice(&address.to_le_bytes());
            offset += 8;
        }
    }
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT_A: Address = Address::Short {
        pan_id: 0x1234,
        address: 0x0001,
    };
    const SHORT_B: Address = Address::Short {
        pan_id: 0x1234,
        address: 0x0002,
    };
    const SHORT_OTHER_PAN: Address = Address::Short {
        pan_id: 0xabcd,
        address: 0x0002,
    };
    const EXT: Address = Address::Extended {
        pan_id: 0x1234,
        address: 0x0011_2233_4455_6677,
    };

    #[test]
    fn intra_pan_short_source_is_compressed() {
        let layout = AddressingLayout::new(&SHORT_A, &SHORT_B);
        assert!(layout.intra_pan);
        assert_eq!(layout.dst_len, 4);
        assert_eq!(layout.src_len, 2);
    }

    #[test]
    fn inter_pan_short_source_keeps_pan_id() {
        let layout = AddressingLayout::new(&SHORT_A, &SHORT_OTHER_PAN);
        assert!(!layout.intra_pan);
        assert_eq!(layout.src_len, 4);
    }

    #[test]
    fn extended_source_keeps_pan_id() {
        let layout = AddressingLayout::new(&SHORT_A, &EXT);
        assert!(!layout.intra_pan);
        assert_eq!(layout.dst_len, 4);
        assert_eq!(layout.src_len, 10);
    }

    #[test]
    fn absent_destination_never_compresses() {
        let layout = AddressingLayout::new(&Address::None, &SHORT_A);
        assert!(!layout.intra_pan);
        assert_eq!(layout.len(), 4);
    }

    #[test]
    fn emit_is_little_endian() {
        let layout = AddressingLayout::new(&SHORT_A, &SHORT_B);
        let mut buffer = [0u8; 6];
        assert_eq!(emit_addressing(&SHORT_A, &SHORT_B, &layout, &mut buffer), 6);
        assert_eq!(buffer, [0x34, 0x12, 0x01, 0x00, 0x02, 0x00]);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", SHORT_A), "1234/0001");
        assert_eq!(format!("{}", EXT), "1234/00:11:22:33:44:55:66:77");
        assert_eq!(format!("{}", Address::None), "absent");
    }
}
