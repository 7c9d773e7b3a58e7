//! Native frame structures of the Jennic IEEE 802.15.4 coprocessor and their
//! translation to and from standard MPDUs.
//!
//! The coprocessor does not deal in complete MAC frames. Received frames are
//! delivered as an [`RxFrame`]: source and destination address, a few
//! reception attributes and the payload. Frames to transmit are handed over
//! as a [`TxFrame`]. This crate provides:
//! - [`FrameControl`]: a reader/writer for the frame control field.
//! - [`Address`] and [`AddressingFields`]: addresses and the MPDU addressing
//!   field layout, including intra-PAN compression.
//! - [`NativeAddress`], [`RxFrame`], [`TxFrame`]: the native wire structures.
//! - [`decode_native_to_mpdu`] and [`encode_mpdu_to_native`]: the codec.
//!
//! ## Reconstructing a received frame
//! ```
//! # use jenusb_frame::*;
//! let frame = RxFrame {
//!     src: Address::Short { pan_id: 0x1234, address: 0x0002 }.into(),
//!     dst: Address::Short { pan_id: 0x1234, address: 0x0001 }.into(),
//!     link_quality: 0xff,
//!     security_use: false,
//!     acl_entry: 0,
//!     sdu: Sdu::from_slice(&[0x2b]).unwrap(),
//! };
//!
//! let mpdu = decode_native_to_mpdu(&frame).unwrap();
//! assert_eq!(
//!     &mpdu[..],
//!     &[0x41, 0x88, 0x00, 0x34, 0x12, 0x01, 0x00, 0x02, 0x00, 0x2b]
//! );
//! ```
//!
//! The reconstruction is lossy, see the [`codec`] module documentation.
#![no_std]
#![deny(missing_docs)]
#![deny(unsafe_code)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(test)]
mod tests;

mod frame_control;
pub use frame_control::*;

mod addressing;
pub use addressing::*;

mod native;
pub use native::*;

pub mod codec;
pub use codec::{decode_native_to_mpdu, encode_mpdu_to_native, Mpdu, MAX_MPDU_LEN};

/// An error that can occur when reading, writing or translating a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// An address carries a mode that is neither none, short nor extended.
    AddressMode,
    /// The output does not fit in its fixed-capacity buffer.
    Allocation,
    /// Only data frames can be translated.
    UnsupportedFrameType,
    /// Neither a destination nor a source address is present.
    MissingAddress,
    /// The buffer is shorter than the structure it should contain.
    Truncated,
    /// The payload exceeds what the coprocessor can carry.
    PayloadTooLong,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::AddressMode => write!(f, "unrecognised addressing mode"),
            Error::Allocation => write!(f, "frame does not fit the output buffer"),
            Error::UnsupportedFrameType => write!(f, "unsupported frame type"),
            Error::MissingAddress => write!(f, "frame carries no address"),
            Error::Truncated => write!(f, "truncated frame"),
            Error::PayloadTooLong => write!(f, "payload too long"),
        }
    }
}

/// A type alias for `Result<T, jenusb_frame::Error>`.
pub type Result<T> = core::result::Result<T, Error>;
