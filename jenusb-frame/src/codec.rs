//! Translation between native frames and IEEE 802.15.4 MPDUs.
//!
//! The coprocessor hands over received frames without frame control field
//! and sequence number, and expects outgoing frames the same way. Both are
//! synthesized or stripped here.
//!
//! # Known asymmetry
//!
//! The native receive frame does not carry the sequence number, the frame
//! pending bit or the acknowledgment request bit. A reconstructed MPDU always
//! has sequence number `0` and both bits cleared. Do not use the sequence
//! number of a reconstructed frame for duplicate detection. In the other
//! direction the sequence number is dropped because the coprocessor numbers
//! frames itself.

use heapless::Vec;

use super::{
    emit_addressing, AddressingFields, AddressingLayout, AddressingMode, Error, FrameControl,
    FrameType, FrameVersion, Result, RxFrame, Sdu, TxFrame, TxOptions,
};

/// Largest MPDU the radio can carry (aMaxPHYPacketSize).
pub const MAX_MPDU_LEN: usize = 127;

/// Length of frame control field plus sequence number.
pub const MPDU_HEADER_LEN: usize = 3;

/// An MPDU, without frame check sequence.
pub type Mpdu = Vec<u8, MAX_MPDU_LEN>;

/// Rebuild the data MPDU for a frame received by the coprocessor.
///
/// # Errors
///
/// - [`Error::AddressMode`] if either address has an unrecognised mode.
/// - [`Error::Allocation`] if the reconstructed frame does not fit in
///   [`MAX_MPDU_LEN`] octets.
pub fn decode_native_to_mpdu(frame: &RxFrame) -> Result<Mpdu> {
    let dst = frame.dst.address()?;
    let src = frame.src.address()?;
    let layout = AddressingLayout::new(&dst, &src);

    let len = MPDU_HEADER_LEN + layout.len() + frame.sdu.len();
    let mut mpdu = Mpdu::new();
    mpdu.resize(len, 0).map_err(|_| Error::Allocation)?;

    let mut fc = FrameControl::new_unchecked(&mut mpdu[..2]);
    fc.set_frame_type(FrameType::Data);
    fc.set_security_enabled(frame.security_use);
    fc.set_frame_pending(false);
    fc.set_ack_request(false);
    fc.set_intra_pan(layout.intra_pan);
    fc.set_dst_addressing_mode(dst.mode());
    fc.set_frame_version(FrameVersion::Ieee802154_2003);
    fc.set_src_addressing_mode(src.mode());

    // Sequencing happens inside the coprocessor.
    mpdu[2] = 0;

    let offset =
        MPDU_HEADER_LEN + emit_addressing(&dst, &src, &layout, &mut mpdu[MPDU_HEADER_LEN..]);
    mpdu[offset..].copy_from_slice(&frame.sdu);

    Ok(mpdu)
}

/// Turn an MPDU handed down for transmission into a native transmit frame.
///
/// The source address is taken from the MPDU as is; the acknowledgment
/// request and security bits become transmit options.
///
/// # Errors
///
/// - [`Error::Truncated`] if the MPDU is shorter than its header announces.
/// - [`Error::UnsupportedFrameType`] for anything but a data frame.
/// - [`Error::MissingAddress`] if neither a destination nor a source address
///   is present.
/// - [`Error::AddressMode`] for a reserved addressing mode.
/// - [`Error::PayloadTooLong`] if the payload exceeds what the coprocessor
///   accepts.
pub fn encode_mpdu_to_native(mpdu: &[u8]) -> Result<TxFrame> {
    if mpdu.len() < MPDU_HEADER_LEN {
        return Err(Error::Truncated);
    }

    let fc = FrameControl::new(&mpdu[..2])?;
    if fc.frame_type() != FrameType::Data {
        return Err(Error::UnsupportedFrameType);
    }
    if fc.dst_addressing_mode() == AddressingMode::Absent
        && fc.src_addressing_mode() == AddressingMode::Absent
    {
        return Err(Error::MissingAddress);
    }

    let addressing = AddressingFields::new(&mpdu[MPDU_HEADER_LEN..], &fc)?;
    let payload = &mpdu[MPDU_HEADER_LEN + addressing.len()..];
    let sdu = Sdu::from_slice(payload).map_err(|_| Error::PayloadTooLong)?;

    let mut options = TxOptions::empty();
    options.set(TxOptions::ACK, fc.ack_request());
    options.set(TxOptions::SECURITY, fc.security_enabled());

    Ok(TxFrame {
        src: addressing.src_address(),
        dst: addressing.dst_address(),
        options,
        sdu,
    })
}
