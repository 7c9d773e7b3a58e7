//! Requests, confirmations and indications exchanged with the coprocessor.
//!
//! Every message starts with a four octet header naming the service access
//! point (MLME or MCPS) and the sub-opcode, followed by a parameter area of
//! fixed size. Messages are always transferred at their full size; the
//! unused tail of the parameter area is zero. Multi-byte fields are
//! big-endian.

use super::constants::{mcps_ind, mcps_req, mlme_ind, mlme_req, sap};
use super::mcps::data::{DataConfirm, DataIndication, DataRequest};
use super::mlme::associate::{AssociateConfirm, AssociateIndication, AssociateRequest};
use super::mlme::beacon::BeaconNotifyIndication;
use super::mlme::disassociate::{DisassociateConfirm, DisassociateIndication, DisassociateRequest};
use super::mlme::get::GetRequest;
use super::mlme::reset::ResetRequest;
use super::mlme::scan::{ScanConfirm, ScanRequest};
use super::mlme::set::SetRequest;
use super::mlme::start::StartRequest;
use super::Error;

/// A fixed-layout parameter block of a request, confirmation or indication.
pub trait Parameters: Sized {
    /// Length of the parameter block in octets.
    const LEN: usize;

    /// Write the parameters into the first [`Parameters::LEN`] octets of
    /// `buffer`.
    fn emit(&self, buffer: &mut [u8]);

    /// Read the parameters from `buffer`, which is at least
    /// [`Parameters::LEN`] octets long.
    fn parse(buffer: &[u8]) -> Result<Self, Error>;
}

/// Parameter area announced by a header, bounded by what was received.
fn parameters(buffer: &[u8], header_len: usize, param_len: u8) -> &[u8] {
    let available = &buffer[header_len.min(buffer.len())..];
    &available[..(param_len as usize).min(available.len())]
}

fn parse_params<P: Parameters>(params: &[u8]) -> Result<P, Error> {
    if params.len() < P::LEN {
        return Err(Error::Malformed);
    }
    P::parse(&params[..P::LEN])
}

fn emit_params<P: Parameters>(params: &P, buffer: &mut [u8]) -> u8 {
    params.emit(&mut buffer[..P::LEN]);
    P::LEN as u8
}

/// Status of an IEEE 802.15.4 MAC primitive, as reported by the coprocessor.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MacStatus {
    Success,
    PanAtCapacity,
    PanAccessDenied,
    BeaconLoss,
    ChannelAccessFailure,
    Denied,
    DisableTrxFailure,
    FailedSecurityCheck,
    FrameTooLong,
    InvalidGts,
    InvalidHandle,
    InvalidParameter,
    NoAck,
    NoBeacon,
    NoData,
    NoShortAddress,
    OutOfCap,
    PanIdConflict,
    Realignment,
    TransactionExpired,
    TransactionOverflow,
    TxActive,
    UnavailableKey,
    UnsupportedAttribute,
    Unknown(u8),
}

impl From<u8> for MacStatus {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::Success,
            0x01 => Self::PanAtCapacity,
            0x02 => Self::PanAccessDenied,
            0xe0 => Self::BeaconLoss,
            0xe1 => Self::ChannelAccessFailure,
            0xe2 => Self::Denied,
            0xe3 => Self::DisableTrxFailure,
            0xe4 => Self::FailedSecurityCheck,
            0xe5 => Self::FrameTooLong,
            0xe6 => Self::InvalidGts,
            0xe7 => Self::InvalidHandle,
            0xe8 => Self::InvalidParameter,
            0xe9 => Self::NoAck,
            0xea => Self::NoBeacon,
            0xeb => Self::NoData,
            0xec => Self::NoShortAddress,
            0xed => Self::OutOfCap,
            0xee => Self::PanIdConflict,
            0xef => Self::Realignment,
            0xf0 => Self::TransactionExpired,
            0xf1 => Self::TransactionOverflow,
            0xf2 => Self::TxActive,
            0xf3 => Self::UnavailableKey,
            0xf4 => Self::UnsupportedAttribute,
            other => Self::Unknown(other),
        }
    }
}

impl From<MacStatus> for u8 {
    fn from(value: MacStatus) -> Self {
        match value {
            MacStatus::Success => 0x00,
            MacStatus::PanAtCapacity => 0x01,
            MacStatus::PanAccessDenied => 0x02,
            MacStatus::BeaconLoss => 0xe0,
            MacStatus::ChannelAccessFailure => 0xe1,
            MacStatus::Denied => 0xe2,
            MacStatus::DisableTrxFailure => 0xe3,
            MacStatus::FailedSecurityCheck => 0xe4,
            MacStatus::FrameTooLong => 0xe5,
            MacStatus::InvalidGts => 0xe6,
            MacStatus::InvalidHandle => 0xe7,
            MacStatus::InvalidParameter => 0xe8,
            MacStatus::NoAck => 0xe9,
            MacStatus::NoBeacon => 0xea,
            MacStatus::NoData => 0xeb,
            MacStatus::NoShortAddress => 0xec,
            MacStatus::OutOfCap => 0xed,
            MacStatus::PanIdConflict => 0xee,
            MacStatus::Realignment => 0xef,
            MacStatus::TransactionExpired => 0xf0,
            MacStatus::TransactionOverflow => 0xf1,
            MacStatus::TxActive => 0xf2,
            MacStatus::UnavailableKey => 0xf3,
            MacStatus::UnsupportedAttribute => 0xf4,
            MacStatus::Unknown(other) => other,
        }
    }
}

/// A request to the coprocessor. Exactly one may be in flight at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Reset(ResetRequest),
    Get(GetRequest),
    Set(SetRequest),
    Scan(ScanRequest),
    Associate(AssociateRequest),
    Disassociate(DisassociateRequest),
    Start(StartRequest),
    Data(DataRequest),
}

impl Request {
    /// Length of the request header.
    pub const HEADER_LEN: usize = 4;
    /// Size of a request on the wire. The data request is the largest one.
    pub const SIZE: usize = Self::HEADER_LEN + DataRequest::LEN;

    /// Service access point the request is addressed to.
    pub fn sap(&self) -> u8 {
        match self {
            Request::Data(_) => sap::MCPS,
            _ => sap::MLME,
        }
    }

    /// Sub-opcode of the request.
    pub fn kind(&self) -> u8 {
        match self {
            Request::Reset(_) => mlme_req::RESET,
            Request::Get(_) => mlme_req::GET,
            Request::Set(_) => mlme_req::SET,
            Request::Scan(_) => mlme_req::SCAN,
            Request::Associate(_) => mlme_req::ASSOCIATE,
            Request::Disassociate(_) => mlme_req::DISASSOCIATE,
            Request::Start(_) => mlme_req::START,
            Request::Data(_) => mcps_req::DATA,
        }
    }

    /// Write the request into the first [`Request::SIZE`] octets of
    /// `buffer`. Returns the number of octets to transfer.
    pub fn emit(&self, buffer: &mut [u8]) -> usize {
        let buffer = &mut buffer[..Self::SIZE];
        buffer.fill(0);

        let (header, params) = buffer.split_at_mut(Self::HEADER_LEN);
        let param_len = match self {
            Request::Reset(p) => emit_params(p, params),
            Request::Get(p) => emit_params(p, params),
            Request::Set(p) => emit_params(p, params),
            Request::Scan(p) => emit_params(p, params),
            Request::Associate(p) => emit_params(p, params),
            Request::Disassociate(p) => emit_params(p, params),
            Request::Start(p) => emit_params(p, params),
            Request::Data(p) => emit_params(p, params),
        };
        header[0] = self.sap();
        header[1] = self.kind();
        header[2] = param_len;

        Self::SIZE
    }

    /// Read a request from `buffer`.
    pub fn parse(buffer: &[u8]) -> Result<Self, Error> {
        if buffer.len() < Self::HEADER_LEN {
            return Err(Error::Malformed);
        }

        let params = parameters(buffer, Self::HEADER_LEN, buffer[2]);
        Ok(match (buffer[0], buffer[1]) {
            (sap::MLME, mlme_req::RESET) => Request::Reset(parse_params(params)?),
            (sap::MLME, mlme_req::GET) => Request::Get(parse_params(params)?),
            (sap::MLME, mlme_req::SET) => Request::Set(parse_params(params)?),
            (sap::MLME, mlme_req::SCAN) => Request::Scan(parse_params(params)?),
            (sap::MLME, mlme_req::ASSOCIATE) => Request::Associate(parse_params(params)?),
            (sap::MLME, mlme_req::DISASSOCIATE) => Request::Disassociate(parse_params(params)?),
            (sap::MLME, mlme_req::START) => Request::Start(parse_params(params)?),
            (sap::MCPS, mcps_req::DATA) => Request::Data(parse_params(params)?),
            _ => return Err(Error::Malformed),
        })
    }
}

/// Top-level status of a confirmation.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ConfirmStatus {
    Success,
    Error,
    /// The result follows later as an indication.
    Deferred,
    NotApplicable,
    Unknown(u8),
}

impl From<u8> for ConfirmStatus {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Success,
            1 => Self::Error,
            2 => Self::Deferred,
            3 => Self::NotApplicable,
            other => Self::Unknown(other),
        }
    }
}

impl From<ConfirmStatus> for u8 {
    fn from(value: ConfirmStatus) -> Self {
        match value {
            ConfirmStatus::Success => 0,
            ConfirmStatus::Error => 1,
            ConfirmStatus::Deferred => 2,
            ConfirmStatus::NotApplicable => 3,
            ConfirmStatus::Unknown(other) => other,
        }
    }
}

/// Status part shared by every confirmation.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Outcome {
    pub status: ConfirmStatus,
    /// MAC status detailing an error.
    pub reason: MacStatus,
}

impl Outcome {
    pub const SUCCESS: Self = Self {
        status: ConfirmStatus::Success,
        reason: MacStatus::Success,
    };

    /// An error outcome with the given reason.
    pub const fn error(reason: MacStatus) -> Self {
        Self {
            status: ConfirmStatus::Error,
            reason,
        }
    }

    /// Returns `true` unless the coprocessor rejected the request. Deferred
    /// and not applicable are not rejections.
    pub fn is_ok(&self) -> bool {
        self.status != ConfirmStatus::Error
    }

    /// Map a rejection to [`Error::Application`].
    pub fn into_result(self) -> Result<(), Error> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(Error::Application(self.reason))
        }
    }
}

/// A confirmation, answering the request with the same service access point
/// and sub-opcode.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Confirm {
    Reset(Outcome),
    Scan(Outcome),
    Start(Outcome),
    Disassociate(Outcome),
    Set {
        outcome: Outcome,
        attribute: u8,
    },
    Get {
        outcome: Outcome,
        attribute: u8,
        value: u16,
    },
    Associate {
        outcome: Outcome,
        short_address: u16,
    },
    Data {
        outcome: Outcome,
        handle: u8,
    },
    /// A confirmation for a request this driver never issues.
    Other {
        sap: u8,
        kind: u8,
        outcome: Outcome,
    },
}

impl Confirm {
    /// Length of the confirmation header.
    pub const HEADER_LEN: usize = 4;
    /// Length of the parameter area.
    pub const PARAMS_LEN: usize = 16;
    /// Size of a confirmation on the wire.
    pub const SIZE: usize = Self::HEADER_LEN + Self::PARAMS_LEN;

    pub fn sap(&self) -> u8 {
        match self {
            Confirm::Data { .. } => sap::MCPS,
            Confirm::Other { sap, .. } => *sap,
            _ => sap::MLME,
        }
    }

    pub fn kind(&self) -> u8 {
        match self {
            Confirm::Reset(_) => mlme_req::RESET,
            Confirm::Scan(_) => mlme_req::SCAN,
            Confirm::Start(_) => mlme_req::START,
            Confirm::Disassociate(_) => mlme_req::DISASSOCIATE,
            Confirm::Set { .. } => mlme_req::SET,
            Confirm::Get { .. } => mlme_req::GET,
            Confirm::Associate { .. } => mlme_req::ASSOCIATE,
            Confirm::Data { .. } => mcps_req::DATA,
            Confirm::Other { kind, .. } => *kind,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            Confirm::Reset(outcome)
            | Confirm::Scan(outcome)
            | Confirm::Start(outcome)
            | Confirm::Disassociate(outcome)
            | Confirm::Set { outcome, .. }
            | Confirm::Get { outcome, .. }
            | Confirm::Associate { outcome, .. }
            | Confirm::Data { outcome, .. }
            | Confirm::Other { outcome, .. } => *outcome,
        }
    }

    /// Returns `true` if this confirmation answers `request`.
    pub fn answers(&self, request: &Request) -> bool {
        self.sap() == request.sap() && self.kind() == request.kind()
    }

    /// Write the confirmation into the first [`Confirm::SIZE`] octets of
    /// `buffer`.
    pub fn emit(&self, buffer: &mut [u8]) -> usize {
        let buffer = &mut buffer[..Self::SIZE];
        buffer.fill(0);

        let outcome = self.outcome();
        let (header, params) = buffer.split_at_mut(Self::HEADER_LEN);
        params[0] = outcome.reason.into();
        let param_len = match self {
            Confirm::Set { attribute, .. } => {
                params[1] = *attribute;
                2
            }
            Confirm::Get {
                attribute, value, ..
            } => {
                params[1] = *attribute;
                params[2..4].copy_from_slice(&value.to_be_bytes());
                4
            }
            Confirm::Associate { short_address, .. } => {
                params[1..3].copy_from_slice(&short_address.to_be_bytes());
                3
            }
            Confirm::Data { handle, .. } => {
                params[1] = *handle;
                2
            }
            _ => 1,
        };
        header[0] = self.sap();
        header[1] = self.kind();
        header[2] = outcome.status.into();
        header[3] = param_len;

        Self::SIZE
    }

    /// Read a confirmation from `buffer`.
    pub fn parse(buffer: &[u8]) -> Result<Self, Error> {
        if buffer.len() < Self::HEADER_LEN {
            return Err(Error::Malformed);
        }

        let params = parameters(buffer, Self::HEADER_LEN, buffer[3]);
        let Some(reason) = params.first() else {
            return Err(Error::Malformed);
        };
        let outcome = Outcome {
            status: buffer[2].into(),
            reason: (*reason).into(),
        };
        let field = |range: core::ops::Range<usize>| params.get(range).ok_or(Error::Malformed);

        Ok(match (buffer[0], buffer[1]) {
            (sap::MLME, mlme_req::RESET) => Confirm::Reset(outcome),
            (sap::MLME, mlme_req::SCAN) => Confirm::Scan(outcome),
            (sap::MLME, mlme_req::START) => Confirm::Start(outcome),
            (sap::MLME, mlme_req::DISASSOCIATE) => Confirm::Disassociate(outcome),
            (sap::MLME, mlme_req::SET) => Confirm::Set {
                outcome,
                attribute: field(1..2)?[0],
            },
            (sap::MLME, mlme_req::GET) => {
                let b = field(1..4)?;
                Confirm::Get {
                    outcome,
                    attribute: b[0],
                    value: u16::from_be_bytes([b[1], b[2]]),
                }
            }
            (sap::MLME, mlme_req::ASSOCIATE) => {
                let b = field(1..3)?;
                Confirm::Associate {
                    outcome,
                    short_address: u16::from_be_bytes([b[0], b[1]]),
                }
            }
            (sap::MCPS, mcps_req::DATA) => Confirm::Data {
                outcome,
                handle: field(1..2)?[0],
            },
            (sap, kind) => Confirm::Other { sap, kind, outcome },
        })
    }
}

/// A message from the coprocessor that is not tied to an outstanding
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indication {
    /// A data frame was received.
    Data(DataIndication),
    /// Deferred confirmation of a data request.
    DataConfirm(DataConfirm),
    /// Deferred confirmation of a purge request.
    PurgeConfirm(DataConfirm),
    ScanConfirm(ScanConfirm),
    AssociateConfirm(AssociateConfirm),
    DisassociateConfirm(DisassociateConfirm),
    AssociateIndication(AssociateIndication),
    DisassociateIndication(DisassociateIndication),
    BeaconNotify(BeaconNotifyIndication),
    /// A known MLME event this driver does not handle (GTS, poll, rx enable,
    /// sync loss, comm status, orphan).
    Unsupported { sap: u8, kind: u8 },
    /// An unknown service access point or sub-opcode.
    Unknown { sap: u8, kind: u8 },
}

impl Indication {
    /// Length of the indication header.
    pub const HEADER_LEN: usize = 4;
    /// Size of an indication on the wire. The data indication is the largest
    /// one.
    pub const SIZE: usize = Self::HEADER_LEN + DataIndication::LEN;

    pub fn sap(&self) -> u8 {
        match self {
            Indication::Data(_) | Indication::DataConfirm(_) | Indication::PurgeConfirm(_) => {
                sap::MCPS
            }
            Indication::Unsupported { sap, .. } | Indication::Unknown { sap, .. } => *sap,
            _ => sap::MLME,
        }
    }

    pub fn kind(&self) -> u8 {
        match self {
            Indication::Data(_) => mcps_ind::IND_DATA,
            Indication::DataConfirm(_) => mcps_ind::DCFM_DATA,
            Indication::PurgeConfirm(_) => mcps_ind::DCFM_PURGE,
            Indication::ScanConfirm(_) => mlme_ind::DCFM_SCAN,
            Indication::AssociateConfirm(_) => mlme_ind::DCFM_ASSOCIATE,
            Indication::DisassociateConfirm(_) => mlme_ind::DCFM_DISASSOCIATE,
            Indication::AssociateIndication(_) => mlme_ind::IND_ASSOCIATE,
            Indication::DisassociateIndication(_) => mlme_ind::IND_DISASSOCIATE,
            Indication::BeaconNotify(_) => mlme_ind::IND_BEACON_NOTIFY,
            Indication::Unsupported { kind, .. } | Indication::Unknown { kind, .. } => *kind,
        }
    }

    /// Write the indication into the first [`Indication::SIZE`] octets of
    /// `buffer`.
    pub fn emit(&self, buffer: &mut [u8]) -> usize {
        let buffer = &mut buffer[..Self::SIZE];
        buffer.fill(0);

        let (header, params) = buffer.split_at_mut(Self::HEADER_LEN);
        let param_len = match self {
            Indication::Data(p) => emit_params(p, params),
            Indication::DataConfirm(p) | Indication::PurgeConfirm(p) => emit_params(p, params),
            Indication::ScanConfirm(p) => emit_params(p, params),
            Indication::AssociateConfirm(p) => emit_params(p, params),
            Indication::DisassociateConfirm(p) => emit_params(p, params),
            Indication::AssociateIndication(p) => emit_params(p, params),
            Indication::DisassociateIndication(p) => emit_params(p, params),
            Indication::BeaconNotify(p) => emit_params(p, params),
            Indication::Unsupported { .. } | Indication::Unknown { .. } => 0,
        };
        header[0] = self.sap();
        header[1] = self.kind();
        header[2] = param_len;

        Self::SIZE
    }

    /// Read an indication from `buffer`.
    ///
    /// # Errors
    ///
    /// - [`Error::Malformed`] if the buffer is too short for its header or
    ///   parameters.
    /// - [`Error::Frame`] if the native frame of a data indication is
    ///   invalid.
    pub fn parse(buffer: &[u8]) -> Result<Self, Error> {
        if buffer.len() < Self::HEADER_LEN {
            return Err(Error::Malformed);
        }

        let params = parameters(buffer, Self::HEADER_LEN, buffer[2]);
        Ok(match (buffer[0], buffer[1]) {
            (sap::MCPS, mcps_ind::IND_DATA) => Indication::Data(parse_params(params)?),
            (sap::MCPS, mcps_ind::DCFM_DATA) => Indication::DataConfirm(parse_params(params)?),
            (sap::MCPS, mcps_ind::DCFM_PURGE) => Indication::PurgeConfirm(parse_params(params)?),
            (sap::MLME, mlme_ind::DCFM_SCAN) => Indication::ScanConfirm(parse_params(params)?),
            (sap::MLME, mlme_ind::DCFM_ASSOCIATE) => {
                Indication::AssociateConfirm(parse_params(params)?)
            }
            (sap::MLME, mlme_ind::DCFM_DISASSOCIATE) => {
                Indication::DisassociateConfirm(parse_params(params)?)
            }
            (sap::MLME, mlme_ind::IND_ASSOCIATE) => {
                Indication::AssociateIndication(parse_params(params)?)
            }
            (sap::MLME, mlme_ind::IND_DISASSOCIATE) => {
                Indication::DisassociateIndication(parse_params(params)?)
            }
            (sap::MLME, mlme_ind::IND_BEACON_NOTIFY) => {
                Indication::BeaconNotify(parse_params(params)?)
            }
            (
                sap::MLME,
                mlme_ind::DCFM_GTS
                | mlme_ind::DCFM_POLL
                | mlme_ind::DCFM_RX_ENABLE
                | mlme_ind::IND_SYNC_LOSS
                | mlme_ind::IND_GTS
                | mlme_ind::IND_COMM_STATUS
                | mlme_ind::IND_ORPHAN,
            ) => Indication::Unsupported {
                sap: buffer[0],
                kind: buffer[1],
            },
            (sap, kind) => Indication::Unknown { sap, kind },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mac::mlme::scan::ScanType;

    #[test]
    fn request_header() {
        let request = Request::Scan(ScanRequest {
            scan_type: ScanType::Active,
            channels: 0x0000_0800,
            duration: 3,
        });

        let mut buffer = [0xaa; Request::SIZE];
        assert_eq!(request.emit(&mut buffer), Request::SIZE);
        assert_eq!(buffer[..4], [sap::MLME, mlme_req::SCAN, 6, 0]);
        assert_eq!(buffer[4..10], [0x00, 0x00, 0x08, 0x00, 1, 3]);
        assert!(buffer[10..].iter().all(|b| *b == 0));

        assert_eq!(Request::parse(&buffer).unwrap(), request);
    }

    #[test]
    fn request_unknown_kind() {
        let mut buffer = [0u8; Request::SIZE];
        buffer[0] = sap::MLME;
        buffer[1] = mlme_req::GTS;
        assert_eq!(Request::parse(&buffer), Err(Error::Malformed));
    }

    #[test]
    fn confirm_status_is_only_an_error_when_error() {
        let deferred = Outcome {
            status: ConfirmStatus::Deferred,
            reason: MacStatus::Success,
        };
        assert_eq!(deferred.into_result(), Ok(()));
        assert_eq!(
            Outcome::error(MacStatus::InvalidParameter).into_result(),
            Err(Error::Application(MacStatus::InvalidParameter))
        );
    }

    #[test]
    fn confirm_layout() {
        let confirm = Confirm::Associate {
            outcome: Outcome::SUCCESS,
            short_address: 0x1234,
        };

        let mut buffer = [0u8; Confirm::SIZE];
        confirm.emit(&mut buffer);
        assert_eq!(
            buffer[..7],
            [sap::MLME, mlme_req::ASSOCIATE, 0, 3, 0x00, 0x12, 0x34]
        );
        assert_eq!(Confirm::parse(&buffer).unwrap(), confirm);
    }

    #[test]
    fn confirm_data_overflow() {
        let buffer = [sap::MCPS, mcps_req::DATA, 1, 2, 0xf1, 0x00];
        let confirm = Confirm::parse(&buffer).unwrap();
        assert_eq!(
            confirm,
            Confirm::Data {
                outcome: Outcome::error(MacStatus::TransactionOverflow),
                handle: 0
            }
        );
    }

    #[test]
    fn confirm_too_short() {
        assert_eq!(Confirm::parse(&[sap::MLME, mlme_req::SET]), Err(Error::Malformed));
        // set confirm without the attribute
        assert_eq!(
            Confirm::parse(&[sap::MLME, mlme_req::SET, 0, 1, 0]),
            Err(Error::Malformed)
        );
    }

    #[test]
    fn unknown_confirm_is_kept() {
        let confirm = Confirm::parse(&[sap::MLME, mlme_req::POLL, 0, 1, 0]).unwrap();
        assert_eq!(confirm.sap(), sap::MLME);
        assert_eq!(confirm.kind(), mlme_req::POLL);
        assert!(matches!(confirm, Confirm::Other { .. }));
    }

    #[test]
    fn mac_status_round_trip() {
        for raw in 0..=u8::MAX {
            assert_eq!(u8::from(MacStatus::from(raw)), raw);
        }
    }

    #[test]
    fn indication_classification() {
        let mut buffer = [0u8; Indication::SIZE];

        buffer[..2].copy_from_slice(&[sap::MLME, mlme_ind::IND_SYNC_LOSS]);
        assert_eq!(
            Indication::parse(&buffer).unwrap(),
            Indication::Unsupported {
                sap: sap::MLME,
                kind: mlme_ind::IND_SYNC_LOSS
            }
        );

        buffer[..2].copy_from_slice(&[sap::MLME, 0x42]);
        assert_eq!(
            Indication::parse(&buffer).unwrap(),
            Indication::Unknown {
                sap: sap::MLME,
                kind: 0x42
            }
        );

        buffer[..2].copy_from_slice(&[7, 0]);
        assert!(matches!(
            Indication::parse(&buffer).unwrap(),
            Indication::Unknown { sap: 7, kind: 0 }
        ));
    }

    #[test]
    fn indication_parameters_too_short() {
        let buffer = [sap::MLME, mlme_ind::DCFM_ASSOCIATE, 3, 0, 0x00];
        assert_eq!(Indication::parse(&buffer), Err(Error::Malformed));
    }
}
