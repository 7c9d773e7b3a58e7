#![allow(dead_code)]
pub use customizable::*;

pub use jenusb_frame::{BROADCAST_PAN_ID, BROADCAST_SHORT_ADDRESS, UNDEFINED_SHORT_ADDRESS};

/// Short address a PAN coordinator always uses.
pub const COORDINATOR_SHORT_ADDRESS: u16 = 0x0000;

/// Channel page 0 in the 2.4 GHz band: channels 11 to 26.
pub const ALL_CHANNELS: u32 = 0x07ff_f800;

/// Number of channels the energy detection results of a scan cover.
pub const MAX_ENERGY_RESULTS: usize = 16;

/// Service access point byte of requests, confirmations and indications.
pub mod sap {
    pub const MCPS: u8 = 0;
    pub const MLME: u8 = 1;
}

/// Sub-opcodes of MLME requests, echoed in their confirmations.
pub mod mlme_req {
    pub const ASSOCIATE: u8 = 0;
    pub const DISASSOCIATE: u8 = 1;
    pub const GET: u8 = 2;
    pub const GTS: u8 = 3;
    pub const RESET: u8 = 4;
    pub const RX_ENABLE: u8 = 5;
    pub const SCAN: u8 = 6;
    pub const SET: u8 = 7;
    pub const START: u8 = 8;
    pub const SYNC: u8 = 9;
    pub const POLL: u8 = 10;
    pub const RSP_ASSOCIATE: u8 = 11;
    pub const RSP_ORPHAN: u8 = 12;
    pub const VS_EXTADDR: u8 = 13;
}

/// Sub-opcodes of deferred MLME confirmations and MLME indications.
pub mod mlme_ind {
    pub const DCFM_SCAN: u8 = 0;
    pub const DCFM_GTS: u8 = 1;
    pub const DCFM_ASSOCIATE: u8 = 2;
    pub const DCFM_DISASSOCIATE: u8 = 3;
    pub const DCFM_POLL: u8 = 4;
    pub const DCFM_RX_ENABLE: u8 = 5;
    pub const IND_ASSOCIATE: u8 = 6;
    pub const IND_DISASSOCIATE: u8 = 7;
    pub const IND_SYNC_LOSS: u8 = 8;
    pub const IND_GTS: u8 = 9;
    pub const IND_BEACON_NOTIFY: u8 = 10;
    pub const IND_COMM_STATUS: u8 = 11;
    pub const IND_ORPHAN: u8 = 12;
}

/// Sub-opcodes of MCPS requests, echoed in their confirmations.
pub mod mcps_req {
    pub const DATA: u8 = 0;
    pub const PURGE: u8 = 1;
}

/// Sub-opcodes of deferred MCPS confirmations and MCPS indications.
pub mod mcps_ind {
    pub const DCFM_DATA: u8 = 0;
    pub const DCFM_PURGE: u8 = 1;
    pub const IND_DATA: u8 = 2;
}

/// PIB attribute identifiers.
pub mod pib {
    pub const PAN_ID: u8 = 0x50;
    pub const SHORT_ADDRESS: u8 = 0x53;
}

#[cfg(test)]
mod customizable {
    #![allow(dead_code)]
    pub const REQUEST_TIMEOUT_MS: u32 = 500;
    pub const CONFIRM_BUDGET_MS: u32 = 500;
    pub const CONFIRM_RETRIES: u32 = 5;
    pub const MIN_READ_DELAY_MS: u32 = 8;
}

#[cfg(not(test))]
mod customizable {
    #![allow(unused)]
    include!(concat!(env!("OUT_DIR"), "/config.rs"));
}
