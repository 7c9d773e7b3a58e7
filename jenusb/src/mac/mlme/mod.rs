//! MAC sublayer management entity.
//!
//! Every operation takes the transaction lock for its whole duration, so a
//! change of the cached device state is atomic with the confirmation that
//! justifies it.

pub mod associate;
pub mod beacon;
pub mod disassociate;
pub mod get;
pub mod reset;
pub mod scan;
pub mod set;
pub mod start;
