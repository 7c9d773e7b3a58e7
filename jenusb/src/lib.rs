//! Driver core for the Jennic IEEE 802.15.4 USB coprocessor.
//!
//! The coprocessor runs the MAC itself and is driven through a small
//! request/confirm protocol. Received frames and management events arrive on
//! a separate conduit that is polled by the indication pump. This crate
//! implements both sides on top of a [`transport::Transport`] and hands
//! frames and events to an [`upper::UpperLayer`].
#![no_std]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[macro_use]
pub(crate) mod utils;

pub use jenusb_frame as frame;

pub mod config;
pub mod mac;
pub mod sync;
pub mod transport;
pub mod upper;

pub use config::DeviceConfig;
pub use mac::{Device, Dropped, Error, Health, PumpExit, Statistics};
