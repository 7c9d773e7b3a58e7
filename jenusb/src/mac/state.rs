use core::cell::Cell;
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use critical_section::Mutex;

use super::constants::{BROADCAST_PAN_ID, BROADCAST_SHORT_ADDRESS};
use crate::transport::TransportError;

/// Faults that need the device to be reopened.
///
/// Each fault is recorded on its own and stays set until [`Device::open`],
/// so a later fault never hides an earlier one.
///
/// [`Device::open`]: super::Device::open
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Health {
    /// A confirmation did not match its request. The device refuses every
    /// request.
    pub desynchronized: bool,
    /// The indication pump stopped on this transport failure.
    pub pump_stopped: Option<TransportError>,
}

impl Health {
    pub const OPERATIONAL: Self = Self {
        desynchronized: false,
        pump_stopped: None,
    };

    pub fn is_operational(&self) -> bool {
        *self == Self::OPERATIONAL
    }
}

/// Packet counters. Drops are counted here instead of being reported one
/// by one. Every counter wraps around.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Statistics {
    pub rx_packets: u32,
    pub rx_bytes: u32,
    /// Data indications that could not be turned into an MPDU.
    pub rx_dropped: u32,
    pub tx_packets: u32,
    pub tx_bytes: u32,
    pub tx_dropped: u32,
    /// Indications that were malformed or of an unknown kind.
    pub indications_dropped: u32,
}

/// Per-device mutable state.
///
/// The addresses mirror what the coprocessor confirmed. They are written
/// only while the transaction lock is held, but can be read from anywhere
/// without suspending.
pub(crate) struct DeviceState {
    running: AtomicBool,
    pan_id: AtomicU16,
    short_address: AtomicU16,
    health: Mutex<Cell<Health>>,
    statistics: Mutex<Cell<Statistics>>,
}

impl DeviceState {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            pan_id: AtomicU16::new(BROADCAST_PAN_ID),
            short_address: AtomicU16::new(BROADCAST_SHORT_ADDRESS),
            health: Mutex::new(Cell::new(Health::OPERATIONAL)),
            statistics: Mutex::new(Cell::new(Statistics::default())),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }

    pub fn pan_id(&self) -> u16 {
        self.pan_id.load(Ordering::Acquire)
    }

    pub fn set_pan_id(&self, pan_id: u16) {
        self.pan_id.store(pan_id, Ordering::Release);
    }

    pub fn short_address(&self) -> u16 {
        self.short_address.load(Ordering::Acquire)
    }

    pub fn set_short_address(&self, short_address: u16) {
        self.short_address.store(short_address, Ordering::Release);
    }

    pub fn health(&self) -> Health {
        critical_section::with(|cs| self.health.borrow(cs).get())
    }

    pub fn is_desynchronized(&self) -> bool {
        self.health().desynchronized
    }

    pub fn pump_stopped(&self) -> Option<TransportError> {
        self.health().pump_stopped
    }

    /// Record a fault on top of the ones already recorded.
    pub fn record(&self, f: impl FnOnce(&mut Health)) {
        critical_section::with(|cs| {
            let cell = self.health.borrow(cs);
            let mut health = cell.get();
            f(&mut health);
            cell.set(health);
        });
    }

    /// Forget every fault. Only a reopen does this.
    pub fn clear_faults(&self) {
        critical_section::with(|cs| self.health.borrow(cs).set(Health::OPERATIONAL));
    }

    pub fn statistics(&self) -> Statistics {
        critical_section::with(|cs| self.statistics.borrow(cs).get())
    }

    pub fn count(&self, f: impl FnOnce(&mut Statistics)) {
        critical_section::with(|cs| {
            let cell = self.statistics.borrow(cs);
            let mut statistics = cell.get();
            f(&mut statistics);
            cell.set(statistics);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state() {
        let state = DeviceState::new();
        assert!(!state.is_running());
        assert_eq!(state.pan_id(), BROADCAST_PAN_ID);
        assert_eq!(state.short_address(), BROADCAST_SHORT_ADDRESS);
        assert!(state.health().is_operational());
        assert_eq!(state.statistics(), Statistics::default());
    }

    #[test]
    fn faults_are_independent() {
        let state = DeviceState::new();
        state.record(|h| h.desynchronized = true);
        state.record(|h| h.pump_stopped = Some(TransportError::NoDevice));
        assert!(state.is_desynchronized());
        assert_eq!(state.pump_stopped(), Some(TransportError::NoDevice));

        state.clear_faults();
        state.record(|h| h.pump_stopped = Some(TransportError::Io));
        state.record(|h| h.desynchronized = true);
        assert_eq!(
            state.health(),
            Health {
                desynchronized: true,
                pump_stopped: Some(TransportError::Io),
            }
        );

        state.clear_faults();
        assert!(state.health().is_operational());
    }

    #[test]
    fn counters() {
        let state = DeviceState::new();
        state.count(|s| s.rx_packets = s.rx_packets.wrapping_add(1));
        state.count(|s| {
            s.rx_packets = s.rx_packets.wrapping_add(1);
            s.rx_bytes = s.rx_bytes.wrapping_add(10);
        });
        let statistics = state.statistics();
        assert_eq!(statistics.rx_packets, 2);
        assert_eq!(statistics.rx_bytes, 10);
    }
}
