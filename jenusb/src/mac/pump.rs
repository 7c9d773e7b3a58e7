//! The indication pump.
//!
//! Polls the indication conduit every read delay and dispatches what it
//! reads. It never takes the transaction lock, so indications are handled
//! while a request is in flight.

use core::cell::RefCell;
use core::future::poll_fn;
use core::task::{Poll, Waker};

use embedded_hal_async::delay::DelayNs;

use super::command::Indication;
use super::{Device, Error};
use crate::transport::{Transport, TransportError};
use crate::upper::{Notification, UpperLayer};

/// What the pump is doing.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PumpState {
    /// Waiting for the next poll, or not running at all.
    Idle,
    /// Reading the indication conduit.
    Polling,
    /// Handling an indication.
    Dispatching,
    /// A transport failure stopped the pump. Only [`Device::open`] leaves
    /// this state.
    Stopped,
}

/// Why [`Device::run_indication_pump`] returned.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PumpExit {
    /// The device was closed, or never opened.
    Closed,
    /// The transport failed. The device has to be reopened.
    Failed(TransportError),
    /// Another pump is already running on this device.
    AlreadyRunning,
}

struct Control {
    state: PumpState,
    claimed: bool,
    drain_waker: Option<Waker>,
}

/// Pump state shared between the pump and teardown.
pub(crate) struct PumpControl {
    inner: critical_section::Mutex<RefCell<Control>>,
}

impl PumpControl {
    pub fn new() -> Self {
        Self {
            inner: critical_section::Mutex::new(RefCell::new(Control {
                state: PumpState::Idle,
                claimed: false,
                drain_waker: None,
            })),
        }
    }

    pub fn state(&self) -> PumpState {
        critical_section::with(|cs| self.inner.borrow_ref(cs).state)
    }

    /// Move to `state`, waking a pending drain.
    pub fn set(&self, state: PumpState) {
        critical_section::with(|cs| {
            let mut control = self.inner.borrow_ref_mut(cs);
            control.state = state;
            if let Some(waker) = control.drain_waker.take() {
                waker.wake();
            }
        });
    }

    /// Leave [`PumpState::Stopped`].
    pub fn rearm(&self) {
        if self.state() == PumpState::Stopped {
            self.set(PumpState::Idle);
        }
    }

    /// Take the right to run the pump. Fails if a pump already holds it.
    fn claim(&self) -> Option<Claim<'_>> {
        critical_section::with(|cs| {
            let mut control = self.inner.borrow_ref_mut(cs);
            if control.claimed {
                return None;
            }
            control.claimed = true;
            Some(Claim { control: self })
        })
    }

    fn release(&self) {
        critical_section::with(|cs| {
            let mut control = self.inner.borrow_ref_mut(cs);
            control.claimed = false;
            // A pump dropped mid-poll must not keep teardown waiting.
            if matches!(control.state, PumpState::Polling | PumpState::Dispatching) {
                control.state = PumpState::Idle;
                if let Some(waker) = control.drain_waker.take() {
                    waker.wake();
                }
            }
        });
    }

    /// Resolve once the pump is neither polling nor dispatching.
    pub async fn drained(&self) {
        poll_fn(|cx| {
            critical_section::with(|cs| {
                let mut control = self.inner.borrow_ref_mut(cs);
                match control.state {
                    PumpState::Polling | PumpState::Dispatching => {
                        control.drain_waker = Some(cx.waker().clone());
                        Poll::Pending
                    }
                    PumpState::Idle | PumpState::Stopped => Poll::Ready(()),
                }
            })
        })
        .await
    }
}

/// Held by the running pump. Released when the pump returns or is dropped.
struct Claim<'a> {
    control: &'a PumpControl,
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.control.release();
    }
}

impl<T: Transport, U: UpperLayer> Device<T, U> {
    pub fn pump_state(&self) -> PumpState {
        self.pump.state()
    }

    /// Run the indication pump until the device is closed or the transport
    /// fails.
    ///
    /// Run it next to the operations that use the device. `timer` paces
    /// the polls. Only one pump runs at a time: a second call made while
    /// one is running returns [`PumpExit::AlreadyRunning`] without touching
    /// the transport.
    pub async fn run_indication_pump<D: DelayNs>(&self, mut timer: D) -> PumpExit {
        if let Some(err) = self.state.pump_stopped() {
            return PumpExit::Failed(err);
        }
        let Some(_claim) = self.pump.claim() else {
            warn!("indication pump already running");
            return PumpExit::AlreadyRunning;
        };

        let mut buffer = [0u8; Indication::SIZE];
        loop {
            self.pump.set(PumpState::Idle);
            timer.delay_ms(self.config.read_delay_ms).await;

            if !self.state.is_running() {
                debug!("indication pump exits, device closed");
                self.pump.set(PumpState::Idle);
                return PumpExit::Closed;
            }

            self.pump.set(PumpState::Polling);
            match self
                .transport
                .recv_indication(&mut buffer, self.config.indication_timeout_ms)
                .await
            {
                Ok(len) => {
                    self.pump.set(PumpState::Dispatching);
                    self.dispatch(&buffer[..len]).await;
                }
                Err(TransportError::Timeout { received: 0 }) => {}
                Err(TransportError::Timeout { received }) => {
                    warn!("incomplete indication read: {} octets", received);
                }
                Err(err) => {
                    error!("indication pump stopped: {}", err);
                    self.pump.set(PumpState::Stopped);
                    self.fault(|h| h.pump_stopped = Some(err), Error::Transport(err))
                        .await;
                    return PumpExit::Failed(err);
                }
            }
        }
    }

    /// Handle one raw indication. Nothing in here stops the pump.
    async fn dispatch(&self, raw: &[u8]) {
        let indication = match Indication::parse(raw) {
            Ok(indication) => indication,
            Err(Error::Frame(err)) => {
                debug!("data indication dropped: {}", err);
                self.state.count(|s| s.rx_dropped = s.rx_dropped.wrapping_add(1));
                return;
            }
            Err(err) => {
                warn!("indication dropped: {}", err);
                self.state.count(|s| {
                    s.indications_dropped = s.indications_dropped.wrapping_add(1)
                });
                return;
            }
        };

        let notification = match indication {
            Indication::Data(data) => {
                self.data_indication(&data).await;
                return;
            }
            Indication::DataConfirm(confirm) | Indication::PurgeConfirm(confirm) => {
                debug!(
                    "deferred mcps confirmation for handle {}: {:?}",
                    confirm.handle,
                    confirm.status
                );
                return;
            }
            Indication::ScanConfirm(confirm) => Notification::ScanConfirm(confirm),
            Indication::AssociateConfirm(confirm) => Notification::AssociateConfirm(confirm),
            Indication::DisassociateConfirm(confirm) => {
                Notification::DisassociateConfirm(confirm)
            }
            Indication::AssociateIndication(indication) => {
                Notification::AssociateIndication(indication)
            }
            Indication::DisassociateIndication(indication) => {
                Notification::DisassociateIndication(indication)
            }
            Indication::BeaconNotify(indication) => Notification::BeaconNotify(indication),
            Indication::Unsupported { sap, kind } => {
                warn!("unsupported indication {}/{}", sap, kind);
                return;
            }
            Indication::Unknown { sap, kind } => {
                error!("unknown indication {}/{}", sap, kind);
                self.state.count(|s| {
                    s.indications_dropped = s.indications_dropped.wrapping_add(1)
                });
                return;
            }
        };

        if let Err(err) = self.upper_layer.notify(notification).await {
            warn!("notification delivery failed: {}", err);
        }
    }
}
