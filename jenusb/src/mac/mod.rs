pub mod command;
pub mod constants;
pub mod mcps;
pub mod mlme;
pub mod pump;
pub mod state;
pub mod transaction;


use crate::{
    config::DeviceConfig,
    sync::{
        interrupt::Interrupt,
        mutex::{Mutex, MutexGuard},
        select::select,
        Either,
    },
    transport::{Transport, TransportError},
    upper::UpperLayer,
};

pub use command::{Confirm, ConfirmStatus, Indication, MacStatus, Outcome, Request};
pub use mcps::data::Dropped;
pub use pump::{PumpExit, PumpState};
pub use state::{Health, Statistics};

use pump::PumpControl;
use state::DeviceState;
use transaction::Transaction;

/// Errors of the management operations and of the transaction engine.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The device is not open.
    NotRunning,
    /// Writing the request or reading the confirmation failed.
    Transport(TransportError),
    /// The confirmation did not answer the request. The device has to be
    /// reopened.
    ProtocolDesync,
    /// The coprocessor rejected the request.
    Application(MacStatus),
    /// An MPDU could not be translated.
    Frame(jenusb_frame::Error),
    /// An argument was rejected before anything was sent.
    Precondition,
    /// Waiting for the transaction lock was interrupted.
    Cancelled,
    /// The operation is not supported by this driver.
    NotImplemented,
    /// No usable PAN identifier and short address are configured.
    AddressNotAvailable,
    /// A confirmation or indication was too short for its layout.
    Malformed,
}

impl From<TransportError> for Error {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

impl From<jenusb_frame::Error> for Error {
    fn from(value: jenusb_frame::Error) -> Self {
        Self::Frame(value)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::NotRunning => write!(f, "device not running"),
            Error::Transport(e) => write!(f, "transport: {e}"),
            Error::ProtocolDesync => write!(f, "confirmation does not match request"),
            Error::Application(status) => write!(f, "rejected by device: {status:?}"),
            Error::Frame(e) => write!(f, "frame: {e}"),
            Error::Precondition => write!(f, "invalid argument"),
            Error::Cancelled => write!(f, "cancelled"),
            Error::NotImplemented => write!(f, "not implemented"),
            Error::AddressNotAvailable => write!(f, "address not available"),
            Error::Malformed => write!(f, "malformed message"),
        }
    }
}

/// One attached coprocessor.
///
/// Management operations and [`Device::send`] may be called concurrently;
/// they are serialized on the transaction lock. The indication pump runs
/// next to them without taking that lock. Everything is expected to be
/// driven from one task, combined with [`crate::sync::join::join`] or
/// [`crate::sync::select::select`].
pub struct Device<T: Transport, U: UpperLayer> {
    transport: T,
    upper_layer: U,
    config: DeviceConfig,
    transaction: Mutex<Transaction>,
    interrupt: Interrupt,
    state: DeviceState,
    pump: PumpControl,
}

impl<T: Transport, U: UpperLayer> Device<T, U> {
    /// Creates a new, closed [`Device`].
    pub fn new(transport: T, upper_layer: U, config: DeviceConfig) -> Self {
        Self {
            transport,
            upper_layer,
            config,
            transaction: Mutex::new(Transaction::new()),
            interrupt: Interrupt::new(),
            state: DeviceState::new(),
            pump: PumpControl::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn upper_layer(&self) -> &U {
        &self.upper_layer
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Returns `true` between a successful [`Device::open`] and
    /// [`Device::close`].
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// The faults recorded since the last [`Device::open`].
    pub fn health(&self) -> Health {
        self.state.health()
    }

    pub fn statistics(&self) -> Statistics {
        self.state.statistics()
    }

    /// Data sequence numbers are managed by the coprocessor.
    pub fn dsn(&self) -> u8 {
        0
    }

    /// Beacon sequence numbers are managed by the coprocessor.
    pub fn bsn(&self) -> u8 {
        0
    }

    /// Acquire the transaction lock.
    ///
    /// Fails with [`Error::Cancelled`] if [`Device::interrupt`] is called
    /// while waiting.
    pub(crate) async fn lock(&self) -> Result<MutexGuard<'_, Transaction>, Error> {
        let generation = self.interrupt.generation();
        match select(self.transaction.lock(), self.interrupt.wait(generation)).await {
            Either::First(guard) => Ok(guard),
            Either::Second(()) => {
                debug!("waiting for the transaction lock was interrupted");
                Err(Error::Cancelled)
            }
        }
    }

    /// Cancel every operation currently waiting for the transaction lock.
    /// The operation holding the lock is not affected.
    pub fn interrupt(&self) {
        self.interrupt.raise();
    }

    /// Bring the device up.
    ///
    /// Resets the coprocessor (keeping its PIB), restarts the outbound queue
    /// and makes the indication pump runnable. A device that needed to be
    /// reopened is usable again afterwards.
    pub async fn open(&self) -> Result<(), Error> {
        let mut transaction = self.lock().await?;

        self.state.clear_faults();
        self.pump.rearm();
        self.state.set_running(true);

        if let Err(err) = self.reset_locked(&mut transaction, false).await {
            error!("open failed: {}", err);
            self.state.set_running(false);
            return Err(err);
        }

        self.upper_layer.start_queue();
        info!("device open");
        Ok(())
    }

    /// Take the device down.
    ///
    /// Stops the outbound queue and waits until the indication pump is no
    /// longer reading or dispatching.
    pub async fn close(&self) {
        self.state.set_running(false);
        self.upper_layer.stop_queue();
        self.pump.drained().await;
        info!("device closed");
    }

    /// Record a fault that requires the device to be reopened. Faults
    /// recorded earlier stay in place.
    async fn fault(&self, record: impl FnOnce(&mut Health), error: Error) {
        self.state.record(record);
        self.upper_layer.fault(error).await;
    }
}
