use core::future::Future;

use crate::mac::mlme::associate::{AssociateConfirm, AssociateIndication};
use crate::mac::mlme::beacon::BeaconNotifyIndication;
use crate::mac::mlme::disassociate::{DisassociateConfirm, DisassociateIndication};
use crate::mac::mlme::scan::ScanConfirm;
use crate::mac::Error;

/// Management events forwarded to the upper layer.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A scan finished.
    ScanConfirm(ScanConfirm),
    /// An association attempt finished.
    AssociateConfirm(AssociateConfirm),
    /// A disassociation finished.
    DisassociateConfirm(DisassociateConfirm),
    /// A device asks to associate with us.
    AssociateIndication(AssociateIndication),
    /// A device left, or we were asked to leave.
    DisassociateIndication(DisassociateIndication),
    /// A beacon was received.
    BeaconNotify(BeaconNotifyIndication),
}

/// The upper layer refused or failed to take a notification.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct NotifyError;

impl core::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "notification not delivered")
    }
}

/// This trait provides interactions with the network stack sitting on top
/// of the driver.
pub trait UpperLayer {
    /// Hands a received MPDU (without FCS) to the network stack.
    fn received_frame(&self, mpdu: &[u8]) -> impl Future<Output = ()>;
    /// Delivers a management event. A failure is logged by the driver and
    /// otherwise ignored.
    fn notify(&self, notification: Notification) -> impl Future<Output = Result<(), NotifyError>>;
    /// The device entered a state it can only leave by being reopened.
    fn fault(&self, error: Error) -> impl Future<Output = ()>;
    /// Stop handing frames to [`crate::mac::Device::send`].
    fn stop_queue(&self);
    /// Frames may be handed to [`crate::mac::Device::send`] again.
    fn start_queue(&self);
}

#[cfg(test)]
pub mod tests {
    use core::cell::{Cell, RefCell};
    use std::vec::Vec;

    use super::*;

    #[derive(Default)]
    pub struct TestUpperLayer {
        pub frames: RefCell<Vec<Vec<u8>>>,
        pub notifications: RefCell<Vec<Notification>>,
        pub faults: RefCell<Vec<Error>>,
        pub queue_running: Cell<bool>,
        pub queue_stops: Cell<usize>,
        pub refuse_notifications: Cell<bool>,
    }

    impl TestUpperLayer {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl UpperLayer for TestUpperLayer {
        async fn received_frame(&self, mpdu: &[u8]) {
            self.frames.borrow_mut().push(mpdu.to_vec());
        }

        async fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
            if self.refuse_notifications.get() {
                return Err(NotifyError);
            }
            self.notifications.borrow_mut().push(notification);
            Ok(())
        }

        async fn fault(&self, error: Error) {
            self.faults.borrow_mut().push(error);
        }

        fn stop_queue(&self) {
            self.queue_running.set(false);
            self.queue_stops.set(self.queue_stops.get() + 1);
        }

        fn start_queue(&self) {
            self.queue_running.set(true);
        }
    }
}
