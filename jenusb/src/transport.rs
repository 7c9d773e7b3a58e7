use core::future::Future;

/// Failure of a single transport call.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TransportError {
    /// The call did not complete in time. `received` octets were consumed
    /// before the timeout hit.
    Timeout { received: usize },
    /// The device is gone.
    NoDevice,
    /// The endpoint stalled.
    BrokenPipe,
    /// The transport could not allocate what it needed.
    NoMemory,
    /// Any other I/O failure.
    Io,
}

impl TransportError {
    /// Returns `true` for a timeout, no matter how much was received.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransportError::Timeout { received } => {
                write!(f, "timed out after {received} octets")
            }
            TransportError::NoDevice => write!(f, "no device"),
            TransportError::BrokenPipe => write!(f, "broken pipe"),
            TransportError::NoMemory => write!(f, "out of memory"),
            TransportError::Io => write!(f, "i/o error"),
        }
    }
}

/// The byte channel to the coprocessor.
///
/// Three logically distinct conduits are used: requests go out on the
/// command conduit, confirmations come back on the confirmation conduit and
/// everything not tied to a request arrives on the indication conduit.
/// Every call carries an explicit timeout in milliseconds and returns the
/// number of octets transferred.
pub trait Transport {
    /// Write a request on the command conduit.
    fn send(
        &self,
        bytes: &[u8],
        timeout_ms: u32,
    ) -> impl Future<Output = Result<usize, TransportError>>;

    /// Wait for a confirmation on the confirmation conduit.
    fn recv_confirm(
        &self,
        buffer: &mut [u8],
        timeout_ms: u32,
    ) -> impl Future<Output = Result<usize, TransportError>>;

    /// Poll the indication conduit once.
    fn recv_indication(
        &self,
        buffer: &mut [u8],
        timeout_ms: u32,
    ) -> impl Future<Output = Result<usize, TransportError>>;
}

#[cfg(test)]
pub mod tests {
    use core::cell::{Cell, RefCell};
    use core::future::poll_fn;
    use core::task::Poll;
    use std::collections::VecDeque;
    use std::vec::Vec;

    use super::*;
    use crate::mac::command::{Confirm, Indication, Request};
    use crate::sync::yield_now::yield_now;

    /// A scripted transport. Confirmations and indications are handed out in
    /// the order they were queued. An empty confirmation queue times out, an
    /// empty indication queue never completes.
    #[derive(Default)]
    pub struct TestTransport {
        sent: RefCell<Vec<Vec<u8>>>,
        confirms: RefCell<VecDeque<Result<Vec<u8>, TransportError>>>,
        indications: RefCell<VecDeque<Result<Vec<u8>, TransportError>>>,
        send_errors: RefCell<VecDeque<TransportError>>,
        confirm_reads: Cell<usize>,
        indication_reads: Cell<usize>,
        outstanding: Cell<usize>,
        max_outstanding: Cell<usize>,
    }

    impl TestTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_confirm(&self, confirm: Confirm) {
            let mut buffer = std::vec![0; Confirm::SIZE];
            confirm.emit(&mut buffer);
            self.confirms.borrow_mut().push_back(Ok(buffer));
        }

        pub fn push_raw_confirm(&self, confirm: Result<Vec<u8>, TransportError>) {
            self.confirms.borrow_mut().push_back(confirm);
        }

        pub fn push_indication(&self, indication: Indication) {
            let mut buffer = std::vec![0; Indication::SIZE];
            indication.emit(&mut buffer);
            self.indications.borrow_mut().push_back(Ok(buffer));
        }

        pub fn push_raw_indication(&self, indication: Result<Vec<u8>, TransportError>) {
            self.indications.borrow_mut().push_back(indication);
        }

        pub fn fail_next_send(&self, error: TransportError) {
            self.send_errors.borrow_mut().push_back(error);
        }

        /// Every request written so far, decoded.
        pub fn requests(&self) -> Vec<Request> {
            self.sent
                .borrow()
                .iter()
                .map(|raw| Request::parse(raw).unwrap())
                .collect()
        }

        pub fn confirm_reads(&self) -> usize {
            self.confirm_reads.get()
        }

        pub fn indication_reads(&self) -> usize {
            self.indication_reads.get()
        }

        /// Largest number of requests that were written but not yet
        /// confirmed at the same time.
        pub fn max_outstanding(&self) -> usize {
            self.max_outstanding.get()
        }
    }

    impl Transport for TestTransport {
        async fn send(&self, bytes: &[u8], _timeout_ms: u32) -> Result<usize, TransportError> {
            // Give concurrent callers the chance to interleave
            yield_now().await;

            if let Some(error) = self.send_errors.borrow_mut().pop_front() {
                return Err(error);
            }

            self.sent.borrow_mut().push(bytes.to_vec());
            let outstanding = self.outstanding.get() + 1;
            self.outstanding.set(outstanding);
            self.max_outstanding
                .set(self.max_outstanding.get().max(outstanding));
            Ok(bytes.len())
        }

        async fn recv_confirm(
            &self,
            buffer: &mut [u8],
            _timeout_ms: u32,
        ) -> Result<usize, TransportError> {
            yield_now().await;
            self.confirm_reads.set(self.confirm_reads.get() + 1);

            match self.confirms.borrow_mut().pop_front() {
                Some(Ok(confirm)) => {
                    self.outstanding.set(self.outstanding.get().saturating_sub(1));
                    buffer[..confirm.len()].copy_from_slice(&confirm);
                    Ok(confirm.len())
                }
                Some(Err(error)) => Err(error),
                None => Err(TransportError::Timeout { received: 0 }),
            }
        }

        async fn recv_indication(
            &self,
            buffer: &mut [u8],
            _timeout_ms: u32,
        ) -> Result<usize, TransportError> {
            self.indication_reads.set(self.indication_reads.get() + 1);

            let next = self.indications.borrow_mut().pop_front();
            match next {
                Some(Ok(indication)) => {
                    buffer[..indication.len()].copy_from_slice(&indication);
                    Ok(indication.len())
                }
                Some(Err(error)) => Err(error),
                None => poll_fn(|_| Poll::Pending).await,
            }
        }
    }
}
