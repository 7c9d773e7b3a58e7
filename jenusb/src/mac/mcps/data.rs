use jenusb_frame::{decode_native_to_mpdu, encode_mpdu_to_native, RxFrame, TxFrame};

use crate::mac::command::{Parameters, Request};
use crate::mac::{Device, Error, MacStatus};
use crate::transport::Transport;
use crate::upper::UpperLayer;

/// Why a frame handed to [`Device::send`] was not transmitted.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Dropped {
    /// The MPDU can not be expressed as a native frame.
    Frame(jenusb_frame::Error),
    /// The request could not be exchanged with the coprocessor.
    Transport(Error),
    /// The coprocessor's transmit queue is full. Retry later.
    Overflow,
    /// The coprocessor rejected the frame. The outbound queue has been
    /// stopped until [`Device::resume_queue`].
    Device(MacStatus),
    /// Waiting for the transaction lock was interrupted.
    Cancelled,
}

impl core::fmt::Display for Dropped {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Dropped::Frame(e) => write!(f, "frame: {e}"),
            Dropped::Transport(e) => write!(f, "{e}"),
            Dropped::Overflow => write!(f, "transmit queue overflow"),
            Dropped::Device(status) => write!(f, "rejected by device: {status:?}"),
            Dropped::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Parameters of an MCPS-DATA request.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DataRequest {
    /// MSDU handle, echoed in the confirmation.
    pub handle: u8,
    pub frame: TxFrame,
}

impl Parameters for DataRequest {
    const LEN: usize = 1 + TxFrame::SIZE;

    fn emit(&self, buffer: &mut [u8]) {
        buffer[0] = self.handle;
        self.frame.emit(&mut buffer[1..]);
    }

    fn parse(buffer: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            handle: buffer[0],
            frame: TxFrame::parse(&buffer[1..])?,
        })
    }
}

/// A frame received by the coprocessor.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DataIndication {
    pub frame: RxFrame,
}

impl Parameters for DataIndication {
    const LEN: usize = RxFrame::SIZE;

    fn emit(&self, buffer: &mut [u8]) {
        self.frame.emit(buffer);
    }

    fn parse(buffer: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            frame: RxFrame::parse(buffer)?,
        })
    }
}

/// Deferred confirmation of a data or purge request.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DataConfirm {
    pub handle: u8,
    pub status: MacStatus,
}

impl Parameters for DataConfirm {
    const LEN: usize = 2;

    fn emit(&self, buffer: &mut [u8]) {
        buffer[0] = self.handle;
        buffer[1] = self.status.into();
    }

    fn parse(buffer: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            handle: buffer[0],
            status: buffer[1].into(),
        })
    }
}

impl<T: Transport, U: UpperLayer> Device<T, U> {
    /// Requests the transfer of an MPDU (without FCS) to another device.
    ///
    /// Returns the number of octets handed to the coprocessor. Every drop is
    /// counted in [`crate::mac::Statistics::tx_dropped`].
    pub async fn send(&self, mpdu: &[u8]) -> Result<usize, Dropped> {
        let result = self.send_mpdu(mpdu).await;
        match result {
            Ok(len) => self.state.count(|s| {
                s.tx_packets = s.tx_packets.wrapping_add(1);
                s.tx_bytes = s.tx_bytes.wrapping_add(len as u32);
            }),
            Err(_) => self.state.count(|s| s.tx_dropped = s.tx_dropped.wrapping_add(1)),
        }
        result
    }

    async fn send_mpdu(&self, mpdu: &[u8]) -> Result<usize, Dropped> {
        let mut transaction = self.lock().await.map_err(|err| match err {
            Error::Cancelled => Dropped::Cancelled,
            err => Dropped::Transport(err),
        })?;

        let frame = encode_mpdu_to_native(mpdu).map_err(|err| {
            debug!("outgoing frame dropped: {}", err);
            Dropped::Frame(err)
        })?;

        let request = Request::Data(DataRequest {
            handle: transaction.next_handle(),
            frame,
        });
        let outcome = self
            .execute(&mut transaction, &request)
            .await
            .map_err(Dropped::Transport)?
            .outcome();

        match outcome.into_result() {
            Ok(()) => Ok(mpdu.len()),
            Err(Error::Application(MacStatus::TransactionOverflow)) => {
                debug!("transmit queue overflow");
                Err(Dropped::Overflow)
            }
            Err(_) => {
                warn!("frame rejected, stopping the outbound queue");
                self.upper_layer.stop_queue();
                Err(Dropped::Device(outcome.reason))
            }
        }
    }

    /// Restart the outbound queue after it was stopped by a rejected frame.
    pub fn resume_queue(&self) {
        if self.state.is_running() {
            info!("outbound queue resumed");
            self.upper_layer.start_queue();
        }
    }

    /// Rebuild the MPDU of a received frame and hand it up.
    pub(crate) async fn data_indication(&self, indication: &DataIndication) {
        match decode_native_to_mpdu(&indication.frame) {
            Ok(mpdu) => {
                self.upper_layer.received_frame(&mpdu).await;
                self.state.count(|s| {
                    s.rx_packets = s.rx_packets.wrapping_add(1);
                    s.rx_bytes = s.rx_bytes.wrapping_add(mpdu.len() as u32);
                });
            }
            Err(err) => {
                debug!("received frame dropped: {}", err);
                self.state.count(|s| s.rx_dropped = s.rx_dropped.wrapping_add(1));
            }
        }
    }
}
