use embedded_hal_async::delay::DelayNs;

use super::yield_now;

/// Implementation of a timer that can be used in tests. Delays yield at
/// least once, but then afterwards immediately resolve.
#[derive(Default, Clone)]
pub struct Delay {}

impl DelayNs for Delay {
    async fn delay_ns(&mut self, _ns: u32) {
        yield_now::yield_now().await
    }
}
