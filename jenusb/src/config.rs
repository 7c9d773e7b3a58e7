//! Runtime configuration, fixed when the device is attached.

use crate::mac::constants::{
    CONFIRM_BUDGET_MS, CONFIRM_RETRIES, MIN_READ_DELAY_MS, REQUEST_TIMEOUT_MS,
};

/// Timing of a device, derived from its endpoints.
///
/// The compile-time defaults can be changed with the `JENUSB_*` environment
/// variables at build time.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DeviceConfig {
    /// Delay between two polls of the indication conduit.
    pub read_delay_ms: u32,
    /// Timeout of one poll of the indication conduit.
    pub indication_timeout_ms: u32,
    /// Timeout of writing a request.
    pub request_timeout_ms: u32,
    /// Timeout of one attempt to read a confirmation.
    pub confirm_timeout_ms: u32,
    /// Number of attempts to read a confirmation. Only timeouts are retried.
    pub confirm_attempts: u32,
}

impl DeviceConfig {
    /// Derive the configuration from the polling intervals of the bulk-in
    /// (indication) and interrupt-in (confirmation) endpoints.
    ///
    /// The read delay is the bulk-in interval, but never below the minimum
    /// read delay. A poll may take twice the read delay, saturating at
    /// `u32::MAX`. The confirmation budget is split over the attempts; an
    /// attempt never waits less than one interrupt interval.
    pub fn from_endpoint_intervals(bulk_in_ms: u32, interrupt_in_ms: u32) -> Self {
        let read_delay_ms = bulk_in_ms.max(MIN_READ_DELAY_MS);
        let confirm_attempts = CONFIRM_RETRIES.max(1);
        let confirm_timeout_ms = (CONFIRM_BUDGET_MS / confirm_attempts)
            .max(interrupt_in_ms)
            .max(1);

        Self {
            read_delay_ms,
            indication_timeout_ms: read_delay_ms.saturating_mul(2),
            request_timeout_ms: REQUEST_TIMEOUT_MS,
            confirm_timeout_ms,
            confirm_attempts,
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::from_endpoint_intervals(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_delay_is_clamped() {
        let config = DeviceConfig::from_endpoint_intervals(1, 1);
        assert_eq!(config.read_delay_ms, 8);
        assert_eq!(config.indication_timeout_ms, 16);

        let config = DeviceConfig::from_endpoint_intervals(32, 1);
        assert_eq!(config.read_delay_ms, 32);
        assert_eq!(config.indication_timeout_ms, 64);
    }

    #[test]
    fn slow_endpoints_saturate() {
        let config = DeviceConfig::from_endpoint_intervals(u32::MAX, u32::MAX);
        assert_eq!(config.read_delay_ms, u32::MAX);
        assert_eq!(config.indication_timeout_ms, u32::MAX);
        assert_eq!(config.confirm_timeout_ms, u32::MAX);

        let config = DeviceConfig::from_endpoint_intervals(u32::MAX / 2 + 1, 1);
        assert_eq!(config.indication_timeout_ms, u32::MAX);
    }

    #[test]
    fn confirmation_budget_is_split() {
        let config = DeviceConfig::from_endpoint_intervals(8, 1);
        assert_eq!(config.confirm_attempts, 5);
        assert_eq!(config.confirm_timeout_ms, 100);
        assert_eq!(config.request_timeout_ms, 500);

        let config = DeviceConfig::from_endpoint_intervals(8, 255);
        assert_eq!(config.confirm_timeout_ms, 255);
    }
}
