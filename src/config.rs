//! Connection configuration

use crate::retry::RetryPolicy;
use crate::{ADDRESS_LENGTH, DEFAULT_ADDRESS, MAX_TRANSFER_SIZE};

/// Bus-level configuration of an [`I2cInterface`](crate::I2cInterface)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// 7-bit I2C address of the co-processor
    pub address: u8,
    /// Maximum number of bytes in a single bus transaction, including the
    /// register address header on writes
    pub max_transfer: usize,
    /// Retry policy applied to every chunk of a transfer
    pub retry: RetryPolicy,
}

impl Config {
    /// Default configuration: address 0x61, 255-byte transactions, 3 attempts 2 ms apart
    pub const fn new() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            max_transfer: MAX_TRANSFER_SIZE,
            retry: RetryPolicy::TRANSFER,
        }
    }

    /// Use a different device address
    #[must_use]
    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Use a different bus transaction ceiling
    #[must_use]
    pub const fn with_max_transfer(mut self, max_transfer: usize) -> Self {
        self.max_transfer = max_transfer;
        self
    }

    /// Use a different per-chunk retry policy
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Largest payload carried by one write transaction
    ///
    /// Returns `None` when the transaction ceiling leaves no room after the
    /// register address header.
    #[must_use]
    pub const fn write_chunk_len(&self) -> Option<usize> {
        if self.max_transfer > ADDRESS_LENGTH {
            Some(self.max_transfer - ADDRESS_LENGTH)
        } else {
            None
        }
    }

    /// Largest payload carried by one read transaction
    ///
    /// The register address goes out in a separate write phase, so reads use
    /// the whole transaction ceiling.
    #[must_use]
    pub const fn read_chunk_len(&self) -> Option<usize> {
        if self.max_transfer > 0 {
            Some(self.max_transfer)
        } else {
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
