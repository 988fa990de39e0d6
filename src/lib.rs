#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Must come first so the logging macros are visible to every other module
#[macro_use]
mod fmt;

pub mod command;
pub mod config;
pub mod device;
pub mod interface;
pub mod registers;
pub mod retry;

mod scratch;

// Re-export main types
pub use command::{Command, RawRequest};
pub use config::Config;
pub use device::N76e003Driver;
pub use interface::I2cInterface;
pub use retry::RetryPolicy;

/// Default 7-bit I2C address of the N76E003 co-processor (0x61)
pub const DEFAULT_ADDRESS: u8 = 0x61;

/// Expected value of the `CHIPID` register
pub const CHIP_ID_VALUE: u8 = 0x76;

/// Width of the register address header that precedes every write
pub const ADDRESS_LENGTH: usize = 1;

/// Largest single I2C transaction the bus layer accepts, in bytes
pub const MAX_TRANSFER_SIZE: usize = 255;

/// Number of addressable registers (8-bit register space)
pub const REGISTER_SPACE: usize = 256;

/// Driver errors
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// A chunk exhausted its retry budget. Chunks before it were already
    /// committed to the device and are not rolled back.
    Transfer {
        /// Device address
        address: u8,
        /// Register address of the failing chunk
        register: u8,
        /// Total length of the logical transfer
        len: usize,
        /// Bus error of the last attempt
        source: E,
    },
    /// The device never reported the expected chip id (contains the last value read)
    IdentityMismatch(u8),
    /// Scratch buffer could not be acquired
    ResourceExhausted,
    /// Unrecognized command, malformed argument, or a register range outside
    /// the 8-bit register space
    InvalidRequest,
    /// Invalid configuration parameter
    InvalidConfig,
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Transfer {
                address,
                register,
                len,
                source,
            } => write!(
                f,
                "i2c transfer failed, dev: {address:#04x}, reg: {register:#04x}, size: {len} ({source:?})"
            ),
            Self::IdentityMismatch(found) => write!(
                f,
                "unexpected chip id {found:#04x} (expected {CHIP_ID_VALUE:#04x})"
            ),
            Self::ResourceExhausted => f.write_str("scratch buffer allocation failed"),
            Self::InvalidRequest => f.write_str("invalid request"),
            Self::InvalidConfig => f.write_str("invalid configuration"),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for Error<E> {}
