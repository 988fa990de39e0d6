//! Register map of the N76E003 co-processor firmware
//!
//! The firmware exposes a handful of command registers. Single-byte registers
//! are declared through the `device-driver` DSL. The uptime and watchdog
//! duration commands carry multi-byte big-endian payloads and are written as
//! raw byte blocks at the addresses below.
//!
//! | Register | Address | Payload |
//! |---|---|---|
//! | `CHIPID` | 0x00 | 1 byte, reads [`CHIP_ID_VALUE`](crate::CHIP_ID_VALUE) |
//! | `HEARTBEAT` | 0x01 | 1 byte, [`HEARTBEAT_PULSE`] |
//! | `SET_UPTIME` | 0x02 | `u32`, big-endian |
//! | `SWITCH_WATCHDOG` | 0x03 | 1 byte, [`WATCHDOG_ON`] / [`WATCHDOG_OFF`] |
//! | `SET_WATCHDOG_DURATION` | 0x04 | `u16`, big-endian |

device_driver::create_device!(
    device_name: N76e003,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = BE;
        }

        /// CHIPID - Chip identification (0x00)
        /// Expected value: 0x76
        register ChipId {
            const ADDRESS = 0x00;
            const SIZE_BITS = 8;

            /// Chip identifier
            chip_id: uint = 0..8,
        },

        /// HEARTBEAT - Liveness pulse (0x01)
        register Heartbeat {
            const ADDRESS = 0x01;
            const SIZE_BITS = 8;

            /// Must be written with `HEARTBEAT_PULSE`
            pulse: uint = 0..8,
        },

        /// SWITCH_WATCHDOG - Arm or disarm the watchdog (0x03)
        register SwitchWatchdog {
            const ADDRESS = 0x03;
            const SIZE_BITS = 8;

            /// `WATCHDOG_ON` or `WATCHDOG_OFF`
            state: uint = 0..8,
        },
    }
);

/// `SET_UPTIME` register address
pub const SET_UPTIME: u8 = 0x02;

/// `SET_WATCHDOG_DURATION` register address
pub const SET_WATCHDOG_DURATION: u8 = 0x04;

/// Value written to `HEARTBEAT` for each pulse
pub const HEARTBEAT_PULSE: u8 = 0x55;

/// `SWITCH_WATCHDOG` value that arms the watchdog
pub const WATCHDOG_ON: u8 = 0x01;

/// `SWITCH_WATCHDOG` value that disarms the watchdog
pub const WATCHDOG_OFF: u8 = 0x02;
