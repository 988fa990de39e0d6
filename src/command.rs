//! Control commands
//!
//! [`Command`] is the closed set of operations a control surface may request.
//! [`RawRequest`] is the untyped form as it arrives from an ioctl-style
//! character device: a magic byte, a command number, and an optional `int`
//! argument in native byte order.

use crate::Error;

/// Magic byte shared by every control request (`'k'`)
pub const IOC_MAGIC: u8 = b'k';

/// Highest valid command number
pub const IOC_MAXNR: u8 = 4;

/// Size of the `int` argument carried by commands 2 to 4
pub const ARG_SIZE: usize = core::mem::size_of::<i32>();

/// A decoded control command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Send one heartbeat pulse (nr 1, no argument)
    Heartbeat,
    /// Report the host uptime in seconds (nr 2)
    SetUptime(u32),
    /// Arm (`true`) or disarm (`false`) the watchdog (nr 3)
    SwitchWatchdog(bool),
    /// Set the watchdog timeout in seconds (nr 4)
    SetWatchdogDuration(u16),
}

/// An undecoded control request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawRequest<'a> {
    /// Request type, must be [`IOC_MAGIC`]
    pub magic: u8,
    /// Command number, 1 to [`IOC_MAXNR`]
    pub number: u8,
    /// Argument bytes (empty for heartbeat, a native-endian `i32` otherwise)
    pub arg: &'a [u8],
}

impl<'a> RawRequest<'a> {
    /// Create a request with the driver's magic byte
    pub const fn new(number: u8, arg: &'a [u8]) -> Self {
        Self {
            magic: IOC_MAGIC,
            number,
            arg,
        }
    }
}

impl Command {
    /// Command number of [`Command::Heartbeat`]
    pub const HEARTBEAT: u8 = 1;
    /// Command number of [`Command::SetUptime`]
    pub const SET_UPTIME: u8 = 2;
    /// Command number of [`Command::SwitchWatchdog`]
    pub const SWITCH_WATCHDOG: u8 = 3;
    /// Command number of [`Command::SetWatchdogDuration`]
    pub const SET_WATCHDOG_DURATION: u8 = 4;

    /// Command number used on the control surface
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Heartbeat => Self::HEARTBEAT,
            Self::SetUptime(_) => Self::SET_UPTIME,
            Self::SwitchWatchdog(_) => Self::SWITCH_WATCHDOG,
            Self::SetWatchdogDuration(_) => Self::SET_WATCHDOG_DURATION,
        }
    }

    /// Decode a raw control request
    ///
    /// Any positive argument to `SWITCH_WATCHDOG` arms the watchdog; zero or a
    /// negative value disarms it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the magic byte or command number is
    /// unknown, the argument has the wrong size, or its value does not fit the
    /// command (negative uptime, duration above 65535 s).
    pub fn decode<E>(request: &RawRequest<'_>) -> Result<Self, Error<E>> {
        Self::decode_inner(request).ok_or_else(|| {
            warn!(
                "rejected request magic {:#x} nr {} arg size {}",
                request.magic,
                request.number,
                request.arg.len()
            );
            Error::InvalidRequest
        })
    }

    fn decode_inner(request: &RawRequest<'_>) -> Option<Self> {
        if request.magic != IOC_MAGIC {
            return None;
        }

        match request.number {
            Self::HEARTBEAT if request.arg.is_empty() => Some(Self::Heartbeat),
            Self::SET_UPTIME => u32::try_from(int_arg(request.arg)?)
                .ok()
                .map(Self::SetUptime),
            Self::SWITCH_WATCHDOG => Some(Self::SwitchWatchdog(int_arg(request.arg)? > 0)),
            Self::SET_WATCHDOG_DURATION => u16::try_from(int_arg(request.arg)?)
                .ok()
                .map(Self::SetWatchdogDuration),
            _ => None,
        }
    }
}

fn int_arg(arg: &[u8]) -> Option<i32> {
    <[u8; ARG_SIZE]>::try_from(arg).ok().map(i32::from_ne_bytes)
}
