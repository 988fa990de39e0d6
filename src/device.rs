//! High-level driver API for the N76E003
//!
//! Each operation turns a typed value into one register transfer. Retries
//! happen in the transfer layer underneath; results are passed through
//! unchanged.

use device_driver::RegisterInterface;
use embedded_hal::delay::DelayNs;

use crate::command::{Command, RawRequest};
use crate::registers::{self, N76e003 as RegisterDevice};
use crate::retry::{RetryPolicy, retry};
use crate::{CHIP_ID_VALUE, Error};

/// Main driver for the N76E003 watchdog co-processor
pub struct N76e003Driver<I> {
    device: RegisterDevice<I>,
    identity_retry: RetryPolicy,
}

impl<I> N76e003Driver<I> {
    /// Create a driver without talking to the device
    ///
    /// Skips the chip identity check. Intended for bring-up where the
    /// firmware may not answer yet; call [`verify_identity`](Self::verify_identity)
    /// once it does.
    pub fn new_unchecked(interface: I) -> Self {
        Self {
            device: RegisterDevice::new(interface),
            identity_retry: RetryPolicy::IDENTITY,
        }
    }

    /// Use a different retry policy for the chip identity check
    #[must_use]
    pub fn with_identity_retry(mut self, policy: RetryPolicy) -> Self {
        self.identity_retry = policy;
        self
    }

    /// Consume the driver and return the underlying interface
    pub fn release(self) -> I {
        self.device.interface
    }

    /// Get a reference to the underlying register device (for advanced usage)
    pub const fn device(&self) -> &RegisterDevice<I> {
        &self.device
    }

    /// Get a mutable reference to the underlying interface
    pub fn interface(&mut self) -> &mut I {
        &mut self.device.interface
    }
}

impl<I, E> N76e003Driver<I>
where
    I: RegisterInterface<AddressType = u8, Error = Error<E>>,
{
    /// Create a new N76E003 driver instance
    ///
    /// Verifies the chip identity before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Communication with the device fails
    /// - The `CHIPID` register never reads 0x76
    pub fn new<D>(interface: I, delay: &mut D) -> Result<Self, Error<E>>
    where
        D: DelayNs,
    {
        let mut driver = Self::new_unchecked(interface);
        driver.verify_identity(delay)?;
        info!("N76E003 setup finish");
        Ok(driver)
    }

    /// Read the `CHIPID` register
    ///
    /// Should return 0x76 for a responsive N76E003
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn read_chip_id(&mut self) -> Result<u8, Error<E>> {
        let reg = self.device.chip_id().read()?;
        Ok(reg.chip_id())
    }

    /// Check that the device answers with the expected chip id
    ///
    /// Reads `CHIPID` up to three times (see [`with_identity_retry`](Self::with_identity_retry)),
    /// succeeding on the first match. A freshly powered co-processor may return
    /// garbage for a few reads, so a mismatch is retried like a bus error.
    ///
    /// # Errors
    ///
    /// Returns the outcome of the last read: [`Error::IdentityMismatch`] if it
    /// returned another value, [`Error::Transfer`] if the read itself failed.
    pub fn verify_identity<D>(&mut self, delay: &mut D) -> Result<(), Error<E>>
    where
        D: DelayNs,
    {
        let policy = self.identity_retry;
        retry(policy, delay, |attempt| {
            let chip_id = self.read_chip_id()?;
            info!("N76E003 chipid: {:#x}", chip_id);

            if chip_id == CHIP_ID_VALUE {
                Ok(())
            } else {
                warn!("N76E003 i2c test failed time {}", attempt);
                Err(Error::IdentityMismatch(chip_id))
            }
        })
    }

    /// Send one heartbeat pulse
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn heartbeat(&mut self) -> Result<(), Error<E>> {
        self.device.heartbeat().write(|w| {
            w.set_pulse(registers::HEARTBEAT_PULSE);
        })?;
        Ok(())
    }

    /// Report the host uptime in seconds
    ///
    /// Sent as a 4-byte big-endian value.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_uptime(&mut self, seconds: u32) -> Result<(), Error<E>> {
        self.device
            .interface
            .write_register(registers::SET_UPTIME, 32, &seconds.to_be_bytes())
    }

    /// Arm or disarm the watchdog
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_watchdog_enabled(&mut self, enabled: bool) -> Result<(), Error<E>> {
        let state = if enabled {
            registers::WATCHDOG_ON
        } else {
            registers::WATCHDOG_OFF
        };
        self.device.switch_watchdog().write(|w| {
            w.set_state(state);
        })?;
        Ok(())
    }

    /// Set the watchdog timeout in seconds
    ///
    /// Sent as a 2-byte big-endian value.
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn set_watchdog_duration(&mut self, seconds: u16) -> Result<(), Error<E>> {
        self.device.interface.write_register(
            registers::SET_WATCHDOG_DURATION,
            16,
            &seconds.to_be_bytes(),
        )
    }

    /// Run a control command
    ///
    /// # Errors
    ///
    /// Returns an error if communication with the device fails.
    pub fn execute(&mut self, command: Command) -> Result<(), Error<E>> {
        debug!("executing command nr {}", command.number());
        match command {
            Command::Heartbeat => self.heartbeat(),
            Command::SetUptime(seconds) => self.set_uptime(seconds),
            Command::SwitchWatchdog(enabled) => self.set_watchdog_enabled(enabled),
            Command::SetWatchdogDuration(seconds) => self.set_watchdog_duration(seconds),
        }
    }

    /// Decode and run a raw control request
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] without touching the bus if the
    /// request does not decode, otherwise the result of [`execute`](Self::execute).
    pub fn dispatch(&mut self, request: &RawRequest<'_>) -> Result<(), Error<E>> {
        let command = Command::decode(request)?;
        self.execute(command)
    }
}
