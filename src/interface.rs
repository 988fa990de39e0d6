//! Chunked I2C transfer engine for the N76E003
//!
//! A logical register read or write of any length is split into transactions
//! that fit the bus ceiling. Each chunk is retried on its own; the register
//! cursor only advances once a chunk has gone through. If a chunk runs out of
//! attempts the whole transfer is abandoned. Chunks already written stay on the
//! device, and chunks already read stay in the caller's buffer.
//!
//! The interface implements `device-driver`'s [`RegisterInterface`], so the
//! register block in [`crate::registers`] runs on top of it.

use device_driver::RegisterInterface;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::config::Config;
use crate::retry::retry;
use crate::scratch::Scratch;
use crate::{ADDRESS_LENGTH, Error, REGISTER_SPACE};

/// I2C interface for the N76E003
///
/// Owns the bus and the delay used for retry backoff. A single interface must
/// not be shared between concurrent transfers; wrap it in a lock if several
/// contexts need it.
pub struct I2cInterface<I2C, D> {
    i2c: I2C,
    delay: D,
    config: Config,
}

impl<I2C, D> I2cInterface<I2C, D> {
    /// Create a new I2C interface with the default configuration (address 0x61)
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral
    /// * `delay` - Delay provider used between retry attempts
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::default(i2c, delay);
    /// let mut mcu = N76e003Driver::new(interface, &mut delay)?;
    /// ```
    pub const fn default(i2c: I2C, delay: D) -> Self {
        Self::new(i2c, delay, Config::new())
    }

    /// Create a new I2C interface with a custom configuration
    pub const fn new(i2c: I2C, delay: D, config: Config) -> Self {
        Self { i2c, delay, config }
    }

    /// Active configuration
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the interface and return the I2C peripheral and delay
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

impl<I2C, D> I2cInterface<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Write `data` to consecutive registers starting at `register`
    ///
    /// Every transaction carries the current register address followed by at
    /// most `max_transfer - 1` payload bytes. An empty `data` touches nothing.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRequest`] if the range runs past register 0xFF
    /// - [`Error::InvalidConfig`] if the bus ceiling leaves no room for payload
    /// - [`Error::ResourceExhausted`] if no scratch buffer could be acquired
    /// - [`Error::Transfer`] if a chunk failed on every attempt
    pub fn write_registers(&mut self, register: u8, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        check_range(register, data.len())?;
        let chunk_len = self.config.write_chunk_len().ok_or(Error::InvalidConfig)?;
        if data.is_empty() {
            return Ok(());
        }

        let mut scratch =
            Scratch::acquire((ADDRESS_LENGTH + data.len()).min(self.config.max_transfer))?;
        let address = self.config.address;
        let policy = self.config.retry;
        let mut cursor = register;

        for chunk in data.chunks(chunk_len) {
            let frame_len = ADDRESS_LENGTH + chunk.len();
            scratch[0] = cursor;
            scratch[ADDRESS_LENGTH..frame_len].copy_from_slice(chunk);
            let frame = &scratch[..frame_len];

            let i2c = &mut self.i2c;
            retry(policy, &mut self.delay, |attempt| {
                i2c.write(address, frame).inspect_err(|_| {
                    debug!("i2c write retry[{}] reg {:#x}", attempt, cursor);
                })
            })
            .map_err(|source| {
                error!(
                    "i2c write failed, dev {:#x} reg {:#x} size {}",
                    address,
                    cursor,
                    data.len()
                );
                Error::Transfer {
                    address,
                    register: cursor,
                    len: data.len(),
                    source,
                }
            })?;

            trace!("wrote {} bytes at reg {:#x}", chunk.len(), cursor);
            cursor = cursor.wrapping_add(chunk.len() as u8);
        }

        Ok(())
    }

    /// Read consecutive registers starting at `register` into `buf`
    ///
    /// Each chunk is a write of the register address followed by a repeated
    /// start read, retried as one unit. On failure the chunks read so far are
    /// already in `buf`; the range of the failing chunk is left untouched.
    ///
    /// # Errors
    ///
    /// Same as [`write_registers`](Self::write_registers).
    pub fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        check_range(register, buf.len())?;
        let chunk_len = self.config.read_chunk_len().ok_or(Error::InvalidConfig)?;
        if buf.is_empty() {
            return Ok(());
        }

        let len = buf.len();
        let mut scratch = Scratch::acquire(len.min(chunk_len))?;
        let address = self.config.address;
        let policy = self.config.retry;
        let mut cursor = register;

        for chunk in buf.chunks_mut(chunk_len) {
            let staging = &mut scratch[..chunk.len()];

            let i2c = &mut self.i2c;
            retry(policy, &mut self.delay, |attempt| {
                i2c.write_read(address, &[cursor], &mut *staging)
                    .inspect_err(|_| {
                        debug!("i2c read retry[{}] reg {:#x}", attempt, cursor);
                    })
            })
            .map_err(|source| {
                error!(
                    "i2c read failed, dev {:#x} reg {:#x} size {}",
                    address, cursor, len
                );
                Error::Transfer {
                    address,
                    register: cursor,
                    len,
                    source,
                }
            })?;

            chunk.copy_from_slice(staging);
            trace!("read {} bytes at reg {:#x}", chunk.len(), cursor);
            cursor = cursor.wrapping_add(chunk.len() as u8);
        }

        Ok(())
    }
}

/// Reject ranges that would wrap the 8-bit register cursor
fn check_range<E>(register: u8, len: usize) -> Result<(), Error<E>> {
    if usize::from(register) + len > REGISTER_SPACE {
        warn!("register range {:#x}+{} exceeds register space", register, len);
        return Err(Error::InvalidRequest);
    }
    Ok(())
}

impl<I2C, D> RegisterInterface for I2cInterface<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = Error<I2C::Error>;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len()
        self.read_registers(address, read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len()
        self.write_registers(address, write_data)
    }
}
