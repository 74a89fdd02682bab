use embedded_hal::{
    delay::DelayNs,
    i2c::{Error as _, I2c, Operation},
};
use log::{debug, trace, warn};

use super::{At24cIO, AtError, Config, WriteCycle};

/// AT24C attached to an `embedded-hal` I2C bus.
///
/// Every byte is its own bus transaction:
/// * read: write phase with the memory address, repeated start, one byte read
/// * write: one write phase with the memory address followed by the data byte,
///   then the configured [`WriteCycle`] wait
pub struct I2cAt<I2C, D> {
    i2c: I2C,
    delay: D,
    config: Config,
}

impl<I2C, D> I2cAt<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D, config: Config) -> Self {
        Self { i2c, delay, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gives the bus and the delay back.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    fn wait_write_cycle(&mut self) -> Result<(), AtError<I2C::Error>> {
        match self.config.write_cycle {
            WriteCycle::Delay { ms } => {
                self.delay.delay_ms(ms);
                Ok(())
            }
            WriteCycle::Poll { attempts } => {
                // The device NACKs its own address until the internal write is
                // done. Linux adapters report that NACK as ENXIO or EREMOTEIO
                // depending on the driver, so any failed poll counts as busy.
                let mut probe = [0u8; 1];
                for attempt in 0..attempts {
                    match self.i2c.read(self.config.address, &mut probe) {
                        Ok(()) => {
                            trace!("write cycle done after {} polls", attempt + 1);
                            return Ok(());
                        }
                        Err(e) => {
                            trace!("poll {} failed: {:?}", attempt + 1, e.kind());
                            self.delay.delay_ms(WriteCycle::POLL_INTERVAL_MS);
                        }
                    }
                }
                warn!(
                    "EEPROM at {:#04x} still busy after {} polls",
                    self.config.address, attempts
                );
                Err(AtError::WriteTimeout)
            }
        }
    }
}

impl<I2C, D> At24cIO for I2cAt<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    type Error = I2C::Error;

    fn read_byte(&mut self, addr: u16) -> Result<u8, AtError<Self::Error>> {
        let mut addr_buf = [0u8; 2];
        let len = self.config.address_mode.encode(addr, &mut addr_buf)?;
        let mut data = [0u8; 1];
        self.i2c
            .transaction(
                self.config.address,
                &mut [
                    Operation::Write(&addr_buf[..len]),
                    Operation::Read(&mut data),
                ],
            )
            .map_err(AtError::Bus)?;
        debug!("read  {:#06x} -> {:#04x}", addr, data[0]);
        Ok(data[0])
    }

    fn write_byte(&mut self, addr: u16, byte: u8) -> Result<(), AtError<Self::Error>> {
        let mut addr_buf = [0u8; 2];
        let len = self.config.address_mode.encode(addr, &mut addr_buf)?;
        let mut payload = [0u8; 3];
        payload[..len].copy_from_slice(&addr_buf[..len]);
        payload[len] = byte;
        self.i2c
            .write(self.config.address, &payload[..=len])
            .map_err(AtError::Bus)?;
        debug!("write {:#06x} <- {:#04x}", addr, byte);
        self.wait_write_cycle()
    }
}
