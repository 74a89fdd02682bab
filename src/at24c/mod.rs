mod i2c_at;
pub use i2c_at::I2cAt;

#[cfg(test)]
pub(crate) mod sim;

use core::str::FromStr;

use thiserror::Error;

/// Default 7-bit bus address of an AT24C with A0..A2 tied low.
pub const DEFAULT_ADDRESS: u8 = 0x50;

#[derive(Debug, Error, Copy, Clone, PartialEq)]
pub enum AtError<E> {
    #[error("I2C bus failure: {0:?}")]
    Bus(E),
    #[error("Memory address {0:#x} can not be sent in the selected address mode")]
    InvalidAddress(usize),
    #[error("EEPROM did not finish its write cycle in time")]
    WriteTimeout,
}

/// How the memory address is put on the wire ahead of the data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum AddressMode {
    /// A single address byte, for the 1 to 16 Kbit parts.
    #[default]
    OneByte,
    /// Big endian 16-bit address, for AT24C32 and larger.
    TwoByte,
    /// The single address byte sent twice. Some boards were programmed this
    /// way and the data only reads back at the same place when it is kept.
    Duplicated,
}

impl AddressMode {
    pub const VARIANTS: [&'static str; 3] = ["one-byte", "two-byte", "duplicated"];

    /// Encodes `addr` into `buf`, returning how many bytes were used.
    pub fn encode<E>(self, addr: u16, buf: &mut [u8; 2]) -> Result<usize, AtError<E>> {
        match self {
            AddressMode::TwoByte => {
                *buf = addr.to_be_bytes();
                Ok(2)
            }
            AddressMode::OneByte | AddressMode::Duplicated => {
                let byte = u8::try_from(addr)
                    .map_err(|_| AtError::InvalidAddress(addr.into()))?;
                buf[0] = byte;
                buf[1] = byte;
                Ok(if self == AddressMode::OneByte { 1 } else { 2 })
            }
        }
    }
}

impl FromStr for AddressMode {
    type Err = String;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode.to_ascii_lowercase().as_str() {
            "one-byte" => Ok(AddressMode::OneByte),
            "two-byte" => Ok(AddressMode::TwoByte),
            "duplicated" => Ok(AddressMode::Duplicated),
            other => Err(format!("unknown address mode `{}`", other)),
        }
    }
}

/// Wait applied after every byte write while the EEPROM commits it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WriteCycle {
    /// Address the device once per millisecond until it acknowledges again.
    Poll { attempts: u8 },
    /// Sleep for a fixed time, the datasheet tWR is 5ms.
    Delay { ms: u32 },
}

impl WriteCycle {
    pub const POLL_INTERVAL_MS: u32 = 1;
}

impl Default for WriteCycle {
    fn default() -> Self {
        WriteCycle::Poll { attempts: 10 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub address: u8,
    pub address_mode: AddressMode,
    pub write_cycle: WriteCycle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            address_mode: AddressMode::default(),
            write_cycle: WriteCycle::default(),
        }
    }
}

/// Address of the `idx`-th byte of a range starting at `start`.
fn offset<E>(start: u16, idx: usize) -> Result<u16, AtError<E>> {
    u16::try_from(idx)
        .ok()
        .and_then(|idx| start.checked_add(idx))
        .ok_or(AtError::InvalidAddress(usize::from(start) + idx))
}

pub trait At24cIO {
    type Error;

    fn read_byte(&mut self, addr: u16) -> Result<u8, AtError<Self::Error>>;
    fn write_byte(&mut self, addr: u16, byte: u8) -> Result<(), AtError<Self::Error>>;

    /// Fills `buf` one byte transaction at a time, starting at `start_addr`.
    fn read_into(&mut self, start_addr: u16, buf: &mut [u8]) -> Result<(), AtError<Self::Error>> {
        for (idx, slot) in buf.iter_mut().enumerate() {
            *slot = self.read_byte(offset(start_addr, idx)?)?;
        }
        Ok(())
    }

    fn read_bytes(
        &mut self,
        start_addr: u16,
        count: usize,
    ) -> Result<Vec<u8>, AtError<Self::Error>> {
        let mut values = vec![0; count];
        self.read_into(start_addr, &mut values)?;
        Ok(values)
    }

    /// Writes `bytes` to successive addresses. A failure leaves the bytes
    /// before it written.
    fn write_bytes(&mut self, start_addr: u16, bytes: &[u8]) -> Result<(), AtError<Self::Error>> {
        for (idx, byte) in bytes.iter().enumerate() {
            self.write_byte(offset(start_addr, idx)?, *byte)?;
        }
        Ok(())
    }
}
