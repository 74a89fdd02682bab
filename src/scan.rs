use embedded_hal::i2c::{Error as _, ErrorKind, I2c};
use log::debug;

/// First and last 7-bit addresses that are not reserved.
pub const FIRST_ADDRESS: u8 = 0x08;
pub const LAST_ADDRESS: u8 = 0x77;

/// Returns every address on the bus that acknowledges a one byte read.
///
/// Reads are used instead of empty writes so an EEPROM never sees a
/// truncated write that could move its address pointer into a write cycle.
pub fn scan<I: I2c>(i2c: &mut I) -> Result<Vec<u8>, I::Error> {
    let mut found = Vec::new();
    let mut probe = [0u8; 1];
    for address in FIRST_ADDRESS..=LAST_ADDRESS {
        match i2c.read(address, &mut probe) {
            Ok(()) => {
                debug!("device at {:#04x}", address);
                found.push(address);
            }
            // some Linux adapters surface a NACK as EREMOTEIO, kind Other
            Err(e) if matches!(e.kind(), ErrorKind::NoAcknowledge(_) | ErrorKind::Other) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(found)
}
