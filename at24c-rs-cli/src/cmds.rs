use std::net::Ipv4Addr;

use at24c_rs::{identity, At24cIO, AtError, MacAddress};
use log::warn;

pub const TEST_PATTERN_ADDR: u16 = 0x00;
pub const TEST_PATTERN: [u8; 4] = [10, 11, 12, 13];

/// Writes the known pattern and returns what reads back.
pub fn test_pattern<T: At24cIO>(eeprom: &mut T) -> Result<Vec<u8>, AtError<T::Error>> {
    eeprom.write_bytes(TEST_PATTERN_ADDR, &TEST_PATTERN)?;
    let read = eeprom.read_bytes(TEST_PATTERN_ADDR, TEST_PATTERN.len())?;
    if read != TEST_PATTERN {
        warn!("test pattern read back as {:?}", read);
    }
    Ok(read)
}

pub fn program_mac<T: At24cIO>(
    eeprom: &mut T,
    suffix: u8,
) -> Result<MacAddress, AtError<T::Error>> {
    let written = identity::write_mac(eeprom, suffix)?;
    let read = identity::read_mac(eeprom)?;
    if read != written {
        warn!("MAC read back as {}, expected {}", read, written);
    }
    Ok(read)
}

pub fn program_ip<T: At24cIO>(eeprom: &mut T, suffix: u8) -> Result<Ipv4Addr, AtError<T::Error>> {
    let written = identity::write_ip(eeprom, suffix)?;
    let read = identity::read_ip(eeprom)?;
    if read != written {
        warn!("IP read back as {}, expected {}", read, written);
    }
    Ok(read)
}
