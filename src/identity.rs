//! Network identity stored in the EEPROM.
//!
//! Both addresses are a fixed prefix followed by one board specific suffix
//! byte:
//!
//! | offset | length | content                       |
//! |--------|--------|-------------------------------|
//! | 0x00   | 4      | IPv4 `192.168.200.<suffix>`   |
//! | 0x10   | 6      | MAC `08:00:30:A8:C8:<suffix>` |

use core::fmt;
use std::net::Ipv4Addr;

use log::info;

use crate::at24c::{At24cIO, AtError};

pub const IP_REGION: u16 = 0x00;
pub const MAC_REGION: u16 = 0x10;

/// 192.168.200.x
pub const IP_PREFIX: [u8; 3] = [0xC0, 0xA8, 0xC8];
/// CERN OUI 08:00:30, then A8:C8.
pub const MAC_PREFIX: [u8; 5] = [0x08, 0x00, 0x30, 0xA8, 0xC8];

/// EUI-48 MAC address.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Default)]
pub struct MacAddress {
    pub octets: [u8; 6],
}

impl MacAddress {
    pub const fn from_bytes(octets: [u8; 6]) -> MacAddress {
        MacAddress { octets }
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(
            fmt,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            self.octets[0],
            self.octets[1],
            self.octets[2],
            self.octets[3],
            self.octets[4],
            self.octets[5],
        )
    }
}

pub fn mac_from_suffix(suffix: u8) -> MacAddress {
    let mut octets = [0u8; 6];
    octets[..MAC_PREFIX.len()].copy_from_slice(&MAC_PREFIX);
    octets[MAC_PREFIX.len()] = suffix;
    MacAddress::from_bytes(octets)
}

pub fn ip_from_suffix(suffix: u8) -> Ipv4Addr {
    let [a, b, c] = IP_PREFIX;
    Ipv4Addr::new(a, b, c, suffix)
}

pub fn write_mac<T: At24cIO>(eeprom: &mut T, suffix: u8) -> Result<MacAddress, AtError<T::Error>> {
    let mac = mac_from_suffix(suffix);
    info!("writing MAC {} at {:#04x}", mac, MAC_REGION);
    eeprom.write_bytes(MAC_REGION, &mac.octets)?;
    Ok(mac)
}

pub fn read_mac<T: At24cIO>(eeprom: &mut T) -> Result<MacAddress, AtError<T::Error>> {
    let mut octets = [0u8; 6];
    eeprom.read_into(MAC_REGION, &mut octets)?;
    Ok(MacAddress::from_bytes(octets))
}

pub fn write_ip<T: At24cIO>(eeprom: &mut T, suffix: u8) -> Result<Ipv4Addr, AtError<T::Error>> {
    let ip = ip_from_suffix(suffix);
    info!("writing IP {} at {:#04x}", ip, IP_REGION);
    eeprom.write_bytes(IP_REGION, &ip.octets())?;
    Ok(ip)
}

pub fn read_ip<T: At24cIO>(eeprom: &mut T) -> Result<Ipv4Addr, AtError<T::Error>> {
    let mut octets = [0u8; 4];
    eeprom.read_into(IP_REGION, &mut octets)?;
    Ok(Ipv4Addr::from(octets))
}
