//! Programs the network identity of a board into an AT24C I2C EEPROM.
//!
//! [`at24c`] holds the byte access driver, [`identity`] lays the MAC and IPv4
//! addresses out in the EEPROM and [`scan`] is a bus probe for diagnostics.

pub mod at24c;
pub mod identity;
pub mod scan;

pub use at24c::{AddressMode, At24cIO, AtError, Config, I2cAt, WriteCycle};
pub use identity::{read_ip, read_mac, write_ip, write_mac, MacAddress};
