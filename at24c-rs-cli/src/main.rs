use at24c_rs::{scan::scan, AddressMode, AtError, Config, I2cAt, WriteCycle};
use colored::*;
use linux_embedded_hal::{i2cdev::linux::LinuxI2CError, Delay, I2CError, I2cdev};
use log::{info, warn};
use std::{fmt::Display, path::PathBuf, process};
use structopt::StructOpt;
use thiserror::Error;

mod cmds;

#[derive(Debug, Error)]
enum CliError {
    #[error("Can not open `{path}`: `{source}`")]
    Open {
        path: PathBuf,
        #[source]
        source: LinuxI2CError,
    },
    #[error("EEPROM failure: `{0}`")]
    Eeprom(#[from] AtError<I2CError>),
    #[error("Bus scan failure: `{0:?}`")]
    Scan(I2CError),
}

#[derive(StructOpt, Debug)]
#[structopt(
    about = "Programs the MAC and IPv4 suffix of a board into its AT24C EEPROM"
)]
struct Opt {
    /// Last byte of the MAC and IPv4 addresses, 0 to 255
    suffix: u8,

    /// I2C bus device
    #[structopt(short, long, default_value = "/dev/i2c-1", parse(from_os_str))]
    bus: PathBuf,

    /// 7-bit EEPROM address, decimal or 0x prefixed hex
    #[structopt(
        short,
        long,
        default_value = "0x50",
        parse(try_from_str = parse_address)
    )]
    address: u8,

    /// How memory addresses are sent to the EEPROM
    ///
    /// `one-byte` suits the 1 to 16 Kbit parts. AT24C32 and larger, like the
    /// AT24C128, take `two-byte`. EEPROMs written by the older tool, which
    /// sent the address byte twice, only read back with `duplicated`.
    #[structopt(
        short = "m",
        long,
        default_value = "one-byte",
        possible_values = &AddressMode::VARIANTS,
        case_insensitive = true
    )]
    address_mode: AddressMode,

    /// Fixed write cycle time in ms, acknowledge polling is used when absent
    #[structopt(short, long)]
    write_delay_ms: Option<u32>,

    /// List the devices answering on the bus before programming
    #[structopt(short, long)]
    scan: bool,

    /// Log verbosity, repeat for more
    #[structopt(short, long, parse(from_occurrences))]
    debug: u8,
}

impl Opt {
    fn config(&self) -> Config {
        let write_cycle = match self.write_delay_ms {
            Some(ms) => WriteCycle::Delay { ms },
            None => WriteCycle::default(),
        };
        Config {
            address: self.address,
            address_mode: self.address_mode,
            write_cycle,
        }
    }
}

fn parse_address(src: &str) -> Result<u8, String> {
    let address = match src.strip_prefix("0x").or_else(|| src.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => src.parse(),
    }
    .map_err(|e| format!("`{}`: {}", src, e))?;
    if address > 0x7F {
        return Err(format!("`{}` is not a 7-bit address", src));
    }
    Ok(address)
}

fn main() {
    match try_main() {
        Ok(_) => (),
        Err(e) => {
            eprintln!("{} : {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

fn try_main() -> Result<(), CliError> {
    let opt = Opt::from_args();

    let log_level = match opt.debug {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level.to_string()),
    )
    .init();

    let mut i2c = I2cdev::new(&opt.bus).map_err(|source| CliError::Open {
        path: opt.bus.clone(),
        source,
    })?;
    info!("opened {}", opt.bus.display());

    if opt.scan {
        let found = scan(&mut i2c).map_err(CliError::Scan)?;
        let listed: Vec<String> = found.iter().map(|a| format!("{:#04x}", a)).collect();
        show("Devices", &found, listed.join(" "));
        if !found.contains(&opt.address) {
            warn!("nothing answers at {:#04x}", opt.address);
        }
    }

    let mut eeprom = I2cAt::new(i2c, Delay, opt.config());

    let pattern = cmds::test_pattern(&mut eeprom)?;
    show(
        "Test pattern",
        &pattern,
        format!("at {:#04x}", cmds::TEST_PATTERN_ADDR),
    );

    println!("Setting IP/MAC suffix = {}", opt.suffix);

    let mac = cmds::program_mac(&mut eeprom, opt.suffix)?;
    show("MAC", &mac.octets, mac);

    let ip = cmds::program_ip(&mut eeprom, opt.suffix)?;
    show("IP", &ip.octets(), ip);

    Ok(())
}

fn show(label: &str, bytes: &[u8], formatted: impl Display) {
    println!(
        "{} {:?} ({})",
        format!("{}:", label).green().bold(),
        bytes,
        formatted
    );
}
