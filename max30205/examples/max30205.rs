use std::env;
use std::path::Path;
use std::thread::sleep;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use linux_embedded_hal::{Delay, I2cdev};
use log::info;

use max30205::{
    AddressPins, ContinuousReader, I2cInterface, InterruptMode, InterruptReader, Reading,
    Settings, ShotReader,
};

const USAGE: &str =
    "Usage: max30205 <info|read|shot|int> [I2C bus] [address index, 00-1F] [times] [CMP|INT low high]";

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).ok_or_else(|| anyhow!(USAGE))?;
    if command == "info" {
        print_info();
        return Ok(());
    }

    let bus_path = args.get(2).map(String::as_str).unwrap_or("/dev/i2c-1");
    let index = match args.get(3) {
        Some(index) => {
            let hex_digits = index.trim_start_matches("0x");
            u8::from_str_radix(hex_digits, 16).context("The address index is a hex number")?
        }
        None => 0,
    };
    let pins = AddressPins::from_index(index)?;
    let times: u32 = match args.get(4) {
        Some(times) => times.parse().context("times must be a number")?,
        None => 3,
    };
    let bus = I2cdev::new(Path::new(bus_path))
        .with_context(|| format!("Unable to open {}", bus_path))?;
    let interface = I2cInterface::new(bus);
    info!("using address {:#04x} on {}", pins.address(), bus_path);

    match command.as_str() {
        "read" => {
            let mut reader = ContinuousReader::new(interface, Delay, pins, &Settings::default())?;
            for count in 1..=times {
                print_reading(count, times, reader.read()?);
                sleep(Duration::from_secs(1));
            }
            reader.deinit()?;
        }
        "shot" => {
            let mut reader = ShotReader::new(interface, Delay, pins, &Settings::default())?;
            for count in 1..=times {
                print_reading(count, times, reader.read()?);
                sleep(Duration::from_secs(1));
            }
            reader.deinit()?;
        }
        "int" => {
            let mode = match args.get(5).map(String::as_str) {
                Some("CMP") | None => InterruptMode::Comparator,
                Some("INT") => InterruptMode::Interrupt,
                Some(other) => bail!("Unknown interrupt mode {}, expected CMP or INT", other),
            };
            let low = parse_threshold(args.get(6), 35.0)?;
            let high = parse_threshold(args.get(7), 39.0)?;
            let mut reader = InterruptReader::new(interface, Delay, pins, mode, low, high)?;
            println!(
                "{:?} mode, low threshold {:.2}℃, high threshold {:.2}℃",
                mode, low, high
            );
            for count in 1..=times {
                print_reading(count, times, reader.read()?);
                sleep(Duration::from_secs(1));
            }
            reader.deinit()?;
        }
        _ => bail!(USAGE),
    }
    Ok(())
}

fn parse_threshold(arg: Option<&String>, default: f32) -> anyhow::Result<f32> {
    match arg {
        Some(value) => value
            .parse()
            .with_context(|| format!("{} is not a temperature", value)),
        None => Ok(default),
    }
}

fn print_reading(count: u32, times: u32, reading: Reading) {
    println!("{}/{}: {:.3}℃ ({:#06x})", count, times, reading.celsius, reading.raw);
}

fn print_info() {
    let info = max30205::info();
    println!("chip name: {}", info.chip_name);
    println!("manufacturer: {}", info.manufacturer_name);
    println!("interface: {}", info.interface);
    println!(
        "supply voltage: {:.1}V to {:.1}V",
        info.supply_voltage_min_v, info.supply_voltage_max_v
    );
    println!("max current: {:.1}mA", info.max_current_ma);
    println!(
        "temperature: {:.1}℃ to {:.1}℃",
        info.temperature_min, info.temperature_max
    );
    println!(
        "driver version: {}.{}",
        info.driver_version_major(),
        info.driver_version_minor()
    );
}
