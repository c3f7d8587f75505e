//! SEL record decoding example
//!
//! Usage:
//!   # Decode a single legacy or structured record given as hex
//!   cargo run --example decode -- record 0300640000000000000002023001 49c800
//!
//!   # Read record 3 from a legacy fixed-size SEL file
//!   cargo run --example decode -- legacy /var/lib/sel/logs 3
//!
//!   # Print every record of a flat file
//!   cargo run --example decode -- flat events.txt
//!
//!   # Print the sample sensor catalog
//!   cargo run --example decode -- sensors

mod common;

use std::{error::Error, fs::File, io::BufReader, path::PathBuf};

use clap::{Parser, Subcommand};
use ipmi_sel::{flat_file::FlatFileReader, EventLog, LegacySelFile, MemoryStore};
use ipmi_sel_core::{
    sel::{self, assemble_message, EventRecord, OverlengthPolicy, Record, RecordId, SummaryLine},
    DefaultPlatform, Platform,
};
use ipmi_sel_log::{DescribedEvent, LogOutput, Logger};

#[derive(Parser)]
struct Cli {
    #[clap(flatten)]
    common: common::CommonOpts,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a single record of either generation
    Record {
        /// The record bytes, in hexadecimal. Whitespace is ignored.
        #[clap(required = true)]
        hex: Vec<String>,
    },
    /// Read a record from a legacy fixed-size SEL file
    Legacy { file: PathBuf, id: u16 },
    /// Load and print a flat file
    Flat { file: PathBuf },
    /// Print the sample sensor catalog
    Sensors,
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::formatted_builder()
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or("info".to_string()))
        .init();

    let cli = Cli::parse();

    match cli.common.platform() {
        Some(platform) => run(&cli, platform),
        None => run(&cli, DefaultPlatform),
    }
}

fn run<P: Platform>(cli: &Cli, platform: P) -> Result<(), Box<dyn Error>> {
    let log_output = &LogOutput::LogTarget(log::Level::Info, "decode".into());
    let policy = if cli.common.truncate {
        OverlengthPolicy::Truncate
    } else {
        OverlengthPolicy::Reject
    };

    let catalog = common::demo_catalog()?;

    match &cli.command {
        Command::Record { hex } => {
            let data = hex::decode(hex.concat())?;

            match sel::decode(&data)? {
                Record::Legacy(record) => {
                    let event_log = EventLog::new(MemoryStore::default())
                        .with_platform(platform)
                        .with_catalog(catalog)
                        .overlength(policy);

                    let entry = event_log.render(&record)?;
                    log::info!("{}: {}", entry.name, entry.message);

                    describe(log_output, event_log.platform(), &record);
                }
                record @ Record::Structured(_) => Logger::log(log_output, &record),
            }
        }
        Command::Legacy { file, id } => {
            let id = RecordId::new(*id).ok_or("record id 0 is never assigned")?;
            let mut sel_file = LegacySelFile::new(File::open(file)?);

            match sel_file.get(id)? {
                Some(record) => {
                    let message = assemble_message(&platform, &record, policy)?;
                    log::info!("{message}");

                    describe(log_output, &platform, &record);
                }
                None => log::warn!("Record 0x{:04X} not found", id.value()),
            }
        }
        Command::Flat { file } => {
            let reader = FlatFileReader::new(BufReader::new(File::open(file)?));

            let mut count = 0;
            for record in reader {
                Logger::log(log_output, &record?);
                count += 1;
            }

            log::info!("Loaded {count} records");
        }
        Command::Sensors => Logger::log(log_output, &*catalog),
    }

    Ok(())
}

fn describe<P: Platform>(log_output: &LogOutput, platform: &P, record: &EventRecord) {
    match SummaryLine::new(record, platform).render() {
        Ok(summary) => log::info!("{summary}"),
        Err(e) => log::warn!("{e}"),
    }

    Logger::log(log_output, &DescribedEvent::new(record, platform));
    Logger::log(log_output, record);
}
