use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::{App, Arg, ArgMatches};
use zipentry::FileHeader;

fn parse_hex(matches: &ArgMatches, name: &str) -> Result<u32> {
    match matches.value_of(name) {
        Some(s) => {
            let digits = s.trim_start_matches("0x").trim_start_matches("0X");
            u32::from_str_radix(digits, 16)
                .with_context(|| format!("--{} expects a hex number, got '{}'", name, s))
        }
        None => Ok(0),
    }
}

fn parse_hex16(matches: &ArgMatches, name: &str) -> Result<u16> {
    let v = parse_hex(matches, name)?;
    u16::try_from(v).with_context(|| format!("--{} does not fit in 16 bits: {:#x}", name, v))
}

fn hex_arg(name: &'static str, help: &'static str) -> Arg<'static> {
    Arg::new(name)
        .long(name)
        .value_name("HEX")
        .help(help)
        .takes_value(true)
}

fn main() -> Result<()> {
    let matches = App::new("Zipentry-Decode")
        .version("0.1.0")
        .author("chordtoll <git@chordtoll.com>")
        .about("Decodes the raw attribute and timestamp fields of a zip entry")
        .arg(hex_arg("creator-version", "Version made by"))
        .arg(hex_arg("attrs", "External file attributes"))
        .arg(hex_arg("date", "MS-DOS modification date"))
        .arg(hex_arg("time", "MS-DOS modification time"))
        .arg(
            Arg::new("name")
                .long("name")
                .value_name("NAME")
                .help("Entry name")
                .takes_value(true),
        )
        .get_matches();

    let mut fh = FileHeader::new(matches.value_of("name").unwrap_or_default());
    fh.creator_version = parse_hex16(&matches, "creator-version")?;
    fh.external_attrs = parse_hex(&matches, "attrs")?;
    fh.modified_date = parse_hex16(&matches, "date")?;
    fh.modified_time = parse_hex16(&matches, "time")?;

    let mut out = io::stdout();
    writeln!(out, "platform: {:?}", fh.platform())?;
    writeln!(out, "mode: {}", fh.mode())?;
    writeln!(out, "modified: {}", fh.mod_time().to_rfc3339())?;
    out.write_all(serde_yaml::to_string(&fh.file_info())?.as_bytes())?;
    Ok(())
}
