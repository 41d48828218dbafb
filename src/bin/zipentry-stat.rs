use std::{
    io::{self, Write},
    path::Path,
};

use anyhow::{Context, Result};
use clap::{App, Arg};
use lexiclean::Lexiclean;
use walkdir::WalkDir;
use zipentry::{Config, FileHeader};

fn main() -> Result<()> {
    let matches = App::new("Zipentry-Stat")
        .version("0.1.0")
        .author("chordtoll <git@chordtoll.com>")
        .about("Prints the zip headers that would describe files on disk")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("CONFIG")
                .help("YAML config controlling header construction")
                .takes_value(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log each header as it is built"),
        )
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .help("Files or directories to scan")
                .takes_value(true)
                .multiple_values(true)
                .required(true),
        )
        .get_matches();

    if matches.is_present("verbose") {
        env_logger::builder()
            .format_target(false)
            .filter_module("zipentry", log::LevelFilter::Debug)
            .init();
    }

    let config = match matches.value_of("config") {
        Some(path) => Config::load(Path::new(path))?,
        None => Config::default(),
    };

    let mut headers = Vec::new();
    for input in matches.values_of("input").into_iter().flatten() {
        let input = Path::new(input).lexiclean();
        // Names include the input's own name unless it is `.` or similar.
        let (root, min_depth) = match (input.file_name(), input.parent()) {
            (Some(_), Some(parent)) => (parent.to_path_buf(), 0),
            _ => (input.clone(), 1),
        };
        for entry in WalkDir::new(&input).min_depth(min_depth).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk '{}'", input.display()))?;
            headers.push(FileHeader::from_path(&root, entry.path(), &config)?);
        }
    }

    let out = serde_yaml::to_string(&headers)?;
    io::stdout().write_all(out.as_bytes())?;
    Ok(())
}
