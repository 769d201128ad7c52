use std::sync::Arc;

use anyhow::Result;
use clap::{value_parser, Arg, ArgMatches, Command};
use cpal::SupportedStreamConfig;

use crate::modules::{
    dictation::Dictation, intervals::Intervals, sight_reading::SightReading, InitContext, Module,
};

pub fn parse() -> ArgMatches {
    Command::new("solfeo")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Console ear and sight training games.")
        .subcommand_required(true)
        .args([
            Arg::new("output-device")
                .long("output-device")
                .help("Output device name, fuzzy matched. `default` for the system default.")
                .default_value("default"),
            Arg::new("output-gain")
                .long("output-gain")
                .help("Output volume, 0.0 to 1.0.")
                .value_parser(value_parser!(f32))
                .default_value("0.5"),
        ])
        .subcommands([
            Command::new("sight-reading")
                .alias("s")
                .about("Read random measures and name the notes in solfege."),
            Command::new("intervals")
                .alias("i")
                .about("Hear two notes and name the interval between them."),
            Command::new("dictation")
                .alias("d")
                .about("Hear a melody and replay it on a virtual keyboard.")
                .arg(
                    Arg::new("length")
                        .short('l')
                        .long("length")
                        .help("Notes per melody.")
                        .value_parser(value_parser!(usize))
                        .default_value("4"),
                ),
        ])
        .get_matches()
}

pub fn build_module(
    matches: &ArgMatches,
    output: SupportedStreamConfig,
    gain: f32,
) -> Result<Arc<dyn Module + Send + Sync>> {
    let ic = |x: &ArgMatches| InitContext {
        args: x.to_owned(),
        output: output.clone(),
        gain,
    };

    Ok(match matches.subcommand() {
        Some(("sight-reading", m)) => SightReading::new(ic(m)),
        Some(("intervals", m)) => Intervals::new(ic(m)),
        Some(("dictation", m)) => Dictation::new(ic(m))?,
        _ => anyhow::bail!("Invalid subcommand"),
    })
}
