//! Output device selection.
//! `default` uses the system default, anything else is fuzzy matched
//! against the available device names.

use anyhow::{Context, Result};
use clap::ArgMatches;
use cpal::{
    traits::{DeviceTrait, HostTrait},
    Device, SupportedStreamConfig,
};

use crate::misc::Similarity;

pub struct Output {
    pub device: Device,
    pub config: SupportedStreamConfig,
    pub gain: f32,
}

pub fn get_output(args: &ArgMatches) -> Result<Output> {
    let host = cpal::default_host();
    let wanted = args
        .get_one::<String>("output-device")
        .map(|x| x.to_lowercase())
        .unwrap_or_else(|| "default".into());

    let device = match wanted.as_str() {
        "default" => host
            .default_output_device()
            .context("No default output device")?,
        _ => host
            .output_devices()?
            .map(|x| {
                let name = x.name().unwrap_or_default().to_lowercase();
                (name.similarity(&wanted), x)
            })
            .reduce(|a, b| if a.0 > b.0 { a } else { b })
            .context("No output device found")?
            .1,
    };

    Ok(Output {
        config: device
            .default_output_config()
            .context("No default output config")?,
        device,
        gain: *args.get_one::<f32>("output-gain").unwrap_or(&0.5),
    })
}
