use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, StreamTrait};

mod args;
mod audio;
mod misc;
mod modules;
mod quiz;
mod render;
mod theory;

fn main() -> Result<()> {
    let matches = args::parse();
    let out = audio::devices::get_output(&matches)?;

    println!(
        "[*] Output hooked into `{}` ({})",
        out.device.name().unwrap_or_else(|_| "?".into()),
        out.config.sample_rate().0
    );

    let module = args::build_module(&matches, out.config.clone(), out.gain)?;
    println!("[*] Running module `{}`", module.name());

    let stream = {
        let module = module.clone();
        out.device
            .build_output_stream(
                &out.config.into(),
                move |data: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                    module.output(data);
                },
                move |err| eprintln!("[-] Error: {err}"),
                None,
            )
            .context("Building the output stream failed")?
    };

    stream.play().context("Starting the output stream failed")?;
    module.run()
}
