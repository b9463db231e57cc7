use crate::cli::output;
use crate::core::config::{default_config, save_config, Config};
use clap::Args;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Write the configuration to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Start from the built-in defaults instead of the loaded configuration
    #[arg(long)]
    pub defaults: bool,
}

impl ConfigArgs {
    fn effective(&self, loaded: &Config) -> Config {
        if self.defaults {
            default_config()
        } else {
            loaded.clone()
        }
    }
}

pub fn run(args: ConfigArgs, config: &Config) -> anyhow::Result<()> {
    let config = args.effective(config);
    match &args.output {
        Some(path) => {
            save_config(path, &config)?;
            output::info(&format!("Wrote configuration to {}", path.display()));
        }
        None => {
            let mut stdout = io::stdout().lock();
            write!(stdout, "{}", toml::to_string_pretty(&config)?)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
