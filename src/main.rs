// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{crate_version, Args, Parser, Subcommand};
use gridgen::audio::{BitDepth, FileIo, SampleFileIo};
use gridgen::config::{collect_input_files, ConfigError, GridConfiguration};
use gridgen::grid::{export_grid, ChannelMode};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Lays audio samples out back to back in one evenly sliced file."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Builds a sample grid from the given files and directories.
    Build {
        /// The grid file to write. An .aif/.aiff/.aifc extension writes AIFF, anything else WAV.
        output: PathBuf,
        /// Sample files, or directories whose audio files are added sorted by name.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[command(flatten)]
        overrides: Overrides,
        /// Writes the effective configuration to this path.
        #[arg(long)]
        save_config: Option<PathBuf>,
    },
    /// Prints the format and length of each input file.
    Inspect {
        /// Sample files or directories.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Prints the default configuration as YAML.
    Defaults {},
}

/// Settings that replace the values from the configuration file.
#[derive(Args, Default)]
struct Overrides {
    /// The path to a YAML grid configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// The minimum number of slots in the grid.
    #[arg(short = 'g', long)]
    grid_size: Option<usize>,
    /// How input channels are mapped to the output.
    #[arg(short = 'm', long, value_enum)]
    channel_mode: Option<ChannelMode>,
    /// The output bit depth (16 or 24).
    #[arg(short, long)]
    bit_depth: Option<BitDepth>,
    /// The output sample rate in Hz.
    #[arg(short = 'r', long)]
    sample_rate: Option<u32>,
    /// The longest a sample may be, in seconds. Zero means unlimited.
    #[arg(short = 'l', long)]
    max_length: Option<f64>,
    /// The number of threads used to load samples.
    #[arg(short = 'j', long)]
    threads: Option<usize>,
}

/// Loads the configuration file, if any, and applies the command line overrides.
fn resolve_configuration(overrides: &Overrides) -> Result<GridConfiguration, ConfigError> {
    let mut configuration = match &overrides.config {
        Some(path) => GridConfiguration::load(path)?,
        None => GridConfiguration::default(),
    };

    if let Some(grid_size) = overrides.grid_size {
        configuration = configuration.with_minimum_grid_size(grid_size);
    }
    if let Some(channel_mode) = overrides.channel_mode {
        configuration = configuration.with_channel_mode(channel_mode);
    }
    if let Some(bit_depth) = overrides.bit_depth {
        configuration = configuration.with_bit_depth(bit_depth);
    }
    if let Some(sample_rate) = overrides.sample_rate {
        configuration = configuration.with_sample_rate(sample_rate);
    }
    if let Some(max_length) = overrides.max_length {
        configuration = configuration.with_max_sample_length(max_length);
    }
    if let Some(threads) = overrides.threads {
        configuration = configuration.with_threads(threads);
    }

    configuration.validate()?;
    Ok(configuration)
}

fn build(
    output: &Path,
    inputs: &[PathBuf],
    overrides: &Overrides,
    save_config: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let configuration = resolve_configuration(overrides)?;
    if let Some(path) = save_config {
        configuration.save(path)?;
    }

    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        warn!("No sample files found in the given inputs");
        println!("No sample files found, nothing to build.");
        return Ok(());
    }
    info!(files = files.len(), output = ?output, "Building sample grid");

    let summary = export_grid(&files, output, &configuration, &FileIo)?;
    println!("Wrote {}: {}", output.display(), summary);
    Ok(())
}

fn inspect(inputs: &[PathBuf]) -> Result<(), Box<dyn Error>> {
    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        println!("No sample files found.");
        return Ok(());
    }

    println!("Samples (count: {}):", files.len());
    for file in files {
        match FileIo.read(&file) {
            Ok(buffer) => println!("- {}: {}", file.display(), buffer),
            Err(e) => println!("- {}: unreadable ({})", file.display(), e),
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            output,
            inputs,
            overrides,
            save_config,
        } => build(&output, &inputs, &overrides, save_config.as_deref())?,
        Commands::Inspect { inputs } => inspect(&inputs)?,
        Commands::Defaults {} => print!("{}", serde_yml::to_string(&GridConfiguration::default())?),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from([
            "gridgen", "build", "grid.aif", "kick.wav", "snares/", "-g", "16", "-m", "mono-mix",
            "-b", "24", "-r", "48000", "-l", "0.5", "-j", "2",
        ])
        .unwrap();

        match cli.command {
            Commands::Build {
                output,
                inputs,
                overrides,
                save_config,
            } => {
                assert_eq!(output, PathBuf::from("grid.aif"));
                assert_eq!(inputs, vec![PathBuf::from("kick.wav"), PathBuf::from("snares/")]);
                assert!(save_config.is_none());

                let configuration = resolve_configuration(&overrides).unwrap();
                assert_eq!(configuration.minimum_grid_size(), 16);
                assert_eq!(configuration.channel_mode(), ChannelMode::MonoMix);
                assert_eq!(configuration.bit_depth(), BitDepth::TwentyFour);
                assert_eq!(configuration.sample_rate(), 48000);
                assert_eq!(configuration.max_sample_length(), 0.5);
                assert_eq!(configuration.threads(), 2);
            }
            _ => panic!("expected the build command"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_bit_depth() {
        assert!(Cli::try_parse_from(["gridgen", "build", "out.wav", "in.wav", "-b", "8"]).is_err());
        assert!(Cli::try_parse_from(["gridgen", "build", "out.wav"]).is_err());
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("grid.yaml");
        std::fs::write(&path, "minimum_grid_size: 8\nsample_rate: 22050\n").unwrap();

        let overrides = Overrides {
            config: Some(path),
            sample_rate: Some(96000),
            ..Default::default()
        };
        let configuration = resolve_configuration(&overrides).unwrap();
        assert_eq!(configuration.minimum_grid_size(), 8);
        assert_eq!(configuration.sample_rate(), 96000);
    }

    #[test]
    fn test_build_without_samples_is_a_noop() {
        let tempdir = tempfile::tempdir().unwrap();
        let empty = tempdir.path().join("samples");
        std::fs::create_dir(&empty).unwrap();
        std::fs::write(empty.join("notes.txt"), b"not audio").unwrap();
        let output = tempdir.path().join("grid.wav");

        build(&output, &[empty], &Overrides::default(), None).unwrap();
        assert!(!output.exists());
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let overrides = Overrides {
            sample_rate: Some(12345),
            ..Default::default()
        };
        assert!(resolve_configuration(&overrides).is_err());
    }
}
