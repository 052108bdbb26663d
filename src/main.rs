use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use phontrace::config::{AxisScale, PlotConfig};
use phontrace::panel::{bitmap::BitmapSurface, compose};
use phontrace::trace::Trace;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// eSpeak NG debug printout
    #[arg(value_name = "LOG")]
    log: PathBuf,

    /// Path to config TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output image, `.svg` for vector output
    #[arg(long, short, default_value = "phontrace.png")]
    output: PathBuf,

    /// Horizontal layout of the phoneme panel (overrides config)
    #[arg(long, value_enum)]
    scale: Option<AxisScale>,

    /// Comma separated phoneme labels (overrides config)
    #[arg(long, value_delimiter = ',')]
    labels: Option<Vec<String>>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => PlotConfig::load(path)?,
        None => PlotConfig::default(),
    };
    if let Some(scale) = args.scale {
        config.scale = scale;
    }
    if let Some(labels) = args.labels {
        config.phoneme_labels = Some(labels);
    }

    let trace = Trace::load(&args.log, config.zero_peak)?;
    let mut surface = BitmapSurface::new(&args.output);
    compose(&mut surface, &trace, &config)?;

    tracing::info!(output = %args.output.display(), "done");
    Ok(())
}
