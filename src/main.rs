use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use image::GenericImageView;
use std::{path::PathBuf, process::ExitCode};
use swatches::{
    rand::{rngs::StdRng, SeedableRng},
    PaletteBuilder, Swatches, DEFAULT_CLUSTER_COUNT, DEFAULT_ITERATIONS,
};
use tracing::{debug, error, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// Print the dominant color and the vibrant/muted swatches of an image.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Image to extract the colors from
    image_path: PathBuf,

    /// Number of color clusters
    #[arg(short = 'k', long, default_value_t = DEFAULT_CLUSTER_COUNT)]
    clusters: usize,

    /// Number of k-means refinement passes
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,

    /// Seed the cluster initialization for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(format!("swatches={}", level).parse()?);

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn run(cli: &Cli) -> Result<Swatches> {
    let image = image::open(&cli.image_path)
        .with_context(|| format!("failed to load image {}", cli.image_path.display()))?;

    let (width, height) = image.dimensions();
    debug!(width, height, color = ?image.color(), "decoded image");

    // anything that isn't already 8-bit RGB or RGBA is expanded to one of them
    let has_alpha = image.color().has_alpha();
    let data = if has_alpha {
        image.into_rgba8().into_raw()
    } else {
        image.into_rgb8().into_raw()
    };

    let builder = PaletteBuilder::from_bytes(&data, has_alpha)
        .cluster_count(cli.clusters)
        .iterations(cli.iterations);

    let palette = match cli.seed {
        Some(seed) => builder.generate_with_rng(&mut StdRng::seed_from_u64(seed)),
        None => builder.generate(),
    };

    Ok(palette.to_swatches())
}

fn print_swatches(swatches: &Swatches) {
    let rows = [
        ("Dominant", swatches.dominant),
        ("Vibrant", swatches.vibrant),
        ("LightVibrant", swatches.light_vibrant),
        ("DarkVibrant", swatches.dark_vibrant),
        ("Muted", swatches.muted),
        ("LightMuted", swatches.light_muted),
        ("DarkMuted", swatches.dark_muted),
    ];

    for (name, color) in rows {
        println!("{}: {}", name, color);
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();

            // --help and --version are not failures
            return if err.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    if let Err(err) = init_tracing(cli.verbose) {
        eprintln!("failed to set up logging: {:#}", err);
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(swatches) => {
            print_swatches(&swatches);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
