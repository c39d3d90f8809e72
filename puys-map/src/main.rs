//! Point d'entrée CLI pour puys-map

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use puys_map::cli::{self, RenderArgs};

/// Générer la carte HTML des puys gravis
#[derive(Parser)]
#[command(name = "puys-map")]
#[command(author, version)]
#[command(about = "Générer une carte HTML des sommets de la Chaîne des Puys")]
#[command(long_about = "Referme les courbes de niveau OpenStreetMap en polygones, place les sommets \
(gravis ou non) et le contour du département, puis écrit une page HTML autonome.")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    render: RenderArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let report = cli::cmd_render(&cli.render)?;
    if !cli.quiet {
        report.print_summary();
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
