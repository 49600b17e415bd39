//! tmplhate: render a template against YAML values and the environment.
//!
//! # Usage
//!
//! ```text
//! tmplhate --tmpl deploy.yaml.tmpl --values values.yaml
//! cat deploy.yaml.tmpl | tmplhate -l ~/values.yaml --case title
//! tmplhate -t http://host/app.tmpl -l ../values.yaml --dont-normalize -o app.conf
//! tmplhate --version
//! ```
//!
//! Exit status is 0 on success and 1 on any failure, including argument
//! errors and `--version`.

mod render;

use anyhow::Result;
use clap::Parser;

use render::RenderArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "tmplhate",
    about = "Render templates from YAML values and environment variables",
    long_about = None,
    disable_version_flag = true,
)]
struct Cli {
    /// Print version info.
    #[arg(short = 'v', long = "version")]
    version: bool,

    #[command(flatten)]
    render: RenderArgs,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };
    init_tracing();

    if cli.version {
        println!("Version: {}", env!("CARGO_PKG_VERSION"));
        std::process::exit(1);
    }

    cli.render.run()
}
