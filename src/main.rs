use clap::{Parser, Subcommand};
use docs_pdf::renderer::{HeadlessChromeLauncher, NoopLauncher, RendererLauncher};
use docs_pdf::{config, options, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docs-pdf")]
#[command(about = "Resolve PDF export settings for a documentation site")]
#[command(long_about = "\
Resolve PDF export settings for a documentation site

Reads the [site] and [pdf] tables of the config file, applies defaults and
fallbacks, and prints the settings the PDF build will use.

Fallbacks (first available wins):
  Author:       [pdf].author → [site].site_author   (HTML stripped)
  Copyright:    [pdf].copyright → [site].copyright  (HTML stripped)
  Cover title:  [pdf].cover_title → [site].site_name
  Cover logo:   URL, or file in custom_template_path → theme.custom_dir → docs_dir → .

Run 'docs-pdf gen-config' to generate a documented docs-pdf.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the settings, starting the headless browser if render_js is set
    Resolve,
    /// Validate the settings without starting a browser
    Check,
    /// Print a stock docs-pdf.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let launcher: &dyn RendererLauncher = match cli.command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        Command::Resolve => &HeadlessChromeLauncher,
        Command::Check => &NoopLauncher,
    };

    let host = config::load_config(&cli.config)?;
    init_tracing(cli.verbose || host.pdf.verbose);
    if !cli.config.exists() {
        tracing::debug!(path = %cli.config.display(), "no config file, using stock defaults");
    }

    if !host.pdf.is_enabled_in_env() {
        tracing::info!(
            "PDF export disabled: {} is not set to 1",
            host.pdf.enabled_if_env.as_deref().unwrap_or_default()
        );
        return Ok(());
    }

    let resolved = options::resolve(&host.pdf, &host.site, launcher)?;
    output::print_options(&resolved);
    Ok(())
}

/// Install the fmt subscriber. `RUST_LOG` overrides the verbosity flag.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "docs_pdf=debug"
    } else {
        "docs_pdf=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
