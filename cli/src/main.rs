use anyhow::{Context, Result};
use clap::Parser;
use jpeg_glb::prelude::{Config, Converter};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "jpeg-glb")]
#[command(about = "Places a JPEG image in the art-display template and writes a GLB file")]
struct Cli {
    /// Input JPEG file path
    #[arg(short, long)]
    input: PathBuf,

    /// Output GLB file path
    #[arg(short, long)]
    output: PathBuf,

    /// glTF or GLB template to use instead of the bundled one
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref(), cli.template)?;
    convert_jpeg_to_glb(&config, &cli.input, &cli.output)
}

fn load_config(config_path: Option<&Path>, template: Option<PathBuf>) -> Result<Config> {
    let config = match config_path {
        Some(path) => {
            let contents = std::fs::read(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_slice::<Config>(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        }
        None => Config::default(),
    };

    Ok(match template {
        Some(template) => config.with_template_path(template),
        None => config,
    })
}

fn convert_jpeg_to_glb(config: &Config, input_path: &Path, output_path: &Path) -> Result<()> {
    // Check output file extension
    let output_ext = output_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    if !output_ext.eq_ignore_ascii_case("glb") {
        anyhow::bail!("Output file must be a .glb file");
    }

    let converter = Converter::new(config.clone());
    let glb = converter.convert_file(input_path)
        .with_context(|| format!("Failed to convert {}", input_path.display()))?;

    std::fs::write(output_path, &glb)
        .with_context(|| format!("Failed to write output file {}", output_path.display()))?;

    tracing::info!(output = %output_path.display(), bytes = glb.len(), "wrote GLB");
    Ok(())
}
