use crate::config::load_config;
use crate::layout::LayoutMode;
use crate::layout_dump::write_layout_dump;
use crate::render::{render_svg, write_output_svg};
use crate::{RenderOptions, build_panel};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hostmap", version, about = "Hexagonal host map renderer")]
pub struct Args {
    /// Input file (JSON series or text exposition) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Options file (JSON5, camelCase keys)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Display width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Display height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,

    /// Hosts in a short row; long rows hold one more
    #[arg(long = "hostsPerRow")]
    pub hosts_per_row: Option<usize>,

    /// Label whose value names the group of a series
    #[arg(long = "groupBy")]
    pub group_by: Option<String>,

    /// Label whose value identifies the host of a series
    #[arg(long = "nodeId")]
    pub node_id: Option<String>,

    /// Gap between neighbouring hexagons
    #[arg(long = "hexSpacing")]
    pub hex_spacing: Option<f32>,

    /// Group arrangement
    #[arg(long = "layoutMode")]
    pub layout_mode: Option<LayoutMode>,

    /// Fit the whole map to the display instead of centering it at 100%
    #[arg(long = "fit")]
    pub fit: bool,

    /// Select the host with this key (`group/node`) and show its details
    #[arg(long = "select")]
    pub select: Option<String>,

    /// Write computed layout JSON to this path
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Log pipeline steps to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let options = build_options(&args)?;
    let input = read_input(args.input.as_deref())?;
    let panel = build_panel(&input, &options)?;
    info!(
        groups = panel.layout().groups.len(),
        hosts = panel.layout().host_count(),
        scale = panel.viewport().scale(),
        "rendering host map"
    );

    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, panel.layout())?;
    }

    let svg = render_svg(&panel, &options.config.render);
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&svg, &output, &options)?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Config file first, then command-line overrides, then validation of the
/// merged result.
fn build_options(args: &Args) -> Result<RenderOptions> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if let Some(n) = args.hosts_per_row {
        config.layout.hosts_per_row = n;
    }
    if let Some(label) = &args.group_by {
        config.layout.group_by_label = label.clone();
    }
    if let Some(label) = &args.node_id {
        config.layout.node_id_label = label.clone();
    }
    if let Some(spacing) = args.hex_spacing {
        config.layout.hex_spacing = spacing;
    }
    if let Some(mode) = args.layout_mode {
        config.layout.layout_mode = mode;
    }
    config.layout.validate()?;
    config.viewport.validate()?;
    if config.render.width <= 0.0 || config.render.height <= 0.0 {
        anyhow::bail!(
            "display size must be positive, got {}x{}",
            config.render.width,
            config.render.height
        );
    }
    Ok(RenderOptions {
        config,
        fit_to_screen: args.fit,
        select: args.select.clone(),
    })
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, options: &RenderOptions) -> Result<()> {
    crate::render::write_output_png(svg, output, &options.config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _options: &RenderOptions) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}
