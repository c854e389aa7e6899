use crate::config::{Config, load_config};
use crate::diagram::{VennDiagram, compute_diagram};
use crate::layout_dump::{LayoutDump, write_layout_dump};
use crate::parser::parse_regions;
use crate::render::{render_svg, write_output_svg};
use crate::vega::to_vega_spec;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "venn-layout",
    version,
    about = "Area-proportional Venn diagrams from region sizes"
)]
pub struct Args {
    /// Input file (JSON or JSON5 regions) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout for text formats if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, layout, render)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f64>,

    /// Height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f64>,

    /// Space kept free around the diagram
    #[arg(long = "padding")]
    pub padding: Option<f64>,

    /// Angle in radians the two largest circles are lined up on
    #[arg(long = "orientation", allow_negative_numbers = true)]
    pub orientation: Option<f64>,

    /// Keep the optimizer's raw placement instead of normalizing it
    #[arg(long = "no-normalize")]
    pub no_normalize: bool,

    /// Log debug details to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
    Vega,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = build_config(&args)?;
    let input = read_input(args.input.as_deref())?;
    let regions = parse_regions(&input)?;
    let diagram = compute_diagram(&regions, &config);
    log::debug!(
        "laid out {} sets with residual loss {:.6}",
        diagram.circles.len(),
        diagram.loss
    );

    write_diagram(&diagram, &config, args.output_format, args.output.as_deref())
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn build_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }
    if let Some(padding) = args.padding {
        config.render.padding = padding;
    }
    if let Some(orientation) = args.orientation {
        config.render.orientation = orientation;
    }
    if args.no_normalize {
        config.render.normalize = false;
    }
    if config.render.width <= 0.0 || config.render.height <= 0.0 {
        return Err(anyhow::anyhow!(
            "Render size must be positive, got {}x{}",
            config.render.width,
            config.render.height
        ));
    }
    Ok(config)
}

fn write_diagram(
    diagram: &VennDiagram,
    config: &Config,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    match format {
        OutputFormat::Svg => {
            let svg = render_svg(diagram, &config.theme);
            write_output_svg(&svg, output)
        }
        OutputFormat::Png => write_png(diagram, config, output),
        OutputFormat::Json => match output {
            Some(path) => write_layout_dump(path, diagram),
            None => {
                let dump = LayoutDump::from_diagram(diagram);
                println!("{}", serde_json::to_string_pretty(&dump)?);
                Ok(())
            }
        },
        OutputFormat::Vega => {
            let spec = serde_json::to_string_pretty(&to_vega_spec(diagram))?;
            match output {
                Some(path) => std::fs::write(path, spec)?,
                None => println!("{spec}"),
            }
            Ok(())
        }
    }
}

#[cfg(feature = "png")]
fn write_png(diagram: &VennDiagram, config: &Config, output: Option<&Path>) -> Result<()> {
    let output = ensure_output(output, "png")?;
    let svg = render_svg(diagram, &config.theme);
    crate::render::write_output_png(&svg, output, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_diagram: &VennDiagram, _config: &Config, _output: Option<&Path>) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires building with the `png` feature"
    ))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg_attr(not(feature = "png"), allow(dead_code))]
fn ensure_output<'a>(output: Option<&'a Path>, ext: &str) -> Result<&'a Path> {
    output.ok_or_else(|| anyhow::anyhow!("Output path required for {} output", ext))
}
