#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod diagram;
pub mod error;
pub mod geometry;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod optimize;
pub mod parser;
pub mod render;
pub mod theme;
pub mod vega;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, load_config};
pub use diagram::{VennDiagram, compute_diagram};
pub use error::VennError;
pub use geometry::{Circle, Point, intersection_area};
pub use ir::{Region, Solution, TextCentre};
pub use layout::{
    compute_layout, compute_text_centres, disjoint_cluster, loss_function, normalize_solution,
    scale_solution,
};
pub use parser::parse_regions;

/// Parses `input` and renders it to SVG in one step.
pub fn render_regions_svg(input: &str, config: &Config) -> anyhow::Result<String> {
    let regions = parse_regions(input)?;
    let diagram = compute_diagram(&regions, config);
    Ok(render::render_svg(&diagram, &config.theme))
}
