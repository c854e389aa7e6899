use crate::diagram::VennDiagram;
#[cfg(feature = "png")]
use crate::config::RenderConfig;
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(diagram: &VennDiagram, theme: &Theme) -> String {
    let mut svg = String::new();
    let width = diagram.width;
    let height = diagram.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    svg.push_str("<g class=\"venn-circles\">");
    for (idx, circle) in diagram.circles.iter().enumerate() {
        let color = theme.set_color(idx);
        svg.push_str(&format!(
            "<circle data-set=\"{}\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{color}\" fill-opacity=\"{}\" stroke=\"{color}\" stroke-width=\"{}\"><title>{}</title></circle>",
            escape_xml(&circle.set),
            circle.x,
            circle.y,
            circle.radius,
            theme.fill_opacity,
            theme.stroke_width,
            escape_xml(&circle.text)
        ));
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"venn-intersections\">");
    for intersection in diagram.intersections.iter().filter(|i| !i.disjoint) {
        svg.push_str(&format!(
            "<path data-sets=\"{}\" d=\"{}\" fill=\"none\" stroke=\"none\"><title>{}</title></path>",
            escape_xml(&intersection.sets.join(",")),
            intersection.path,
            escape_xml(&intersection.text)
        ));
    }
    svg.push_str("</g>");

    for circle in &diagram.circles {
        svg.push_str(&text_svg(circle.text_x, circle.text_y, &circle.text, theme, &theme.text_color));
    }
    for intersection in &diagram.intersections {
        if intersection.disjoint {
            continue;
        }
        if let Some(label) = &intersection.label {
            svg.push_str(&text_svg(
                intersection.text_x,
                intersection.text_y,
                label,
                theme,
                &theme.intersection_text_color,
            ));
        }
    }

    svg.push_str("</svg>");
    svg
}

fn text_svg(x: f64, y: f64, text: &str, theme: &Theme, color: &str) -> String {
    format!(
        "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        escape_xml(&theme.font_family),
        theme.font_size,
        color,
        escape_xml(text)
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "sans-serif".to_string();
    opt.fontdb_mut().load_system_fonts();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width as f32, render_cfg.height as f32) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
