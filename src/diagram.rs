//! Assembles a drawable Venn diagram: the circle layout scaled into the
//! render box, one SVG path per intersection and a label anchor for every
//! region.

use serde::Serialize;

use crate::config::Config;
use crate::geometry::Circle;
use crate::ir::{Region, Solution};
use crate::layout::path::intersection_area_path;
use crate::layout::{
    LabelOptions, LayoutOptions, compute_layout_with, compute_text_centres_with, loss_function,
    normalize_solution, scale_solution,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CircleLayout {
    pub set: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Marker area for symbol-based renderers: the squared diameter.
    pub size: f64,
    pub text: String,
    pub text_x: f64,
    pub text_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntersectionLayout {
    pub sets: Vec<String>,
    pub size: f64,
    pub path: String,
    pub text: String,
    /// Caller-supplied label, if any. Renderers only print these.
    pub label: Option<String>,
    pub text_x: f64,
    pub text_y: f64,
    pub disjoint: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VennDiagram {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub circles: Vec<CircleLayout>,
    pub intersections: Vec<IntersectionLayout>,
    /// Residual of the fitted layout before scaling.
    pub loss: f64,
}

pub fn compute_diagram(regions: &[Region], config: &Config) -> VennDiagram {
    let render = &config.render;
    let regions: Vec<Region> = regions
        .iter()
        .filter(|r| !r.sets.is_empty() && r.size.is_finite() && r.size != 0.0)
        .cloned()
        .collect();

    let mut loss = 0.0;
    let mut circles = Solution::new();
    if !regions.is_empty() {
        let options = LayoutOptions::from(&config.layout);
        let mut solution = compute_layout_with(&regions, &options.minimizer());
        if render.normalize {
            solution = normalize_solution(&solution, render.orientation);
        }
        loss = loss_function(&solution, &regions);
        circles = scale_solution(&solution, render.width, render.height, render.padding);
    }

    let label_options = LabelOptions::from(&config.layout);
    let centres = compute_text_centres_with(&circles, &regions, &label_options.minimizer());

    let circle_layouts = circles
        .iter()
        .map(|(set, circle)| {
            let text = regions
                .iter()
                .find(|r| r.is_single() && &r.sets[0] == set)
                .and_then(|r| r.label.clone())
                .unwrap_or_else(|| set.clone());
            let anchor = centres.get(set).copied().unwrap_or_default();
            CircleLayout {
                set: set.clone(),
                x: circle.x,
                y: circle.y,
                radius: circle.radius,
                size: (circle.radius * 2.0).powi(2),
                text,
                text_x: anchor.x,
                text_y: anchor.y,
            }
        })
        .collect();

    let intersections = regions
        .iter()
        .filter(|r| r.sets.len() > 1)
        .map(|region| {
            let members: Option<Vec<Circle>> = region
                .sets
                .iter()
                .map(|set| circles.get(set).copied())
                .collect();
            let path = members
                .map(|members| intersection_area_path(&members))
                .unwrap_or_else(|| "M 0 0".to_string());
            let anchor = centres.get(&region.key()).copied().unwrap_or_default();
            IntersectionLayout {
                sets: region.sets.clone(),
                size: region.size,
                path,
                text: region
                    .label
                    .clone()
                    .unwrap_or_else(|| region.sets.join("∩")),
                label: region.label.clone(),
                text_x: anchor.x,
                text_y: anchor.y,
                disjoint: anchor.disjoint,
            }
        })
        .collect();

    VennDiagram {
        width: render.width,
        height: render.height,
        padding: render.padding,
        circles: circle_layouts,
        intersections,
        loss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_sets() -> Vec<Region> {
        vec![
            Region::new(["A"], 12.0).with_label("Apples"),
            Region::new(["B"], 12.0),
            Region::new(["A", "B"], 2.0),
        ]
    }

    #[test]
    fn diagram_fits_the_render_box() {
        let config = Config::default();
        let diagram = compute_diagram(&two_sets(), &config);
        assert_eq!(diagram.circles.len(), 2);
        assert!(diagram.loss < 1e-3, "loss = {}", diagram.loss);
        for circle in &diagram.circles {
            assert!(circle.x - circle.radius >= config.render.padding - 1e-6);
            assert!(circle.x + circle.radius <= config.render.width - config.render.padding + 1e-6);
            assert!(circle.y - circle.radius >= config.render.padding - 1e-6);
            assert!(circle.y + circle.radius <= config.render.height - config.render.padding + 1e-6);
            assert!((circle.size - 4.0 * circle.radius * circle.radius).abs() < 1e-9);
        }
    }

    #[test]
    fn labels_default_to_ids() {
        let diagram = compute_diagram(&two_sets(), &Config::default());
        assert_eq!(diagram.circles[0].text, "Apples");
        assert_eq!(diagram.circles[1].text, "B");

        let ab = &diagram.intersections[0];
        assert_eq!(ab.text, "A∩B");
        assert_eq!(ab.label, None);
        assert!(!ab.disjoint);
        assert!(ab.path.starts_with("M "));
        assert_eq!(ab.path.matches(" A ").count(), 2);
    }

    #[test]
    fn intersection_anchor_lies_in_both_circles() {
        let diagram = compute_diagram(&two_sets(), &Config::default());
        let ab = &diagram.intersections[0];
        for circle in &diagram.circles {
            let d = ((ab.text_x - circle.x).powi(2) + (ab.text_y - circle.y).powi(2)).sqrt();
            assert!(d < circle.radius, "{ab:?} outside {circle:?}");
        }
    }

    #[test]
    fn empty_input_gives_empty_diagram() {
        let diagram = compute_diagram(&[], &Config::default());
        assert!(diagram.circles.is_empty());
        assert!(diagram.intersections.is_empty());
        assert_eq!(diagram.loss, 0.0);

        let zeroes = vec![Region::new(["A"], 0.0)];
        assert!(compute_diagram(&zeroes, &Config::default()).circles.is_empty());
    }

    #[test]
    fn undrawn_set_makes_intersection_disjoint() {
        let mut regions = two_sets();
        regions.push(Region::new(["A", "Z"], 1.0));
        let diagram = compute_diagram(&regions, &Config::default());
        assert_eq!(diagram.circles.len(), 2);
        let az = diagram
            .intersections
            .iter()
            .find(|i| i.sets == ["A", "Z"])
            .unwrap();
        assert!(az.disjoint);
        assert_eq!(az.path, "M 0 0");
    }
}
