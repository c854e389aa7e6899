use crate::diagram::VennDiagram;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub kind: String,
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub loss: f64,
    pub circles: Vec<CircleDump>,
    pub intersections: Vec<IntersectionDump>,
}

#[derive(Debug, Serialize)]
pub struct CircleDump {
    pub set: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub text: String,
    pub label_anchor: [f64; 2],
}

#[derive(Debug, Serialize)]
pub struct IntersectionDump {
    pub sets: Vec<String>,
    pub size: f64,
    pub text: String,
    pub label_anchor: Option<[f64; 2]>,
    pub path: String,
}

impl LayoutDump {
    pub fn from_diagram(diagram: &VennDiagram) -> Self {
        let circles = diagram
            .circles
            .iter()
            .map(|circle| CircleDump {
                set: circle.set.clone(),
                x: circle.x,
                y: circle.y,
                radius: circle.radius,
                text: circle.text.clone(),
                label_anchor: [circle.text_x, circle.text_y],
            })
            .collect();

        let intersections = diagram
            .intersections
            .iter()
            .map(|intersection| IntersectionDump {
                sets: intersection.sets.clone(),
                size: intersection.size,
                text: intersection.text.clone(),
                label_anchor: (!intersection.disjoint)
                    .then_some([intersection.text_x, intersection.text_y]),
                path: intersection.path.clone(),
            })
            .collect();

        Self {
            kind: "venn".to_string(),
            width: diagram.width,
            height: diagram.height,
            padding: diagram.padding,
            loss: diagram.loss,
            circles,
            intersections,
        }
    }
}

pub fn write_layout_dump(path: &Path, diagram: &VennDiagram) -> anyhow::Result<()> {
    let dump = LayoutDump::from_diagram(diagram);
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
