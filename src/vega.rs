use serde_json::{Value, json};

use crate::diagram::VennDiagram;

/// Vega v5 chart description of a diagram: circles as sized symbol marks,
/// intersections as hoverable paths and set labels as text marks.
pub fn to_vega_spec(diagram: &VennDiagram) -> Value {
    let circles: Vec<Value> = diagram
        .circles
        .iter()
        .map(|circle| {
            json!({
                "set": circle.set,
                "x": circle.x,
                "y": circle.y,
                "size": circle.size,
                "text": circle.text,
                "textX": circle.text_x,
                "textY": circle.text_y,
            })
        })
        .collect();

    let intersections: Vec<Value> = diagram
        .intersections
        .iter()
        .map(|intersection| {
            json!({
                "sets": intersection.sets,
                "size": intersection.size,
                "path": intersection.path,
                "text": intersection.text,
            })
        })
        .collect();

    json!({
        "$schema": "https://vega.github.io/schema/vega/v5.json",
        "width": diagram.width,
        "height": diagram.height,
        "padding": diagram.padding,
        "data": [
            { "name": "circles", "values": circles },
            { "name": "intersections", "values": intersections },
        ],
        "scales": [
            {
                "name": "color",
                "type": "ordinal",
                "domain": { "data": "circles", "field": "set" },
                "range": "category",
            }
        ],
        "legends": [
            { "fill": "color", "title": "Sets", "orient": "top" }
        ],
        "marks": [
            {
                "type": "symbol",
                "from": { "data": "circles" },
                "encode": {
                    "enter": {
                        "x": { "field": "x" },
                        "y": { "field": "y" },
                        "size": { "field": "size" },
                        "shape": { "value": "circle" },
                        "fillOpacity": { "value": 0.3 },
                        "fill": { "scale": "color", "field": "set" },
                        "tooltip": [{ "field": "text", "type": "quantitative" }],
                    },
                    "hover": { "fillOpacity": { "value": 0.5 } },
                    "update": { "fillOpacity": { "value": 0.3 } },
                },
            },
            {
                "type": "path",
                "from": { "data": "intersections" },
                "encode": {
                    "enter": {
                        "path": { "field": "path" },
                        "fill": { "value": "grey" },
                        "fillOpacity": { "value": 0 },
                        "tooltip": [{ "field": "text", "type": "quantitative" }],
                    },
                    "hover": {
                        "stroke": { "value": "black" },
                        "strokeWidth": { "value": 1 },
                        "fill": { "value": "grey" },
                    },
                    "update": { "strokeWidth": { "value": 0 } },
                },
            },
            {
                "type": "text",
                "from": { "data": "circles" },
                "encode": {
                    "enter": {
                        "x": { "field": "textX" },
                        "y": { "field": "textY" },
                        "text": { "field": "text" },
                        "fontSize": { "value": 14 },
                        "fill": { "scale": "color", "field": "set" },
                        "fontWeight": { "value": "normal" },
                    },
                },
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::diagram::compute_diagram;
    use crate::ir::Region;

    #[test]
    fn chart_carries_both_data_sets() {
        let regions = vec![
            Region::new(["A"], 4.0),
            Region::new(["B"], 3.0),
            Region::new(["A", "B"], 1.0),
        ];
        let diagram = compute_diagram(&regions, &Config::default());
        let spec = to_vega_spec(&diagram);

        assert_eq!(spec["$schema"], "https://vega.github.io/schema/vega/v5.json");
        assert_eq!(spec["width"], diagram.width);
        assert_eq!(spec["data"][0]["name"], "circles");
        assert_eq!(spec["data"][0]["values"].as_array().map(Vec::len), Some(2));
        assert_eq!(spec["data"][0]["values"][0]["set"], "A");
        assert_eq!(spec["data"][1]["values"][0]["text"], "A∩B");
        assert_eq!(spec["marks"].as_array().map(Vec::len), Some(3));
        assert_eq!(spec["marks"][1]["type"], "path");
    }

    #[test]
    fn empty_diagram_still_produces_a_chart() {
        let spec = to_vega_spec(&compute_diagram(&[], &Config::default()));
        assert_eq!(spec["data"][0]["values"], json!([]));
        assert_eq!(spec["data"][1]["values"], json!([]));
    }
}
