use crate::geometry::{Circle, intersection_area};

/// SVG path outlining the region covered by every circle in `circles`.
/// Empty regions collapse to `M 0 0`.
pub fn intersection_area_path(circles: &[Circle]) -> String {
    let stats = intersection_area(circles);
    match stats.arcs.as_slice() {
        [] => "M 0 0".to_string(),
        [arc] => circle_path(arc.circle.x, arc.circle.y, arc.circle.radius),
        arcs => {
            let start = arcs[0].p2;
            let mut d = format!("M {:.2} {:.2}", start.x, start.y);
            for arc in arcs {
                let r = arc.circle.radius;
                let large_arc = u8::from(arc.width > r);
                d.push_str(&format!(
                    " A {r:.2} {r:.2} 0 {large_arc} 1 {:.2} {:.2}",
                    arc.p1.x, arc.p1.y
                ));
            }
            d
        }
    }
}

/// Full circle as two half arcs, starting from the leftmost point.
pub fn circle_path(x: f64, y: f64, r: f64) -> String {
    format!(
        "M {x:.2} {y:.2} m {:.2} 0 a {r:.2} {r:.2} 0 1 0 {:.2} 0 a {r:.2} {r:.2} 0 1 0 {:.2} 0",
        -r,
        r * 2.0,
        -r * 2.0
    )
}
