use serde::{Deserialize, Serialize};

const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const MODERN_PALETTE: [&str; 8] = [
    "#4C78A8", "#F58518", "#54A24B", "#E45756", "#72B7B2", "#B279A2", "#FF9DA6", "#9D755D",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub intersection_text_color: String,
    pub background: String,
    pub set_colors: Vec<String>,
    pub fill_opacity: f32,
    pub stroke_width: f32,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 16.0,
            text_color: "#333333".to_string(),
            intersection_text_color: "#111111".to_string(),
            background: "#FFFFFF".to_string(),
            set_colors: CATEGORY10.iter().map(|c| c.to_string()).collect(),
            fill_opacity: 0.25,
            stroke_width: 1.5,
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            text_color: "#1C2430".to_string(),
            intersection_text_color: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
            set_colors: MODERN_PALETTE.iter().map(|c| c.to_string()).collect(),
            fill_opacity: 0.3,
            stroke_width: 1.2,
        }
    }

    /// Palette color for the `index`-th set, cycling when sets outnumber
    /// colors.
    pub fn set_color(&self, index: usize) -> &str {
        if self.set_colors.is_empty() {
            return "#777777";
        }
        &self.set_colors[index % self.set_colors.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
