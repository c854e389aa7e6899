use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::path::Path;

/// Optimizer budgets for circle placement and label search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub max_iterations: usize,
    pub min_error_delta: f64,
    pub min_tolerance: f64,
    pub label_max_iterations: usize,
    pub label_min_error_delta: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            min_error_delta: 1e-6,
            min_tolerance: 1e-5,
            label_max_iterations: 500,
            label_min_error_delta: 1e-10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    /// Angle the two largest circles are lined up on, in radians.
    pub orientation: f64,
    pub normalize: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 350.0,
            padding: 15.0,
            orientation: FRAC_PI_2,
            normalize: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().trim_end_matches("px").parse::<f64>().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    text_color: Option<String>,
    intersection_text_color: Option<String>,
    background: Option<String>,
    set_colors: Option<Vec<String>>,
    fill_opacity: Option<NumberOrString>,
    stroke_width: Option<NumberOrString>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    max_iterations: Option<usize>,
    min_error_delta: Option<f64>,
    min_tolerance: Option<f64>,
    label_max_iterations: Option<usize>,
    label_min_error_delta: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<NumberOrString>,
    height: Option<NumberOrString>,
    padding: Option<NumberOrString>,
    orientation: Option<f64>,
    normalize: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Merges a JSON config document onto the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    match parsed.theme.as_deref() {
        Some("modern") => config.theme = Theme::modern(),
        Some("classic" | "default") | None => {}
        Some(other) => log::warn!("unknown theme {other:?}, keeping the default"),
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size.as_ref().and_then(NumberOrString::as_f64) {
            config.theme.font_size = v as f32;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.intersection_text_color {
            config.theme.intersection_text_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.set_colors {
            config.theme.set_colors = v;
        }
        if let Some(v) = vars.fill_opacity.as_ref().and_then(NumberOrString::as_f64) {
            config.theme.fill_opacity = v.clamp(0.0, 1.0) as f32;
        }
        if let Some(v) = vars.stroke_width.as_ref().and_then(NumberOrString::as_f64) {
            config.theme.stroke_width = v as f32;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.max_iterations {
            config.layout.max_iterations = v;
        }
        if let Some(v) = layout.min_error_delta {
            config.layout.min_error_delta = v;
        }
        if let Some(v) = layout.min_tolerance {
            config.layout.min_tolerance = v;
        }
        if let Some(v) = layout.label_max_iterations {
            config.layout.label_max_iterations = v;
        }
        if let Some(v) = layout.label_min_error_delta {
            config.layout.label_min_error_delta = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width.as_ref().and_then(NumberOrString::as_f64) {
            config.render.width = v;
        }
        if let Some(v) = render.height.as_ref().and_then(NumberOrString::as_f64) {
            config.render.height = v;
        }
        if let Some(v) = render.padding.as_ref().and_then(NumberOrString::as_f64) {
            config.render.padding = v;
        }
        if let Some(v) = render.orientation {
            config.render.orientation = v;
        }
        if let Some(v) = render.normalize {
            config.render.normalize = v;
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.max_iterations, 500);
        assert_eq!(config.render.orientation, FRAC_PI_2);
        assert!(config.render.normalize);
        assert_eq!(config.theme, Theme::classic());
    }

    #[test]
    fn file_values_override_defaults() {
        let config = parse_config(
            r##"{
                "theme": "modern",
                "themeVariables": { "fontSize": "18px", "setColors": ["#000", "#fff"], "background": "#101010" },
                "layout": { "maxIterations": 50, "minTolerance": 1e-3 },
                "render": { "width": 800, "height": "400", "normalize": false, "orientation": 0 }
            }"##,
        )
        .unwrap();
        assert_eq!(config.theme.font_size, 18.0);
        assert_eq!(config.theme.set_colors, vec!["#000", "#fff"]);
        assert_eq!(config.theme.font_family, Theme::modern().font_family);
        assert_eq!(config.theme.background, "#101010");
        assert_eq!(config.layout.max_iterations, 50);
        assert_eq!(config.layout.min_tolerance, 1e-3);
        assert_eq!(config.layout.min_error_delta, 1e-6);
        assert_eq!(config.render.width, 800.0);
        assert_eq!(config.render.height, 400.0);
        assert_eq!(config.render.orientation, 0.0);
        assert!(!config.render.normalize);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(parse_config("{ \"layout\": 3 }").is_err());
        assert!(parse_config("not json").is_err());
    }
}
