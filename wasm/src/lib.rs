use serde::Deserialize;
use venn_layout::theme::Theme;
use venn_layout::{Config, render_regions_svg};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VennRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    width: Option<f64>,
    height: Option<f64>,
    padding: Option<f64>,
    orientation: Option<f64>,
    normalize: Option<bool>,
    set_colors: Option<Vec<String>>,
}

fn build_config(options: VennRenderOptions) -> Config {
    let mut config = Config::default();
    if options.theme.as_deref() == Some("modern") {
        config.theme = Theme::modern();
    }

    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        config.theme.font_size = font_size;
    }
    if let Some(set_colors) = options.set_colors {
        config.theme.set_colors = set_colors;
    }
    if let Some(width) = options.width {
        config.render.width = width;
    }
    if let Some(height) = options.height {
        config.render.height = height;
    }
    if let Some(padding) = options.padding {
        config.render.padding = padding;
    }
    if let Some(orientation) = options.orientation {
        config.render.orientation = orientation;
    }
    if let Some(normalize) = options.normalize {
        config.render.normalize = normalize;
    }
    config
}

#[wasm_bindgen]
pub fn render_venn_svg(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<VennRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        VennRenderOptions::default()
    };

    let config = build_config(options);
    render_regions_svg(input, &config).map_err(|error| JsValue::from_str(&error.to_string()))
}
