use crate::quality::evaluator::Variant;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self { Viewport { width: 600.0, height: 600.0 } }
}

/// Session settings. Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub variant: Variant,
    pub zoom_intensity: f64,
    /// Pan distance of one arrow-key press, in graph units.
    pub trans_step: f64,
    /// Hit radius of nodes in screen pixels.
    pub node_radius: f64,
    /// Hit radius of bends in screen pixels.
    pub bend_radius: f64,
    /// Drag snapping grid in graph units.
    pub granularity: f64,
    pub viewport: Viewport,
    pub hide_quality_if_infeasible: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            variant: Variant::EdgeLengthRatio,
            zoom_intensity: 0.2,
            trans_step: 20.0,
            node_radius: 6.0,
            bend_radius: 4.0,
            granularity: 1.0,
            viewport: Viewport::default(),
            hide_quality_if_infeasible: false,
        }
    }
}

impl Config {
    pub fn for_variant(variant: Variant) -> Config { Config { variant, ..Config::default() } }

    pub fn from_json(text: &str) -> Result<Config, serde_json::Error> { serde_json::from_str(text) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let c = Config::from_json(r#"{"variant":"min_crossings_upward","granularity":5}"#).unwrap();
        assert_eq!(c.variant, Variant::MinCrossingsUpward);
        assert_eq!(c.granularity, 5.0);
        assert_eq!(c.zoom_intensity, 0.2);
        assert_eq!(c.viewport, Viewport::default());
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!(Config::from_json(r#"{"variant":"fastest"}"#).is_err());
    }
}
