//! Source document records.
//!
//! These types map directly to the metro data JSON document. Fields whose
//! shape varies between data files (colours, positions, waypoints) are kept
//! as raw JSON values and interpreted leniently during conversion.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{GeoPoint, GraphPoint, Rgb};

/// The whole data document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetroDocument {
    #[serde(default)]
    pub lines: Vec<LineRecord>,

    #[serde(default)]
    pub stations: Vec<StationRecord>,
}

/// A line entry: `{"name": "Line 1", "color": [228, 0, 43]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct LineRecord {
    #[serde(default)]
    pub name: String,

    /// `[r, g, b]`, each 0-255. Anything else means black.
    pub color: Option<Value>,
}

/// A station entry with its outgoing edges.
#[derive(Debug, Clone, Deserialize)]
pub struct StationRecord {
    #[serde(default)]
    pub name: String,

    /// Label placement tag.
    #[serde(default)]
    pub tag: String,

    /// Category tag ("normal" or "transfer").
    #[serde(rename = "type", default)]
    pub kind: String,

    /// `[x, y]` schematic position.
    #[serde(rename = "graph-position")]
    pub graph_position: Option<Value>,

    /// `[lon, lat]` geographic position.
    #[serde(rename = "real-position")]
    pub real_position: Option<Value>,

    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// A one-directional edge as written in the source. The graph always
/// materialises it as a symmetric connection.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeRecord {
    #[serde(default)]
    pub to: String,

    #[serde(default)]
    pub line: String,

    /// `[[x, y], ...]` bend points for drawing.
    pub via: Option<Value>,
}

/// Interpret a colour value, falling back to black.
pub(super) fn color_from(value: Option<&Value>) -> Rgb {
    let Some(items) = value.and_then(Value::as_array) else {
        return Rgb::BLACK;
    };
    let components: Option<Vec<i64>> = items.iter().map(Value::as_i64).collect();
    components
        .and_then(|c| Rgb::from_components(&c).ok())
        .unwrap_or(Rgb::BLACK)
}

/// Interpret a two-element numeric array.
fn pair_from(value: &Value) -> Option<(f64, f64)> {
    match value.as_array()?.as_slice() {
        [x, y] => Some((x.as_f64()?, y.as_f64()?)),
        _ => None,
    }
}

/// Interpret a schematic position; fractional parts are truncated and
/// anything malformed becomes the origin.
pub(super) fn graph_point_from(value: Option<&Value>) -> GraphPoint {
    value
        .and_then(pair_from)
        .map(|(x, y)| GraphPoint::new(x as i32, y as i32))
        .unwrap_or_default()
}

/// Interpret a geographic position; anything malformed is left unset.
pub(super) fn geo_point_from(value: Option<&Value>) -> GeoPoint {
    value
        .and_then(pair_from)
        .map(|(lon, lat)| GeoPoint::new(lon, lat))
        .unwrap_or_default()
}

/// Interpret a waypoint list, dropping malformed points.
pub(super) fn waypoints_from(value: Option<&Value>) -> Vec<GraphPoint> {
    value
        .and_then(Value::as_array)
        .map(|points| {
            points
                .iter()
                .filter_map(pair_from)
                .map(|(x, y)| GraphPoint::new(x as i32, y as i32))
                .collect()
        })
        .unwrap_or_default()
}
