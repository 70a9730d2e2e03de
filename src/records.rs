//! Record types flowing between the sources, the matcher and the mapping table.

use serde::{Deserialize, Serialize};

/// One acquisition unit (an OME `Image`) with the stage position of its first plane
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneRecord {
    /// Image name, e.g. `"Plate (Series 03)"`
    pub unit_name: String,
    /// Stage X position
    pub x: f64,
    /// Stage Y position
    pub y: f64,
}

impl PlaneRecord {
    /// Create a new plane record
    pub fn new(unit_name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            unit_name: unit_name.into(),
            x,
            y,
        }
    }
}

/// One operator-authored named stage position
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    /// Point name as entered by the operator, e.g. `"A1"`
    pub label: String,
    /// Stage X position
    pub x: f64,
    /// Stage Y position
    pub y: f64,
}

impl PointRecord {
    /// Create a new point record
    pub fn new(label: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            label: label.into(),
            x,
            y,
        }
    }
}

/// A (plane, point) pair whose coordinates agree within tolerance.
///
/// This is also the row type of the persisted mapping table; the serde names
/// are the table header and their order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Acquisition unit name
    #[serde(rename = "image_name")]
    pub unit_name: String,
    /// Matched point label
    #[serde(rename = "point_name")]
    pub label: String,
    /// Plane X position
    #[serde(rename = "posX")]
    pub x_plane: f64,
    /// Plane Y position
    #[serde(rename = "posY")]
    pub y_plane: f64,
    /// Point X position
    #[serde(rename = "dX")]
    pub x_point: f64,
    /// Point Y position
    #[serde(rename = "dY")]
    pub y_point: f64,
}

impl MatchRecord {
    /// Build a match record from the two matched records
    pub fn from_pair(plane: &PlaneRecord, point: &PointRecord) -> Self {
        Self {
            unit_name: plane.unit_name.clone(),
            label: point.label.clone(),
            x_plane: plane.x,
            y_plane: plane.y,
            x_point: point.x,
            y_point: point.y,
        }
    }
}
