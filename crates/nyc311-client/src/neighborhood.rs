// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Neighborhood (community district) polygons and their hover state.
//!
//! The layer is built once from a GeoJSON `FeatureCollection`. Features
//! without a polygonal geometry are skipped. At most one feature is hovered
//! at a time; the hovered feature is drawn with the highlight style on top of
//! the others, and leaving it puts it back at the bottom with its resting
//! style.

use geo::{BoundingRect, Contains, Geometry, LineString, MultiPolygon, Point, Polygon, TriangulateEarcut};
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson, Value};
use log::debug;
use thiserror::Error;

use crate::location::{Bounds, LatLon};
use crate::style::PolygonStyle;

/// Info panel text while nothing is hovered.
pub const INFO_PROMPT: &str = "Hover over a neighborhood";

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("expected a FeatureCollection, got a {0}")]
    NotFeatureCollection(&'static str),
}

/// Unwrap a `FeatureCollection`; single features and bare geometries are rejected.
pub fn into_feature_collection(geojson: GeoJson) -> Result<FeatureCollection, GeometryError> {
    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) => Err(GeometryError::NotFeatureCollection("Feature")),
        GeoJson::Geometry(_) => Err(GeometryError::NotFeatureCollection("Geometry")),
    }
}

/// Fill triangles of one polygon with its holes cut out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillMesh {
    pub vertices: Vec<LatLon>,
    /// Vertex index triples.
    pub indices: Vec<u32>,
}

impl FillMesh {
    fn from_polygon(polygon: &Polygon<f64>) -> Self {
        let raw = polygon.earcut_triangles_raw();
        let indices = raw
            .triangle_indices
            .iter()
            .map(|&i| u32::try_from(i))
            .collect::<Result<Vec<_>, _>>()
            .unwrap_or_default();

        Self {
            vertices: raw
                .vertices
                .chunks_exact(2)
                .map(|xy| LatLon::new(xy[1], xy[0]))
                .collect(),
            indices,
        }
    }
}

/// A neighborhood feature.
#[derive(Debug, Clone)]
pub struct Neighborhood {
    pub id: String,
    /// Lon/lat polygons (x is longitude).
    pub shape: MultiPolygon<f64>,
    fills: Vec<FillMesh>,
    bounds: Bounds,
}

impl Neighborhood {
    fn from_feature(index: usize, feature: &Feature) -> Option<Self> {
        let geometry: Geometry<f64> = feature.geometry.as_ref()?.value.clone().try_into().ok()?;
        let shape = match geometry {
            Geometry::Polygon(polygon) => MultiPolygon::from(polygon),
            Geometry::MultiPolygon(shape) => shape,
            _ => return None,
        };
        let bounds = shape.bounding_rect()?.into();

        Some(Self {
            id: feature_id(index, feature),
            fills: shape.0.iter().map(FillMesh::from_polygon).collect(),
            shape,
            bounds,
        })
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// One mesh per polygon, triangulated when the feature was loaded.
    #[must_use]
    pub fn fills(&self) -> &[FillMesh] {
        &self.fills
    }

    /// Exterior and interior rings of every polygon, each closed.
    pub fn rings(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.shape
            .0
            .iter()
            .flat_map(|polygon| std::iter::once(polygon.exterior()).chain(polygon.interiors()))
    }

    /// Points inside a hole are outside the feature.
    #[must_use]
    pub fn contains(&self, point: LatLon) -> bool {
        self.bounds.contains(point) && self.shape.contains(&Point::new(point.lon, point.lat))
    }
}

/// GeoJSON feature id, then the `id` property, then the position in the collection.
fn feature_id(index: usize, feature: &Feature) -> String {
    match &feature.id {
        Some(Id::String(s)) => return s.clone(),
        Some(Id::Number(n)) => return n.to_string(),
        None => {}
    }
    match feature.property("id") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => index.to_string(),
    }
}

/// What a hover update changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverChange {
    Unchanged,
    Entered(usize),
    Left(usize),
    Moved { from: usize, to: usize },
}

/// The neighborhood overlay with its interaction state.
#[derive(Debug, Clone)]
pub struct NeighborhoodLayer {
    features: Vec<Neighborhood>,
    /// Indices into `features`, bottom first.
    draw_order: Vec<usize>,
    hovered: Option<usize>,
    style: PolygonStyle,
    highlight: PolygonStyle,
}

impl NeighborhoodLayer {
    #[must_use]
    pub fn new(features: Vec<Neighborhood>) -> Self {
        let style = PolygonStyle::neighborhood();
        Self {
            draw_order: (0..features.len()).collect(),
            features,
            hovered: None,
            highlight: style.highlighted(),
            style,
        }
    }

    #[must_use]
    pub fn from_feature_collection(collection: &FeatureCollection) -> Self {
        let features: Vec<Neighborhood> = collection
            .features
            .iter()
            .enumerate()
            .filter_map(|(index, feature)| {
                let parsed = Neighborhood::from_feature(index, feature);
                if parsed.is_none() {
                    debug!("Skipping neighborhood feature #{index} without polygon geometry");
                }
                parsed
            })
            .collect();
        Self::new(features)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Neighborhood> {
        self.features.get(index)
    }

    #[must_use]
    pub fn features(&self) -> &[Neighborhood] {
        &self.features
    }

    #[must_use]
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Topmost feature under `point`.
    #[must_use]
    pub fn feature_at(&self, point: LatLon) -> Option<usize> {
        self.draw_order
            .iter()
            .rev()
            .copied()
            .find(|&i| self.features[i].contains(point))
    }

    /// Update hover from the pointer position (`None` when the pointer left the map).
    pub fn hover_at(&mut self, point: Option<LatLon>) -> HoverChange {
        let target = point.and_then(|p| self.feature_at(p));
        self.set_hovered(target)
    }

    pub fn set_hovered(&mut self, target: Option<usize>) -> HoverChange {
        let target = target.filter(|&i| i < self.features.len());
        if target == self.hovered {
            return HoverChange::Unchanged;
        }

        let previous = self.hovered.take();
        if let Some(left) = previous {
            self.send_to_back(left);
        }
        if let Some(entered) = target {
            self.bring_to_front(entered);
        }
        self.hovered = target;

        match (previous, target) {
            (Some(from), Some(to)) => HoverChange::Moved { from, to },
            (None, Some(to)) => HoverChange::Entered(to),
            (Some(from), None) => HoverChange::Left(from),
            (None, None) => HoverChange::Unchanged,
        }
    }

    fn bring_to_front(&mut self, index: usize) {
        self.draw_order.retain(|&i| i != index);
        self.draw_order.push(index);
    }

    fn send_to_back(&mut self, index: usize) {
        self.draw_order.retain(|&i| i != index);
        self.draw_order.insert(0, index);
    }

    /// Current style of a feature.
    #[must_use]
    pub fn style_of(&self, index: usize) -> &PolygonStyle {
        if self.hovered == Some(index) {
            &self.highlight
        } else {
            &self.style
        }
    }

    /// Feature indices with their current style, bottom first.
    pub fn draw_order(&self) -> impl Iterator<Item = (usize, &Neighborhood, &PolygonStyle)> {
        self.draw_order
            .iter()
            .map(|&i| (i, &self.features[i], self.style_of(i)))
    }

    /// Info panel text for the current hover state.
    #[must_use]
    pub fn info_text(&self) -> String {
        match self.hovered.and_then(|i| self.features.get(i)) {
            Some(feature) => format!("Region ID: {}", feature.id),
            None => INFO_PROMPT.to_string(),
        }
    }

    /// Box to fit when a feature is clicked.
    #[must_use]
    pub fn bounds_of(&self, index: usize) -> Option<Bounds> {
        self.features.get(index).map(Neighborhood::bounds)
    }
}

/// Vertices in the first ring (or part) of each geometry, skipping features
/// that carry no geometry.
#[must_use]
pub fn count_first_ring_vertices(collection: &FeatureCollection) -> usize {
    collection
        .features
        .iter()
        .filter_map(|f| f.geometry.as_ref())
        .map(|g| match &g.value {
            Value::Point(_) => 1,
            Value::MultiPoint(points) | Value::LineString(points) => points.len(),
            Value::MultiLineString(lines) | Value::Polygon(lines) => {
                lines.first().map_or(0, Vec::len)
            }
            Value::MultiPolygon(polygons) => polygons
                .first()
                .and_then(|rings| rings.first())
                .map_or(0, Vec::len),
            Value::GeometryCollection(_) => 0,
        })
        .sum()
}
