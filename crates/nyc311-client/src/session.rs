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

//! Complaint marker layers and their toggle control.
//!
//! A [`ComplaintLayerSession`] owns everything one complaint query puts on
//! the map: one [`MarkerLayer`] per [`NoiseCategory`] and the
//! [`LayerControl`] listing them. Each query goes through
//! [`begin`](ComplaintLayerSession::begin), which clears the previous
//! rendering and hands out a [`RequestToken`], and
//! [`apply`](ComplaintLayerSession::apply), which only accepts the response
//! for the newest token. Responses from superseded requests are dropped, so
//! two overlapping queries can never interleave their markers.

use log::{debug, info};

use crate::category::{Classifier, NoiseCategory};
use crate::location::{Bounds, LatLon};
use crate::record::ComplaintRecord;
use crate::style::{MarkerStyle, Rgb};

/// Identifies one complaint request. Tokens increase monotonically per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    #[must_use]
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// A circular point marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLon,
    pub category: NoiseCategory,
    pub style: MarkerStyle,
}

/// All markers of one category, toggled as a unit.
#[derive(Debug, Clone)]
pub struct MarkerLayer {
    category: NoiseCategory,
    markers: Vec<Marker>,
    on_map: bool,
}

impl MarkerLayer {
    fn new(category: NoiseCategory) -> Self {
        Self {
            category,
            markers: Vec::new(),
            on_map: false,
        }
    }

    #[must_use]
    pub fn category(&self) -> NoiseCategory {
        self.category
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether the layer is currently drawn.
    #[must_use]
    pub fn is_on_map(&self) -> bool {
        self.on_map
    }
}

/// A legend row: swatch color and label for one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub category: NoiseCategory,
    pub label: &'static str,
    pub swatch: Rgb,
}

/// Toggle control bound to every category layer of one rendering.
#[derive(Debug, Clone)]
pub struct LayerControl {
    entries: Vec<LegendEntry>,
}

impl LayerControl {
    fn for_layers(layers: &[MarkerLayer]) -> Self {
        Self {
            entries: layers
                .iter()
                .map(|layer| LegendEntry {
                    category: layer.category,
                    label: layer.category.label(),
                    swatch: layer.category.color(),
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }
}

/// Result of handing a response to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// The response belongs to a superseded request and was dropped.
    Stale,
    /// No rows; nothing was added and the viewport should stay put.
    Empty,
    /// Layers and control are attached.
    Rendered {
        markers: usize,
        skipped: usize,
        /// Union of every marker, for fitting the view.
        bounds: Bounds,
    },
}

/// Complaint layers of the current query.
#[derive(Debug)]
pub struct ComplaintLayerSession {
    classifier: Classifier,
    last_issued: u64,
    pending: Option<RequestToken>,
    layers: Vec<MarkerLayer>,
    control: Option<LayerControl>,
}

impl Default for ComplaintLayerSession {
    fn default() -> Self {
        Self::new(Classifier::standard())
    }
}

impl ComplaintLayerSession {
    #[must_use]
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier,
            last_issued: 0,
            pending: None,
            layers: Vec::new(),
            control: None,
        }
    }

    /// Clear the current rendering and issue a token for a new request.
    pub fn begin(&mut self) -> RequestToken {
        self.clear();
        self.last_issued += 1;
        let token = RequestToken(self.last_issued);
        self.pending = Some(token);
        debug!("Complaint request #{} started", token.0);
        token
    }

    /// Remove all layers and the control. Safe to call when nothing is attached.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.control = None;
    }

    /// Request still waiting for its response, if any.
    #[must_use]
    pub fn pending(&self) -> Option<RequestToken> {
        self.pending
    }

    /// Classify and attach the response for `token`.
    pub fn apply(&mut self, token: RequestToken, records: &[ComplaintRecord]) -> RenderOutcome {
        if self.pending != Some(token) {
            debug!(
                "Dropping response for request #{} (pending: {:?})",
                token.0, self.pending
            );
            return RenderOutcome::Stale;
        }
        self.pending = None;

        if records.is_empty() {
            info!("Complaint request #{} returned no records", token.0);
            return RenderOutcome::Empty;
        }

        let mut layers: Vec<MarkerLayer> =
            NoiseCategory::ALL.iter().map(|&c| MarkerLayer::new(c)).collect();
        let mut bounds: Option<Bounds> = None;
        let mut skipped = 0;

        for record in records {
            let Some(position) = record.position() else {
                debug!("Skipping record without coordinates: {:?}", record.descriptor);
                skipped += 1;
                continue;
            };

            let category = self.classifier.classify(&record.descriptor);
            layers[category.index()].markers.push(Marker {
                position,
                category,
                style: MarkerStyle::complaint(category.color()),
            });

            match bounds.as_mut() {
                Some(b) => b.extend(position),
                None => bounds = Some(Bounds::from_point(position)),
            }
        }

        let Some(bounds) = bounds else {
            info!(
                "Complaint request #{} returned {} records, none with coordinates",
                token.0, skipped
            );
            return RenderOutcome::Empty;
        };

        for layer in &mut layers {
            layer.on_map = !layer.is_empty();
        }

        let markers = records.len() - skipped;
        info!(
            "Rendered {} complaint markers in {} layers",
            markers,
            layers.iter().filter(|l| l.on_map).count()
        );

        self.control = Some(LayerControl::for_layers(&layers));
        self.layers = layers;

        RenderOutcome::Rendered {
            markers,
            skipped,
            bounds,
        }
    }

    #[must_use]
    pub fn layers(&self) -> &[MarkerLayer] {
        &self.layers
    }

    #[must_use]
    pub fn layer(&self, category: NoiseCategory) -> Option<&MarkerLayer> {
        self.layers.iter().find(|l| l.category == category)
    }

    /// Layers currently drawn, in legend order.
    pub fn visible_layers(&self) -> impl Iterator<Item = &MarkerLayer> {
        self.layers.iter().filter(|l| l.on_map)
    }

    #[must_use]
    pub fn control(&self) -> Option<&LayerControl> {
        self.control.as_ref()
    }

    /// Add or remove a category layer via the control.
    pub fn set_layer_visible(&mut self, category: NoiseCategory, visible: bool) {
        if let Some(layer) = self.layers.iter_mut().find(|l| l.category == category) {
            layer.on_map = visible;
        }
    }

    #[must_use]
    pub fn marker_count(&self) -> usize {
        self.layers.iter().map(MarkerLayer::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<ComplaintRecord> {
        vec![
            ComplaintRecord::new("Loud Music/Party", 40.70, -73.90),
            ComplaintRecord::new("Barking Dog", 40.60, -74.00),
            ComplaintRecord::new("Noise: Boat(Engine,Music,Etc) (NR10)", 40.80, -73.80),
            ComplaintRecord::new("Loud Music/Party", 40.75, -73.95),
        ]
    }

    #[test]
    fn test_single_record_marker() {
        let mut session = ComplaintLayerSession::default();
        let token = session.begin();
        let outcome = session.apply(
            token,
            &[ComplaintRecord::new("Loud Music/Party control panel", 40.7, -73.9)],
        );

        assert!(matches!(outcome, RenderOutcome::Rendered { markers: 1, .. }));
        let layer = session.layer(NoiseCategory::LoudMusicParty).unwrap();
        assert_eq!(layer.len(), 1);
        let marker = &layer.markers()[0];
        assert_eq!(marker.position, LatLon::new(40.7, -73.9));
        assert_eq!(marker.style.fill_color.to_string(), "#313695");
        assert!((marker.style.radius - 5.0).abs() < f32::EPSILON);
        assert!((marker.style.fill_opacity - 0.7).abs() < f32::EPSILON);
        assert_eq!(marker.style.color, Rgb::WHITE);
        assert_eq!(marker.style.dash_array, vec![3.0]);
    }

    #[test]
    fn test_groups_by_category_and_unions_bounds() {
        let mut session = ComplaintLayerSession::default();
        let token = session.begin();
        let outcome = session.apply(token, &records());

        let RenderOutcome::Rendered { markers, bounds, .. } = outcome else {
            panic!("expected rendered outcome, got {outcome:?}");
        };
        assert_eq!(markers, 4);
        assert_eq!(bounds.south_west, LatLon::new(40.60, -74.00));
        assert_eq!(bounds.north_east, LatLon::new(40.80, -73.80));

        assert_eq!(session.layers().len(), NoiseCategory::COUNT);
        assert_eq!(session.layer(NoiseCategory::LoudMusicParty).unwrap().len(), 2);
        assert_eq!(session.layer(NoiseCategory::BarkingDog).unwrap().len(), 1);
        assert_eq!(session.layer(NoiseCategory::Others).unwrap().len(), 1);
        assert_eq!(session.visible_layers().count(), 3);
    }

    #[test]
    fn test_control_lists_every_category() {
        let mut session = ComplaintLayerSession::default();
        let token = session.begin();
        session.apply(token, &records());

        let control = session.control().unwrap();
        assert_eq!(control.entries().len(), NoiseCategory::COUNT);
        assert_eq!(control.entries()[0].label, "Air Condition/Ventilation Equipment");
        assert_eq!(control.entries()[17].swatch, Rgb::new(0, 0, 0));
        // Empty layers are listed but not drawn
        assert!(!session.layer(NoiseCategory::Alarms).unwrap().is_on_map());
    }

    #[test]
    fn test_empty_response_adds_nothing() {
        let mut session = ComplaintLayerSession::default();
        let token = session.begin();
        assert_eq!(session.apply(token, &[]), RenderOutcome::Empty);
        assert!(session.layers().is_empty());
        assert!(session.control().is_none());
        assert!(session.pending().is_none());
    }

    #[test]
    fn test_sequential_queries_replace_layers() {
        let mut session = ComplaintLayerSession::default();
        let first = session.begin();
        session.apply(first, &records());
        assert_eq!(session.marker_count(), 4);

        let second = session.begin();
        assert!(session.layers().is_empty());
        assert!(session.control().is_none());

        session.apply(second, &[ComplaintRecord::new("Alarms", 40.7, -73.9)]);
        assert_eq!(session.marker_count(), 1);
        assert_eq!(session.visible_layers().count(), 1);
        assert_eq!(session.layer(NoiseCategory::Alarms).unwrap().len(), 1);
        assert!(session.layer(NoiseCategory::LoudMusicParty).unwrap().is_empty());
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut session = ComplaintLayerSession::default();
        let first = session.begin();
        let second = session.begin();
        assert!(second > first);

        // First response arrives late
        assert_eq!(session.apply(first, &records()), RenderOutcome::Stale);
        assert!(session.layers().is_empty());

        let outcome = session.apply(second, &[ComplaintRecord::new("Alarms", 40.7, -73.9)]);
        assert!(matches!(outcome, RenderOutcome::Rendered { markers: 1, .. }));

        // A duplicate delivery is stale as well
        assert_eq!(session.apply(second, &records()), RenderOutcome::Stale);
        assert_eq!(session.marker_count(), 1);
    }

    #[test]
    fn test_records_without_coordinates_are_skipped() {
        let mut session = ComplaintLayerSession::default();
        let mut bad = ComplaintRecord::new("Alarms", 0.0, 0.0);
        bad.latitude = None;

        let token = session.begin();
        let outcome = session.apply(
            token,
            &[bad.clone(), ComplaintRecord::new("Alarms", 40.7, -73.9)],
        );
        assert!(matches!(
            outcome,
            RenderOutcome::Rendered {
                markers: 1,
                skipped: 1,
                ..
            }
        ));

        let token = session.begin();
        assert_eq!(session.apply(token, &[bad]), RenderOutcome::Empty);
        assert!(session.control().is_none());
    }

    #[test]
    fn test_toggle_layer() {
        let mut session = ComplaintLayerSession::default();
        let token = session.begin();
        session.apply(token, &records());

        session.set_layer_visible(NoiseCategory::LoudMusicParty, false);
        assert_eq!(session.visible_layers().count(), 2);
        session.set_layer_visible(NoiseCategory::Alarms, true);
        assert_eq!(session.visible_layers().count(), 3);
    }
}
