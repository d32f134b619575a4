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

//! Path styles for markers and polygons.
//!
//! The fields mirror the usual slippy-map path options: fill color, stroke
//! weight and color, dash pattern and the two opacities. Renderers translate
//! them into whatever their painter understands.

use std::fmt;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Style of a circular point marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub fill_color: Rgb,
    /// Radius in screen pixels.
    pub radius: f32,
    /// Border width in screen pixels.
    pub weight: f32,
    pub opacity: f32,
    pub color: Rgb,
    /// Alternating dash/gap lengths; empty means a solid border.
    pub dash_array: Vec<f32>,
    pub fill_opacity: f32,
}

impl MarkerStyle {
    /// Complaint marker: radius 5, white dashed 1px border, 70% fill.
    #[must_use]
    pub fn complaint(fill_color: Rgb) -> Self {
        Self {
            fill_color,
            radius: 5.0,
            weight: 1.0,
            opacity: 1.0,
            color: Rgb::WHITE,
            dash_array: vec![3.0],
            fill_opacity: 0.7,
        }
    }
}

/// Style of a polygon outline and fill.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonStyle {
    pub fill_color: Rgb,
    pub weight: f32,
    pub opacity: f32,
    pub color: Rgb,
    pub dash_array: Vec<f32>,
    pub fill_opacity: f32,
}

impl PolygonStyle {
    /// Resting style of a neighborhood.
    #[must_use]
    pub fn neighborhood() -> Self {
        Self {
            fill_color: Rgb::new(0xff, 0xed, 0xa0),
            weight: 1.0,
            opacity: 1.0,
            color: Rgb::WHITE,
            dash_array: vec![3.0],
            fill_opacity: 0.7,
        }
    }

    /// Hover override. Only the listed options change, the fill color is kept.
    #[must_use]
    pub fn highlighted(&self) -> Self {
        Self {
            weight: 3.0,
            color: Rgb::new(0x66, 0x66, 0x66),
            dash_array: Vec::new(),
            fill_opacity: 0.7,
            ..self.clone()
        }
    }
}
