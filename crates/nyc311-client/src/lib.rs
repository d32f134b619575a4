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

//! Client library for mapping NYC 311 noise complaints.
//!
//! The library has no GUI dependency. It is split into layers that can be
//! used on their own:
//!
//! - **Query layer**: SODA query URLs for a date range ([`query`])
//! - **Classification layer**: the eighteen noise categories and the rule
//!   list that buckets descriptors into them ([`category`])
//! - **Layer state**: complaint marker layers, the legend control and request
//!   sequencing ([`session`]), plus the neighborhood overlay ([`neighborhood`])
//! - **Transport**: blocking HTTP for the open-data endpoints ([`fetch`])
//!
//! # Quick Start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use nyc311_client::{build_query, ComplaintLayerSession, OpenDataClient, RenderOutcome};
//!
//! let url = build_query(
//!     NaiveDate::from_ymd_opt(2015, 7, 1),
//!     NaiveDate::from_ymd_opt(2015, 7, 2),
//! );
//!
//! let client = OpenDataClient::new().unwrap();
//! let mut session = ComplaintLayerSession::default();
//! let token = session.begin();
//! let records = client.complaints(&url).unwrap();
//!
//! if let RenderOutcome::Rendered { markers, bounds, .. } = session.apply(token, &records) {
//!     println!("{markers} markers from {:?} to {:?}", bounds.south_west, bounds.north_east);
//! }
//! ```
//!
//! # Classification Only
//!
//! ```
//! use nyc311_client::{Classifier, NoiseCategory};
//!
//! let classifier = Classifier::standard();
//! assert_eq!(classifier.classify("Loud Music/Party"), NoiseCategory::LoudMusicParty);
//! assert_eq!(classifier.classify("Noise: Boat"), NoiseCategory::Others);
//! ```

pub mod category;
pub mod fetch;
pub mod location;
pub mod neighborhood;
pub mod query;
pub mod record;
pub mod session;
pub mod style;

pub use category::{Classification, Classifier, NoiseCategory, Predicate, Rule};
pub use fetch::{FetchError, OpenDataClient};
pub use location::{Bounds, LatLon};
pub use neighborhood::{FillMesh, HoverChange, Neighborhood, NeighborhoodLayer};
pub use query::{build_query, formatted_date, ComplaintQuery};
pub use record::ComplaintRecord;
pub use session::{
    ComplaintLayerSession, LayerControl, LegendEntry, Marker, MarkerLayer, RenderOutcome,
    RequestToken,
};
pub use style::{MarkerStyle, PolygonStyle, Rgb};
