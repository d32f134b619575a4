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

//! Blocking HTTP access to the open-data endpoints.
//!
//! Every call is a single GET whose body is parsed once and returned. There is
//! no retry and no caching; callers run these on a worker thread.

use geojson::{FeatureCollection, GeoJson};
use log::debug;
use thiserror::Error;

use crate::neighborhood::{into_feature_collection, GeometryError, NeighborhoodLayer};
use crate::record::ComplaintRecord;

/// Community district polygons.
pub const DEFAULT_NEIGHBORHOODS_URL: &str =
    "https://nycdatastables.s3.amazonaws.com/2013-08-19T18:22:23.125Z/community-districts-polygon.geojson";

/// Street centerline export.
pub const DEFAULT_ROAD_MAP_URL: &str =
    "https://data.cityofnewyork.us/api/geospatial/svwp-sbcd?method=export&format=GeoJSON";

/// Errors that can occur while fetching a layer.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

fn parse_feature_collection(body: &str) -> Result<FeatureCollection, FetchError> {
    let geojson: GeoJson = body.parse()?;
    Ok(into_feature_collection(geojson)?)
}

/// Client for the 311 and boundary endpoints.
#[derive(Debug, Clone)]
pub struct OpenDataClient {
    http: reqwest::blocking::Client,
}

impl OpenDataClient {
    pub fn new() -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("noisemap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {url}");
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(response.text()?)
    }

    /// Run an encoded complaint query.
    pub fn complaints(&self, url: &str) -> Result<Vec<ComplaintRecord>, FetchError> {
        let body = self.get_text(url)?;
        let records: Vec<ComplaintRecord> = serde_json::from_str(&body)?;
        debug!("Received {} complaint records", records.len());
        Ok(records)
    }

    pub fn feature_collection(&self, url: &str) -> Result<FeatureCollection, FetchError> {
        parse_feature_collection(&self.get_text(url)?)
    }

    /// Fetch and build the neighborhood overlay.
    pub fn neighborhoods(&self, url: &str) -> Result<NeighborhoodLayer, FetchError> {
        let collection = self.feature_collection(url)?;
        Ok(NeighborhoodLayer::from_feature_collection(&collection))
    }
}
