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

//! Complaint records as returned by the open-data endpoint.

use serde::{Deserialize, Deserializer};

use crate::location::LatLon;

/// One grouped row of the complaint query.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComplaintRecord {
    #[serde(default)]
    pub descriptor: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub complaint_type: String,
}

impl ComplaintRecord {
    #[must_use]
    pub fn new(descriptor: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            descriptor: descriptor.to_string(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            complaint_type: crate::query::NOISE_COMPLAINT_TYPE.to_string(),
        }
    }

    /// Coordinates, if both are present and finite.
    #[must_use]
    pub fn position(&self) -> Option<LatLon> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(LatLon::new(lat, lon))
            }
            _ => None,
        }
    }
}

/// Socrata serializes numbers as strings; accept both, and treat junk as absent.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        Some(Raw::Other(_)) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_string_coordinates() {
        let json = r#"[{"descriptor":"Loud Music/Party","latitude":"40.70012","longitude":"-73.90001","complaint_type":"Noise"}]"#;
        let records: Vec<ComplaintRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].position(),
            Some(LatLon::new(40.700_12, -73.900_01))
        );
        assert_eq!(records[0].complaint_type, "Noise");
    }

    #[test]
    fn test_parse_numeric_coordinates() {
        let json = r#"{"descriptor":"Alarms","latitude":40.7,"longitude":-73.9}"#;
        let record: ComplaintRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.position(), Some(LatLon::new(40.7, -73.9)));
        assert_eq!(record.complaint_type, "");
    }

    #[test]
    fn test_missing_or_bad_coordinates_have_no_position() {
        let json = r#"[
            {"descriptor":"Alarms","latitude":"40.7"},
            {"descriptor":"Alarms","latitude":"n/a","longitude":"-73.9"},
            {"descriptor":"Alarms","latitude":null,"longitude":"-73.9"}
        ]"#;
        let records: Vec<ComplaintRecord> = serde_json::from_str(json).unwrap();
        assert!(records.iter().all(|r| r.position().is_none()));
    }
}
