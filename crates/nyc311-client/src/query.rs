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

//! SODA query construction for the 311 service-request dataset.
//!
//! A query filters to geolocated records of one complaint type created inside
//! an inclusive date range, groups by the returned fields and selects only
//! descriptor, coordinates and complaint type. The assembled URL is escaped
//! with `encodeURI` rules, so the SoQL punctuation (`$`, `'`, `(`, `=`) passes
//! through untouched.

use chrono::{Local, NaiveDate};

/// 311 service requests, 2010 to present.
pub const DEFAULT_ENDPOINT: &str = "https://data.cityofnewyork.us/resource/erm2-nwe9.json";

pub const NOISE_COMPLAINT_TYPE: &str = "Noise";

/// Fields returned per record, also used as the grouping key.
const SELECT_FIELDS: &str = "descriptor,latitude,longitude,complaint_type";
const GROUP_FIELDS: &str = "complaint_type,descriptor,latitude,longitude";

/// Render a date as `YYYY-MM-DD`. `None` means today.
#[must_use]
pub fn formatted_date(date: Option<NaiveDate>) -> String {
    date.unwrap_or_else(|| Local::now().date_naive())
        .format("%Y-%m-%d")
        .to_string()
}

/// Noise complaints between two dates against the default endpoint.
#[must_use]
pub fn build_query(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    ComplaintQuery::noise(start, end).url()
}

/// A date-ranged complaint query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintQuery {
    pub endpoint: String,
    pub complaint_type: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ComplaintQuery {
    #[must_use]
    pub fn noise(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            complaint_type: NOISE_COMPLAINT_TYPE.to_string(),
            start,
            end,
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// The `$where` clause, unescaped.
    #[must_use]
    pub fn where_clause(&self) -> String {
        format!(
            "(latitude IS NOT NULL) AND (complaint_type='{}') AND (created_date>='{}') AND (created_date<='{}')",
            self.complaint_type,
            formatted_date(self.start),
            formatted_date(self.end),
        )
    }

    /// Full request URL, unescaped.
    #[must_use]
    pub fn raw_url(&self) -> String {
        format!(
            "{}?$where={}&$group={}&$select={}",
            self.endpoint,
            self.where_clause(),
            GROUP_FIELDS,
            SELECT_FIELDS,
        )
    }

    /// Full request URL, escaped for the wire.
    #[must_use]
    pub fn url(&self) -> String {
        encode_uri(&self.raw_url())
    }
}

/// Characters `encodeURI` leaves alone besides ASCII alphanumerics.
const URI_UNESCAPED: &[u8] = b";,/?:@&=+$-_.!~*'()#";

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Percent-encode everything outside the URI reserved and unreserved sets.
#[must_use]
pub fn encode_uri(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || URI_UNESCAPED.contains(&byte) {
            out.push(char::from(byte));
        } else {
            out.push('%');
            out.push(char::from(HEX_DIGITS[usize::from(byte >> 4)]));
            out.push(char::from(HEX_DIGITS[usize::from(byte & 0x0f)]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_formatted_date_zero_pads() {
        assert_eq!(formatted_date(date(2021, 1, 5)), "2021-01-05");
        assert_eq!(formatted_date(date(2014, 11, 23)), "2014-11-23");
    }

    #[test]
    fn test_formatted_date_defaults_to_today() {
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(formatted_date(None), today);
    }

    #[test]
    fn test_build_query_exact_url() {
        let url = build_query(date(2021, 1, 5), date(2021, 1, 6));
        assert_eq!(
            url,
            "https://data.cityofnewyork.us/resource/erm2-nwe9.json\
             ?$where=(latitude%20IS%20NOT%20NULL)%20AND%20(complaint_type='Noise')\
             %20AND%20(created_date%3E='2021-01-05')%20AND%20(created_date%3C='2021-01-06')\
             &$group=complaint_type,descriptor,latitude,longitude\
             &$select=descriptor,latitude,longitude,complaint_type"
        );
    }

    #[test]
    fn test_build_query_is_deterministic() {
        let a = build_query(date(2015, 7, 4), date(2015, 7, 31));
        let b = build_query(date(2015, 7, 4), date(2015, 7, 31));
        assert_eq!(a, b);
    }

    #[test]
    fn test_inverted_range_is_not_rejected() {
        let url = build_query(date(2021, 2, 1), date(2021, 1, 1));
        assert!(url.contains("created_date%3E='2021-02-01'"));
        assert!(url.contains("created_date%3C='2021-01-01'"));
    }

    #[test]
    fn test_custom_endpoint() {
        let query = ComplaintQuery::noise(date(2020, 3, 1), date(2020, 3, 2))
            .with_endpoint("http://localhost:8080/erm2-nwe9.json");
        assert!(query.url().starts_with("http://localhost:8080/erm2-nwe9.json?$where="));
    }

    #[test]
    fn test_encode_uri() {
        assert_eq!(encode_uri("a b"), "a%20b");
        assert_eq!(encode_uri("x<=y>"), "x%3C=y%3E");
        assert_eq!(encode_uri("http://h/p?a=1&b='c'#f"), "http://h/p?a=1&b='c'#f");
        assert_eq!(encode_uri("\"%"), "%22%25");
        assert_eq!(encode_uri("é"), "%C3%A9");
        assert_eq!(encode_uri("\t\u{7f}"), "%09%7F");
    }
}
