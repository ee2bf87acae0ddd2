// src/vnface_client.rs

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::report::month_span;

// --- Constants ---

pub const VNFACE_CHECKIN_URL: &str =
    "https://api-vnface.vnpt.vn/checkin-service/his-checkin/list-filter";
// A month has at most 31 records, one page is always enough.
const PAGE_SIZE: u32 = 50;
const REQUEST_TIMEOUT_SECS: u64 = 30;

// --- vnFace API Data Structures ---

// One calendar day with check-in activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// Calendar date, `DD/MM/YYYY`.
    pub date_checkin: String,
    /// First check-in of the day, `HH:MM`.
    pub first_checkin: String,
    /// Last check-in of the day, `HH:MM`.
    pub last_checkin: String,
    /// Number of check-in events that day.
    pub total_checkin: u32,
    pub username: String,
}

impl AttendanceRecord {
    /// Day-of-month parsed from the leading `DD` of `dateCheckin`.
    /// A record with an unparsable date never matches a calendar day.
    pub fn day_of_month(&self) -> Option<u32> {
        self.date_checkin.split('/').next()?.parse().ok()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckinListResponse {
    pub object: Option<CheckinPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckinPage {
    #[serde(default)]
    pub data: Vec<AttendanceRecord>,
}

// --- Error Type ---

#[derive(Error, Debug)]
pub enum VnfaceError {
    #[error("could not reach the check-in service")]
    Request(#[from] reqwest::Error),

    #[error("URL parsing error")]
    UrlParse(#[from] url::ParseError),

    #[error("check-in service returned an error: Status={status}, Message='{message}'")]
    Api { status: StatusCode, message: String },

    #[error("access token not available (set VNFACE_ACCESS_TOKEN)")]
    MissingToken,

    #[error("invalid report period {month:02}/{year}")]
    InvalidPeriod { month: u32, year: i32 },
}

/// Build the month query exactly as the vnFace console issues it: the whole
/// month as a `DD/MM/YYYY hh:mm:ss` date range plus the fixed filter
/// parameters that keep the time filters wide open.
fn build_checkin_url(month: u32, year: i32) -> Result<Url, VnfaceError> {
    let (first_day, last_day) =
        month_span(month, year).ok_or(VnfaceError::InvalidPeriod { month, year })?;
    let start_date = format!("{} 00:00:00", first_day.format("%d/%m/%Y"));
    let end_date = format!("{} 23:59:59", last_day.format("%d/%m/%Y"));
    let max_size = PAGE_SIZE.to_string();

    let url = Url::parse_with_params(
        VNFACE_CHECKIN_URL,
        &[
            ("startDate", start_date.as_str()),
            ("endDate", end_date.as_str()),
            ("keySearch", ""),
            ("page", "1"),
            ("maxSize", max_size.as_str()),
            ("uuidDevice", ""),
            ("type", "ALL"),
            ("minFirstCheckin", "00:00"),
            ("maxFirstCheckin", "23:59"),
            ("minLastCheckin", "00:00"),
            ("maxLastCheckin", "23:59"),
        ],
    )?;

    Ok(url)
}

// --- Client Implementation ---

pub struct VnfaceClient {
    http_client: Client,
    access_token: String,
}

impl VnfaceClient {
    pub fn new(access_token: String) -> Result<Self, VnfaceError> {
        if access_token.trim().is_empty() {
            return Err(VnfaceError::MissingToken);
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            access_token,
        })
    }

    /// Fetch every check-in record for the given month, in service order.
    ///
    /// A single attempt, no retry: the report either gets the full month or
    /// fails loudly. An empty record list is a valid response here; the
    /// caller decides whether that is fatal.
    pub async fn fetch_month(
        &self,
        month: u32,
        year: i32,
    ) -> Result<Vec<AttendanceRecord>, VnfaceError> {
        let url = build_checkin_url(month, year)?;
        debug!("Querying check-in list: {}", url);

        let response = self
            .http_client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token))
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VnfaceError::Api { status, message });
        }

        let payload: CheckinListResponse = response.json().await?;
        let records = payload.object.map(|page| page.data).unwrap_or_default();
        debug!(
            "Fetched {} check-in record(s) for {:02}/{}",
            records.len(),
            month,
            year
        );

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_envelope_deserializes_records() {
        let json = r#"{
            "object": {
                "data": [
                    {
                        "dateCheckin": "03/02/2024",
                        "firstCheckin": "07:12",
                        "lastCheckin": "17:45",
                        "totalCheckin": 4,
                        "username": "nva.test"
                    }
                ]
            }
        }"#;

        let payload: CheckinListResponse = serde_json::from_str(json).expect("valid payload");
        let page = payload.object.expect("object present");
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].date_checkin, "03/02/2024");
        assert_eq!(page.data[0].total_checkin, 4);
        assert_eq!(page.data[0].username, "nva.test");
    }

    #[test]
    fn test_response_envelope_tolerates_missing_data_path() {
        let payload: CheckinListResponse =
            serde_json::from_str(r#"{ "object": null }"#).expect("valid payload");
        assert!(payload.object.is_none());

        let payload: CheckinListResponse =
            serde_json::from_str(r#"{ "object": {} }"#).expect("valid payload");
        assert!(payload.object.expect("object present").data.is_empty());
    }

    #[test]
    fn test_day_of_month_parses_leading_component() {
        let record = AttendanceRecord {
            date_checkin: "05/02/2024".to_string(),
            first_checkin: "07:00".to_string(),
            last_checkin: "17:00".to_string(),
            total_checkin: 2,
            username: "nva.test".to_string(),
        };
        assert_eq!(record.day_of_month(), Some(5));
    }

    #[test]
    fn test_day_of_month_rejects_garbage_dates() {
        let mut record = AttendanceRecord {
            date_checkin: "not-a-date".to_string(),
            first_checkin: "07:00".to_string(),
            last_checkin: "17:00".to_string(),
            total_checkin: 1,
            username: "nva.test".to_string(),
        };
        assert_eq!(record.day_of_month(), None);

        record.date_checkin = String::new();
        assert_eq!(record.day_of_month(), None);
    }

    #[test]
    fn test_checkin_url_spans_the_whole_month() {
        let url = build_checkin_url(2, 2024).expect("valid period");
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(url.as_str().starts_with(VNFACE_CHECKIN_URL));
        assert!(query.contains(&("startDate".to_string(), "01/02/2024 00:00:00".to_string())));
        assert!(query.contains(&("endDate".to_string(), "29/02/2024 23:59:59".to_string())));
        assert!(query.contains(&("page".to_string(), "1".to_string())));
        assert!(query.contains(&("maxSize".to_string(), "50".to_string())));
        assert!(query.contains(&("type".to_string(), "ALL".to_string())));
        assert!(query.contains(&("minFirstCheckin".to_string(), "00:00".to_string())));
        assert!(query.contains(&("maxLastCheckin".to_string(), "23:59".to_string())));
    }

    #[test]
    fn test_checkin_url_rejects_invalid_period() {
        assert!(matches!(
            build_checkin_url(13, 2024),
            Err(VnfaceError::InvalidPeriod { month: 13, year: 2024 })
        ));
    }

    #[test]
    fn test_missing_token_is_rejected() {
        assert!(matches!(
            VnfaceClient::new(String::new()),
            Err(VnfaceError::MissingToken)
        ));
        assert!(matches!(
            VnfaceClient::new("   ".to_string()),
            Err(VnfaceError::MissingToken)
        ));
    }
}
