use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Link {
    pub title: String,
    pub href: String, // always absolute
}

impl Link {
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Classification {
    Advisory,
    Board,
    City,
    Commission,
    Committee,
    Forum,
    Police,
    #[serde(rename = "Not classified")]
    NotClassified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Cancelled,
    Tentative,
    Confirmed,
    Passed,
}

impl std::fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            MeetingStatus::Cancelled => "cancelled",
            MeetingStatus::Tentative => "tentative",
            MeetingStatus::Confirmed => "confirmed",
            MeetingStatus::Passed => "passed",
        };
        write!(f, "{value}")
    }
}

/// One meeting as published on the agency page.
///
/// `status` and `id` are derived from the other fields when the record is
/// built and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MeetingRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub classification: Classification,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>, // the page never lists one
    pub all_day: bool,
    pub time_notes: String,
    pub location: Location,
    pub links: Vec<Link>,
    pub source: String,
    pub status: MeetingStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&MeetingStatus::Passed).unwrap();
        assert_eq!(json, "\"passed\"");
        assert_eq!(MeetingStatus::Cancelled.to_string(), "cancelled");
    }

    #[test]
    fn test_start_serializes_as_naive_iso() {
        let start = NaiveDate::from_ymd_opt(2023, 6, 12)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        let record = MeetingRecord {
            id: "bisnd_bcpc/202306121800/x/meeting".to_string(),
            title: "Meeting".to_string(),
            description: String::new(),
            classification: Classification::Commission,
            start,
            end: None,
            all_day: false,
            time_notes: String::new(),
            location: Location {
                name: "Room".to_string(),
                address: "Street".to_string(),
            },
            links: vec![Link::new("Video", "https://example.com/video")],
            source: "https://example.com/".to_string(),
            status: MeetingStatus::Passed,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["start"], "2023-06-12T18:00:00");
        assert_eq!(value["end"], serde_json::Value::Null);
        assert_eq!(value["classification"], "Commission");
        assert_eq!(value["links"][0]["href"], "https://example.com/video");
    }
}
