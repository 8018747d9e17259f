use chrono::NaiveDateTime;

use crate::schema::MeetingStatus;

const CANCELLED_MARKERS: &[&str] = &["cancel", "rescheduled"];

/// Lifecycle state of a meeting relative to `now`.
///
/// `text` is any extra page text tied to the meeting; a cancellation marker
/// in it, the title or the description wins over the clock. `now` must be in
/// the same local zone as `start`.
pub fn classify_status(
    title: &str,
    description: &str,
    text: &str,
    start: NaiveDateTime,
    now: NaiveDateTime,
) -> MeetingStatus {
    let haystack = format!("{title} {description} {text}").to_lowercase();
    if CANCELLED_MARKERS
        .iter()
        .any(|marker| haystack.contains(marker))
    {
        return MeetingStatus::Cancelled;
    }
    if start < now {
        return MeetingStatus::Passed;
    }
    MeetingStatus::Tentative
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 6, d)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_past_meeting_passed() {
        assert_eq!(
            classify_status("Monthly Meeting", "", "", day(12), day(13)),
            MeetingStatus::Passed
        );
    }

    #[test]
    fn test_future_meeting_tentative() {
        assert_eq!(
            classify_status("Monthly Meeting", "", "", day(12), day(1)),
            MeetingStatus::Tentative
        );
        assert_eq!(
            classify_status("Monthly Meeting", "", "", day(12), day(12)),
            MeetingStatus::Tentative
        );
    }

    #[test]
    fn test_cancellation_beats_clock() {
        assert_eq!(
            classify_status("Monthly Meeting", "", "CANCELLED", day(12), day(13)),
            MeetingStatus::Cancelled
        );
        assert_eq!(
            classify_status("Monthly Meeting (Rescheduled)", "", "", day(12), day(1)),
            MeetingStatus::Cancelled
        );
    }
}
