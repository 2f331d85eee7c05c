//! iCalendar booking invites

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{ExportError, CRLF};

pub const MAX_BOOKING_MINUTES: u32 = 480;

const ICS_TIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";

#[derive(Debug, Clone)]
pub struct BookingEvent {
    pub uid: Uuid,
    pub start: DateTime<Utc>,
    pub duration_minutes: u32,
    pub summary: String,
}

/// `PT30M`, `PT1H`, `PT1H30M`
fn format_duration(minutes: u32) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("PT{}M", m),
        (h, 0) => format!("PT{}H", h),
        (h, m) => format!("PT{}H{}M", h, m),
    }
}

/// Render a single-event calendar. `stamp` becomes `DTSTAMP`.
pub fn booking_ics(event: &BookingEvent, stamp: DateTime<Utc>) -> Result<String, ExportError> {
    if !(1..=MAX_BOOKING_MINUTES).contains(&event.duration_minutes) {
        return Err(ExportError::InvalidDuration {
            got: event.duration_minutes,
            max: MAX_BOOKING_MINUTES,
        });
    }

    let lines = [
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        "PRODID:-//cardlink//booking//EN".to_string(),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}@cardlink", event.uid),
        format!("DTSTAMP:{}", stamp.format(ICS_TIME_FORMAT)),
        format!("DTSTART:{}", event.start.format(ICS_TIME_FORMAT)),
        format!("DURATION:{}", format_duration(event.duration_minutes)),
        format!("SUMMARY:{}", event.summary),
        "END:VEVENT".to_string(),
        "END:VCALENDAR".to_string(),
    ];

    let mut out = lines.join(CRLF);
    out.push_str(CRLF);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(minutes: u32) -> BookingEvent {
        BookingEvent {
            uid: Uuid::nil(),
            start: Utc.with_ymd_and_hms(2024, 5, 6, 14, 30, 0).unwrap(),
            duration_minutes: minutes,
            summary: "Meeting with Jane Doe".into(),
        }
    }

    #[test]
    fn renders_event_fields_in_order() {
        let stamp = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let ics = booking_ics(&event(45), stamp).unwrap();
        let lines: Vec<&str> = ics.split("\r\n").collect();

        assert_eq!(lines[5], "DTSTAMP:20240501T090000Z");
        assert_eq!(lines[6], "DTSTART:20240506T143000Z");
        assert_eq!(lines[7], "DURATION:PT45M");
        assert_eq!(lines[8], "SUMMARY:Meeting with Jane Doe");
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn duration_formats() {
        assert_eq!(format_duration(30), "PT30M");
        assert_eq!(format_duration(60), "PT1H");
        assert_eq!(format_duration(90), "PT1H30M");
    }

    #[test]
    fn rejects_out_of_range_duration() {
        let stamp = Utc::now();
        assert!(booking_ics(&event(0), stamp).is_err());
        assert!(booking_ics(&event(481), stamp).is_err());
    }
}
