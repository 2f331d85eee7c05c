//! CSV export of captured leads

use super::ExportError;
use crate::domain::leads::Lead;

const HEADER: [&str; 6] = ["name", "email", "phone", "company", "message", "created_at"];

pub fn leads_csv(leads: &[Lead]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for lead in leads {
        let created_at = lead.created_at.to_rfc3339();
        writer.write_record([
            lead.name.as_str(),
            lead.email.as_deref().unwrap_or_default(),
            lead.phone.as_deref().unwrap_or_default(),
            lead.company.as_deref().unwrap_or_default(),
            lead.message.as_deref().unwrap_or_default(),
            created_at.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Flush(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn lead(name: &str, message: Option<&str>) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            profile_id: Uuid::new_v4(),
            name: name.into(),
            email: Some("sam@example.com".into()),
            phone: None,
            company: None,
            message: message.map(Into::into),
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn empty_export_has_header_only() {
        let out = leads_csv(&[]).unwrap();
        assert_eq!(out, "name,email,phone,company,message,created_at\n");
    }

    #[test]
    fn quotes_fields_with_separators() {
        let out = leads_csv(&[lead("Sam, Jr.", Some("Hi \"there\""))]).unwrap();
        let row = out.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "\"Sam, Jr.\",sam@example.com,,,\"Hi \"\"there\"\"\",2024-01-02T03:04:05+00:00"
        );
    }
}
