//! Spreadsheet export of a job's applicants as CSV.

use anyhow::Result;

use crate::models::application::ApplicantRow;
use crate::models::user::full_name;

pub const HEADERS: [&str; 9] = [
    "Name",
    "Username",
    "Email",
    "Phone",
    "Resume",
    "City",
    "State",
    "Country",
    "Applied At",
];

/// Renders one header row plus one row per applicant, in the given order.
pub fn render_applicants_csv(rows: &[ApplicantRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    for row in rows {
        let name = full_name(row.first_name.as_deref(), row.last_name.as_deref());
        let applied_at = row.applied_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();
        writer.write_record([
            name.as_str(),
            row.username.as_str(),
            row.email.as_str(),
            row.phone_number.as_deref().unwrap_or("N/A"),
            row.resume.as_deref().unwrap_or("N/A"),
            row.city.as_deref().unwrap_or(""),
            row.state.as_deref().unwrap_or(""),
            row.country.as_deref().unwrap_or(""),
            applied_at.as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("CSV flush failed: {}", e.error()))
}

/// `applications_<title>.csv`, whitespace runs in the title collapsed to `_`.
pub fn export_filename(job_title: &str) -> String {
    let title = job_title.split_whitespace().collect::<Vec<_>>().join("_");
    format!("applications_{title}.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn applicant(username: &str) -> ApplicantRow {
        ApplicantRow {
            application_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: Some("Alice".to_string()),
            last_name: Some("Liddell".to_string()),
            phone_number: None,
            city: Some("Pune".to_string()),
            state: None,
            country: Some("India".to_string()),
            resume: None,
            status: "Pending".to_string(),
            current_round: 1,
            applied_at: Utc.with_ymd_and_hms(2025, 3, 4, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_export_has_header_and_one_row_per_applicant() {
        let bytes = render_applicants_csv(&[applicant("alice"), applicant("bob")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Name,Username,Email,Phone,Resume,City,State,Country,Applied At"
        );
        assert_eq!(
            lines[1],
            "Alice Liddell,alice,alice@example.com,N/A,N/A,Pune,,India,2025-03-04 10:30:00 UTC"
        );
    }

    #[test]
    fn test_export_quotes_fields_with_commas() {
        let mut row = applicant("carol");
        row.city = Some("Portland, OR".to_string());
        let text = String::from_utf8(render_applicants_csv(&[row]).unwrap()).unwrap();
        assert!(text.contains("\"Portland, OR\""));
    }

    #[test]
    fn test_export_of_no_applicants_is_header_only() {
        let text = String::from_utf8(render_applicants_csv(&[]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_export_filename_collapses_whitespace() {
        assert_eq!(
            export_filename("Senior  Backend\tEngineer"),
            "applications_Senior_Backend_Engineer.csv"
        );
    }
}
