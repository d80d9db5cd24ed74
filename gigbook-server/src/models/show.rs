//! Show record and its submission form

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::validation::{FormErrors, ValidationError};

/// Naive formats accepted for `start_time`, read as UTC
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Show record from database; `(venue_id, artist_id)` is its identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Show {
    pub venue_id: i32,
    pub artist_id: i32,
    pub start_time: DateTime<Utc>,
}

/// Show joined with both sides, for the shows page
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ShowListing {
    pub venue_id: i32,
    pub venue_name: String,
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// Show form as submitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowForm {
    pub venue_id: Option<i32>,
    pub artist_id: Option<i32>,
    pub start_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidShow {
    pub(crate) venue_id: i32,
    pub(crate) artist_id: i32,
    pub(crate) start_time: DateTime<Utc>,
}

impl ShowForm {
    /// Blank form with the start time preset to `now`.
    pub fn blank(now: DateTime<Utc>) -> Self {
        Self {
            start_time: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<ValidShow, FormErrors> {
        let mut errors = FormErrors::new();

        let venue_id = errors.check(positive_id("venue_id", self.venue_id));
        let artist_id = errors.check(positive_id("artist_id", self.artist_id));
        let start_time = match parse_start_time(&self.start_time) {
            Ok(t) => Some(t),
            Err(err) => {
                errors.push(err);
                None
            }
        };

        match start_time {
            Some(start_time) => errors.finish(ValidShow {
                venue_id,
                artist_id,
                start_time,
            }),
            None => Err(errors),
        }
    }
}

fn positive_id(field: &'static str, id: Option<i32>) -> Result<i32, ValidationError> {
    match id {
        None => Err(ValidationError::Required { field }),
        Some(id) if id <= 0 => Err(ValidationError::InvalidFormat {
            field,
            reason: "must be a positive id",
        }),
        Some(id) => Ok(id),
    }
}

/// RFC 3339, or one of [`NAIVE_FORMATS`] taken as UTC.
pub fn parse_start_time(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: "start_time",
        });
    }

    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Ok(t.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or(ValidationError::InvalidFormat {
            field: "start_time",
            reason: "must be a date and time like 2026-05-21 21:30:00",
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn accepts_rfc3339_and_naive_times() {
        let expected = Utc.with_ymd_and_hms(2026, 5, 21, 21, 30, 0).unwrap();
        assert_eq!(parse_start_time("2026-05-21T21:30:00Z").unwrap(), expected);
        assert_eq!(parse_start_time("2026-05-21T23:30:00+02:00").unwrap(), expected);
        assert_eq!(parse_start_time("2026-05-21 21:30:00").unwrap(), expected);
        assert_eq!(parse_start_time("2026-05-21 21:30").unwrap(), expected);
        assert_eq!(parse_start_time("2026-05-21T21:30").unwrap(), expected);
    }

    #[test]
    fn rejects_garbage_time() {
        assert!(matches!(
            parse_start_time("next friday"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            parse_start_time(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn form_reports_every_bad_field() {
        let form = ShowForm {
            venue_id: None,
            artist_id: Some(0),
            start_time: "soon".into(),
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("venue_id"));
        assert!(errors.has("artist_id"));
        assert!(errors.has("start_time"));
    }

    #[test]
    fn valid_form() {
        let form = ShowForm {
            venue_id: Some(1),
            artist_id: Some(4),
            start_time: "2019-05-21T21:30:00Z".into(),
        };
        let show = form.validate().unwrap();
        assert_eq!(show.venue_id, 1);
        assert_eq!(show.artist_id, 4);
    }

    #[test]
    fn blank_form_round_trips_its_start_time() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 18, 0, 0).unwrap();
        let form = ShowForm::blank(now);
        assert_eq!(parse_start_time(&form.start_time).unwrap(), now);
    }
}
