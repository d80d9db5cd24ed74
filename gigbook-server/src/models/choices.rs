//! Fixed vocabularies offered by the forms: US states and music genres

use serde::Serialize;

use super::ValidationError;

/// Two-letter codes of the 50 states plus DC
pub const US_STATES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR",
    "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY",
];

/// Genre vocabulary in canonical spelling
pub const GENRES: [&str; 20] = [
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock",
    "Rock n Roll",
    "Soul",
    "Other",
];

/// Genres an artist gets when the form doesn't name any.
///
/// Lowercase, matching the column default. Edits that leave genres alone
/// keep this spelling; naming "Other" explicitly stores the canonical one.
pub const DEFAULT_ARTIST_GENRES: [&str; 1] = ["other"];

/// Choice lists sent along with blank and prefilled forms
#[derive(Debug, Clone, Serialize)]
pub struct FormChoices {
    pub states: &'static [&'static str],
    pub genres: &'static [&'static str],
}

impl Default for FormChoices {
    fn default() -> Self {
        Self {
            states: &US_STATES,
            genres: &GENRES,
        }
    }
}

/// Upper-cased state code, if it is one of [`US_STATES`].
pub fn parse_state(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let code = value.trim().to_ascii_uppercase();
    if code.is_empty() {
        return Err(ValidationError::Required { field });
    }
    if US_STATES.contains(&code.as_str()) {
        Ok(code)
    } else {
        Err(ValidationError::InvalidChoice {
            field,
            value: value.to_owned(),
        })
    }
}

/// Canonical spelling of a genre, matched case-insensitively.
pub fn canonical_genre(value: &str) -> Option<&'static str> {
    let value = value.trim();
    GENRES
        .iter()
        .copied()
        .find(|genre| genre.eq_ignore_ascii_case(value))
}

/// Canonical genres in submission order, duplicates dropped.
pub fn parse_genres(field: &'static str, values: &[String]) -> Result<Vec<String>, ValidationError> {
    let mut genres: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let genre = canonical_genre(value).ok_or_else(|| ValidationError::InvalidChoice {
            field,
            value: value.clone(),
        })?;
        if !genres.iter().any(|g| g == genre) {
            genres.push(genre.to_owned());
        }
    }
    Ok(genres)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_are_unique() {
        let mut sorted = US_STATES.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), US_STATES.len());
    }

    #[test]
    fn state_codes_are_case_insensitive() {
        assert_eq!(parse_state("state", "ca").unwrap(), "CA");
        assert_eq!(parse_state("state", " NY ").unwrap(), "NY");
        assert!(matches!(
            parse_state("state", "ZZ"),
            Err(ValidationError::InvalidChoice { .. })
        ));
        assert!(matches!(
            parse_state("state", ""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn genres_are_canonicalised_and_deduplicated() {
        let input = vec!["rock".to_string(), "JAZZ".to_string(), "Rock".to_string()];
        assert_eq!(parse_genres("genres", &input).unwrap(), vec!["Rock", "Jazz"]);
    }

    #[test]
    fn unknown_genre_is_rejected() {
        let input = vec!["Rock".to_string(), "Polka".to_string()];
        let err = parse_genres("genres", &input).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidChoice {
                field: "genres",
                value: "Polka".into()
            }
        );
    }

    #[test]
    fn default_artist_genre_is_in_vocabulary() {
        for genre in DEFAULT_ARTIST_GENRES {
            assert!(canonical_genre(genre).is_some());
        }
    }
}
