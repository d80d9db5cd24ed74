//! Venue record, its submission form and the edit patch

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::choices::{parse_genres, parse_state};
use super::validation::{
    optional_facebook_url, optional_phone, optional_text, optional_url, required_text, FormErrors,
};

pub(crate) const MAX_NAME_LEN: usize = 200;
pub(crate) const MAX_FIELD_LEN: usize = 120;
pub(crate) const MAX_LONG_FIELD_LEN: usize = 500;

/// Venue record from database
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Venue {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

/// Venue form as submitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

/// Venue fields that passed validation, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct ValidVenue {
    pub(crate) name: String,
    pub(crate) city: String,
    pub(crate) state: String,
    pub(crate) address: String,
    pub(crate) phone: Option<String>,
    pub(crate) image_link: Option<String>,
    pub(crate) facebook_link: Option<String>,
    pub(crate) website: Option<String>,
    pub(crate) genres: Vec<String>,
    pub(crate) seeking_talent: bool,
    pub(crate) seeking_description: Option<String>,
}

impl ValidVenue {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl VenueForm {
    /// Check every field, collecting all failures.
    ///
    /// Text is trimmed, blank optional fields become `None`, the state is
    /// upper-cased and genres take their canonical spelling.
    pub fn validate(&self) -> Result<ValidVenue, FormErrors> {
        let mut errors = FormErrors::new();

        let venue = ValidVenue {
            name: errors.check(required_text("name", &self.name, MAX_NAME_LEN)),
            city: errors.check(required_text("city", &self.city, MAX_FIELD_LEN)),
            state: errors.check(parse_state("state", &self.state)),
            address: errors.check(required_text("address", &self.address, MAX_FIELD_LEN)),
            phone: errors.check(optional_phone("phone", self.phone.as_deref(), MAX_FIELD_LEN)),
            image_link: errors.check(optional_url(
                "image_link",
                self.image_link.as_deref(),
                MAX_LONG_FIELD_LEN,
            )),
            facebook_link: errors.check(optional_facebook_url(
                "facebook_link",
                self.facebook_link.as_deref(),
                MAX_FIELD_LEN,
            )),
            website: errors.check(optional_url("website", self.website.as_deref(), MAX_FIELD_LEN)),
            genres: errors.check(parse_genres("genres", &self.genres)),
            seeking_talent: self.seeking_talent,
            seeking_description: errors.check(optional_text(
                "seeking_description",
                self.seeking_description.as_deref(),
                MAX_LONG_FIELD_LEN,
            )),
        };

        errors.finish(venue)
    }
}

impl From<&Venue> for VenueForm {
    fn from(venue: &Venue) -> Self {
        Self {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone(),
            image_link: venue.image_link.clone(),
            facebook_link: venue.facebook_link.clone(),
            website: venue.website.clone(),
            genres: venue.genres.clone(),
            seeking_talent: venue.seeking_talent,
            seeking_description: venue.seeking_description.clone(),
        }
    }
}

/// Partial venue update.
///
/// Absent fields keep the stored value. A present but blank optional field
/// clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenuePatch {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Option<Vec<String>>,
    pub seeking_talent: Option<bool>,
    pub seeking_description: Option<String>,
}

impl VenuePatch {
    /// Merge onto the stored venue, producing the form to validate.
    pub fn apply(self, venue: &Venue) -> VenueForm {
        let mut form = VenueForm::from(venue);
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(city) = self.city {
            form.city = city;
        }
        if let Some(state) = self.state {
            form.state = state;
        }
        if let Some(address) = self.address {
            form.address = address;
        }
        if self.phone.is_some() {
            form.phone = self.phone;
        }
        if self.image_link.is_some() {
            form.image_link = self.image_link;
        }
        if self.facebook_link.is_some() {
            form.facebook_link = self.facebook_link;
        }
        if self.website.is_some() {
            form.website = self.website;
        }
        if let Some(genres) = self.genres {
            form.genres = genres;
        }
        if let Some(seeking) = self.seeking_talent {
            form.seeking_talent = seeking;
        }
        if self.seeking_description.is_some() {
            form.seeking_description = self.seeking_description;
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fillmore_form() -> VenueForm {
        VenueForm {
            name: "The Fillmore".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            address: "1805 Geary St".into(),
            genres: vec!["Rock".into()],
            ..Default::default()
        }
    }

    fn stored() -> Venue {
        Venue {
            id: 7,
            name: "The Fillmore".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            address: "1805 Geary St".into(),
            phone: Some("415-346-6000".into()),
            image_link: None,
            facebook_link: None,
            website: Some("https://thefillmore.com".into()),
            genres: vec!["Rock".into()],
            seeking_talent: true,
            seeking_description: Some("Looking for openers".into()),
        }
    }

    #[test]
    fn valid_form_passes() {
        let venue = fillmore_form().validate().unwrap();
        assert_eq!(venue.name(), "The Fillmore");
        assert_eq!(venue.genres, vec!["Rock"]);
        assert!(!venue.seeking_talent);
    }

    #[test]
    fn missing_required_fields_are_all_reported() {
        let form = VenueForm {
            name: "Nowhere".into(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("city"));
        assert!(errors.has("state"));
        assert!(errors.has("address"));
        assert!(!errors.has("name"));
    }

    #[test]
    fn blank_optionals_become_none() {
        let form = VenueForm {
            phone: Some("".into()),
            website: Some("   ".into()),
            ..fillmore_form()
        };
        let venue = form.validate().unwrap();
        assert_eq!(venue.phone, None);
        assert_eq!(venue.website, None);
    }

    #[test]
    fn bad_phone_and_genre_rejected() {
        let form = VenueForm {
            phone: Some("call us".into()),
            genres: vec!["Polka".into()],
            ..fillmore_form()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("phone"));
        assert!(errors.has("genres"));
    }

    #[test]
    fn empty_patch_keeps_everything() {
        let venue = stored();
        let form = VenuePatch::default().apply(&venue);
        assert_eq!(form, VenueForm::from(&venue));
    }

    #[test]
    fn patch_overrides_only_present_fields() {
        let venue = stored();
        let patch = VenuePatch {
            city: Some("Oakland".into()),
            seeking_talent: Some(false),
            ..Default::default()
        };
        let form = patch.apply(&venue);
        assert_eq!(form.city, "Oakland");
        assert!(!form.seeking_talent);
        assert_eq!(form.phone.as_deref(), Some("415-346-6000"));
        assert_eq!(form.seeking_description.as_deref(), Some("Looking for openers"));
    }

    #[test]
    fn blank_patch_value_clears_optional_field() {
        let patch = VenuePatch {
            website: Some(String::new()),
            ..Default::default()
        };
        let valid = patch.apply(&stored()).validate().unwrap();
        assert_eq!(valid.website, None);
        assert_eq!(valid.phone.as_deref(), Some("415-346-6000"));
    }

    #[test]
    fn patch_cannot_blank_required_field() {
        let patch = VenuePatch {
            name: Some("  ".into()),
            ..Default::default()
        };
        let errors = patch.apply(&stored()).validate().unwrap_err();
        assert!(errors.has("name"));
    }
}
