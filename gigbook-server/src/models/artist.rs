//! Artist record, its submission form and the edit patch

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::choices::{parse_genres, parse_state, DEFAULT_ARTIST_GENRES};
use super::validation::{
    optional_facebook_url, optional_phone, optional_text, optional_url, required_text, FormErrors,
};
use super::venue::{MAX_FIELD_LEN, MAX_LONG_FIELD_LEN, MAX_NAME_LEN};

/// Artist record from database
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Artist {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Vec<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub website: Option<String>,
}

/// Artist form as submitted.
///
/// `genres: None` means the submitter didn't pick any and the artist gets
/// [`DEFAULT_ARTIST_GENRES`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub genres: Option<Vec<String>>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidArtist {
    pub(crate) name: String,
    pub(crate) city: String,
    pub(crate) state: String,
    pub(crate) phone: Option<String>,
    pub(crate) genres: Vec<String>,
    pub(crate) image_link: Option<String>,
    pub(crate) facebook_link: Option<String>,
    pub(crate) seeking_venue: bool,
    pub(crate) seeking_description: Option<String>,
    pub(crate) website: Option<String>,
}

impl ValidArtist {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ArtistForm {
    pub fn validate(&self) -> Result<ValidArtist, FormErrors> {
        let mut errors = FormErrors::new();

        let genres = match &self.genres {
            Some(genres) => errors.check(parse_genres("genres", genres)),
            None => DEFAULT_ARTIST_GENRES.iter().map(|g| g.to_string()).collect(),
        };

        let artist = ValidArtist {
            name: errors.check(required_text("name", &self.name, MAX_NAME_LEN)),
            city: errors.check(required_text("city", &self.city, MAX_FIELD_LEN)),
            state: errors.check(parse_state("state", &self.state)),
            phone: errors.check(optional_phone("phone", self.phone.as_deref(), MAX_FIELD_LEN)),
            genres,
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
            seeking_venue: self.seeking_venue,
            seeking_description: errors.check(optional_text(
                "seeking_description",
                self.seeking_description.as_deref(),
                MAX_LONG_FIELD_LEN,
            )),
            website: errors.check(optional_url("website", self.website.as_deref(), MAX_FIELD_LEN)),
        };

        errors.finish(artist)
    }
}

impl From<&Artist> for ArtistForm {
    fn from(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone(),
            genres: Some(artist.genres.clone()),
            image_link: artist.image_link.clone(),
            facebook_link: artist.facebook_link.clone(),
            seeking_venue: artist.seeking_venue,
            seeking_description: artist.seeking_description.clone(),
            website: artist.website.clone(),
        }
    }
}

/// Partial artist update, same rules as `VenuePatch`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistPatch {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub phone: Option<String>,
    pub genres: Option<Vec<String>>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: Option<bool>,
    pub seeking_description: Option<String>,
    pub website: Option<String>,
}

impl ArtistPatch {
    pub fn apply(self, artist: &Artist) -> ArtistForm {
        let mut form = ArtistForm::from(artist);
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(city) = self.city {
            form.city = city;
        }
        if let Some(state) = self.state {
            form.state = state;
        }
        if self.phone.is_some() {
            form.phone = self.phone;
        }
        if self.genres.is_some() {
            form.genres = self.genres;
        } else if has_default_genres(artist) {
            // re-derive the default rather than canonicalize it to "Other"
            form.genres = None;
        }
        if self.image_link.is_some() {
            form.image_link = self.image_link;
        }
        if self.facebook_link.is_some() {
            form.facebook_link = self.facebook_link;
        }
        if let Some(seeking) = self.seeking_venue {
            form.seeking_venue = seeking;
        }
        if self.seeking_description.is_some() {
            form.seeking_description = self.seeking_description;
        }
        if self.website.is_some() {
            form.website = self.website;
        }
        form
    }
}

fn has_default_genres(artist: &Artist) -> bool {
    artist.genres.iter().map(String::as_str).eq(DEFAULT_ARTIST_GENRES)
}
