//! Domain models with validation at the form boundary
//!
//! Submitted forms are plain deserialized structs. `validate()` turns them
//! into `Valid*` values that the repositories accept, or returns every
//! field error at once. Invalid input returns FormErrors, not panic.

pub mod artist;
pub mod choices;
pub mod listing;
pub mod show;
pub mod validation;
pub mod venue;

pub use artist::{Artist, ArtistForm, ArtistPatch, ValidArtist};
pub use choices::FormChoices;
pub use listing::{
    group_by_area, is_upcoming, Area, ArtistDetail, ArtistShow, EntityRef, EntitySummary,
    Scheduled, SearchResults, ShowTimeline, VenueDetail, VenueShow, VenueSummaryRow,
};
pub use show::{Show, ShowForm, ShowListing, ValidShow};
pub use validation::{FormErrors, ValidationError};
pub use venue::{ValidVenue, Venue, VenueForm, VenuePatch};
