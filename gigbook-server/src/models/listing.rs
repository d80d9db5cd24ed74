//! Read models for listings, search results and detail pages
//!
//! Whether a show is upcoming is derived from `(start_time, now)` at read
//! time and never stored.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::artist::Artist;
use super::venue::Venue;

/// A show is upcoming only when it starts strictly after `now`.
pub fn is_upcoming(start_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    start_time > now
}

/// Anything with a start time that can be split into past/upcoming
pub trait Scheduled {
    fn start_time(&self) -> DateTime<Utc>;
}

/// Id and name, for plain lists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct EntityRef {
    pub id: i32,
    pub name: String,
}

/// Id, name and upcoming-show count, for lists and search results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct EntitySummary {
    pub id: i32,
    pub name: String,
    pub num_upcoming_shows: i64,
}

/// Venue summary row before grouping by area
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct VenueSummaryRow {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub num_upcoming_shows: i64,
}

/// Venues sharing one `(state, city)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Area {
    pub state: String,
    pub city: String,
    pub venues: Vec<EntitySummary>,
}

/// Group venue rows by `(state, city)`, areas in first-seen order.
pub fn group_by_area(rows: Vec<VenueSummaryRow>) -> Vec<Area> {
    let mut areas: Vec<Area> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for row in rows {
        let summary = EntitySummary {
            id: row.id,
            name: row.name,
            num_upcoming_shows: row.num_upcoming_shows,
        };
        let key = (row.state, row.city);
        match index.get(&key) {
            Some(&i) => areas[i].venues.push(summary),
            None => {
                index.insert(key.clone(), areas.len());
                areas.push(Area {
                    state: key.0,
                    city: key.1,
                    venues: vec![summary],
                });
            }
        }
    }

    areas
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub search_term: String,
    pub count: usize,
    pub data: Vec<EntitySummary>,
}

impl SearchResults {
    pub fn new(search_term: String, data: Vec<EntitySummary>) -> Self {
        Self {
            search_term,
            count: data.len(),
            data,
        }
    }
}

/// A venue's show, seen from the venue page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct VenueShow {
    pub artist_id: i32,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

impl Scheduled for VenueShow {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

/// An artist's show, seen from the artist page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ArtistShow {
    pub venue_id: i32,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

impl Scheduled for ArtistShow {
    fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

/// Shows split into past and upcoming, each keeping the input order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowTimeline<T> {
    pub past_shows: Vec<T>,
    pub past_shows_count: usize,
    pub upcoming_shows: Vec<T>,
    pub upcoming_shows_count: usize,
}

impl<T: Scheduled> ShowTimeline<T> {
    pub fn partition(shows: Vec<T>, now: DateTime<Utc>) -> Self {
        let (upcoming_shows, past_shows): (Vec<T>, Vec<T>) = shows
            .into_iter()
            .partition(|show| is_upcoming(show.start_time(), now));

        Self {
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueDetail {
    #[serde(flatten)]
    pub venue: Venue,
    #[serde(flatten)]
    pub shows: ShowTimeline<VenueShow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub artist: Artist,
    #[serde(flatten)]
    pub shows: ShowTimeline<ArtistShow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn row(id: i32, city: &str, state: &str) -> VenueSummaryRow {
        VenueSummaryRow {
            id,
            name: format!("venue {id}"),
            city: city.into(),
            state: state.into(),
            num_upcoming_shows: 0,
        }
    }

    fn show(artist_id: i32, start_time: DateTime<Utc>) -> VenueShow {
        VenueShow {
            artist_id,
            artist_name: format!("artist {artist_id}"),
            artist_image_link: None,
            start_time,
        }
    }

    #[test]
    fn upcoming_is_strict() {
        assert!(is_upcoming(now() + Duration::seconds(1), now()));
        assert!(!is_upcoming(now(), now()));
        assert!(!is_upcoming(now() - Duration::days(1), now()));
    }

    #[test]
    fn same_city_different_state_are_separate_areas() {
        let areas = group_by_area(vec![
            row(1, "Portland", "ME"),
            row(2, "Portland", "OR"),
            row(3, "Portland", "ME"),
        ]);
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].state, "ME");
        assert_eq!(
            areas[0].venues.iter().map(|v| v.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(areas[1].state, "OR");
        assert_eq!(areas[1].venues.len(), 1);
    }

    #[test]
    fn grouping_nothing_gives_nothing() {
        assert!(group_by_area(Vec::new()).is_empty());
    }

    #[test]
    fn partition_keeps_order_and_counts() {
        let shows = vec![
            show(3, now() + Duration::days(2)),
            show(2, now() + Duration::hours(1)),
            show(1, now()),
            show(0, now() - Duration::days(30)),
        ];
        let timeline = ShowTimeline::partition(shows, now());

        assert_eq!(timeline.upcoming_shows_count, 2);
        assert_eq!(timeline.past_shows_count, 2);
        assert_eq!(
            timeline.upcoming_shows.iter().map(|s| s.artist_id).collect::<Vec<_>>(),
            vec![3, 2]
        );
        assert_eq!(
            timeline.past_shows.iter().map(|s| s.artist_id).collect::<Vec<_>>(),
            vec![1, 0]
        );
    }

    #[test]
    fn detail_flattens_venue_and_timeline() {
        let detail = VenueDetail {
            venue: Venue {
                id: 1,
                name: "The Fillmore".into(),
                city: "San Francisco".into(),
                state: "CA".into(),
                address: "1805 Geary St".into(),
                phone: None,
                image_link: None,
                facebook_link: None,
                website: None,
                genres: vec!["Rock".into()],
                seeking_talent: false,
                seeking_description: None,
            },
            shows: ShowTimeline::partition(Vec::new(), now()),
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["name"], "The Fillmore");
        assert_eq!(json["past_shows_count"], 0);
        assert_eq!(json["upcoming_shows_count"], 0);
        assert!(json["upcoming_shows"].as_array().unwrap().is_empty());
    }

    #[test]
    fn search_results_count_matches_data() {
        let results = SearchResults::new(
            "music".into(),
            vec![EntitySummary {
                id: 2,
                name: "The Dueling Pianos Bar".into(),
                num_upcoming_shows: 0,
            }],
        );
        assert_eq!(results.count, 1);
    }
}
