//! Movie records as the engine sees them.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{CAST_COMPARE_LIMIT, IMAGE_BASE};

/// Stable catalog identifier of a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable catalog identifier of a person (actor or crew).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub u64);

/// A billed cast member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub id: PersonId,
    pub name: String,
    /// Billing order, lowest first.
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// The credited director of a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Director {
    #[serde(default)]
    pub id: Option<PersonId>,
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Immutable description of a movie, used both as mystery target and as guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    /// ISO `YYYY-MM-DD` release date.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub director: Option<Director>,
    #[serde(default)]
    pub production_companies: Vec<String>,
    #[serde(default)]
    pub production_countries: Vec<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl MovieRecord {
    /// Minimal record with only an id and a title.
    #[must_use]
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            release_date: None,
            runtime: None,
            original_language: None,
            genres: Vec::new(),
            cast: Vec::new(),
            director: None,
            production_companies: Vec::new(),
            production_countries: Vec::new(),
            poster_path: None,
        }
    }

    /// Stand-in used when a detail lookup fails: no cast, no genres, no runtime.
    #[must_use]
    pub fn degraded(id: MovieId) -> Self {
        Self::new(id, String::new())
    }

    /// Year component of the release date, if one is recorded.
    #[must_use]
    pub fn release_year(&self) -> Option<u32> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse::<u32>().ok())
            .filter(|year| *year > 0)
    }

    /// Release year for comparisons; unknown years count as zero.
    #[must_use]
    pub fn year_value(&self) -> u32 {
        self.release_year().unwrap_or(0)
    }

    /// Runtime for comparisons; unknown runtimes count as zero.
    #[must_use]
    pub fn runtime_value(&self) -> u32 {
        self.runtime.unwrap_or(0)
    }

    #[must_use]
    pub fn director_name(&self) -> Option<&str> {
        self.director.as_ref().map(|director| director.name.as_str())
    }

    /// Cast members taking part in comparisons, in billing order.
    #[must_use]
    pub fn billed_cast(&self) -> Vec<&CastMember> {
        let mut billed: Vec<&CastMember> = self.cast.iter().collect();
        billed.sort_by_key(|member| member.order);
        billed.truncate(CAST_COMPARE_LIMIT);
        billed
    }

    #[must_use]
    pub fn has_cast_member(&self, id: PersonId) -> bool {
        self.cast.iter().any(|member| member.id == id)
    }

    #[must_use]
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| format!("{IMAGE_BASE}{path}"))
    }
}

pub(crate) fn profile_url(path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{IMAGE_BASE}{p}"))
}

/// Movie details in the shape returned by the TMDB `movie/{id}` endpoint with
/// `append_to_response=credits`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbNamed>,
    #[serde(default)]
    pub credits: TmdbCredits,
    #[serde(default)]
    pub production_companies: Vec<TmdbNamed>,
    #[serde(default)]
    pub production_countries: Vec<TmdbNamed>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbNamed {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct TmdbCredits {
    #[serde(default)]
    pub cast: Vec<TmdbCast>,
    #[serde(default)]
    pub crew: Vec<TmdbCrew>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbCast {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TmdbCrew {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

impl TmdbMovie {
    /// Parse a single TMDB details payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the TMDB details shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn named(list: Vec<TmdbNamed>) -> Vec<String> {
    list.into_iter()
        .filter_map(|entry| entry.name)
        .filter(|name| !name.is_empty())
        .collect()
}

impl From<TmdbMovie> for MovieRecord {
    fn from(movie: TmdbMovie) -> Self {
        let director = movie
            .credits
            .crew
            .into_iter()
            .find(|member| member.job.as_deref() == Some("Director"))
            .and_then(|member| {
                let name = member.name.filter(|name| !name.is_empty())?;
                Some(Director {
                    id: member.id.map(PersonId),
                    name,
                    profile_path: member.profile_path,
                })
            });

        let cast = movie
            .credits
            .cast
            .into_iter()
            .enumerate()
            .map(|(idx, member)| CastMember {
                id: PersonId(member.id),
                name: member.name.unwrap_or_default(),
                order: member
                    .order
                    .unwrap_or_else(|| u32::try_from(idx).unwrap_or(u32::MAX)),
                profile_path: member.profile_path,
            })
            .collect();

        Self {
            id: MovieId(movie.id),
            title: movie.title,
            release_date: movie.release_date.filter(|date| !date.is_empty()),
            runtime: movie.runtime.filter(|minutes| *minutes > 0),
            original_language: movie.original_language.filter(|code| !code.is_empty()),
            genres: named(movie.genres),
            cast,
            director,
            production_companies: named(movie.production_companies),
            production_countries: named(movie.production_countries),
            poster_path: movie.poster_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_year_reads_iso_prefix() {
        let mut movie = MovieRecord::new(MovieId(1), "Target");
        assert_eq!(movie.release_year(), None);
        assert_eq!(movie.year_value(), 0);

        movie.release_date = Some("2010-07-16".to_string());
        assert_eq!(movie.release_year(), Some(2010));

        movie.release_date = Some("20".to_string());
        assert_eq!(movie.year_value(), 0);
    }

    #[test]
    fn billed_cast_sorts_and_caps() {
        let mut movie = MovieRecord::new(MovieId(1), "Crowded");
        movie.cast = (0..15)
            .rev()
            .map(|n| CastMember {
                id: PersonId(u64::from(n) + 100),
                name: format!("Actor {n}"),
                order: n,
                profile_path: None,
            })
            .collect();

        let billed = movie.billed_cast();
        assert_eq!(billed.len(), CAST_COMPARE_LIMIT);
        assert_eq!(billed[0].order, 0);
        assert_eq!(billed[9].order, 9);
    }

    #[test]
    fn tmdb_payload_maps_director_and_names() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "release_date": "2010-07-15",
            "runtime": 148,
            "original_language": "en",
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "production_companies": [{"id": 923, "name": "Legendary Pictures"}, {"id": 1}],
            "production_countries": [{"iso_3166_1": "US", "name": "United States of America"}],
            "credits": {
                "cast": [{"id": 6193, "name": "Leonardo DiCaprio", "order": 0, "profile_path": "/leo.jpg"}],
                "crew": [
                    {"id": 947, "job": "Original Music Composer", "name": "Hans Zimmer"},
                    {"id": 525, "job": "Director", "name": "Christopher Nolan", "profile_path": "/nolan.jpg"}
                ]
            }
        }"#;

        let movie: MovieRecord = TmdbMovie::from_json(json).unwrap().into();
        assert_eq!(movie.id, MovieId(27205));
        assert_eq!(movie.director_name(), Some("Christopher Nolan"));
        assert_eq!(movie.director.as_ref().and_then(|d| d.id), Some(PersonId(525)));
        assert_eq!(movie.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(movie.production_companies, vec!["Legendary Pictures"]);
        assert_eq!(movie.cast[0].id, PersonId(6193));
        assert!(movie.has_cast_member(PersonId(6193)));
    }

    #[test]
    fn posters_and_profiles_share_the_image_host() {
        let mut movie = MovieRecord::new(MovieId(603), "The Matrix");
        movie.poster_path = Some("/matrix.jpg".to_string());
        assert_eq!(
            movie.poster_url().as_deref(),
            Some("https://image.tmdb.org/t/p/w185/matrix.jpg")
        );
        assert_eq!(
            profile_url(Some("/keanu.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w185/keanu.jpg")
        );
        assert_eq!(profile_url(Some("")), None);
    }

    #[test]
    fn degraded_record_is_empty() {
        let movie = MovieRecord::degraded(MovieId(9));
        assert!(movie.cast.is_empty());
        assert!(movie.genres.is_empty());
        assert_eq!(movie.runtime, None);
        assert_eq!(movie.poster_url(), None);
    }
}
