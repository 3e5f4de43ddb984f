//! Movie catalog and session pricing.
//!
//! The price of every seat in a session is the session's price; seat
//! categories do not change it.

use crate::types::{Money, MovieId, SessionId};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Projection format of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionFormat {
    /// Standard 2D
    #[serde(rename = "2D")]
    TwoD,
    /// Stereoscopic 3D
    #[serde(rename = "3D")]
    ThreeD,
    /// IMAX
    #[serde(rename = "IMAX")]
    Imax,
}

impl fmt::Display for SessionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TwoD => "2D",
            Self::ThreeD => "3D",
            Self::Imax => "IMAX",
        })
    }
}

/// A film currently showing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Catalog id
    pub id: MovieId,
    /// Display title
    pub title: String,
    /// Running time in minutes
    pub duration_minutes: u32,
    /// Minimum age
    pub age_rating: u8,
    /// Genres
    pub genres: Vec<String>,
    /// Synopsis
    pub description: String,
}

/// One screening of a movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSession {
    /// Session id
    pub id: SessionId,
    /// Movie being shown
    pub movie_id: MovieId,
    /// Local start time
    pub starts_at: NaiveDateTime,
    /// Auditorium name
    pub room: String,
    /// Price per seat
    pub price: Money,
    /// Projection format
    pub format: SessionFormat,
}

/// Movies and their sessions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    movies: Vec<Movie>,
    sessions: Vec<MovieSession>,
}

impl Catalog {
    /// Builds a catalog
    #[must_use]
    pub const fn new(movies: Vec<Movie>, sessions: Vec<MovieSession>) -> Self {
        Self { movies, sessions }
    }

    /// The catalog shipped with the demo: two films, six sessions on 2024-03-24
    #[must_use]
    pub fn demo() -> Self {
        let standard = Money::from_reais(32);
        let imax = Money::from_reais(48);
        let poor_things = MovieId::new(1);
        let one_love = MovieId::new(2);

        let movies = vec![
            Movie {
                id: poor_things,
                title: "Pobres Criaturas".to_string(),
                duration_minutes: 141,
                age_rating: 16,
                genres: vec![
                    "Science Fiction".to_string(),
                    "Romance".to_string(),
                    "Comedy".to_string(),
                ],
                description: "Bella Baxter is brought back to life by the unorthodox scientist \
                              Dr. Godwin Baxter and runs off on an adventure across continents."
                    .to_string(),
            },
            Movie {
                id: one_love,
                title: "Bob Marley: One Love".to_string(),
                duration_minutes: 104,
                age_rating: 12,
                genres: vec!["Drama".to_string(), "Music".to_string()],
                description: "The life and music of the icon whose message of love and unity \
                              inspired generations."
                    .to_string(),
            },
        ];

        let session = |id, movie_id, hour, minute, room: &str, price, format| MovieSession {
            id: SessionId::new(id),
            movie_id,
            starts_at: showtime(hour, minute),
            room: room.to_string(),
            price,
            format,
        };

        let sessions = vec![
            session(1, poor_things, 14, 30, "Sala 1", standard, SessionFormat::TwoD),
            session(2, poor_things, 17, 30, "Sala 2", standard, SessionFormat::ThreeD),
            session(3, poor_things, 20, 30, "Sala IMAX", imax, SessionFormat::Imax),
            session(4, one_love, 15, 0, "Sala 3", standard, SessionFormat::TwoD),
            session(5, one_love, 18, 0, "Sala 4", standard, SessionFormat::TwoD),
            session(6, one_love, 21, 0, "Sala IMAX", imax, SessionFormat::Imax),
        ];

        Self::new(movies, sessions)
    }

    /// All movies
    #[must_use]
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Movie by id
    #[must_use]
    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.iter().find(|movie| movie.id == id)
    }

    /// Session by id
    #[must_use]
    pub fn session(&self, id: SessionId) -> Option<&MovieSession> {
        self.sessions.iter().find(|session| session.id == id)
    }

    /// Sessions of one movie, in catalog order
    pub fn sessions_for(&self, movie: MovieId) -> impl Iterator<Item = &MovieSession> {
        self.sessions
            .iter()
            .filter(move |session| session.movie_id == movie)
    }
}

fn showtime(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 24)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .unwrap_or_default()
}
