//! League workflows: creation with the commissioner's team, the ordered
//! join-league validation cascade, and league search.

pub mod domain;
pub mod service;

pub use service::{create_league_with_commissioner_team, join_league, search_leagues};
