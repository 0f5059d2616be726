//! Season scheduling: creation with explicit or generated weeks, partial
//! updates, and the system-wide single-current-season invariant.

pub mod service;
pub mod weeks;

pub use service::{
    create_season, delete_season, get_current_season, get_season, list_seasons, set_current_season,
    update_season,
};
