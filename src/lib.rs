//! Local job-application tracker: offers, companies, tasks and profiles for
//! one user at a time, stored in a SQLite file.

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod offers;
pub mod state;
pub mod tasks;
pub mod tracker;
pub mod users;
pub mod views;

pub use error::{Error, Result};
pub use tracker::Tracker;
