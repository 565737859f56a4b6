//! HAQ - Healthcare Analysis HQ
//!
//! A terminal client for a 15-day daily healthcare data challenge: one set of
//! multiple-choice questions per day, a progress calendar, achievements and a
//! certificate once the program is done.

pub mod app;
pub mod calendar;
pub mod certificate;
pub mod config;
pub mod gateway;
pub mod quiz;
pub mod stats;
pub mod theme;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use theme::Theme;
