//! First-run seeding for the BookVerse store: canonical roles, reference
//! categories and the administrative account.

pub mod config;
pub mod entities;
pub mod models;
pub mod repositories;
pub mod seeders;
pub mod services;
pub mod utils;

pub use seeders::outcome::{AccountOutcome, SeedError, SeedOutcome, SeedReport, SeedStep};
pub use seeders::{run_seeders, seed_data};
