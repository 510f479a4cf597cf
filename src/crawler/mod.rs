//! Crawler module for catalogue walking and book extraction
//!
//! This module contains the core scraping pipeline, including:
//! - HTTP fetching of listing and detail pages
//! - Book detail page parsing
//! - Catalogue walking across paginated listing pages
//! - Full-run coordination and persistence
//! - The daily run scheduler

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;
mod selectors;
mod walker;

pub use coordinator::Scraper;
pub use fetcher::{build_http_client, fetch_page};
pub use parser::{parse_availability, parse_book, parse_price, parse_rating_word};
pub use scheduler::{run_scheduler, DailySchedule, Scheduler, SchedulerState};
pub use walker::{parse_listing, CatalogueWalker, ListingPage};
