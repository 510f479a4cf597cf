//! Data model for scraped catalogue entries

mod book;

pub use book::BookRecord;
