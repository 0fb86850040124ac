pub mod job;

pub use job::{JobListing, RankedJob, SearchPreferences, SearchQuery};
