pub mod jsearch;

pub use jsearch::{JSearchClient, JobSearchProvider};
