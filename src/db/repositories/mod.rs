pub mod history;
pub mod quota;
pub mod saved_jobs;
