pub mod prelude;

pub mod user_job_searches;
pub mod user_quotas;
pub mod user_saved_jobs;
