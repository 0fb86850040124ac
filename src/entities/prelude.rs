pub use super::user_job_searches::Entity as UserJobSearches;
pub use super::user_quotas::Entity as UserQuotas;
pub use super::user_saved_jobs::Entity as UserSavedJobs;
