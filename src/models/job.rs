use serde::{Deserialize, Serialize};

/// One job posting as returned by the JSearch API and stored in a user's
/// collection. Field names follow the provider's wire format so stored
/// `job_data` blobs round-trip unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListing {
    pub job_id: String,
    #[serde(default)]
    pub employer_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub job_apply_link: String,
    #[serde(default)]
    pub job_city: Option<String>,
    #[serde(default)]
    pub job_state: Option<String>,
    #[serde(default)]
    pub job_country: Option<String>,
    #[serde(default)]
    pub job_posted_at_timestamp: Option<i64>,
    #[serde(default)]
    pub job_posted_at_datetime_utc: Option<String>,
    #[serde(default)]
    pub job_employment_type: Option<String>,
    #[serde(default)]
    pub job_is_remote: Option<bool>,
    #[serde(default)]
    pub job_min_salary: Option<f64>,
    #[serde(default)]
    pub job_max_salary: Option<f64>,
    #[serde(default)]
    pub job_salary_currency: Option<String>,
    #[serde(default)]
    pub job_salary_period: Option<String>,
}

impl JobListing {
    /// "city state country" string used for location matching.
    #[must_use]
    pub fn location_string(&self) -> String {
        format!(
            "{} {} {}",
            self.job_city.as_deref().unwrap_or(""),
            self.job_state.as_deref().unwrap_or(""),
            self.job_country.as_deref().unwrap_or("")
        )
        .to_lowercase()
    }
}

/// A listing paired with its match score, as returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedJob {
    #[serde(flatten)]
    pub listing: JobListing,
    #[serde(rename = "matchScore")]
    pub match_score: i32,
}

/// Raw user preferences as posted to the search endpoint. Everything is a
/// free-form string; only `role` is required (enforced at the API layer).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPreferences {
    #[serde(rename = "jobType", default)]
    pub job_type: Option<String>,
    pub role: String,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
}

/// Normalized search request. Normalization happens once, before cache-key
/// derivation and the external call, so identical requests collide on the
/// same cache key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub location: String,
    pub employment_type: String,
    pub page: u32,
}

impl SearchQuery {
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.query, self.location, self.employment_type, self.page
        )
        .to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_case_insensitive() {
        let a = SearchQuery {
            query: "Software Engineer 3+ years".to_string(),
            location: "Remote".to_string(),
            employment_type: "FULLTIME".to_string(),
            page: 1,
        };
        let b = SearchQuery {
            query: "software engineer 3+ years".to_string(),
            location: "remote".to_string(),
            employment_type: "fulltime".to_string(),
            page: 1,
        };
        assert_eq!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_cache_key_distinguishes_pages() {
        let a = SearchQuery {
            query: "rust developer".to_string(),
            location: "Remote".to_string(),
            employment_type: "FULLTIME".to_string(),
            page: 1,
        };
        let mut b = a.clone();
        b.page = 2;
        assert_ne!(a.cache_key(), b.cache_key());
    }

    #[test]
    fn test_location_string_tolerates_missing_fields() {
        let listing = JobListing {
            job_id: "x".to_string(),
            employer_name: String::new(),
            job_title: String::new(),
            job_description: String::new(),
            job_apply_link: String::new(),
            job_city: Some("Pune".to_string()),
            job_state: None,
            job_country: Some("IN".to_string()),
            job_posted_at_timestamp: None,
            job_posted_at_datetime_utc: None,
            job_employment_type: None,
            job_is_remote: None,
            job_min_salary: None,
            job_max_salary: None,
            job_salary_currency: None,
            job_salary_period: None,
        };
        assert_eq!(listing.location_string(), "pune  in");
    }
}
