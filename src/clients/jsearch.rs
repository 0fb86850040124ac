use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::JSearchConfig;
use crate::models::{JobListing, SearchQuery};

/// Seam for the external job-search API. The orchestrator depends on this
/// trait so integration tests can substitute a canned provider.
#[async_trait]
pub trait JobSearchProvider: Send + Sync {
    async fn search(&self, query: &SearchQuery, page_size: u32) -> Result<Vec<JobListing>>;
}

#[derive(Deserialize)]
struct JSearchResponse {
    #[serde(default)]
    data: Vec<JobListing>,
}

/// JSearch (RapidAPI) client. Free tier is budgeted at 200 calls per month
/// on the provider side, independent of the per-user quota this service
/// enforces.
#[derive(Clone)]
pub struct JSearchClient {
    client: Client,
    config: JSearchConfig,
}

impl JSearchClient {
    pub fn new(config: JSearchConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent("Jobarr/1.0")
                .timeout(std::time::Duration::from_secs(
                    config.request_timeout_seconds.into(),
                ))
                .build()
                .unwrap_or_else(|_| Client::new()),
            config,
        }
    }

    /// Reuses an externally built client so all outbound HTTP shares one
    /// connection pool.
    #[must_use]
    pub const fn with_shared_client(client: Client, config: JSearchConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl JobSearchProvider for JSearchClient {
    async fn search(&self, query: &SearchQuery, page_size: u32) -> Result<Vec<JobListing>> {
        if self.config.api_key.is_empty() {
            anyhow::bail!("RapidAPI key not configured (set RAPIDAPI_KEY)");
        }

        let query_string = if query.location.is_empty() {
            query.query.clone()
        } else {
            format!("{} in {}", query.query, query.location)
        };

        let mut url = url::Url::parse(&self.config.base_url)
            .context("Invalid JSearch base URL")?
            .join("/search")?;
        url.query_pairs_mut()
            .append_pair("query", &query_string)
            .append_pair("page", &query.page.to_string())
            .append_pair("num_pages", "1")
            .append_pair("page_size", &page_size.to_string());

        if !query.employment_type.is_empty() {
            url.query_pairs_mut()
                .append_pair("employment_types", &query.employment_type.to_uppercase());
        }

        debug!("JSearch request: {}", query_string);

        let response = self
            .client
            .get(url)
            .header("X-RapidAPI-Key", &self.config.api_key)
            .header("X-RapidAPI-Host", &self.config.api_host)
            .send()
            .await
            .context("JSearch request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("JSearch request failed: {}", response.status());
        }

        let body: JSearchResponse = response
            .json()
            .await
            .context("Failed to decode JSearch response")?;

        Ok(body.data)
    }
}

/// Maps the UI's job-type wording onto JSearch employment-type codes.
#[must_use]
pub fn format_employment_type(job_type: &str) -> String {
    match job_type.to_lowercase().as_str() {
        "part time job" => "PARTTIME".to_string(),
        "internship" => "INTERN".to_string(),
        _ => "FULLTIME".to_string(),
    }
}

/// Cleans a free-form location string: strips a leading "in " and maps the
/// handful of metro-area names the UI offers onto names JSearch recognizes.
#[must_use]
pub fn format_location(location: &str) -> String {
    let cleaned = location
        .strip_prefix("in ")
        .or_else(|| location.strip_prefix("In "))
        .or_else(|| location.strip_prefix("IN "))
        .unwrap_or(location)
        .trim();

    match cleaned.to_lowercase().as_str() {
        "delhi ncr" => "Delhi NCR, India".to_string(),
        "mumbai" => "Mumbai, India".to_string(),
        "bangalore" => "Bangalore, India".to_string(),
        "pune" => "Pune, India".to_string(),
        "hyderabad" => "Hyderabad, India".to_string(),
        "chennai" => "Chennai, India".to_string(),
        "anywhere in india" => "India".to_string(),
        "remote" | "hybrid" => "Remote".to_string(),
        _ => cleaned.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_employment_type() {
        assert_eq!(format_employment_type("full time job"), "FULLTIME");
        assert_eq!(format_employment_type("Part Time Job"), "PARTTIME");
        assert_eq!(format_employment_type("internship"), "INTERN");
        assert_eq!(format_employment_type("contract"), "FULLTIME");
    }

    #[test]
    fn test_format_location_strips_in_prefix() {
        assert_eq!(format_location("in pune"), "Pune, India");
        assert_eq!(format_location("In Berlin"), "Berlin");
    }

    #[test]
    fn test_format_location_maps_remote() {
        assert_eq!(format_location("remote"), "Remote");
        assert_eq!(format_location("hybrid"), "Remote");
        assert_eq!(format_location("anywhere in india"), "India");
    }

    #[test]
    fn test_format_location_passthrough() {
        assert_eq!(format_location("Austin, TX"), "Austin, TX");
        assert_eq!(format_location(""), "");
    }
}
