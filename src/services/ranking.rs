use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::constants::limits::DESCRIPTION_PREVIEW_CHARS;
use crate::models::{JobListing, RankedJob, SearchPreferences};

const TITLE_BONUS: i32 = 40;
const EMPLOYMENT_TYPE_BONUS: i32 = 20;
const REMOTE_BONUS: i32 = 30;
const LOCATION_BONUS: i32 = 25;
const EXPERIENCE_BONUS: i32 = 15;
const SALARY_BONUS: i32 = 10;
const RECENCY_BONUS: i32 = 5;
const RECENCY_WINDOW_DAYS: i64 = 7;

fn first_integer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("static regex"))
}

fn first_integer(text: &str) -> Option<i64> {
    first_integer_re()
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
}

fn digits_only(text: &str) -> Option<f64> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Additive rule-based compatibility score. Every clause contributes its
/// fixed bonus independently and never subtracts; missing listing fields
/// are non-matches, not errors. 100 is the practical ceiling but nothing
/// caps the sum.
#[must_use]
pub fn calculate_match_score(
    listing: &JobListing,
    preferences: &SearchPreferences,
    now: DateTime<Utc>,
) -> i32 {
    let mut score = 0;

    if !preferences.role.is_empty()
        && listing
            .job_title
            .to_lowercase()
            .contains(&preferences.role.to_lowercase())
    {
        score += TITLE_BONUS;
    }

    if let (Some(job_type), Some(listing_type)) =
        (&preferences.job_type, &listing.job_employment_type)
    {
        let keyword = job_type.to_lowercase();
        let keyword = keyword.strip_suffix(" job").unwrap_or(&keyword);
        if !keyword.is_empty() && listing_type.to_lowercase().contains(keyword) {
            score += EMPLOYMENT_TYPE_BONUS;
        }
    }

    if let Some(location) = preferences.location.as_deref().filter(|l| !l.is_empty()) {
        let pref_location = location.to_lowercase();
        if pref_location.contains("remote") && listing.job_is_remote == Some(true) {
            score += REMOTE_BONUS;
        } else {
            let needle = pref_location.strip_prefix("in ").unwrap_or(&pref_location);
            if listing.location_string().contains(needle) {
                score += LOCATION_BONUS;
            }
        }
    }

    if let Some(experience) = &preferences.experience
        && !listing.job_description.is_empty()
    {
        let years = first_integer(experience).unwrap_or(0);
        let description = listing.job_description.to_lowercase();

        if years == 0 && (description.contains("entry level") || description.contains("junior")) {
            score += EXPERIENCE_BONUS;
        } else if years >= 3
            && (description.contains("senior") || description.contains("experienced"))
        {
            score += EXPERIENCE_BONUS;
        }
    }

    if let Some(salary) = &preferences.salary
        && let Some(expected) = digits_only(salary)
        && let (Some(min), Some(max)) = (listing.job_min_salary, listing.job_max_salary)
        && min <= expected
        && expected <= max
    {
        score += SALARY_BONUS;
    }

    if let Some(posted) = listing.job_posted_at_timestamp {
        // The window is exact: 7 days and one second ago is too old.
        let age_seconds = now.timestamp() - posted;
        if (0..=RECENCY_WINDOW_DAYS * 24 * 60 * 60).contains(&age_seconds) {
            score += RECENCY_BONUS;
        }
    }

    score
}

/// Unique by `job_id`, first occurrence wins, input order preserved. Must
/// run before ranking whenever listings are aggregated from multiple
/// stored searches.
#[must_use]
pub fn dedupe_by_job_id(listings: Vec<JobListing>) -> Vec<JobListing> {
    let mut seen = HashSet::new();
    listings
        .into_iter()
        .filter(|job| seen.insert(job.job_id.clone()))
        .collect()
}

/// Scores each listing and sorts descending. The sort is explicitly stable:
/// equal scores keep arrival order.
#[must_use]
pub fn rank(
    listings: Vec<JobListing>,
    preferences: &SearchPreferences,
    now: DateTime<Utc>,
) -> Vec<RankedJob> {
    let mut ranked: Vec<RankedJob> = listings
        .into_iter()
        .map(|listing| {
            let match_score = calculate_match_score(&listing, preferences, now);
            RankedJob {
                listing,
                match_score,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    ranked
}

/// Caps the description for display. Char-boundary safe.
pub fn truncate_description(listing: &mut JobListing) {
    if listing.job_description.chars().count() > DESCRIPTION_PREVIEW_CHARS {
        let truncated: String = listing
            .job_description
            .chars()
            .take(DESCRIPTION_PREVIEW_CHARS)
            .collect();
        listing.job_description = format!("{truncated}...");
    }
}
