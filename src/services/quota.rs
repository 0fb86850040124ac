use anyhow::Result;
use chrono::{DateTime, Datelike, Utc};
use tracing::warn;

use crate::config::QuotaConfig;
use crate::db::Store;
use crate::entities::user_quotas;

/// Calendar month bucket, e.g. "2026-08".
#[must_use]
pub fn month_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m").to_string()
}

#[must_use]
pub fn current_month_key() -> String {
    month_key(Utc::now())
}

/// First day of the month after `now`, e.g. "2026-09-01". Reported to
/// clients alongside a quota rejection.
#[must_use]
pub fn next_reset_date(now: DateTime<Utc>) -> String {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    format!("{year:04}-{month:02}-01")
}

/// Result of a quota check. Checking never consumes quota; the increment
/// happens separately once a fresh external search actually ran.
#[derive(Debug, Clone)]
pub struct QuotaCheck {
    pub allowed: bool,
    pub remaining: i32,
    /// The backing ledger row. `None` when the ledger was unreachable and
    /// the service degraded to its fail-open defaults.
    pub record: Option<user_quotas::Model>,
}

#[derive(Clone)]
pub struct QuotaService {
    store: Store,
    config: QuotaConfig,
}

impl QuotaService {
    #[must_use]
    pub const fn new(store: Store, config: QuotaConfig) -> Self {
        Self { store, config }
    }

    #[must_use]
    pub const fn max_searches(&self) -> i32 {
        self.config.max_searches_per_month
    }

    pub async fn check(&self, user_id: &str) -> Result<QuotaCheck> {
        self.check_for_month(user_id, &current_month_key()).await
    }

    /// Reads (lazily creating) the user's ledger row for the given month.
    /// A ledger failure degrades to full headroom when `fail_open` is set,
    /// so a broken quota table never takes search down with it.
    pub async fn check_for_month(&self, user_id: &str, month_year: &str) -> Result<QuotaCheck> {
        let result = self
            .store
            .ensure_quota(user_id, month_year, self.config.max_searches_per_month)
            .await;

        match result {
            Ok(record) => {
                let remaining = (record.max_searches - record.searches_used).max(0);
                Ok(QuotaCheck {
                    allowed: record.searches_used < record.max_searches,
                    remaining,
                    record: Some(record),
                })
            }
            Err(e) if self.config.fail_open => {
                warn!("Quota ledger unavailable, allowing search for {user_id}: {e:#}");
                Ok(QuotaCheck {
                    allowed: true,
                    remaining: self.config.max_searches_per_month,
                    record: None,
                })
            }
            Err(e) => Err(e),
        }
    }

    pub async fn increment(&self, user_id: &str) -> Result<Option<user_quotas::Model>> {
        self.increment_for_month(user_id, &current_month_key())
            .await
    }

    pub async fn increment_for_month(
        &self,
        user_id: &str,
        month_year: &str,
    ) -> Result<Option<user_quotas::Model>> {
        self.store.increment_quota(user_id, month_year).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    async fn service() -> QuotaService {
        let store = Store::new("sqlite::memory:").await.unwrap();
        QuotaService::new(store, QuotaConfig::default())
    }

    #[test]
    fn test_month_key_format() {
        let at = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        assert_eq!(month_key(at), "2026-08");
    }

    #[test]
    fn test_reset_date_mid_year() {
        let at = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        assert_eq!(next_reset_date(at), "2026-09-01");
    }

    #[test]
    fn test_reset_date_december_rolls_into_next_year() {
        let at = Utc.with_ymd_and_hms(2026, 12, 5, 0, 0, 0).unwrap();
        assert_eq!(next_reset_date(at), "2027-01-01");
    }

    #[tokio::test]
    async fn test_check_lazily_creates_ledger_row() {
        let quota = service().await;

        let check = quota.check_for_month("user-1", "2026-08").await.unwrap();
        assert!(check.allowed);
        assert_eq!(check.remaining, 3);

        let record = check.record.unwrap();
        assert_eq!(record.searches_used, 0);
        assert_eq!(record.max_searches, 3);
    }

    #[tokio::test]
    async fn test_check_never_consumes_quota() {
        let quota = service().await;

        for _ in 0..5 {
            quota.check_for_month("user-1", "2026-08").await.unwrap();
        }

        let check = quota.check_for_month("user-1", "2026-08").await.unwrap();
        assert_eq!(check.remaining, 3);
    }

    #[tokio::test]
    async fn test_increment_until_exhausted() {
        let quota = service().await;
        quota.check_for_month("user-1", "2026-08").await.unwrap();

        for expected_used in 1..=3 {
            let updated = quota
                .increment_for_month("user-1", "2026-08")
                .await
                .unwrap()
                .unwrap();
            assert_eq!(updated.searches_used, expected_used);
        }

        let check = quota.check_for_month("user-1", "2026-08").await.unwrap();
        assert!(!check.allowed);
        assert_eq!(check.remaining, 0);
    }

    #[tokio::test]
    async fn test_new_month_starts_fresh() {
        let quota = service().await;
        quota.check_for_month("user-1", "2026-08").await.unwrap();
        for _ in 0..3 {
            quota.increment_for_month("user-1", "2026-08").await.unwrap();
        }

        // The next calendar month gets its own row with a clean count.
        let check = quota.check_for_month("user-1", "2026-09").await.unwrap();
        assert!(check.allowed);
        assert_eq!(check.remaining, 3);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let quota = service().await;
        quota.check_for_month("user-1", "2026-08").await.unwrap();
        quota.increment_for_month("user-1", "2026-08").await.unwrap();

        let check = quota.check_for_month("user-2", "2026-08").await.unwrap();
        assert_eq!(check.remaining, 3);
    }

    #[tokio::test]
    async fn test_increment_without_row_is_a_noop() {
        let quota = service().await;
        let updated = quota
            .increment_for_month("ghost", "2026-08")
            .await
            .unwrap();
        assert!(updated.is_none());
    }
}
