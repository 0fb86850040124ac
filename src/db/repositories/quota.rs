use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::entities::{prelude::*, user_quotas};

pub struct QuotaRepository {
    conn: DatabaseConnection,
}

impl QuotaRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, user_id: &str, month_year: &str) -> Result<Option<user_quotas::Model>> {
        UserQuotas::find()
            .filter(user_quotas::Column::UserId.eq(user_id))
            .filter(user_quotas::Column::MonthYear.eq(month_year))
            .one(&self.conn)
            .await
            .context("Failed to query user quota")
    }

    /// Returns the month's record, creating a zeroed one if absent. The
    /// unique (`user_id`, `month_year`) index makes a concurrent duplicate
    /// insert fail; that loser re-reads the winner's row.
    pub async fn ensure(
        &self,
        user_id: &str,
        month_year: &str,
        max_searches: i32,
    ) -> Result<user_quotas::Model> {
        if let Some(existing) = self.get(user_id, month_year).await? {
            return Ok(existing);
        }

        let now = chrono::Utc::now().to_rfc3339();
        let active = user_quotas::ActiveModel {
            user_id: Set(user_id.to_string()),
            month_year: Set(month_year.to_string()),
            searches_used: Set(0),
            max_searches: Set(max_searches),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        match UserQuotas::insert(active).exec(&self.conn).await {
            Ok(_) => {}
            Err(e) if e.to_string().contains("UNIQUE") => {}
            Err(e) => return Err(e).context("Failed to create user quota"),
        }

        self.get(user_id, month_year)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Quota record missing after insert"))
    }

    /// Atomic in-database `searches_used + 1`. Returns the updated record,
    /// or None if no record exists for the month.
    pub async fn increment(
        &self,
        user_id: &str,
        month_year: &str,
    ) -> Result<Option<user_quotas::Model>> {
        let now = chrono::Utc::now().to_rfc3339();

        UserQuotas::update_many()
            .col_expr(
                user_quotas::Column::SearchesUsed,
                Expr::col(user_quotas::Column::SearchesUsed).add(1),
            )
            .col_expr(user_quotas::Column::UpdatedAt, Expr::value(now))
            .filter(user_quotas::Column::UserId.eq(user_id))
            .filter(user_quotas::Column::MonthYear.eq(month_year))
            .exec(&self.conn)
            .await
            .context("Failed to increment user quota")?;

        self.get(user_id, month_year).await
    }
}
