use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserQuotas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserQuotas::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserQuotas::UserId).string().not_null())
                    .col(ColumnDef::new(UserQuotas::MonthYear).string().not_null())
                    .col(
                        ColumnDef::new(UserQuotas::SearchesUsed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserQuotas::MaxSearches)
                            .integer()
                            .not_null()
                            .default(3),
                    )
                    .col(
                        ColumnDef::new(UserQuotas::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(UserQuotas::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // One quota record per user per calendar month.
        manager
            .create_index(
                Index::create()
                    .name("idx_user_quotas_user_month")
                    .table(UserQuotas::Table)
                    .col(UserQuotas::UserId)
                    .col(UserQuotas::MonthYear)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserJobSearches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserJobSearches::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserJobSearches::UserId).string().not_null())
                    .col(
                        ColumnDef::new(UserJobSearches::SearchQuery)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserJobSearches::SearchLocation).string())
                    .col(ColumnDef::new(UserJobSearches::SearchEmploymentType).string())
                    .col(ColumnDef::new(UserJobSearches::SearchExperience).string())
                    .col(ColumnDef::new(UserJobSearches::JobData).text().not_null())
                    .col(
                        ColumnDef::new(UserJobSearches::MonthYear)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserJobSearches::SearchTimestamp)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_job_searches_user_month")
                    .table(UserJobSearches::Table)
                    .col(UserJobSearches::UserId)
                    .col(UserJobSearches::MonthYear)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserSavedJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserSavedJobs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserSavedJobs::UserId).string().not_null())
                    .col(ColumnDef::new(UserSavedJobs::JobId).string().not_null())
                    .col(ColumnDef::new(UserSavedJobs::JobData).text().not_null())
                    .col(
                        ColumnDef::new(UserSavedJobs::MatchScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(UserSavedJobs::IsApplied)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(UserSavedJobs::IsFavorited)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(UserSavedJobs::SavedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(UserSavedJobs::AppliedAt).timestamp())
                    .col(ColumnDef::new(UserSavedJobs::Notes).text())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_saved_jobs_user_job")
                    .table(UserSavedJobs::Table)
                    .col(UserSavedJobs::UserId)
                    .col(UserSavedJobs::JobId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserSavedJobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserJobSearches::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserQuotas::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UserQuotas {
    Table,
    Id,
    UserId,
    MonthYear,
    SearchesUsed,
    MaxSearches,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserJobSearches {
    Table,
    Id,
    UserId,
    SearchQuery,
    SearchLocation,
    SearchEmploymentType,
    SearchExperience,
    JobData,
    MonthYear,
    SearchTimestamp,
}

#[derive(DeriveIden)]
enum UserSavedJobs {
    Table,
    Id,
    UserId,
    JobId,
    JobData,
    MatchScore,
    IsApplied,
    IsFavorited,
    SavedAt,
    AppliedAt,
    Notes,
}
