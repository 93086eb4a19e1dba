//! Initial migration to create the stars table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stars::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Stars::Url).text().not_null().primary_key())
                    .col(
                        ColumnDef::new(Stars::PushedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Stars::Language)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Stars::Stargazers)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Stars::Archived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Stars::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Stars::Topics)
                            .json()
                            .not_null()
                            .default(Expr::cust("'[]'")),
                    )
                    .col(
                        ColumnDef::new(Stars::SyncedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Cleanup sweeps filter on pushed_at and archived
        manager
            .create_index(
                Index::create()
                    .name("idx_stars_pushed_at")
                    .table(Stars::Table)
                    .col(Stars::PushedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stars_archived")
                    .table(Stars::Table)
                    .col(Stars::Archived)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stars_language")
                    .table(Stars::Table)
                    .col(Stars::Language)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stars_stargazers")
                    .table(Stars::Table)
                    .col((Stars::Stargazers, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Stars::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Stars {
    Table,
    Url,
    PushedAt,
    Language,
    Stargazers,
    Archived,
    Description,
    Topics,
    SyncedAt,
}
