use sea_orm_migration::{prelude::*, schema::*};

use super::{Base, audited_table, create_audit_indexes, create_index};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                audited_table(Categories::Table)
                    .col(string_len(Categories::Name, 100))
                    .col(string_len(Categories::Description, 500).default(""))
                    .col(uuid_null(Categories::ParentCategoryId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categories_parent_category")
                            .from(Categories::Table, Categories::ParentCategoryId)
                            .to(Categories::Table, Base::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_categories_name")
                    .table(Categories::Table)
                    .col(Categories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;
        create_index(
            manager,
            "ix_categories_parent_category_id",
            Categories::Table,
            Categories::ParentCategoryId,
        )
        .await?;
        create_audit_indexes(manager, "categories", Categories::Table).await?;

        manager
            .create_table(
                audited_table(Products::Table)
                    .col(string_len(Products::Name, 200))
                    .col(string_len(Products::Description, 1000).default(""))
                    .col(decimal_len(Products::Price, 16, 2))
                    .col(string_len(Products::PriceCurrency, 10))
                    .col(integer(Products::Stock).default(0))
                    .col(string_len(Products::Sku, 50))
                    .col(string_len(Products::ImageUrl, 500).default(""))
                    .col(uuid(Products::CategoryId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_category")
                            .from(Products::Table, Products::CategoryId)
                            .to(Categories::Table, Base::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_products_sku")
                    .table(Products::Table)
                    .col(Products::Sku)
                    .unique()
                    .to_owned(),
            )
            .await?;
        create_index(
            manager,
            "ix_products_category_id",
            Products::Table,
            Products::CategoryId,
        )
        .await?;
        create_audit_indexes(manager, "products", Products::Table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone)]
enum Categories {
    Table,
    Name,
    Description,
    ParentCategoryId,
}

#[derive(DeriveIden, Clone)]
pub(crate) enum Products {
    Table,
    Name,
    Description,
    Price,
    PriceCurrency,
    Stock,
    Sku,
    ImageUrl,
    CategoryId,
}
