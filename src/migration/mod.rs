//! Schema migrations, shared by the `migrate` binary, the server bootstrap and the tests.

use sea_orm_migration::{prelude::*, schema::*};

mod m20250101_000001_create_catalog;
mod m20250101_000002_create_customers_and_orders;
mod m20250101_000003_create_shopping_carts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_catalog::Migration),
            Box::new(m20250101_000002_create_customers_and_orders::Migration),
            Box::new(m20250101_000003_create_shopping_carts::Migration),
        ]
    }
}

/// Columns every table shares.
#[derive(DeriveIden)]
pub(crate) enum Base {
    Id,
    IsActive,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

/// Starts a `CREATE TABLE` with the UUID key and the audit/soft-delete columns.
pub(crate) fn audited_table<T: IntoIden + 'static>(table: T) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(pk_uuid(Base::Id))
        .col(boolean(Base::IsActive).default(true))
        .col(boolean(Base::IsDeleted).default(false))
        .col(timestamp_with_time_zone(Base::CreatedAt))
        .col(timestamp_with_time_zone_null(Base::UpdatedAt))
        .col(timestamp_with_time_zone_null(Base::DeletedAt))
        .to_owned()
}

/// The `is_deleted` and `created_at` indexes every audited table carries.
pub(crate) async fn create_audit_indexes<T>(
    manager: &SchemaManager<'_>,
    name: &str,
    table: T,
) -> Result<(), DbErr>
where
    T: IntoIden + Clone + 'static,
{
    manager
        .create_index(
            Index::create()
                .name(format!("ix_{name}_is_deleted"))
                .table(table.clone())
                .col(Base::IsDeleted)
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name(format!("ix_{name}_created_at"))
                .table(table)
                .col(Base::CreatedAt)
                .to_owned(),
        )
        .await
}

pub(crate) async fn create_index<T, C>(
    manager: &SchemaManager<'_>,
    name: &str,
    table: T,
    column: C,
) -> Result<(), DbErr>
where
    T: IntoIden + 'static,
    C: IntoIden,
{
    manager
        .create_index(
            Index::create()
                .name(name)
                .table(table)
                .col(column)
                .to_owned(),
        )
        .await
}
