use sea_orm_migration::{prelude::*, schema::*};

use super::{
    Base, audited_table, create_audit_indexes, create_index,
    m20250101_000001_create_catalog::Products,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                audited_table(Customers::Table)
                    .col(string_len(Customers::FirstName, 100))
                    .col(string_len(Customers::LastName, 100))
                    .col(string_len(Customers::Email, 200))
                    .col(string_len(Customers::PhoneNumber, 20).default(""))
                    .col(string_len(Customers::Country, 100).default(""))
                    .col(string_len(Customers::City, 100).default(""))
                    .col(string_len(Customers::Address, 500).default(""))
                    .col(string_len(Customers::PostalCode, 20).default(""))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_customers_email")
                    .table(Customers::Table)
                    .col(Customers::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;
        create_audit_indexes(manager, "customers", Customers::Table).await?;

        manager
            .create_table(
                audited_table(Orders::Table)
                    .col(string_len(Orders::OrderNumber, 50))
                    .col(timestamp_with_time_zone(Orders::OrderDate))
                    .col(decimal_len(Orders::TotalAmount, 16, 2))
                    .col(string_len(Orders::Status, 20))
                    .col(string_len(Orders::PaymentMethod, 20))
                    .col(uuid(Orders::CustomerId))
                    .col(string_len(Orders::ShippingAddress, 500))
                    .col(string_len(Orders::ShippingCity, 100))
                    .col(string_len(Orders::ShippingCountry, 100))
                    .col(string_len(Orders::ShippingPostalCode, 20).default(""))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_customer")
                            .from(Orders::Table, Orders::CustomerId)
                            .to(Customers::Table, Base::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_orders_order_number")
                    .table(Orders::Table)
                    .col(Orders::OrderNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;
        create_index(manager, "ix_orders_customer_id", Orders::Table, Orders::CustomerId).await?;
        create_index(manager, "ix_orders_order_date", Orders::Table, Orders::OrderDate).await?;
        create_audit_indexes(manager, "orders", Orders::Table).await?;

        manager
            .create_table(
                audited_table(OrderItems::Table)
                    .col(uuid(OrderItems::OrderId))
                    .col(uuid(OrderItems::ProductId))
                    .col(string_len(OrderItems::ProductName, 200))
                    .col(integer(OrderItems::Quantity))
                    .col(decimal_len(OrderItems::UnitPrice, 16, 2))
                    .col(decimal_len(OrderItems::TotalPrice, 16, 2))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_order")
                            .from(OrderItems::Table, OrderItems::OrderId)
                            .to(Orders::Table, Base::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_items_product")
                            .from(OrderItems::Table, OrderItems::ProductId)
                            .to(Products::Table, Base::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        create_index(
            manager,
            "ix_order_items_order_id",
            OrderItems::Table,
            OrderItems::OrderId,
        )
        .await?;
        create_index(
            manager,
            "ix_order_items_product_id",
            OrderItems::Table,
            OrderItems::ProductId,
        )
        .await?;
        create_audit_indexes(manager, "order_items", OrderItems::Table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone)]
pub(crate) enum Customers {
    Table,
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    Country,
    City,
    Address,
    PostalCode,
}

#[derive(DeriveIden, Clone)]
enum Orders {
    Table,
    OrderNumber,
    OrderDate,
    TotalAmount,
    Status,
    PaymentMethod,
    CustomerId,
    ShippingAddress,
    ShippingCity,
    ShippingCountry,
    ShippingPostalCode,
}

#[derive(DeriveIden, Clone)]
enum OrderItems {
    Table,
    OrderId,
    ProductId,
    ProductName,
    Quantity,
    UnitPrice,
    TotalPrice,
}
