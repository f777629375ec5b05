use sea_orm_migration::{prelude::*, schema::*};

use super::{
    Base, audited_table, create_audit_indexes, create_index,
    m20250101_000001_create_catalog::Products,
    m20250101_000002_create_customers_and_orders::Customers,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                audited_table(ShoppingCarts::Table)
                    .col(uuid(ShoppingCarts::CustomerId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shopping_carts_customer")
                            .from(ShoppingCarts::Table, ShoppingCarts::CustomerId)
                            .to(Customers::Table, Base::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        create_index(
            manager,
            "ix_shopping_carts_customer_id",
            ShoppingCarts::Table,
            ShoppingCarts::CustomerId,
        )
        .await?;
        create_audit_indexes(manager, "shopping_carts", ShoppingCarts::Table).await?;

        manager
            .create_table(
                audited_table(CartItems::Table)
                    .col(uuid(CartItems::ShoppingCartId))
                    .col(uuid(CartItems::ProductId))
                    .col(integer(CartItems::Quantity))
                    .col(decimal_len(CartItems::UnitPrice, 16, 2))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_items_shopping_cart")
                            .from(CartItems::Table, CartItems::ShoppingCartId)
                            .to(ShoppingCarts::Table, Base::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cart_items_product")
                            .from(CartItems::Table, CartItems::ProductId)
                            .to(Products::Table, Base::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_cart_items_shopping_cart_id_product_id")
                    .table(CartItems::Table)
                    .col(CartItems::ShoppingCartId)
                    .col(CartItems::ProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        create_index(
            manager,
            "ix_cart_items_product_id",
            CartItems::Table,
            CartItems::ProductId,
        )
        .await?;
        create_audit_indexes(manager, "cart_items", CartItems::Table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CartItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ShoppingCarts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden, Clone)]
enum ShoppingCarts {
    Table,
    CustomerId,
}

#[derive(DeriveIden, Clone)]
enum CartItems {
    Table,
    ShoppingCartId,
    ProductId,
    Quantity,
    UnitPrice,
}
