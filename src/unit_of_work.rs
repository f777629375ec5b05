//! One persistence session with a repository per entity.

use sea_orm::DatabaseConnection;

use crate::{
    cancel::CancellationToken,
    error::AppResult,
    repository::{
        CartItemRepository, CategoryRepository, CustomerRepository, OrderItemRepository,
        OrderRepository, ProductRepository, Session, ShoppingCartRepository,
    },
};

/// Coordinates every repository over one session.
///
/// Repository writes are staged and only reach the database through
/// [`save_changes`](Self::save_changes). An explicit transaction may wrap several saves.
/// Dropping the unit of work rolls back a transaction that is still open and discards unsaved
/// changes.
pub struct UnitOfWork {
    session: Session,
    products: ProductRepository,
    categories: CategoryRepository,
    customers: CustomerRepository,
    orders: OrderRepository,
    order_items: OrderItemRepository,
    shopping_carts: ShoppingCartRepository,
    cart_items: CartItemRepository,
}

impl UnitOfWork {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self::with_cancellation(conn, CancellationToken::new())
    }

    /// Every storage call made through this unit of work fails with `Cancelled` once `cancel`
    /// fires.
    pub fn with_cancellation(conn: DatabaseConnection, cancel: CancellationToken) -> Self {
        let session = Session::new(conn, cancel);
        Self {
            products: ProductRepository::new(session.clone()),
            categories: CategoryRepository::new(session.clone()),
            customers: CustomerRepository::new(session.clone()),
            orders: OrderRepository::new(session.clone()),
            order_items: OrderItemRepository::new(session.clone()),
            shopping_carts: ShoppingCartRepository::new(session.clone()),
            cart_items: CartItemRepository::new(session.clone()),
            session,
        }
    }

    pub fn products(&self) -> &ProductRepository {
        &self.products
    }

    pub fn categories(&self) -> &CategoryRepository {
        &self.categories
    }

    pub fn customers(&self) -> &CustomerRepository {
        &self.customers
    }

    pub fn orders(&self) -> &OrderRepository {
        &self.orders
    }

    pub fn order_items(&self) -> &OrderItemRepository {
        &self.order_items
    }

    pub fn shopping_carts(&self) -> &ShoppingCartRepository {
        &self.shopping_carts
    }

    pub fn cart_items(&self) -> &CartItemRepository {
        &self.cart_items
    }

    /// Writes every pending change and returns how many entries were written.
    pub async fn save_changes(&self) -> AppResult<usize> {
        self.session.save_changes().await
    }

    /// Drops every pending change and returns how many were dropped.
    pub async fn discard_changes(&self) -> usize {
        let discarded = self.session.discard_changes().await;
        if discarded > 0 {
            tracing::debug!(discarded, "pending changes discarded");
        }
        discarded
    }

    pub async fn has_changes(&self) -> bool {
        self.session.pending_changes().await > 0
    }

    pub async fn begin_transaction(&self) -> AppResult<()> {
        self.session.begin_transaction().await
    }

    pub async fn commit_transaction(&self) -> AppResult<()> {
        self.session.commit_transaction().await
    }

    pub async fn rollback_transaction(&self) -> AppResult<()> {
        self.session.rollback_transaction().await
    }

    pub async fn in_transaction(&self) -> bool {
        self.session.in_transaction().await
    }

    pub fn cancellation(&self) -> &CancellationToken {
        self.session.cancellation()
    }
}
