//! Generic data access over the entity model.
//!
//! [`Repository`] covers every audited entity; the per-entity repositories add the fixed
//! queries the services need. All of them share one [`Session`] per unit of work.

pub mod cart_items;
pub mod categories;
pub mod customers;
pub mod eager;
pub mod generic;
pub mod order_items;
pub mod orders;
pub mod paginate;
pub mod products;
pub mod query;
pub mod session;
pub mod shopping_carts;
pub mod tracker;

pub use cart_items::{CartItemInclude, CartItemRepository};
pub use categories::{CategoryInclude, CategoryRepository};
pub use customers::{CustomerInclude, CustomerRepository};
pub use eager::{EagerLoad, Loaded};
pub use generic::Repository;
pub use order_items::{OrderItemInclude, OrderItemRepository};
pub use orders::{OrderInclude, OrderRepository};
pub use paginate::Page;
pub use products::{ProductInclude, ProductRepository};
pub use query::{Filter, ListQuery, Sort};
pub use session::Session;
pub use shopping_carts::{ShoppingCartInclude, ShoppingCartRepository};
