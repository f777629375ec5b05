pub mod cart_items;
pub mod categories;
pub mod customers;
pub mod enums;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod shopping_carts;

pub use cart_items::Entity as CartItems;
pub use categories::Entity as Categories;
pub use customers::Entity as Customers;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use shopping_carts::Entity as ShoppingCarts;

use crate::audit::audited_entity;

audited_entity!(cart_items);
audited_entity!(categories);
audited_entity!(customers);
audited_entity!(order_items);
audited_entity!(orders);
audited_entity!(products);
audited_entity!(shopping_carts);
