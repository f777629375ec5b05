//! One service per public resource. Each call opens its own unit of work.

pub mod category_service;
pub mod customer_service;
pub mod order_service;
pub mod product_service;
