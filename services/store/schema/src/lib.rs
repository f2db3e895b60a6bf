//! sea-orm entities for the storefront database.

pub mod addresses;
pub mod cart_items;
pub mod categories;
pub mod order_items;
pub mod orders;
pub mod products;
pub mod users;
