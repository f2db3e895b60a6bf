pub use sea_orm_migration::prelude::*;

mod m20260401_000001_create_users;
mod m20260401_000002_create_categories;
mod m20260401_000003_create_products;
mod m20260401_000004_create_addresses;
mod m20260401_000005_create_cart_items;
mod m20260401_000006_create_orders;
mod m20260401_000007_create_order_items;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260401_000001_create_users::Migration),
            Box::new(m20260401_000002_create_categories::Migration),
            Box::new(m20260401_000003_create_products::Migration),
            Box::new(m20260401_000004_create_addresses::Migration),
            Box::new(m20260401_000005_create_cart_items::Migration),
            Box::new(m20260401_000006_create_orders::Migration),
            Box::new(m20260401_000007_create_order_items::Migration),
        ]
    }
}
