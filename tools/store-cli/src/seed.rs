use anyhow::{Context as _, Result};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use bazaar_store_schema::{categories, products};

const ICON_BASE: &str =
    "https://cdn.jsdelivr.net/npm/@fortawesome/fontawesome-free@6.0.0-beta3/svgs/solid";

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    rupees: i64,
    stock: i32,
    icon: &'static str,
    featured: bool,
}

struct SeedCategory {
    name: &'static str,
    description: &'static str,
    products: &'static [SeedProduct],
}

macro_rules! product {
    ($name:literal, $desc:literal, $rupees:literal, $stock:literal, $icon:literal) => {
        product!($name, $desc, $rupees, $stock, $icon, false)
    };
    ($name:literal, $desc:literal, $rupees:literal, $stock:literal, $icon:literal, $featured:literal) => {
        SeedProduct {
            name: $name,
            description: $desc,
            rupees: $rupees,
            stock: $stock,
            icon: $icon,
            featured: $featured,
        }
    };
}

const CATALOG: &[SeedCategory] = &[
    SeedCategory {
        name: "Electronics",
        description: "Electronic devices and gadgets",
        products: &[
            product!("Smartphone", "Latest smartphone with advanced features", 12999, 50, "mobile-alt", true),
            product!("Laptop", "High-performance laptop for professional use", 49999, 30, "laptop", true),
            product!("Smartwatch", "Fitness tracking smartwatch", 2999, 100, "clock"),
            product!("Headphones", "Noise cancelling wireless headphones", 1999, 75, "headphones"),
            product!("Bluetooth Speaker", "Portable bluetooth speaker with great sound", 1499, 60, "volume-up"),
            product!("Power Bank", "10000mAh fast charging power bank", 999, 120, "battery-full"),
        ],
    },
    SeedCategory {
        name: "Clothing",
        description: "Fashion clothing for men and women",
        products: &[
            product!("Men's T-Shirt", "Cotton t-shirt for men", 499, 200, "tshirt", true),
            product!("Women's Dress", "Elegant dress for women", 1299, 80, "female"),
            product!("Jeans", "Comfortable denim jeans", 999, 150, "user"),
            product!("Jacket", "Winter jacket for cold weather", 1999, 70, "user-tie"),
            product!("Formal Shirt", "Formal shirt for office wear", 799, 100, "user-tie"),
            product!("Sports Shoes", "Comfortable sports shoes for running", 1499, 90, "shoe-prints", true),
        ],
    },
    SeedCategory {
        name: "Books",
        description: "Books of various genres",
        products: &[
            product!("Fiction Novel", "Bestselling fiction novel", 299, 200, "book"),
            product!("Self-Help Book", "Book for personal development", 399, 150, "book-reader", true),
            product!("Cookbook", "Collection of delicious recipes", 499, 100, "utensils"),
            product!("Biography", "Biography of a famous personality", 349, 80, "user"),
            product!("Academic Textbook", "College textbook for students", 899, 60, "graduation-cap"),
            product!("Children's Book", "Illustrated book for children", 199, 120, "child"),
        ],
    },
    SeedCategory {
        name: "Home & Kitchen",
        description: "Home and kitchen appliances",
        products: &[
            product!("Blender", "Multi-purpose kitchen blender", 1999, 50, "blender", true),
            product!("Coffee Maker", "Automatic coffee maker for home", 2499, 40, "coffee"),
            product!("Bedsheet Set", "Cotton bedsheet set with pillowcases", 899, 100, "bed"),
            product!("Dining Table", "Wooden dining table for 6 people", 12999, 20, "chair"),
            product!("Microwave Oven", "Digital microwave oven for kitchen", 6999, 30, "temperature-high"),
            product!("Water Purifier", "RO water purifier for home", 8999, 25, "tint"),
        ],
    },
    SeedCategory {
        name: "Sports",
        description: "Sports equipment and accessories",
        products: &[
            product!("Cricket Bat", "Professional cricket bat", 1499, 50, "table-tennis"),
            product!("Football", "Standard size football", 799, 80, "futbol", true),
            product!("Yoga Mat", "Anti-slip yoga mat for fitness", 499, 100, "spa"),
            product!("Dumbbells", "Set of 5kg dumbbells", 999, 60, "dumbbell"),
            product!("Badminton Racket", "Professional badminton racket", 899, 70, "table-tennis"),
            product!("Treadmill", "Motorized treadmill for home gym", 24999, 15, "running"),
        ],
    },
    SeedCategory {
        name: "Beauty",
        description: "Beauty and personal care products",
        products: &[
            product!("Face Cream", "Moisturizing face cream", 499, 120, "magic", true),
            product!("Perfume", "Luxury perfume for men and women", 1999, 80, "spray-can"),
            product!("Hair Dryer", "Professional hair dryer with styling tools", 1499, 50, "wind"),
            product!("Makeup Kit", "Complete makeup kit with brushes", 2499, 40, "palette"),
            product!("Hair Serum", "Anti-frizz hair serum for smooth hair", 399, 100, "tint"),
            product!("Beard Grooming Kit", "Complete beard grooming kit for men", 899, 60, "cut"),
        ],
    },
];

/// Insert [`CATALOG`] in one transaction unless the catalog already has categories.
pub async fn run(db: &DatabaseConnection) -> Result<()> {
    let existing = categories::Entity::find()
        .count(db)
        .await
        .context("count categories")?;
    if existing > 0 {
        tracing::info!(existing, "catalog already seeded, skipping");
        return Ok(());
    }

    let txn = db.begin().await.context("begin seed transaction")?;
    // Spread creation times so "newest" ordering follows catalog order.
    let base = Utc::now();
    let mut offset = 0i64;
    for category in CATALOG {
        let category_id = Uuid::now_v7();
        categories::ActiveModel {
            id: Set(category_id),
            name: Set(category.name.to_owned()),
            description: Set(Some(category.description.to_owned())),
        }
        .insert(&txn)
        .await
        .with_context(|| format!("insert category {}", category.name))?;

        for product in category.products {
            products::ActiveModel {
                id: Set(Uuid::now_v7()),
                name: Set(product.name.to_owned()),
                description: Set(Some(product.description.to_owned())),
                price: Set(Decimal::new(product.rupees * 100, 2)),
                stock: Set(product.stock),
                image_url: Set(Some(format!("{ICON_BASE}/{}.svg", product.icon))),
                featured: Set(product.featured),
                category_id: Set(category_id),
                created_at: Set(base + Duration::milliseconds(offset)),
            }
            .insert(&txn)
            .await
            .with_context(|| format!("insert product {}", product.name))?;
            offset += 1;
        }
    }
    txn.commit().await.context("commit seed transaction")?;

    let product_count: usize = CATALOG.iter().map(|c| c.products.len()).sum();
    tracing::info!(
        categories = CATALOG.len(),
        products = product_count,
        "catalog seeded"
    );
    Ok(())
}
