use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::{
    Category, DEFAULT_MAX_PRICE, DEFAULT_MIN_PRICE, Product, ProductFilter, ProductSortBy,
};
use crate::error::StoreServiceError;
use crate::state::AppState;
use crate::usecase::catalog::{
    FeaturedProductsUseCase, GetProductUseCase, ListCategoriesUseCase,
    ListCategoryProductsUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
        }
    }
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(serialize_with = "bazaar_core::serde::to_money")]
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub featured: bool,
    pub category_id: Uuid,
    #[serde(serialize_with = "bazaar_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            image_url: product.image_url,
            featured: product.featured,
            category_id: product.category_id,
            created_at: product.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct CategoryProductsResponse {
    pub category: CategoryResponse,
    pub items: Vec<ProductResponse>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Serialize)]
pub struct ProductDetailResponse {
    pub product: ProductResponse,
    pub related: Vec<ProductResponse>,
}

// ── Query params ─────────────────────────────────────────────────────────────

/// Malformed values fall back to their defaults.
#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct CategoryProductsQuery {
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<String>,
}

impl CategoryProductsQuery {
    fn filter(&self) -> ProductFilter {
        let price = |value: &Option<String>, default: Decimal| {
            value
                .as_deref()
                .and_then(|v| v.trim().parse::<Decimal>().ok())
                .unwrap_or(default)
        };
        ProductFilter {
            min_price: price(&self.min_price, DEFAULT_MIN_PRICE),
            max_price: price(&self.max_price, DEFAULT_MAX_PRICE),
            sort_by: self
                .sort_by
                .as_deref()
                .and_then(ProductSortBy::from_kebab_case)
                .unwrap_or_default(),
        }
    }

    fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(1)
    }
}

// ── GET /categories ──────────────────────────────────────────────────────────

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, StoreServiceError> {
    let usecase = ListCategoriesUseCase {
        categories: state.category_repo(),
    };
    let categories = usecase.execute().await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

// ── GET /categories/{id}/products ────────────────────────────────────────────

pub async fn list_category_products(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
    Query(query): Query<CategoryProductsQuery>,
) -> Result<Json<CategoryProductsResponse>, StoreServiceError> {
    let usecase = ListCategoryProductsUseCase {
        categories: state.category_repo(),
        products: state.product_repo(),
    };
    let result = usecase
        .execute(category_id, query.filter(), query.page())
        .await?;
    let page = result.products;
    Ok(Json(CategoryProductsResponse {
        category: result.category.into(),
        items: page.items.into_iter().map(Into::into).collect(),
        page: page.page,
        per_page: page.per_page,
        total: page.total,
        total_pages: page.total_pages,
    }))
}

// ── GET /products/featured ───────────────────────────────────────────────────

pub async fn list_featured_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, StoreServiceError> {
    let usecase = FeaturedProductsUseCase {
        products: state.product_repo(),
    };
    let products = usecase.execute().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

// ── GET /products/{id} ───────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ProductDetailResponse>, StoreServiceError> {
    let usecase = GetProductUseCase {
        products: state.product_repo(),
    };
    let result = usecase.execute(product_id).await?;
    Ok(Json(ProductDetailResponse {
        product: result.product.into(),
        related: result.related.into_iter().map(Into::into).collect(),
    }))
}
