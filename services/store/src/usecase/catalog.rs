use uuid::Uuid;

use bazaar_domain::pagination::{Page, PageRequest};

use crate::domain::repository::{CategoryRepository, ProductRepository};
use crate::domain::types::{Category, Product, ProductFilter};
use crate::error::StoreServiceError;

/// Landing page featured product count.
pub const FEATURED_LIMIT: u64 = 8;

/// Related products shown on a product page.
pub const RELATED_LIMIT: u64 = 4;

// ── ListCategories ───────────────────────────────────────────────────────────

pub struct ListCategoriesUseCase<C: CategoryRepository> {
    pub categories: C,
}

impl<C: CategoryRepository> ListCategoriesUseCase<C> {
    pub async fn execute(&self) -> Result<Vec<Category>, StoreServiceError> {
        self.categories.list().await
    }
}

// ── ListCategoryProducts ─────────────────────────────────────────────────────

pub struct CategoryProducts {
    pub category: Category,
    pub products: Page<Product>,
}

pub struct ListCategoryProductsUseCase<C: CategoryRepository, P: ProductRepository> {
    pub categories: C,
    pub products: P,
}

impl<C: CategoryRepository, P: ProductRepository> ListCategoryProductsUseCase<C, P> {
    pub async fn execute(
        &self,
        category_id: Uuid,
        filter: ProductFilter,
        page: u32,
    ) -> Result<CategoryProducts, StoreServiceError> {
        let category = self
            .categories
            .find_by_id(category_id)
            .await?
            .ok_or(StoreServiceError::CategoryNotFound)?;
        let request = PageRequest::catalog(page);
        let (items, total) = self
            .products
            .list_by_category(category_id, filter, request)
            .await?;
        Ok(CategoryProducts {
            category,
            products: Page::new(items, request, total),
        })
    }
}

// ── FeaturedProducts ─────────────────────────────────────────────────────────

pub struct FeaturedProductsUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> FeaturedProductsUseCase<P> {
    pub async fn execute(&self) -> Result<Vec<Product>, StoreServiceError> {
        self.products.list_featured(FEATURED_LIMIT).await
    }
}

// ── GetProduct ───────────────────────────────────────────────────────────────

pub struct ProductWithRelated {
    pub product: Product,
    pub related: Vec<Product>,
}

pub struct GetProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> GetProductUseCase<P> {
    pub async fn execute(&self, product_id: Uuid) -> Result<ProductWithRelated, StoreServiceError> {
        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or(StoreServiceError::ProductNotFound)?;
        let related = self.products.list_related(&product, RELATED_LIMIT).await?;
        Ok(ProductWithRelated { product, related })
    }
}
