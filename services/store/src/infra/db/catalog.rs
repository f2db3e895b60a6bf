use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use uuid::Uuid;

use bazaar_domain::pagination::PageRequest;
use bazaar_store_schema::{cart_items, categories, order_items, products};

use super::{internal, is_foreign_key_violation, txn_error};
use crate::domain::repository::{CategoryRepository, ProductRepository};
use crate::domain::types::{Category, Product, ProductFilter, ProductSortBy};
use crate::error::StoreServiceError;

// ── Category repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCategoryRepository {
    pub db: DatabaseConnection,
}

impl CategoryRepository for DbCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, StoreServiceError> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await
            .context("list categories")?;
        Ok(models.into_iter().map(category_from_model).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, StoreServiceError> {
        let model = categories::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find category by id")?;
        Ok(model.map(category_from_model))
    }
}

fn category_from_model(model: categories::Model) -> Category {
    Category {
        id: model.id,
        name: model.name,
        description: model.description,
    }
}

// ── Product repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: DatabaseConnection,
}

impl ProductRepository for DbProductRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreServiceError> {
        let model = products::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find product by id")?;
        Ok(model.map(product_from_model))
    }

    async fn list_by_category(
        &self,
        category_id: Uuid,
        filter: ProductFilter,
        page: PageRequest,
    ) -> Result<(Vec<Product>, u64), StoreServiceError> {
        let query = products::Entity::find()
            .filter(products::Column::CategoryId.eq(category_id))
            .filter(products::Column::Price.gte(filter.min_price))
            .filter(products::Column::Price.lte(filter.max_price));

        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count category products")?;

        let query = match filter.sort_by {
            ProductSortBy::PriceAsc => query.order_by_asc(products::Column::Price),
            ProductSortBy::PriceDesc => query.order_by_desc(products::Column::Price),
            ProductSortBy::Newest => query.order_by_desc(products::Column::CreatedAt),
        };
        let page = page.clamped();
        let models = query
            .order_by_asc(products::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.per_page))
            .all(&self.db)
            .await
            .context("list category products")?;
        Ok((models.into_iter().map(product_from_model).collect(), total))
    }

    async fn list_featured(&self, limit: u64) -> Result<Vec<Product>, StoreServiceError> {
        let models = products::Entity::find()
            .filter(products::Column::Featured.eq(true))
            .order_by_desc(products::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list featured products")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn list_related(
        &self,
        product: &Product,
        limit: u64,
    ) -> Result<Vec<Product>, StoreServiceError> {
        let models = products::Entity::find()
            .filter(products::Column::CategoryId.eq(product.category_id))
            .filter(products::Column::Id.ne(product.id))
            .order_by_desc(products::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list related products")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn list_all(&self) -> Result<Vec<Product>, StoreServiceError> {
        let models = products::Entity::find()
            .order_by_desc(products::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list products")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn create(&self, product: &Product) -> Result<(), StoreServiceError> {
        products::ActiveModel {
            id: Set(product.id),
            name: Set(product.name.clone()),
            description: Set(product.description.clone()),
            price: Set(product.price),
            stock: Set(product.stock),
            image_url: Set(product.image_url.clone()),
            featured: Set(product.featured),
            category_id: Set(product.category_id),
            created_at: Set(product.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                StoreServiceError::CategoryNotFound
            } else {
                internal(e, "create product")
            }
        })?;
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<bool, StoreServiceError> {
        let am = products::ActiveModel {
            id: Set(product.id),
            name: Set(product.name.clone()),
            description: Set(product.description.clone()),
            price: Set(product.price),
            stock: Set(product.stock),
            image_url: Set(product.image_url.clone()),
            featured: Set(product.featured),
            category_id: Set(product.category_id),
            ..Default::default()
        };
        match am.update(&self.db).await {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotUpdated) => Ok(false),
            Err(e) if is_foreign_key_violation(&e) => Err(StoreServiceError::CategoryNotFound),
            Err(e) => Err(internal(e, "update product")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreServiceError> {
        self.db
            .transaction::<_, (), StoreServiceError>(move |txn| {
                Box::pin(async move {
                    let referenced = order_items::Entity::find()
                        .filter(order_items::Column::ProductId.eq(id))
                        .count(txn)
                        .await
                        .context("count order items for product")?;
                    if referenced > 0 {
                        return Err(StoreServiceError::ProductReferenced);
                    }
                    cart_items::Entity::delete_many()
                        .filter(cart_items::Column::ProductId.eq(id))
                        .exec(txn)
                        .await
                        .context("delete cart lines for product")?;
                    let deleted = products::Entity::delete_by_id(id)
                        .exec(txn)
                        .await
                        .map_err(|e| {
                            if is_foreign_key_violation(&e) {
                                StoreServiceError::ProductReferenced
                            } else {
                                internal(e, "delete product")
                            }
                        })?;
                    if deleted.rows_affected == 0 {
                        return Err(StoreServiceError::ProductNotFound);
                    }
                    Ok(())
                })
            })
            .await
            .map_err(txn_error("delete product"))
    }
}

pub(super) fn product_from_model(model: products::Model) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        stock: model.stock,
        image_url: model.image_url,
        featured: model.featured,
        category_id: model.category_id,
        created_at: model.created_at,
    }
}
