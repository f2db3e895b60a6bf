use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, sea_query::Expr,
};
use uuid::Uuid;

use bazaar_store_schema::{cart_items, products};

use super::catalog::product_from_model;
use super::{internal, is_unique_violation};
use crate::domain::repository::CartRepository;
use crate::domain::types::{CartItem, CartLine};
use crate::error::StoreServiceError;

#[derive(Clone)]
pub struct DbCartRepository {
    pub db: DatabaseConnection,
}

impl CartRepository for DbCartRepository {
    async fn list_lines(&self, user_id: Uuid) -> Result<Vec<CartLine>, StoreServiceError> {
        let rows = cart_items::Entity::find()
            .filter(cart_items::Column::UserId.eq(user_id))
            .find_also_related(products::Entity)
            .order_by_asc(cart_items::Column::CreatedAt)
            .order_by_asc(cart_items::Column::Id)
            .all(&self.db)
            .await
            .context("list cart lines")?;
        Ok(rows
            .into_iter()
            .filter_map(|(item, product)| {
                product.map(|product| CartLine {
                    item: cart_item_from_model(item),
                    product: product_from_model(product),
                })
            })
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CartItem>, StoreServiceError> {
        let model = cart_items::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find cart item by id")?;
        Ok(model.map(cart_item_from_model))
    }

    async fn find_by_product(
        &self,
        user_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<CartItem>, StoreServiceError> {
        let model = cart_items::Entity::find()
            .filter(cart_items::Column::UserId.eq(user_id))
            .filter(cart_items::Column::ProductId.eq(product_id))
            .one(&self.db)
            .await
            .context("find cart item by product")?;
        Ok(model.map(cart_item_from_model))
    }

    async fn insert(&self, item: &CartItem) -> Result<(), StoreServiceError> {
        cart_items::ActiveModel {
            id: Set(item.id),
            user_id: Set(item.user_id),
            product_id: Set(item.product_id),
            quantity: Set(item.quantity),
            created_at: Set(item.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            // A concurrent add for the same product won the unique (user, product) slot.
            if is_unique_violation(&e) {
                StoreServiceError::CartChanged
            } else {
                internal(e, "insert cart item")
            }
        })?;
        Ok(())
    }

    async fn compare_and_set_quantity(
        &self,
        id: Uuid,
        from: i32,
        to: i32,
    ) -> Result<bool, StoreServiceError> {
        let result = cart_items::Entity::update_many()
            .col_expr(cart_items::Column::Quantity, Expr::value(to))
            .filter(cart_items::Column::Id.eq(id))
            .filter(cart_items::Column::Quantity.eq(from))
            .exec(&self.db)
            .await
            .context("compare and set cart item quantity")?;
        Ok(result.rows_affected == 1)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreServiceError> {
        let result = cart_items::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete cart item")?;
        Ok(result.rows_affected > 0)
    }
}

fn cart_item_from_model(model: cart_items::Model) -> CartItem {
    CartItem {
        id: model.id,
        user_id: model.user_id,
        product_id: model.product_id,
        quantity: model.quantity,
        created_at: model.created_at,
    }
}
