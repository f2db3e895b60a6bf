use anyhow::{Context as _, anyhow};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use bazaar_domain::order::{OrderStatus, PaymentMethod};
use bazaar_store_schema::{cart_items, order_items, orders, products};

use super::{internal, is_unique_violation, txn_error};
use crate::domain::repository::OrderRepository;
use crate::domain::types::{Order, OrderDraft, OrderItem};
use crate::error::StoreServiceError;

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

impl OrderRepository for DbOrderRepository {
    async fn place(&self, draft: &OrderDraft) -> Result<Order, StoreServiceError> {
        let draft = draft.clone();
        self.db
            .transaction::<_, Order, StoreServiceError>(move |txn| {
                Box::pin(async move {
                    let order = orders::ActiveModel {
                        id: Set(draft.id),
                        order_number: Set(draft.order_number.clone()),
                        total_amount: Set(draft.total_amount),
                        status: Set(OrderStatus::Pending.as_str().to_owned()),
                        payment_method: Set(draft.payment_method.as_str().to_owned()),
                        user_id: Set(draft.user_id),
                        address_id: Set(draft.address_id),
                        created_at: Set(draft.created_at),
                    }
                    .insert(txn)
                    .await
                    .map_err(|e| {
                        if is_unique_violation(&e) {
                            StoreServiceError::OrderNumberTaken
                        } else {
                            internal(e, "insert order")
                        }
                    })?;

                    for line in &draft.lines {
                        let decremented = products::Entity::update_many()
                            .col_expr(
                                products::Column::Stock,
                                Expr::col(products::Column::Stock).sub(line.quantity),
                            )
                            .filter(products::Column::Id.eq(line.product_id))
                            .filter(products::Column::Stock.gte(line.quantity))
                            .exec(txn)
                            .await
                            .context("decrement product stock")?;
                        if decremented.rows_affected == 0 {
                            return Err(StoreServiceError::InsufficientStock);
                        }

                        order_items::ActiveModel {
                            id: Set(Uuid::now_v7()),
                            order_id: Set(draft.id),
                            product_id: Set(line.product_id),
                            quantity: Set(line.quantity),
                            price: Set(line.price),
                        }
                        .insert(txn)
                        .await
                        .context("insert order item")?;

                        let removed = cart_items::Entity::delete_many()
                            .filter(cart_items::Column::Id.eq(line.cart_item_id))
                            .filter(cart_items::Column::UserId.eq(draft.user_id))
                            .filter(cart_items::Column::Quantity.eq(line.quantity))
                            .exec(txn)
                            .await
                            .context("clear cart line")?;
                        if removed.rows_affected == 0 {
                            return Err(StoreServiceError::CartChanged);
                        }
                    }

                    order_from_model(order)
                })
            })
            .await
            .map_err(txn_error("place order"))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreServiceError> {
        let model = orders::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find order by id")?;
        model.map(order_from_model).transpose()
    }

    async fn list_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, StoreServiceError> {
        let rows = order_items::Entity::find()
            .filter(order_items::Column::OrderId.eq(order_id))
            .find_also_related(products::Entity)
            .order_by_asc(order_items::Column::Id)
            .all(&self.db)
            .await
            .context("list order items")?;
        Ok(rows
            .into_iter()
            .map(|(item, product)| OrderItem {
                id: item.id,
                order_id: item.order_id,
                product_id: item.product_id,
                product_name: product.map(|p| p.name).unwrap_or_default(),
                quantity: item.quantity,
                price: item.price,
            })
            .collect())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, StoreServiceError> {
        let models = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .order_by_desc(orders::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list orders by user")?;
        models.into_iter().map(order_from_model).collect()
    }

    async fn list(&self, status: Option<OrderStatus>) -> Result<Vec<Order>, StoreServiceError> {
        let mut query = orders::Entity::find();
        if let Some(status) = status {
            query = query.filter(orders::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_desc(orders::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list orders")?;
        models.into_iter().map(order_from_model).collect()
    }

    async fn compare_and_set_status(
        &self,
        id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    ) -> Result<bool, StoreServiceError> {
        let result = orders::Entity::update_many()
            .col_expr(orders::Column::Status, Expr::value(to.as_str()))
            .filter(orders::Column::Id.eq(id))
            .filter(orders::Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await
            .context("compare and set order status")?;
        Ok(result.rows_affected == 1)
    }
}

pub(super) fn order_from_model(model: orders::Model) -> Result<Order, StoreServiceError> {
    let status = OrderStatus::parse(&model.status)
        .ok_or_else(|| anyhow!("order {} has unknown status {:?}", model.id, model.status))?;
    let payment_method = PaymentMethod::parse(&model.payment_method).ok_or_else(|| {
        anyhow!(
            "order {} has unknown payment method {:?}",
            model.id,
            model.payment_method
        )
    })?;
    Ok(Order {
        id: model.id,
        order_number: model.order_number,
        total_amount: model.total_amount,
        status,
        payment_method,
        user_id: model.user_id,
        address_id: model.address_id,
        created_at: model.created_at,
    })
}
