use anyhow::Context as _;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use bazaar_domain::user::UserRole;
use bazaar_store_schema::{orders, products, users};

use super::order::order_from_model;
use crate::domain::repository::DashboardRepository;
use crate::domain::types::DashboardSummary;
use crate::error::StoreServiceError;

#[derive(Clone)]
pub struct DbDashboardRepository {
    pub db: DatabaseConnection,
}

impl DashboardRepository for DbDashboardRepository {
    async fn summary(&self, recent: u64) -> Result<DashboardSummary, StoreServiceError> {
        let product_count = products::Entity::find()
            .count(&self.db)
            .await
            .context("count products")?;
        let order_count = orders::Entity::find()
            .count(&self.db)
            .await
            .context("count orders")?;
        let customer_count = users::Entity::find()
            .filter(users::Column::Role.ne(UserRole::Admin.as_str()))
            .count(&self.db)
            .await
            .context("count customers")?;
        let revenue = orders::Entity::find()
            .select_only()
            .column_as(orders::Column::TotalAmount.sum(), "revenue")
            .into_tuple::<Option<Decimal>>()
            .one(&self.db)
            .await
            .context("sum order totals")?
            .flatten()
            .unwrap_or(Decimal::ZERO);
        let recent_orders = orders::Entity::find()
            .order_by_desc(orders::Column::CreatedAt)
            .limit(recent)
            .all(&self.db)
            .await
            .context("list recent orders")?
            .into_iter()
            .map(order_from_model)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DashboardSummary {
            product_count,
            order_count,
            customer_count,
            revenue,
            recent_orders,
        })
    }
}
