use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use bazaar_store_schema::{addresses, orders};

use super::{internal, is_foreign_key_violation, txn_error};
use crate::domain::repository::AddressRepository;
use crate::domain::types::Address;
use crate::error::StoreServiceError;

#[derive(Clone)]
pub struct DbAddressRepository {
    pub db: DatabaseConnection,
}

impl AddressRepository for DbAddressRepository {
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Address>, StoreServiceError> {
        let models = addresses::Entity::find()
            .filter(addresses::Column::UserId.eq(user_id))
            .order_by_desc(addresses::Column::IsDefault)
            .order_by_asc(addresses::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list addresses")?;
        Ok(models.into_iter().map(address_from_model).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>, StoreServiceError> {
        let model = addresses::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find address by id")?;
        Ok(model.map(address_from_model))
    }

    async fn create(&self, address: &Address) -> Result<(), StoreServiceError> {
        let address = address.clone();
        self.db
            .transaction::<_, (), StoreServiceError>(move |txn| {
                Box::pin(async move {
                    if address.is_default {
                        clear_default(txn, address.user_id).await?;
                    }
                    address_active_model(&address)
                        .insert(txn)
                        .await
                        .context("insert address")?;
                    Ok(())
                })
            })
            .await
            .map_err(txn_error("create address"))
    }

    async fn update(&self, address: &Address) -> Result<(), StoreServiceError> {
        let address = address.clone();
        self.db
            .transaction::<_, (), StoreServiceError>(move |txn| {
                Box::pin(async move {
                    if address.is_default {
                        clear_default(txn, address.user_id).await?;
                    }
                    match address_active_model(&address).update(txn).await {
                        Ok(_) => Ok(()),
                        Err(DbErr::RecordNotUpdated) => Err(StoreServiceError::AddressNotFound),
                        Err(e) => Err(internal(e, "update address")),
                    }
                })
            })
            .await
            .map_err(txn_error("update address"))
    }

    async fn is_referenced(&self, id: Uuid) -> Result<bool, StoreServiceError> {
        let count = orders::Entity::find()
            .filter(orders::Column::AddressId.eq(id))
            .count(&self.db)
            .await
            .context("count orders for address")?;
        Ok(count > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreServiceError> {
        let result = addresses::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    StoreServiceError::AddressInUse
                } else {
                    internal(e, "delete address")
                }
            })?;
        if result.rows_affected == 0 {
            return Err(StoreServiceError::AddressNotFound);
        }
        Ok(())
    }
}

/// Unset every default address of `user_id`; runs before a new default is written.
async fn clear_default<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> Result<(), StoreServiceError> {
    addresses::Entity::update_many()
        .col_expr(addresses::Column::IsDefault, Expr::value(false))
        .filter(addresses::Column::UserId.eq(user_id))
        .filter(addresses::Column::IsDefault.eq(true))
        .exec(conn)
        .await
        .context("clear default address")?;
    Ok(())
}

fn address_active_model(address: &Address) -> addresses::ActiveModel {
    addresses::ActiveModel {
        id: Set(address.id),
        user_id: Set(address.user_id),
        address_line1: Set(address.address_line1.clone()),
        address_line2: Set(address.address_line2.clone()),
        city: Set(address.city.clone()),
        state: Set(address.state.clone()),
        pincode: Set(address.pincode.clone()),
        phone: Set(address.phone.clone()),
        is_default: Set(address.is_default),
        created_at: Set(address.created_at),
    }
}

fn address_from_model(model: addresses::Model) -> Address {
    Address {
        id: model.id,
        user_id: model.user_id,
        address_line1: model.address_line1,
        address_line2: model.address_line2,
        city: model.city,
        state: model.state,
        pincode: model.pincode,
        phone: model.phone,
        is_default: model.is_default,
        created_at: model.created_at,
    }
}
