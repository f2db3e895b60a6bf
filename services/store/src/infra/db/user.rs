use anyhow::{Context as _, anyhow};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, sea_query::Expr,
};
use uuid::Uuid;

use bazaar_domain::user::UserRole;
use bazaar_store_schema::users;

use super::{internal, is_unique_violation};
use crate::domain::repository::UserRepository;
use crate::domain::types::User;
use crate::error::StoreServiceError;

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), StoreServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_str().to_owned()),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreServiceError::UserAlreadyExists
            } else {
                internal(e, "create user")
            }
        })?;
        Ok(())
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<bool, StoreServiceError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Role, Expr::value(role.as_str()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set user role")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_customers(&self) -> Result<Vec<User>, StoreServiceError> {
        let models = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Customer.as_str()))
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list customers")?;
        models.into_iter().map(user_from_model).collect()
    }
}

fn user_from_model(model: users::Model) -> Result<User, StoreServiceError> {
    let role = UserRole::parse(&model.role)
        .ok_or_else(|| anyhow!("user {} has unknown role {:?}", model.id, model.role))?;
    Ok(User {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        role,
        created_at: model.created_at,
    })
}
