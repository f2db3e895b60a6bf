use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use bazaar_auth_types::identity::SessionSecret;

use crate::infra::db::{
    DbAddressRepository, DbCartRepository, DbCategoryRepository, DbDashboardRepository,
    DbOrderRepository, DbProductRepository, DbUserRepository,
};
use crate::infra::password::Argon2Hasher;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub session_secret: SessionSecret,
    pub cookie_domain: String,
    pub session_ttl_secs: u64,
}

impl FromRef<AppState> for SessionSecret {
    fn from_ref(state: &AppState) -> Self {
        state.session_secret.clone()
    }
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn category_repo(&self) -> DbCategoryRepository {
        DbCategoryRepository {
            db: self.db.clone(),
        }
    }

    pub fn product_repo(&self) -> DbProductRepository {
        DbProductRepository {
            db: self.db.clone(),
        }
    }

    pub fn cart_repo(&self) -> DbCartRepository {
        DbCartRepository {
            db: self.db.clone(),
        }
    }

    pub fn address_repo(&self) -> DbAddressRepository {
        DbAddressRepository {
            db: self.db.clone(),
        }
    }

    pub fn order_repo(&self) -> DbOrderRepository {
        DbOrderRepository {
            db: self.db.clone(),
        }
    }

    pub fn dashboard_repo(&self) -> DbDashboardRepository {
        DbDashboardRepository {
            db: self.db.clone(),
        }
    }

    pub fn password_hasher(&self) -> Argon2Hasher {
        Argon2Hasher
    }
}
