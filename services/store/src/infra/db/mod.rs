//! sea-orm implementations of the repository traits.

mod address;
mod cart;
mod catalog;
mod dashboard;
mod order;
mod user;

use sea_orm::{DbErr, SqlErr, TransactionError};

use crate::error::StoreServiceError;

pub use address::DbAddressRepository;
pub use cart::DbCartRepository;
pub use catalog::{DbCategoryRepository, DbProductRepository};
pub use dashboard::DbDashboardRepository;
pub use order::DbOrderRepository;
pub use user::DbUserRepository;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}

/// Wrap a storage error as `Internal` with context.
fn internal(err: DbErr, context: &'static str) -> StoreServiceError {
    anyhow::Error::new(err).context(context).into()
}

/// Unwrap a transaction error: domain errors pass through, connection
/// failures become `Internal`.
fn txn_error(
    context: &'static str,
) -> impl FnOnce(TransactionError<StoreServiceError>) -> StoreServiceError {
    move |err| match err {
        TransactionError::Connection(e) => internal(e, context),
        TransactionError::Transaction(e) => e,
    }
}
