//! PostgreSQL implementation of the ProfileReader port.

use async_trait::async_trait;
use sqlx::PgPool;
use zman_core::{OwnerId, ProfileReader, StoreError};

use super::into_store_error;

pub struct PgProfileReader {
    pool: PgPool,
}

impl PgProfileReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileReader for PgProfileReader {
    async fn hourly_rate(&self, owner: OwnerId) -> Result<Option<f64>, StoreError> {
        let rate = sqlx::query_scalar::<_, Option<f64>>(
            "SELECT hourly_rate FROM profiles WHERE owner_id = $1",
        )
        .bind(owner.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(into_store_error)?;

        Ok(rate.flatten())
    }
}
