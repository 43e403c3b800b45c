//! PostgreSQL implementation of ItemRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use roster_core::auditing::AuditContext;
use roster_core::entities::{Item, Persistable};
use roster_core::error::DomainError;
use roster_core::traits::{CrudRepository, RepoResult};

use crate::models::ItemModel;

use super::error::{item_not_found, map_db_error, map_unique_violation};

/// PostgreSQL implementation of ItemRepository
#[derive(Clone)]
pub struct PgItemRepository {
    pool: PgPool,
}

impl PgItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CrudRepository<Item, String> for PgItemRepository {
    /// New items are inserted with the context's timestamp. A stored item is
    /// merged with a single upsert; the row is never read first.
    #[instrument(skip(self, item, audit), fields(item_id = %item.id))]
    async fn save(&self, item: Item, audit: &AuditContext) -> RepoResult<Item> {
        if item.is_new() {
            let model = sqlx::query_as::<_, ItemModel>(
                r"
                INSERT INTO item (item_id, created_date)
                VALUES ($1, $2)
                RETURNING item_id, created_date
                ",
            )
            .bind(&item.id)
            .bind(audit.now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                map_unique_violation(e, || DomainError::ItemAlreadyExists(item.id.clone()))
            })?;

            return Ok(Item::from(model));
        }

        debug!("Merging detached item");
        let model = sqlx::query_as::<_, ItemModel>(
            r"
            INSERT INTO item (item_id, created_date)
            VALUES ($1, $2)
            ON CONFLICT (item_id) DO UPDATE SET created_date = EXCLUDED.created_date
            RETURNING item_id, created_date
            ",
        )
        .bind(&item.id)
        .bind(item.created_date)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(Item::from(model))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: String) -> RepoResult<Option<Item>> {
        let model = sqlx::query_as::<_, ItemModel>(
            "SELECT item_id, created_date FROM item WHERE item_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(model.map(Item::from))
    }

    #[instrument(skip(self))]
    async fn exists_by_id(&self, id: String) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM item WHERE item_id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<Item>> {
        let models =
            sqlx::query_as::<_, ItemModel>("SELECT item_id, created_date FROM item ORDER BY item_id")
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_error)?;

        Ok(models.into_iter().map(Item::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT count(*) FROM item")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, item), fields(item_id = %item.id))]
    async fn delete(&self, item: &Item) -> RepoResult<()> {
        self.delete_by_id(item.id.clone()).await
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: String) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM item WHERE item_id = $1")
            .bind(&id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(item_not_found(&id));
        }

        Ok(())
    }
}
