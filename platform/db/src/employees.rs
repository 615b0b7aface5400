use async_trait::async_trait;
use chrono::Utc;
use entity::{CreateEmployeeRequest, Employee, UpdateEmployeeRequest};
use thiserror::Error;
use tracing::debug;

use crate::DbPool;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Create was invoked without a password. The HTTP layer rejects this
    /// before the store is reached, so hitting it means a caller bug, not a
    /// user mistake.
    #[error("a password is required to create an employee")]
    MissingPassword,
    /// The insert procedure completed without returning the new row; the
    /// store is in an unexpected state and nothing can be recovered here.
    #[error("insert did not return the created row")]
    InsertReturnedNoRow,
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Data-access contract for the employees table.
///
/// Four operations, each executed against a stored procedure. One production
/// implementation bound to Postgres ([`SqlEmployeeStore`]) and one in-memory
/// fake for tests ([`crate::MemoryEmployeeStore`]); handlers only see this
/// trait.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// All rows, in whatever order the procedure returns them.
    async fn list(&self) -> StoreResult<Vec<Employee>>;

    /// Insert one row with a hashed password and return it with the
    /// store-assigned id.
    async fn create(&self, request: &CreateEmployeeRequest) -> StoreResult<Employee>;

    /// Full replace of the mutable fields. `Ok(None)` when no row matches the
    /// id. The stored credential only changes when the request carries a
    /// non-blank password.
    async fn update(
        &self,
        employee_id: i32,
        request: &UpdateEmployeeRequest,
    ) -> StoreResult<Option<Employee>>;

    /// Hard delete. `Ok(true)` when a row was removed.
    async fn delete(&self, employee_id: i32) -> StoreResult<bool>;

    /// Cheap connectivity probe for the health endpoint.
    async fn ping(&self) -> StoreResult<()>;
}

/// Store backed by the four `sp_*` stored procedures.
///
/// Every operation acquires its own connection for the duration of that
/// single call; release happens on all exit paths when the guard drops.
/// Result rows map to [`Employee`] by column name, so procedure output
/// order is not load-bearing. Cancellation is drop-based: dropping an
/// operation future aborts the in-flight query.
pub struct SqlEmployeeStore {
    pool: DbPool,
}

impl SqlEmployeeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for SqlEmployeeStore {
    async fn list(&self) -> StoreResult<Vec<Employee>> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query_as::<_, Employee>("SELECT * FROM sp_get_all_employees()")
            .fetch_all(&mut *conn)
            .await?;
        debug!(count = rows.len(), "listed employees");
        Ok(rows)
    }

    async fn create(&self, request: &CreateEmployeeRequest) -> StoreResult<Employee> {
        if request.password.trim().is_empty() {
            return Err(StoreError::MissingPassword);
        }
        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)?;
        let created_at = request.created_at.unwrap_or_else(Utc::now);

        let mut conn = self.pool.acquire().await?;
        let inserted = sqlx::query_as::<_, Employee>(
            "SELECT * FROM sp_insert_employee($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(request.email.as_deref())
        .bind(request.hire_date)
        .bind(request.is_active)
        .bind(created_at)
        .bind(&password_hash)
        .fetch_optional(&mut *conn)
        .await?;
        inserted.ok_or(StoreError::InsertReturnedNoRow)
    }

    async fn update(
        &self,
        employee_id: i32,
        request: &UpdateEmployeeRequest,
    ) -> StoreResult<Option<Employee>> {
        // NULL password parameter means "leave the credential alone" on the
        // procedure side.
        let password_hash = match request.password_change() {
            Some(plain) => Some(bcrypt::hash(plain, bcrypt::DEFAULT_COST)?),
            None => None,
        };

        let mut conn = self.pool.acquire().await?;
        let updated = sqlx::query_as::<_, Employee>(
            "SELECT * FROM sp_update_employee($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(employee_id)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(request.email.as_deref())
        .bind(request.hire_date)
        .bind(request.is_active)
        .bind(request.created_at)
        .bind(password_hash.as_deref())
        .fetch_optional(&mut *conn)
        .await?;
        Ok(updated)
    }

    async fn delete(&self, employee_id: i32) -> StoreResult<bool> {
        let mut conn = self.pool.acquire().await?;
        let affected: i32 = sqlx::query_scalar("SELECT sp_delete_employee($1)")
            .bind(employee_id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(affected > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }
}
