use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use entity::{CreateEmployeeRequest, Employee, UpdateEmployeeRequest};

use crate::employees::{EmployeeStore, StoreError, StoreResult};

// bcrypt's minimum work factor; these hashes only back assertions.
const TEST_HASH_COST: u32 = 4;

/// In-memory [`EmployeeStore`] with the same observable semantics as the SQL
/// store: monotonic id assignment, created-at defaulting, hash rotation only
/// on a non-blank update password, hard deletes. Used by router tests and
/// handy for local demos without a database.
#[derive(Default)]
pub struct MemoryEmployeeStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i32,
    rows: Vec<StoredEmployee>,
}

#[derive(Clone)]
struct StoredEmployee {
    record: Employee,
    password_hash: String,
}

impl MemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored hash for an id, for asserting credential rotation in tests.
    pub fn password_hash(&self, employee_id: i32) -> Option<String> {
        let inner = self.lock();
        inner
            .rows
            .iter()
            .find(|row| row.record.employee_id == employee_id)
            .map(|row| row.password_hash.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl EmployeeStore for MemoryEmployeeStore {
    async fn list(&self) -> StoreResult<Vec<Employee>> {
        let inner = self.lock();
        Ok(inner.rows.iter().map(|row| row.record.clone()).collect())
    }

    async fn create(&self, request: &CreateEmployeeRequest) -> StoreResult<Employee> {
        if request.password.trim().is_empty() {
            return Err(StoreError::MissingPassword);
        }
        let password_hash = bcrypt::hash(&request.password, TEST_HASH_COST)?;

        let mut inner = self.lock();
        inner.next_id += 1;
        let record = Employee {
            employee_id: inner.next_id,
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            email: request.email.clone(),
            hire_date: request.hire_date,
            is_active: request.is_active,
            created_at: Some(request.created_at.unwrap_or_else(Utc::now)),
        };
        inner.rows.push(StoredEmployee {
            record: record.clone(),
            password_hash,
        });
        Ok(record)
    }

    async fn update(
        &self,
        employee_id: i32,
        request: &UpdateEmployeeRequest,
    ) -> StoreResult<Option<Employee>> {
        let password_hash = match request.password_change() {
            Some(plain) => Some(bcrypt::hash(plain, TEST_HASH_COST)?),
            None => None,
        };

        let mut inner = self.lock();
        let Some(row) = inner
            .rows
            .iter_mut()
            .find(|row| row.record.employee_id == employee_id)
        else {
            return Ok(None);
        };
        row.record.first_name = request.first_name.clone();
        row.record.last_name = request.last_name.clone();
        row.record.email = request.email.clone();
        row.record.hire_date = request.hire_date;
        row.record.is_active = request.is_active;
        row.record.created_at = request.created_at;
        if let Some(hash) = password_hash {
            row.password_hash = hash;
        }
        Ok(Some(row.record.clone()))
    }

    async fn delete(&self, employee_id: i32) -> StoreResult<bool> {
        let mut inner = self.lock();
        let before = inner.rows.len();
        inner.rows.retain(|row| row.record.employee_id != employee_id);
        Ok(inner.rows.len() < before)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
