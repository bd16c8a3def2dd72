//! The customer composite service: the one place where a customer row and
//! its details row are written as a single atomic unit.

use crate::error::DbError;
use crate::repository::{CustomerDetailsRepository, CustomerRepository};
use core_types::{Customer, CustomerDetails, CustomerFullView};
use sqlx::postgres::PgPool;
use sqlx::{PgConnection, Postgres, Transaction};
use std::collections::HashMap;

/// Orchestrates customer + details mutations under one transaction per call.
///
/// Each operation acquires a session, switches it to explicit-commit mode,
/// runs both row operations through the repositories' session-taking
/// methods, then commits or rolls back. The session is released with its
/// implicit-commit behaviour restored, so it can be safely reused.
#[derive(Debug, Clone)]
pub struct CustomerService {
    pool: PgPool,
    customers: CustomerRepository,
    details: CustomerDetailsRepository,
}

impl CustomerService {
    /// Creates the service and its two repositories over a shared pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            customers: CustomerRepository::new(pool.clone()),
            details: CustomerDetailsRepository::new(pool.clone()),
            pool,
        }
    }

    /// The repository view of the customer table, for plain reads.
    pub fn customers(&self) -> &CustomerRepository {
        &self.customers
    }

    /// The repository view of the details table, for plain reads.
    pub fn details(&self) -> &CustomerDetailsRepository {
        &self.details
    }

    /// Stores a new customer together with its details row.
    ///
    /// Either both rows are written or neither is: any failure rolls the
    /// transaction back and surfaces as `DbError::Persistence` carrying the
    /// underlying cause.
    pub async fn create_customer_with_details(
        &self,
        customer: &Customer,
        details: &CustomerDetails,
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await.map_err(DbError::Connectivity)?;
        let written = self.create_on(&mut tx, customer, details).await;
        self.commit_or_rollback(tx, written).await
    }

    async fn create_on(
        &self,
        conn: &mut PgConnection,
        customer: &Customer,
        details: &CustomerDetails,
    ) -> Result<(), DbError> {
        self.customers.insert_on(&mut *conn, customer).await?;
        self.details.insert_on(&mut *conn, details).await?;
        Ok(())
    }

    /// Updates a customer and upserts its details row.
    ///
    /// The details row is looked up on the same session: if absent it is
    /// inserted, otherwise updated, so the row appears automatically the
    /// first time details are entered for an existing customer. A zero row
    /// count from the customer update is not an error here; the caller
    /// validated existence before invoking this.
    pub async fn update_customer_with_details(
        &self,
        customer: &Customer,
        details: &CustomerDetails,
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await.map_err(DbError::Connectivity)?;
        let written = self.upsert_on(&mut tx, customer, details).await;
        self.commit_or_rollback(tx, written).await
    }

    async fn upsert_on(
        &self,
        conn: &mut PgConnection,
        customer: &Customer,
        details: &CustomerDetails,
    ) -> Result<(), DbError> {
        self.customers.update_on(&mut *conn, customer).await?;

        if self
            .details
            .find_by_id_on(&mut *conn, customer.id)
            .await?
            .is_none()
        {
            self.details.insert_on(&mut *conn, details).await?;
        } else {
            self.details.update_on(&mut *conn, details).await?;
        }
        Ok(())
    }

    /// Removes a customer and its details row in one transaction.
    ///
    /// Returns the number of customer rows deleted: 0 when neither row
    /// existed, otherwise the customer count. Both deletes share the same
    /// session, so a failure midway leaves both rows in place.
    pub async fn delete_customer_and_details(&self, id: i32) -> Result<u64, DbError> {
        let mut tx = self.pool.begin().await.map_err(DbError::Connectivity)?;
        let deleted = self.delete_on(&mut tx, id).await;
        self.commit_or_rollback(tx, deleted).await
    }

    async fn delete_on(&self, conn: &mut PgConnection, id: i32) -> Result<u64, DbError> {
        let details_deleted = self.details.delete_by_id_on(&mut *conn, id).await?;
        let customers_deleted = self.customers.delete_by_id_on(&mut *conn, id).await?;

        if details_deleted == 0 && customers_deleted == 0 {
            Ok(0)
        } else {
            Ok(customers_deleted)
        }
    }

    /// Commits on success; rolls back and wraps the cause on failure.
    async fn commit_or_rollback<T>(
        &self,
        tx: Transaction<'_, Postgres>,
        outcome: Result<T, DbError>,
    ) -> Result<T, DbError> {
        match outcome {
            Ok(value) => {
                tx.commit().await.map_err(DbError::Query)?;
                Ok(value)
            }
            Err(cause) => {
                tracing::warn!(error = %cause, "Customer transaction rolled back.");
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = ?rollback_err, "Rollback itself failed.");
                }
                Err(DbError::Persistence {
                    source: Box::new(cause),
                })
            }
        }
    }

    /// Returns the joined view of every customer that has a details row.
    ///
    /// Both collections are loaded once and joined in memory on id; output
    /// follows customer iteration order (id ascending). Read-only, snapshot
    /// at read time.
    pub async fn list_customers_full(&self) -> Result<Vec<CustomerFullView>, DbError> {
        let customers = self.customers.find_all().await?;
        let details = self.details.find_all().await?;

        let details_by_id: HashMap<i32, CustomerDetails> =
            details.into_iter().map(|d| (d.id, d)).collect();

        Ok(customers
            .iter()
            .filter_map(|customer| {
                details_by_id
                    .get(&customer.id)
                    .map(|details| CustomerFullView::from_parts(customer, details))
            })
            .collect())
    }
}
