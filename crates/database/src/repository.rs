//! Per-entity repositories over the four master-data tables.
//!
//! Every repository holds a clone of the shared connection pool. The
//! session-taking `_on` methods are the single authoritative implementation
//! of each write: they run on whatever session the caller provides and never
//! commit, roll back, or close it. The plain variants are convenience
//! wrappers that acquire a pooled session, so a standalone call is one short
//! implicit-commit statement.
//!
//! Each SQL statement is defined exactly once, as a constant next to the
//! repository that owns it.

use crate::error::{DbError, write_error};
use crate::mappers;
use core_types::{Courier, Customer, CustomerDetails, SalesAgent};
use sqlx::postgres::PgPool;
use sqlx::PgConnection;

// ==============================================================================
// Customers (table `cliente`)
// ==============================================================================

const INSERT_CUSTOMER: &str = "INSERT INTO cliente (id, nombre, email) VALUES ($1, $2, $3)";

const SELECT_CUSTOMER_BY_ID: &str = "SELECT id, nombre, email FROM cliente WHERE id = $1";

const SELECT_ALL_CUSTOMERS: &str = "SELECT id, nombre, email FROM cliente ORDER BY id";

const SEARCH_CUSTOMERS: &str = "\
    SELECT id, nombre, email FROM cliente \
    WHERE CAST(id AS TEXT) ILIKE $1 OR nombre ILIKE $1 OR email ILIKE $1 \
    ORDER BY id";

const UPDATE_CUSTOMER: &str = "UPDATE cliente SET nombre = $2, email = $3 WHERE id = $1";

const DELETE_CUSTOMER: &str = "DELETE FROM cliente WHERE id = $1";

/// Data access for the `cliente` table.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    /// Creates a new repository over a shared connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a customer in its own short transaction.
    ///
    /// Fails with `DbError::DuplicateKey` if the id is already taken.
    pub async fn insert(&self, customer: &Customer) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connectivity)?;
        self.insert_on(&mut conn, customer).await
    }

    /// Inserts a customer on a caller-provided session.
    ///
    /// Participates in whatever transaction the session carries; it is the
    /// caller's job to commit or roll back.
    pub async fn insert_on(
        &self,
        conn: &mut PgConnection,
        customer: &Customer,
    ) -> Result<(), DbError> {
        sqlx::query(INSERT_CUSTOMER)
            .bind(customer.id)
            .bind(&customer.name)
            .bind(&customer.email)
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(())
    }

    /// Fetches the customer with the given id, or `None` when absent.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Customer>, DbError> {
        let row = sqlx::query(SELECT_CUSTOMER_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::Query)?;

        row.map(|row| mappers::customer_from_row(&row))
            .transpose()
            .map_err(DbError::Query)
    }

    /// Fetches every customer, ordered by id ascending.
    pub async fn find_all(&self) -> Result<Vec<Customer>, DbError> {
        let rows = sqlx::query(SELECT_ALL_CUSTOMERS)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Query)?;

        rows.iter()
            .map(mappers::customer_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(DbError::Query)
    }

    /// Case-insensitive substring search over id, name and email.
    ///
    /// The match runs in the database engine; the id column is compared in
    /// its textual form. A blank pattern lists everything.
    pub async fn search(&self, pattern: &str) -> Result<Vec<Customer>, DbError> {
        if pattern.trim().is_empty() {
            return self.find_all().await;
        }

        let like = format!("%{pattern}%");
        tracing::debug!(pattern = %pattern, "Searching customers.");

        let rows = sqlx::query(SEARCH_CUSTOMERS)
            .bind(&like)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Query)?;

        rows.iter()
            .map(mappers::customer_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(DbError::Query)
    }

    /// Updates a customer's name and email in its own short transaction.
    ///
    /// Returns the number of rows affected; 0 means the id does not exist
    /// and the store is unchanged.
    pub async fn update(&self, customer: &Customer) -> Result<u64, DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connectivity)?;
        self.update_on(&mut conn, customer).await
    }

    /// Updates a customer on a caller-provided session.
    pub async fn update_on(
        &self,
        conn: &mut PgConnection,
        customer: &Customer,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(UPDATE_CUSTOMER)
            .bind(customer.id)
            .bind(&customer.name)
            .bind(&customer.email)
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(result.rows_affected())
    }

    /// Deletes the customer with the given id in its own short transaction.
    ///
    /// Returns the number of rows affected; 0 means the id does not exist.
    pub async fn delete_by_id(&self, id: i32) -> Result<u64, DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connectivity)?;
        self.delete_by_id_on(&mut conn, id).await
    }

    /// Deletes a customer on a caller-provided session.
    pub async fn delete_by_id_on(&self, conn: &mut PgConnection, id: i32) -> Result<u64, DbError> {
        let result = sqlx::query(DELETE_CUSTOMER)
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(result.rows_affected())
    }
}

// ==============================================================================
// Customer details (table `detalle_cliente`)
// ==============================================================================

const INSERT_DETAILS: &str =
    "INSERT INTO detalle_cliente (id, direccion, telefono, notas) VALUES ($1, $2, $3, $4)";

const SELECT_DETAILS_BY_ID: &str =
    "SELECT id, direccion, telefono, notas FROM detalle_cliente WHERE id = $1";

const SELECT_ALL_DETAILS: &str =
    "SELECT id, direccion, telefono, notas FROM detalle_cliente ORDER BY id";

const UPDATE_DETAILS: &str =
    "UPDATE detalle_cliente SET direccion = $2, telefono = $3, notas = $4 WHERE id = $1";

const DELETE_DETAILS: &str = "DELETE FROM detalle_cliente WHERE id = $1";

/// Data access for the `detalle_cliente` table.
///
/// A details row shares its customer's primary key, so inserting one for a
/// missing customer is a referential error, and there is never more than one
/// per customer.
#[derive(Debug, Clone)]
pub struct CustomerDetailsRepository {
    pool: PgPool,
}

impl CustomerDetailsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a details row in its own short transaction.
    ///
    /// Fails with `DbError::DuplicateKey` when the customer already has a
    /// details row, and with `DbError::Referential` when no customer with
    /// this id exists.
    pub async fn insert(&self, details: &CustomerDetails) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connectivity)?;
        self.insert_on(&mut conn, details).await
    }

    /// Inserts a details row on a caller-provided session.
    pub async fn insert_on(
        &self,
        conn: &mut PgConnection,
        details: &CustomerDetails,
    ) -> Result<(), DbError> {
        sqlx::query(INSERT_DETAILS)
            .bind(details.id)
            .bind(mappers::text_param(details.address.as_deref()))
            .bind(mappers::text_param(details.phone.as_deref()))
            .bind(mappers::text_param(details.notes.as_deref()))
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(())
    }

    /// Fetches the details row for the given customer id.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<CustomerDetails>, DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connectivity)?;
        self.find_by_id_on(&mut conn, id).await
    }

    /// Fetches a details row on a caller-provided session.
    ///
    /// The composite service uses this to decide between insert and update
    /// without leaving its transaction.
    pub async fn find_by_id_on(
        &self,
        conn: &mut PgConnection,
        id: i32,
    ) -> Result<Option<CustomerDetails>, DbError> {
        let row = sqlx::query(SELECT_DETAILS_BY_ID)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(DbError::Query)?;

        row.map(|row| mappers::details_from_row(&row))
            .transpose()
            .map_err(DbError::Query)
    }

    /// Fetches every details row, ordered by id ascending.
    pub async fn find_all(&self) -> Result<Vec<CustomerDetails>, DbError> {
        let rows = sqlx::query(SELECT_ALL_DETAILS)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Query)?;

        rows.iter()
            .map(mappers::details_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(DbError::Query)
    }

    /// Updates a details row in its own short transaction. Returns the
    /// number of rows affected; 0 means no details exist for this id.
    pub async fn update(&self, details: &CustomerDetails) -> Result<u64, DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connectivity)?;
        self.update_on(&mut conn, details).await
    }

    /// Updates a details row on a caller-provided session.
    pub async fn update_on(
        &self,
        conn: &mut PgConnection,
        details: &CustomerDetails,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(UPDATE_DETAILS)
            .bind(details.id)
            .bind(mappers::text_param(details.address.as_deref()))
            .bind(mappers::text_param(details.phone.as_deref()))
            .bind(mappers::text_param(details.notes.as_deref()))
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(result.rows_affected())
    }

    /// Deletes the details row for the given customer id. Returns the number
    /// of rows affected; 0 means no details existed.
    pub async fn delete_by_id(&self, id: i32) -> Result<u64, DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connectivity)?;
        self.delete_by_id_on(&mut conn, id).await
    }

    /// Deletes a details row on a caller-provided session.
    pub async fn delete_by_id_on(&self, conn: &mut PgConnection, id: i32) -> Result<u64, DbError> {
        let result = sqlx::query(DELETE_DETAILS)
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(result.rows_affected())
    }
}

// ==============================================================================
// Sales agents (table `comercial`)
// ==============================================================================

const INSERT_AGENT: &str = "INSERT INTO comercial (id, nombre, email) VALUES ($1, $2, $3)";

const SELECT_AGENT_BY_ID: &str = "SELECT id, nombre, email FROM comercial WHERE id = $1";

const SELECT_ALL_AGENTS: &str = "SELECT id, nombre, email FROM comercial ORDER BY id";

const UPDATE_AGENT: &str = "UPDATE comercial SET nombre = $2, email = $3 WHERE id = $1";

const DELETE_AGENT: &str = "DELETE FROM comercial WHERE id = $1";

/// Data access for the `comercial` table.
#[derive(Debug, Clone)]
pub struct SalesAgentRepository {
    pool: PgPool,
}

impl SalesAgentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, agent: &SalesAgent) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connectivity)?;
        self.insert_on(&mut conn, agent).await
    }

    pub async fn insert_on(
        &self,
        conn: &mut PgConnection,
        agent: &SalesAgent,
    ) -> Result<(), DbError> {
        sqlx::query(INSERT_AGENT)
            .bind(agent.id)
            .bind(&agent.name)
            .bind(&agent.email)
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<SalesAgent>, DbError> {
        let row = sqlx::query(SELECT_AGENT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::Query)?;

        row.map(|row| mappers::agent_from_row(&row))
            .transpose()
            .map_err(DbError::Query)
    }

    pub async fn find_all(&self) -> Result<Vec<SalesAgent>, DbError> {
        let rows = sqlx::query(SELECT_ALL_AGENTS)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Query)?;

        rows.iter()
            .map(mappers::agent_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(DbError::Query)
    }

    pub async fn update(&self, agent: &SalesAgent) -> Result<u64, DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connectivity)?;
        self.update_on(&mut conn, agent).await
    }

    pub async fn update_on(
        &self,
        conn: &mut PgConnection,
        agent: &SalesAgent,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(UPDATE_AGENT)
            .bind(agent.id)
            .bind(&agent.name)
            .bind(&agent.email)
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_id(&self, id: i32) -> Result<u64, DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connectivity)?;
        self.delete_by_id_on(&mut conn, id).await
    }

    pub async fn delete_by_id_on(&self, conn: &mut PgConnection, id: i32) -> Result<u64, DbError> {
        let result = sqlx::query(DELETE_AGENT)
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(result.rows_affected())
    }
}

// ==============================================================================
// Couriers (table `repartidor`)
// ==============================================================================

const INSERT_COURIER: &str = "INSERT INTO repartidor (id, nombre, telefono) VALUES ($1, $2, $3)";

const SELECT_COURIER_BY_ID: &str = "SELECT id, nombre, telefono FROM repartidor WHERE id = $1";

const SELECT_ALL_COURIERS: &str = "SELECT id, nombre, telefono FROM repartidor ORDER BY id";

const SEARCH_COURIERS: &str = "\
    SELECT id, nombre, telefono FROM repartidor \
    WHERE CAST(id AS TEXT) ILIKE $1 OR nombre ILIKE $1 OR telefono ILIKE $1 \
    ORDER BY id";

const UPDATE_COURIER: &str = "UPDATE repartidor SET nombre = $2, telefono = $3 WHERE id = $1";

const DELETE_COURIER: &str = "DELETE FROM repartidor WHERE id = $1";

/// Data access for the `repartidor` table.
#[derive(Debug, Clone)]
pub struct CourierRepository {
    pool: PgPool,
}

impl CourierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, courier: &Courier) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connectivity)?;
        self.insert_on(&mut conn, courier).await
    }

    pub async fn insert_on(
        &self,
        conn: &mut PgConnection,
        courier: &Courier,
    ) -> Result<(), DbError> {
        sqlx::query(INSERT_COURIER)
            .bind(courier.id)
            .bind(&courier.name)
            .bind(mappers::text_param(courier.phone.as_deref()))
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Courier>, DbError> {
        let row = sqlx::query(SELECT_COURIER_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::Query)?;

        row.map(|row| mappers::courier_from_row(&row))
            .transpose()
            .map_err(DbError::Query)
    }

    pub async fn find_all(&self) -> Result<Vec<Courier>, DbError> {
        let rows = sqlx::query(SELECT_ALL_COURIERS)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Query)?;

        rows.iter()
            .map(mappers::courier_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(DbError::Query)
    }

    /// Case-insensitive substring search over id, name and phone.
    /// A blank pattern lists everything.
    pub async fn search(&self, pattern: &str) -> Result<Vec<Courier>, DbError> {
        if pattern.trim().is_empty() {
            return self.find_all().await;
        }

        let like = format!("%{pattern}%");
        tracing::debug!(pattern = %pattern, "Searching couriers.");

        let rows = sqlx::query(SEARCH_COURIERS)
            .bind(&like)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Query)?;

        rows.iter()
            .map(mappers::courier_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(DbError::Query)
    }

    pub async fn update(&self, courier: &Courier) -> Result<u64, DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connectivity)?;
        self.update_on(&mut conn, courier).await
    }

    pub async fn update_on(
        &self,
        conn: &mut PgConnection,
        courier: &Courier,
    ) -> Result<u64, DbError> {
        let result = sqlx::query(UPDATE_COURIER)
            .bind(courier.id)
            .bind(&courier.name)
            .bind(mappers::text_param(courier.phone.as_deref()))
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_id(&self, id: i32) -> Result<u64, DbError> {
        let mut conn = self.pool.acquire().await.map_err(DbError::Connectivity)?;
        self.delete_by_id_on(&mut conn, id).await
    }

    pub async fn delete_by_id_on(&self, conn: &mut PgConnection, id: i32) -> Result<u64, DbError> {
        let result = sqlx::query(DELETE_COURIER)
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(write_error)?;
        Ok(result.rows_affected())
    }
}
