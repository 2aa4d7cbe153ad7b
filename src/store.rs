//! Data store gateway for the `clientes` table.
//!
//! Every operation opens its own MySQL connection and releases it when the
//! operation ends, on success or failure. Failures are logged and surfaced as
//! sentinel returns; nothing here panics or propagates an error into the
//! chat loop.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnection, MySqlRow};
use sqlx::{Column, Connection, Row};
use tracing::{error, info};

use crate::config::DbConfig;
use crate::error::StoreError;

/// A row of the `clientes` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Cliente {
    pub id: i32,
    pub nome: String,
    pub renda: f64,
    pub status: String,
    pub genero: String,
}

/// Fields of a partial update; `None` means "keep the current value".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClienteUpdate {
    pub nome: Option<String>,
    pub renda: Option<f64>,
    pub status: Option<String>,
    pub genero: Option<String>,
}

impl ClienteUpdate {
    pub fn is_empty(&self) -> bool {
        self.nome.is_none()
            && self.renda.is_none()
            && self.status.is_none()
            && self.genero.is_none()
    }
}

/// Result of a partial update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    NothingToUpdate,
    Failed,
}

/// Storage operations the dispatcher depends on.
#[async_trait]
pub trait ClienteStore: Send + Sync {
    /// Creates the database and table if absent. Logs and returns on error.
    async fn ensure_schema(&self);

    /// Inserts a customer with all fields bound as parameters. Returns
    /// `false` without effect when the connection fails or the id already
    /// exists.
    async fn add(&self, cliente: &Cliente) -> bool;

    /// Applies the present fields of `changes` to the given id. Executes no
    /// statement when every field is absent.
    async fn update(&self, id: i32, changes: &ClienteUpdate) -> UpdateOutcome;

    /// Removes the row with the given id; zero matching rows is not an error.
    async fn delete(&self, id: i32) -> bool;

    /// Total row count, or 0 when the store is unreachable.
    async fn count(&self) -> u64;

    /// Executes an already-formed SQL string and returns the rendered rows,
    /// or `None` on failure. Translator output runs through here unchecked;
    /// this is the trust boundary of the whole system.
    async fn run_query(&self, sql: &str) -> Option<Vec<String>>;
}

/// Builds the UPDATE statement for the present fields, binding order
/// nome, renda, status, genero, id. `None` when there is nothing to set.
pub(crate) fn update_statement(changes: &ClienteUpdate) -> Option<String> {
    let mut assignments = Vec::new();
    if changes.nome.is_some() {
        assignments.push("nome = ?");
    }
    if changes.renda.is_some() {
        assignments.push("renda = ?");
    }
    if changes.status.is_some() {
        assignments.push("status = ?");
    }
    if changes.genero.is_some() {
        assignments.push("genero = ?");
    }

    if assignments.is_empty() {
        return None;
    }

    Some(format!(
        "UPDATE clientes SET {} WHERE id = ?",
        assignments.join(", ")
    ))
}

const SEED: [(i32, &str, f64, &str, &str); 6] = [
    (1, "João da Silva", 5000.00, "ativo", "masculino"),
    (2, "Maria Souza", 1200.50, "nome sujo", "feminino"),
    (3, "Carlos Santos", 8500.75, "ativo", "masculino"),
    (4, "Ana Rodrigues", 2500.00, "nome sujo", "feminino"),
    (5, "Pedro Almeida", 3200.00, "ativo", "masculino"),
    (6, "Fernanda Lima", 900.00, "nome sujo", "feminino"),
];

pub fn seed_clientes() -> Vec<Cliente> {
    SEED.iter()
        .map(|&(id, nome, renda, status, genero)| Cliente {
            id,
            nome: nome.to_string(),
            renda,
            status: status.to_string(),
            genero: genero.to_string(),
        })
        .collect()
}

/// Inserts the seed customers when the table is empty; returns how many rows
/// were inserted (zero when the table already has data).
pub async fn seed_if_empty(store: &dyn ClienteStore) -> usize {
    if store.count().await > 0 {
        return 0;
    }

    let mut inserted = 0;
    for cliente in seed_clientes() {
        if store.add(&cliente).await {
            inserted += 1;
        }
    }
    inserted
}

/// MySQL-backed [`ClienteStore`].
pub struct MySqlClienteStore {
    config: DbConfig,
}

impl MySqlClienteStore {
    pub fn new(config: DbConfig) -> Self {
        MySqlClienteStore { config }
    }

    async fn connect(&self) -> Result<MySqlConnection, StoreError> {
        MySqlConnection::connect(&self.config.url())
            .await
            .map_err(StoreError::Connection)
    }

    async fn connect_no_db(&self) -> Result<MySqlConnection, StoreError> {
        MySqlConnection::connect(&self.config.url_no_db())
            .await
            .map_err(StoreError::Connection)
    }

    async fn try_ensure_schema(&self) -> Result<(), StoreError> {
        let mut conn = self.connect_no_db().await?;

        let create_db = format!("CREATE DATABASE IF NOT EXISTS `{}`", self.config.database);
        sqlx::query(&create_db)
            .execute(&mut conn)
            .await
            .map_err(StoreError::Statement)?;

        let create_table = format!(
            "CREATE TABLE IF NOT EXISTS `{}`.clientes (
                id INT PRIMARY KEY,
                nome VARCHAR(255),
                renda FLOAT,
                status VARCHAR(50),
                genero VARCHAR(50)
            )",
            self.config.database
        );
        sqlx::query(&create_table)
            .execute(&mut conn)
            .await
            .map_err(StoreError::Statement)?;

        Ok(())
    }

    async fn try_add(&self, cliente: &Cliente) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;

        sqlx::query(
            "INSERT INTO clientes (id, nome, renda, status, genero) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(cliente.id)
        .bind(&cliente.nome)
        .bind(cliente.renda)
        .bind(&cliente.status)
        .bind(&cliente.genero)
        .execute(&mut conn)
        .await
        .map_err(StoreError::Statement)?;

        Ok(())
    }

    async fn try_update(
        &self,
        id: i32,
        changes: &ClienteUpdate,
    ) -> Result<UpdateOutcome, StoreError> {
        let Some(sql) = update_statement(changes) else {
            return Ok(UpdateOutcome::NothingToUpdate);
        };

        let mut conn = self.connect().await?;

        let mut query = sqlx::query(&sql);
        if let Some(nome) = &changes.nome {
            query = query.bind(nome);
        }
        if let Some(renda) = changes.renda {
            query = query.bind(renda);
        }
        if let Some(status) = &changes.status {
            query = query.bind(status);
        }
        if let Some(genero) = &changes.genero {
            query = query.bind(genero);
        }
        query = query.bind(id);

        query
            .execute(&mut conn)
            .await
            .map_err(StoreError::Statement)?;

        Ok(UpdateOutcome::Applied)
    }

    async fn try_delete(&self, id: i32) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;

        sqlx::query("DELETE FROM clientes WHERE id = ?")
            .bind(id)
            .execute(&mut conn)
            .await
            .map_err(StoreError::Statement)?;

        Ok(())
    }

    async fn try_count(&self) -> Result<u64, StoreError> {
        let mut conn = self.connect().await?;

        let row = sqlx::query("SELECT COUNT(*) FROM clientes")
            .fetch_one(&mut conn)
            .await
            .map_err(StoreError::Statement)?;

        let count: i64 = row.try_get(0).map_err(StoreError::Statement)?;
        Ok(count.max(0) as u64)
    }

    async fn try_run_query(&self, sql: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.connect().await?;

        let rows = sqlx::query(sql)
            .fetch_all(&mut conn)
            .await
            .map_err(StoreError::Statement)?;

        Ok(rows.iter().map(render_row).collect())
    }
}

#[async_trait]
impl ClienteStore for MySqlClienteStore {
    async fn ensure_schema(&self) {
        match self.try_ensure_schema().await {
            Ok(()) => info!(database = %self.config.database, "schema verified"),
            Err(err) => error!(%err, "failed to set up the database"),
        }
    }

    async fn add(&self, cliente: &Cliente) -> bool {
        match self.try_add(cliente).await {
            Ok(()) => true,
            Err(err) => {
                error!(id = cliente.id, %err, "failed to insert customer");
                false
            }
        }
    }

    async fn update(&self, id: i32, changes: &ClienteUpdate) -> UpdateOutcome {
        match self.try_update(id, changes).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(id, %err, "failed to update customer");
                UpdateOutcome::Failed
            }
        }
    }

    async fn delete(&self, id: i32) -> bool {
        match self.try_delete(id).await {
            Ok(()) => true,
            Err(err) => {
                error!(id, %err, "failed to delete customer");
                false
            }
        }
    }

    async fn count(&self) -> u64 {
        match self.try_count().await {
            Ok(count) => count,
            Err(err) => {
                error!(%err, "failed to count customers");
                0
            }
        }
    }

    async fn run_query(&self, sql: &str) -> Option<Vec<String>> {
        match self.try_run_query(sql).await {
            Ok(rows) => Some(rows),
            Err(err) => {
                error!(%err, "query execution failed");
                None
            }
        }
    }
}

fn render_row(row: &MySqlRow) -> String {
    let fields = row
        .columns()
        .iter()
        .enumerate()
        .map(|(index, column)| format!("{}: {}", column.name(), render_value(row, index)))
        .collect::<Vec<_>>()
        .join(", ");

    format!("{{ {fields} }}")
}

fn render_value(row: &MySqlRow, index: usize) -> String {
    use sqlx::ValueRef;

    if let Ok(raw) = row.try_get_raw(index) {
        if raw.is_null() {
            return "NULL".to_string();
        }
    }
    if let Ok(value) = row.try_get::<i64, _>(index) {
        return value.to_string();
    }
    if let Ok(value) = row.try_get::<u64, _>(index) {
        return value.to_string();
    }
    if let Ok(value) = row.try_get::<f64, _>(index) {
        return value.to_string();
    }
    if let Ok(value) = row.try_get::<f32, _>(index) {
        return value.to_string();
    }
    if let Ok(value) = row.try_get::<String, _>(index) {
        return value;
    }
    "?".to_string()
}
