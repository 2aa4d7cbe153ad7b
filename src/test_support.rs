//! In-memory doubles for the store and translator, so dispatcher and seeding
//! behavior can be tested without a MySQL server or a live provider.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::store::{Cliente, ClienteStore, ClienteUpdate, UpdateOutcome};
use crate::translator::Translator;

#[derive(Default)]
pub struct MemClienteStore {
    pub clientes: Mutex<Vec<Cliente>>,
    /// Rows handed back from `run_query`; `None` simulates a failed query.
    pub query_result: Mutex<Option<Vec<String>>>,
    pub last_query: Mutex<Option<String>>,
}

impl MemClienteStore {
    pub fn with_clientes(clientes: Vec<Cliente>) -> Self {
        MemClienteStore {
            clientes: Mutex::new(clientes),
            ..MemClienteStore::default()
        }
    }

    pub fn get(&self, id: i32) -> Option<Cliente> {
        self.clientes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }
}

#[async_trait]
impl ClienteStore for MemClienteStore {
    async fn ensure_schema(&self) {}

    async fn add(&self, cliente: &Cliente) -> bool {
        let mut clientes = self.clientes.lock().unwrap();
        if clientes.iter().any(|c| c.id == cliente.id) {
            return false;
        }
        clientes.push(cliente.clone());
        true
    }

    async fn update(&self, id: i32, changes: &ClienteUpdate) -> UpdateOutcome {
        if changes.is_empty() {
            return UpdateOutcome::NothingToUpdate;
        }

        let mut clientes = self.clientes.lock().unwrap();
        if let Some(cliente) = clientes.iter_mut().find(|c| c.id == id) {
            if let Some(nome) = &changes.nome {
                cliente.nome = nome.clone();
            }
            if let Some(renda) = changes.renda {
                cliente.renda = renda;
            }
            if let Some(status) = &changes.status {
                cliente.status = status.clone();
            }
            if let Some(genero) = &changes.genero {
                cliente.genero = genero.clone();
            }
        }
        // Like the SQL path, an unmatched id still counts as applied.
        UpdateOutcome::Applied
    }

    async fn delete(&self, id: i32) -> bool {
        self.clientes.lock().unwrap().retain(|c| c.id != id);
        true
    }

    async fn count(&self) -> u64 {
        self.clientes.lock().unwrap().len() as u64
    }

    async fn run_query(&self, sql: &str) -> Option<Vec<String>> {
        *self.last_query.lock().unwrap() = Some(sql.to_string());
        self.query_result.lock().unwrap().clone()
    }
}

/// Translator double: answers with a fixed statement, or fails when `None`.
pub struct StubTranslator {
    pub sql: Option<String>,
}

impl StubTranslator {
    pub fn answering(sql: &str) -> Self {
        StubTranslator {
            sql: Some(sql.to_string()),
        }
    }

    pub fn failing() -> Self {
        StubTranslator { sql: None }
    }
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(&self, _question: &str) -> Result<String, ProviderError> {
        self.sql.clone().ok_or(ProviderError::EmptyResponse)
    }
}
