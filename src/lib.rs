//! Interactive chat agent for a MySQL customer table.
//!
//! Questions asked in natural language (PT-BR) are translated to SQL by a
//! hosted generation model and executed directly against the `clientes`
//! table; a small set of literal commands drives the CRUD paths instead.

pub mod config;
pub mod error;
pub mod prompt;
pub mod repl;
pub mod store;
pub mod translator;

#[cfg(test)]
pub(crate) mod test_support;
