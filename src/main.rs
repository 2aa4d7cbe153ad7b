use std::io::{stdin, stdout};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use agente_clientes::config::Config;
use agente_clientes::repl;
use agente_clientes::store::{seed_if_empty, ClienteStore, MySqlClienteStore};
use agente_clientes::translator::GeminiTranslator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env().context("invalid configuration")?;

    let store = MySqlClienteStore::new(config.db.clone());
    store.ensure_schema().await;

    match seed_if_empty(&store).await {
        0 => println!("Tabela de clientes já contém dados. Pulando a inserção inicial."),
        inserted => println!("Tabela de clientes vazia. {inserted} registros iniciais adicionados."),
    }

    let translator = GeminiTranslator::new(config.gemini.clone());

    let mut reader = stdin().lock();
    let mut writer = stdout().lock();
    repl::run(&mut reader, &mut writer, &store, &translator).await?;

    Ok(())
}
