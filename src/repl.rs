//! Interactive dispatcher: one line in, one action out, no memory between
//! turns.

use std::io::{self, BufRead, Write};

use tracing::{info, warn};

use crate::store::{Cliente, ClienteStore, ClienteUpdate, UpdateOutcome};
use crate::translator::Translator;

const SEPARATOR: &str = "--------------------------------------------------";

/// The canonical CRUD phrases users must type exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Canonical {
    Adicionar,
    Atualizar,
    Deletar,
}

impl Canonical {
    pub fn phrase(self) -> &'static str {
        match self {
            Canonical::Adicionar => "adicionar cliente",
            Canonical::Atualizar => "atualizar cliente",
            Canonical::Deletar => "deletar cliente",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Canonical::Adicionar => "adicionar",
            Canonical::Atualizar => "atualizar",
            Canonical::Deletar => "deletar",
        }
    }
}

/// What a single input line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Sair,
    AdicionarCliente,
    AtualizarCliente,
    DeletarCliente,
    /// A mutation verb that is not the exact canonical phrase; the user gets
    /// pointed at the phrase instead of a guessed action.
    Orientar(Canonical),
    /// Anything else goes to the translator as a question, untouched.
    Pergunta(String),
}

const UPDATE_HINTS: [&str; 3] = ["atualize", "mude", "altere"];
const DELETE_HINTS: [&str; 3] = ["deletar", "remova", "apague"];
const ADD_HINTS: [&str; 2] = ["adicione", "crie"];

/// Classifies a raw input line. Exact canonical phrases win over the verb
/// prefixes, so "deletar cliente" dispatches instead of re-prompting.
pub fn classify(raw: &str) -> Command {
    let normalized = raw.trim().to_lowercase();

    match normalized.as_str() {
        "sair" => return Command::Sair,
        "adicionar cliente" => return Command::AdicionarCliente,
        "atualizar cliente" => return Command::AtualizarCliente,
        "deletar cliente" => return Command::DeletarCliente,
        _ => {}
    }

    if UPDATE_HINTS.iter().any(|hint| normalized.starts_with(hint)) {
        return Command::Orientar(Canonical::Atualizar);
    }
    if DELETE_HINTS.iter().any(|hint| normalized.starts_with(hint)) {
        return Command::Orientar(Canonical::Deletar);
    }
    if ADD_HINTS.iter().any(|hint| normalized.starts_with(hint)) {
        return Command::Orientar(Canonical::Adicionar);
    }

    Command::Pergunta(raw.trim().to_string())
}

/// Parses a monthly income, accepting the comma decimal separator.
pub fn parse_renda(input: &str) -> Option<f64> {
    input.trim().replace(',', ".").parse().ok()
}

fn prompt_line<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    write!(writer, "{label}")?;
    writer.flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn greeting<W: Write>(writer: &mut W) -> io::Result<()> {
    writeln!(writer, "Olá! Sou um agente de IA para o banco de dados de clientes.")?;
    writeln!(writer, "Você pode me fazer perguntas, como 'Quantos estão com o nome sujo?'.")?;
    writeln!(writer, "Para adicionar um cliente, digite 'adicionar cliente'.")?;
    writeln!(writer, "Para atualizar um cliente, digite 'atualizar cliente'.")?;
    writeln!(writer, "Para deletar um cliente, digite 'deletar cliente'.")?;
    writeln!(writer, "Digite 'sair' para terminar.")?;
    writeln!(writer, "{SEPARATOR}")
}

async fn handle_add<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    store: &dyn ClienteStore,
) -> io::Result<()> {
    let id_raw = prompt_line(reader, writer, "Digite o ID: ")?.unwrap_or_default();
    let Ok(id) = id_raw.parse::<i32>() else {
        writeln!(writer, "Entrada inválida. ID e renda devem ser números.")?;
        return Ok(());
    };

    let nome = prompt_line(reader, writer, "Digite o nome: ")?.unwrap_or_default();

    let renda_raw = prompt_line(reader, writer, "Digite a renda: ")?.unwrap_or_default();
    let Ok(renda) = renda_raw.parse::<f64>() else {
        writeln!(writer, "Entrada inválida. ID e renda devem ser números.")?;
        return Ok(());
    };

    let status =
        prompt_line(reader, writer, "Digite o status ('ativo' ou 'nome sujo'): ")?.unwrap_or_default();
    let genero = prompt_line(reader, writer, "Digite o gênero ('masculino' ou 'feminino'): ")?
        .unwrap_or_default();

    let cliente = Cliente {
        id,
        nome,
        renda,
        status,
        genero,
    };
    if store.add(&cliente).await {
        writeln!(writer, "Cliente '{}' adicionado com sucesso!", cliente.nome)?;
    } else {
        writeln!(writer, "Não foi possível adicionar o cliente.")?;
    }
    Ok(())
}

async fn handle_update<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    store: &dyn ClienteStore,
) -> io::Result<()> {
    let id_raw = prompt_line(reader, writer, "Digite o ID do cliente que deseja atualizar: ")?
        .unwrap_or_default();
    let Ok(id) = id_raw.parse::<i32>() else {
        writeln!(writer, "Entrada inválida. O ID e a renda devem ser números.")?;
        return Ok(());
    };

    writeln!(
        writer,
        "Digite as novas informações (deixe em branco para campos que não irá mudar):"
    )?;
    let nome = prompt_line(reader, writer, "Novo nome: ")?.unwrap_or_default();
    let renda_raw = prompt_line(reader, writer, "Nova renda: ")?.unwrap_or_default();
    let status =
        prompt_line(reader, writer, "Novo status ('ativo' ou 'nome sujo'): ")?.unwrap_or_default();
    let genero = prompt_line(reader, writer, "Novo gênero ('masculino' ou 'feminino'): ")?
        .unwrap_or_default();

    let renda = if renda_raw.is_empty() {
        None
    } else {
        match parse_renda(&renda_raw) {
            Some(value) => Some(value),
            None => {
                writeln!(writer, "Entrada inválida. O ID e a renda devem ser números.")?;
                return Ok(());
            }
        }
    };

    let changes = ClienteUpdate {
        nome: (!nome.is_empty()).then_some(nome),
        renda,
        status: (!status.is_empty()).then_some(status),
        genero: (!genero.is_empty()).then_some(genero),
    };

    match store.update(id, &changes).await {
        UpdateOutcome::Applied => writeln!(writer, "Cliente de ID {id} atualizado com sucesso!")?,
        UpdateOutcome::NothingToUpdate => writeln!(writer, "Nenhum campo para atualizar.")?,
        UpdateOutcome::Failed => writeln!(writer, "Não foi possível atualizar o cliente.")?,
    }
    Ok(())
}

async fn handle_delete<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    store: &dyn ClienteStore,
) -> io::Result<()> {
    let id_raw = prompt_line(reader, writer, "Digite o ID do cliente que deseja deletar: ")?
        .unwrap_or_default();
    let Ok(id) = id_raw.parse::<i32>() else {
        writeln!(writer, "Entrada inválida. O ID deve ser um número inteiro.")?;
        return Ok(());
    };

    if store.delete(id).await {
        writeln!(writer, "Cliente de ID {id} deletado com sucesso!")?;
    } else {
        writeln!(writer, "Não foi possível deletar o cliente.")?;
    }
    Ok(())
}

async fn handle_question<W: Write>(
    writer: &mut W,
    store: &dyn ClienteStore,
    translator: &dyn Translator,
    question: &str,
) -> io::Result<()> {
    match translator.translate(question).await {
        Ok(sql) => {
            info!(%sql, "generated statement");
            match store.run_query(&sql).await {
                Some(rows) if !rows.is_empty() => {
                    writeln!(writer, "Agente: Aqui está o resultado da sua pergunta:")?;
                    for row in rows {
                        writeln!(writer, "    - {row}")?;
                    }
                }
                _ => writeln!(
                    writer,
                    "Agente: Não foi possível obter os dados. Verifique a query ou o banco."
                )?,
            }
        }
        Err(err) => {
            warn!(error = %err, retryable = err.is_retryable(), "translation failed");
            writeln!(
                writer,
                "Agente: Desculpe, não entendi a pergunta ou houve um erro. Tente ser mais específico."
            )?;
        }
    }
    Ok(())
}

/// Runs the chat loop until the exit keyword or end of input. Generic over
/// the reader and writer so tests can drive a full session.
pub async fn run<R, W>(
    reader: &mut R,
    writer: &mut W,
    store: &dyn ClienteStore,
    translator: &dyn Translator,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    greeting(writer)?;

    loop {
        let Some(input) = prompt_line(reader, writer, "Você: ")? else {
            break;
        };
        if input.is_empty() {
            continue;
        }

        match classify(&input) {
            Command::Sair => {
                writeln!(writer, "Até a próxima!")?;
                break;
            }
            Command::AdicionarCliente => {
                handle_add(reader, writer, store).await?;
                writeln!(writer, "{SEPARATOR}")?;
            }
            Command::AtualizarCliente => {
                handle_update(reader, writer, store).await?;
                writeln!(writer, "{SEPARATOR}")?;
            }
            Command::DeletarCliente => {
                handle_delete(reader, writer, store).await?;
                writeln!(writer, "{SEPARATOR}")?;
            }
            Command::Orientar(canonical) => {
                writeln!(
                    writer,
                    "Agente: Para {} um cliente, por favor, digite o comando '{}'.",
                    canonical.verb(),
                    canonical.phrase()
                )?;
                writeln!(writer, "{SEPARATOR}")?;
            }
            Command::Pergunta(question) => {
                handle_question(writer, store, translator, &question).await?;
            }
        }
    }

    Ok(())
}
