//! Fixed instruction prompt for the question-to-SQL translation.

/// The five worked question→SQL pairs embedded in every prompt: a count, a
/// filter by name, a numeric threshold, an aggregate and a compound filter.
pub const WORKED_EXAMPLES: [(&str, &str); 5] = [
    (
        "Qual o número de clientes com nome sujo?",
        "SELECT COUNT(*) FROM clientes WHERE status = 'nome sujo';",
    ),
    (
        "Qual a renda do cliente de nome 'João da Silva'?",
        "SELECT renda FROM clientes WHERE nome = 'João da Silva';",
    ),
    (
        "Me diga o nome dos clientes que têm uma renda maior que 2000?",
        "SELECT nome FROM clientes WHERE renda > 2000;",
    ),
    (
        "Qual a média de renda de todos os clientes?",
        "SELECT AVG(renda) FROM clientes;",
    ),
    (
        "Quantos clientes do sexo masculino com nome sujo existem?",
        "SELECT COUNT(*) FROM clientes WHERE genero = 'masculino' AND status = 'nome sujo';",
    ),
];

const INSTRUCTIONS: &str = "\
Você é um tradutor de perguntas em linguagem natural para consultas SQL. Sua única e estrita tarefa é converter a pergunta do usuário em uma consulta SQL válida, sem adicionar nenhum outro texto.

Regras e Formato da Resposta:
1. A resposta deve conter SOMENTE a consulta SQL, sem aspas, blocos de código ou explicações.
2. A consulta deve ser completa e válida para o MySQL.

Instruções Detalhadas sobre o Banco de Dados:
A tabela principal que você deve usar é 'clientes'.
- colunas:
  - id (INT): identificador único
  - nome (VARCHAR(255)): nome completo do cliente
  - renda (FLOAT): renda mensal em reais
  - status (VARCHAR(50)): status do cliente. Os valores possíveis são 'ativo' ou 'nome sujo'.
  - genero (VARCHAR(50)): o sexo do cliente. Os valores possíveis são 'masculino' ou 'feminino'.";

/// Builds the full prompt: fixed instructions, schema description, the five
/// worked examples and the user's question appended verbatim.
pub fn build_prompt(question: &str) -> String {
    let examples = WORKED_EXAMPLES
        .iter()
        .map(|(pergunta, sql)| format!("- Pergunta: {pergunta}\n- SQL: {sql}"))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "{INSTRUCTIONS}\n\nExemplos de Tradução:\n{examples}\n\nPergunta do Usuário:\n{question}\n\nSua Resposta (APENAS o código SQL):"
    )
}
