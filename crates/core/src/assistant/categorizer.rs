use serde::{Deserialize, Serialize};

/// Expense categories the assistant can infer from a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Food,
    Transport,
    Housing,
    Health,
    Education,
    Leisure,
    Shopping,
    Tech,
    Other,
}

impl ExpenseCategory {
    /// Stored category name, as used by the dashboard.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "Alimentação",
            ExpenseCategory::Transport => "Transporte",
            ExpenseCategory::Housing => "Moradia",
            ExpenseCategory::Health => "Saúde",
            ExpenseCategory::Education => "Educação",
            ExpenseCategory::Leisure => "Lazer",
            ExpenseCategory::Shopping => "Compras",
            ExpenseCategory::Tech => "Tecnologia",
            ExpenseCategory::Other => "Outros",
        }
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Checked in order; the first category with a matching keyword wins.
const KEYWORDS: &[(ExpenseCategory, &[&str])] = &[
    (
        ExpenseCategory::Food,
        &["supermercado", "restaurante", "lanche", "comida", "almoço", "jantar", "café"],
    ),
    (
        ExpenseCategory::Transport,
        &["uber", "taxi", "ônibus", "metro", "gasolina", "combustível", "estacionamento"],
    ),
    (
        ExpenseCategory::Housing,
        &["aluguel", "luz", "água", "gás", "internet", "condomínio"],
    ),
    (
        ExpenseCategory::Health,
        &["farmácia", "médico", "consulta", "exame", "dentista", "hospital"],
    ),
    (
        ExpenseCategory::Education,
        &["curso", "livro", "escola", "faculdade", "material"],
    ),
    (
        ExpenseCategory::Leisure,
        &["cinema", "teatro", "show", "viagem", "parque", "diversão"],
    ),
    (
        ExpenseCategory::Shopping,
        &["roupa", "sapato", "presente", "eletrônico", "casa"],
    ),
    (
        ExpenseCategory::Tech,
        &["celular", "computador", "software", "app", "streaming"],
    ),
];

/// Case-insensitive substring match of `description` against the keyword
/// table. Falls back to [`ExpenseCategory::Other`].
#[must_use]
pub fn categorize(description: &str) -> ExpenseCategory {
    let lower = description.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(category, _)| *category)
        .unwrap_or(ExpenseCategory::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_keywords_case_insensitively() {
        assert_eq!(categorize("No SUPERMERCADO"), ExpenseCategory::Food);
        assert_eq!(categorize("Corrida de Uber"), ExpenseCategory::Transport);
        assert_eq!(categorize("FARMÁCIA"), ExpenseCategory::Health);
    }

    #[test]
    fn first_category_in_table_wins() {
        // "café" (food) is listed before "casa" (shopping)
        assert_eq!(categorize("café em casa"), ExpenseCategory::Food);
    }

    #[test]
    fn unknown_description_is_other() {
        assert_eq!(categorize("coisas diversas"), ExpenseCategory::Other);
        assert_eq!(categorize(""), ExpenseCategory::Other);
    }
}
