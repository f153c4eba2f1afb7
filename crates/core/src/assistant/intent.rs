use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::transaction::NewTransaction;

use super::categorizer::categorize;

/// Category stored on income recorded through the assistant.
pub const INCOME_CATEGORY: &str = "Receita";

const DEFAULT_EXPENSE_DESCRIPTION: &str = "Gasto registrado";
const DEFAULT_INCOME_DESCRIPTION: &str = "Receita registrada";

/// Optional `R$` prefix followed by an amount such as `50`, `50,90`,
/// `1.500` or `1.500,00`.
const AMOUNT: &str =
    r"(?:r\$\s?)?(?P<amount>\d{1,3}(?:\.\d{3})+(?:,\d{1,2})?|\d+(?:[.,]\d{1,2})?)";

static EXPENSE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        format!(r"(?i)gastei\s+{AMOUNT}\s*(?P<desc>.*)"),
        format!(r"(?i)paguei\s+{AMOUNT}\s*(?P<desc>.*)"),
        format!(r"(?i)comprei\s*(?P<desc>.*?)\s*por\s*{AMOUNT}"),
        format!(r"(?i)despesa\s*de\s*{AMOUNT}\s*(?P<desc>.*)"),
    ])
});

static INCOME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        format!(r"(?i)recebi\s+{AMOUNT}\s*(?P<desc>.*)"),
        format!(r"(?i)ganhei\s+{AMOUNT}\s*(?P<desc>.*)"),
        format!(r"(?i)renda\s*de\s*{AMOUNT}\s*(?P<desc>.*)"),
    ])
});

static THOUSANDS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\d{1,3}(?:\.\d{3})+$").ok());

fn compile(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!(pattern = %p, error = %e, "invalid assistant pattern");
                None
            }
        })
        .collect()
}

/// Read-only questions the assistant answers from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Balance,
    Summary,
    Spending,
    Tip,
    Goals,
}

/// What a message asks for. Producing a `Command` never touches the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Record a new transaction
    Mutation(NewTransaction),
    Query(QueryKind),
    /// Nothing recognised
    Fallback,
}

/// One entry of the ordered rule table.
pub struct Rule {
    pub name: &'static str,
    pub matcher: fn(&str, NaiveDate) -> Option<Command>,
}

/// Evaluated top to bottom; the first rule that matches decides.
pub const RULES: &[Rule] = &[
    Rule { name: "expense", matcher: match_expense },
    Rule { name: "income", matcher: match_income },
    Rule { name: "balance", matcher: match_balance },
    Rule { name: "summary", matcher: match_summary },
    Rule { name: "spending", matcher: match_spending },
    Rule { name: "tip", matcher: match_tip },
    Rule { name: "goals", matcher: match_goals },
];

/// Map a free-text message to a [`Command`]. Transactions are dated `today`.
#[must_use]
pub fn interpret(text: &str, today: NaiveDate) -> Command {
    for rule in RULES {
        if let Some(command) = (rule.matcher)(text, today) {
            tracing::debug!(rule = rule.name, "assistant rule matched");
            return command;
        }
    }
    Command::Fallback
}

/// Parse an amount written with `,` as decimal separator and optional `.`
/// thousands separators. Only finite, strictly positive values are returned.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let normalized = if raw.contains(',') {
        raw.replace('.', "").replace(',', ".")
    } else if (*THOUSANDS).as_ref().is_some_and(|re| re.is_match(raw)) {
        raw.replace('.', "")
    } else {
        raw.to_string()
    };
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn capture_transaction(patterns: &[Regex], text: &str) -> Option<(f64, String)> {
    patterns.iter().find_map(|re| {
        let caps = re.captures(text)?;
        let amount = parse_amount(caps.name("amount")?.as_str())?;
        let description = caps
            .name("desc")
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
        Some((amount, description))
    })
}

fn match_expense(text: &str, today: NaiveDate) -> Option<Command> {
    let (amount, description) = capture_transaction(&EXPENSE_PATTERNS, text)?;
    let description = if description.is_empty() {
        DEFAULT_EXPENSE_DESCRIPTION.to_string()
    } else {
        description
    };
    let category = categorize(&description);
    Some(Command::Mutation(NewTransaction::expense(
        amount,
        description,
        category.label(),
        today,
    )))
}

fn match_income(text: &str, today: NaiveDate) -> Option<Command> {
    let (amount, description) = capture_transaction(&INCOME_PATTERNS, text)?;
    let description = if description.is_empty() {
        DEFAULT_INCOME_DESCRIPTION.to_string()
    } else {
        description
    };
    Some(Command::Mutation(NewTransaction::income(
        amount,
        description,
        INCOME_CATEGORY,
        today,
    )))
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

fn match_balance(text: &str, _today: NaiveDate) -> Option<Command> {
    contains_any(text, &["saldo", "quanto tenho"]).then_some(Command::Query(QueryKind::Balance))
}

fn match_summary(text: &str, _today: NaiveDate) -> Option<Command> {
    contains_any(text, &["resumo", "relatório"]).then_some(Command::Query(QueryKind::Summary))
}

fn match_spending(text: &str, _today: NaiveDate) -> Option<Command> {
    contains_any(text, &["gastos", "despesas"]).then_some(Command::Query(QueryKind::Spending))
}

fn match_tip(text: &str, _today: NaiveDate) -> Option<Command> {
    contains_any(text, &["dica", "sugestão", "economia"]).then_some(Command::Query(QueryKind::Tip))
}

fn match_goals(text: &str, _today: NaiveDate) -> Option<Command> {
    contains_any(text, &["metas", "objetivos"]).then_some(Command::Query(QueryKind::Goals))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn parse_amount_handles_locale_formats() {
        assert_eq!(parse_amount("50"), Some(50.0));
        assert_eq!(parse_amount("50,90"), Some(50.9));
        assert_eq!(parse_amount("12.5"), Some(12.5));
        assert_eq!(parse_amount("1.500"), Some(1500.0));
        assert_eq!(parse_amount("1.500,25"), Some(1500.25));
    }

    #[test]
    fn parse_amount_rejects_zero_and_garbage() {
        assert_eq!(parse_amount("0"), None);
        assert_eq!(parse_amount("0,00"), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn comprei_pattern_reads_description_before_amount() {
        match interpret("Comprei um livro por R$ 45,90", today()) {
            Command::Mutation(tx) => {
                assert_eq!(tx.amount, 45.9);
                assert_eq!(tx.description, "um livro");
                assert_eq!(tx.category, "Educação");
            }
            other => panic!("expected mutation, got {other:?}"),
        }
    }

    #[test]
    fn rules_are_tried_in_order() {
        // both an expense phrase and a balance keyword: the expense wins
        assert!(matches!(
            interpret("gastei 10 e qual o saldo?", today()),
            Command::Mutation(_)
        ));
        // "resumo dos gastos" hits summary before spending
        assert_eq!(
            interpret("resumo dos gastos", today()),
            Command::Query(QueryKind::Summary)
        );
    }
}
