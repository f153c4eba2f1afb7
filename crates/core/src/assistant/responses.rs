use crate::models::analytics::{CategoryTotal, FinancialOverview, GoalsOverview, MonthlySummary};
use crate::models::transaction::{Transaction, TransactionType};

/// Number of categories listed in the spending reply.
pub const TOP_CATEGORY_LIMIT: usize = 5;

pub const GREETING: &str = "👋 Olá! Sou seu assistente financeiro inteligente. Posso ajudar você a:\n\n\
• Registrar gastos e receitas\n\
• Consultar seu saldo e resumos\n\
• Analisar seus hábitos financeiros\n\
• Dar sugestões de economia\n\n\
Como posso ajudar hoje?";

pub const TIPS: &[&str] = &[
    "💡 **Dica de Economia:** Use a regra 50-30-20: 50% para necessidades, 30% desejos, 20% poupança.",
    "🎯 **Estratégia:** Defina metas específicas para seus objetivos financeiros - isso aumenta em 60% as chances de sucesso!",
    "📊 **Análise:** Revise seus gastos mensalmente e identifique padrões. Pequenos ajustes podem gerar grandes economias.",
    "🔄 **Hábito:** Automatize suas poupanças - configure transferências automáticas para sua reserva de emergência.",
    "📱 **Tecnologia:** Use apps como este para registrar gastos em tempo real. O controle visual melhora muito a gestão!",
    "💰 **Investimento:** Antes de comprar algo, pergunte: \"Este valor investido poderia me render mais no futuro?\"",
];

pub const FALLBACKS: &[&str] = &[
    "🤔 Não entendi completamente sua mensagem. Posso ajudar você a:\n\n\
• Registrar gastos (Ex: \"Gastei R$ 50 no supermercado\")\n\
• Consultar saldo (\"Qual meu saldo?\")\n\
• Ver resumos (\"Mostrar resumo\")\n\
• Dicas de economia (\"Dê uma dica\")\n\n\
Tente reformular sua pergunta!",
    "💭 Hmm, não consegui processar isso. Algumas sugestões:\n\n\
• \"Paguei R$ 100 na farmácia\"\n\
• \"Recebi R$ 500 de freelance\"\n\
• \"Como estão meus gastos?\"\n\
• \"Preciso de uma sugestão\"\n\n\
O que você gostaria de fazer?",
    "🔍 Não identifiquei um comando específico. Posso te ajudar com:\n\n\
✅ Registrar transações\n\
✅ Consultar informações financeiras\n\
✅ Análises e relatórios\n\
✅ Dicas personalizadas\n\n\
Como posso ser útil?",
];

/// Format `value` the pt-BR way: `R$ 1.234,56`, `-R$ 10,00`.
///
/// Rounds half away from zero to cents.
#[must_use]
pub fn format_currency(value: f64, symbol: &str) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{symbol} {grouped},{fraction:02}")
}

/// Confirmation for a transaction recorded from a message.
pub fn transaction_recorded(tx: &Transaction, balance: f64, symbol: &str) -> String {
    let amount = format_currency(tx.amount, symbol);
    let balance = format_currency(balance, symbol);
    match tx.kind {
        TransactionType::Expense => format!(
            "✅ Gasto registrado com sucesso!\n\n💰 Valor: {amount}\n📝 Descrição: {}\n📁 Categoria: {}\n\nSeu saldo atual é {balance}",
            tx.description, tx.category
        ),
        TransactionType::Income => format!(
            "✅ Receita registrada com sucesso!\n\n💰 Valor: {amount}\n📝 Descrição: {}\n\nSeu saldo atual é {balance}",
            tx.description
        ),
    }
}

pub fn balance(total_balance: f64, month: &MonthlySummary, symbol: &str) -> String {
    format!(
        "💰 **Resumo Financeiro Atual**\n\n\
• **Saldo total:** {}\n\
• **Receitas este mês:** {}\n\
• **Gastos este mês:** {}\n\
• **Sobra mensal:** {}",
        format_currency(total_balance, symbol),
        format_currency(month.income, symbol),
        format_currency(month.expenses, symbol),
        format_currency(month.net, symbol),
    )
}

pub fn summary(overview: &FinancialOverview, symbol: &str) -> String {
    let trend = if overview.trend_is_positive() {
        "📈 Positiva"
    } else {
        "📉 Atenção aos gastos"
    };
    format!(
        "📊 **Resumo Completo**\n\n\
**Finanças:**\n\
• {} transações registradas\n\
• Saldo: {}\n\
• Patrimônio em ativos: {}\n\n\
**Planejamento:**\n\
• {} metas ativas\n\
• {} metas concluídas\n\n\
**Tendência:** {trend}",
        overview.transaction_count,
        format_currency(overview.total_balance, symbol),
        format_currency(overview.assets_value, symbol),
        overview.goals.count,
        overview.goals.completed,
    )
}

/// Month's expenses with the largest categories. `top` is expected to be
/// sorted largest first.
pub fn spending(monthly_expenses: f64, top: &[CategoryTotal], symbol: &str) -> String {
    let categories = if top.is_empty() {
        "• Nenhum gasto registrado este mês".to_string()
    } else {
        top.iter()
            .map(|c| format!("• {}: {}", c.category, format_currency(c.amount, symbol)))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "💸 **Gastos deste mês: {}**\n\n**Top categorias:**\n{categories}\n\n\
💡 **Dica:** Monitore as categorias com maiores gastos para identificar oportunidades de economia!",
        format_currency(monthly_expenses, symbol),
    )
}

pub fn goals(overview: &GoalsOverview, symbol: &str) -> String {
    let closing = if overview.count > 0 {
        "✨ Continue firme! Metas claras são o primeiro passo para o sucesso financeiro."
    } else {
        "💡 Que tal definir sua primeira meta? Comece com algo alcançável em 6 meses!"
    };
    format!(
        "🎯 **Suas Metas Financeiras**\n\n\
• **Total de metas:** {}\n\
• **Metas concluídas:** {}\n\
• **Valor total das metas:** {}\n\n{closing}",
        overview.count,
        overview.completed,
        format_currency(overview.total_target, symbol),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_thousands_and_cents() {
        assert_eq!(format_currency(0.0, "R$"), "R$ 0,00");
        assert_eq!(format_currency(50.0, "R$"), "R$ 50,00");
        assert_eq!(format_currency(1234.56, "R$"), "R$ 1.234,56");
        assert_eq!(format_currency(1_000_000.0, "R$"), "R$ 1.000.000,00");
        assert_eq!(format_currency(999.999, "R$"), "R$ 1.000,00");
    }

    #[test]
    fn negative_values_carry_a_leading_sign() {
        assert_eq!(format_currency(-2500.5, "R$"), "-R$ 2.500,50");
        // rounds to zero: no sign
        assert_eq!(format_currency(-0.001, "R$"), "R$ 0,00");
    }

    #[test]
    fn spending_reply_handles_an_empty_month() {
        let text = spending(0.0, &[], "R$");
        assert!(text.contains("R$ 0,00"));
        assert!(text.contains("Nenhum gasto"));
    }
}
