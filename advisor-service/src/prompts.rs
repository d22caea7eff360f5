//! Prompt construction.
//!
//! Every builder is a pure function from validated input to a
//! [`CompletionRequest`]; nothing here touches the network.

use crate::models::{AdviceProfile, ChatContext};
use crate::services::CompletionRequest;

const TEMPERATURE: f32 = 0.7;
pub const SUMMARY_MAX_TOKENS: u32 = 1000;
pub const ADVICE_MAX_TOKENS: u32 = 800;
pub const CHAT_MAX_TOKENS: u32 = 600;
/// Most recent transactions included in a chat prompt.
pub const CHAT_TRANSACTION_LIMIT: usize = 10;

const SUMMARY_SYSTEM: &str = "You are a helpful financial advisor AI specialized in Kenyan \
personal finance. Provide clear, actionable advice in a friendly tone.";

const ADVICE_SYSTEM: &str = "You are a knowledgeable financial advisor specializing in Kenyan \
personal finance. Provide practical, culturally relevant advice.";

const CHAT_SYSTEM: &str = "You are a friendly personal finance assistant for Kenyan users. \
Answer the user's question directly, using their financial context when it is provided.";

/// Render an amount without thousands separators.
///
/// Whole numbers print as integers (`20000`), anything else with two
/// decimals (`1234.50`).
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn join_goals(goals: &[String]) -> String {
    if goals.is_empty() {
        "None specified".to_string()
    } else {
        goals.join(", ")
    }
}

/// Free-text summary. `text` is embedded verbatim.
pub fn summary_prompt(text: &str) -> CompletionRequest {
    let user = format!(
        "You are a financial advisor AI assistant specialized in Kenyan personal finance.\n\
         Analyze the following financial data and provide a clear, actionable summary with \
         insights and recommendations.\n\
         \n\
         Focus on:\n\
         - Key spending patterns\n\
         - Budget optimization suggestions\n\
         - Savings opportunities\n\
         - Investment recommendations suitable for Kenya\n\
         - Emergency fund advice\n\
         - M-Pesa and mobile money optimization\n\
         \n\
         Financial Data:\n\
         {text}\n\
         \n\
         Provide a concise but comprehensive summary with specific, actionable advice \
         tailored for Kenyan users."
    );

    CompletionRequest {
        system: SUMMARY_SYSTEM.to_string(),
        user,
        max_tokens: SUMMARY_MAX_TOKENS,
        temperature: TEMPERATURE,
    }
}

pub fn advice_prompt(profile: &AdviceProfile) -> CompletionRequest {
    let user = format!(
        "You are a financial advisor AI for Kenyan users. Provide personalized advice based \
         on this context:\n\
         \n\
         User Profile:\n\
         - Monthly Income: Ksh {income}\n\
         - Monthly Expenses: Ksh {expenses}\n\
         - Net Income: Ksh {net}\n\
         - Financial Goals: {goals}\n\
         \n\
         User Question: {question}\n\
         \n\
         Provide specific, actionable advice considering:\n\
         - Kenyan cost of living\n\
         - Local investment options (NSE, government bonds, SACCOs)\n\
         - M-Pesa and mobile money strategies\n\
         - Emergency fund recommendations\n\
         - Tax implications in Kenya\n\
         \n\
         Keep the response concise but comprehensive.",
        income = format_amount(profile.income),
        expenses = format_amount(profile.expenses),
        net = format_amount(profile.net()),
        goals = join_goals(&profile.goals),
        question = profile.question,
    );

    CompletionRequest {
        system: ADVICE_SYSTEM.to_string(),
        user,
        max_tokens: ADVICE_MAX_TOKENS,
        temperature: TEMPERATURE,
    }
}

/// Advisor chat. Context sections are only emitted for fields that are set.
pub fn chat_prompt(message: &str, context: Option<&ChatContext>) -> CompletionRequest {
    let mut user = String::new();

    if let Some(ctx) = context {
        let mut profile = Vec::new();
        if let Some(income) = ctx.income {
            profile.push(format!("- Monthly Income: Ksh {}", format_amount(income)));
        }
        if let Some(expenses) = ctx.expenses {
            profile.push(format!("- Monthly Expenses: Ksh {}", format_amount(expenses)));
        }
        if let (Some(income), Some(expenses)) = (ctx.income, ctx.expenses) {
            profile.push(format!("- Net Income: Ksh {}", format_amount(income - expenses)));
        }
        let goals = ctx.goal_labels();
        if !goals.is_empty() {
            profile.push(format!("- Financial Goals: {}", join_goals(&goals)));
        }
        if !profile.is_empty() {
            user.push_str("User Profile:\n");
            user.push_str(&profile.join("\n"));
            user.push_str("\n\n");
        }

        let transactions: Vec<_> = ctx
            .readable_transactions()
            .take(CHAT_TRANSACTION_LIMIT)
            .collect();
        if !transactions.is_empty() {
            user.push_str("Recent Transactions:\n");
            for tx in &transactions {
                user.push_str(&format!(
                    "- {} {} Ksh {} ({}) {}\n",
                    tx.date,
                    tx.kind,
                    format_amount(tx.amount),
                    tx.category,
                    tx.description
                ));
            }
            user.push('\n');
        }
    }

    user.push_str("User Question: ");
    user.push_str(message);
    user.push_str(
        "\n\nKeep the answer practical and specific to Kenya (M-Pesa, SACCOs, NSE, \
         government bonds) where relevant.",
    );

    CompletionRequest {
        system: CHAT_SYSTEM.to_string(),
        user,
        max_tokens: CHAT_MAX_TOKENS,
        temperature: TEMPERATURE,
    }
}
