//! Prompt assembly for the finance advisor. The system prompt is fixed and
//! server-side; callers can never override it.

/// Conversation history is truncated to this many trailing messages before
/// the current question is appended.
pub const HISTORY_LIMIT: usize = 10;

pub const SYSTEM_INSTRUCTIONS: &str = r#"# Financial Advisor AI - Expert Guidance System

You are an expert financial advisor AI powered by advanced reasoning capabilities. Your role is to provide professional, ethical, and educational financial guidance while maintaining the highest standards of responsibility and compliance.

## Core Principles

### 1. Risk Awareness & Conservative Approach
- Always emphasize that all investments carry risk
- Never guarantee returns or promise specific outcomes
- Focus on risk management and diversification
- Recommend consulting licensed professionals for personalized advice

### 2. Educational Focus
- Explain financial concepts clearly and accessibly
- Help users understand the "why" behind recommendations
- Encourage financial literacy and long-term thinking
- Provide context for market conditions and economic factors

### 3. Regulatory Compliance
- Clearly state that you are not a licensed financial advisor
- Remind users to consult qualified professionals
- Avoid giving specific investment recommendations
- Focus on general principles and education

## Response Guidelines

- Professional yet approachable tone with clear, concise explanations
- Always include risk warnings, time horizons, and liquidity considerations
- Break down complex topics into digestible parts with actionable next steps
- Never recommend specific stocks or cryptocurrencies
- Discourage emotional decision-making and promote diversified, long-term strategies

Remember: Your goal is to empower users with knowledge while keeping them safe from financial harm. Always err on the side of caution and education over speculation."#;

pub const SAFETY_DISCLAIMERS: &str = r#"

---

**Important Disclaimers:**
- I am an AI assistant and not a licensed financial advisor
- This is not personalized financial advice
- All investments carry risk of loss
- Past performance does not guarantee future results
- Consult with qualified financial professionals for your specific situation
- Consider your risk tolerance, time horizon, and financial goals
- Tax laws and regulations change frequently

For personalized advice, please consult a certified financial planner (CFP), certified public accountant (CPA), or licensed investment advisor."#;

const INVESTMENT_KEYWORDS: &[&str] = &["invest", "stock", "bond", "etf", "mutual fund", "portfolio"];
const DEBT_KEYWORDS: &[&str] = &["debt", "loan", "credit", "mortgage", "student loan"];
const BUDGET_KEYWORDS: &[&str] = &["budget", "saving", "expense", "income", "salary"];
const RETIREMENT_KEYWORDS: &[&str] = &["retirement", "401k", "ira", "pension", "social security"];

/// Topic-specific guidance appended to the system prompt, selected by keyword
/// match on the user's question. Falls back to general financial literacy.
pub fn contextual_instructions(user_query: &str) -> &'static str {
    let query = user_query.to_lowercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|k| query.contains(k));

    if matches(INVESTMENT_KEYWORDS) {
        "\nFor investment-related questions:\n\
         - Emphasize that past performance doesn't guarantee future results\n\
         - Discuss asset allocation based on risk tolerance and time horizon\n\
         - Recommend diversified, low-cost index funds for most investors\n\
         - Stress the importance of understanding fees and expenses\n\
         - Suggest dollar-cost averaging for long-term investing"
    } else if matches(DEBT_KEYWORDS) {
        "\nFor debt-related questions:\n\
         - Prioritize high-interest debt payoff\n\
         - Explain debt consolidation options\n\
         - Discuss credit score impact\n\
         - Recommend debt management plans when appropriate\n\
         - Emphasize the psychological aspects of debt reduction"
    } else if matches(BUDGET_KEYWORDS) {
        "\nFor budgeting questions:\n\
         - Introduce the 50/30/20 rule as a starting framework\n\
         - Stress emergency fund importance (3-6 months of expenses)\n\
         - Discuss tracking methods and tools\n\
         - Explain lifestyle inflation risks\n\
         - Recommend regular budget reviews"
    } else if matches(RETIREMENT_KEYWORDS) {
        "\nFor retirement questions:\n\
         - Explain compound interest and time value of money\n\
         - Discuss employer matching contributions\n\
         - Cover different retirement account types\n\
         - Address required minimum distributions\n\
         - Emphasize starting early and consistent contributions"
    } else {
        "\nFor general financial questions:\n\
         - Start with fundamental concepts\n\
         - Build understanding progressively\n\
         - Connect topics to broader financial literacy\n\
         - Encourage building good financial habits\n\
         - Suggest creating a comprehensive financial plan"
    }
}

/// Prompt for the risk-profile assessment endpoint. `answers` is the caller's
/// questionnaire payload rendered as pretty JSON.
pub fn risk_assessment_prompt(answers: &serde_json::Value) -> String {
    let rendered = serde_json::to_string_pretty(answers).unwrap_or_else(|_| answers.to_string());
    format!(
        "Based on the following user responses, assess their risk tolerance and provide appropriate investment guidance:\n\n\
         User Responses:\n{rendered}\n\n\
         Please provide:\n\
         1. Risk tolerance level (Conservative, Moderate, Aggressive)\n\
         2. Recommended asset allocation percentages\n\
         3. Time horizon assessment\n\
         4. Key considerations for their situation\n\
         5. Next steps they should take\n\n\
         Remember to include all standard disclaimers about investment risk and professional consultation."
    )
}

/// Prompt for the concept-explanation endpoint.
pub fn concept_explanation_prompt(concept: &str, knowledge_level: &str) -> String {
    format!(
        "Explain the financial concept \"{concept}\" to a {knowledge_level} level investor.\n\n\
         Structure your explanation:\n\
         1. Simple definition\n\
         2. Real-world example\n\
         3. How it affects personal finances\n\
         4. Key considerations or risks\n\
         5. Related concepts they should also understand\n\n\
         Use clear, simple language and avoid unnecessary jargon. If you must use technical terms, explain them immediately."
    )
}
