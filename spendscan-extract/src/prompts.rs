//! Instruction prompts sent to the extraction tool.

/// Extract every transaction on the page as 4-segment pipe lines.
pub const EXTRACT_ALL: &str = "\
Extract all transaction data from this credit card statement image.

If this page contains a transaction list, extract each transaction with:
- Transaction Date (Trans. Date)
- Posting Date (Posting Date)
- Description
- Amount in THB

Return format (one per line):
DD/MM/YY|DD/MM/YY|DESCRIPTION|AMOUNT

Example:
07/01/25|07/01/25|Payment-KTB Internet|-8,851.33
18/12/24|20/12/24|SHOPEE BANGKOK TH|199.00

If this page contains only payment slip information (no transactions), return only: NO_TRANSACTIONS

Only return transaction lines or NO_TRANSACTIONS, no other text, no markdown, no code blocks.";

/// Extract and classify in one step: the tool returns only AI-related
/// transactions as 5-segment pipe lines with a service label.
pub const EXTRACT_AI_ONLY: &str = "\
Extract all transaction data from this credit card statement.

For each transaction, identify if it's AI-related (OpenRouter, Anthropic, Google Cloud, RunPod, Kie.ai, BudgieAI, DigitalOcean, AI services, etc.).

Return ONLY AI-RELATED transactions in this exact format (one per line):
DATE|POSTING_DATE|DESCRIPTION|AMOUNT|SERVICE_NAME

Examples:
19/05/25|20/05/25|ANTHROPIC ANTHROPIC.COMUS USD 5.35|182.70|Anthropic AI
01/09/25|02/09/25|OPENROUTER, INC OPENROUTER.AIUS USD 5.80|191.91|OpenRouter AI

If no AI transactions found, return: NO_AI_TRANSACTIONS

Important:
- Only return AI-related transactions
- Use service names like: \"OpenRouter AI\", \"Anthropic AI\", \"Google Cloud\", \"RunPod GPU\", \"Kie.ai\", \"BudgieAI\", \"DigitalOcean\", etc.
- Do not include regular purchases, gas, food, etc.";
