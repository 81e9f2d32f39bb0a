//! Prompt templates sent to the text generator.

/// Prompt asking for a reference solution to one challenge section.
pub fn solution_prompt(challenge: &str) -> String {
    format!(
        "You are an expert Python programmer. \
         Read the challenge below and provide a solution. \
         Use any sample code from the challenge if possible. \
         Return code solutions in fenced code blocks, non-code solutions as a numbered list. \
         If the challenge cannot be solved, explain why. \
         Do not include extra text such as reasoning, explanations or similar. \
         The response format should be markdown.\
         \n\nChallenge:\n{challenge}"
    )
}

/// Prompt asking for a whole challenge file with corrected sample code.
pub fn correction_prompt(document: &str) -> String {
    format!(
        "Your job is to create or modify sample code from programming challenges. \
         Follow these instructions strictly:\n\
         1. If a sample code block already exists, verify that it is appropriate for the challenge and change as needed.\n\
         2. If a code block exists but solves the challenge, replace it with sample code only (e.g., stubs, empty functions, etc.).\n\
         3. If no sample code exists, add suitable sample code if possible.\n\
         4. All sample code must run, pass lint, and typecheck. If not possible, comment out problematic code as a last resort.\n\
         5. Non-Python sample code can be included in a separate code block, as comments in Python, or integrated (e.g. json.loads(), yaml.loads()).\n\
         6. It is acceptable to output no sample code when appropriate.\n\
         7. Response format must be Markdown and must include the complete challenge definition as provided.\n\n\
         Challenge:\n{document}"
    )
}
