// Shared prompt fragments.
// Each service that calls the oracle defines its own prompts.rs alongside it.

/// Appended to every system prompt that expects a JSON object back.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Return ONLY valid JSON. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
