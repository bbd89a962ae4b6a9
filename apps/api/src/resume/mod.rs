// Single-resume parsing: schema prompt, oracle round trip, sanitization, /process.

pub mod handlers;
pub mod prompts;
pub mod structurer;
