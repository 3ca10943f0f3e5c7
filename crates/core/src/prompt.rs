//! Context prompt assembly for the chat model.

use crate::types::RetrievedChunk;

/// Instruction header for the tenancy-contract assistant. The model must
/// answer only from the supplied chunks and keep context from one contract.
const INSTRUCTIONS: &str = "You are giving information around tenancy contracts.\n\
Ensure all context you use is from the same filename/contract.\n\
Answer the question based on the following context:";

/// Build the system prompt from the retrieved chunks and high-entropy words.
///
/// Output is deterministic for deterministic input: instruction header, one
/// Filename/Chunk block per retrieved chunk, then the high-entropy word list.
pub fn build_context_prompt(chunks: &[RetrievedChunk], high_entropy_words: &[String]) -> String {
    let mut prompt = String::from(INSTRUCTIONS);
    prompt.push_str("\n\n");

    if chunks.is_empty() {
        prompt.push_str("No contract context matched the question.\n\n");
    }
    for retrieved in chunks {
        prompt.push_str(&format!("Filename: {}\n", retrieved.chunk.filename));
        prompt.push_str(&format!("Chunk: {}\n\n", retrieved.chunk.content));
    }

    if !high_entropy_words.is_empty() {
        prompt.push_str(&format!("High Entropy Words: {}\n", high_entropy_words.join(", ")));
    }

    prompt
}
