#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;

use super::Persona;
use super::Settings;

/// The exact payload handed to a backend: one composed user turn plus the
/// generation parameters copied verbatim from the current settings.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
}

/// Builds the single-turn prompt: instruction frame, full persona
/// description, then the literal user utterance. Pure function, the running
/// transcript is deliberately not included.
pub fn compose(persona: &Persona, utterance: &str, settings: &Settings) -> GenerationRequest {
    let prompt = format!(
        "You are {name}. Here is your full character profile:\n\n{description}\n\nAnswer as him, using his style of speech, philosophy, and temperament. Stay calm and measured, with subtle humor and a sarcastic note. Keep your phrases short and meaningful.\n\nUser question: {utterance}",
        name = persona.name,
        description = persona.description,
    );

    return GenerationRequest {
        prompt,
        temperature: settings.temperature,
        max_output_tokens: settings.max_tokens,
    };
}
