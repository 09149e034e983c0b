//! The fixed persona that opens every conversation.
//!
//! The instruction text is business content for Mandrinados Anaid and is
//! replayed to the model as the first caller turn of each session, followed
//! by a canned acknowledgement from the assistant.

use anaid_core::types::Turn;

/// Instruction text seeded as the first caller turn.
pub const PERSONA_INSTRUCTION: &str = include_str!("persona_es.txt");

/// Assistant acknowledgement seeded as the second turn.
pub const PERSONA_ACKNOWLEDGEMENT: &str =
    "Entendido. Soy el asistente técnico de Mandrinados Anaid. ¿En qué puedo ayudarte hoy?";

/// Sentence the assistant must use to deflect questions about itself.
pub const REFUSAL_SENTENCE: &str = "Lo siento, solo puedo atender consultas relacionadas con reparaciones de maquinaria y servicios de Mandrinados Anaid.";

/// The two turns every new session starts with.
pub fn seed_turns() -> Vec<Turn> {
    vec![
        Turn::caller(PERSONA_INSTRUCTION),
        Turn::assistant(PERSONA_ACKNOWLEDGEMENT),
    ]
}
