use serde::{Deserialize, Serialize};

// =============================================================================
// Conversation model
// =============================================================================

/// Who produced a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The person chatting through the widget.
    Caller,
    /// The language model.
    Assistant,
}

impl Role {
    /// Role name used on the wire by the completion provider.
    pub fn provider_name(self) -> &'static str {
        match self {
            Role::Caller => "user",
            Role::Assistant => "model",
        }
    }
}

/// One utterance in a conversation. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    role: Role,
    text: String,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn caller(text: impl Into<String>) -> Self {
        Self::new(Role::Caller, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_role_names() {
        assert_eq!(Role::Caller.provider_name(), "user");
        assert_eq!(Role::Assistant.provider_name(), "model");
    }

    #[test]
    fn test_turn_constructors() {
        let t = Turn::caller("Hola");
        assert_eq!(t.role(), Role::Caller);
        assert_eq!(t.text(), "Hola");

        let t = Turn::assistant("¿En qué puedo ayudarte?");
        assert_eq!(t.role(), Role::Assistant);
        assert_eq!(t.text(), "¿En qué puedo ayudarte?");
    }

    #[test]
    fn test_role_serializes_snake_case() {
        let json = serde_json::to_string(&Turn::caller("x")).unwrap();
        assert_eq!(json, r#"{"role":"caller","text":"x"}"#);
    }
}
