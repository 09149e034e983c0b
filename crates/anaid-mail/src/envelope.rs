//! Plain-text envelope wrapped around a chat transcript.

use chrono::{DateTime, Local};

const RULE: &str = "------------------------------------------------------------";

/// A composed transcript email, ready for a `MailTransport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEnvelope {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl TranscriptEnvelope {
    /// Wrap `transcript` verbatim in the standard notice sent to the company
    /// mailbox, stamped with `sent_at`.
    pub fn compose(from: &str, to: &str, transcript: &str, sent_at: DateTime<Local>) -> Self {
        let subject = format!(
            "Resumen Chat con Cliente - {}",
            sent_at.format("%d/%m/%Y %H:%M")
        );
        let body = format!(
            "Hola,\n\
             \n\
             Un cliente ha finalizado una conversación con el Asistente Virtual.\n\
             Aquí tienes el resumen de la charla:\n\
             \n\
             {rule}\n\
             {transcript}\n\
             {rule}\n\
             \n\
             Fecha: {date}\n",
            rule = RULE,
            transcript = transcript,
            date = sent_at.format("%d/%m/%Y %H:%M:%S"),
        );
        Self {
            from: from.to_string(),
            to: to.to_string(),
            subject,
            body,
        }
    }
}
