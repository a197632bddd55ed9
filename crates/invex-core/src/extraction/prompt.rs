//! Instruction template wrapping document text for the model.

use serde::{Deserialize, Serialize};

const SYSTEM_ROLE: &str = "You are an expert data extractor who excels at analyzing invoices.";

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// The two-part instruction payload sent for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Role description for the system message.
    pub system: String,
    /// User message embedding the document text.
    pub user: String,
}

impl Prompt {
    /// Build the prompt for a document's text.
    ///
    /// The text is embedded unmodified, whatever its size.
    pub fn for_document(text: &str) -> Self {
        let user = format!(
            "Extract all relevant data from the below invoice content \
             (which was extracted from a PDF document).\n\
             Make sure to capture data like vendor name, date, amount, tax etc.\n\
             <invoice-content>\n\
             {}\n\
             </invoice-content>\n\
             \n\
             Return your response as a JSON object without any extra text or explanation.",
            text
        );

        Self {
            system: SYSTEM_ROLE.to_string(),
            user,
        }
    }

    /// System and user messages, in that order.
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![ChatMessage::system(&self.system), ChatMessage::user(&self.user)]
    }
}
