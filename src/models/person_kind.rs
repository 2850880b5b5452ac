use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Whether a client is a natural person (DNI) or a legal entity (RUC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum PersonKind {
    #[serde(rename = "NATURAL")]
    #[strum(serialize = "NATURAL")]
    Natural,
    #[serde(rename = "JURIDICA")]
    #[strum(serialize = "JURIDICA")]
    Juridica,
}

impl PersonKind {
    /// Infers the kind from the tax document: an 8-digit DNI means a natural
    /// person, anything else (11-digit RUC included) a legal entity.
    pub fn infer_from_tax_id(tax_id: &str) -> Self {
        let digits = tax_id.trim();
        if digits.len() == 8 && digits.chars().all(|c| c.is_ascii_digit()) {
            PersonKind::Natural
        } else {
            PersonKind::Juridica
        }
    }
}
