use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle of a purchase order: sent to the provider, then received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum PurchaseOrderStatus {
    #[serde(rename = "Enviada")]
    #[strum(serialize = "Enviada")]
    Enviada,
    #[serde(rename = "Recibida")]
    #[strum(serialize = "Recibida")]
    Recibida,
}
