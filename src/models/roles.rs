use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::order_status::OrderStatus;

/// Shop roles. Production roles map one-to-one onto a production stage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum UserRole {
    #[serde(rename = "Administrador")]
    #[strum(serialize = "Administrador")]
    Administrador,
    #[serde(rename = "Ventas")]
    #[strum(serialize = "Ventas")]
    Ventas,
    #[serde(rename = "Diseñador")]
    #[strum(serialize = "Diseñador")]
    Disenador,
    #[serde(rename = "Operador Prensa")]
    #[strum(serialize = "Operador Prensa")]
    OperadorPrensa,
    #[serde(rename = "Operador Acabados")]
    #[strum(serialize = "Operador Acabados")]
    OperadorAcabados,
    #[serde(rename = "Inventario")]
    #[strum(serialize = "Inventario")]
    Inventario,
}

impl UserRole {
    /// Status an order enters when a user with this role is assigned to it,
    /// or `None` for roles that take no production work.
    pub fn assignment_entry_status(&self) -> Option<OrderStatus> {
        match self {
            UserRole::Disenador => Some(OrderStatus::DisenoPendiente),
            UserRole::OperadorPrensa => Some(OrderStatus::AsignadaAPrensa),
            UserRole::OperadorAcabados => Some(OrderStatus::EnPostPrensa),
            _ => None,
        }
    }

    /// Permissions granted by this role. `Administrador` is handled by the
    /// auth layer as all-permissions.
    pub fn permissions(&self) -> Vec<&'static str> {
        match self {
            UserRole::Administrador => vec![
                "users:manage",
                "providers:manage",
                "clients:manage",
                "orders:manage",
                "production:manage",
                "inventory:manage",
                "invoices:manage",
                "audit:read",
            ],
            UserRole::Ventas => vec!["clients:manage", "orders:manage", "invoices:manage"],
            UserRole::Disenador | UserRole::OperadorPrensa | UserRole::OperadorAcabados => {
                vec!["production:manage"]
            }
            UserRole::Inventario => vec!["inventory:manage", "providers:manage"],
        }
    }
}

/// Session presence flag shown on the user roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum Presence {
    #[serde(rename = "Online")]
    #[strum(serialize = "Online")]
    Online,
    #[serde(rename = "Offline")]
    #[strum(serialize = "Offline")]
    Offline,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_roles_map_to_stage_entry_states() {
        assert_eq!(
            UserRole::Disenador.assignment_entry_status(),
            Some(OrderStatus::DisenoPendiente)
        );
        assert_eq!(
            UserRole::OperadorPrensa.assignment_entry_status(),
            Some(OrderStatus::AsignadaAPrensa)
        );
        assert_eq!(
            UserRole::OperadorAcabados.assignment_entry_status(),
            Some(OrderStatus::EnPostPrensa)
        );
    }

    #[test]
    fn sales_role_cannot_take_production_work() {
        assert_eq!(UserRole::Ventas.assignment_entry_status(), None);
        assert_eq!(UserRole::Administrador.assignment_entry_status(), None);
    }
}
