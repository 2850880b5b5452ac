use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Production phase an order status belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Quote,
    PrePress,
    Press,
    PostPress,
    Terminal,
}

/// Closed set of order lifecycle states. Display strings keep the Spanish
/// labels the shop works with; those strings are also what gets persisted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum OrderStatus {
    #[serde(rename = "Nueva")]
    #[strum(serialize = "Nueva")]
    Nueva,
    #[serde(rename = "En Negociación")]
    #[strum(serialize = "En Negociación")]
    EnNegociacion,
    #[serde(rename = "Rechazada")]
    #[strum(serialize = "Rechazada")]
    Rechazada,
    #[serde(rename = "Orden Creada")]
    #[strum(serialize = "Orden Creada")]
    OrdenCreada,
    #[serde(rename = "Diseño Pendiente")]
    #[strum(serialize = "Diseño Pendiente")]
    DisenoPendiente,
    #[serde(rename = "En Diseño")]
    #[strum(serialize = "En Diseño")]
    EnDiseno,
    #[serde(rename = "En Aprobación de Cliente")]
    #[strum(serialize = "En Aprobación de Cliente")]
    EnAprobacionCliente,
    #[serde(rename = "Cambios Solicitados")]
    #[strum(serialize = "Cambios Solicitados")]
    CambiosSolicitados,
    #[serde(rename = "Diseño Aprobado")]
    #[strum(serialize = "Diseño Aprobado")]
    DisenoAprobado,
    #[serde(rename = "Asignada a Prensa")]
    #[strum(serialize = "Asignada a Prensa")]
    AsignadaAPrensa,
    #[serde(rename = "En Preparación")]
    #[strum(serialize = "En Preparación")]
    EnPreparacion,
    #[serde(rename = "Imprimiendo")]
    #[strum(serialize = "Imprimiendo")]
    Imprimiendo,
    #[serde(rename = "En Post-Prensa")]
    #[strum(serialize = "En Post-Prensa")]
    EnPostPrensa,
    #[serde(rename = "En Acabados")]
    #[strum(serialize = "En Acabados")]
    EnAcabados,
    #[serde(rename = "En Control de Calidad")]
    #[strum(serialize = "En Control de Calidad")]
    EnControlDeCalidad,
    #[serde(rename = "Completado")]
    #[strum(serialize = "Completado")]
    Completado,
    #[serde(rename = "Cancelada")]
    #[strum(serialize = "Cancelada")]
    Cancelada,
}

impl OrderStatus {
    pub fn stage(&self) -> Stage {
        use OrderStatus::*;
        match self {
            Nueva | EnNegociacion => Stage::Quote,
            OrdenCreada | DisenoPendiente | EnDiseno | EnAprobacionCliente
            | CambiosSolicitados | DisenoAprobado => Stage::PrePress,
            AsignadaAPrensa | EnPreparacion | Imprimiendo => Stage::Press,
            EnPostPrensa | EnAcabados | EnControlDeCalidad => Stage::PostPress,
            Completado | Rechazada | Cancelada => Stage::Terminal,
        }
    }

    /// A quote that can still be negotiated, rejected or converted.
    pub fn is_active_quote(&self) -> bool {
        matches!(self, OrderStatus::Nueva | OrderStatus::EnNegociacion)
    }

    pub fn is_terminal(&self) -> bool {
        self.stage() == Stage::Terminal
    }

    /// Entry state of each production stage, where an un-assignment drops
    /// the order back to `OrdenCreada`.
    pub fn is_stage_entry(&self) -> bool {
        matches!(
            self,
            OrderStatus::DisenoPendiente | OrderStatus::AsignadaAPrensa | OrderStatus::EnPostPrensa
        )
    }
}

/// Validates whether a status transition is allowed.
pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    match (from, to) {
        // Quote negotiation
        (Nueva, EnNegociacion) | (EnNegociacion, Nueva) => true,
        (Nueva | EnNegociacion, Rechazada) => true,
        (Nueva | EnNegociacion, OrdenCreada) => true,

        // Pre-press
        (OrdenCreada, DisenoPendiente) => true,
        (DisenoPendiente, EnDiseno) => true,
        (EnDiseno, EnAprobacionCliente) => true,
        (EnAprobacionCliente, DisenoAprobado | CambiosSolicitados) => true,
        (CambiosSolicitados, EnDiseno) => true,

        // Press
        (DisenoAprobado, AsignadaAPrensa) => true,
        (AsignadaAPrensa, EnPreparacion) => true,
        (EnPreparacion, Imprimiendo) => true,

        // Post-press
        (Imprimiendo, EnPostPrensa) => true,
        (EnPostPrensa, EnAcabados) => true,
        (EnAcabados, EnControlDeCalidad) => true,
        (EnControlDeCalidad, Completado) => true,

        // Un-assignment returns the order to the production backlog
        (DisenoPendiente | AsignadaAPrensa | EnPostPrensa, OrdenCreada) => true,

        // Any in-flight production order can be cancelled
        (from, Cancelada) if !from.is_terminal() && !from.is_active_quote() => true,

        // No-op transition
        _ if from == to => true,

        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn display_round_trips_through_from_str() {
        for status in OrderStatus::iter() {
            let parsed = OrderStatus::from_str(&status.to_string()).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn happy_path_reaches_completion() {
        use OrderStatus::*;
        let path = [
            Nueva,
            EnNegociacion,
            OrdenCreada,
            DisenoPendiente,
            EnDiseno,
            EnAprobacionCliente,
            DisenoAprobado,
            AsignadaAPrensa,
            EnPreparacion,
            Imprimiendo,
            EnPostPrensa,
            EnAcabados,
            EnControlDeCalidad,
            Completado,
        ];
        for pair in path.windows(2) {
            assert!(
                is_valid_transition(pair[0], pair[1]),
                "expected {} -> {} to be legal",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn design_revision_loop_is_legal() {
        use OrderStatus::*;
        assert!(is_valid_transition(EnAprobacionCliente, CambiosSolicitados));
        assert!(is_valid_transition(CambiosSolicitados, EnDiseno));
    }

    #[test]
    fn illegal_jumps_are_rejected() {
        use OrderStatus::*;
        assert!(!is_valid_transition(Nueva, Completado));
        assert!(!is_valid_transition(Completado, Imprimiendo));
        assert!(!is_valid_transition(Rechazada, OrdenCreada));
        assert!(!is_valid_transition(Cancelada, EnDiseno));
        assert!(!is_valid_transition(EnDiseno, Imprimiendo));
    }

    #[test]
    fn quotes_cannot_be_cancelled_only_rejected() {
        use OrderStatus::*;
        assert!(!is_valid_transition(Nueva, Cancelada));
        assert!(is_valid_transition(Nueva, Rechazada));
        assert!(is_valid_transition(Imprimiendo, Cancelada));
    }

    #[test]
    fn unassignment_returns_to_backlog() {
        use OrderStatus::*;
        assert!(is_valid_transition(DisenoPendiente, OrdenCreada));
        assert!(is_valid_transition(AsignadaAPrensa, OrdenCreada));
        assert!(is_valid_transition(EnPostPrensa, OrdenCreada));
        assert!(!is_valid_transition(EnDiseno, OrdenCreada));
    }

    #[test]
    fn stages_partition_the_status_set() {
        use OrderStatus::*;
        assert_eq!(Nueva.stage(), Stage::Quote);
        assert_eq!(DisenoAprobado.stage(), Stage::PrePress);
        assert_eq!(Imprimiendo.stage(), Stage::Press);
        assert_eq!(EnAcabados.stage(), Stage::PostPress);
        assert_eq!(Completado.stage(), Stage::Terminal);
    }
}
