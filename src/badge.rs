//! # Insignias de estado
//!
//! Traduce el valor de estado de cada dominio a una etiqueta y una
//! categoría visual. Cada dominio tiene su tabla explícita; un valor que
//! no aparece en la tabla se marca como [`BadgeCategory::Unknown`] y
//! conserva el texto original como etiqueta.

use serde::Serialize;

/// Categoría visual de una insignia
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Warning,
    Info,
    Progress,
    Success,
    Danger,
    Muted,
    Unknown,
}

/// Dominios con tabla de estados propia
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeDomain {
    Pedido,
    Reserva,
    Factura,
    Administrador,
    Comentario,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: String,
    pub category: BadgeCategory,
}

type Entry = (&'static str, &'static str, BadgeCategory);

const PEDIDO: &[Entry] = &[
    ("Pendiente", "Pendiente", BadgeCategory::Warning),
    ("En reparación", "En reparación", BadgeCategory::Progress),
    ("Listo para recoger", "Listo para recoger", BadgeCategory::Success),
    ("Cancelado", "Cancelado", BadgeCategory::Danger),
];

const RESERVA: &[Entry] = &[
    ("Pendiente", "Pendiente", BadgeCategory::Warning),
    ("Confirmada", "Confirmada", BadgeCategory::Info),
    ("En proceso", "En proceso", BadgeCategory::Progress),
    ("Completada", "Completada", BadgeCategory::Success),
    ("Cancelada", "Cancelada", BadgeCategory::Danger),
];

const FACTURA: &[Entry] = &[
    ("Pagada", "Pagada", BadgeCategory::Success),
    ("Anulada", "Anulada", BadgeCategory::Danger),
];

const ADMINISTRADOR: &[Entry] = &[
    ("activo", "Activo", BadgeCategory::Success),
    ("inactivo", "Inactivo", BadgeCategory::Muted),
];

const COMENTARIO: &[Entry] = &[
    ("positivo", "Positivo", BadgeCategory::Success),
    ("negativo", "Negativo", BadgeCategory::Danger),
    ("neutral", "Neutral", BadgeCategory::Muted),
];

fn table(domain: BadgeDomain) -> &'static [Entry] {
    match domain {
        BadgeDomain::Pedido => PEDIDO,
        BadgeDomain::Reserva => RESERVA,
        BadgeDomain::Factura => FACTURA,
        BadgeDomain::Administrador => ADMINISTRADOR,
        BadgeDomain::Comentario => COMENTARIO,
    }
}

fn lookup(domain: BadgeDomain, status: &str) -> Option<&'static Entry> {
    let wanted = status.trim().to_lowercase();
    table(domain)
        .iter()
        .find(|(value, _, _)| value.to_lowercase() == wanted)
}

/// Devuelve la insignia para `status` dentro de `domain`.
pub fn badge(domain: BadgeDomain, status: &str) -> Badge {
    match lookup(domain, status) {
        Some((_, label, category)) => Badge {
            label: (*label).to_string(),
            category: *category,
        },
        None => {
            tracing::debug!(domain = ?domain, status = %status, "Estado sin insignia conocida");
            Badge {
                label: if status.trim().is_empty() {
                    "Desconocido".to_string()
                } else {
                    status.to_string()
                },
                category: BadgeCategory::Unknown,
            }
        }
    }
}

/// Valor canónico del estado (sin distinguir mayúsculas), si existe.
pub fn canonical(domain: BadgeDomain, status: &str) -> Option<&'static str> {
    lookup(domain, status).map(|(value, _, _)| *value)
}

/// Estados conocidos del dominio, en el orden de la tabla.
pub fn statuses(domain: BadgeDomain) -> impl Iterator<Item = &'static str> {
    table(domain).iter().map(|(value, _, _)| *value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_map_to_their_category() {
        let b = badge(BadgeDomain::Pedido, "En reparación");
        assert_eq!(b.label, "En reparación");
        assert_eq!(b.category, BadgeCategory::Progress);

        assert_eq!(
            badge(BadgeDomain::Reserva, "Cancelada").category,
            BadgeCategory::Danger
        );
        assert_eq!(
            badge(BadgeDomain::Administrador, "activo").label,
            "Activo"
        );
    }

    #[test]
    fn unknown_status_is_never_success() {
        let b = badge(BadgeDomain::Factura, "Reembolsada");
        assert_eq!(b.category, BadgeCategory::Unknown);
        assert_eq!(b.label, "Reembolsada");

        let empty = badge(BadgeDomain::Comentario, "  ");
        assert_eq!(empty.category, BadgeCategory::Unknown);
        assert_eq!(empty.label, "Desconocido");
    }

    #[test]
    fn tables_are_per_domain() {
        // "Cancelado" es de pedidos, las reservas usan "Cancelada"
        assert_eq!(
            badge(BadgeDomain::Reserva, "Cancelado").category,
            BadgeCategory::Unknown
        );
    }

    #[test]
    fn canonical_ignores_case() {
        assert_eq!(
            canonical(BadgeDomain::Pedido, "listo para recoger"),
            Some("Listo para recoger")
        );
        assert_eq!(canonical(BadgeDomain::Pedido, "Entregado"), None);
        assert_eq!(statuses(BadgeDomain::Factura).count(), 2);
    }

    #[test]
    fn serializes_category_lowercase() {
        let json = serde_json::to_value(badge(BadgeDomain::Pedido, "Pendiente")).unwrap();
        assert_eq!(json["category"], "warning");
    }
}
