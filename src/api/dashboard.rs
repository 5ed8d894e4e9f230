//! # Dashboard
//!
//! Resumen de la actividad: pedidos y reservas por estado, facturación y
//! comentarios pendientes de moderar.

use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use serde::Serialize;

use super::props::{page_props, SessionUser};
use super::AppResult;
use crate::badge::{self, Badge, BadgeDomain};
use crate::db::{Comentario, Factura};
use crate::state::AppState;

#[derive(Debug, Serialize, PartialEq)]
pub struct StatusCount {
    pub estado: String,
    pub badge: Badge,
    pub total: usize,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct InvoiceSummary {
    pub emitidas: usize,
    pub pagadas: usize,
    pub anuladas: usize,
    pub monto_cobrado: f64,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub pedidos: Vec<StatusCount>,
    pub reservas: Vec<StatusCount>,
    pub facturas: InvoiceSummary,
    pub comentarios_pendientes: usize,
}

/// Cuenta por cada estado de la tabla del dominio, y agrupa aparte los
/// valores desconocidos.
pub fn count_by_status<'a>(domain: BadgeDomain, values: impl Iterator<Item = &'a str>) -> Vec<StatusCount> {
    let mut counts: Vec<StatusCount> = badge::statuses(domain)
        .map(|estado| StatusCount {
            estado: estado.to_string(),
            badge: badge::badge(domain, estado),
            total: 0,
        })
        .collect();

    for value in values {
        match badge::canonical(domain, value) {
            Some(canonical) => {
                if let Some(count) = counts.iter_mut().find(|c| c.estado == canonical) {
                    count.total += 1;
                }
            }
            None => match counts.iter_mut().find(|c| c.estado == value) {
                Some(count) => count.total += 1,
                None => counts.push(StatusCount {
                    estado: value.to_string(),
                    badge: badge::badge(domain, value),
                    total: 1,
                }),
            },
        }
    }

    counts
}

pub fn summarize_invoices(facturas: &[Factura]) -> InvoiceSummary {
    let pagadas: Vec<&Factura> = facturas
        .iter()
        .filter(|f| badge::canonical(BadgeDomain::Factura, &f.estado) == Some("Pagada"))
        .collect();
    let anuladas = facturas
        .iter()
        .filter(|f| badge::canonical(BadgeDomain::Factura, &f.estado) == Some("Anulada"))
        .count();

    InvoiceSummary {
        emitidas: facturas.len(),
        pagadas: pagadas.len(),
        anuladas,
        monto_cobrado: pagadas.iter().map(|f| f.monto).sum(),
    }
}

fn pending_comments(comentarios: &[Comentario]) -> usize {
    comentarios.iter().filter(|c| !c.aprobado).count()
}

#[get("/dashboard")]
async fn dashboard(state: web::Data<AppState>, req: HttpRequest) -> AppResult<impl Responder> {
    let pedidos = state.pedidos.snapshot().await;
    let reservas = state.reservas.snapshot().await;
    let facturas = state.facturas.snapshot().await;
    let comentarios = state.comentarios.snapshot().await;

    let summary = DashboardSummary {
        pedidos: count_by_status(BadgeDomain::Pedido, pedidos.iter().map(|p| p.estado.as_str())),
        reservas: count_by_status(BadgeDomain::Reserva, reservas.iter().map(|r| r.estado.as_str())),
        facturas: summarize_invoices(&facturas),
        comentarios_pendientes: pending_comments(&comentarios),
    };

    let props = page_props(&SessionUser::from_request(&req), "dashboard", summary)?;
    Ok(HttpResponse::Ok().json(props))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badge::BadgeCategory;
    use crate::config::AppConfig;
    use crate::db::seed;
    use actix_web::{test as actix_test, App};
    use serde_json::Value;

    #[test]
    fn unknown_statuses_get_their_own_row() {
        let counts = count_by_status(
            BadgeDomain::Pedido,
            ["Pendiente", "pendiente", "Entregado", "Entregado"].into_iter(),
        );
        let pendiente = counts.iter().find(|c| c.estado == "Pendiente").unwrap();
        assert_eq!(pendiente.total, 2);
        let entregado = counts.iter().find(|c| c.estado == "Entregado").unwrap();
        assert_eq!(entregado.total, 2);
        assert_eq!(entregado.badge.category, BadgeCategory::Unknown);
        assert_eq!(counts.len(), 5);
    }

    #[test]
    fn invoice_totals_only_count_paid() {
        let summary = summarize_invoices(&seed::facturas());
        assert_eq!(summary.emitidas, 6);
        assert_eq!(summary.pagadas, 4);
        assert_eq!(summary.anuladas, 2);
        assert!((summary.monto_cobrado - 866.15).abs() < 1e-9);
    }

    #[actix_web::test]
    async fn dashboard_props() {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::seeded(&AppConfig::default())))
                .configure(routes),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/dashboard").to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["dashboard"]["comentarios_pendientes"], 3);
        assert_eq!(body["dashboard"]["pedidos"].as_array().unwrap().len(), 4);
        assert!(body["auth"]["user"].is_object());
    }
}
