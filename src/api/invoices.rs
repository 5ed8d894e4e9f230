//! # API de Facturas
//!
//! Historial de facturación, solo lectura.

use actix_web::{get, web, HttpRequest, Responder};

use super::props::{list_response, ListQuery};
use super::AppResult;
use crate::state::AppState;

/// Lista de facturas. Se puede filtrar por `estado=Pagada|Anulada` y buscar
/// por número, cliente o método de pago.
#[get("/facturas")]
async fn list_invoices(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    let facturas = state.facturas.snapshot().await;
    list_response(&req, facturas, state.lists, &query)
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_invoices);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use actix_web::{test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn search_by_payment_method() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::seeded(&AppConfig::default())))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/facturas?q=tarjeta&estado=Pagada")
            .insert_header(("X-Usuario-Nombre", "Sergio"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let ids: Vec<u64> = body["facturas"]["registros"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|r| r["id"].as_u64())
            .collect();
        assert_eq!(ids, vec![4, 1]);
        assert_eq!(body["auth"]["user"]["nombre"], "Sergio");
    }
}
