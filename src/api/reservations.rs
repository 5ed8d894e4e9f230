//! # API de Reservas
//!
//! Citas de taller. Igual que los pedidos: colección en memoria, solo se
//! modifica el estado.

use actix_web::{get, post, web, HttpRequest, Responder};

use super::props::{list_response, ListQuery};
use super::status::update_status;
use super::AppResult;
use crate::db::models::EstadoPatch;
use crate::state::AppState;

#[get("/reservas")]
async fn list_reservations(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    let reservas = state.reservas.snapshot().await;
    list_response(&req, reservas, state.lists, &query)
}

/// Cambia el estado de una reserva
///
/// Estados válidos: Pendiente, Confirmada, En proceso, Completada, Cancelada.
#[post("/reservas/{id}/estado")]
async fn update_reservation_status(
    state: web::Data<AppState>,
    path: web::Path<u32>,
    data: web::Json<EstadoPatch>,
) -> AppResult<impl Responder> {
    update_status(&state.reservas, path.into_inner(), data.into_inner()).await
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_reservations);
    cfg.service(update_reservation_status);
}
