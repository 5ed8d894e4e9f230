//! # API de Pedidos
//!
//! Pedidos de taller (reparaciones, mantenimientos). La colección vive en
//! memoria; el único cambio permitido es el de estado.

use actix_web::{get, post, web, HttpRequest, Responder};

use super::props::{list_response, ListQuery};
use super::status::update_status;
use super::AppResult;
use crate::db::models::EstadoPatch;
use crate::state::AppState;

/// Página de pedidos
///
/// # Respuesta
/// ```json
/// {
///   "auth": { "user": { "nombre": "Laura", "email": null } },
///   "pedidos": {
///     "registros": [{ "id": 7, "cliente": "Miguel Castro", "estado": "Pendiente",
///                     "badge": { "label": "Pendiente", "category": "warning" } }],
///     "total": 8, "coincidencias": 3, "visibles": 3, "hay_mas": false,
///     "siguiente_limite": null, "busqueda": "", "estado": "Pendiente",
///     "orden": "desc", "vacio": null
///   }
/// }
/// ```
#[get("/pedidos")]
async fn list_orders(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    let pedidos = state.pedidos.snapshot().await;
    list_response(&req, pedidos, state.lists, &query)
}

/// Cambia el estado de un pedido
///
/// Body: `{ "estado": "En reparación" }`
#[post("/pedidos/{id}/estado")]
async fn update_order_status(
    state: web::Data<AppState>,
    path: web::Path<u32>,
    data: web::Json<EstadoPatch>,
) -> AppResult<impl Responder> {
    update_status(&state.pedidos, path.into_inner(), data.into_inner()).await
}

/// Configura las rutas relacionadas con pedidos
///
/// - `GET /pedidos`
/// - `POST /pedidos/{id}/estado`
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_orders);
    cfg.service(update_order_status);
}
