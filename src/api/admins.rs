//! # API de Administradores
//!
//! Los administradores son usuarios con `rol: "admin"` en MongoDB.
//! Eliminar un administrador le retira el rol; el usuario no se borra.

use actix_web::{delete, get, web, HttpRequest, HttpResponse, Responder};
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use super::props::{list_response, ListQuery};
use super::{AppError, AppResult};
use crate::db::MongoRepo;
use crate::listview::Notice;
use crate::state::AppState;

/// Página de administradores
#[get("/usuarios/administradores")]
async fn list_admins(
    repo: web::Data<MongoRepo>,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    let administradores = repo.list_admins().await?;
    list_response(&req, administradores, state.lists, &query)
}

/// Retira el rol de administrador
///
/// # Respuesta
/// ```json
/// {
///   "id": "65f1a0c2e4b0a1b2c3d4e5f6",
///   "notice": { "level": "success", "message": "Administrador eliminado correctamente" }
/// }
/// ```
///
/// # Errores
/// - `400 Bad Request`: id no es un ObjectId válido
/// - `404 Not Found`: no existe un administrador con ese id
/// - `500 Internal Server Error`: error de base de datos
#[delete("/usuarios/administradores/{id}")]
async fn remove_admin(
    repo: web::Data<MongoRepo>,
    path: web::Path<String>,
) -> AppResult<impl Responder> {
    let id = ObjectId::parse_str(path.into_inner())?;

    if !repo.demote_admin(id).await? {
        return Err(AppError::not_found_id("Administrador", id.to_hex()));
    }

    tracing::info!(id = %id, "Administrador degradado a cliente");

    Ok(HttpResponse::Ok().json(json!({
        "id": id.to_hex(),
        "notice": Notice::success("Administrador eliminado correctamente"),
    })))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_admins);
    cfg.service(remove_admin);
}
