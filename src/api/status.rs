//! Cambio de estado compartido por pedidos y reservas.

use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::json;

use super::{AppError, AppResult};
use crate::badge;
use crate::db::models::EstadoPatch;
use crate::db::RecordStore;
use crate::listview::{Listable, Notice};

/// Valida el estado contra la tabla del dominio y lo aplica en el almacén.
///
/// # Errores
/// - `400 Bad Request`: estado fuera de la tabla del dominio
/// - `404 Not Found`: no existe registro con ese id
pub async fn update_status<T>(store: &RecordStore<T>, id: T::Id, patch: EstadoPatch) -> AppResult<HttpResponse>
where
    T: Listable<Patch = EstadoPatch> + Serialize,
{
    let estado = badge::canonical(T::BADGE, &patch.estado).ok_or_else(|| {
        let permitidos = badge::statuses(T::BADGE).collect::<Vec<_>>().join(", ");
        AppError::validation_field("estado", &format!("Estado desconocido, use uno de: {}", permitidos))
    })?;

    let registro = store
        .update(
            &id,
            EstadoPatch {
                estado: estado.to_string(),
            },
        )
        .await
        .ok_or_else(|| AppError::not_found_id(T::KEY, &id))?;

    tracing::info!(entidad = T::KEY, id = %id, estado = %estado, "Estado actualizado");

    Ok(HttpResponse::Ok().json(json!({
        "registro": registro,
        "badge": badge::badge(T::BADGE, estado),
        "notice": Notice::success(format!("Estado actualizado a '{}'", estado)),
    })))
}
