//! # API de Comentarios
//!
//! Moderación de comentarios de clientes. Aprobar y eliminar solo afectan a
//! la colección en memoria.

use actix_web::{delete, get, post, web, HttpRequest, HttpResponse, Responder};
use serde_json::json;

use super::props::{list_response, ListQuery};
use super::{AppError, AppResult};
use crate::db::models::ComentarioPatch;
use crate::listview::Notice;
use crate::state::AppState;

/// Lista de comentarios; `estado` filtra por sentimiento
/// (`positivo`, `negativo`, `neutral`).
#[get("/comentarios")]
async fn list_comments(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
    req: HttpRequest,
) -> AppResult<impl Responder> {
    let comentarios = state.comentarios.snapshot().await;
    list_response(&req, comentarios, state.lists, &query)
}

#[post("/comentarios/{id}/aprobar")]
async fn approve_comment(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> AppResult<impl Responder> {
    let id = path.into_inner();
    let comentario = state
        .comentarios
        .update(&id, ComentarioPatch { aprobado: Some(true) })
        .await
        .ok_or_else(|| AppError::not_found_id("Comentario", id))?;

    tracing::info!(id = id, "Comentario aprobado");

    Ok(HttpResponse::Ok().json(json!({
        "registro": comentario,
        "notice": Notice::success("Comentario aprobado"),
    })))
}

#[delete("/comentarios/{id}")]
async fn delete_comment(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> AppResult<impl Responder> {
    let id = path.into_inner();
    state
        .comentarios
        .remove(&id)
        .await
        .ok_or_else(|| AppError::not_found_id("Comentario", id))?;

    tracing::info!(id = id, "Comentario eliminado");

    Ok(HttpResponse::Ok().json(json!({
        "id": id,
        "notice": Notice::success("Comentario eliminado"),
    })))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_comments);
    cfg.service(approve_comment);
    cfg.service(delete_comment);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;

    #[actix_web::test]
    async fn approve_then_delete() {
        let state = AppState::seeded(&AppConfig::default());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/comentarios/2/aprobar")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["registro"]["aprobado"], true);

        let req = test::TestRequest::delete().uri("/comentarios/2").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        assert_eq!(state.comentarios.len().await, 4);

        let req = test::TestRequest::delete().uri("/comentarios/2").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn filter_by_sentiment() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::seeded(&AppConfig::default())))
                .configure(routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/comentarios?estado=negativo")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let registros = body["comentarios"]["registros"].as_array().unwrap();
        assert_eq!(registros.len(), 2);
        assert!(registros.iter().all(|r| r["badge"]["category"] == "danger"));
    }
}
