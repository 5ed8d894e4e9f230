//! # API de Banners
//!
//! Alta de banners mediante `multipart/form-data` con los campos
//! `titulo`, `subtitulo`, `imagen_principal` (URL) o `imagen_archivo`
//! (archivo), `fecha_inicio`, `fecha_fin` y `activo`.

use actix_multipart::{Field, Multipart};
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use chrono::{NaiveDate, Utc};
use futures_util::TryStreamExt;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};

use super::props::{page_props, SessionUser};
use super::{AppError, AppResult, ResultExt};
use crate::banner::{BannerDraft, BannerSubmission, FieldErrors, ImageFile, ImageSource};
use crate::db::{BannerDoc, MongoRepo};
use crate::listview::Notice;
use crate::state::AppState;

const MAX_TEXT_FIELD_BYTES: usize = 4 * 1024;
const MAX_TEXT_TOTAL_BYTES: usize = 16 * 1024;
const MAX_PARTS: usize = 12;
const UPLOADS_ROUTE: &str = "/uploads";

/// Parte del multipart ya leída en memoria.
#[derive(Debug, Clone, Default)]
pub struct RawPart {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

fn truthy(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "on" | "si" | "sí")
}

/// Reconstruye el borrador del formulario a partir de las partes recibidas.
pub fn draft_from_parts(parts: Vec<RawPart>) -> Result<BannerDraft, FieldErrors> {
    let mut draft = BannerDraft::default();
    let mut errors = FieldErrors::new();

    for part in parts {
        if part.name == "imagen_archivo" {
            if part.data.is_empty() {
                continue;
            }
            draft.file = Some(ImageFile {
                nombre: part.filename.unwrap_or_else(|| "imagen".to_string()),
                tipo: part.content_type.unwrap_or_default(),
                bytes: part.data,
            });
            continue;
        }

        let value = match String::from_utf8(part.data) {
            Ok(value) => value,
            Err(_) => {
                errors.insert(&part.name, "Texto con codificación inválida");
                continue;
            }
        };

        match part.name.as_str() {
            "titulo" => draft.titulo = value,
            "subtitulo" => draft.subtitulo = value,
            "imagen_principal" => draft.url = value,
            "fecha_inicio" => draft.fecha_inicio = value,
            "fecha_fin" => draft.fecha_fin = value,
            "activo" => draft.activo = truthy(&value),
            other => tracing::debug!(campo = other, "Campo multipart ignorado"),
        }
    }

    match (&draft.file, draft.url.trim().is_empty()) {
        (Some(_), false) => {
            errors.insert("imagen_principal", "Envíe una URL o un archivo, no ambos");
        }
        (Some(_), true) => draft.use_url = false,
        (None, _) => draft.use_url = true,
    }

    if errors.is_empty() {
        Ok(draft)
    } else {
        Err(errors)
    }
}

async fn read_field(field: &mut Field, name: &str, limit: usize) -> AppResult<Vec<u8>> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if data.len() + chunk.len() > limit {
            let mut errors = FieldErrors::new();
            errors.insert(name, format!("Máximo {} bytes", limit));
            return Err(errors.into());
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Límites acumulados del multipart: número de partes, nombres sin
/// repetir y bytes totales leídos.
#[derive(Debug)]
struct PartBudget {
    max_file_bytes: usize,
    seen: Vec<String>,
    remaining: usize,
}

impl PartBudget {
    fn new(max_file_bytes: usize) -> Self {
        Self {
            max_file_bytes,
            seen: Vec::new(),
            remaining: max_file_bytes.saturating_add(MAX_TEXT_TOTAL_BYTES),
        }
    }

    /// Admite una parte nueva y devuelve cuántos bytes puede ocupar.
    fn admit(&mut self, name: &str) -> AppResult<usize> {
        if self.seen.len() >= MAX_PARTS {
            return Err(AppError::Validation(format!(
                "El formulario admite como máximo {} partes",
                MAX_PARTS
            )));
        }
        if self.seen.iter().any(|seen| seen == name) {
            let mut errors = FieldErrors::new();
            errors.insert(name, "Campo repetido");
            return Err(errors.into());
        }
        self.seen.push(name.to_string());

        let per_part = if name == "imagen_archivo" {
            self.max_file_bytes
        } else {
            MAX_TEXT_FIELD_BYTES
        };
        Ok(per_part.min(self.remaining))
    }

    fn consume(&mut self, bytes: usize) {
        self.remaining = self.remaining.saturating_sub(bytes);
    }
}

async fn read_parts(mut payload: Multipart, max_file_bytes: usize) -> AppResult<Vec<RawPart>> {
    let mut parts = Vec::new();
    let mut budget = PartBudget::new(max_file_bytes);

    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_string();
        let limit = budget.admit(&name)?;
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.essence_str().to_string());

        let data = read_field(&mut field, &name, limit).await?;
        budget.consume(data.len());

        parts.push(RawPart {
            name,
            filename,
            content_type,
            data,
        });
    }

    Ok(parts)
}

/// Imagen ya escrita en disco
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub path: PathBuf,
    pub url: String,
}

/// Guarda la imagen en el directorio de subidas y devuelve su ruta y su URL pública.
pub async fn store_upload(dir: &Path, file: &ImageFile) -> AppResult<StoredUpload> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err_internal("Error creando directorio de subidas")?;

    let name = format!("{}.{}", uuid::Uuid::new_v4(), file.extension());
    let path = dir.join(&name);
    tokio::fs::write(&path, &file.bytes)
        .await
        .map_err_internal("Error guardando imagen")?;

    tracing::debug!(archivo = %name, original = %file.nombre, bytes = file.bytes.len(), "Imagen guardada");
    Ok(StoredUpload {
        path,
        url: format!("{}/{}", UPLOADS_ROUTE, name),
    })
}

/// Borra la imagen recién guardada si el alta del banner falla.
async fn discard_on_error<T>(result: AppResult<T>, stored: Option<&StoredUpload>) -> AppResult<T> {
    if let (Err(_), Some(stored)) = (&result, stored) {
        match tokio::fs::remove_file(&stored.path).await {
            Ok(()) => tracing::debug!(archivo = %stored.path.display(), "Imagen huérfana eliminada"),
            Err(e) => tracing::warn!(archivo = %stored.path.display(), error = %e, "No se pudo eliminar la imagen huérfana"),
        }
    }
    result
}

fn banner_doc(submission: &BannerSubmission, imagen_url: String) -> BannerDoc {
    let origen = match submission.imagen {
        ImageSource::Url(_) => "url",
        ImageSource::File(_) => "archivo",
    };
    BannerDoc {
        id: None,
        titulo: submission.titulo.clone(),
        subtitulo: submission.subtitulo.clone(),
        imagen_url,
        origen_imagen: origen.to_string(),
        fecha_inicio: submission.fecha_inicio.map(|d| d.format("%Y-%m-%d").to_string()),
        fecha_fin: submission.fecha_fin.map(|d| d.format("%Y-%m-%d").to_string()),
        activo: submission.activo,
        created_at: MongoRepo::current_timestamp(),
    }
}

#[derive(Debug, Serialize)]
struct BannerView {
    id: String,
    titulo: Option<String>,
    subtitulo: Option<String>,
    imagen_url: String,
    origen_imagen: String,
    fecha_inicio: Option<String>,
    fecha_fin: Option<String>,
    activo: bool,
    /// Activo y con la fecha de hoy dentro del rango
    vigente: bool,
}

fn in_range(today: NaiveDate, inicio: Option<&str>, fin: Option<&str>) -> bool {
    let parse = |raw: &str| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
    let after_start = inicio.and_then(parse).map_or(true, |d| today >= d);
    let before_end = fin.and_then(parse).map_or(true, |d| today <= d);
    after_start && before_end
}

impl BannerView {
    fn new(doc: BannerDoc, today: NaiveDate) -> Self {
        let vigente =
            doc.activo && in_range(today, doc.fecha_inicio.as_deref(), doc.fecha_fin.as_deref());
        Self {
            id: doc.id.map(|id| id.to_hex()).unwrap_or_default(),
            titulo: doc.titulo,
            subtitulo: doc.subtitulo,
            imagen_url: doc.imagen_url,
            origen_imagen: doc.origen_imagen,
            fecha_inicio: doc.fecha_inicio,
            fecha_fin: doc.fecha_fin,
            activo: doc.activo,
            vigente,
        }
    }
}

#[get("/banners")]
async fn list_banners(repo: web::Data<MongoRepo>, req: HttpRequest) -> AppResult<impl Responder> {
    let today = Utc::now().date_naive();
    let banners: Vec<BannerView> = repo
        .list_banners()
        .await?
        .into_iter()
        .map(|doc| BannerView::new(doc, today))
        .collect();

    let props = page_props(&SessionUser::from_request(&req), "banners", banners)?;
    Ok(HttpResponse::Ok().json(props))
}

/// Crea un banner
///
/// # Errores
/// - `422 Unprocessable Entity`: errores por campo (`errores`)
/// - `400 Bad Request`: multipart mal formado
/// - `500 Internal Server Error`: error guardando la imagen o en la base de datos
#[post("/banners")]
async fn create_banner(
    repo: web::Data<MongoRepo>,
    state: web::Data<AppState>,
    payload: Multipart,
) -> AppResult<impl Responder> {
    let parts = read_parts(payload, state.uploads.max_bytes).await?;
    let submission = draft_from_parts(parts)?.validate()?;

    let (imagen_url, stored) = match &submission.imagen {
        ImageSource::Url(url) => (url.clone(), None),
        ImageSource::File(file) => {
            let stored = store_upload(&state.uploads.dir, file).await?;
            (stored.url.clone(), Some(stored))
        }
    };

    let inserted = repo.insert_banner(banner_doc(&submission, imagen_url.clone())).await;
    let id = discard_on_error(inserted, stored.as_ref()).await?;
    tracing::info!(id = %id, imagen = %imagen_url, "Banner creado");

    Ok(HttpResponse::Created().json(json!({
        "id": id.to_hex(),
        "imagen_url": imagen_url,
        "notice": Notice::success("Banner creado correctamente"),
    })))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_banners);
    cfg.service(create_banner);
}
