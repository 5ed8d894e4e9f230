//! # Cliente del back-office
//!
//! Escrituras remotas que hace el panel contra el servidor:
//!
//! - `DELETE /usuarios/administradores/{id}` con eliminación optimista
//!   sobre la lista local (ver [`remove_admin`]).
//! - `POST /banners` en `multipart/form-data` a partir del formulario
//!   validado (ver [`submit_banner`]).

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::api::ErrorResponse;
use crate::banner::{BannerForm, BannerSubmission, FieldErrors, FormError, FormState};
use crate::db::Administrador;
use crate::listview::{Notice, RemoteList};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Error de red: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Datos inválidos en {} campo(s)", .0.len())]
    Validation(FieldErrors),

    #[error("El servidor respondió {status}: {message}")]
    Status { status: StatusCode, message: String },
}

impl ClientError {
    /// Errores por campo para mostrar en el formulario.
    pub fn into_field_errors(self) -> FieldErrors {
        match self {
            ClientError::Validation(errors) => errors,
            other => FieldErrors::general(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BackofficeClient {
    http: Client,
    base_url: String,
}

impl BackofficeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(response: reqwest::Response) -> Result<(), ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.json::<ErrorResponse>().await.ok();
        match body {
            Some(ErrorResponse { errores: Some(errores), .. })
                if status == StatusCode::UNPROCESSABLE_ENTITY =>
            {
                Err(ClientError::Validation(errores))
            }
            Some(body) => Err(ClientError::Status {
                status,
                message: body.message,
            }),
            None => Err(ClientError::Status {
                status,
                message: status.canonical_reason().unwrap_or("Error").to_string(),
            }),
        }
    }

    pub async fn delete_admin(&self, id: &str) -> Result<(), ClientError> {
        tracing::debug!(id = id, "DELETE administrador");
        let response = self
            .http
            .delete(self.url(&format!("/usuarios/administradores/{}", id)))
            .send()
            .await?;
        Self::check(response).await
    }

    pub async fn create_banner(&self, submission: &BannerSubmission) -> Result<(), ClientError> {
        let mut form = Form::new();
        for (name, value) in submission.text_fields() {
            form = form.text(name, value);
        }
        if let Some(file) = submission.file() {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.nombre.clone())
                .mime_str(&file.tipo)?;
            form = form.part("imagen_archivo", part);
        }

        tracing::debug!(archivo = submission.file().is_some(), "POST banner");
        let response = self.http.post(self.url("/banners")).multipart(form).send().await?;
        Self::check(response).await
    }
}

/// Quita al administrador de la lista antes de llamar al servidor y lo
/// devuelve a su posición si la llamada falla.
pub async fn remove_admin(
    list: &mut RemoteList<Administrador>,
    client: &BackofficeClient,
    id: &str,
) -> Notice {
    let notice = list
        .remove_with(&id.to_string(), |id| async move { client.delete_admin(&id).await })
        .await;
    tracing::info!(id = id, nivel = ?notice.level, "{}", notice.message);
    notice
}

/// Envía el formulario de banner. Si la validación local falla no se hace
/// ninguna llamada y los errores quedan en el formulario.
pub async fn submit_banner(
    form: &mut BannerForm,
    client: &BackofficeClient,
) -> Result<FormState, FormError> {
    let submission = form.submit()?;
    let outcome = client
        .create_banner(&submission)
        .await
        .map_err(ClientError::into_field_errors);
    Ok(form.complete(outcome))
}
