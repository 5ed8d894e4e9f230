//! # Formulario de banners
//!
//! Máquina de estados del alta de banners:
//!
//! ```text
//! Editing ──submit()──▶ Submitting ──complete(Ok)──▶ Success ──▶ Editing (campos vacíos)
//!                             │
//!                             └──complete(Err)──▶ Failed ──▶ Editing (errores por campo)
//! ```
//!
//! `Success` y `Failed` son el resultado que devuelve [`BannerForm::complete`];
//! el formulario vuelve siempre a `Editing` y conserva el resultado en
//! [`BannerForm::last_outcome`] para mostrar el aviso.
//!
//! La imagen puede venir de una URL o de un archivo local, nunca de ambos:
//! cambiar de origen descarta el otro. La misma validación se usa en el
//! cliente antes de enviar y en el servidor al recibir el multipart.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const MAX_TITLE_CHARS: usize = 120;
pub const GENERAL_ERROR_FIELD: &str = "general";

/// Errores de validación indexados por nombre de campo del formulario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn general(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(GENERAL_ERROR_FIELD, message);
        errors
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub nombre: String,
    pub tipo: String,
    pub bytes: Vec<u8>,
}

/// Formatos de imagen admitidos. Solo mapas de bits: las imágenes se
/// sirven desde el mismo origen que el panel.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/gif", "image/webp"];

impl ImageFile {
    /// Tipo MIME según la firma de los primeros bytes.
    pub fn sniffed_type(&self) -> Option<&'static str> {
        let bytes = self.bytes.as_slice();
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some("image/png")
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some("image/jpeg")
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some("image/gif")
        } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            Some("image/webp")
        } else {
            None
        }
    }

    /// Extensión a usar al guardar el archivo, derivada del tipo MIME.
    pub fn extension(&self) -> &'static str {
        match self.tipo.as_str() {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "jpg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Url(String),
    File(ImageFile),
}

/// Campos de texto editables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerField {
    Titulo,
    Subtitulo,
    FechaInicio,
    FechaFin,
}

impl BannerField {
    pub fn name(self) -> &'static str {
        match self {
            Self::Titulo => "titulo",
            Self::Subtitulo => "subtitulo",
            Self::FechaInicio => "fecha_inicio",
            Self::FechaFin => "fecha_fin",
        }
    }
}

/// Contenido del formulario tal como lo escribe el usuario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerDraft {
    pub titulo: String,
    pub subtitulo: String,
    pub use_url: bool,
    pub url: String,
    pub file: Option<ImageFile>,
    pub fecha_inicio: String,
    pub fecha_fin: String,
    pub activo: bool,
}

impl Default for BannerDraft {
    fn default() -> Self {
        Self {
            titulo: String::new(),
            subtitulo: String::new(),
            use_url: true,
            url: String::new(),
            file: None,
            fecha_inicio: String::new(),
            fecha_fin: String::new(),
            activo: true,
        }
    }
}

/// Banner validado, listo para serializarse como multipart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerSubmission {
    pub titulo: Option<String>,
    pub subtitulo: Option<String>,
    pub imagen: ImageSource,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
    pub activo: bool,
}

impl BannerSubmission {
    /// Campos de texto del multipart. El archivo, si lo hay, va aparte
    /// bajo `imagen_archivo`.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(titulo) = &self.titulo {
            fields.push(("titulo", titulo.clone()));
        }
        if let Some(subtitulo) = &self.subtitulo {
            fields.push(("subtitulo", subtitulo.clone()));
        }
        if let ImageSource::Url(url) = &self.imagen {
            fields.push(("imagen_principal", url.clone()));
        }
        if let Some(inicio) = self.fecha_inicio {
            fields.push(("fecha_inicio", inicio.format("%Y-%m-%d").to_string()));
        }
        if let Some(fin) = self.fecha_fin {
            fields.push(("fecha_fin", fin.format("%Y-%m-%d").to_string()));
        }
        fields.push(("activo", if self.activo { "1" } else { "0" }.to_string()));
        fields
    }

    pub fn file(&self) -> Option<&ImageFile> {
        match &self.imagen {
            ImageSource::File(file) => Some(file),
            ImageSource::Url(_) => None,
        }
    }
}

fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_date(raw: &str, field: &str, errors: &mut FieldErrors) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.insert(field, "Formato de fecha inválido, use YYYY-MM-DD");
            None
        }
    }
}

impl BannerDraft {
    pub fn validate(&self) -> Result<BannerSubmission, FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.titulo.chars().count() > MAX_TITLE_CHARS {
            errors.insert("titulo", format!("Máximo {} caracteres", MAX_TITLE_CHARS));
        }
        if self.subtitulo.chars().count() > MAX_TITLE_CHARS {
            errors.insert("subtitulo", format!("Máximo {} caracteres", MAX_TITLE_CHARS));
        }

        let imagen = if self.use_url {
            let url = self.url.trim();
            if url.is_empty() {
                errors.insert("imagen_principal", "La URL de la imagen es requerida");
                None
            } else if !(url.starts_with("http://") || url.starts_with("https://")) {
                errors.insert("imagen_principal", "La URL debe comenzar con http:// o https://");
                None
            } else {
                Some(ImageSource::Url(url.to_string()))
            }
        } else {
            match &self.file {
                None => {
                    errors.insert("imagen_archivo", "Seleccione un archivo de imagen");
                    None
                }
                Some(file) if !file.tipo.starts_with("image/") => {
                    errors.insert("imagen_archivo", "El archivo debe ser una imagen");
                    None
                }
                Some(file) if file.bytes.is_empty() => {
                    errors.insert("imagen_archivo", "El archivo está vacío");
                    None
                }
                Some(file) if !ALLOWED_IMAGE_TYPES.contains(&file.tipo.as_str()) => {
                    errors.insert("imagen_archivo", "Formato no admitido, use PNG, JPEG, GIF o WebP");
                    None
                }
                Some(file) if file.sniffed_type() != Some(file.tipo.as_str()) => {
                    errors.insert("imagen_archivo", format!("El contenido no es una imagen {}", file.tipo));
                    None
                }
                Some(file) => Some(ImageSource::File(file.clone())),
            }
        };

        let fecha_inicio = parse_date(&self.fecha_inicio, "fecha_inicio", &mut errors);
        let fecha_fin = parse_date(&self.fecha_fin, "fecha_fin", &mut errors);
        if let (Some(inicio), Some(fin)) = (fecha_inicio, fecha_fin) {
            if fin < inicio {
                errors.insert("fecha_fin", "La fecha de fin no puede ser anterior a la de inicio");
            }
        }

        match imagen {
            Some(imagen) if errors.is_empty() => Ok(BannerSubmission {
                titulo: optional_text(&self.titulo),
                subtitulo: optional_text(&self.subtitulo),
                imagen,
                fecha_inicio,
                fecha_fin,
                activo: self.activo,
            }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormState {
    Editing,
    Submitting,
    Success,
    Failed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("El formulario se está enviando")]
    Processing,

    #[error("El formulario tiene {} error(es) de validación", .0.len())]
    Invalid(FieldErrors),
}

#[derive(Debug, Clone)]
pub struct BannerForm {
    draft: BannerDraft,
    state: FormState,
    errors: FieldErrors,
    last_outcome: Option<FormState>,
}

impl Default for BannerForm {
    fn default() -> Self {
        Self::new()
    }
}

impl BannerForm {
    pub fn new() -> Self {
        Self {
            draft: BannerDraft::default(),
            state: FormState::Editing,
            errors: FieldErrors::new(),
            last_outcome: None,
        }
    }

    pub fn draft(&self) -> &BannerDraft {
        &self.draft
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Resultado del último envío resuelto, hasta la siguiente edición.
    pub fn last_outcome(&self) -> Option<FormState> {
        self.last_outcome
    }

    /// Mientras se envía, los controles deben estar deshabilitados.
    pub fn is_processing(&self) -> bool {
        self.state == FormState::Submitting
    }

    fn begin_edit(&mut self, field: &str) -> Result<(), FormError> {
        if self.is_processing() {
            return Err(FormError::Processing);
        }
        self.state = FormState::Editing;
        self.last_outcome = None;
        self.errors.remove(field);
        self.errors.remove(GENERAL_ERROR_FIELD);
        Ok(())
    }

    pub fn set_text(&mut self, field: BannerField, value: impl Into<String>) -> Result<(), FormError> {
        self.begin_edit(field.name())?;
        let value = value.into();
        match field {
            BannerField::Titulo => self.draft.titulo = value,
            BannerField::Subtitulo => self.draft.subtitulo = value,
            BannerField::FechaInicio => self.draft.fecha_inicio = value,
            BannerField::FechaFin => self.draft.fecha_fin = value,
        }
        Ok(())
    }

    pub fn set_activo(&mut self, activo: bool) -> Result<(), FormError> {
        self.begin_edit("activo")?;
        self.draft.activo = activo;
        Ok(())
    }

    /// Cambia el origen de la imagen descartando el valor del otro origen.
    pub fn set_use_url(&mut self, use_url: bool) -> Result<(), FormError> {
        self.begin_edit("imagen_principal")?;
        self.errors.remove("imagen_archivo");
        if self.draft.use_url != use_url {
            self.draft.use_url = use_url;
            self.draft.url.clear();
            self.draft.file = None;
        }
        Ok(())
    }

    pub fn set_url(&mut self, url: impl Into<String>) -> Result<(), FormError> {
        self.set_use_url(true)?;
        self.draft.url = url.into();
        Ok(())
    }

    pub fn set_file(&mut self, file: ImageFile) -> Result<(), FormError> {
        self.set_use_url(false)?;
        self.draft.file = Some(file);
        Ok(())
    }

    /// Valida y pasa a `Submitting`. Si hay errores el formulario sigue en
    /// edición con los errores por campo y no debe hacerse ninguna llamada.
    pub fn submit(&mut self) -> Result<BannerSubmission, FormError> {
        if self.is_processing() {
            return Err(FormError::Processing);
        }
        match self.draft.validate() {
            Ok(submission) => {
                self.errors = FieldErrors::new();
                self.state = FormState::Submitting;
                Ok(submission)
            }
            Err(errors) => {
                tracing::debug!(errores = errors.len(), "Banner no válido, envío bloqueado");
                self.errors = errors.clone();
                self.state = FormState::Editing;
                Err(FormError::Invalid(errors))
            }
        }
    }

    /// Resuelve el envío en curso y devuelve `Success` o `Failed`. El
    /// formulario queda de nuevo en `Editing`. Sin envío en curso no hace
    /// nada y devuelve el estado actual.
    pub fn complete(&mut self, outcome: Result<(), FieldErrors>) -> FormState {
        if !self.is_processing() {
            tracing::debug!(estado = ?self.state, "complete() sin envío en curso, ignorado");
            return self.state;
        }

        let resolved = match outcome {
            Ok(()) => {
                self.draft = BannerDraft::default();
                self.errors = FieldErrors::new();
                FormState::Success
            }
            Err(errors) => {
                self.errors = if errors.is_empty() {
                    FieldErrors::general("No se pudo crear el banner")
                } else {
                    errors
                };
                FormState::Failed
            }
        };
        self.state = FormState::Editing;
        self.last_outcome = Some(resolved);
        resolved
    }

    pub fn can_submit(&self) -> bool {
        !self.is_processing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> ImageFile {
        ImageFile {
            nombre: "oferta.png".to_string(),
            tipo: "image/png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00],
        }
    }

    #[test]
    fn file_mode_without_file_blocks_submission() {
        let mut form = BannerForm::new();
        form.set_use_url(false).unwrap();

        let result = form.submit();
        match result {
            Err(FormError::Invalid(errors)) => {
                assert!(errors.get("imagen_archivo").is_some());
            }
            other => panic!("se esperaba error de validación, llegó {:?}", other),
        }
        assert_eq!(form.state(), FormState::Editing);
        assert!(!form.is_processing());
    }

    #[test]
    fn switching_source_discards_the_other() {
        let mut form = BannerForm::new();
        form.set_url("https://cdn.motoparts.es/banner.jpg").unwrap();
        form.set_file(png()).unwrap();
        assert!(form.draft().url.is_empty());
        assert!(!form.draft().use_url);

        form.set_use_url(true).unwrap();
        assert!(form.draft().file.is_none());
    }

    #[test]
    fn end_date_cannot_precede_start() {
        let mut form = BannerForm::new();
        form.set_url("https://cdn.motoparts.es/banner.jpg").unwrap();
        form.set_text(BannerField::FechaInicio, "2024-06-10").unwrap();
        form.set_text(BannerField::FechaFin, "2024-06-01").unwrap();

        let Err(FormError::Invalid(errors)) = form.submit() else {
            panic!("la fecha de fin anterior debería rechazarse");
        };
        assert!(errors.get("fecha_fin").is_some());
        assert_eq!(form.errors(), &errors);

        form.set_text(BannerField::FechaFin, "2024-06-10").unwrap();
        assert!(form.errors().get("fecha_fin").is_none());
        assert!(form.submit().is_ok());
    }

    #[test]
    fn invalid_url_and_non_image_file_are_rejected() {
        let mut draft = BannerDraft {
            url: "ftp://servidor/banner.jpg".to_string(),
            ..BannerDraft::default()
        };
        assert!(draft.validate().unwrap_err().get("imagen_principal").is_some());

        draft.use_url = false;
        draft.file = Some(ImageFile {
            nombre: "notas.txt".to_string(),
            tipo: "text/plain".to_string(),
            bytes: b"hola".to_vec(),
        });
        assert!(draft.validate().unwrap_err().get("imagen_archivo").is_some());
    }

    #[test]
    fn success_resets_and_failure_keeps_data() {
        let mut form = BannerForm::new();
        form.set_text(BannerField::Titulo, "Rebajas de verano").unwrap();
        form.set_file(png()).unwrap();

        let submission = form.submit().unwrap();
        assert!(form.is_processing());
        assert_eq!(form.set_activo(false), Err(FormError::Processing));
        assert_eq!(form.submit().err(), Some(FormError::Processing));
        assert_eq!(submission.file().map(|f| f.nombre.as_str()), Some("oferta.png"));

        let mut errors = FieldErrors::new();
        errors.insert("titulo", "Ya existe un banner con ese título");
        assert_eq!(form.complete(Err(errors)), FormState::Failed);
        assert_eq!(form.state(), FormState::Editing);
        assert_eq!(form.last_outcome(), Some(FormState::Failed));
        assert_eq!(form.draft().titulo, "Rebajas de verano");
        assert!(form.errors().get("titulo").is_some());
        assert!(form.can_submit());

        form.submit().unwrap();
        assert_eq!(form.complete(Ok(())), FormState::Success);
        assert_eq!(form.state(), FormState::Editing);
        assert_eq!(form.last_outcome(), Some(FormState::Success));
        assert_eq!(form.draft(), &BannerDraft::default());
        assert!(form.errors().is_empty());

        form.set_text(BannerField::Titulo, "Otro").unwrap();
        assert_eq!(form.last_outcome(), None);
    }

    #[test]
    fn complete_without_submission_is_ignored() {
        let mut form = BannerForm::new();
        form.set_text(BannerField::Titulo, "Borrador").unwrap();

        assert_eq!(form.complete(Ok(())), FormState::Editing);
        assert_eq!(form.draft().titulo, "Borrador");
        assert_eq!(form.last_outcome(), None);

        assert_eq!(form.complete(Err(FieldErrors::general("x"))), FormState::Editing);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn only_raster_images_with_matching_content_are_accepted() {
        let mut draft = BannerDraft {
            use_url: false,
            file: Some(ImageFile {
                nombre: "logo.svg".to_string(),
                tipo: "image/svg+xml".to_string(),
                bytes: br#"<svg xmlns="http://www.w3.org/2000/svg"><script>alert(1)</script></svg>"#.to_vec(),
            }),
            ..BannerDraft::default()
        };
        assert!(draft.validate().unwrap_err().get("imagen_archivo").is_some());

        // SVG declarado como PNG
        if let Some(file) = draft.file.as_mut() {
            file.tipo = "image/png".to_string();
        }
        assert!(draft.validate().unwrap_err().get("imagen_archivo").is_some());

        draft.file = Some(png());
        let submission = draft.validate().unwrap();
        assert_eq!(submission.file().map(|f| f.extension()), Some("png"));
    }

    #[test]
    fn sniffs_common_signatures() {
        let image = |bytes: &[u8]| ImageFile {
            nombre: "x".to_string(),
            tipo: String::new(),
            bytes: bytes.to_vec(),
        };
        assert_eq!(image(&[0xFF, 0xD8, 0xFF, 0xE0]).sniffed_type(), Some("image/jpeg"));
        assert_eq!(image(b"GIF89a....").sniffed_type(), Some("image/gif"));
        assert_eq!(image(b"RIFF\x10\0\0\0WEBPVP8 ").sniffed_type(), Some("image/webp"));
        assert_eq!(image(b"<?xml version").sniffed_type(), None);
    }

    #[test]
    fn text_fields_follow_form_names() {
        let draft = BannerDraft {
            titulo: "  Nueva tienda ".to_string(),
            url: "https://cdn.motoparts.es/tienda.jpg".to_string(),
            fecha_inicio: "2024-07-01".to_string(),
            activo: false,
            ..BannerDraft::default()
        };
        let fields = draft.validate().unwrap().text_fields();
        assert_eq!(
            fields,
            vec![
                ("titulo", "Nueva tienda".to_string()),
                ("imagen_principal", "https://cdn.motoparts.es/tienda.jpg".to_string()),
                ("fecha_inicio", "2024-07-01".to_string()),
                ("activo", "0".to_string()),
            ]
        );
    }

    #[test]
    fn empty_failure_gets_general_message() {
        let mut form = BannerForm::new();
        form.set_url("https://cdn.motoparts.es/a.jpg").unwrap();
        form.submit().unwrap();
        form.complete(Err(FieldErrors::new()));
        assert!(form.errors().get(GENERAL_ERROR_FIELD).is_some());
    }
}
