//! # Utilidades de logging para errores
//!
//! Registra la cadena completa de un error (`source()` tras `source()`)
//! antes de convertirlo en [`AppError`](super::AppError).

use std::error::Error as StdError;

/// Recorre la cadena de errores y la registra en un único evento.
pub fn log_error_chain<E>(error: &E, context: Option<&str>)
where
    E: StdError + 'static,
{
    let chain = error_chain(error);

    if let Some(ctx) = context {
        tracing::error!(
            context = %ctx,
            error_chain = ?chain,
            "Error with full chain (with context)"
        );
    } else {
        tracing::error!(error_chain = ?chain, "Error with full chain");
    }
}

pub fn error_chain(error: &(dyn StdError + 'static)) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);

    while let Some(err) = current {
        chain.push(err.to_string());
        current = err.source();
    }

    chain
}

/// Extension trait para Results que registra la cadena de errores
///
/// # Ejemplo de uso
/// ```rust,ignore
/// repo.usuarios()
///     .find_one(filter)
///     .await
///     .log_error_context("buscando administrador")
///     .map_err(|e| AppError::database("find_admin", e))?;
/// ```
pub trait ErrorLogExt<T, E> {
    fn log_error_context(self, context: &str) -> Result<T, E>;
}

impl<T, E> ErrorLogExt<T, E> for Result<T, E>
where
    E: StdError + 'static,
{
    fn log_error_context(self, context: &str) -> Result<T, E> {
        if let Err(ref error) = self {
            log_error_chain(error, Some(context));
        }
        self
    }
}
