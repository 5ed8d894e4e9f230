//! # Módulo API
//!
//! Rutas y controladores del back-office. Cada página responde con las
//! props `{ auth: { user }, <coleccion>: ... }` que consume el front-end.
//!
//! ## Módulos principales
//!
//! - [`dashboard`] - Resumen de actividad
//! - [`orders`] - Pedidos (listado y cambio de estado)
//! - [`reservations`] - Reservas (listado y cambio de estado)
//! - [`invoices`] - Historial de facturas
//! - [`admins`] - Administradores (listado y eliminación)
//! - [`comments`] - Moderación de comentarios
//! - [`banners`] - Alta y listado de banners
//! - [`errors`] - Manejo de errores de la aplicación

pub mod admins;
pub mod banners;
pub mod comments;
pub mod dashboard;
pub mod errors;
pub mod invoices;
pub mod middleware;
pub mod orders;
pub mod props;
pub mod reservations;
mod status;

// Re-exportar tipos comunes para facilitar su uso
pub use errors::{AppError, AppResult, ErrorResponse, ResultExt};

use actix_web::web;

/// Configura todas las rutas de la API
///
/// ## Rutas configuradas
///
/// - `/dashboard` - Ver [`dashboard::routes`]
/// - `/pedidos/*` - Ver [`orders::routes`]
/// - `/reservas/*` - Ver [`reservations::routes`]
/// - `/facturas` - Ver [`invoices::routes`]
/// - `/usuarios/administradores/*` - Ver [`admins::routes`]
/// - `/comentarios/*` - Ver [`comments::routes`]
/// - `/banners` - Ver [`banners::routes`]
///
/// # Ejemplo
///
/// ```no_run
/// use actix_web::{web, App};
/// use motoparts_backoffice::api;
///
/// let app = App::new()
///     .configure(api::init_routes);
/// ```
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    dashboard::routes(cfg);
    orders::routes(cfg);
    reservations::routes(cfg);
    invoices::routes(cfg);
    admins::routes(cfg);
    comments::routes(cfg);
    banners::routes(cfg);
}
