//! # MotoParts Back-office
//!
//! Panel de administración de un taller de motos: pedidos, reservas,
//! facturas, administradores, comentarios y banners.
//!
//! - [`listview`] - Controlador genérico de listas (filtro, búsqueda, orden, paginado)
//! - [`badge`] - Traducción de estados a insignias
//! - [`banner`] - Formulario de alta de banners
//! - [`api`] - Servidor HTTP (Actix Web)
//! - [`client`] - Escrituras remotas del panel

pub mod api;
pub mod badge;
pub mod banner;
pub mod client;
pub mod config;
pub mod db;
pub mod listview;
pub mod state;
