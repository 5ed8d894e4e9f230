// src/db/mod.rs
pub mod models;
pub mod mongodb;
pub mod seed;
pub mod store;

pub use self::mongodb::{BannerDoc, MongoRepo, Usuario};
pub use models::{Administrador, Comentario, Factura, Pedido, Reserva};
pub use store::RecordStore;
