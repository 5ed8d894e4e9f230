use crate::config::{AppConfig, ListSettings, UploadSettings};
use crate::db::{seed, Comentario, Factura, Pedido, RecordStore, Reserva};

/// Estado compartido entre workers: colecciones en memoria y ajustes.
#[derive(Clone)]
pub struct AppState {
    pub pedidos: RecordStore<Pedido>,
    pub reservas: RecordStore<Reserva>,
    pub facturas: RecordStore<Factura>,
    pub comentarios: RecordStore<Comentario>,
    pub lists: ListSettings,
    pub uploads: UploadSettings,
}

impl AppState {
    /// Estado inicial con los datos de ejemplo.
    pub fn seeded(config: &AppConfig) -> Self {
        Self {
            pedidos: RecordStore::new(seed::pedidos()),
            reservas: RecordStore::new(seed::reservas()),
            facturas: RecordStore::new(seed::facturas()),
            comentarios: RecordStore::new(seed::comentarios()),
            lists: config.lists,
            uploads: config.uploads.clone(),
        }
    }
}
