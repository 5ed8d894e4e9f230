//! Almacén en memoria para las colecciones sin persistencia remota.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::listview::{remove_in, update_in, Record};

#[derive(Debug, Clone)]
pub struct RecordStore<T> {
    records: Arc<RwLock<Vec<T>>>,
}

impl<T: Record> RecordStore<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Copia de la colección completa, en su orden original.
    pub async fn snapshot(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Aplica el parche y devuelve el registro resultante, o `None` si el id no existe.
    pub async fn update(&self, id: &T::Id, patch: T::Patch) -> Option<T> {
        let mut records = self.records.write().await;
        if !update_in(&mut records, id, patch) {
            return None;
        }
        records.iter().find(|record| record.id() == id).cloned()
    }

    pub async fn remove(&self, id: &T::Id) -> Option<T> {
        let mut records = self.records.write().await;
        remove_in(&mut records, id).map(|(_, record)| record)
    }
}
