//! # Mutaciones optimistas
//!
//! Para colecciones respaldadas por el servidor el cambio se aplica
//! primero en local y luego se confirma con la llamada remota. Si la
//! llamada falla, el cambio local se deshace y se genera un aviso de error.
//!
//! Un registro con una operación en curso no admite otra hasta que la
//! primera se resuelva.

use serde::Serialize;
use std::fmt;
use std::future::Future;
use thiserror::Error;

use super::{ListController, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
    Info,
}

/// Aviso transitorio para mostrar al usuario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationRejected {
    #[error("Registro '{0}' no encontrado")]
    NotFound(String),

    #[error("El registro '{0}' ya tiene una operación en curso")]
    InFlight(String),
}

impl From<MutationRejected> for Notice {
    fn from(rejected: MutationRejected) -> Self {
        match rejected {
            MutationRejected::NotFound(_) => Notice::error(rejected.to_string()),
            MutationRejected::InFlight(_) => Notice::info(rejected.to_string()),
        }
    }
}

enum Undo<T: Record> {
    /// `before` guarda los ids que precedían al registro, del más lejano
    /// al más cercano.
    Removed { before: Vec<T::Id>, record: T },
    Updated { previous: T },
}

/// Cambio local aplicado y pendiente de confirmación remota.
#[must_use = "una mutación pendiente debe resolverse con RemoteList::settle"]
pub struct PendingMutation<T: Record> {
    id: T::Id,
    undo: Undo<T>,
}

impl<T: Record> PendingMutation<T> {
    pub fn id(&self) -> &T::Id {
        &self.id
    }
}

/// Lista cuyas mutaciones se reflejan en una escritura remota.
pub struct RemoteList<T: Record> {
    list: ListController<T>,
    in_flight: Vec<T::Id>,
}

impl<T: Record> RemoteList<T> {
    pub fn new(list: ListController<T>) -> Self {
        Self {
            list,
            in_flight: Vec::new(),
        }
    }

    pub fn list(&self) -> &ListController<T> {
        &self.list
    }

    /// Acceso a búsqueda, filtro, orden y ventana.
    pub fn list_mut(&mut self) -> &mut ListController<T> {
        &mut self.list
    }

    /// Los controles de una fila con operación en curso deben deshabilitarse.
    pub fn is_pending(&self, id: &T::Id) -> bool {
        self.in_flight.contains(id)
    }

    fn check(&self, id: &T::Id) -> Result<usize, MutationRejected> {
        if self.is_pending(id) {
            return Err(MutationRejected::InFlight(id.to_string()));
        }
        self.list
            .position(id)
            .ok_or_else(|| MutationRejected::NotFound(id.to_string()))
    }

    /// Reinserta justo detrás del predecesor original más cercano que
    /// siga en la lista. Los intermedios ausentes tienen su propia
    /// eliminación pendiente y se recolocan igual al resolverse.
    fn restore(&mut self, before: &[T::Id], record: T) {
        let index = before
            .iter()
            .rev()
            .find_map(|id| self.list.position(id))
            .map_or(0, |position| position + 1);
        self.list.insert_at(index, record);
    }

    pub fn begin_remove(&mut self, id: &T::Id) -> Result<PendingMutation<T>, MutationRejected> {
        let index = self.check(id)?;
        let before = self.list.records()[..index]
            .iter()
            .map(|record| record.id().clone())
            .collect();
        let record = self.list.take_at(index);
        self.in_flight.push(id.clone());
        Ok(PendingMutation {
            id: id.clone(),
            undo: Undo::Removed { before, record },
        })
    }

    pub fn begin_update(
        &mut self,
        id: &T::Id,
        patch: T::Patch,
    ) -> Result<PendingMutation<T>, MutationRejected> {
        let index = self.check(id)?;
        let previous = self.list.records()[index].clone();
        self.list.update_record(id, patch);
        self.in_flight.push(id.clone());
        Ok(PendingMutation {
            id: id.clone(),
            undo: Undo::Updated { previous },
        })
    }

    /// Confirma o deshace el cambio según el resultado remoto.
    pub fn settle<E: fmt::Display>(&mut self, pending: PendingMutation<T>, outcome: Result<(), E>) -> Notice {
        let PendingMutation { id, undo } = pending;
        self.in_flight.retain(|pending_id| pending_id != &id);

        match (outcome, undo) {
            (Ok(()), Undo::Removed { .. }) => {
                tracing::info!(id = %id, "Eliminación confirmada");
                Notice::success(format!("Registro '{}' eliminado correctamente", id))
            }
            (Ok(()), Undo::Updated { .. }) => {
                tracing::info!(id = %id, "Actualización confirmada");
                Notice::success(format!("Registro '{}' actualizado correctamente", id))
            }
            (Err(e), Undo::Removed { before, record }) => {
                tracing::warn!(id = %id, error = %e, "Eliminación rechazada, restaurando registro");
                self.restore(&before, record);
                Notice::error(format!("No se pudo eliminar el registro '{}': {}", id, e))
            }
            (Err(e), Undo::Updated { previous }) => {
                tracing::warn!(id = %id, error = %e, "Actualización rechazada, restaurando registro");
                self.list.replace_by_id(previous);
                Notice::error(format!("No se pudo actualizar el registro '{}': {}", id, e))
            }
        }
    }

    /// Elimina en local, ejecuta `remote` y resuelve.
    pub async fn remove_with<F, Fut, E>(&mut self, id: &T::Id, remote: F) -> Notice
    where
        F: FnOnce(T::Id) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: fmt::Display,
    {
        let pending = match self.begin_remove(id) {
            Ok(pending) => pending,
            Err(rejected) => return rejected.into(),
        };
        let outcome = remote(id.clone()).await;
        self.settle(pending, outcome)
    }

    /// Parchea en local, ejecuta `remote` y resuelve.
    pub async fn update_with<F, Fut, E>(&mut self, id: &T::Id, patch: T::Patch, remote: F) -> Notice
    where
        F: FnOnce(T::Id) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: fmt::Display,
    {
        let pending = match self.begin_update(id, patch) {
            Ok(pending) => pending,
            Err(rejected) => return rejected.into(),
        };
        let outcome = remote(id.clone()).await;
        self.settle(pending, outcome)
    }
}
