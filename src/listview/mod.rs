//! # Controlador de listas
//!
//! Todas las pantallas de listado (pedidos, reservas, facturas,
//! administradores, comentarios) comparten la misma derivación:
//!
//! ```text
//! colección → filtro (búsqueda + estado) → orden por fecha → ventana visible
//! ```
//!
//! La configuración ([`ListConfig`]) describe qué campos participan en la
//! búsqueda, cuál es el campo de estado y cuál el de fecha. El estado de la
//! vista ([`ViewState`]) guarda término, filtro, orden y tamaño de la
//! ventana; [`derive`] es una función pura de ambos y de la colección.

pub mod optimistic;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::badge::BadgeDomain;
use crate::config::ListSettings;

pub use optimistic::{MutationRejected, Notice, NoticeLevel, PendingMutation, RemoteList};

/// Registro identificable que admite parches parciales.
pub trait Record: Clone {
    type Id: PartialEq + Clone + fmt::Display + fmt::Debug;
    type Patch;

    fn id(&self) -> &Self::Id;

    /// Aplica el parche sobre el registro (`{...registro, ...parche}`).
    fn apply(&mut self, patch: Self::Patch);
}

/// Registro que tiene una pantalla de listado propia.
pub trait Listable: Record {
    /// Clave bajo la que viaja la colección en las props de la página
    const KEY: &'static str;
    const BADGE: BadgeDomain;

    fn list_config(settings: ListSettings) -> ListConfig<Self>;
}

pub type TextField<T> = fn(&T) -> &str;
pub type DateField<T> = fn(&T) -> Option<NaiveDateTime>;

pub struct ListConfig<T> {
    pub search_fields: Vec<TextField<T>>,
    pub status_field: Option<TextField<T>>,
    pub sort_field: Option<DateField<T>>,
    pub page_size: usize,
    pub load_more_step: usize,
}

impl<T> Clone for ListConfig<T> {
    fn clone(&self) -> Self {
        Self {
            search_fields: self.search_fields.clone(),
            status_field: self.status_field,
            sort_field: self.sort_field,
            page_size: self.page_size,
            load_more_step: self.load_more_step,
        }
    }
}

impl<T> ListConfig<T> {
    pub fn new(settings: ListSettings) -> Self {
        Self {
            search_fields: Vec::new(),
            status_field: None,
            sort_field: None,
            page_size: settings.page_size.max(1),
            load_more_step: settings.load_more_step.max(1),
        }
    }

    pub fn search(mut self, field: TextField<T>) -> Self {
        self.search_fields.push(field);
        self
    }

    pub fn status(mut self, field: TextField<T>) -> Self {
        self.status_field = Some(field);
        self
    }

    pub fn sort_by(mut self, field: DateField<T>) -> Self {
        self.sort_field = Some(field);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(String),
}

impl StatusFilter {
    /// `"all"`, `"todos"` o vacío equivalen a no filtrar.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "" | "all" | "todos" => Self::All,
            _ => Self::Only(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Only(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search: String,
    pub status: StatusFilter,
    pub order: SortOrder,
    pub limit: usize,
}

impl ViewState {
    pub fn initial(page_size: usize) -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            order: SortOrder::default(),
            limit: page_size,
        }
    }
}

/// Resultado de una derivación: registros visibles y cuántos pasaron el filtro.
#[derive(Debug)]
pub struct Derived<'a, T> {
    pub visible: Vec<&'a T>,
    pub matched: usize,
}

impl<T> Derived<'_, T> {
    pub fn has_more(&self) -> bool {
        self.visible.len() < self.matched
    }
}

/// Acepta `YYYY-MM-DD`, `YYYY-MM-DD HH:MM`, `YYYY-MM-DDTHH:MM:SS` y RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn matches<T>(record: &T, config: &ListConfig<T>, state: &ViewState) -> bool {
    if let (StatusFilter::Only(wanted), Some(status)) = (&state.status, config.status_field) {
        if status(record) != wanted.as_str() {
            return false;
        }
    }

    let needle = state.search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let haystack = config
        .search_fields
        .iter()
        .map(|field| field(record))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    haystack.contains(&needle)
}

/// Los registros sin fecha válida quedan al final en ambos sentidos.
fn compare_dates(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.cmp(&b),
            SortOrder::Desc => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// `ventana(orden(filtro(colección)))`
pub fn derive<'a, T>(records: &'a [T], config: &ListConfig<T>, state: &ViewState) -> Derived<'a, T> {
    let mut filtered: Vec<&T> = records
        .iter()
        .filter(|record| matches(*record, config, state))
        .collect();

    if let Some(sort_field) = config.sort_field {
        // sort_by es estable: los empates conservan el orden de entrada
        filtered.sort_by(|a, b| compare_dates(sort_field(*a), sort_field(*b), state.order));
    }

    let matched = filtered.len();
    filtered.truncate(state.limit);

    Derived {
        visible: filtered,
        matched,
    }
}

pub(crate) fn position_of<T: Record>(records: &[T], id: &T::Id) -> Option<usize> {
    records.iter().position(|record| record.id() == id)
}

/// Reemplaza el registro con `id` por su versión parcheada.
/// Devuelve `false` si no existe.
pub fn update_in<T: Record>(records: &mut [T], id: &T::Id, patch: T::Patch) -> bool {
    match records.iter_mut().find(|record| record.id() == id) {
        Some(record) => {
            record.apply(patch);
            true
        }
        None => false,
    }
}

/// Quita el registro con `id`, devolviendo su posición original.
pub fn remove_in<T: Record>(records: &mut Vec<T>, id: &T::Id) -> Option<(usize, T)> {
    let index = position_of(records, id)?;
    Some((index, records.remove(index)))
}

/// Estado de una pantalla de listado: colección + configuración + vista.
#[derive(Clone)]
pub struct ListController<T: Record> {
    records: Vec<T>,
    config: ListConfig<T>,
    state: ViewState,
}

impl<T: Record> ListController<T> {
    pub fn new(records: Vec<T>, config: ListConfig<T>) -> Self {
        let state = ViewState::initial(config.page_size);
        Self {
            records,
            config,
            state,
        }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn config(&self) -> &ListConfig<T> {
        &self.config
    }

    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Sustituye la colección completa (nuevas props del servidor).
    pub fn replace_records(&mut self, records: Vec<T>) {
        self.records = records;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search = term.into();
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.state.status = filter;
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.state.order = order;
    }

    pub fn toggle_sort_order(&mut self) {
        self.state.order = self.state.order.toggled();
    }

    /// Amplía la ventana. Devuelve `false` si ya no quedaba nada por mostrar.
    pub fn load_more(&mut self) -> bool {
        if self.state.limit >= self.matched_count() {
            return false;
        }
        self.state.limit = self.state.limit.saturating_add(self.config.load_more_step);
        true
    }

    pub fn view(&self) -> Derived<'_, T> {
        derive(&self.records, &self.config, &self.state)
    }

    pub fn visible(&self) -> Vec<&T> {
        self.view().visible
    }

    pub fn matched_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| matches(*record, &self.config, &self.state))
            .count()
    }

    pub fn has_more(&self) -> bool {
        self.view().has_more()
    }

    pub fn update_record(&mut self, id: &T::Id, patch: T::Patch) -> bool {
        update_in(&mut self.records, id, patch)
    }

    pub fn remove_record(&mut self, id: &T::Id) -> Option<T> {
        remove_in(&mut self.records, id).map(|(_, record)| record)
    }

    pub(crate) fn position(&self, id: &T::Id) -> Option<usize> {
        position_of(&self.records, id)
    }

    pub(crate) fn take_at(&mut self, index: usize) -> T {
        self.records.remove(index)
    }

    pub(crate) fn insert_at(&mut self, index: usize, record: T) {
        let index = index.min(self.records.len());
        self.records.insert(index, record);
    }

    pub(crate) fn replace_by_id(&mut self, record: T) -> bool {
        match self.position(record.id()) {
            Some(index) => {
                self.records[index] = record;
                true
            }
            None => false,
        }
    }
}

impl<T: Listable> ListController<T> {
    pub fn for_listable(records: Vec<T>, settings: ListSettings) -> Self {
        Self::new(records, T::list_config(settings))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct Fila {
        pub id: u32,
        pub nombre: String,
        pub estado: String,
        pub fecha: String,
    }

    impl Record for Fila {
        type Id = u32;
        type Patch = String;

        fn id(&self) -> &u32 {
            &self.id
        }

        fn apply(&mut self, estado: String) {
            self.estado = estado;
        }
    }

    pub(crate) fn fila(id: u32, nombre: &str, estado: &str, fecha: &str) -> Fila {
        Fila {
            id,
            nombre: nombre.to_string(),
            estado: estado.to_string(),
            fecha: fecha.to_string(),
        }
    }

    pub(crate) fn config(page_size: usize) -> ListConfig<Fila> {
        ListConfig::<Fila>::new(ListSettings {
            page_size,
            load_more_step: 3,
        })
        .search(|f: &Fila| f.nombre.as_str())
        .search(|f: &Fila| f.estado.as_str())
        .status(|f: &Fila| f.estado.as_str())
        .sort_by(|f: &Fila| parse_timestamp(&f.fecha))
    }

    fn ids(list: &ListController<Fila>) -> Vec<u32> {
        list.visible().iter().map(|f| f.id).collect()
    }

    fn muestra() -> Vec<Fila> {
        vec![
            fila(1, "Ana Torres", "Pendiente", "2024-03-01"),
            fila(2, "Luis Gómez", "Cancelado", "2024-03-05"),
            fila(3, "Marta Ruiz", "Pendiente", "2024-03-05"),
            fila(4, "Pedro Sanz", "En reparación", "2024-02-20"),
            fila(5, "ana belén", "Listo para recoger", "2024-03-10"),
        ]
    }

    #[test]
    fn status_filter_keeps_only_matching() {
        let mut list = ListController::new(
            vec![
                fila(1, "a", "Pendiente", "2024-01-01"),
                fila(2, "b", "Cancelado", "2024-01-02"),
            ],
            config(10),
        );
        list.set_status_filter(StatusFilter::parse("Pendiente"));
        assert_eq!(ids(&list), vec![1]);

        list.set_status_filter(StatusFilter::parse("all"));
        assert_eq!(list.visible().len(), 2);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let mut list = ListController::new(muestra(), config(10));
        list.set_search_term("ANA");
        let mut found = ids(&list);
        found.sort_unstable();
        assert_eq!(found, vec![1, 5]);

        list.set_search_term("reparación");
        assert_eq!(ids(&list), vec![4]);

        list.set_search_term("   ");
        assert_eq!(list.visible().len(), 5);
    }

    #[test]
    fn filtered_view_never_contains_non_matching() {
        let mut list = ListController::new(muestra(), config(2));
        list.set_search_term("a");
        list.set_status_filter(StatusFilter::Only("Pendiente".to_string()));
        while list.load_more() {}
        for record in list.visible() {
            assert_eq!(record.estado, "Pendiente");
            assert!(record.nombre.to_lowercase().contains('a'));
        }
    }

    #[test]
    fn date_sort_is_stable_for_ties() {
        let mut list = ListController::new(muestra(), config(10));
        // 2 y 3 comparten fecha: mantienen su orden relativo en ambos sentidos
        assert_eq!(ids(&list), vec![5, 2, 3, 1, 4]);
        list.toggle_sort_order();
        assert_eq!(list.state().order, SortOrder::Asc);
        assert_eq!(ids(&list), vec![4, 1, 2, 3, 5]);
    }

    #[test]
    fn unparseable_dates_go_last() {
        let records = vec![
            fila(1, "x", "Pendiente", "sin fecha"),
            fila(2, "y", "Pendiente", "2024-01-01"),
        ];
        let mut list = ListController::new(records, config(10));
        assert_eq!(ids(&list), vec![2, 1]);
        list.toggle_sort_order();
        assert_eq!(ids(&list), vec![2, 1]);
    }

    #[test]
    fn load_more_is_monotonic_and_bounded() {
        let mut list = ListController::new(muestra(), config(2));
        let mut previous = list.visible().len();
        assert_eq!(previous, 2);
        assert!(list.has_more());

        for _ in 0..5 {
            list.load_more();
            let now = list.visible().len();
            assert!(now >= previous);
            assert!(now <= list.matched_count());
            previous = now;
        }
        assert_eq!(previous, 5);
        assert!(!list.has_more());
        assert!(!list.load_more());
    }

    #[test]
    fn update_record_touches_exactly_one() {
        let mut list = ListController::new(muestra(), config(10));
        let before = list.records().to_vec();

        assert!(list.update_record(&3, "Cancelado".to_string()));
        let changed = list
            .records()
            .iter()
            .zip(before.iter())
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(changed, 1);
        assert_eq!(list.get(&3).map(|f| f.estado.as_str()), Some("Cancelado"));

        assert!(!list.update_record(&99, "Cancelado".to_string()));
        assert_eq!(list.records().len(), before.len());
    }

    #[test]
    fn remove_record_drops_only_the_match() {
        let mut list = ListController::new(muestra(), config(10));
        let removed = list.remove_record(&2);
        assert_eq!(removed.map(|f| f.id), Some(2));
        assert!(list.get(&2).is_none());
        assert_eq!(list.records().len(), 4);
        assert!(list.remove_record(&2).is_none());
    }

    #[test]
    fn derive_is_pure() {
        let records = muestra();
        let cfg = config(3);
        let state = ViewState::initial(3);
        let a: Vec<u32> = derive(&records, &cfg, &state).visible.iter().map(|f| f.id).collect();
        let b: Vec<u32> = derive(&records, &cfg, &state).visible.iter().map(|f| f.id).collect();
        assert_eq!(a, b);
        assert_eq!(records, muestra());
    }

    #[test]
    fn parses_common_date_formats() {
        assert!(parse_timestamp("2024-03-01").is_some());
        assert!(parse_timestamp("2024-03-01 10:30").is_some());
        assert!(parse_timestamp("2024-03-01T10:30:00").is_some());
        assert!(parse_timestamp("2024-03-01T10:30:00Z").is_some());
        assert!(parse_timestamp("01/03/2024").is_none());
    }
}
