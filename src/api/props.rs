//! # Props de página
//!
//! Cada pantalla recibe `{ auth: { user }, <entidad>: ListPage }`. La
//! página de listado es la derivación del [`ListController`] con los
//! parámetros de la query, más la insignia de estado de cada registro.

use actix_web::{HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{AppError, AppResult};
use crate::badge::{self, Badge};
use crate::config::ListSettings;
use crate::listview::{ListController, Listable, SortOrder, StatusFilter};

pub const EMPTY_COLLECTION: &str = "No hay registros para mostrar";
pub const EMPTY_SEARCH: &str = "Ningún registro coincide con los filtros aplicados";

const USER_NAME_HEADER: &str = "x-usuario-nombre";
const USER_EMAIL_HEADER: &str = "x-usuario-email";

/// Parámetros de consulta comunes a todos los listados
///
/// `GET /pedidos?q=honda&estado=Pendiente&orden=asc&limite=9`
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Término de búsqueda libre
    pub q: Option<String>,
    /// Valor exacto del estado, o `all`
    pub estado: Option<String>,
    /// `asc` o `desc` (por defecto `desc`)
    pub orden: Option<String>,
    /// Tamaño de la ventana visible deseado
    pub limite: Option<usize>,
}

impl ListQuery {
    pub fn apply<T: Listable>(&self, list: &mut ListController<T>) -> AppResult<()> {
        if let Some(q) = &self.q {
            list.set_search_term(q.as_str());
        }
        if let Some(estado) = &self.estado {
            list.set_status_filter(StatusFilter::parse(estado));
        }
        if let Some(orden) = &self.orden {
            let wanted = SortOrder::parse(orden)
                .ok_or_else(|| AppError::validation_field("orden", "Use 'asc' o 'desc'"))?;
            if list.state().order != wanted {
                list.toggle_sort_order();
            }
        }
        if let Some(limite) = self.limite {
            while list.state().limit < limite && list.load_more() {}
        }
        Ok(())
    }
}

/// Usuario de la sesión tal como lo reenvía la pasarela de autenticación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub nombre: String,
    pub email: Option<String>,
}

impl SessionUser {
    pub fn from_request(req: &HttpRequest) -> Self {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|value| std::str::from_utf8(value.as_bytes()).ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        Self {
            nombre: header(USER_NAME_HEADER).unwrap_or_else(|| "Invitado".to_string()),
            email: header(USER_EMAIL_HEADER),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BadgedRecord<'a, T> {
    #[serde(flatten)]
    pub registro: &'a T,
    pub badge: Badge,
}

#[derive(Debug, Serialize)]
pub struct ListPage<'a, T> {
    pub registros: Vec<BadgedRecord<'a, T>>,
    pub total: usize,
    pub coincidencias: usize,
    pub visibles: usize,
    pub hay_mas: bool,
    pub siguiente_limite: Option<usize>,
    pub busqueda: &'a str,
    pub estado: &'a str,
    pub orden: SortOrder,
    pub vacio: Option<&'static str>,
}

impl<'a, T: Listable> ListPage<'a, T> {
    pub fn from_controller(list: &'a ListController<T>) -> Self {
        let view = list.view();
        let state = list.state();
        let status_field = list.config().status_field;

        let registros: Vec<BadgedRecord<'a, T>> = view
            .visible
            .iter()
            .map(|record| BadgedRecord {
                registro: *record,
                badge: badge::badge(T::BADGE, status_field.map(|field| field(*record)).unwrap_or("")),
            })
            .collect();

        let vacio = match (list.records().is_empty(), view.matched) {
            (true, _) => Some(EMPTY_COLLECTION),
            (false, 0) => Some(EMPTY_SEARCH),
            _ => None,
        };
        let hay_mas = view.has_more();

        Self {
            visibles: registros.len(),
            registros,
            total: list.records().len(),
            coincidencias: view.matched,
            hay_mas,
            siguiente_limite: hay_mas.then(|| state.limit + list.config().load_more_step),
            busqueda: &state.search,
            estado: state.status.as_str(),
            orden: state.order,
            vacio,
        }
    }
}

/// `{ "auth": { "user": ... }, key: value }`
pub fn page_props<V: Serialize>(user: &SessionUser, key: &str, value: V) -> AppResult<Value> {
    let mut props = json!({ "auth": { "user": user } });
    props[key] = serde_json::to_value(value)
        .map_err(|e| AppError::internal_trace(&format!("Error serializando props: {}", e), None))?;
    Ok(props)
}

/// Respuesta completa de una pantalla de listado.
pub fn list_response<T>(
    req: &HttpRequest,
    records: Vec<T>,
    settings: ListSettings,
    query: &ListQuery,
) -> AppResult<HttpResponse>
where
    T: Listable + Serialize,
{
    let mut list = ListController::for_listable(records, settings);
    query.apply(&mut list)?;

    let page = ListPage::from_controller(&list);
    tracing::debug!(
        entidad = T::KEY,
        total = page.total,
        coincidencias = page.coincidencias,
        visibles = page.visibles,
        "Listado derivado"
    );

    let props = page_props(&SessionUser::from_request(req), T::KEY, page)?;
    Ok(HttpResponse::Ok().json(props))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{seed, Pedido};
    use actix_web::test::TestRequest;

    fn settings() -> ListSettings {
        ListSettings {
            page_size: 3,
            load_more_step: 3,
        }
    }

    #[test]
    fn query_limit_grows_in_load_more_steps() {
        let mut list = ListController::for_listable(seed::pedidos(), settings());
        let query = ListQuery {
            limite: Some(5),
            ..ListQuery::default()
        };
        query.apply(&mut list).unwrap();
        assert_eq!(list.state().limit, 6);
        assert_eq!(list.visible().len(), 6);
    }

    #[test]
    fn invalid_order_is_a_validation_error() {
        let mut list = ListController::for_listable(seed::pedidos(), settings());
        let query = ListQuery {
            orden: Some("aleatorio".to_string()),
            ..ListQuery::default()
        };
        assert!(matches!(
            query.apply(&mut list),
            Err(AppError::ValidationWithField { .. })
        ));
    }

    #[test]
    fn page_reports_empty_state() {
        let mut list = ListController::for_listable(seed::pedidos(), settings());
        list.set_search_term("no existe ninguna moto así");
        let page = ListPage::from_controller(&list);
        assert_eq!(page.vacio, Some(EMPTY_SEARCH));
        assert!(page.registros.is_empty());
        assert!(!page.hay_mas);

        let empty: ListController<Pedido> = ListController::for_listable(Vec::new(), settings());
        assert_eq!(ListPage::from_controller(&empty).vacio, Some(EMPTY_COLLECTION));
    }

    #[test]
    fn page_rows_carry_badges_and_record_fields() {
        let list = ListController::for_listable(seed::pedidos(), settings());
        let page = ListPage::from_controller(&list);
        let json = serde_json::to_value(&page).unwrap();

        let first = &json["registros"][0];
        assert!(first["cliente"].is_string());
        assert!(first["badge"]["category"].is_string());
        assert_eq!(json["siguiente_limite"], 6);
        assert_eq!(json["orden"], "desc");
        assert_eq!(json["estado"], "all");
    }

    #[test]
    fn session_user_from_headers() {
        let req = TestRequest::default()
            .insert_header(("X-Usuario-Nombre", "Laura Méndez"))
            .insert_header(("X-Usuario-Email", "laura@motoparts.es"))
            .to_http_request();
        let user = SessionUser::from_request(&req);
        assert_eq!(user.nombre, "Laura Méndez");
        assert_eq!(user.email.as_deref(), Some("laura@motoparts.es"));

        let anon = SessionUser::from_request(&TestRequest::default().to_http_request());
        assert_eq!(anon.nombre, "Invitado");
        assert!(anon.email.is_none());
    }
}
