//! Registros de dominio que viajan en las props de cada pantalla.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;

use crate::badge::BadgeDomain;
use crate::config::ListSettings;
use crate::listview::{parse_timestamp, ListConfig, Listable, Record};

/// Parche de estado para pedidos y reservas
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EstadoPatch {
    pub estado: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pedido {
    pub id: u32,
    pub cliente: String,
    pub vehiculo: String,
    pub servicio: String,
    pub fecha: String,
    /// "Pendiente", "En reparación", "Listo para recoger", "Cancelado"
    pub estado: String,
}

impl Record for Pedido {
    type Id = u32;
    type Patch = EstadoPatch;

    fn id(&self) -> &u32 {
        &self.id
    }

    fn apply(&mut self, patch: EstadoPatch) {
        self.estado = patch.estado;
    }
}

impl Listable for Pedido {
    const KEY: &'static str = "pedidos";
    const BADGE: BadgeDomain = BadgeDomain::Pedido;

    fn list_config(settings: ListSettings) -> ListConfig<Self> {
        ListConfig::<Self>::new(settings)
            .search(|p: &Pedido| p.cliente.as_str())
            .search(|p: &Pedido| p.vehiculo.as_str())
            .search(|p: &Pedido| p.servicio.as_str())
            .status(|p: &Pedido| p.estado.as_str())
            .sort_by(|p: &Pedido| parse_timestamp(&p.fecha))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserva {
    pub id: u32,
    pub cliente: String,
    pub vehiculo: String,
    pub servicio: String,
    pub fecha: String,
    /// "Pendiente", "Confirmada", "En proceso", "Completada", "Cancelada"
    pub estado: String,
}

impl Record for Reserva {
    type Id = u32;
    type Patch = EstadoPatch;

    fn id(&self) -> &u32 {
        &self.id
    }

    fn apply(&mut self, patch: EstadoPatch) {
        self.estado = patch.estado;
    }
}

impl Listable for Reserva {
    const KEY: &'static str = "reservas";
    const BADGE: BadgeDomain = BadgeDomain::Reserva;

    fn list_config(settings: ListSettings) -> ListConfig<Self> {
        ListConfig::<Self>::new(settings)
            .search(|r: &Reserva| r.cliente.as_str())
            .search(|r: &Reserva| r.vehiculo.as_str())
            .search(|r: &Reserva| r.servicio.as_str())
            .status(|r: &Reserva| r.estado.as_str())
            .sort_by(|r: &Reserva| parse_timestamp(&r.fecha))
    }
}

/// Factura emitida. Solo lectura en este nivel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factura {
    pub id: u32,
    pub numero: String,
    pub cliente: String,
    pub monto: f64,
    pub fecha_emision: String,
    pub fecha_pago: Option<String>,
    pub metodo_pago: String,
    /// "Pagada" o "Anulada"
    pub estado: String,
}

impl Record for Factura {
    type Id = u32;
    type Patch = Infallible;

    fn id(&self) -> &u32 {
        &self.id
    }

    fn apply(&mut self, patch: Infallible) {
        match patch {}
    }
}

impl Listable for Factura {
    const KEY: &'static str = "facturas";
    const BADGE: BadgeDomain = BadgeDomain::Factura;

    fn list_config(settings: ListSettings) -> ListConfig<Self> {
        ListConfig::<Self>::new(settings)
            .search(|f: &Factura| f.numero.as_str())
            .search(|f: &Factura| f.cliente.as_str())
            .search(|f: &Factura| f.metodo_pago.as_str())
            .status(|f: &Factura| f.estado.as_str())
            .sort_by(|f: &Factura| parse_timestamp(&f.fecha_emision))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AdminPatch {
    pub estado: Option<String>,
    pub telefono: Option<String>,
}

/// Usuario con rol de administrador. El id es el ObjectId en hexadecimal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Administrador {
    pub id: String,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
    /// "activo" o "inactivo"
    pub estado: String,
}

impl Record for Administrador {
    type Id = String;
    type Patch = AdminPatch;

    fn id(&self) -> &String {
        &self.id
    }

    fn apply(&mut self, patch: AdminPatch) {
        if let Some(estado) = patch.estado {
            self.estado = estado;
        }
        if let Some(telefono) = patch.telefono {
            self.telefono = telefono;
        }
    }
}

impl Listable for Administrador {
    const KEY: &'static str = "administradores";
    const BADGE: BadgeDomain = BadgeDomain::Administrador;

    fn list_config(settings: ListSettings) -> ListConfig<Self> {
        ListConfig::<Self>::new(settings)
            .search(|a: &Administrador| a.nombre.as_str())
            .search(|a: &Administrador| a.apellido.as_str())
            .search(|a: &Administrador| a.email.as_str())
            .search(|a: &Administrador| a.telefono.as_str())
            .status(|a: &Administrador| a.estado.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ComentarioPatch {
    pub aprobado: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comentario {
    pub id: u32,
    pub contenido: String,
    /// "positivo", "negativo" o "neutral"
    pub sentimiento: String,
    pub autor: String,
    pub fecha: String,
    pub aprobado: bool,
}

impl Record for Comentario {
    type Id = u32;
    type Patch = ComentarioPatch;

    fn id(&self) -> &u32 {
        &self.id
    }

    fn apply(&mut self, patch: ComentarioPatch) {
        if let Some(aprobado) = patch.aprobado {
            self.aprobado = aprobado;
        }
    }
}

impl Listable for Comentario {
    const KEY: &'static str = "comentarios";
    const BADGE: BadgeDomain = BadgeDomain::Comentario;

    fn list_config(settings: ListSettings) -> ListConfig<Self> {
        ListConfig::<Self>::new(settings)
            .search(|c: &Comentario| c.contenido.as_str())
            .search(|c: &Comentario| c.autor.as_str())
            .status(|c: &Comentario| c.sentimiento.as_str())
            .sort_by(|c: &Comentario| parse_timestamp(&c.fecha))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listview::{ListController, StatusFilter};

    #[test]
    fn admin_patch_merges_only_present_fields() {
        let mut admin = Administrador {
            id: "65f0c0ffee".to_string(),
            nombre: "Laura".to_string(),
            apellido: "Méndez".to_string(),
            email: "laura@motoparts.es".to_string(),
            telefono: "600111222".to_string(),
            estado: "activo".to_string(),
        };
        admin.apply(AdminPatch {
            estado: Some("inactivo".to_string()),
            telefono: None,
        });
        assert_eq!(admin.estado, "inactivo");
        assert_eq!(admin.telefono, "600111222");
    }

    #[test]
    fn pedidos_search_vehicle_and_filter_status() {
        let pedidos = vec![
            Pedido {
                id: 1,
                cliente: "Carlos".to_string(),
                vehiculo: "Yamaha MT-07".to_string(),
                servicio: "Cambio de aceite".to_string(),
                fecha: "2024-05-02".to_string(),
                estado: "Pendiente".to_string(),
            },
            Pedido {
                id: 2,
                cliente: "Elena".to_string(),
                vehiculo: "Honda CB500F".to_string(),
                servicio: "Frenos".to_string(),
                fecha: "2024-05-03".to_string(),
                estado: "Cancelado".to_string(),
            },
        ];
        let mut list = ListController::for_listable(pedidos, ListSettings::default());
        list.set_search_term("honda");
        assert_eq!(list.visible().len(), 1);

        list.set_search_term("");
        list.set_status_filter(StatusFilter::parse("Pendiente"));
        let visible: Vec<u32> = list.visible().iter().map(|p| p.id).collect();
        assert_eq!(visible, vec![1]);
    }

    #[test]
    fn comentario_patch_approves() {
        let mut c = Comentario {
            id: 7,
            contenido: "Muy buen servicio".to_string(),
            sentimiento: "positivo".to_string(),
            autor: "Jorge".to_string(),
            fecha: "2024-04-01".to_string(),
            aprobado: false,
        };
        c.apply(ComentarioPatch { aprobado: Some(true) });
        assert!(c.aprobado);
    }
}
