//! Datos de ejemplo para las pantallas que no tienen persistencia.

use super::models::{Comentario, Factura, Pedido, Reserva};

fn pedido(id: u32, cliente: &str, vehiculo: &str, servicio: &str, fecha: &str, estado: &str) -> Pedido {
    Pedido {
        id,
        cliente: cliente.to_string(),
        vehiculo: vehiculo.to_string(),
        servicio: servicio.to_string(),
        fecha: fecha.to_string(),
        estado: estado.to_string(),
    }
}

fn reserva(id: u32, cliente: &str, vehiculo: &str, servicio: &str, fecha: &str, estado: &str) -> Reserva {
    Reserva {
        id,
        cliente: cliente.to_string(),
        vehiculo: vehiculo.to_string(),
        servicio: servicio.to_string(),
        fecha: fecha.to_string(),
        estado: estado.to_string(),
    }
}

pub fn pedidos() -> Vec<Pedido> {
    vec![
        pedido(1, "Carlos Ortega", "Yamaha MT-07 2021", "Cambio de aceite y filtro", "2024-05-02", "Pendiente"),
        pedido(2, "Elena Vidal", "Honda CB500F 2019", "Sustitución de pastillas de freno", "2024-05-03", "En reparación"),
        pedido(3, "Javier Molina", "Kawasaki Z900 2022", "Kit de arrastre completo", "2024-05-03", "Listo para recoger"),
        pedido(4, "Lucía Navarro", "Vespa GTS 300", "Revisión de los 10.000 km", "2024-04-28", "Cancelado"),
        pedido(5, "Andrés Peña", "BMW R 1250 GS", "Neumáticos delanteros y traseros", "2024-05-06", "Pendiente"),
        pedido(6, "Sofía Romero", "KTM Duke 390", "Diagnóstico eléctrico", "2024-05-01", "En reparación"),
        pedido(7, "Miguel Castro", "Suzuki V-Strom 650", "Cambio de batería", "2024-05-07", "Pendiente"),
        pedido(8, "Paula Herrera", "Ducati Monster 821", "Ajuste de válvulas", "2024-04-30", "Listo para recoger"),
    ]
}

pub fn reservas() -> Vec<Reserva> {
    vec![
        reserva(1, "Raúl Jiménez", "Triumph Street Triple", "Revisión general", "2024-05-10 09:00", "Pendiente"),
        reserva(2, "Marta Gil", "Honda PCX 125", "Cambio de correa", "2024-05-10 11:30", "Confirmada"),
        reserva(3, "Diego Serrano", "Yamaha Tracer 9", "Instalación de maletas", "2024-05-09 16:00", "En proceso"),
        reserva(4, "Irene Blanco", "Kawasaki Ninja 650", "Pre-ITV", "2024-05-08 10:00", "Completada"),
        reserva(5, "Hugo Rubio", "Piaggio MP3 400", "Revisión de frenos", "2024-05-11 12:00", "Cancelada"),
        reserva(6, "Nuria Campos", "BMW F 900 R", "Cambio de aceite", "2024-05-12 09:30", "Pendiente"),
        reserva(7, "Óscar León", "Royal Enfield Himalayan", "Ajuste de cadena", "2024-05-09 18:00", "Confirmada"),
    ]
}

pub fn facturas() -> Vec<Factura> {
    let factura = |id: u32, numero: &str, cliente: &str, monto: f64, emision: &str, pago: Option<&str>, metodo: &str, estado: &str| Factura {
        id,
        numero: numero.to_string(),
        cliente: cliente.to_string(),
        monto,
        fecha_emision: emision.to_string(),
        fecha_pago: pago.map(str::to_string),
        metodo_pago: metodo.to_string(),
        estado: estado.to_string(),
    };

    vec![
        factura(1, "F-2024-0101", "Carlos Ortega", 89.90, "2024-04-02", Some("2024-04-02"), "Tarjeta", "Pagada"),
        factura(2, "F-2024-0102", "Elena Vidal", 145.50, "2024-04-05", Some("2024-04-07"), "Transferencia", "Pagada"),
        factura(3, "F-2024-0103", "Javier Molina", 312.00, "2024-04-09", None, "Efectivo", "Anulada"),
        factura(4, "F-2024-0104", "Andrés Peña", 420.75, "2024-04-15", Some("2024-04-15"), "Tarjeta", "Pagada"),
        factura(5, "F-2024-0105", "Paula Herrera", 210.00, "2024-04-21", Some("2024-04-22"), "Bizum", "Pagada"),
        factura(6, "F-2024-0106", "Sofía Romero", 65.30, "2024-04-28", None, "Tarjeta", "Anulada"),
    ]
}

pub fn comentarios() -> Vec<Comentario> {
    let comentario = |id: u32, contenido: &str, sentimiento: &str, autor: &str, fecha: &str, aprobado: bool| Comentario {
        id,
        contenido: contenido.to_string(),
        sentimiento: sentimiento.to_string(),
        autor: autor.to_string(),
        fecha: fecha.to_string(),
        aprobado,
    };

    vec![
        comentario(1, "Atención rápida y precio justo en el cambio de neumáticos.", "positivo", "Andrés Peña", "2024-05-01", true),
        comentario(2, "Me entregaron la moto dos días más tarde de lo prometido.", "negativo", "Lucía Navarro", "2024-04-29", false),
        comentario(3, "Correcto, sin más.", "neutral", "Miguel Castro", "2024-05-03", false),
        comentario(4, "El diagnóstico fue muy claro, repetiré.", "positivo", "Sofía Romero", "2024-05-04", false),
        comentario(5, "Faltaban recambios en stock para mi modelo.", "negativo", "Hugo Rubio", "2024-05-05", true),
    ]
}
