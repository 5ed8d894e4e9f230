//! # MotoParts Back-office Server
//!
//! Servidor del panel de administración construido con Rust, Actix Web y MongoDB.
//!
//! ## Configuración
//!
//! El servidor se configura mediante variables de entorno (archivo `.env`):
//!
//! ```env
//! MONGODB_URI=mongodb://localhost:27017
//! MONGODB_DATABASE=motoparts_backoffice
//! BIND_ADDRESS=0.0.0.0:8080
//! UPLOAD_DIR=./uploads
//! MAX_UPLOAD_BYTES=5242880
//! LIST_PAGE_SIZE=6
//! LIST_LOAD_MORE_STEP=3
//! RUST_LOG=motoparts_backoffice=debug,mongodb=info
//! ```
//!
//! ## Arquitectura
//!
//! ```text
//! Panel (props JSON)
//!     ↓ HTTP/JSON, multipart
//! API REST (Actix Web)
//!     ↓ MongoDB Driver          ↓ RwLock
//! usuarios, banners          pedidos, reservas, facturas, comentarios
//! ```

use actix_files::Files;
use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use motoparts_backoffice::api;
use motoparts_backoffice::config::AppConfig;
use motoparts_backoffice::db::MongoRepo;
use motoparts_backoffice::state::AppState;

const DEFAULT_DIRECTIVES: [&str; 2] = ["motoparts_backoffice=debug", "mongodb=info"];

fn env_filter() -> EnvFilter {
    DEFAULT_DIRECTIVES
        .iter()
        .filter_map(|directive| directive.parse::<Directive>().ok())
        .fold(EnvFilter::from_default_env(), |filter, directive| {
            filter.add_directive(directive)
        })
}

/// Función principal que inicia el servidor web
///
/// 1. Carga variables de entorno desde `.env`
/// 2. Configura el logging con tracing
/// 3. Conecta con MongoDB, crea índices y siembra administradores
/// 4. Prepara el directorio de subidas y las colecciones en memoria
/// 5. Arranca el servidor HTTP
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt().with_env_filter(env_filter()).init();

    let config = AppConfig::from_env();
    tracing::info!(database = %config.mongodb_database, "Iniciando MotoParts Back-office");

    let mongo_repo = match MongoRepo::init(&config).await {
        Ok(repo) => {
            tracing::info!("Conexión a MongoDB establecida exitosamente");

            if let Err(e) = repo.create_indexes().await {
                tracing::warn!("Advertencia creando índices: {}", e);
            }
            if let Err(e) = repo.seed_admins().await {
                tracing::warn!("Advertencia sembrando administradores: {}", e);
            }

            repo
        }
        Err(e) => {
            tracing::error!("Error conectando a MongoDB: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Error de MongoDB: {}", e),
            ));
        }
    };

    tokio::fs::create_dir_all(&config.uploads.dir).await?;

    let state = web::Data::new(AppState::seeded(&config));
    let repo = web::Data::new(mongo_repo);
    let uploads_dir = config.uploads.dir.clone();

    tracing::info!("Servidor iniciando en {}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(repo.clone())
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(api::init_routes)
            .service(Files::new("/uploads", uploads_dir.clone()))
            .route(
                "/",
                web::get().to(|| async {
                    actix_web::HttpResponse::Found()
                        .append_header(("Location", "/dashboard"))
                        .finish()
                }),
            )
    })
    .bind(&config.bind_address)?
    .run()
    .await
}
