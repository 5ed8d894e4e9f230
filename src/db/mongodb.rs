use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

use super::models::Administrador;
use crate::api::middleware::ErrorLogExt;
use crate::api::AppError;
use crate::config::AppConfig;

pub type Result<T> = std::result::Result<T, AppError>;

pub const ROL_ADMIN: &str = "admin";
pub const ROL_CLIENTE: &str = "cliente";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Usuario {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
    pub estado: String,
    pub rol: String,
    pub created_at: i64, // timestamp unix
    pub updated_at: i64, // timestamp unix
}

impl TryFrom<Usuario> for Administrador {
    type Error = AppError;

    fn try_from(usuario: Usuario) -> Result<Self> {
        let id = usuario
            .id
            .ok_or_else(|| AppError::Internal("Usuario sin _id".to_string()))?;
        Ok(Administrador {
            id: id.to_hex(),
            nombre: usuario.nombre,
            apellido: usuario.apellido,
            email: usuario.email,
            telefono: usuario.telefono,
            estado: usuario.estado,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BannerDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub titulo: Option<String>,
    pub subtitulo: Option<String>,
    pub imagen_url: String,
    /// "url" o "archivo"
    pub origen_imagen: String,
    pub fecha_inicio: Option<String>,
    pub fecha_fin: Option<String>,
    pub activo: bool,
    pub created_at: i64, // timestamp unix
}

#[derive(Debug, Clone)]
pub struct MongoRepo {
    pub client: Client,
    pub database: Database,
}

impl MongoRepo {
    pub async fn init(config: &AppConfig) -> Result<MongoRepo> {
        let client = Client::with_uri_str(&config.mongodb_uri)
            .await
            .map_err(|e| AppError::Internal(format!("Error conectando a MongoDB: {}", e)))?;

        let database = client.database(&config.mongodb_database);

        // Test connection
        database
            .run_command(doc! {"ping": 1})
            .await
            .map_err(|e| AppError::Internal(format!("Error validando conexión MongoDB: {}", e)))?;

        tracing::info!(database = %config.mongodb_database, "Conexión a MongoDB establecida exitosamente");

        Ok(MongoRepo { client, database })
    }

    pub fn usuarios(&self) -> Collection<Usuario> {
        self.database.collection("usuarios")
    }

    pub fn banners(&self) -> Collection<BannerDoc> {
        self.database.collection("banners")
    }

    pub async fn create_indexes(&self) -> Result<()> {
        use mongodb::{options::IndexOptions, IndexModel};

        let usuario_indexes = vec![
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder().keys(doc! { "rol": 1 }).build(),
        ];

        self.usuarios()
            .create_indexes(usuario_indexes)
            .await
            .map_err(|e| AppError::Internal(format!("Error creando índices usuarios: {}", e)))?;

        let banner_indexes = vec![
            IndexModel::builder().keys(doc! { "activo": 1 }).build(),
            IndexModel::builder().keys(doc! { "created_at": -1 }).build(),
        ];

        self.banners()
            .create_indexes(banner_indexes)
            .await
            .map_err(|e| AppError::Internal(format!("Error creando índices banners: {}", e)))?;

        tracing::info!("Índices MongoDB creados exitosamente");
        Ok(())
    }

    /// Crea administradores de ejemplo si la colección no tiene ninguno.
    pub async fn seed_admins(&self) -> Result<()> {
        let usuarios = self.usuarios();
        let existing = usuarios
            .count_documents(doc! { "rol": ROL_ADMIN })
            .await
            .log_error_context("counting admins")
            .map_err(|e| AppError::database("count_admins", e))?;

        if existing > 0 {
            return Ok(());
        }

        let now = Self::current_timestamp();
        let admin = |nombre: &str, apellido: &str, email: &str, telefono: &str, estado: &str| Usuario {
            id: None,
            nombre: nombre.to_string(),
            apellido: apellido.to_string(),
            email: email.to_string(),
            telefono: telefono.to_string(),
            estado: estado.to_string(),
            rol: ROL_ADMIN.to_string(),
            created_at: now,
            updated_at: now,
        };

        usuarios
            .insert_many(vec![
                admin("Laura", "Méndez", "laura.mendez@motoparts.es", "600111222", "activo"),
                admin("Sergio", "Prieto", "sergio.prieto@motoparts.es", "600333444", "activo"),
                admin("Carmen", "Ibáñez", "carmen.ibanez@motoparts.es", "600555666", "inactivo"),
            ])
            .await
            .log_error_context("seeding admins")
            .map_err(|e| AppError::database("seed_admins", e))?;

        tracing::info!("Administradores de ejemplo creados");
        Ok(())
    }

    pub async fn list_admins(&self) -> Result<Vec<Administrador>> {
        let mut cursor = self
            .usuarios()
            .find(doc! { "rol": ROL_ADMIN })
            .await
            .log_error_context("listing admins")
            .map_err(|e| AppError::database("list_admins", e))?;

        let mut results = Vec::new();
        while cursor
            .advance()
            .await
            .map_err(|e| AppError::Internal(format!("Error iterando cursor: {}", e)))?
        {
            let usuario = cursor
                .deserialize_current()
                .map_err(|e| AppError::Internal(format!("Error deserializando usuario: {}", e)))?;
            results.push(Administrador::try_from(usuario)?);
        }

        Ok(results)
    }

    /// Quita el rol de administrador. Devuelve `false` si no había tal administrador.
    pub async fn demote_admin(&self, id: ObjectId) -> Result<bool> {
        let result = self
            .usuarios()
            .update_one(
                doc! { "_id": id, "rol": ROL_ADMIN },
                doc! {
                    "$set": {
                        "rol": ROL_CLIENTE,
                        "updated_at": Self::current_timestamp()
                    }
                },
            )
            .await
            .log_error_context("demoting admin")
            .map_err(|e| AppError::database("demote_admin", e))?;

        Ok(result.matched_count > 0)
    }

    pub async fn insert_banner(&self, banner: BannerDoc) -> Result<ObjectId> {
        let result = self
            .banners()
            .insert_one(banner)
            .await
            .log_error_context("inserting banner")
            .map_err(|e| AppError::database("insert_banner", e))?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::Internal("Id de banner inesperado".to_string()))
    }

    pub async fn list_banners(&self) -> Result<Vec<BannerDoc>> {
        let mut cursor = self
            .banners()
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await
            .log_error_context("listing banners")
            .map_err(|e| AppError::database("list_banners", e))?;

        let mut results = Vec::new();
        while cursor
            .advance()
            .await
            .map_err(|e| AppError::Internal(format!("Error iterando cursor: {}", e)))?
        {
            results.push(
                cursor
                    .deserialize_current()
                    .map_err(|e| AppError::Internal(format!("Error deserializando banner: {}", e)))?,
            );
        }

        Ok(results)
    }

    // Función auxiliar para obtener timestamp actual
    pub fn current_timestamp() -> i64 {
        chrono::Utc::now().timestamp()
    }
}
