use std::sync::Arc;

use rooch_client::RoochClient;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};

use crate::config::Config;
use crate::storage::ImageStore;

/// Off-chain display attributes for an envelope or raffle box, keyed by the
/// object id.
pub mod envelope_attributes {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "envelope_attributes")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub envelope_id: String,
        /// `coin`, `nft` or `raffle`
        pub envelope_type: String,
        pub cover_image: Option<String>,
        pub cover_color: Option<String>,
        pub text_color: Option<String>,
        pub greeting: Option<String>,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub rooch: Arc<RoochClient>,
    pub images: ImageStore,
    /// Address of the envelope/raffle Move package
    pub package: Arc<str>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, rooch: RoochClient, images: ImageStore, package: &str) -> Self {
        AppState {
            db,
            rooch: Arc::new(rooch),
            images,
            package: Arc::from(package),
        }
    }

    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let db = Database::connect(&config.database_url).await?;
        ensure_schema(&db).await?;
        let images = ImageStore::open(&config.image_dir, config.max_upload_bytes).await?;
        Ok(AppState::new(
            db,
            RoochClient::new(config.rpc_url.clone()),
            images,
            &config.package,
        ))
    }
}

/// Create the attributes table when it does not exist yet.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut stmt = Schema::new(backend).create_table_from_entity(envelope_attributes::Entity);
    stmt.if_not_exists();
    db.execute(backend.build(&stmt)).await?;
    Ok(())
}
