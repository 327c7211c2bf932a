use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

use crate::models::{
    Consultation, Influencer, User, CONSULTATIONS_COLLECTION, INFLUENCERS_COLLECTION,
    USERS_COLLECTION,
};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, mongodb::error::Error> {
        let mut client_options = ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        // Timeouts
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));
        client_options.app_name = Some("connecto-backend".to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.run_command(doc! { "ping": 1 }).await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Unique emails per account type, lookup indexes for consultation owners.
    async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        log::info!("🔧 Creating database indexes...");

        let unique = IndexOptions::builder().unique(true).build();

        let users = self.collection::<Document>(USERS_COLLECTION);
        let users_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(unique.clone())
            .build();
        match users.create_index(users_email).await {
            Ok(_) => log::info!("   ✅ Index created: users(email, unique)"),
            Err(e) => log::warn!("   ⚠️  Could not create users(email) index: {}", e),
        }

        let influencers = self.collection::<Document>(INFLUENCERS_COLLECTION);
        let influencers_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(unique)
            .build();
        match influencers.create_index(influencers_email).await {
            Ok(_) => log::info!("   ✅ Index created: influencers(email, unique)"),
            Err(e) => log::warn!("   ⚠️  Could not create influencers(email) index: {}", e),
        }

        let consultations = self.collection::<Document>(CONSULTATIONS_COLLECTION);
        for field in ["infId", "userId"] {
            let index = IndexModel::builder().keys(doc! { field: 1 }).build();
            match consultations.create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: consultations({})", field),
                Err(e) => log::warn!("   ⚠️  Could not create consultations({}) index: {}", field, e),
            }
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn users(&self) -> Collection<User> {
        self.collection(USERS_COLLECTION)
    }

    pub fn influencers(&self) -> Collection<Influencer> {
        self.collection(INFLUENCERS_COLLECTION)
    }

    pub fn consultations(&self) -> Collection<Consultation> {
        self.collection(CONSULTATIONS_COLLECTION)
    }

    pub async fn ping(&self) -> bool {
        self.db.run_command(doc! { "ping": 1 }).await.is_ok()
    }
}

/// Parses a hex id from a request, naming the field in the error.
pub fn parse_object_id(raw: &str, what: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(raw.trim()).map_err(|_| AppError::validation(format!("Invalid {} ID", what)))
}
