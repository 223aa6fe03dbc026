use log::info;
use mongodb::bson::doc;
use mongodb::{Client, options::ClientOptions};

use crate::config::AppConfig;
use crate::database::mongo::MongoStore;
use crate::database::store::StoreError;

/// Owns the MongoDB client for the lifetime of the process.
pub struct Database {
    client: Client,
    name: String,
}

impl Database {
    pub async fn init(config: &AppConfig) -> Result<Self, StoreError> {
        let mut client_options = ClientOptions::parse(&config.mongodb_uri).await?;
        client_options.app_name = Some("social_media_api".to_string());

        let client = Client::with_options(client_options)?;

        // Ping the server to see if you can connect to the cluster
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("Connected successfully to MongoDB");

        Ok(Self {
            client,
            name: config.database_name.clone(),
        })
    }

    pub fn store(&self) -> MongoStore {
        MongoStore::new(&self.client.database(&self.name))
    }

    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("MongoDB connection closed");
    }
}
