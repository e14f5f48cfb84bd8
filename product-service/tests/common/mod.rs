#![allow(dead_code)]

use product_service::config::{MongoConfig, ProductConfig, StoreBackend};
use product_service::services::{InMemoryProductStore, MongoProductStore, ProductStore};
use product_service::startup::Application;
use secrecy::Secret;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
    pub mongo: Option<MongoProductStore>,
}

fn test_config(store: StoreBackend, mongo_uri: String, database: String) -> ProductConfig {
    ProductConfig {
        common: CoreConfig {
            port: 0, // Random port
            ..CoreConfig::default()
        },
        mongodb: MongoConfig {
            uri: Secret::new(mongo_uri),
            database: Some(database),
        },
        store,
    }
}

impl TestApp {
    /// Spawn the service on a random port backed by the in-memory store.
    pub async fn spawn() -> Self {
        let config = test_config(
            StoreBackend::Memory,
            "mongodb://localhost:27017".to_string(),
            "unused".to_string(),
        );
        let store: Arc<dyn ProductStore> = Arc::new(InMemoryProductStore::new());

        Self::launch(config, store, None).await
    }

    /// Spawn the service against a throwaway MongoDB database.
    pub async fn spawn_with_mongo() -> Self {
        let uri = std::env::var("TEST_MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let database = format!("product_test_{}", mongodb::bson::oid::ObjectId::new().to_hex());
        let config = test_config(StoreBackend::Mongodb, uri.clone(), database.clone());

        let mongo = MongoProductStore::connect(&uri, Some(&database))
            .await
            .expect("Failed to connect to MongoDB");
        mongo
            .initialize_indexes()
            .await
            .expect("Failed to create indexes");
        let store: Arc<dyn ProductStore> = Arc::new(mongo.clone());

        Self::launch(config, store, Some(mongo)).await
    }

    async fn launch(
        config: ProductConfig,
        store: Arc<dyn ProductStore>,
        mongo: Option<MongoProductStore>,
    ) -> Self {
        let app = Application::build_with_store(config, store)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
            mongo,
        }
    }

    pub fn products_url(&self) -> String {
        format!("{}/api/products", self.address)
    }

    pub fn product_url(&self, id: &str) -> String {
        format!("{}/api/products/{}", self.address, id)
    }

    pub async fn create_product(&self, body: Value) -> reqwest::Response {
        self.client
            .post(self.products_url())
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_product(&self, id: &str) -> reqwest::Response {
        self.client
            .get(self.product_url(id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn update_product(&self, id: &str, body: Value) -> reqwest::Response {
        self.client
            .put(self.product_url(id))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete_product(&self, id: &str) -> reqwest::Response {
        self.client
            .delete(self.product_url(id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn list_products(&self) -> Value {
        self.client
            .get(self.products_url())
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse JSON")
    }

    /// Create a product and return its `_id`.
    pub async fn seed_product(&self, name: &str, price: f64, category: &str) -> String {
        let response = self
            .create_product(serde_json::json!({
                "name": name,
                "price": price,
                "category": category,
            }))
            .await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["product"]["_id"]
            .as_str()
            .expect("product id missing")
            .to_string()
    }

    /// Drop the test database when running against MongoDB.
    pub async fn cleanup(&self) {
        if let Some(mongo) = &self.mongo {
            mongo
                .database()
                .drop(None)
                .await
                .expect("Failed to drop test database");
        }
    }
}
