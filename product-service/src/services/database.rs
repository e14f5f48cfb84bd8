use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime as BsonDateTime},
    options::{
        ClientOptions, FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument,
    },
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

use crate::models::{NewProduct, Product, ProductChanges, PRODUCTS_COLLECTION};
use crate::services::ProductStore;

pub const DEFAULT_DATABASE: &str = "productDB";

#[derive(Clone)]
pub struct MongoProductStore {
    client: MongoClient,
    db: Database,
}

impl MongoProductStore {
    /// Connects using `uri`. The database is `database` when given, otherwise
    /// the one named in the connection string, otherwise `productDB`.
    pub async fn connect(uri: &str, database: Option<&str>) -> Result<Self, AppError> {
        let mut client_options = ClientOptions::parse(uri).await.map_err(|e| {
            tracing::error!("Failed to parse MongoDB connection string: {}", e);
            AppError::from(e)
        })?;
        client_options.app_name = Some("product-service".to_string());

        let db_name = database
            .map(str::to_string)
            .or_else(|| client_options.default_database.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = MongoClient::with_options(client_options).map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(&db_name);
        tracing::info!(database = %db_name, "Connected to MongoDB database");

        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for product-service");

        let category_index = IndexModel::builder()
            .keys(doc! { "category": 1 })
            .options(
                IndexOptions::builder()
                    .name("category_idx".to_string())
                    .build(),
            )
            .build();

        let created_index = IndexModel::builder()
            .keys(doc! { "createdAt": 1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_idx".to_string())
                    .build(),
            )
            .build();

        self.products()
            .create_indexes([category_index, created_index], None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create indexes on products collection: {}", e);
                AppError::from(e)
            })?;

        tracing::info!("Created indexes on products.(category, createdAt)");
        Ok(())
    }

    pub fn products(&self) -> Collection<Product> {
        self.db.collection(PRODUCTS_COLLECTION)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    async fn insert(&self, input: NewProduct) -> Result<Product, AppError> {
        let product = Product::new(input);
        self.products().insert_one(&product, None).await?;
        Ok(product)
    }

    async fn find_all(&self) -> Result<Vec<Product>, AppError> {
        // ObjectIds grow with insertion time.
        let options = FindOptions::builder().sort(doc! { "_id": 1 }).build();
        let cursor = self.products().find(doc! {}, options).await?;
        let products: Vec<Product> = cursor.try_collect().await?;
        Ok(products)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Product>, AppError> {
        let product = self.products().find_one(doc! { "_id": id }, None).await?;
        Ok(product)
    }

    async fn update_by_id(
        &self,
        id: ObjectId,
        changes: ProductChanges,
    ) -> Result<Option<Product>, AppError> {
        let mut set = doc! { "updatedAt": BsonDateTime::now() };
        if let Some(name) = changes.name {
            set.insert("name", name);
        }
        if let Some(price) = changes.price {
            set.insert("price", price);
        }
        if let Some(category) = changes.category {
            set.insert("category", category);
        }

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        let product = self
            .products()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set }, options)
            .await?;
        Ok(product)
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<Option<Product>, AppError> {
        let product = self
            .products()
            .find_one_and_delete(doc! { "_id": id }, None)
            .await?;
        Ok(product)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}
