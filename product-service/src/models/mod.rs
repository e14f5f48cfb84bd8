pub mod product;

pub use product::{store_timestamp, NewProduct, Product, ProductChanges, PRODUCTS_COLLECTION};
