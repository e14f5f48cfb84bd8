pub mod products;

pub use products::{
    MessageResponse, ProductEnvelope, ProductListResponse, ProductRequest, ProductResponse,
};
