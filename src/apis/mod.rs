pub mod vectorbase;

pub use vectorbase::VectorBaseClient;
