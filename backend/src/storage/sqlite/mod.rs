pub mod bill_repository;
pub mod connection;

pub use bill_repository::SqliteBillRepository;
pub use connection::DbConnection;
