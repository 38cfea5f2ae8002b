pub mod manager;
pub mod snapshot;

pub use manager::TableStore;
pub use snapshot::{read_document, write_document, RowDocument, TableDocument};
