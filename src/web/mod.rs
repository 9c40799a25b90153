mod error;
pub use error::{WebError, WebResult};

mod state;
pub use state::AppState;

pub mod doc;
pub mod dto;
pub mod routes;
