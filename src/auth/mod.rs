mod password;
pub use password::hash_password;
mod error;
pub use error::{CryptError, CryptResult};
