//! Shared state handed to every handler

use gymdesk_interfaces::RepositoryFactory;
use gymdesk_web::JwtManager;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub repositories: Arc<dyn RepositoryFactory>,
    pub jwt: Arc<JwtManager>,
    /// bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,
}

impl AppContext {
    pub fn new(repositories: Arc<dyn RepositoryFactory>, jwt: Arc<JwtManager>, bcrypt_cost: u32) -> Self {
        Self {
            repositories,
            jwt,
            bcrypt_cost,
        }
    }
}
