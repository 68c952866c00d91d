use std::sync::Arc;

use sqlx::{Pool, Sqlite};

use crate::auth::TokenKeys;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub keys: Arc<TokenKeys>,
    pub config: Arc<Config>,
}
