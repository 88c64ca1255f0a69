use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{OptionalExtension, RunQueryDsl, prelude::*};
use std::sync::Arc;

use crate::{
    domain::{entities::sessions::SessionEntity, repositories::sessions::SessionRepository},
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::sessions},
};

pub struct SessionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SessionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SessionRepository for SessionPostgres {
    async fn find_active_user_id(&self, session_token: String) -> Result<Option<String>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let session = sessions::table
            .filter(sessions::session_token.eq(session_token))
            .filter(sessions::expires.gt(Utc::now()))
            .select(SessionEntity::as_select())
            .first::<SessionEntity>(&mut conn)
            .optional()?;

        Ok(session.map(|session| session.user_id))
    }
}
