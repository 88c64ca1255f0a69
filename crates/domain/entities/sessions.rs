use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::sessions;

/// Row owned by the web session provider; read only from this service.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = sessions, primary_key(session_token))]
pub struct SessionEntity {
    pub session_token: String,
    pub user_id: String,
    pub expires: DateTime<Utc>,
}
