//! 候补名单实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "waitlist_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub session_id: i64,
    pub student_user_id: i64,
    pub status: String,
    pub offer_expires_at: Option<i64>,
    pub offered_at: Option<i64>,
    pub accepted_at: Option<i64>,
    pub expired_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sessions::Entity",
        from = "Column::SessionId",
        to = "super::sessions::Column::Id"
    )]
    Session,
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_waitlist_entry(self) -> crate::models::waitlist::entities::WaitlistEntry {
        use crate::models::waitlist::entities::{WaitlistEntry, WaitlistStatus};
        use chrono::{DateTime, Utc};

        WaitlistEntry {
            id: self.id,
            session_id: self.session_id,
            student_user_id: self.student_user_id,
            status: self.status.parse().unwrap_or(WaitlistStatus::Waiting),
            offer_expires_at: self
                .offer_expires_at
                .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0)),
            offered_at: self
                .offered_at
                .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0)),
            accepted_at: self
                .accepted_at
                .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0)),
            expired_at: self
                .expired_at
                .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0)),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
