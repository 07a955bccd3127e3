//! 直播课场次实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub teacher_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_at_utc: i64,
    pub end_at_utc: i64,
    pub timezone_snapshot: String,
    pub capacity: i64,
    pub seats_taken: i64,
    pub enable_waitlist: bool,
    pub status: String,
    pub cancelled_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bookings::Entity")]
    Bookings,
    #[sea_orm(has_many = "super::waitlist_entries::Entity")]
    WaitlistEntries,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl Related<super::waitlist_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WaitlistEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_session(self) -> crate::models::sessions::entities::Session {
        use crate::models::sessions::entities::{Session, SessionStatus};
        use chrono::{DateTime, Utc};

        Session {
            id: self.id,
            course_id: self.course_id,
            teacher_id: self.teacher_id,
            title: self.title,
            description: self.description,
            start_at_utc: DateTime::<Utc>::from_timestamp(self.start_at_utc, 0)
                .unwrap_or_default(),
            end_at_utc: DateTime::<Utc>::from_timestamp(self.end_at_utc, 0).unwrap_or_default(),
            timezone_snapshot: self.timezone_snapshot,
            capacity: self.capacity,
            seats_taken: self.seats_taken,
            enable_waitlist: self.enable_waitlist,
            status: self.status.parse().unwrap_or(SessionStatus::Scheduled),
            cancelled_at: self
                .cancelled_at
                .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0)),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
