//! 预约实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub booking_type: String,
    pub course_id: i64,
    pub teacher_id: i64,
    pub student_user_id: i64,
    pub session_id: Option<i64>,
    pub start_at_utc: i64,
    pub end_at_utc: i64,
    pub seats_reserved: i64,
    pub status: String,
    pub student_note: Option<String>,
    pub teacher_note: Option<String>,
    pub decision_at: Option<i64>,
    pub decided_by: Option<i64>,
    pub cancelled_at: Option<i64>,
    pub cancelled_by: Option<i64>,
    pub cancel_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sessions::Entity",
        from = "Column::SessionId",
        to = "super::sessions::Column::Id"
    )]
    Session,
    #[sea_orm(has_many = "super::booking_series_items::Entity")]
    SeriesItems,
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::booking_series_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SeriesItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_booking(self) -> crate::models::bookings::entities::Booking {
        use crate::models::bookings::entities::{Booking, BookingStatus, BookingType, CancelReason};
        use chrono::{DateTime, Utc};

        Booking {
            id: self.id,
            booking_type: self
                .booking_type
                .parse()
                .unwrap_or(BookingType::GroupSession),
            course_id: self.course_id,
            teacher_id: self.teacher_id,
            student_user_id: self.student_user_id,
            session_id: self.session_id,
            start_at_utc: DateTime::<Utc>::from_timestamp(self.start_at_utc, 0)
                .unwrap_or_default(),
            end_at_utc: DateTime::<Utc>::from_timestamp(self.end_at_utc, 0).unwrap_or_default(),
            seats_reserved: self.seats_reserved,
            status: self.status.parse().unwrap_or(BookingStatus::Pending),
            student_note: self.student_note,
            teacher_note: self.teacher_note,
            decision_at: self
                .decision_at
                .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0)),
            decided_by: self.decided_by,
            cancelled_at: self
                .cancelled_at
                .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0)),
            cancelled_by: self.cancelled_by,
            cancel_reason: self
                .cancel_reason
                .and_then(|r| r.parse::<CancelReason>().ok()),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
