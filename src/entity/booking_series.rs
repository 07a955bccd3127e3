//! 周期预约系列实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "booking_series")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub series_type: String,
    pub status: String,
    pub student_user_id: i64,
    pub teacher_id: i64,
    pub course_id: i64,
    pub title: String,
    pub frequency: String,
    pub interval: i64,
    pub occurrence_count: Option<i64>,
    pub until_date: Option<i64>,
    pub start_at_utc: i64,
    pub duration_minutes: i64,
    pub capacity: Option<i64>,
    pub enable_waitlist: bool,
    pub cancelled_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::booking_series_items::Entity")]
    Items,
}

impl Related<super::booking_series_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_series(self) -> crate::models::series::entities::BookingSeries {
        use crate::models::series::entities::{
            BookingSeries, SeriesFrequency, SeriesStatus, SeriesType,
        };
        use chrono::{DateTime, Utc};

        BookingSeries {
            id: self.id,
            series_type: self.series_type.parse().unwrap_or(SeriesType::GroupSeries),
            status: self.status.parse().unwrap_or(SeriesStatus::Active),
            student_user_id: self.student_user_id,
            teacher_id: self.teacher_id,
            course_id: self.course_id,
            title: self.title,
            frequency: self.frequency.parse().unwrap_or(SeriesFrequency::Weekly),
            interval: self.interval,
            occurrence_count: self.occurrence_count,
            until_date: self
                .until_date
                .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0)),
            start_at_utc: DateTime::<Utc>::from_timestamp(self.start_at_utc, 0)
                .unwrap_or_default(),
            duration_minutes: self.duration_minutes,
            capacity: self.capacity,
            enable_waitlist: self.enable_waitlist,
            cancelled_at: self
                .cancelled_at
                .and_then(|t| DateTime::<Utc>::from_timestamp(t, 0)),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
