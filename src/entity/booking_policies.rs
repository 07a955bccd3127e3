//! 教师预约策略实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "booking_policies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub teacher_id: i64,
    pub course_id: Option<i64>,
    pub requires_approval_for_one_on_one: bool,
    pub requires_approval_for_group: bool,
    pub min_notice_hours: i64,
    pub cancel_window_hours: i64,
    pub max_bookings_per_day: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_policy(self) -> crate::models::policies::entities::TeacherBookingPolicy {
        use crate::models::policies::entities::TeacherBookingPolicy;
        use chrono::{DateTime, Utc};

        TeacherBookingPolicy {
            id: Some(self.id),
            teacher_id: self.teacher_id,
            course_id: self.course_id,
            requires_approval_for_one_on_one: self.requires_approval_for_one_on_one,
            requires_approval_for_group: self.requires_approval_for_group,
            min_notice_hours: self.min_notice_hours,
            cancel_window_hours: self.cancel_window_hours,
            max_bookings_per_day: self.max_bookings_per_day,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
