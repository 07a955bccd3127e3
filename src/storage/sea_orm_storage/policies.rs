//! 教师预约策略存储操作

use super::SeaOrmStorage;
use crate::config::AppConfig;
use crate::entity::booking_policies::{ActiveModel, Column, Entity as BookingPolicies};
use crate::errors::{BookingSystemError, Result};
use crate::models::policies::{entities::TeacherBookingPolicy, requests::UpsertPolicyRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, Set,
};

impl SeaOrmStorage {
    /// 覆盖写入策略：同一 (teacher_id, course_id) 只保留一条
    pub async fn upsert_booking_policy_impl(
        &self,
        teacher_id: i64,
        req: UpsertPolicyRequest,
    ) -> Result<TeacherBookingPolicy> {
        let now = chrono::Utc::now().timestamp();

        let mut course_filter = Condition::all().add(Column::TeacherId.eq(teacher_id));
        course_filter = match req.course_id {
            Some(course_id) => course_filter.add(Column::CourseId.eq(course_id)),
            None => course_filter.add(Column::CourseId.is_null()),
        };

        let existing = BookingPolicies::find()
            .filter(course_filter)
            .one(&self.db)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询预约策略失败: {e}")))?;

        let result = match existing {
            Some(model) => {
                let mut active: ActiveModel = model.into();
                active.requires_approval_for_one_on_one =
                    Set(req.requires_approval_for_one_on_one);
                active.requires_approval_for_group = Set(req.requires_approval_for_group);
                active.min_notice_hours = Set(req.min_notice_hours);
                active.cancel_window_hours = Set(req.cancel_window_hours);
                active.max_bookings_per_day = Set(req.max_bookings_per_day);
                active.updated_at = Set(now);
                active.update(&self.db).await.map_err(|e| {
                    BookingSystemError::database_operation(format!("更新预约策略失败: {e}"))
                })?
            }
            None => {
                let model = ActiveModel {
                    teacher_id: Set(teacher_id),
                    course_id: Set(req.course_id),
                    requires_approval_for_one_on_one: Set(req.requires_approval_for_one_on_one),
                    requires_approval_for_group: Set(req.requires_approval_for_group),
                    min_notice_hours: Set(req.min_notice_hours),
                    cancel_window_hours: Set(req.cancel_window_hours),
                    max_bookings_per_day: Set(req.max_bookings_per_day),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model.insert(&self.db).await.map_err(|e| {
                    BookingSystemError::database_operation(format!("创建预约策略失败: {e}"))
                })?
            }
        };

        Ok(result.into_policy())
    }

    /// 查询策略：课程策略 > 教师默认策略 > 内置默认值
    pub async fn get_booking_policy_impl(
        &self,
        teacher_id: i64,
        course_id: Option<i64>,
    ) -> Result<TeacherBookingPolicy> {
        Self::resolve_policy(&self.db, teacher_id, course_id).await
    }

    /// 事务内外通用的策略解析
    pub(crate) async fn resolve_policy<C: ConnectionTrait>(
        conn: &C,
        teacher_id: i64,
        course_id: Option<i64>,
    ) -> Result<TeacherBookingPolicy> {
        if let Some(course_id) = course_id {
            let course_policy = BookingPolicies::find()
                .filter(
                    Condition::all()
                        .add(Column::TeacherId.eq(teacher_id))
                        .add(Column::CourseId.eq(course_id)),
                )
                .one(conn)
                .await
                .map_err(|e| {
                    BookingSystemError::database_operation(format!("查询预约策略失败: {e}"))
                })?;
            if let Some(policy) = course_policy {
                return Ok(policy.into_policy());
            }
        }

        let default_policy = BookingPolicies::find()
            .filter(
                Condition::all()
                    .add(Column::TeacherId.eq(teacher_id))
                    .add(Column::CourseId.is_null()),
            )
            .one(conn)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("查询预约策略失败: {e}")))?;

        if let Some(policy) = default_policy {
            return Ok(policy.into_policy());
        }

        let config = AppConfig::get();
        Ok(TeacherBookingPolicy::fallback(
            teacher_id,
            config.booking.default_min_notice_hours,
            config.booking.default_cancel_window_hours,
        ))
    }
}
