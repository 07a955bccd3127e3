use std::sync::Arc;

use crate::models::{
    bookings::{
        entities::Booking,
        requests::{
            BookingDecisionRequest, BookingListQuery, CancelBookingRequest, CreateBookingRequest,
            MarkAttendedRequest,
        },
        responses::{BookingListResponse, BookingOutcome, CancelBookingResponse},
    },
    policies::{
        entities::TeacherBookingPolicy,
        requests::UpsertPolicyRequest,
    },
    series::{
        requests::{CancelSeriesRequest, CreateSeriesRequest},
        responses::{CancelSeriesResponse, SeriesDetailResponse},
    },
    sessions::{
        entities::Session,
        requests::{CancelSessionRequest, CreateSessionRequest, SessionListQuery},
        responses::{CancelSessionResponse, SessionDetailResponse, SessionListResponse},
    },
    waitlist::{
        requests::{AcceptOfferRequest, LeaveWaitlistRequest},
        responses::{AcceptOfferResponse, WaitlistResponse},
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 场次管理方法
    // 创建场次
    async fn create_session(&self, req: CreateSessionRequest) -> Result<Session>;
    // 通过ID获取场次
    async fn get_session_by_id(&self, session_id: i64) -> Result<Option<Session>>;
    // 场次详情，座位数从预约表实时推导
    async fn get_session_detail(&self, session_id: i64) -> Result<Option<SessionDetailResponse>>;
    // 列出场次
    async fn list_sessions_with_pagination(
        &self,
        query: SessionListQuery,
    ) -> Result<SessionListResponse>;
    // 取消场次，级联取消活跃预约并关闭候补
    async fn cancel_session(
        &self,
        session_id: i64,
        req: CancelSessionRequest,
    ) -> Result<CancelSessionResponse>;

    /// 预约管理方法
    // 创建预约；场次满员且开启候补时转入候补名单
    async fn create_booking(&self, req: CreateBookingRequest) -> Result<BookingOutcome>;
    // 通过ID获取预约
    async fn get_booking_by_id(&self, booking_id: i64) -> Result<Option<Booking>>;
    // 列出预约
    async fn list_bookings_with_pagination(
        &self,
        query: BookingListQuery,
    ) -> Result<BookingListResponse>;
    // 确认预约（pending -> confirmed），提交前重新校验容量
    async fn confirm_booking(
        &self,
        booking_id: i64,
        req: BookingDecisionRequest,
    ) -> Result<Booking>;
    // 拒绝预约（pending -> declined）
    async fn decline_booking(
        &self,
        booking_id: i64,
        req: BookingDecisionRequest,
    ) -> Result<Booking>;
    // 取消预约，释放座位并在同一事务内触发候补补位
    async fn cancel_booking(
        &self,
        booking_id: i64,
        req: CancelBookingRequest,
    ) -> Result<CancelBookingResponse>;
    // 标记出席（confirmed -> attended）
    async fn mark_booking_attended(
        &self,
        booking_id: i64,
        req: MarkAttendedRequest,
    ) -> Result<Booking>;

    /// 候补管理方法
    // 列出场次候补名单（顺带惰性处理过期邀请）
    async fn list_session_waitlist(&self, session_id: i64) -> Result<WaitlistResponse>;
    // 接受补位邀请，原子转为 confirmed 预约
    async fn accept_waitlist_offer(
        &self,
        session_id: i64,
        req: AcceptOfferRequest,
    ) -> Result<AcceptOfferResponse>;
    // 退出候补
    async fn leave_waitlist(&self, session_id: i64, req: LeaveWaitlistRequest) -> Result<bool>;

    /// 周期预约系列方法
    // 创建系列并立即展开所有预约
    async fn create_booking_series(&self, req: CreateSeriesRequest)
        -> Result<SeriesDetailResponse>;
    // 通过ID获取系列详情
    async fn get_booking_series(&self, series_id: i64) -> Result<Option<SeriesDetailResponse>>;
    // 取消系列，只影响未开始的预约
    async fn cancel_booking_series(
        &self,
        series_id: i64,
        req: CancelSeriesRequest,
    ) -> Result<CancelSeriesResponse>;

    /// 教师预约策略方法
    // 按 (teacher_id, course_id) 覆盖写入策略
    async fn upsert_booking_policy(
        &self,
        teacher_id: i64,
        req: UpsertPolicyRequest,
    ) -> Result<TeacherBookingPolicy>;
    // 查询策略：课程策略优先，回退教师默认策略，再回退内置默认值
    async fn get_booking_policy(
        &self,
        teacher_id: i64,
        course_id: Option<i64>,
    ) -> Result<TeacherBookingPolicy>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
