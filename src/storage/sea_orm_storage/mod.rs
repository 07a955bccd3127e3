//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 涉及座位计数和候补队列的操作都在事务内完成，提交前重新读取并校验容量。

mod bookings;
mod policies;
mod series;
mod sessions;
mod waitlist;

use crate::config::AppConfig;
use crate::errors::{BookingSystemError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例（使用全局配置）
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接指定数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout_secs: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, pool_size, timeout_secs).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout_secs).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| BookingSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 获取底层连接（集成测试用）
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use sea_orm::SqlxSqliteConnector;
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| BookingSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| BookingSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(timeout_secs))
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| BookingSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(BookingSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    bookings::{
        entities::Booking,
        requests::{
            BookingDecisionRequest, BookingListQuery, CancelBookingRequest, CreateBookingRequest,
            MarkAttendedRequest,
        },
        responses::{BookingListResponse, BookingOutcome, CancelBookingResponse},
    },
    policies::{entities::TeacherBookingPolicy, requests::UpsertPolicyRequest},
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 场次模块
    async fn create_session(&self, req: CreateSessionRequest) -> Result<Session> {
        self.create_session_impl(req).await
    }

    async fn get_session_by_id(&self, session_id: i64) -> Result<Option<Session>> {
        self.get_session_by_id_impl(session_id).await
    }

    async fn get_session_detail(&self, session_id: i64) -> Result<Option<SessionDetailResponse>> {
        self.get_session_detail_impl(session_id).await
    }

    async fn list_sessions_with_pagination(
        &self,
        query: SessionListQuery,
    ) -> Result<SessionListResponse> {
        self.list_sessions_with_pagination_impl(query).await
    }

    async fn cancel_session(
        &self,
        session_id: i64,
        req: CancelSessionRequest,
    ) -> Result<CancelSessionResponse> {
        self.cancel_session_impl(session_id, req).await
    }

    // 预约模块
    async fn create_booking(&self, req: CreateBookingRequest) -> Result<BookingOutcome> {
        self.create_booking_impl(req).await
    }

    async fn get_booking_by_id(&self, booking_id: i64) -> Result<Option<Booking>> {
        self.get_booking_by_id_impl(booking_id).await
    }

    async fn list_bookings_with_pagination(
        &self,
        query: BookingListQuery,
    ) -> Result<BookingListResponse> {
        self.list_bookings_with_pagination_impl(query).await
    }

    async fn confirm_booking(
        &self,
        booking_id: i64,
        req: BookingDecisionRequest,
    ) -> Result<Booking> {
        self.confirm_booking_impl(booking_id, req).await
    }

    async fn decline_booking(
        &self,
        booking_id: i64,
        req: BookingDecisionRequest,
    ) -> Result<Booking> {
        self.decline_booking_impl(booking_id, req).await
    }

    async fn cancel_booking(
        &self,
        booking_id: i64,
        req: CancelBookingRequest,
    ) -> Result<CancelBookingResponse> {
        self.cancel_booking_impl(booking_id, req).await
    }

    async fn mark_booking_attended(
        &self,
        booking_id: i64,
        req: MarkAttendedRequest,
    ) -> Result<Booking> {
        self.mark_booking_attended_impl(booking_id, req).await
    }

    // 候补模块
    async fn list_session_waitlist(&self, session_id: i64) -> Result<WaitlistResponse> {
        self.list_session_waitlist_impl(session_id).await
    }

    async fn accept_waitlist_offer(
        &self,
        session_id: i64,
        req: AcceptOfferRequest,
    ) -> Result<AcceptOfferResponse> {
        self.accept_waitlist_offer_impl(session_id, req).await
    }

    async fn leave_waitlist(&self, session_id: i64, req: LeaveWaitlistRequest) -> Result<bool> {
        self.leave_waitlist_impl(session_id, req).await
    }

    // 系列模块
    async fn create_booking_series(
        &self,
        req: CreateSeriesRequest,
    ) -> Result<SeriesDetailResponse> {
        self.create_booking_series_impl(req).await
    }

    async fn get_booking_series(&self, series_id: i64) -> Result<Option<SeriesDetailResponse>> {
        self.get_booking_series_impl(series_id).await
    }

    async fn cancel_booking_series(
        &self,
        series_id: i64,
        req: CancelSeriesRequest,
    ) -> Result<CancelSeriesResponse> {
        self.cancel_booking_series_impl(series_id, req).await
    }

    // 策略模块
    async fn upsert_booking_policy(
        &self,
        teacher_id: i64,
        req: UpsertPolicyRequest,
    ) -> Result<TeacherBookingPolicy> {
        self.upsert_booking_policy_impl(teacher_id, req).await
    }

    async fn get_booking_policy(
        &self,
        teacher_id: i64,
        course_id: Option<i64>,
    ) -> Result<TeacherBookingPolicy> {
        self.get_booking_policy_impl(teacher_id, course_id).await
    }
}
