//! 系列预约与教师策略集成测试

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{TimeDelta, Utc};
use rust_booking_next::errors::BookingSystemError;
use rust_booking_next::models::bookings::entities::{BookingStatus, BookingType, CancelReason};
use rust_booking_next::models::bookings::requests::CreateBookingRequest;
use rust_booking_next::models::bookings::responses::BookingOutcome;
use rust_booking_next::models::sessions::entities::SessionStatus;
use rust_booking_next::models::series::entities::{SeriesFrequency, SeriesStatus, SeriesType};
use rust_booking_next::models::series::requests::{CancelSeriesRequest, CreateSeriesRequest};
use rust_booking_next::models::policies::requests::UpsertPolicyRequest;
use rust_booking_next::storage::Storage;
use rust_booking_next::storage::sea_orm_storage::SeaOrmStorage;
use sea_orm::ConnectionTrait;

static DB_SEQ: AtomicU32 = AtomicU32::new(0);

async fn test_storage() -> SeaOrmStorage {
    let path = std::env::temp_dir().join(format!(
        "booking_series_{}_{}.sqlite",
        std::process::id(),
        DB_SEQ.fetch_add(1, Ordering::SeqCst)
    ));
    let _ = std::fs::remove_file(&path);
    let url = format!("sqlite://{}?mode=rwc", path.display());
    SeaOrmStorage::connect(&url, 1, 5)
        .await
        .expect("failed to open test database")
}

fn series_request(series_type: SeriesType, count: u32) -> CreateSeriesRequest {
    CreateSeriesRequest {
        series_type,
        student_user_id: 1,
        teacher_id: 7,
        course_id: 100,
        title: "周期课程".to_string(),
        frequency: SeriesFrequency::Weekly,
        interval: 1,
        occurrence_count: Some(count),
        until_date: None,
        start_at_utc: Utc::now() + TimeDelta::hours(72),
        duration_minutes: 60,
        capacity: Some(5),
        enable_waitlist: true,
    }
}

fn policy_request(course_id: Option<i64>, min_notice_hours: i64) -> UpsertPolicyRequest {
    UpsertPolicyRequest {
        course_id,
        requires_approval_for_one_on_one: false,
        requires_approval_for_group: false,
        min_notice_hours,
        cancel_window_hours: 24,
        max_bookings_per_day: None,
    }
}

#[tokio::test]
async fn group_series_expands_sessions_and_bookings() {
    let storage = test_storage().await;
    let detail = storage
        .create_booking_series(series_request(SeriesType::GroupSeries, 4))
        .await
        .unwrap();

    assert_eq!(detail.series.status, SeriesStatus::Active);
    assert_eq!(detail.items.len(), 4);
    assert_eq!(detail.bookings.len(), 4);

    // 每期一个场次，序号与起始时间按周递进
    for (index, item) in detail.items.iter().enumerate() {
        assert_eq!(item.occurrence_index, index as i64);
        let session_id = item.session_id.expect("group series items carry sessions");
        let session = storage.get_session_by_id(session_id).await.unwrap().unwrap();
        let expected_start = detail.series.start_at_utc + TimeDelta::days(7 * index as i64);
        assert_eq!(session.start_at_utc, expected_start);
        assert_eq!(session.capacity, 5);
        // 系列预约直接占座
        assert_eq!(session.seats_taken, 1);
    }
    for booking in &detail.bookings {
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }
}

#[tokio::test]
async fn one_on_one_series_creates_bookings_without_sessions() {
    let storage = test_storage().await;
    let detail = storage
        .create_booking_series(series_request(SeriesType::OneOnOneSeries, 3))
        .await
        .unwrap();

    assert_eq!(detail.items.len(), 3);
    for item in &detail.items {
        assert!(item.session_id.is_none());
    }
    for booking in &detail.bookings {
        assert!(booking.session_id.is_none());
        assert_eq!(booking.teacher_id, 7);
    }

    let fetched = storage
        .get_booking_series(detail.series.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.bookings.len(), 3);
    // 返回顺序跟随期次
    let starts: Vec<_> = fetched.bookings.iter().map(|b| b.start_at_utc).collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
}

#[tokio::test]
async fn series_requires_exactly_one_of_count_or_until() {
    let storage = test_storage().await;

    let mut both = series_request(SeriesType::OneOnOneSeries, 3);
    both.until_date = Some(Utc::now() + TimeDelta::days(30));
    let err = storage.create_booking_series(both).await.unwrap_err();
    assert!(matches!(err, BookingSystemError::Validation(_)));

    let mut neither = series_request(SeriesType::OneOnOneSeries, 3);
    neither.occurrence_count = None;
    let err = storage.create_booking_series(neither).await.unwrap_err();
    assert!(matches!(err, BookingSystemError::Validation(_)));
}

#[tokio::test]
async fn series_min_notice_applies_to_first_occurrence_only() {
    let storage = test_storage().await;
    let mut req = series_request(SeriesType::OneOnOneSeries, 3);
    req.start_at_utc = Utc::now() + TimeDelta::hours(1);
    let err = storage.create_booking_series(req).await.unwrap_err();
    assert!(matches!(err, BookingSystemError::InsufficientNotice(_)));
}

#[tokio::test]
async fn cancelling_series_skips_past_occurrences() {
    let storage = test_storage().await;
    let detail = storage
        .create_booking_series(series_request(SeriesType::GroupSeries, 7))
        .await
        .unwrap();

    // 把前两期挪到过去，模拟已经上过的课
    let past = (Utc::now() - TimeDelta::days(3)).timestamp();
    for item in detail.items.iter().take(2) {
        storage
            .connection()
            .execute_unprepared(&format!(
                "UPDATE bookings SET start_at_utc = {past} WHERE id = {}",
                item.booking_id
            ))
            .await
            .unwrap();
    }

    let result = storage
        .cancel_booking_series(
            detail.series.id,
            CancelSeriesRequest {
                cancelled_by: 7,
                note: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(result.series.status, SeriesStatus::Cancelled);
    assert_eq!(result.cancelled_occurrences, 5);
    assert_eq!(result.untouched_occurrences, 2);

    // 过去的预约保持原状，未来的预约与场次一并取消
    let untouched = storage
        .get_booking_by_id(detail.items[0].booking_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.status, BookingStatus::Confirmed);

    let cancelled = storage
        .get_booking_by_id(detail.items[4].booking_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(cancelled.cancel_reason, Some(CancelReason::Teacher));

    let session = storage
        .get_session_by_id(detail.items[4].session_id.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.status, SessionStatus::Cancelled);

    // 系列不可二次取消
    let err = storage
        .cancel_booking_series(
            detail.series.id,
            CancelSeriesRequest {
                cancelled_by: 7,
                note: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BookingSystemError::InvalidTransition(_)));
}

#[tokio::test]
async fn cancelling_series_cascades_to_other_students_bookings() {
    let storage = test_storage().await;
    let detail = storage
        .create_booking_series(series_request(SeriesType::GroupSeries, 2))
        .await
        .unwrap();
    let session_id = detail.items[0].session_id.unwrap();

    // 另一个学生直接预约系列生成的场次
    let outcome = storage
        .create_booking(CreateBookingRequest {
            booking_type: BookingType::GroupSession,
            student_user_id: 42,
            session_id: Some(session_id),
            teacher_id: None,
            course_id: None,
            start_at_utc: None,
            duration_minutes: None,
            seats_reserved: 1,
            student_note: None,
        })
        .await
        .unwrap();
    let BookingOutcome::Booked { booking: other } = outcome else {
        panic!("expected direct booking, got waitlisted");
    };
    assert_eq!(other.status, BookingStatus::Confirmed);

    storage
        .cancel_booking_series(
            detail.series.id,
            CancelSeriesRequest {
                cancelled_by: 7,
                note: None,
            },
        )
        .await
        .unwrap();

    // 取消场次时非系列学生的预约也要一起取消，占座计数归零
    let other = storage.get_booking_by_id(other.id).await.unwrap().unwrap();
    assert_eq!(other.status, BookingStatus::Cancelled);
    assert_eq!(other.cancel_reason, Some(CancelReason::Teacher));
    assert_eq!(other.cancelled_by, Some(7));

    let session = storage.get_session_by_id(session_id).await.unwrap().unwrap();
    assert_eq!(session.status, SessionStatus::Cancelled);
    assert_eq!(session.seats_taken, 0);
}

#[tokio::test]
async fn policy_resolution_prefers_course_then_teacher_then_builtin() {
    let storage = test_storage().await;

    // 未配置任何策略时回退内置默认值
    let builtin = storage.get_booking_policy(7, Some(100)).await.unwrap();
    assert!(builtin.id.is_none());
    assert_eq!(builtin.min_notice_hours, 24);

    storage.upsert_booking_policy(7, policy_request(None, 12)).await.unwrap();
    storage
        .upsert_booking_policy(7, policy_request(Some(100), 48))
        .await
        .unwrap();

    let course_scoped = storage.get_booking_policy(7, Some(100)).await.unwrap();
    assert_eq!(course_scoped.min_notice_hours, 48);
    assert_eq!(course_scoped.course_id, Some(100));

    // 其他课程落到教师默认策略
    let teacher_default = storage.get_booking_policy(7, Some(200)).await.unwrap();
    assert_eq!(teacher_default.min_notice_hours, 12);
    assert_eq!(teacher_default.course_id, None);

    let no_course = storage.get_booking_policy(7, None).await.unwrap();
    assert_eq!(no_course.min_notice_hours, 12);
}

#[tokio::test]
async fn upsert_overwrites_existing_policy_row() {
    let storage = test_storage().await;

    let first = storage.upsert_booking_policy(7, policy_request(None, 12)).await.unwrap();
    let second = storage.upsert_booking_policy(7, policy_request(None, 36)).await.unwrap();
    // 同一 (teacher, course) 维度只保留一行
    assert_eq!(first.id, second.id);
    assert_eq!(second.min_notice_hours, 36);
}
