//! 预约生命周期集成测试
//!
//! 直接驱动存储层，使用一次性 SQLite 数据库验证
//! 容量、状态机与候补补位协议的不变量。

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{TimeDelta, Utc};
use rust_booking_next::errors::BookingSystemError;
use rust_booking_next::models::bookings::entities::{BookingStatus, BookingType, CancelReason};
use rust_booking_next::models::bookings::requests::{
    BookingDecisionRequest, CancelBookingRequest, CreateBookingRequest,
};
use rust_booking_next::models::bookings::responses::BookingOutcome;
use rust_booking_next::models::policies::requests::UpsertPolicyRequest;
use rust_booking_next::models::sessions::requests::{CancelSessionRequest, CreateSessionRequest};
use rust_booking_next::models::waitlist::entities::WaitlistStatus;
use rust_booking_next::models::waitlist::requests::{AcceptOfferRequest, LeaveWaitlistRequest};
use rust_booking_next::storage::Storage;
use rust_booking_next::storage::sea_orm_storage::SeaOrmStorage;
use sea_orm::ConnectionTrait;

static DB_SEQ: AtomicU32 = AtomicU32::new(0);

async fn test_storage() -> SeaOrmStorage {
    let path = std::env::temp_dir().join(format!(
        "booking_lifecycle_{}_{}.sqlite",
        std::process::id(),
        DB_SEQ.fetch_add(1, Ordering::SeqCst)
    ));
    let _ = std::fs::remove_file(&path);
    let url = format!("sqlite://{}?mode=rwc", path.display());
    SeaOrmStorage::connect(&url, 1, 5)
        .await
        .expect("failed to open test database")
}

fn session_request(capacity: i64, enable_waitlist: bool) -> CreateSessionRequest {
    CreateSessionRequest {
        course_id: 100,
        teacher_id: 7,
        title: "直播课测试场次".to_string(),
        description: None,
        start_at_utc: Utc::now() + TimeDelta::hours(72),
        duration_minutes: 60,
        timezone_snapshot: "UTC".to_string(),
        capacity,
        enable_waitlist,
    }
}

fn group_booking(session_id: i64, student: i64) -> CreateBookingRequest {
    CreateBookingRequest {
        booking_type: BookingType::GroupSession,
        student_user_id: student,
        session_id: Some(session_id),
        teacher_id: None,
        course_id: None,
        start_at_utc: None,
        duration_minutes: None,
        seats_reserved: 1,
        student_note: None,
    }
}

fn cancel_by_student(student: i64) -> CancelBookingRequest {
    CancelBookingRequest {
        cancelled_by: student,
        reason: CancelReason::Student,
        note: None,
    }
}

fn expect_booked(outcome: BookingOutcome) -> rust_booking_next::models::bookings::entities::Booking {
    match outcome {
        BookingOutcome::Booked { booking } => booking,
        BookingOutcome::Waitlisted { .. } => panic!("expected direct booking, got waitlisted"),
    }
}

#[tokio::test]
async fn booking_confirms_and_seat_counter_matches_derived_sum() {
    let storage = test_storage().await;
    let session = storage.create_session(session_request(2, true)).await.unwrap();

    let booking = expect_booked(storage.create_booking(group_booking(session.id, 1)).await.unwrap());
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(booking.seats_reserved, 1);

    let detail = storage.get_session_detail(session.id).await.unwrap().unwrap();
    assert_eq!(detail.booked_seats, 1);
    assert_eq!(detail.remaining_seats, 1);
    // 冗余计数与实时汇总一致
    assert_eq!(detail.session.seats_taken, detail.booked_seats);
}

#[tokio::test]
async fn duplicate_active_booking_is_rejected() {
    let storage = test_storage().await;
    let session = storage.create_session(session_request(5, true)).await.unwrap();

    expect_booked(storage.create_booking(group_booking(session.id, 1)).await.unwrap());
    let err = storage
        .create_booking(group_booking(session.id, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingSystemError::DuplicateBooking(_)));
}

#[tokio::test]
async fn full_session_waitlists_in_fifo_order() {
    let storage = test_storage().await;
    let session = storage.create_session(session_request(1, true)).await.unwrap();

    expect_booked(storage.create_booking(group_booking(session.id, 1)).await.unwrap());

    let outcome = storage.create_booking(group_booking(session.id, 2)).await.unwrap();
    let BookingOutcome::Waitlisted { entry, position } = outcome else {
        panic!("expected waitlisted outcome");
    };
    assert_eq!(entry.status, WaitlistStatus::Waiting);
    assert_eq!(position, 1);

    let outcome = storage.create_booking(group_booking(session.id, 3)).await.unwrap();
    let BookingOutcome::Waitlisted { position, .. } = outcome else {
        panic!("expected waitlisted outcome");
    };
    assert_eq!(position, 2);

    let waitlist = storage.list_session_waitlist(session.id).await.unwrap();
    let students: Vec<i64> = waitlist.entries.iter().map(|e| e.student_user_id).collect();
    assert_eq!(students, vec![2, 3]);
}

#[tokio::test]
async fn full_session_without_waitlist_rejects() {
    let storage = test_storage().await;
    let session = storage.create_session(session_request(1, false)).await.unwrap();

    expect_booked(storage.create_booking(group_booking(session.id, 1)).await.unwrap());

    // 满员且候补关闭：创建路径报容量不足，SessionFull 只出现在确认竞争
    let err = storage
        .create_booking(group_booking(session.id, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingSystemError::CapacityExceeded(_)));
}

#[tokio::test]
async fn partial_capacity_rejects_oversized_request() {
    let storage = test_storage().await;
    let session = storage.create_session(session_request(2, true)).await.unwrap();

    expect_booked(storage.create_booking(group_booking(session.id, 1)).await.unwrap());

    // 剩 1 座却要 2 座：不满座也不落候补，直接拒绝
    let mut req = group_booking(session.id, 2);
    req.seats_reserved = 2;
    let err = storage.create_booking(req).await.unwrap_err();
    assert!(matches!(err, BookingSystemError::CapacityExceeded(_)));

    let detail = storage.get_session_detail(session.id).await.unwrap().unwrap();
    assert_eq!(detail.booked_seats, 1);
}

#[tokio::test]
async fn approval_flow_pending_holds_no_seat_and_confirm_revalidates() {
    let storage = test_storage().await;
    let session = storage.create_session(session_request(1, false)).await.unwrap();

    // 教师开启团课审批
    storage
        .upsert_booking_policy(
            7,
            UpsertPolicyRequest {
                course_id: None,
                requires_approval_for_one_on_one: true,
                requires_approval_for_group: true,
                min_notice_hours: 24,
                cancel_window_hours: 24,
                max_bookings_per_day: None,
            },
        )
        .await
        .unwrap();

    let first = expect_booked(storage.create_booking(group_booking(session.id, 1)).await.unwrap());
    let second = expect_booked(storage.create_booking(group_booking(session.id, 2)).await.unwrap());
    assert_eq!(first.status, BookingStatus::Pending);
    assert_eq!(second.status, BookingStatus::Pending);

    // pending 不占座
    let detail = storage.get_session_detail(session.id).await.unwrap().unwrap();
    assert_eq!(detail.booked_seats, 0);

    let decision = BookingDecisionRequest {
        decided_by: 7,
        note: None,
    };

    // 仅 1 个座位：先确认的成功，后确认的拿到 SessionFull
    let confirmed = storage.confirm_booking(first.id, decision.clone()).await.unwrap();
    assert_eq!(confirmed.status, BookingStatus::Confirmed);

    let err = storage.confirm_booking(second.id, decision.clone()).await.unwrap_err();
    assert!(matches!(err, BookingSystemError::SessionFull(_)));

    // 重复确认是非法迁移
    let err = storage.confirm_booking(first.id, decision).await.unwrap_err();
    assert!(matches!(err, BookingSystemError::InvalidTransition(_)));

    let detail = storage.get_session_detail(session.id).await.unwrap().unwrap();
    assert_eq!(detail.booked_seats, 1);
}

#[tokio::test]
async fn decline_keeps_seats_untouched() {
    let storage = test_storage().await;
    let session = storage.create_session(session_request(3, false)).await.unwrap();

    storage
        .upsert_booking_policy(
            7,
            UpsertPolicyRequest {
                course_id: None,
                requires_approval_for_one_on_one: false,
                requires_approval_for_group: true,
                min_notice_hours: 24,
                cancel_window_hours: 24,
                max_bookings_per_day: None,
            },
        )
        .await
        .unwrap();

    let booking = expect_booked(storage.create_booking(group_booking(session.id, 1)).await.unwrap());
    let declined = storage
        .decline_booking(
            booking.id,
            BookingDecisionRequest {
                decided_by: 7,
                note: Some("时间冲突".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(declined.status, BookingStatus::Declined);
    assert_eq!(declined.teacher_note.as_deref(), Some("时间冲突"));

    let detail = storage.get_session_detail(session.id).await.unwrap().unwrap();
    assert_eq!(detail.booked_seats, 0);
}

#[tokio::test]
async fn cancel_releases_seat_and_offers_to_waitlist_head() {
    let storage = test_storage().await;
    let session = storage.create_session(session_request(1, true)).await.unwrap();

    let booking = expect_booked(storage.create_booking(group_booking(session.id, 1)).await.unwrap());
    storage.create_booking(group_booking(session.id, 2)).await.unwrap();
    storage.create_booking(group_booking(session.id, 3)).await.unwrap();

    let result = storage
        .cancel_booking(booking.id, cancel_by_student(1))
        .await
        .unwrap();
    assert_eq!(result.booking.status, BookingStatus::Cancelled);
    assert_eq!(result.seats_released, 1);

    // 队头（学生 2）在同一次操作里拿到补位邀请
    let offered = result.offered_entry.expect("head entry should be offered");
    assert_eq!(offered.student_user_id, 2);
    assert_eq!(offered.status, WaitlistStatus::Offered);
    assert!(offered.offer_expires_at.is_some());

    // 同一场次同时只有一条 offered
    let waitlist = storage.list_session_waitlist(session.id).await.unwrap();
    let offered_count = waitlist
        .entries
        .iter()
        .filter(|e| e.status == WaitlistStatus::Offered)
        .count();
    assert_eq!(offered_count, 1);
}

#[tokio::test]
async fn accepting_live_offer_creates_confirmed_booking() {
    let storage = test_storage().await;
    let session = storage.create_session(session_request(1, true)).await.unwrap();

    let booking = expect_booked(storage.create_booking(group_booking(session.id, 1)).await.unwrap());
    storage.create_booking(group_booking(session.id, 2)).await.unwrap();
    storage.cancel_booking(booking.id, cancel_by_student(1)).await.unwrap();

    let result = storage
        .accept_waitlist_offer(session.id, AcceptOfferRequest { student_user_id: 2 })
        .await
        .unwrap();
    assert_eq!(result.entry.status, WaitlistStatus::Accepted);
    assert_eq!(result.booking.status, BookingStatus::Confirmed);
    assert_eq!(result.booking.student_user_id, 2);

    let detail = storage.get_session_detail(session.id).await.unwrap().unwrap();
    assert_eq!(detail.booked_seats, 1);
    assert_eq!(detail.session.seats_taken, 1);
}

#[tokio::test]
async fn lapsed_offer_expires_and_queue_advances() {
    let storage = test_storage().await;
    let session = storage.create_session(session_request(1, true)).await.unwrap();

    let booking = expect_booked(storage.create_booking(group_booking(session.id, 1)).await.unwrap());
    storage.create_booking(group_booking(session.id, 2)).await.unwrap();
    storage.create_booking(group_booking(session.id, 3)).await.unwrap();
    let result = storage
        .cancel_booking(booking.id, cancel_by_student(1))
        .await
        .unwrap();
    let offered = result.offered_entry.unwrap();

    // 把学生 2 的邀请时限改到过去，模拟超时
    let past = (Utc::now() - TimeDelta::hours(1)).timestamp();
    storage
        .connection()
        .execute_unprepared(&format!(
            "UPDATE waitlist_entries SET offer_expires_at = {past} WHERE id = {}",
            offered.id
        ))
        .await
        .unwrap();

    let err = storage
        .accept_waitlist_offer(session.id, AcceptOfferRequest { student_user_id: 2 })
        .await
        .unwrap_err();
    assert!(matches!(err, BookingSystemError::OfferExpired(_)));

    // 过期后机会顺延给学生 3
    let waitlist = storage.list_session_waitlist(session.id).await.unwrap();
    let by_student = |id: i64| {
        waitlist
            .entries
            .iter()
            .find(|e| e.student_user_id == id)
            .unwrap()
            .status
    };
    assert_eq!(by_student(2), WaitlistStatus::Expired);
    assert_eq!(by_student(3), WaitlistStatus::Offered);
}

#[tokio::test]
async fn leaving_waitlist_with_offer_promotes_next() {
    let storage = test_storage().await;
    let session = storage.create_session(session_request(1, true)).await.unwrap();

    let booking = expect_booked(storage.create_booking(group_booking(session.id, 1)).await.unwrap());
    storage.create_booking(group_booking(session.id, 2)).await.unwrap();
    storage.create_booking(group_booking(session.id, 3)).await.unwrap();
    storage.cancel_booking(booking.id, cancel_by_student(1)).await.unwrap();

    // 持有邀请的学生 2 退出，学生 3 顶上
    let removed = storage
        .leave_waitlist(session.id, LeaveWaitlistRequest { student_user_id: 2 })
        .await
        .unwrap();
    assert!(removed);

    let waitlist = storage.list_session_waitlist(session.id).await.unwrap();
    assert_eq!(waitlist.entries.len(), 1);
    assert_eq!(waitlist.entries[0].student_user_id, 3);
    assert_eq!(waitlist.entries[0].status, WaitlistStatus::Offered);

    // 再退一次已不在名单
    let removed = storage
        .leave_waitlist(session.id, LeaveWaitlistRequest { student_user_id: 2 })
        .await
        .unwrap();
    assert!(!removed);
}

#[tokio::test]
async fn insufficient_notice_is_rejected() {
    let storage = test_storage().await;
    let mut req = session_request(5, true);
    req.start_at_utc = Utc::now() + TimeDelta::hours(1);
    let session = storage.create_session(req).await.unwrap();

    let err = storage
        .create_booking(group_booking(session.id, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingSystemError::InsufficientNotice(_)));
}

#[tokio::test]
async fn student_cancel_respects_window_but_teacher_bypasses() {
    let storage = test_storage().await;
    let session = storage.create_session(session_request(2, true)).await.unwrap();
    let booking = expect_booked(storage.create_booking(group_booking(session.id, 1)).await.unwrap());

    // 把预约开始时间压进取消窗口内
    let soon = (Utc::now() + TimeDelta::hours(2)).timestamp();
    storage
        .connection()
        .execute_unprepared(&format!(
            "UPDATE bookings SET start_at_utc = {soon} WHERE id = {}",
            booking.id
        ))
        .await
        .unwrap();

    let err = storage
        .cancel_booking(booking.id, cancel_by_student(1))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingSystemError::Validation(_)));

    // 教师取消无视窗口
    let result = storage
        .cancel_booking(
            booking.id,
            CancelBookingRequest {
                cancelled_by: 7,
                reason: CancelReason::Teacher,
                note: Some("教师临时调课".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(result.booking.status, BookingStatus::Cancelled);
    assert_eq!(result.booking.cancel_reason, Some(CancelReason::Teacher));
}

#[tokio::test]
async fn cancelling_session_cascades_to_bookings_and_waitlist() {
    let storage = test_storage().await;
    let session = storage.create_session(session_request(1, true)).await.unwrap();

    expect_booked(storage.create_booking(group_booking(session.id, 1)).await.unwrap());
    storage.create_booking(group_booking(session.id, 2)).await.unwrap();

    let result = storage
        .cancel_session(
            session.id,
            CancelSessionRequest {
                cancelled_by: 7,
                note: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(result.cancelled_bookings, 1);
    assert_eq!(result.expired_waitlist_entries, 1);
    assert_eq!(result.session.seats_taken, 0);

    // 已取消的场次不再接受预约
    let err = storage
        .create_booking(group_booking(session.id, 3))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingSystemError::Validation(_)));

    // 重复取消是非法迁移
    let err = storage
        .cancel_session(
            session.id,
            CancelSessionRequest {
                cancelled_by: 7,
                note: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BookingSystemError::InvalidTransition(_)));
}
