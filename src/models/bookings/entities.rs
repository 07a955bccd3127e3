use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 预约类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
    GroupSession, // 团课，占用场次座位
    OneOnOne,     // 1:1 预约，不关联场次
}

impl BookingType {
    pub const GROUP_SESSION: &'static str = "group_session";
    pub const ONE_ON_ONE: &'static str = "one_on_one";
}

impl<'de> Deserialize<'de> for BookingType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的预约类型: '{s}'. 支持的类型: group_session, one_on_one"
            ))
        })
    }
}

impl std::fmt::Display for BookingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingType::GroupSession => write!(f, "{}", BookingType::GROUP_SESSION),
            BookingType::OneOnOne => write!(f, "{}", BookingType::ONE_ON_ONE),
        }
    }
}

impl std::str::FromStr for BookingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group_session" => Ok(BookingType::GroupSession),
            "one_on_one" => Ok(BookingType::OneOnOne),
            _ => Err(format!("Invalid booking type: {s}")),
        }
    }
}

// 预约状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,   // 等待审批，不占座
    Confirmed, // 已确认，占座
    Declined,  // 已拒绝（终态）
    Cancelled, // 已取消（终态）
    Attended,  // 已出席（终态，仍占座）
}

impl BookingStatus {
    pub const PENDING: &'static str = "pending";
    pub const CONFIRMED: &'static str = "confirmed";
    pub const DECLINED: &'static str = "declined";
    pub const CANCELLED: &'static str = "cancelled";
    pub const ATTENDED: &'static str = "attended";

    /// 活跃状态：同一 (学生, 场次) 同时最多一条
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// 占座状态：seats_taken 按这些状态汇总
    pub fn holds_seat(&self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::Attended)
    }

    /// 状态机合法迁移
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Declined)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Attended)
        )
    }
}

impl<'de> Deserialize<'de> for BookingStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的预约状态: '{s}'. 支持的状态: pending, confirmed, declined, cancelled, attended"
            ))
        })
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "{}", BookingStatus::PENDING),
            BookingStatus::Confirmed => write!(f, "{}", BookingStatus::CONFIRMED),
            BookingStatus::Declined => write!(f, "{}", BookingStatus::DECLINED),
            BookingStatus::Cancelled => write!(f, "{}", BookingStatus::CANCELLED),
            BookingStatus::Attended => write!(f, "{}", BookingStatus::ATTENDED),
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "declined" => Ok(BookingStatus::Declined),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "attended" => Ok(BookingStatus::Attended),
            _ => Err(format!("Invalid booking status: {s}")),
        }
    }
}

// 取消原因
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    Student,
    Teacher,
    Admin,
    System,
    Conflict,
    Emergency,
}

impl CancelReason {
    /// 学生本人取消需要遵守取消窗口，其余身份不受限制
    pub fn enforces_cancel_window(&self) -> bool {
        matches!(self, CancelReason::Student)
    }
}

impl<'de> Deserialize<'de> for CancelReason {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的取消原因: '{s}'. 支持: student, teacher, admin, system, conflict, emergency"
            ))
        })
    }
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CancelReason::Student => "student",
            CancelReason::Teacher => "teacher",
            CancelReason::Admin => "admin",
            CancelReason::System => "system",
            CancelReason::Conflict => "conflict",
            CancelReason::Emergency => "emergency",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for CancelReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(CancelReason::Student),
            "teacher" => Ok(CancelReason::Teacher),
            "admin" => Ok(CancelReason::Admin),
            "system" => Ok(CancelReason::System),
            "conflict" => Ok(CancelReason::Conflict),
            "emergency" => Ok(CancelReason::Emergency),
            _ => Err(format!("Invalid cancel reason: {s}")),
        }
    }
}

// 预约业务实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub booking_type: BookingType,
    pub course_id: i64,
    pub teacher_id: i64,
    pub student_user_id: i64,
    pub session_id: Option<i64>,
    pub start_at_utc: DateTime<Utc>,
    pub end_at_utc: DateTime<Utc>,
    pub seats_reserved: i64,
    pub status: BookingStatus,
    pub student_note: Option<String>,
    pub teacher_note: Option<String>,
    pub decision_at: Option<DateTime<Utc>>,
    pub decided_by: Option<i64>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<i64>,
    pub cancel_reason: Option<CancelReason>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_transitions() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Declined));
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Attended));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for terminal in [
            BookingStatus::Declined,
            BookingStatus::Cancelled,
            BookingStatus::Attended,
        ] {
            for next in [
                BookingStatus::Pending,
                BookingStatus::Confirmed,
                BookingStatus::Declined,
                BookingStatus::Cancelled,
                BookingStatus::Attended,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_pending_does_not_hold_seat() {
        assert!(!BookingStatus::Pending.holds_seat());
        assert!(BookingStatus::Confirmed.holds_seat());
        assert!(BookingStatus::Attended.holds_seat());
    }

    #[test]
    fn test_only_student_cancel_enforces_window() {
        assert!(CancelReason::Student.enforces_cancel_window());
        assert!(!CancelReason::Teacher.enforces_cancel_window());
        assert!(!CancelReason::System.enforces_cancel_window());
    }
}
