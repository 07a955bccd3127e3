use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 场次状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled, // 已排课，可预约
    Completed, // 结束时间已过
    Cancelled, // 已取消
}

impl SessionStatus {
    pub const SCHEDULED: &'static str = "scheduled";
    pub const COMPLETED: &'static str = "completed";
    pub const CANCELLED: &'static str = "cancelled";
}

impl<'de> Deserialize<'de> for SessionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的场次状态: '{s}'. 支持的状态: scheduled, completed, cancelled"
            ))
        })
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Scheduled => write!(f, "{}", SessionStatus::SCHEDULED),
            SessionStatus::Completed => write!(f, "{}", SessionStatus::COMPLETED),
            SessionStatus::Cancelled => write!(f, "{}", SessionStatus::CANCELLED),
        }
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(SessionStatus::Scheduled),
            "completed" => Ok(SessionStatus::Completed),
            "cancelled" => Ok(SessionStatus::Cancelled),
            _ => Err(format!("Invalid session status: {s}")),
        }
    }
}

// 直播课场次业务实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub course_id: i64,
    pub teacher_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub start_at_utc: DateTime<Utc>,
    pub end_at_utc: DateTime<Utc>,
    pub timezone_snapshot: String,
    pub capacity: i64,
    pub seats_taken: i64,
    pub enable_waitlist: bool,
    pub status: SessionStatus,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// 剩余座位数
    pub fn remaining_seats(&self) -> i64 {
        (self.capacity - self.seats_taken).max(0)
    }

    /// 座位是否已满
    pub fn is_full(&self) -> bool {
        self.seats_taken >= self.capacity
    }

    /// 场次是否已开始
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.start_at_utc <= now
    }

    /// 展示状态：结束时间已过的 scheduled 场次按 completed 处理（惰性推导，不回写数据库）
    pub fn effective_status(&self, now: DateTime<Utc>) -> SessionStatus {
        if self.status == SessionStatus::Scheduled && self.end_at_utc <= now {
            SessionStatus::Completed
        } else {
            self.status
        }
    }

    /// 当前是否可接受新的预约请求
    pub fn booking_open(&self, now: DateTime<Utc>) -> bool {
        if self.status != SessionStatus::Scheduled {
            return false;
        }
        if self.has_started(now) {
            return false;
        }
        if self.is_full() && !self.enable_waitlist {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn sample_session(capacity: i64, seats_taken: i64, enable_waitlist: bool) -> Session {
        let now = Utc::now();
        Session {
            id: 1,
            course_id: 1,
            teacher_id: 1,
            title: "口语练习".to_string(),
            description: None,
            start_at_utc: now + TimeDelta::hours(48),
            end_at_utc: now + TimeDelta::hours(49),
            timezone_snapshot: "UTC".to_string(),
            capacity,
            seats_taken,
            enable_waitlist,
            status: SessionStatus::Scheduled,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_remaining_seats_never_negative() {
        let session = sample_session(5, 7, false);
        assert_eq!(session.remaining_seats(), 0);
        assert!(session.is_full());
    }

    #[test]
    fn test_booking_open_full_without_waitlist() {
        let session = sample_session(2, 2, false);
        assert!(!session.booking_open(Utc::now()));
    }

    #[test]
    fn test_booking_open_full_with_waitlist() {
        let session = sample_session(2, 2, true);
        assert!(session.booking_open(Utc::now()));
    }

    #[test]
    fn test_effective_status_completed_after_end() {
        let mut session = sample_session(5, 0, false);
        session.start_at_utc = Utc::now() - TimeDelta::hours(2);
        session.end_at_utc = Utc::now() - TimeDelta::hours(1);
        assert_eq!(
            session.effective_status(Utc::now()),
            SessionStatus::Completed
        );
        assert!(!session.booking_open(Utc::now()));
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(
            "scheduled".parse::<SessionStatus>().unwrap(),
            SessionStatus::Scheduled
        );
        assert_eq!(SessionStatus::Cancelled.to_string(), "cancelled");
        assert!("live".parse::<SessionStatus>().is_err());
    }
}
