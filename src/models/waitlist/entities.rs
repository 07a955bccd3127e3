use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 候补状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum WaitlistStatus {
    Waiting,  // 排队中
    Offered,  // 已发出补位邀请，等待接受
    Accepted, // 已接受，已转为预约（终态）
    Expired,  // 邀请过期或放弃（终态）
}

impl WaitlistStatus {
    pub const WAITING: &'static str = "waiting";
    pub const OFFERED: &'static str = "offered";
    pub const ACCEPTED: &'static str = "accepted";
    pub const EXPIRED: &'static str = "expired";
}

impl<'de> Deserialize<'de> for WaitlistStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的候补状态: '{s}'. 支持的状态: waiting, offered, accepted, expired"
            ))
        })
    }
}

impl std::fmt::Display for WaitlistStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaitlistStatus::Waiting => write!(f, "{}", WaitlistStatus::WAITING),
            WaitlistStatus::Offered => write!(f, "{}", WaitlistStatus::OFFERED),
            WaitlistStatus::Accepted => write!(f, "{}", WaitlistStatus::ACCEPTED),
            WaitlistStatus::Expired => write!(f, "{}", WaitlistStatus::EXPIRED),
        }
    }
}

impl std::str::FromStr for WaitlistStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(WaitlistStatus::Waiting),
            "offered" => Ok(WaitlistStatus::Offered),
            "accepted" => Ok(WaitlistStatus::Accepted),
            "expired" => Ok(WaitlistStatus::Expired),
            _ => Err(format!("Invalid waitlist status: {s}")),
        }
    }
}

// 候补名单业务实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: i64,
    pub session_id: i64,
    pub student_user_id: i64,
    pub status: WaitlistStatus,
    pub offer_expires_at: Option<DateTime<Utc>>,
    pub offered_at: Option<DateTime<Utc>>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub expired_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl WaitlistEntry {
    /// 补位邀请是否已过有效期
    pub fn offer_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.status == WaitlistStatus::Offered
            && self.offer_expires_at.is_some_and(|deadline| deadline <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_offer_lapsed() {
        let now = Utc::now();
        let entry = WaitlistEntry {
            id: 1,
            session_id: 1,
            student_user_id: 1,
            status: WaitlistStatus::Offered,
            offer_expires_at: Some(now - TimeDelta::minutes(1)),
            offered_at: Some(now - TimeDelta::hours(25)),
            accepted_at: None,
            expired_at: None,
            created_at: now - TimeDelta::days(2),
        };
        assert!(entry.offer_lapsed(now));

        let live = WaitlistEntry {
            offer_expires_at: Some(now + TimeDelta::hours(1)),
            ..entry.clone()
        };
        assert!(!live.offer_lapsed(now));

        let waiting = WaitlistEntry {
            status: WaitlistStatus::Waiting,
            offer_expires_at: None,
            ..entry
        };
        assert!(!waiting.offer_lapsed(now));
    }
}
