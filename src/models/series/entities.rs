use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 系列类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SeriesType {
    GroupSeries,    // 每次生成场次 + 预约
    OneOnOneSeries, // 每次只生成 1:1 预约
}

impl<'de> Deserialize<'de> for SeriesType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的系列类型: '{s}'. 支持的类型: group_series, one_on_one_series"
            ))
        })
    }
}

impl std::fmt::Display for SeriesType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesType::GroupSeries => write!(f, "group_series"),
            SeriesType::OneOnOneSeries => write!(f, "one_on_one_series"),
        }
    }
}

impl std::str::FromStr for SeriesType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "group_series" => Ok(SeriesType::GroupSeries),
            "one_on_one_series" => Ok(SeriesType::OneOnOneSeries),
            _ => Err(format!("Invalid series type: {s}")),
        }
    }
}

// 系列状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStatus {
    Active,
    Cancelled,
    Completed,
}

impl<'de> Deserialize<'de> for SeriesStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的系列状态: '{s}'. 支持的状态: active, cancelled, completed"
            ))
        })
    }
}

impl std::fmt::Display for SeriesStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesStatus::Active => write!(f, "active"),
            SeriesStatus::Cancelled => write!(f, "cancelled"),
            SeriesStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for SeriesStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SeriesStatus::Active),
            "cancelled" => Ok(SeriesStatus::Cancelled),
            "completed" => Ok(SeriesStatus::Completed),
            _ => Err(format!("Invalid series status: {s}")),
        }
    }
}

// 重复频率
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SeriesFrequency {
    Weekly,
    Biweekly,
    Monthly,
}

impl<'de> Deserialize<'de> for SeriesFrequency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的重复频率: '{s}'. 支持: weekly, biweekly, monthly"
            ))
        })
    }
}

impl std::fmt::Display for SeriesFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesFrequency::Weekly => write!(f, "weekly"),
            SeriesFrequency::Biweekly => write!(f, "biweekly"),
            SeriesFrequency::Monthly => write!(f, "monthly"),
        }
    }
}

impl std::str::FromStr for SeriesFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(SeriesFrequency::Weekly),
            "biweekly" => Ok(SeriesFrequency::Biweekly),
            "monthly" => Ok(SeriesFrequency::Monthly),
            _ => Err(format!("Invalid series frequency: {s}")),
        }
    }
}

// 周期预约系列业务实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSeries {
    pub id: i64,
    pub series_type: SeriesType,
    pub status: SeriesStatus,
    pub student_user_id: i64,
    pub teacher_id: i64,
    pub course_id: i64,
    pub title: String,
    pub frequency: SeriesFrequency,
    pub interval: i64,
    pub occurrence_count: Option<i64>,
    pub until_date: Option<DateTime<Utc>>,
    pub start_at_utc: DateTime<Utc>,
    pub duration_minutes: i64,
    pub capacity: Option<i64>,
    pub enable_waitlist: bool,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 系列内的单次预约关联
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSeriesItem {
    pub id: i64,
    pub series_id: i64,
    pub booking_id: i64,
    pub session_id: Option<i64>,
    pub occurrence_index: i64,
    pub created_at: DateTime<Utc>,
}
