use serde::Deserialize;

// 接受补位邀请请求
#[derive(Debug, Clone, Deserialize)]
pub struct AcceptOfferRequest {
    pub student_user_id: i64,
}

// 退出候补请求
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveWaitlistRequest {
    pub student_user_id: i64,
}
