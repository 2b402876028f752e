//! 时间工具函数: 业务时区转换
//!
//! 存储层只保存 `i64` Unix millis；日期边界 (取号、时段、报表) 统一按业务时区计算。

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// 当前时间 (业务时区)
pub fn now_in(tz: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz)
}

/// 解析时区名称 (IANA)，失败返回 UTC
pub fn parse_timezone(name: &str) -> Tz {
    name.parse().unwrap_or_else(|e| {
        tracing::warn!("Failed to parse timezone '{}': {}, falling back to UTC", name, e);
        Tz::UTC
    })
}

/// 日期开始 (00:00:00) → Unix millis (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    naive
        .and_local_timezone(tz)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// 日期结束 → 次日 00:00:00 的 Unix millis (业务时区)
///
/// 返回次日零点时间戳，调用方使用 `< end` (不含) 语义。
pub fn day_end_millis(date: NaiveDate, tz: Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

/// Unix millis → 业务时区日期
pub fn millis_to_date(millis: i64, tz: Tz) -> NaiveDate {
    tz.timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.date_naive())
        .unwrap_or_else(|| now_in(tz).date_naive())
}

/// 取号日期键 (YYYYMMDD)
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
