//! 庫存警戒通知介面

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 警示等級
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertSeverity {
    /// 觸及警戒線
    Warning,
    /// 庫存歸零
    Critical,
}

/// 警戒線穿越事件
///
/// 在某次扣帳使庫存由警戒線之上降到線上（或以下）時發出一次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdAlert {
    /// 食材ID
    pub ingredient_id: String,

    /// 扣帳後庫存
    pub quantity_on_hand: Decimal,

    /// 警戒線
    pub alert_threshold: Decimal,

    /// 警示等級
    pub severity: AlertSeverity,
}

/// 通知服務介面（email/簡訊/推播等皆在此介面之後）
///
/// 送出僅盡力而為：失敗由呼叫方記錄後忽略，絕不讓扣帳失敗
pub trait AlertSink: Send + Sync {
    fn notify(&self, alert: &ThresholdAlert) -> std::result::Result<(), String>;
}

/// 不做任何事的通知端（預設）
pub struct NullAlertSink;

impl AlertSink for NullAlertSink {
    fn notify(&self, _alert: &ThresholdAlert) -> std::result::Result<(), String> {
        Ok(())
    }
}
