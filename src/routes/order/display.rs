use serde::{Deserialize, Serialize};

use super::model::OrderStatus;

/// 订单列表的状态页签
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTab {
    #[default]
    All,
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl StatusTab {
    pub const ALL: [StatusTab; 5] = [
        StatusTab::All,
        StatusTab::Pending,
        StatusTab::Processing,
        StatusTab::Completed,
        StatusTab::Cancelled,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatusTab::All => "全部",
            StatusTab::Pending => "待处理",
            StatusTab::Processing => "处理中",
            StatusTab::Completed => "已完成",
            StatusTab::Cancelled => "已取消",
        }
    }

    /// 页签对应的订单状态；`Cancelled` 落在服务端的 `failed` 上
    pub fn status(self) -> Option<OrderStatus> {
        match self {
            StatusTab::All => None,
            StatusTab::Pending => Some(OrderStatus::Pending),
            StatusTab::Processing => Some(OrderStatus::Processing),
            StatusTab::Completed => Some(OrderStatus::Completed),
            StatusTab::Cancelled => Some(OrderStatus::Failed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTone {
    Success,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusDisplay {
    pub label: String,
    pub tone: StatusTone,
}

pub fn status_display(status: &str) -> StatusDisplay {
    let (label, tone) = match status {
        "completed" => ("支付成功", StatusTone::Success),
        "pending" => ("待处理", StatusTone::Normal),
        "processing" => ("处理中", StatusTone::Normal),
        "cancelled" => ("已取消", StatusTone::Normal),
        "failed" => ("支付失败", StatusTone::Normal),
        other => (other, StatusTone::Normal),
    };
    StatusDisplay {
        label: label.to_string(),
        tone,
    }
}
