use serde::{Deserialize, Serialize};

/// 一行订单记录，对应订单CSV的一行
///
/// Head / Body 是固定选项集合中的编号，Legs 是自由文本的部件号，
/// Address 是自由文本地址
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "Order number")]
    pub order_number: String,

    #[serde(rename = "Head")]
    pub head: String,

    #[serde(rename = "Body")]
    pub body: String,

    #[serde(rename = "Legs")]
    pub legs: String,

    #[serde(rename = "Address")]
    pub address: String,
}

impl Order {
    /// 收据PDF文件名（不含目录）
    pub fn receipt_pdf_name(&self) -> String {
        format!("order_{}.pdf", self.order_number)
    }

    /// 截图文件名（不含目录）
    pub fn screenshot_name(&self) -> String {
        format!("{}.png", self.order_number)
    }

    /// Body 选项对应的页面点击目标选择器
    pub fn body_option_selector(&self) -> String {
        format!("#id-body-{}", self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order {
            order_number: "1".to_string(),
            head: "2".to_string(),
            body: "3".to_string(),
            legs: "piece-123".to_string(),
            address: "Street 1".to_string(),
        }
    }

    #[test]
    fn test_receipt_pdf_name() {
        assert_eq!(sample_order().receipt_pdf_name(), "order_1.pdf");
    }

    #[test]
    fn test_screenshot_name() {
        assert_eq!(sample_order().screenshot_name(), "1.png");
    }

    #[test]
    fn test_body_option_selector() {
        assert_eq!(sample_order().body_option_selector(), "#id-body-3");
    }
}
