//! 失败订单清单服务 - 业务能力层
//!
//! 只负责"记录失败订单"能力，不关心流程

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

/// 失败订单清单服务
///
/// 职责：
/// - 把处理失败的订单号和原因追加到清单文件
/// - 只处理单个订单的记录
/// - 不出现 Vec<Order>
/// - 不关心流程顺序
pub struct FailureLog {
    file_path: String,
}

impl FailureLog {
    /// 创建新的失败订单清单服务
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    /// 记录一个失败的订单
    ///
    /// # 参数
    /// - `order_number`: 订单号
    /// - `reason`: 失败原因
    pub async fn write(&self, order_number: &str, reason: &str) -> Result<()> {
        debug!("记录失败订单: {} | 原因: {}", order_number, reason);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;

        let line = format!("订单 {} | 原因: {}\n", order_number, reason);
        file.write_all(line.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_appends_lines() {
        let dir = tempfile::tempdir().expect("创建临时目录");
        let path = dir.path().join("failed_orders.txt");
        let log = FailureLog::new(path.to_str().unwrap());

        log.write("7", "提交超时").await.expect("写入失败订单");
        log.write("9", "Body 选项不存在").await.expect("写入失败订单");

        let content = std::fs::read_to_string(&path).expect("读取清单");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("订单 7"));
        assert!(lines[1].contains("订单 9"));
    }
}
