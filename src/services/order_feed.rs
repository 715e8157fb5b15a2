//! 订单数据源服务 - 业务能力层
//!
//! 只负责"下载并解析订单CSV"能力，不关心流程

use crate::config::Config;
use crate::error::{AppError, FeedError};
use crate::models::order::Order;
use crate::models::loaders::load_orders_from_file;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// 订单数据源服务
///
/// 职责：
/// - 从固定URL下载订单CSV（总是覆盖本地副本）
/// - 解析为有序的订单列表
/// - 下载或解析失败时让整个运行失败，不接受部分订单列表
pub struct OrderFeed {
    url: String,
    local_path: String,
}

impl OrderFeed {
    /// 创建新的订单数据源服务
    pub fn new(config: &Config) -> Self {
        Self {
            url: config.orders_csv_url.clone(),
            local_path: config.orders_csv_path.clone(),
        }
    }

    /// 下载订单CSV，覆盖任何已存在的本地副本
    ///
    /// 覆盖是强制的，绝不能使用过期的本地副本
    pub async fn download(&self) -> Result<()> {
        info!("⬇️ 正在下载订单CSV: {}", self.url);

        let response = reqwest::get(&self.url)
            .await
            .map_err(|e| AppError::feed_download_failed(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Feed(FeedError::BadStatus {
                url: self.url.clone(),
                status: status.as_u16(),
            })
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::feed_download_failed(&self.url, e))?;

        fs::write(&self.local_path, &bytes)
            .await
            .with_context(|| format!("无法写入订单CSV: {}", self.local_path))?;

        debug!("订单CSV已保存: {} ({} 字节)", self.local_path, bytes.len());
        Ok(())
    }

    /// 解析本地订单CSV
    pub async fn load(&self) -> Result<Vec<Order>> {
        load_orders_from_file(Path::new(&self.local_path)).await
    }

    /// 下载并解析订单列表
    pub async fn fetch_orders(&self) -> Result<Vec<Order>> {
        self.download().await?;
        let orders = self.load().await?;
        info!("✓ 订单CSV解析完成，共 {} 个订单", orders.len());
        Ok(orders)
    }
}
