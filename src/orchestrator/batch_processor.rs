//! 批量订单处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量订单的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：创建输出目录、初始化日志、启动/连接浏览器
//! 2. **批量加载**：下载并解析订单CSV（`Vec<Order>`）
//! 3. **串行处理**：同一个页面句柄不允许并发使用，逐个处理订单
//! 4. **资源管理**：持有 Browser 和 PageDriver，确保生命周期正确
//! 5. **收据归档**：全部订单完成后把收据PDF打包成压缩文件
//! 6. **全局统计**：汇总所有订单的处理结果

use crate::browser;
use crate::config::Config;
use crate::error::{AppError, FileError};
use crate::infrastructure::PageDriver;
use crate::models::Order;
use crate::orchestrator::order_processor;
use crate::services::{FailureLog, OrderFeed, ReceiptArchiver};
use crate::utils::logging;
use crate::workflow::{OrderCtx, OrderFlow};
use anyhow::Result;
use chromiumoxide::Browser;
use std::fs;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    browser: Browser,
    driver: PageDriver,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 创建输出目录
        init_output_dirs(&config)?;

        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        log_startup(&config);

        // 启动或连接浏览器
        let (browser, page) = match config.browser_debug_port {
            Some(port) => browser::connect_to_browser_and_page(port, &config.target_url).await?,
            None => {
                browser::launch_headless_browser(
                    &config.target_url,
                    config.chrome_executable.as_deref(),
                )
                .await?
            }
        };

        // 创建 PageDriver（持有 page）
        let driver = PageDriver::new(page);

        Ok(Self {
            config,
            browser,
            driver,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 下载并解析订单列表（失败则整个运行失败，不接受部分订单）
        let orders = self.load_orders().await?;

        if orders.is_empty() {
            warn!("⚠️ 订单CSV为空，没有需要处理的订单");
        } else {
            log_orders_loaded(orders.len());
        }

        // 处理所有订单
        let stats = self.process_all_orders(&orders).await?;

        // 归档收据（空目录只告警，不算失败）
        let archiver = ReceiptArchiver::new(self.config.archive_path.clone());
        let archive = archiver.build(&self.config.receipts_dir)?;

        // 输出最终统计
        print_final_stats(&stats, archive.is_some(), &self.config);

        Ok(())
    }

    /// 下载并解析订单
    async fn load_orders(&self) -> Result<Vec<Order>> {
        info!("\n📁 正在获取订单列表...");
        let feed = OrderFeed::new(&self.config);
        feed.fetch_orders().await
    }

    /// 逐个处理所有订单
    ///
    /// 严格串行：页面句柄是唯一的共享可变资源，一个订单的失败
    /// 通过 order_processor 隔离，不影响后续订单
    async fn process_all_orders(&self, orders: &[Order]) -> Result<ProcessingStats> {
        let total_orders = orders.len();
        let mut stats = ProcessingStats {
            total: total_orders,
            ..Default::default()
        };

        // 流程对象和失败清单只创建一次，复用
        let flow = OrderFlow::new(&self.config);
        let failure_log = FailureLog::new(self.config.failed_orders_file.clone());

        for (index, order) in orders.iter().enumerate() {
            let ctx = OrderCtx::new(order.order_number.clone(), index + 1, total_orders);

            match order_processor::process_order(
                &self.driver,
                &self.browser,
                &flow,
                &failure_log,
                order,
                &ctx,
                &self.config,
            )
            .await
            {
                Ok(true) => {
                    stats.success += 1;
                }
                Ok(false) => {
                    stats.failed += 1;
                }
                Err(e) => {
                    error!("[订单 {}] 批次无法继续: {}", ctx.order_index, e);
                    return Err(e);
                }
            }
        }

        Ok(stats)
    }
}

/// 处理统计
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

/// 创建输出目录（收据目录及其父目录）
fn init_output_dirs(config: &Config) -> Result<()> {
    fs::create_dir_all(&config.receipts_dir).map_err(|e| {
        AppError::File(FileError::CreateDirFailed {
            path: config.receipts_dir.clone(),
            source: Box::new(e),
        })
    })?;
    Ok(())
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 机器人订单自动提交");
    info!("🌐 下单网站: {}", config.target_url);
    info!("📄 订单CSV: {}", config.orders_csv_url);
    info!("{}", "=".repeat(60));
}

fn log_orders_loaded(total: usize) {
    info!("✓ 找到 {} 个待提交的订单", total);
    info!("💡 订单将逐个串行提交\n");
}

fn print_final_stats(stats: &ProcessingStats, archived: bool, config: &Config) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.success, stats.total);
    info!("❌ 失败: {}", stats.failed);
    if stats.failed > 0 {
        info!("📋 失败订单清单: {}", config.failed_orders_file);
    }
    if archived {
        info!("📦 收据压缩包: {}", config.archive_path);
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", config.output_log_file);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_output_dirs_is_idempotent() {
        let dir = tempfile::tempdir().expect("创建临时目录");
        let mut config = Config::default();
        config.receipts_dir = dir
            .path()
            .join("output/receipts")
            .to_str()
            .unwrap()
            .to_string();

        init_output_dirs(&config).expect("第一次创建");
        init_output_dirs(&config).expect("重复创建");
        assert!(std::path::Path::new(&config.receipts_dir).is_dir());
    }
}
