//! 单个订单处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责单个订单的端到端处理，是订单级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **流程调度**：委托 `OrderFlow` 执行完整流程
//! 2. **失败隔离**：一个订单失败只记录清单，不中断批次
//! 3. **状态恢复**：失败后重新导航到下单页面，避免残留表单
//!    影响后续订单

use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::models::order::Order;
use crate::services::FailureLog;
use crate::workflow::{OrderCtx, OrderFlow};
use anyhow::{Context, Result};
use chromiumoxide::Browser;
use tracing::{error, info};

/// 处理单个订单
///
/// # 参数
/// - `driver`: 页面驱动器（持有 page）
/// - `browser`: 浏览器句柄（渲染PDF需要临时页）
/// - `flow`: 订单处理流程（复用）
/// - `failure_log`: 失败订单清单
/// - `order`: 订单数据
/// - `ctx`: 订单上下文（用于日志）
/// - `config`: 配置
///
/// # 返回
/// 订单处理成功返回 true；订单失败但批次可以继续返回 false；
/// 页面状态无法恢复时返回错误，中止整个批次
pub async fn process_order(
    driver: &PageDriver,
    browser: &Browser,
    flow: &OrderFlow,
    failure_log: &FailureLog,
    order: &Order,
    ctx: &OrderCtx,
    config: &Config,
) -> Result<bool> {
    log_order_start(ctx);

    match flow.run(driver, browser, order, ctx).await {
        Ok(()) => {
            info!("[订单 {}] ✅ 订单处理完成\n", ctx.order_index);
            Ok(true)
        }
        Err(e) => {
            error!("[订单 {}] ❌ 订单处理失败: {}", ctx.order_index, e);

            // 写入失败清单，清单写不进去也不中断批次
            if let Err(log_err) = failure_log.write(&ctx.order_number, &e.to_string()).await {
                error!(
                    "[订单 {}] 写入失败订单清单失败: {}",
                    ctx.order_index, log_err
                );
            }

            // 恢复页面状态；连页面都恢复不了时继续批次没有意义
            driver
                .goto(&config.target_url)
                .await
                .context("订单失败后恢复页面状态失败")?;

            Ok(false)
        }
    }
}

// ========== 日志辅助函数 ==========

fn log_order_start(ctx: &OrderCtx) {
    info!("\n{}", "─".repeat(30));
    info!(
        "[订单 {}] 开始处理 (订单号: {}, 共 {} 个)",
        ctx.order_index, ctx.order_number, ctx.total_orders
    );
}
