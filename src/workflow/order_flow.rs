//! 订单处理流程 - 流程层
//!
//! 核心职责：定义"一个订单"的完整处理流程
//!
//! 流程顺序：
//! 1. 关闭弹窗（幂等）
//! 2. 填写表单（Head / Body / Legs / Address）
//! 3. 有界重试提交，直到收据出现
//! 4. 生成收据PDF并追加机器人截图页
//! 5. 点击 "Order another robot" 重置页面

use std::time::Duration;

use anyhow::Result;
use chromiumoxide::Browser;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, OrderError, ReceiptError};
use crate::infrastructure::PageDriver;
use crate::models::order::Order;
use crate::services::ReceiptPdf;
use crate::workflow::order_ctx::OrderCtx;

/// Legs 输入框的 placeholder 文本，页面上该输入框没有稳定的 id
const LEGS_PLACEHOLDER: &str = "Enter the part number for the legs";
/// 收据容器选择器
const RECEIPT_SELECTOR: &str = "#receipt";
/// 机器人预览图选择器
const PREVIEW_IMAGE_SELECTOR: &str = "#robot-preview-image";

/// 订单处理流程
///
/// - 编排完整的订单处理流程
/// - 决定何时填表、何时提交、何时截图
/// - 不持有任何资源（page / browser 由调用方传入）
/// - 只依赖业务能力（services）
pub struct OrderFlow {
    receipt_pdf: ReceiptPdf,
    receipts_dir: String,
    target_url: String,
    max_submit_attempts: usize,
    submit_retry_delay_ms: u64,
    receipt_wait_timeout_ms: u64,
    verbose_logging: bool,
}

impl OrderFlow {
    /// 创建新的订单处理流程
    pub fn new(config: &Config) -> Self {
        Self {
            receipt_pdf: ReceiptPdf::new(),
            receipts_dir: config.receipts_dir.clone(),
            target_url: config.target_url.clone(),
            max_submit_attempts: config.max_submit_attempts,
            submit_retry_delay_ms: config.submit_retry_delay_ms,
            receipt_wait_timeout_ms: config.receipt_wait_timeout_ms,
            verbose_logging: config.verbose_logging,
        }
    }

    /// 处理单个订单的完整流程
    pub async fn run(
        &self,
        driver: &PageDriver,
        browser: &Browser,
        order: &Order,
        ctx: &OrderCtx,
    ) -> Result<()> {
        self.dismiss_modal(driver, ctx).await;
        self.fill_form(driver, order, ctx).await?;
        self.submit_until_receipt(driver, order, ctx).await?;
        self.capture_receipt(driver, browser, order, ctx).await?;
        self.reset_for_next_order(driver, ctx).await?;
        Ok(())
    }

    /// 关闭拦路弹窗
    ///
    /// 幂等操作：弹窗不一定每次都出现，不存在或点击失败都不算错误
    async fn dismiss_modal(&self, driver: &PageDriver, ctx: &OrderCtx) {
        match driver.click_button_by_text("OK").await {
            Ok(true) => info!("[订单 {}] ✓ 已关闭弹窗", ctx.order_index),
            Ok(false) => debug!("[订单 {}] 弹窗未出现，无需关闭", ctx.order_index),
            Err(e) => warn!("[订单 {}] ⚠️ 关闭弹窗失败（忽略）: {}", ctx.order_index, e),
        }
    }

    /// 填写订单表单
    async fn fill_form(&self, driver: &PageDriver, order: &Order, ctx: &OrderCtx) -> Result<()> {
        info!("[订单 {}] 📝 正在填写订单表单...", ctx.order_index);

        if self.verbose_logging {
            debug!(
                "[订单 {}] Head: {} | Body: {} | Legs: {} | Address: {}",
                ctx.order_index, order.head, order.body, order.legs, order.address
            );
        }

        // Head 下拉框
        if !driver.select_option("#head", &order.head).await? {
            return Err(self.field_missing(order, "#head"));
        }

        // Body 单选项：点击前先确认选项存在，值不合法时报错而不是卡死
        let body_selector = order.body_option_selector();
        if !driver.exists(&body_selector).await? {
            return Err(AppError::unknown_body_option(&order.order_number, &order.body).into());
        }
        driver.click(&body_selector).await?;

        // Legs 部件号和地址
        if !driver.fill_by_placeholder(LEGS_PLACEHOLDER, &order.legs).await? {
            return Err(self.field_missing(order, LEGS_PLACEHOLDER));
        }
        if !driver.fill("#address", &order.address).await? {
            return Err(self.field_missing(order, "#address"));
        }

        info!("[订单 {}] ✓ 表单填写完成", ctx.order_index);
        Ok(())
    }

    /// 点击 Order 按钮直到收据出现
    ///
    /// 网站偶尔会随机拒绝提交，所以需要重试；重试次数有上限，
    /// 避免提交被持续拒绝时死循环
    async fn submit_until_receipt(
        &self,
        driver: &PageDriver,
        order: &Order,
        ctx: &OrderCtx,
    ) -> Result<()> {
        for attempt in 1..=self.max_submit_attempts {
            let clicked = driver.click_button_by_text("Order").await?;
            if !clicked {
                // 提交按钮可能被重新出现的弹窗挡住
                self.dismiss_modal(driver, ctx).await;
            }

            sleep(Duration::from_millis(self.submit_retry_delay_ms)).await;

            if driver.exists(RECEIPT_SELECTOR).await? {
                info!(
                    "[订单 {}] ✓ 第 {} 次提交后收据已出现",
                    ctx.order_index, attempt
                );
                return Ok(());
            }

            warn!(
                "[订单 {}] ⚠️ 第 {}/{} 次提交后收据未出现，重试...",
                ctx.order_index, attempt, self.max_submit_attempts
            );
        }

        Err(AppError::submit_timeout(&order.order_number, self.max_submit_attempts).into())
    }

    /// 提取收据并生成PDF（正文一页 + 截图一页）
    async fn capture_receipt(
        &self,
        driver: &PageDriver,
        browser: &Browser,
        order: &Order,
        ctx: &OrderCtx,
    ) -> Result<()> {
        // 有界等待收据元素挂载，超时直接报错，与提交阶段的重试是两种不同策略
        let attached = driver
            .wait_for_attached(RECEIPT_SELECTOR, self.receipt_wait_timeout_ms)
            .await?;
        if !attached {
            return Err(
                AppError::confirmation_timeout(&order.order_number, self.receipt_wait_timeout_ms)
                    .into(),
            );
        }

        let receipt_html = driver
            .inner_html(RECEIPT_SELECTOR)
            .await?
            .ok_or_else(|| {
                AppError::Receipt(ReceiptError::HtmlExtractFailed {
                    order_number: order.order_number.clone(),
                })
            })?;

        let pdf_path = format!("{}/{}", self.receipts_dir, order.receipt_pdf_name());
        info!("[订单 {}] 🧾 正在生成收据PDF...", ctx.order_index);
        self.receipt_pdf
            .html_to_pdf(browser, &receipt_html, &pdf_path)
            .await?;

        let png_path = format!("{}/{}", self.receipts_dir, order.screenshot_name());
        info!("[订单 {}] 📷 正在截取机器人预览图...", ctx.order_index);
        driver
            .screenshot_element(PREVIEW_IMAGE_SELECTOR, &png_path)
            .await
            .map_err(|e| {
                AppError::Receipt(ReceiptError::ScreenshotFailed {
                    selector: PREVIEW_IMAGE_SELECTOR.to_string(),
                    source: e.into(),
                })
            })?;

        self.receipt_pdf.append_image_page(&pdf_path, &png_path)?;

        info!("[订单 {}] ✓ 收据PDF已生成: {}", ctx.order_index, pdf_path);
        Ok(())
    }

    /// 点击 "Order another robot" 重置页面，供下一个订单使用
    async fn reset_for_next_order(&self, driver: &PageDriver, ctx: &OrderCtx) -> Result<()> {
        let clicked = driver.click_button_by_text("Order another robot").await?;
        if clicked {
            info!("[订单 {}] ✓ 页面已重置", ctx.order_index);
        } else {
            // 收据已经保存，重置失败不应让本订单失败，重新导航兜底
            warn!(
                "[订单 {}] ⚠️ 未找到重置按钮，重新导航到下单页面",
                ctx.order_index
            );
            driver.goto(&self.target_url).await?;
        }
        Ok(())
    }

    /// 构造表单字段缺失错误
    fn field_missing(&self, order: &Order, selector: &str) -> anyhow::Error {
        AppError::Order(OrderError::FormFieldMissing {
            order_number: order.order_number.clone(),
            selector: selector.to_string(),
        })
        .into()
    }
}
