//! # Robot Order Submit
//!
//! 一个自动向 RobotSpareBin Industries 提交机器人订单的 Rust 应用程序：
//! 下载订单CSV，逐个通过网页表单下单，把收据保存成PDF（附带机器人
//! 截图页），最后把全部收据打包成压缩文件。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PageDriver` - 唯一的 page owner，提供 eval / 点击 / 填表 / 截图能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个 Order
//! - `OrderFeed` - 下载并解析订单CSV能力
//! - `ReceiptPdf` - 收据HTML转PDF、追加截图页能力
//! - `ReceiptArchiver` - 收据PDF打包能力
//! - `FailureLog` - 写失败订单清单能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个订单"的完整处理流程
//! - `OrderCtx` - 上下文封装（order_number + order_index）
//! - `OrderFlow` - 流程编排（关弹窗 → 填表 → 提交 → 收据 → 重置）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量订单处理器，管理资源和归档
//! - `orchestrator/order_processor` - 单个订单处理器，负责失败隔离
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{connect_to_browser_and_page, launch_headless_browser};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::PageDriver;
pub use models::Order;
pub use orchestrator::{process_order, App};
pub use workflow::{OrderCtx, OrderFlow};
