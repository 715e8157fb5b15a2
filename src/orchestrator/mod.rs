//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责整个批次的调度，是系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量订单处理器
//! - 管理应用生命周期（初始化、运行、归档）
//! - 下载并加载订单列表（Vec<Order>）
//! - 管理浏览器资源（Browser、PageDriver）
//! - 输出全局统计信息
//!
//! ### `order_processor` - 单个订单处理器
//! - 委托 OrderFlow 处理单个订单
//! - 失败隔离：一个订单失败不影响后续订单
//! - 失败时写入清单并恢复页面状态
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<Order>)
//!     ↓
//! order_processor (处理单个 Order，负责失败隔离)
//!     ↓
//! workflow::OrderFlow (订单的完整流程)
//!     ↓
//! services (能力层：feed / pdf / archive / failure_log)
//!     ↓
//! infrastructure (基础设施：PageDriver)
//! ```

pub mod batch_processor;
pub mod order_processor;

// 重新导出主要类型
pub use batch_processor::App;
pub use order_processor::process_order;
