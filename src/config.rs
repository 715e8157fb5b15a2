/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 订单CSV下载地址
    pub orders_csv_url: String,
    /// 订单CSV本地保存路径
    pub orders_csv_path: String,
    /// 下单网站地址
    pub target_url: String,
    /// 输出根目录
    pub output_dir: String,
    /// 收据PDF存放目录
    pub receipts_dir: String,
    /// 收据压缩包输出路径
    pub archive_path: String,
    /// 失败订单清单文件
    pub failed_orders_file: String,
    /// 浏览器调试端口（设置后连接现有浏览器，否则启动无头浏览器）
    pub browser_debug_port: Option<u16>,
    /// 浏览器可执行文件路径（无头模式可选）
    pub chrome_executable: Option<String>,
    /// 提交按钮最大点击次数
    pub max_submit_attempts: usize,
    /// 两次提交之间的等待毫秒数
    pub submit_retry_delay_ms: u64,
    /// 等待收据元素出现的超时毫秒数
    pub receipt_wait_timeout_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            orders_csv_url: "https://robotsparebinindustries.com/orders.csv".to_string(),
            orders_csv_path: "orders.csv".to_string(),
            target_url: "https://robotsparebinindustries.com/#/robot-order".to_string(),
            output_dir: "output".to_string(),
            receipts_dir: "output/receipts".to_string(),
            archive_path: "output/receipts.zip".to_string(),
            failed_orders_file: "output/failed_orders.txt".to_string(),
            browser_debug_port: None,
            chrome_executable: None,
            max_submit_attempts: 10,
            submit_retry_delay_ms: 500,
            receipt_wait_timeout_ms: 10_000,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            orders_csv_url: std::env::var("ORDERS_CSV_URL").unwrap_or(default.orders_csv_url),
            orders_csv_path: std::env::var("ORDERS_CSV_PATH").unwrap_or(default.orders_csv_path),
            target_url: std::env::var("TARGET_URL").unwrap_or(default.target_url),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            receipts_dir: std::env::var("RECEIPTS_DIR").unwrap_or(default.receipts_dir),
            archive_path: std::env::var("ARCHIVE_PATH").unwrap_or(default.archive_path),
            failed_orders_file: std::env::var("FAILED_ORDERS_FILE").unwrap_or(default.failed_orders_file),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok(),
            max_submit_attempts: std::env::var("MAX_SUBMIT_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_submit_attempts),
            submit_retry_delay_ms: std::env::var("SUBMIT_RETRY_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.submit_retry_delay_ms),
            receipt_wait_timeout_ms: std::env::var("RECEIPT_WAIT_TIMEOUT_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.receipt_wait_timeout_ms),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}
