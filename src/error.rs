use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 浏览器相关错误
    Browser(BrowserError),
    /// 订单数据源错误
    Feed(FeedError),
    /// 订单提交错误
    Order(OrderError),
    /// 收据生成错误
    Receipt(ReceiptError),
    /// 压缩归档错误
    Archive(ArchiveError),
    /// 文件操作错误
    File(FileError),
    /// 其他错误（用于包装第三方库错误）
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Browser(e) => write!(f, "浏览器错误: {}", e),
            AppError::Feed(e) => write!(f, "订单数据源错误: {}", e),
            AppError::Order(e) => write!(f, "订单提交错误: {}", e),
            AppError::Receipt(e) => write!(f, "收据生成错误: {}", e),
            AppError::Archive(e) => write!(f, "归档错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Browser(e) => Some(e),
            AppError::Feed(e) => Some(e),
            AppError::Order(e) => Some(e),
            AppError::Receipt(e) => Some(e),
            AppError::Archive(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 浏览器相关错误
#[derive(Debug)]
pub enum BrowserError {
    /// 连接浏览器失败
    ConnectionFailed {
        port: u16,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 启动无头浏览器失败
    LaunchFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 创建页面失败
    PageCreationFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 导航失败
    NavigationFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 执行脚本失败
    ScriptExecutionFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserError::ConnectionFailed { port, source } => {
                write!(f, "无法连接到浏览器 (端口: {}): {}", port, source)
            }
            BrowserError::LaunchFailed { source } => {
                write!(f, "启动无头浏览器失败: {}", source)
            }
            BrowserError::PageCreationFailed { source } => {
                write!(f, "创建页面失败: {}", source)
            }
            BrowserError::NavigationFailed { url, source } => {
                write!(f, "导航到 {} 失败: {}", url, source)
            }
            BrowserError::ScriptExecutionFailed { source } => {
                write!(f, "执行脚本失败: {}", source)
            }
        }
    }
}

impl std::error::Error for BrowserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BrowserError::ConnectionFailed { source, .. }
            | BrowserError::LaunchFailed { source }
            | BrowserError::PageCreationFailed { source }
            | BrowserError::NavigationFailed { source, .. }
            | BrowserError::ScriptExecutionFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 订单数据源错误
#[derive(Debug)]
pub enum FeedError {
    /// 下载订单CSV失败
    DownloadFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务端返回错误状态码
    BadStatus {
        url: String,
        status: u16,
    },
    /// CSV 解析失败
    ParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::DownloadFailed { url, source } => {
                write!(f, "下载订单CSV失败 ({}): {}", url, source)
            }
            FeedError::BadStatus { url, status } => {
                write!(f, "下载订单CSV返回错误状态码 ({}): {}", url, status)
            }
            FeedError::ParseFailed { path, source } => {
                write!(f, "CSV解析失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::DownloadFailed { source, .. } | FeedError::ParseFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 订单提交错误
#[derive(Debug)]
pub enum OrderError {
    /// Body 选项在页面上不存在
    UnknownBodyOption {
        order_number: String,
        body: String,
    },
    /// 多次点击提交后收据元素仍未出现
    SubmitTimeout {
        order_number: String,
        attempts: usize,
    },
    /// 表单字段不存在
    FormFieldMissing {
        order_number: String,
        selector: String,
    },
}

impl fmt::Display for OrderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderError::UnknownBodyOption { order_number, body } => {
                write!(
                    f,
                    "订单 {} 的 Body 选项 '{}' 在页面上不存在",
                    order_number, body
                )
            }
            OrderError::SubmitTimeout {
                order_number,
                attempts,
            } => {
                write!(
                    f,
                    "订单 {} 提交 {} 次后收据仍未出现",
                    order_number, attempts
                )
            }
            OrderError::FormFieldMissing {
                order_number,
                selector,
            } => {
                write!(
                    f,
                    "订单 {} 的表单字段不存在: {}",
                    order_number, selector
                )
            }
        }
    }
}

impl std::error::Error for OrderError {}

/// 收据生成错误
#[derive(Debug)]
pub enum ReceiptError {
    /// 等待收据元素超时
    ConfirmationTimeout {
        order_number: String,
        timeout_ms: u64,
    },
    /// 提取收据HTML失败
    HtmlExtractFailed {
        order_number: String,
    },
    /// PDF 渲染失败
    PdfRenderFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 截图失败
    ScreenshotFailed {
        selector: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 向 PDF 追加截图页失败
    ImageAppendFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ReceiptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceiptError::ConfirmationTimeout {
                order_number,
                timeout_ms,
            } => {
                write!(
                    f,
                    "订单 {} 等待收据元素超时 ({} ms)",
                    order_number, timeout_ms
                )
            }
            ReceiptError::HtmlExtractFailed { order_number } => {
                write!(f, "订单 {} 提取收据HTML失败", order_number)
            }
            ReceiptError::PdfRenderFailed { path, source } => {
                write!(f, "PDF渲染失败 ({}): {}", path, source)
            }
            ReceiptError::ScreenshotFailed { selector, source } => {
                write!(f, "截图失败 ({}): {}", selector, source)
            }
            ReceiptError::ImageAppendFailed { path, source } => {
                write!(f, "向PDF追加截图页失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for ReceiptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReceiptError::PdfRenderFailed { source, .. }
            | ReceiptError::ScreenshotFailed { source, .. }
            | ReceiptError::ImageAppendFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 压缩归档错误
#[derive(Debug)]
pub enum ArchiveError {
    /// 读取收据目录失败
    ReadDirFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入压缩包失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveError::ReadDirFailed { path, source } => {
                write!(f, "读取收据目录失败 ({}): {}", path, source)
            }
            ArchiveError::WriteFailed { path, source } => {
                write!(f, "写入压缩包失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArchiveError::ReadDirFailed { source, .. }
            | ArchiveError::WriteFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 文件不存在
    NotFound {
        path: String,
    },
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 创建目录失败
    CreateDirFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::NotFound { path } => write!(f, "文件不存在: {}", path),
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path, source)
            }
            FileError::CreateDirFailed { path, source } => {
                write!(f, "创建目录失败 ({}): {}", path, source)
            }
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. }
            | FileError::WriteFailed { source, .. }
            | FileError::CreateDirFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

// ========== 从常见错误类型转换 ==========
// 注意：不需要手动实现 From<AppError> for anyhow::Error，
// 因为 anyhow 已经为所有实现了 std::error::Error 的类型提供了自动实现

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        })
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Feed(FeedError::ParseFailed {
            path: String::new(), // CSV错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::Archive(ArchiveError::WriteFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<lopdf::Error> for AppError {
    fn from(err: lopdf::Error) -> Self {
        AppError::Receipt(ReceiptError::ImageAppendFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(port: u16, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Browser(BrowserError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    /// 创建CSV下载错误
    pub fn feed_download_failed(url: impl Into<String>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        AppError::Feed(FeedError::DownloadFailed {
            url: url.into(),
            source: Box::new(source),
        })
    }

    /// 创建Body选项不存在错误
    pub fn unknown_body_option(order_number: impl Into<String>, body: impl Into<String>) -> Self {
        AppError::Order(OrderError::UnknownBodyOption {
            order_number: order_number.into(),
            body: body.into(),
        })
    }

    /// 创建提交超时错误
    pub fn submit_timeout(order_number: impl Into<String>, attempts: usize) -> Self {
        AppError::Order(OrderError::SubmitTimeout {
            order_number: order_number.into(),
            attempts,
        })
    }

    /// 创建收据等待超时错误
    pub fn confirmation_timeout(order_number: impl Into<String>, timeout_ms: u64) -> Self {
        AppError::Receipt(ReceiptError::ConfirmationTimeout {
            order_number: order_number.into(),
            timeout_ms,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
