//! 页面驱动器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露页面操作能力

use std::time::Duration;

use anyhow::Result;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::time::sleep;
use tracing::debug;

/// 查询元素是否存在的轮询间隔
const POLL_INTERVAL_MS: u64 = 100;

/// 页面驱动器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval / 点击 / 填表 / 截图 等能力
/// - 不认识 Order
/// - 不处理业务流程
pub struct PageDriver {
    page: Page,
}

impl PageDriver {
    /// 创建新的页面驱动器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 导航到指定 URL
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        Ok(())
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 查询选择器对应的元素是否存在于页面结构中
    pub async fn exists(&self, selector: &str) -> Result<bool> {
        let js_code = format!(
            "document.querySelector({}) !== null",
            js_string(selector)
        );
        self.eval_as::<bool>(js_code).await
    }

    /// 点击选择器对应的元素
    ///
    /// # 返回
    /// 元素存在并点击成功返回 true，元素不存在返回 false
    pub async fn click(&self, selector: &str) -> Result<bool> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                if (!el) return false;
                el.click();
                return true;
            }})()
            "#,
            js_string(selector)
        );
        self.eval_as::<bool>(js_code).await
    }

    /// 按钮文本精确匹配后点击
    ///
    /// 页面上的 OK / Order / Order another robot 按钮没有稳定的
    /// 选择器，只能按文本定位
    pub async fn click_button_by_text(&self, text: &str) -> Result<bool> {
        let js_code = format!(
            r#"
            (() => {{
                const target = Array.from(document.querySelectorAll('button'))
                    .find(b => b.textContent.trim() === {});
                if (!target) return false;
                target.click();
                return true;
            }})()
            "#,
            js_string(text)
        );
        self.eval_as::<bool>(js_code).await
    }

    /// 在下拉框中按 value 选择选项，并派发 change 事件
    pub async fn select_option(&self, selector: &str, value: &str) -> Result<bool> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                if (!el) return false;
                el.value = {};
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()
            "#,
            js_string(selector),
            js_string(value)
        );
        self.eval_as::<bool>(js_code).await
    }

    /// 向文本输入框填入内容，并派发 input 事件
    pub async fn fill(&self, selector: &str, value: &str) -> Result<bool> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                if (!el) return false;
                el.value = {};
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                return true;
            }})()
            "#,
            js_string(selector),
            js_string(value)
        );
        self.eval_as::<bool>(js_code).await
    }

    /// 按 placeholder 定位文本输入框并填入内容
    pub async fn fill_by_placeholder(&self, placeholder: &str, value: &str) -> Result<bool> {
        let selector = format!("input[placeholder=\"{}\"]", placeholder);
        self.fill(&selector, value).await
    }

    /// 提取选择器对应元素的内部 HTML
    ///
    /// # 返回
    /// 元素不存在时返回 None
    pub async fn inner_html(&self, selector: &str) -> Result<Option<String>> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                return el ? el.innerHTML : null;
            }})()
            "#,
            js_string(selector)
        );
        self.eval_as::<Option<String>>(js_code).await
    }

    /// 有界等待元素挂载到页面结构中
    ///
    /// 每 100ms 轮询一次，超时返回 false 而不是无限等待
    pub async fn wait_for_attached(&self, selector: &str, timeout_ms: u64) -> Result<bool> {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if self.exists(selector).await? {
                return Ok(true);
            }
            if tokio::time::Instant::now() >= deadline {
                debug!("等待元素 {} 超时 ({} ms)", selector, timeout_ms);
                return Ok(false);
            }
            sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    /// 截取选择器对应元素的 PNG 截图并保存到文件
    pub async fn screenshot_element(&self, selector: &str, output_path: &str) -> Result<()> {
        let element = self.page.find_element(selector).await?;
        element
            .save_screenshot(CaptureScreenshotFormat::Png, output_path)
            .await?;
        debug!("截图已保存: {}", output_path);
        Ok(())
    }
}

/// 把 Rust 字符串安全地转成 JS 字符串字面量
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_quotes() {
        assert_eq!(js_string("OK"), "\"OK\"");
        assert_eq!(js_string("a\"b"), "\"a\\\"b\"");
    }
}
