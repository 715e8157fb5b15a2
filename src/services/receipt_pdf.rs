//! 收据PDF服务 - 业务能力层
//!
//! 只负责"收据HTML转PDF"和"向PDF追加截图页"两个能力，不关心流程

use crate::error::{AppError, ReceiptError};
use anyhow::{Context, Result};
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::Browser;
use lopdf::{dictionary, Document, Object, Stream};
use tracing::debug;

/// A4 纵向页面尺寸，单位 pt
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
/// 追加截图页时四周留白，单位 pt
const PAGE_MARGIN: f32 = 36.0;

/// 收据PDF服务
///
/// 职责：
/// - 把收据HTML渲染成PDF文件
/// - 把PNG截图作为新的一页追加到PDF末尾
/// - 不出现 Vec<Order>
/// - 不关心流程顺序
pub struct ReceiptPdf;

impl ReceiptPdf {
    /// 创建新的收据PDF服务
    pub fn new() -> Self {
        Self
    }

    /// 把收据HTML渲染成PDF文件
    ///
    /// 在一个临时空白页里渲染HTML，用CDP打印成PDF，随后关闭临时页，
    /// 不污染正在下单的页面
    pub async fn html_to_pdf(&self, browser: &Browser, html: &str, output_path: &str) -> Result<()> {
        debug!("渲染收据PDF: {}", output_path);

        let render_page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| AppError::Receipt(ReceiptError::PdfRenderFailed {
                path: output_path.to_string(),
                source: Box::new(e),
            }))?;

        let document = format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head><body>{}</body></html>",
            html
        );

        let render_result = async {
            render_page.set_content(document).await?;
            render_page
                .save_pdf(PrintToPdfParams::default(), output_path)
                .await?;
            Ok::<(), chromiumoxide::error::CdpError>(())
        }
        .await;

        // 无论渲染是否成功都要关闭临时页
        let close_result = render_page.close().await;

        render_result.map_err(|e| AppError::Receipt(ReceiptError::PdfRenderFailed {
            path: output_path.to_string(),
            source: Box::new(e),
        }))?;
        close_result.context("关闭临时渲染页失败")?;

        debug!("收据PDF已保存: {}", output_path);
        Ok(())
    }

    /// 把PNG截图作为新的一页追加到PDF末尾，并原地保存
    ///
    /// 截图等比缩放到页面留白区域内，顶部对齐。文档在函数返回时
    /// 被释放，不会留下打开的句柄
    pub fn append_image_page(&self, pdf_path: &str, image_path: &str) -> Result<()> {
        let (img_width, img_height) = image::image_dimensions(image_path)
            .with_context(|| format!("无法读取截图尺寸: {}", image_path))?;

        let mut doc = Document::load(pdf_path)
            .with_context(|| format!("无法打开PDF: {}", pdf_path))?;

        let pages_id = doc
            .catalog()
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(|pages| pages.as_reference())
            .with_context(|| format!("PDF结构异常，缺少页面树: {}", pdf_path))?;

        // 等比缩放到留白区域内，不放大小图
        let max_width = PAGE_WIDTH - 2.0 * PAGE_MARGIN;
        let max_height = PAGE_HEIGHT - 2.0 * PAGE_MARGIN;
        let scale = (max_width / img_width as f32)
            .min(max_height / img_height as f32)
            .min(1.0);
        let draw_width = img_width as f32 * scale;
        let draw_height = img_height as f32 * scale;
        let pos_x = (PAGE_WIDTH - draw_width) / 2.0;
        let pos_y = PAGE_HEIGHT - PAGE_MARGIN - draw_height;

        // 新建一页空白页并挂到页面树末尾
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            "Contents" => content_id,
        });

        {
            let pages = doc
                .get_object_mut(pages_id)
                .and_then(|obj| obj.as_dict_mut())
                .context("无法访问PDF页面树")?;
            pages
                .get_mut(b"Kids")
                .and_then(|kids| kids.as_array_mut())
                .context("无法访问PDF页面列表")?
                .push(Object::Reference(page_id));
            let count = pages
                .get(b"Count")
                .and_then(|count| count.as_i64())
                .context("无法读取PDF页数")?;
            pages.set("Count", count + 1);
        }

        let image = lopdf::xobject::image(image_path).map_err(|e| {
            AppError::Receipt(ReceiptError::ImageAppendFailed {
                path: pdf_path.to_string(),
                source: Box::new(e),
            })
        })?;
        doc.insert_image(page_id, image, (pos_x, pos_y), (draw_width, draw_height))
            .map_err(|e| {
                AppError::Receipt(ReceiptError::ImageAppendFailed {
                    path: pdf_path.to_string(),
                    source: Box::new(e),
                })
            })?;

        doc.save(pdf_path)
            .with_context(|| format!("无法保存PDF: {}", pdf_path))?;

        debug!("截图页已追加: {} <- {}", pdf_path, image_path);
        Ok(())
    }
}

impl Default for ReceiptPdf {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Content;
    use std::path::Path;

    /// 构造一个最小的单页PDF用于测试
    fn write_minimal_pdf(path: &Path) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let content = Content { operations: vec![] };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("编码空内容流"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).expect("保存测试PDF");
    }

    /// 构造一个小的RGB PNG用于测试
    fn write_test_png(path: &Path) {
        let img = image::RgbImage::new(8, 4);
        img.save(path).expect("保存测试PNG");
    }

    #[test]
    fn test_append_image_page_adds_one_page() {
        let dir = tempfile::tempdir().expect("创建临时目录");
        let pdf_path = dir.path().join("order_1.pdf");
        let png_path = dir.path().join("1.png");

        write_minimal_pdf(&pdf_path);
        write_test_png(&png_path);

        let service = ReceiptPdf::new();
        service
            .append_image_page(
                pdf_path.to_str().expect("pdf路径"),
                png_path.to_str().expect("png路径"),
            )
            .expect("追加截图页");

        let doc = Document::load(&pdf_path).expect("重新打开PDF");
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_append_image_page_missing_pdf_fails() {
        let dir = tempfile::tempdir().expect("创建临时目录");
        let png_path = dir.path().join("1.png");
        write_test_png(&png_path);

        let service = ReceiptPdf::new();
        let result = service.append_image_page(
            dir.path().join("no_such.pdf").to_str().expect("pdf路径"),
            png_path.to_str().expect("png路径"),
        );
        assert!(result.is_err());
    }
}
