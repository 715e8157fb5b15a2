use robot_order_submit::models::parse_orders;
use robot_order_submit::services::{OrderFeed, ReceiptArchiver};
use robot_order_submit::utils::logging;
use robot_order_submit::{App, Config, OrderCtx, OrderFlow, PageDriver};

#[tokio::test]
#[ignore] // 默认忽略，需要浏览器环境：cargo test -- --ignored
async fn test_full_run() {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 完整运行：下载CSV → 逐个下单 → 生成收据 → 归档
    let app = App::initialize(config.clone())
        .await
        .expect("初始化应用失败");
    app.run().await.expect("运行失败");

    // 归档文件应该存在（订单CSV非空时）
    assert!(
        std::path::Path::new(&config.archive_path).is_file(),
        "收据压缩包应该已生成"
    );
}

#[tokio::test]
#[ignore]
async fn test_browser_launch() {
    logging::init();

    let config = Config::from_env();

    // 测试无头浏览器启动
    let result = robot_order_submit::launch_headless_browser(
        &config.target_url,
        config.chrome_executable.as_deref(),
    )
    .await;

    assert!(result.is_ok(), "应该能够成功启动无头浏览器");
}

#[tokio::test]
#[ignore]
async fn test_feed_download() {
    logging::init();

    let config = Config::from_env();

    // 测试订单CSV下载与解析
    let feed = OrderFeed::new(&config);
    let orders = feed.fetch_orders().await.expect("下载并解析订单CSV失败");

    println!("找到 {} 个订单", orders.len());
    for order in &orders {
        assert!(!order.order_number.is_empty(), "订单号不能为空");
    }
}

#[tokio::test]
#[ignore]
async fn test_single_order() {
    logging::init();

    let config = Config::from_env();

    // 启动浏览器并处理一个手工构造的订单
    let (browser, page) = robot_order_submit::launch_headless_browser(
        &config.target_url,
        config.chrome_executable.as_deref(),
    )
    .await
    .expect("启动无头浏览器失败");

    let driver = PageDriver::new(page);
    let flow = OrderFlow::new(&config);

    let csv = "Order number,Head,Body,Legs,Address\n1,2,3,piece-123,Street 1\n";
    let orders = parse_orders(csv.as_bytes()).expect("解析CSV失败");
    let ctx = OrderCtx::new(orders[0].order_number.clone(), 1, orders.len());

    std::fs::create_dir_all(&config.receipts_dir).expect("创建收据目录失败");

    flow.run(&driver, &browser, &orders[0], &ctx)
        .await
        .expect("处理订单失败");

    let pdf_path = std::path::Path::new(&config.receipts_dir).join("order_1.pdf");
    assert!(pdf_path.is_file(), "收据PDF应该已生成");
}

#[test]
fn test_archive_after_simulated_run() {
    // 不需要浏览器：模拟一次运行产物后验证归档内容
    let dir = tempfile::tempdir().expect("创建临时目录");
    let receipts_dir = dir.path().join("receipts");
    std::fs::create_dir_all(&receipts_dir).unwrap();

    for n in ["1", "2", "3"] {
        std::fs::write(receipts_dir.join(format!("order_{}.pdf", n)), b"%PDF-1.5").unwrap();
        std::fs::write(receipts_dir.join(format!("{}.png", n)), b"png").unwrap();
    }

    let archive_path = dir.path().join("receipts.zip");
    let archiver = ReceiptArchiver::new(archive_path.to_str().unwrap());
    let built = archiver
        .build(receipts_dir.to_str().unwrap())
        .expect("归档失败");
    assert!(built.is_some());

    let file = std::fs::File::open(&archive_path).unwrap();
    let archive = zip::ZipArchive::new(file).unwrap();
    // N 个订单 → 压缩包中正好 N 个 PDF 条目
    assert_eq!(archive.len(), 3);
    for name in archive.file_names() {
        assert!(name.ends_with(".pdf"), "压缩包中只应包含PDF: {}", name);
    }
}
