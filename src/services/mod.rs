pub mod archive;
pub mod failure_log;
pub mod order_feed;
pub mod receipt_pdf;

pub use archive::ReceiptArchiver;
pub use failure_log::FailureLog;
pub use order_feed::OrderFeed;
pub use receipt_pdf::ReceiptPdf;
