use crate::models::order::Order;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tokio::fs;

/// 从 CSV 文件加载数据并转换为 Order 对象列表
///
/// 保留文件中的行顺序，任何一行解析失败都视为整个数据源失败
pub async fn load_orders_from_file(csv_file_path: &Path) -> Result<Vec<Order>> {
    let content = fs::read_to_string(csv_file_path)
        .await
        .with_context(|| format!("无法读取CSV文件: {}", csv_file_path.display()))?;

    parse_orders(content.as_bytes())
        .with_context(|| format!("无法解析CSV文件: {}", csv_file_path.display()))
}

/// 从任意 reader 解析订单列表
pub fn parse_orders(reader: impl Read) -> Result<Vec<Order>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut orders = Vec::new();

    for record in csv_reader.deserialize::<Order>() {
        let order = record.context("CSV行解析失败")?;
        orders.push(order);
    }

    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
Order number,Head,Body,Legs,Address
1,1,2,2,Address 123
2,2,3,1,Dirección 4
3,3,1,3,Adresse 5
";

    #[test]
    fn test_parse_orders_preserves_row_order() {
        let orders = parse_orders(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(orders.len(), 3);
        assert_eq!(orders[0].order_number, "1");
        assert_eq!(orders[1].order_number, "2");
        assert_eq!(orders[2].order_number, "3");
        assert_eq!(orders[1].address, "Dirección 4");
    }

    #[test]
    fn test_parse_orders_maps_all_columns() {
        let orders = parse_orders(SAMPLE_CSV.as_bytes()).unwrap();
        let first = &orders[0];
        assert_eq!(first.head, "1");
        assert_eq!(first.body, "2");
        assert_eq!(first.legs, "2");
        assert_eq!(first.address, "Address 123");
    }

    #[test]
    fn test_parse_orders_empty_feed() {
        let csv = "Order number,Head,Body,Legs,Address\n";
        let orders = parse_orders(csv.as_bytes()).unwrap();
        assert!(orders.is_empty());
    }

    #[test]
    fn test_parse_orders_missing_column_fails() {
        let csv = "Order number,Head,Body\n1,1,2\n";
        let result = parse_orders(csv.as_bytes());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_orders_from_missing_file_fails() {
        let result = load_orders_from_file(Path::new("no_such_orders.csv")).await;
        assert!(result.is_err());
    }
}
