pub mod loaders;
pub mod order;

pub use loaders::{load_orders_from_file, parse_orders};
pub use order::Order;
