pub mod error;
pub mod filter;
pub mod metric;
pub mod period;
pub mod plot_date;
pub mod record;
