//! Row data shared by the table and the data grid.
mod format;
mod pipeline;
mod value;

pub use format::MISSING;
pub use format::format_currency;
pub use format::format_date;
pub use format::format_number;
pub use format::initials;
pub use format::parse_date;
pub use pipeline::DEFAULT_PAGE_SIZE;
pub use pipeline::DynamicRow;
pub use pipeline::Pagination;
pub use pipeline::Record;
pub use pipeline::SortColumn;
pub use pipeline::SortDirection;
pub use pipeline::SortState;
pub use pipeline::display_order;
pub use pipeline::search_rows;
pub use pipeline::sort_rows;
pub use value::Value;
