//! Virtualized grid rendering shared by the spreadsheet-style `DataGrid` component.
pub mod view;
