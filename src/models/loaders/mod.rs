pub mod toml_loader;
pub mod xlsx_loader;

pub use toml_loader::load_toml_workbook;
pub use xlsx_loader::load_xlsx_workbook;
