//! 基础设施层：只持有外部进程和文件系统资源，不认识表和统计

pub mod page_renderer;

pub use page_renderer::{DirectoryPages, PageRenderer, SofficeRenderer};
