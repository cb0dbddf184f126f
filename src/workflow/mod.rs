pub mod sheet_ctx;
pub mod sheet_flow;

pub use sheet_ctx::SheetCtx;
pub use sheet_flow::{SheetFlow, SheetReport};
