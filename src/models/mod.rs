pub mod artifact;
pub mod loaders;
pub mod metrics;
pub mod schema;
pub mod sheet;

pub use artifact::{AlignmentWarning, ArtifactEntry, ArtifactMapping};
pub use loaders::{load_toml_workbook, load_xlsx_workbook};
pub use metrics::{
    AbnormalRecord, CenterStat, ClassifiedRow, DetailColumns, ModelStat, RollupTables, RowStatus,
    SheetMetrics, SheetStatistics, TypeStat,
};
pub use schema::{ColumnRole, ColumnRoleMap, SchemaConvention, SchemaFamily};
pub use sheet::{CatalogEntry, Row, Sheet, SheetCatalog};
