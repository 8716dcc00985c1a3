//! Statistics over (filtered) survey tables

pub mod aggregate;
pub mod correlation;
pub mod descriptive;
pub mod export;
pub mod summary;

pub use aggregate::{
    all_dimension_statistics, dimension_statistics, grouped_dimension_totals, grouped_statistics,
    item_statistics, ColumnSummary, DimensionStatistics, GroupStatistics, GroupedStatistics,
    ItemStatistics,
};
pub use correlation::{correlation_matrix, correlation_matrix_for, CorrelationMatrix};
pub use descriptive::{MeanStd, StatisticsRecord};
pub use export::{export_file_name, means_csv, write_means_csv};
pub use summary::{
    demographic_summary, item_means_ranked, label_counts, means_table, overview,
    DemographicSummary, ItemMean, LabelCount, MeansRow, MeansTable, Overview, TotalSummary,
};
