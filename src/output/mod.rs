pub mod export;
pub mod formatter;

pub use export::{to_json, write_export, StandingsExport};
pub use formatter::{
    format_other_values, format_row_detail, format_standings_table, format_tsv, should_use_colors,
};
