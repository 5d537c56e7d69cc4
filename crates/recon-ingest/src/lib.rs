pub mod cross_reference;
pub mod csv_table;
pub mod error;
pub mod frame;
pub mod mapping_table;
pub mod merge;
pub mod value_maps;

pub use cross_reference::load_cross_reference;
pub use csv_table::{CsvTable, read_csv_table};
pub use error::IngestError;
pub use frame::{
    any_to_string, column_value_string, frame_column_strings, parse_f64, parse_i64, table_to_frame,
};
pub use mapping_table::load_mapping_rules;
pub use merge::merge_source_export;
pub use value_maps::{ValueMaps, default_value_maps, load_value_maps};
