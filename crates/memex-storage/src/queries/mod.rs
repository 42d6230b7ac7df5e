pub mod entry_crud;
pub mod entry_search;
pub mod file_pair_queries;
pub mod pattern_queries;
pub mod rule_queries;
pub mod status;
pub mod vector_search;
