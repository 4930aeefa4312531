pub mod recommendations;
pub mod rule_table;
pub mod similarity;
pub mod stop_words;

pub use recommendations::{EngineSources, RecommendationEngine};
pub use rule_table::RuleTable;
pub use similarity::{SimilarityIndex, TitleIndex};
