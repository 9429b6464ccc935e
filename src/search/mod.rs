pub mod data_loader;
pub mod ingredient_filter;
pub mod nn_index;
pub mod pipeline;
pub mod scaler;

// Pipeline entry points
pub use data_loader::{load_recipe_corpus, open_dataset, resolve_corpus_path, Corpus, DatasetEncoding};
pub use ingredient_filter::filter_by_ingredients;
pub use nn_index::{CosineIndex, Neighbor};
pub use pipeline::{recommend, RecommendationRequest};
pub use scaler::StandardScaler;
