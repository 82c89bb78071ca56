//! Text cleaning and label similarity.

mod normalize;
mod similarity;

pub use normalize::{clean_cell, label_from_uri, remove_brackets};
pub use similarity::{max_similarity, similarity};
