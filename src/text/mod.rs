//! Text normalization shared by the classifier and the resolvers.

pub mod dates;
pub mod normalize;

pub use dates::{parse_date_literal, parse_dataset_date, relative_offset, resolve_target_date, today_in};
pub use normalize::{
    contains_any, first_contained, fold_width, honorific_start, remove_whitespace, strip_honorifics,
    tokenize,
};
