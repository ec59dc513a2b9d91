//! Detection graph parsing and resolution.

mod resolver;
mod response;

pub use resolver::{resolve, BlockGraphResolver};
pub use response::{parse_response, parse_response_value, ProviderResponse};

use rayon::prelude::*;

use crate::model::{Block, Document, PageResult};

/// Resolve several pages, one block graph per page, into a document.
///
/// Pages are resolved in parallel when `parallel` is set; the result is
/// always ordered by page number regardless.
pub fn resolve_pages(pages: &[Vec<Block>], parallel: bool) -> Document {
    let resolve_one = |(i, blocks): (usize, &Vec<Block>)| PageResult {
        number: i as u32 + 1,
        page: resolve(blocks),
    };

    let results: Vec<PageResult> = if parallel {
        pages.par_iter().enumerate().map(resolve_one).collect()
    } else {
        pages.iter().enumerate().map(resolve_one).collect()
    };

    Document::from_pages(results)
}
