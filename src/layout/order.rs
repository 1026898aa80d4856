//! Emission order of regions within a page.

use rayon::prelude::*;

use crate::model::{Document, Page};

use super::AssembleOptions;

/// How regions on a page are ordered for emission.
///
/// Rendering follows the analysis engine's reading order. The evaluation
/// path drops detected headers and reads the page top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderPolicy {
    /// Ascending `reading_order`; ties keep input order, absent keys go last.
    #[default]
    ReadingOrder,
    /// Headers excluded, remaining regions by upper edge, top of page first.
    TopToBottom,
}

impl OrderPolicy {
    /// Indices into `page.elements` in emission order.
    pub fn order(&self, page: &Page) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..page.elements.len()).collect();
        match self {
            OrderPolicy::ReadingOrder => {
                // `sort_by_key` is stable, which is what resolves equal keys.
                indices.sort_by_key(|&i| match page.elements[i].reading_order {
                    Some(order) => (0u8, order),
                    None => (1u8, 0),
                });
            }
            OrderPolicy::TopToBottom => {
                indices.retain(|&i| !page.elements[i].is_header);
                indices.sort_by(|&a, &b| {
                    let ya = page.elements[a].bounding_box.uly;
                    let yb = page.elements[b].bounding_box.uly;
                    ya.total_cmp(&yb)
                });
            }
        }
        indices
    }
}

/// Emission order for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOrder {
    /// 1-indexed page number
    pub page_number: u32,
    /// Element indices in emission order
    pub indices: Vec<usize>,
}

/// Computes emission order for whole documents.
#[derive(Debug, Clone, Default)]
pub struct ReadingOrderAssembler {
    options: AssembleOptions,
}

impl ReadingOrderAssembler {
    /// Create an assembler with the given options.
    pub fn new(options: AssembleOptions) -> Self {
        Self { options }
    }

    /// Create a sequential assembler for a single policy.
    pub fn with_policy(policy: OrderPolicy) -> Self {
        Self::new(AssembleOptions::new().with_policy(policy))
    }

    /// The active policy.
    pub fn policy(&self) -> OrderPolicy {
        self.options.policy
    }

    /// Order a single page.
    pub fn order_page(&self, page: &Page) -> PageOrder {
        PageOrder {
            page_number: page.number,
            indices: self.options.policy.order(page),
        }
    }

    /// Order every page of a document, in page order.
    ///
    /// Pages share no state, so the parallel path only changes scheduling;
    /// results are collected back in page order.
    pub fn assemble(&self, doc: &Document) -> Vec<PageOrder> {
        if self.options.parallel {
            doc.pages.par_iter().map(|p| self.order_page(p)).collect()
        } else {
            doc.pages.iter().map(|p| self.order_page(p)).collect()
        }
    }
}
