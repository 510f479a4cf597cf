use serde::{Deserialize, Serialize};

/// One scraped book
///
/// Built once from a detail page and never mutated afterwards. Field order here
/// is the field order of the persisted artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Title heading of the detail page
    pub title: String,

    /// Price in the site's single currency, rounded to two fraction digits
    pub price: f64,

    /// Star rating, 0 when the page carries no recognised rating
    pub rating: u8,

    /// Units in stock, 0 when the page does not state a count
    pub availability: u32,

    /// Product description, possibly empty
    pub description: String,

    /// Universal product code, the natural key of a book
    pub upc: String,

    /// Category taken from the breadcrumb trail
    pub category: String,
}
