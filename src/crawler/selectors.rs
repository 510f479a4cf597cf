//! CSS selectors for the catalogue's page templates.
//!
//! Every selector and fixed text label the scraper relies on lives here. When
//! the site changes its markup, this file and the fixtures are what change.

use scraper::Selector;
use std::sync::LazyLock;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

/// Selectors for a book detail page.
pub mod detail {
    use super::*;

    /// Title heading inside the product block.
    pub static PRODUCT_TITLE: LazyLock<Selector> =
        LazyLock::new(|| selector("div.product_main h1"));

    /// Any title heading, used when the product block has none.
    pub static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h1"));

    /// Product information table.
    pub static PRODUCT_TABLE: LazyLock<Selector> =
        LazyLock::new(|| selector("table.table-striped"));

    /// Rows of the product table.
    pub static TABLE_ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));

    /// Row header cell.
    pub static TABLE_HEADER: LazyLock<Selector> = LazyLock::new(|| selector("th"));

    /// Row value cell.
    pub static TABLE_VALUE: LazyLock<Selector> = LazyLock::new(|| selector("td"));

    /// Displayed price inside the product block.
    pub static PRODUCT_PRICE: LazyLock<Selector> =
        LazyLock::new(|| selector("div.product_main p.price_color"));

    /// Any displayed price.
    pub static PRICE: LazyLock<Selector> = LazyLock::new(|| selector("p.price_color"));

    /// Star rating paragraph; its second class word is the rating.
    pub static STAR_RATING: LazyLock<Selector> = LazyLock::new(|| selector("p.star-rating"));

    /// Stock paragraph, used when the table has no availability row.
    pub static AVAILABILITY: LazyLock<Selector> =
        LazyLock::new(|| selector("p.instock.availability, p.availability"));

    /// Description paragraph following the description header.
    pub static DESCRIPTION: LazyLock<Selector> =
        LazyLock::new(|| selector("#product_description ~ p"));

    /// Linked breadcrumb entries; the last one is the category.
    pub static BREADCRUMB_LINK: LazyLock<Selector> =
        LazyLock::new(|| selector("ul.breadcrumb li a"));

    /// Product table labels.
    pub const UPC_LABEL: &str = "UPC";
    pub const PRICE_INCL_TAX_LABEL: &str = "Price (incl. tax)";
    pub const AVAILABILITY_LABEL: &str = "Availability";
}

/// Selectors for a catalogue listing page.
pub mod listing {
    use super::*;

    /// Product grid; present on every listing page, even an empty one.
    pub static PRODUCT_GRID: LazyLock<Selector> = LazyLock::new(|| selector("ol.row"));

    /// Book anchor inside each product card.
    pub static BOOK_LINK: LazyLock<Selector> =
        LazyLock::new(|| selector("article.product_pod h3 a[href]"));

    /// Pager link to the following listing page.
    pub static NEXT_PAGE: LazyLock<Selector> = LazyLock::new(|| selector("li.next a[href]"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_selectors_parse() {
        let _ = &*detail::PRODUCT_TITLE;
        let _ = &*detail::TITLE;
        let _ = &*detail::PRODUCT_TABLE;
        let _ = &*detail::TABLE_ROW;
        let _ = &*detail::TABLE_HEADER;
        let _ = &*detail::TABLE_VALUE;
        let _ = &*detail::PRODUCT_PRICE;
        let _ = &*detail::PRICE;
        let _ = &*detail::STAR_RATING;
        let _ = &*detail::AVAILABILITY;
        let _ = &*detail::DESCRIPTION;
        let _ = &*detail::BREADCRUMB_LINK;
        let _ = &*listing::PRODUCT_GRID;
        let _ = &*listing::BOOK_LINK;
        let _ = &*listing::NEXT_PAGE;
    }
}
