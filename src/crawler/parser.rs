//! Book detail page parser
//!
//! Turns the markup of one detail page into a [`BookRecord`]. Parsing is a pure
//! function of the markup; the source URL is only carried into errors.
//!
//! Two elements are required: the title heading and the product information
//! table. Everything else degrades to a documented default:
//! - unrecognised rating → 0
//! - no stock count in the availability text → 0
//! - missing description, category or UPC → empty string
//! - unparseable price → 0.0

use crate::crawler::selectors::detail;
use crate::model::BookRecord;
use crate::ParseError;
use scraper::{ElementRef, Html, Selector};

/// Key/value rows of the product information table, in document order
#[derive(Debug, Clone, Default)]
struct ProductTable {
    rows: Vec<(String, String)>,
}

impl ProductTable {
    fn from_element(table: ElementRef) -> Self {
        let rows = table
            .select(&detail::TABLE_ROW)
            .filter_map(|row| {
                let key = row.select(&detail::TABLE_HEADER).next().map(element_text)?;
                let value = row.select(&detail::TABLE_VALUE).next().map(element_text)?;
                Some((key, value))
            })
            .collect();
        Self { rows }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Parses a book detail page
///
/// # Example
///
/// ```
/// use shelf_ripple::crawler::parse_book;
///
/// let html = r#"<html><body>
///     <h1>A Light in the Attic</h1>
///     <p class="price_color">£51.77</p>
///     <p class="star-rating Three"></p>
///     <table class="table table-striped">
///         <tr><th>UPC</th><td>a897fe39b1053632</td></tr>
///         <tr><th>Availability</th><td>In stock (22 available)</td></tr>
///     </table>
/// </body></html>"#;
///
/// let book = parse_book(html, "http://books.toscrape.com/catalogue/a/index.html").unwrap();
/// assert_eq!(book.rating, 3);
/// assert_eq!(book.availability, 22);
/// ```
pub fn parse_book(html: &str, source_url: &str) -> Result<BookRecord, ParseError> {
    let document = Html::parse_document(html);

    let title = first_non_empty(&document, &detail::PRODUCT_TITLE)
        .or_else(|| first_non_empty(&document, &detail::TITLE))
        .ok_or_else(|| ParseError::new(source_url, "missing title heading"))?;

    let table = document
        .select(&detail::PRODUCT_TABLE)
        .next()
        .map(ProductTable::from_element)
        .ok_or_else(|| ParseError::new(source_url, "missing product information table"))?;

    let upc = match table.get(detail::UPC_LABEL) {
        Some(upc) => upc.to_string(),
        None => {
            tracing::warn!("No UPC row on {}", source_url);
            String::new()
        }
    };

    let price_text = first_text(&document, &detail::PRODUCT_PRICE)
        .or_else(|| first_text(&document, &detail::PRICE))
        .or_else(|| table.get(detail::PRICE_INCL_TAX_LABEL).map(str::to_string));
    let price = match price_text.as_deref().and_then(parse_price) {
        Some(price) => price,
        None => {
            tracing::warn!("Unparseable price {:?} on {}", price_text, source_url);
            0.0
        }
    };

    let rating = document
        .select(&detail::STAR_RATING)
        .next()
        .and_then(|e| e.value().classes().find_map(parse_rating_word))
        .unwrap_or(0);

    let availability = table
        .get(detail::AVAILABILITY_LABEL)
        .map(str::to_string)
        .or_else(|| first_text(&document, &detail::AVAILABILITY))
        .map(|text| parse_availability(&text))
        .unwrap_or(0);

    let description = first_text(&document, &detail::DESCRIPTION).unwrap_or_default();

    let category = document
        .select(&detail::BREADCRUMB_LINK)
        .last()
        .map(element_text)
        .unwrap_or_default();

    tracing::trace!("Parsed book {} ({}) from {}", title, upc, source_url);

    Ok(BookRecord {
        title,
        price,
        rating,
        availability,
        description,
        upc,
        category,
    })
}

/// Parses a displayed price such as "£51.77"
///
/// The leading currency symbol (and any stray encoding bytes before it) is
/// dropped and the amount is rounded to two fraction digits. Negative amounts
/// are rejected, whether the sign comes before or after the symbol.
pub fn parse_price(text: &str) -> Option<f64> {
    let text = text.trim();
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let amount = rest
        .trim_start_matches(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .trim_end();

    let value: f64 = amount.replace(',', "").parse().ok()?;
    if negative || !value.is_finite() || value < 0.0 {
        return None;
    }

    Some((value * 100.0).round() / 100.0)
}

/// Extracts the stock count from text like "In stock (22 available)"
///
/// Returns the first integer in the text, or 0 when there is none.
pub fn parse_availability(text: &str) -> u32 {
    let Some(digits) = text
        .split(|c: char| !c.is_ascii_digit())
        .find(|run| !run.is_empty())
    else {
        return 0;
    };

    match digits.parse() {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("Stock count {} out of range ({}), using 0", digits, e);
            0
        }
    }
}

/// Maps the rating word used in the star-rating class to a number
pub fn parse_rating_word(word: &str) -> Option<u8> {
    match word {
        "One" => Some(1),
        "Two" => Some(2),
        "Three" => Some(3),
        "Four" => Some(4),
        "Five" => Some(5),
        _ => None,
    }
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(element_text)
}

fn first_non_empty(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(element_text)
        .find(|text| !text.is_empty())
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
