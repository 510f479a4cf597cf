//! Integration tests for the scraper
//!
//! These tests use wiremock to serve a small stub catalogue and exercise full
//! runs end-to-end.

use shelf_ripple::config::Config;
use shelf_ripple::output::read_artifact;
use shelf_ripple::{FetchError, ScraperError, Scraper};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BOOK_FIXTURE: &str = include_str!("../fixtures/book_detail.html");

/// Creates a test configuration rooted at the mock catalogue
fn create_test_config(base_url: &str, artifact_path: &Path) -> Config {
    let mut config = Config::default();
    config.scraper.root_url = format!("{}/catalogue/page-1.html", base_url);
    config.scraper.request_timeout_secs = 5;
    config.user_agent.crawler_name = "TestScraper".to_string();
    config.output.artifact_path = artifact_path.to_string_lossy().to_string();
    config
}

fn listing_page(books: &[&str], next: Option<&str>) -> String {
    let cards: String = books
        .iter()
        .map(|slug| {
            format!(
                r#"<li class="col-xs-6 col-sm-4 col-md-3 col-lg-3"><article class="product_pod">
                    <div class="image_container">
                        <a href="{slug}/index.html"><img src="thumb.jpg"></a>
                    </div>
                    <p class="star-rating One"></p>
                    <h3><a href="{slug}/index.html" title="{slug}">{slug}</a></h3>
                </article></li>"#
            )
        })
        .collect();
    let pager = next
        .map(|href| {
            format!(
                r#"<ul class="pager"><li class="current">Page</li>
                <li class="next"><a href="{href}">next</a></li></ul>"#
            )
        })
        .unwrap_or_default();

    format!(
        r#"<html><body><section><div class="alert">results</div>
        <div><ol class="row">{cards}</ol><div>{pager}</div></div></section></body></html>"#
    )
}

fn book_page(title: &str, upc: &str, rating: &str, stock: u32) -> String {
    format!(
        r#"<html><body>
        <ul class="breadcrumb">
            <li><a href="../../index.html">Home</a></li>
            <li><a href="../category/books_1/index.html">Books</a></li>
            <li><a href="../category/books/mystery_3/index.html">Mystery</a></li>
            <li class="active">{title}</li>
        </ul>
        <div class="product_main">
            <h1>{title}</h1>
            <p class="price_color">£10.00</p>
            <p class="star-rating {rating}"></p>
        </div>
        <div id="product_description" class="sub-header"><h2>Product Description</h2></div>
        <p>About {title}.</p>
        <table class="table table-striped">
            <tr><th>UPC</th><td>{upc}</td></tr>
            <tr><th>Availability</th><td>In stock ({stock} available)</td></tr>
        </table>
        </body></html>"#
    )
}

async fn mount_html(server: &MockServer, page: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_book(server: &MockServer, slug: &str, body: String) {
    mount_html(server, &format!("/catalogue/{slug}/index.html"), body).await;
}

/// Mounts the two listing pages of the stub catalogue: A, B on page 1 and C on page 2
async fn mount_catalogue(server: &MockServer) {
    mount_html(
        server,
        "/catalogue/page-1.html",
        listing_page(&["book-a_1", "book-b_2"], Some("page-2.html")),
    )
    .await;
    mount_html(server, "/catalogue/page-2.html", listing_page(&["book-c_3"], None)).await;
}

#[tokio::test]
async fn test_scrape_returns_books_in_catalogue_order() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;
    mount_book(&mock_server, "book-a_1", book_page("Book A", "upc-a", "One", 1)).await;
    mount_book(&mock_server, "book-b_2", book_page("Book B", "upc-b", "Four", 2)).await;
    mount_book(&mock_server, "book-c_3", book_page("Book C", "upc-c", "Five", 3)).await;

    let dir = TempDir::new().unwrap();
    let artifact = dir.path().join("books.json");
    let config = create_test_config(&mock_server.uri(), &artifact);

    let scraper = Scraper::new(config).expect("Failed to create scraper");
    let books = scraper.scrape_books(false).await.expect("Scrape failed");

    let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Book A", "Book B", "Book C"]);

    let upcs: Vec<&str> = books.iter().map(|b| b.upc.as_str()).collect();
    assert_eq!(upcs, vec!["upc-a", "upc-b", "upc-c"]);

    assert_eq!(books[1].rating, 4);
    assert_eq!(books[2].availability, 3);
    assert_eq!(books[0].category, "Mystery");
    assert_eq!(books[0].price, 10.0);

    // Nothing is written without persistence
    assert!(!artifact.exists());
}

#[tokio::test]
async fn test_persisted_scrape_writes_artifact() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;
    mount_book(&mock_server, "book-a_1", book_page("Book A", "upc-a", "One", 1)).await;
    mount_book(&mock_server, "book-b_2", book_page("Book B", "upc-b", "Two", 2)).await;
    mount_book(&mock_server, "book-c_3", book_page("Book C", "upc-c", "Three", 3)).await;

    let dir = TempDir::new().unwrap();
    let artifact = dir.path().join("artifacts").join("books_data.json");
    let config = create_test_config(&mock_server.uri(), &artifact);

    let books = shelf_ripple::scrape_books(config, true)
        .await
        .expect("Scrape failed");

    let saved = read_artifact(&artifact).expect("Failed to read artifact");
    assert_eq!(saved, books);
    assert_eq!(saved.len(), 3);
}

#[tokio::test]
async fn test_get_book_data_returns_single_record() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/catalogue/a-light-in-the-attic_1000/index.html",
        BOOK_FIXTURE.to_string(),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir.path().join("unused.json"));
    let url = format!("{}/catalogue/a-light-in-the-attic_1000/index.html", mock_server.uri());

    let book = shelf_ripple::get_book_data(config, &url)
        .await
        .expect("Failed to scrape book");

    assert_eq!(book.upc, "a897fe39b1053632");
    assert_eq!(book.title, "A Light in the Attic");
    assert_eq!(book.price, 51.77);
    assert_eq!(book.rating, 3);
    assert_eq!(book.availability, 22);
    assert_eq!(book.category, "Poetry");
    assert!(book
        .description
        .starts_with("It's hard to imagine a world without A Light in the Attic."));
}

#[tokio::test]
async fn test_fetch_error_on_book_aborts_whole_run() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;
    mount_book(&mock_server, "book-a_1", book_page("Book A", "upc-a", "One", 1)).await;

    Mock::given(method("GET"))
        .and(path("/catalogue/book-b_2/index.html"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    // The run stops at B, so C is never requested
    Mock::given(method("GET"))
        .and(path("/catalogue/book-c_3/index.html"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(book_page("Book C", "upc-c", "One", 1)),
        )
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let artifact = dir.path().join("books.json");
    let config = create_test_config(&mock_server.uri(), &artifact);

    let scraper = Scraper::new(config).expect("Failed to create scraper");
    let result = scraper.scrape_books(true).await;

    match result {
        Err(ScraperError::Fetch(FetchError::Status { url, status })) => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/catalogue/book-b_2/index.html"));
        }
        other => panic!("Expected fetch error for book B, got {:?}", other),
    }

    // Partial results are never persisted
    assert!(!artifact.exists());
}

#[tokio::test]
async fn test_parse_error_on_book_aborts_whole_run() {
    let mock_server = MockServer::start().await;
    mount_catalogue(&mock_server).await;
    mount_book(&mock_server, "book-a_1", book_page("Book A", "upc-a", "One", 1)).await;
    mount_html(
        &mock_server,
        "/catalogue/book-b_2/index.html",
        "<html><body><p>Page moved</p></body></html>".to_string(),
    )
    .await;
    mount_book(&mock_server, "book-c_3", book_page("Book C", "upc-c", "One", 1)).await;

    let dir = TempDir::new().unwrap();
    let artifact = dir.path().join("books.json");
    let config = create_test_config(&mock_server.uri(), &artifact);

    let scraper = Scraper::new(config).expect("Failed to create scraper");
    let err = scraper.scrape_books(true).await.unwrap_err();

    match err {
        ScraperError::Parse(parse_error) => {
            assert!(parse_error.url.ends_with("/catalogue/book-b_2/index.html"));
        }
        other => panic!("Expected parse error, got {:?}", other),
    }
    assert!(!artifact.exists());
}

#[tokio::test]
async fn test_missing_listing_page_fails_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalogue/page-1.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri(), &dir.path().join("books.json"));

    let scraper = Scraper::new(config).expect("Failed to create scraper");
    let err = scraper.scrape_books(false).await.unwrap_err();

    assert!(matches!(err, ScraperError::Fetch(FetchError::Status { status: 404, .. })));
}

#[tokio::test]
async fn test_empty_catalogue_persists_empty_artifact() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/catalogue/page-1.html", listing_page(&[], None)).await;

    let dir = TempDir::new().unwrap();
    let artifact = dir.path().join("books.json");
    let config = create_test_config(&mock_server.uri(), &artifact);

    let scraper = Scraper::new(config).expect("Failed to create scraper");
    let books = scraper.scrape_books(true).await.expect("Scrape failed");

    assert!(books.is_empty());
    assert!(read_artifact(&artifact).unwrap().is_empty());
}
