//! Shared fixtures: GoodReads-shaped XML and a throwaway axum server.
#![allow(dead_code)]

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::IntoResponse;
use std::sync::{Arc, Mutex, mpsc};
use std::thread;

pub struct Book<'a> {
    pub title: &'a str,
    pub average_rating: &'a str,
    pub ratings_count: &'a str,
    pub author_ids: &'a [u64],
}

pub fn book<'a>(title: &'a str, avg: &'a str, count: &'a str, author_ids: &'a [u64]) -> Book<'a> {
    Book {
        title,
        average_rating: avg,
        ratings_count: count,
        author_ids,
    }
}

/// One `author/list` page.
pub fn author_page_xml(author_id: u64, name: &str, start: u32, total: u32, books: &[Book]) -> String {
    let end = start + books.len().saturating_sub(1) as u32;
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<GoodreadsResponse>
  <Request>
    <authentication>true</authentication>
    <key><![CDATA[k]]></key>
    <method><![CDATA[author_list]]></method>
  </Request>
  <author>
    <id>{author_id}</id>
    <name>{name}</name>
    <link><![CDATA[https://www.goodreads.com/author/show/{author_id}]]></link>
    <books start="{start}" end="{end}" total="{total}">
"#
    );
    for (i, b) in books.iter().enumerate() {
        let authors: String = b
            .author_ids
            .iter()
            .map(|id| format!("<author><id>{id}</id><name>Someone {id}</name><role></role></author>"))
            .collect();
        xml.push_str(&format!(
            r#"      <book>
        <id type="integer">{id}</id>
        <isbn nil="true"/>
        <title>{title} (Series, #{n})</title>
        <title_without_series>{title}</title_without_series>
        <average_rating>{avg}</average_rating>
        <ratings_count>{count}</ratings_count>
        <publication_year>1954</publication_year>
        <authors>{authors}</authors>
      </book>
"#,
            id = 1000 + start as usize + i,
            title = b.title,
            n = i + 1,
            avg = b.average_rating,
            count = b.ratings_count,
        ));
    }
    xml.push_str("    </books>\n  </author>\n</GoodreadsResponse>\n");
    xml
}

pub struct Work<'a> {
    pub title: &'a str,
    pub ratings_count: &'a str,
    pub ratings_sum: &'a str,
}

pub fn work<'a>(title: &'a str, count: &'a str, sum: &'a str) -> Work<'a> {
    Work {
        title,
        ratings_count: count,
        ratings_sum: sum,
    }
}

/// One `series/show` page.
pub fn series_page_xml(series_id: u64, title: &str, works_count: u32, works: &[Work]) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<GoodreadsResponse>
  <Request>
    <authentication>true</authentication>
  </Request>
  <series>
    <id>{series_id}</id>
    <title><![CDATA[{title}]]></title>
    <description></description>
    <series_works_count>{works_count}</series_works_count>
    <primary_work_count>{works_count}</primary_work_count>
    <numbered>true</numbered>
    <series_works>
"#
    );
    for (i, w) in works.iter().enumerate() {
        xml.push_str(&format!(
            r#"      <series_work>
        <id>{sw}</id>
        <user_position>{pos}</user_position>
        <work>
          <id>{wid}</id>
          <ratings_count type="integer">{count}</ratings_count>
          <ratings_sum type="integer">{sum}</ratings_sum>
          <best_book>
            <id>{bid}</id>
            <title>{title}</title>
            <author><id>2565</id><name>Ian Fleming</name></author>
          </best_book>
        </work>
      </series_work>
"#,
            sw = 500 + i,
            pos = i + 1,
            wid = 700 + i,
            bid = 900 + i,
            count = w.ratings_count,
            sum = w.ratings_sum,
            title = w.title,
        ));
    }
    xml.push_str("    </series_works>\n  </series>\n</GoodreadsResponse>\n");
    xml
}

/// `page=N` from a request target, 1 when absent.
pub fn page_of(target: &str) -> u32 {
    target
        .split(['?', '&'])
        .find_map(|kv| kv.strip_prefix("page="))
        .and_then(|p| p.parse().ok())
        .unwrap_or(1)
}

type Handler = dyn Fn(&str) -> (u16, String) + Send + Sync;

#[derive(Clone)]
struct Fixture {
    handler: Arc<Handler>,
    log: Arc<Mutex<Vec<String>>>,
}

pub struct FixtureServer {
    pub base: String,
    /// Request targets (path + query) in arrival order.
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl FixtureServer {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

async fn respond(State(fixture): State<Fixture>, uri: Uri) -> impl IntoResponse {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    fixture.log.lock().unwrap().push(target.clone());

    let (status, body) = (fixture.handler)(&target);
    (
        StatusCode::from_u16(status).expect("fixture status"),
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        body,
    )
}

/// Serve `handler(target) -> (status, body)` on a random local port.
///
/// The blocking client under test runs on the test thread, so the server
/// gets its own thread and a single-threaded runtime.
pub fn serve<F>(handler: F) -> FixtureServer
where
    F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let fixture = Fixture {
        handler: Arc::new(handler),
        log: Arc::clone(&requests),
    };
    let app = Router::new().fallback(respond).with_state(fixture);

    let (addr_tx, addr_rx) = mpsc::channel();
    thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("fixture runtime");
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind listener");
            addr_tx
                .send(listener.local_addr().expect("local addr"))
                .expect("report address");
            axum::serve(listener, app).await.expect("serve fixtures");
        });
    });
    let addr = addr_rx.recv().expect("fixture server address");

    FixtureServer {
        base: format!("http://{addr}"),
        requests,
    }
}
