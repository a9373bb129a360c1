use serde_json::{Map, Value};

use crate::error::{ResolveError, Result};
use crate::http::{HttpClient, user_agent};
use crate::identifiers::isbn::Isbn;

const BASE_URL: &str = "https://openlibrary.org";

/// ISBN metadata lookup backed by the Open Library Books API.
///
/// Returns an open-schema map keyed the way bibliographic lookup services
/// report book data: `Title`, `Authors` (list of names), `Year`, `Publisher`,
/// plus whatever else the edition carries. The caller decides how those keys
/// land in a record.
pub struct OpenLibrarySource {
    client: HttpClient,
    base_url: String,
}

impl OpenLibrarySource {
    pub fn new(polite_email: Option<&str>) -> Self {
        Self::with_base_url(BASE_URL, polite_email)
    }

    pub fn with_base_url(base_url: &str, polite_email: Option<&str>) -> Self {
        Self {
            client: HttpClient::new(&user_agent(polite_email)),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch_by_isbn(&self, isbn: &Isbn) -> Result<Map<String, Value>> {
        let bibkey = format!("ISBN:{}", isbn.isbn13);
        let url = format!(
            "{}/api/books?bibkeys={bibkey}&format=json&jscmd=data",
            self.base_url
        );

        let body = self.client.get(&url).await?;
        let json: Value =
            serde_json::from_str(&body).map_err(|e| ResolveError::Parse(e.to_string()))?;

        let Some(work) = json.get(&bibkey) else {
            return Err(ResolveError::NotFound(format!(
                "no Open Library edition for ISBN {}",
                isbn.isbn13
            )));
        };

        Ok(meta_from_edition(work))
    }
}

fn meta_from_edition(v: &Value) -> Map<String, Value> {
    let mut meta = Map::new();

    if let Some(title) = v.get("title").and_then(Value::as_str) {
        meta.insert("Title".to_string(), Value::String(title.to_string()));
    }

    let authors: Vec<Value> = v
        .get("authors")
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|item| item.get("name").and_then(Value::as_str))
                .map(|name| Value::String(name.to_string()))
                .collect()
        })
        .unwrap_or_default();
    if !authors.is_empty() {
        meta.insert("Authors".to_string(), Value::Array(authors));
    }

    if let Some(year) = v
        .get("publish_date")
        .and_then(Value::as_str)
        .and_then(parse_year)
    {
        meta.insert("Year".to_string(), Value::String(year));
    }

    if let Some(publisher) = v.get("publishers").and_then(Value::as_array).and_then(|arr| {
        arr.iter()
            .find_map(|item| item.get("name").and_then(Value::as_str))
    }) {
        meta.insert("Publisher".to_string(), Value::String(publisher.to_string()));
    }

    if let Some(pages) = v.get("number_of_pages").and_then(Value::as_i64) {
        meta.insert("Pages".to_string(), Value::Number(pages.into()));
    }

    meta
}

/// First four-digit run in a date string like "June 12, 2017".
fn parse_year(input: &str) -> Option<String> {
    let chars: Vec<char> = input.chars().collect();
    chars.windows(4).find_map(|w| {
        if w.iter().all(|c| c.is_ascii_digit()) {
            Some(w.iter().collect())
        } else {
            None
        }
    })
}
