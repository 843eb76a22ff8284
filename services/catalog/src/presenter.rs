use chrono::NaiveDate;
use registry::{month_label, ListingRow, Registry};
use serde::Serialize;
use serde_json::Value;

/// One row of the public listing, in the shape the page and `/api/datasets` use.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListingEntry {
    pub id: String,
    pub url: String,
    pub display: String,
    pub description: String,
    pub format: String,
    pub name: String,
    pub month: Option<String>,
    pub keywords: Vec<String>,
    pub filters: Vec<String>,
    /// Set only for ids the prober can answer for (registered, local file).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_url: Option<String>,
}

fn metadata_url(registry: &Registry, id: &str) -> Option<String> {
    registry
        .lookup(id)
        .filter(|d| d.is_local())
        .map(|d| format!("/api/datasets/{}/metadata", d.id))
}

pub fn entries_from_registry(registry: &Registry) -> Vec<ListingEntry> {
    registry
        .list()
        .iter()
        .map(|d| ListingEntry {
            id: d.id.clone(),
            url: d.url.clone(),
            display: d.display_name().to_string(),
            description: d.description.clone(),
            format: d.format.as_str().to_string(),
            name: d.name.clone(),
            month: d.last_updated.as_deref().and_then(parse_declared_date).map(month_label),
            keywords: d.tags.clone(),
            filters: normalize_filters(&d.filters),
            metadata_url: metadata_url(registry, &d.id),
        })
        .collect()
}

pub fn entries_from_listing(rows: Vec<ListingRow>, registry: &Registry) -> Vec<ListingEntry> {
    rows.into_iter()
        .map(|r| ListingEntry {
            metadata_url: metadata_url(registry, &r.id),
            id: r.id,
            url: r.url,
            display: r.display,
            description: r.description,
            format: r.format,
            name: r.name,
            month: r.month,
            keywords: r.keywords,
            filters: r.filters,
        })
        .collect()
}

/// `filters` is hand-authored and may be a bare string; always hand back a list.
pub fn normalize_filters(v: &Value) -> Vec<String> {
    match v {
        Value::Array(items) => items
            .iter()
            .filter_map(|i| match i {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                Value::Null => None,
                Value::String(_) => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(s) if s.is_empty() => vec![],
        Value::String(s) => vec![s.clone()],
        Value::Null | Value::Bool(false) => vec![],
        other => vec![other.to_string()],
    }
}

// "2023-09-01" or a full RFC 3339 timestamp
fn parse_declared_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d").ok()
}

pub fn render_page(entries: &[ListingEntry]) -> String {
    let mut html = String::from(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Datasets</title>\n</head>\n<body>\n<main>\n<h1>Datasets</h1>\n",
    );

    if entries.is_empty() {
        html.push_str("<p>No datasets published.</p>\n");
    } else {
        html.push_str("<ul class=\"datasets\">\n");
        for e in entries {
            html.push_str(&render_entry(e));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_entry(e: &ListingEntry) -> String {
    let mut li = format!(
        "<li id=\"{id}\">\n<h2><a href=\"{url}\">{display}</a></h2>\n",
        id = escape(&e.id),
        url = escape(&e.url),
        display = escape(&e.display),
    );
    if let Some(month) = &e.month {
        li.push_str(&format!("<p class=\"month\">{}</p>\n", escape(month)));
    }
    li.push_str(&format!(
        "<p>{}</p>\n<p class=\"format\">{}</p>\n",
        escape(&e.description),
        escape(&e.format)
    ));
    if !e.keywords.is_empty() {
        let tags: Vec<String> = e.keywords.iter().map(|k| escape(k)).collect();
        li.push_str(&format!("<p class=\"keywords\">{}</p>\n", tags.join(", ")));
    }
    if let Some(href) = &e.metadata_url {
        li.push_str(&format!("<p><a href=\"{}\">metadata</a></p>\n", escape(href)));
    }
    li.push_str("</li>\n");
    li
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_filters() {
        assert_eq!(normalize_filters(&json!(["a", "b"])), vec!["a", "b"]);
        assert_eq!(normalize_filters(&json!("solo")), vec!["solo"]);
        assert!(normalize_filters(&json!(null)).is_empty());
        assert!(normalize_filters(&json!("")).is_empty());
        assert_eq!(normalize_filters(&json!(["a", null, ""])), vec!["a"]);
    }

    #[test]
    fn test_entries_from_builtin_registry() {
        let reg = Registry::builtin().unwrap();
        let entries = entries_from_registry(&reg);
        assert_eq!(entries.len(), 2);

        let profs = &entries[0];
        assert_eq!(profs.id, "uvm-professors-2023");
        assert_eq!(profs.display, "UVM Professors (2023)");
        assert_eq!(profs.format, "CSV");
        assert_eq!(profs.month.as_deref(), Some("Sep 2023"));
        assert_eq!(profs.filters, vec!["faculty", "people"]);

        // scalar filters in the registry get wrapped
        assert_eq!(entries[1].filters, vec!["organization"]);
        assert_eq!(
            profs.metadata_url.as_deref(),
            Some("/api/datasets/uvm-professors-2023/metadata")
        );
    }

    #[test]
    fn test_metadata_url_only_for_registered_local_ids() {
        let reg = Registry::from_json(
            r#"[{"id":"local","name":"L","description":"","url":"/data/l.csv","format":"CSV"},
                {"id":"remote","name":"R","description":"","url":"https://example.org/r.csv","format":"CSV"}]"#,
        )
        .unwrap();
        let row = |id: &str, url: &str| ListingRow {
            id: id.into(),
            url: url.into(),
            display: id.into(),
            description: String::new(),
            format: "CSV".into(),
            name: id.into(),
            date: None,
            month: None,
            keywords: vec![],
            filters: vec![],
        };
        let entries = entries_from_listing(
            vec![row("local", "/data/l.csv"), row("remote", "/data/r.csv"), row("csv-only", "/data/c.csv")],
            &reg,
        );
        let urls: Vec<Option<&str>> = entries.iter().map(|e| e.metadata_url.as_deref()).collect();
        assert_eq!(urls, vec![Some("/api/datasets/local/metadata"), None, None]);

        let html = render_page(&entries);
        assert!(html.contains("/api/datasets/local/metadata"));
        assert!(!html.contains("/api/datasets/csv-only/metadata"));
    }

    #[test]
    fn test_declared_date_formats() {
        assert_eq!(parse_declared_date("2023-09-01"), NaiveDate::from_ymd_opt(2023, 9, 1));
        assert_eq!(parse_declared_date("2024-02-29T10:00:00Z"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_declared_date("Sept"), None);
    }

    #[test]
    fn test_render_page_escapes_text() {
        let entry = ListingEntry {
            id: "x".into(),
            url: "/data/x.csv".into(),
            display: "<script>alert(1)</script>".into(),
            description: "Tom & Jerry".into(),
            format: "CSV".into(),
            name: "X".into(),
            month: Some("Jan 2024".into()),
            keywords: vec!["a\"b".into()],
            filters: vec![],
            metadata_url: Some("/api/datasets/x/metadata".into()),
        };
        let html = render_page(&[entry]);
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(html.contains("a&quot;b"));
        assert!(html.contains("/api/datasets/x/metadata"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_render_empty_page() {
        assert!(render_page(&[]).contains("No datasets published."));
    }
}
