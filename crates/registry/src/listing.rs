//! Cleaned listing table.
//!
//! Besides the registry, the site can be driven by a hand-maintained CSV
//! export (one row per dataset, list columns comma-separated inside the
//! cell). Loading it yields display-ready rows: dates parsed, a month label
//! derived, list columns split, and hidden rows dropped.

use std::io::Read;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

const DATE_FORMAT: &str = "%m/%d/%Y";
const MONTH_FORMAT: &str = "%b %Y";

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Deserialize)]
struct RawRow {
    id: String,
    url: String,
    #[serde(default)]
    display: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    format: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    keywords: String,
    #[serde(default)]
    filters: String,
    #[serde(default)]
    hide_all: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ListingRow {
    pub id: String,
    pub url: String,
    pub display: String,
    pub description: String,
    pub format: String,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub month: Option<String>,
    pub keywords: Vec<String>,
    pub filters: Vec<String>,
}

/// Splits a comma-separated cell into trimmed, non-empty entries.
pub fn split_list(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn month_label(date: NaiveDate) -> String {
    date.format(MONTH_FORMAT).to_string()
}

// any non-blank flag hides the row, "0" and "false" included
fn is_hidden(cell: &str) -> bool {
    !cell.trim().is_empty()
}

pub fn load_listing<R: Read>(reader: R) -> Result<Vec<ListingRow>, ListingError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    for rec in rdr.deserialize::<RawRow>() {
        let raw = rec?;
        if is_hidden(&raw.hide_all) {
            continue;
        }

        let date = if raw.date.is_empty() {
            None
        } else {
            match NaiveDate::parse_from_str(&raw.date, DATE_FORMAT) {
                Ok(d) => Some(d),
                Err(e) => {
                    warn!(id = %raw.id, date = %raw.date, "listing: unparsable date: {e}");
                    None
                }
            }
        };

        out.push(ListingRow {
            month: date.map(month_label),
            date,
            keywords: split_list(&raw.keywords),
            filters: split_list(&raw.filters),
            id: raw.id,
            url: raw.url,
            display: raw.display,
            description: raw.description,
            format: raw.format,
            name: raw.name,
        });
    }
    Ok(out)
}

pub fn load_listing_file(path: &std::path::Path) -> Result<Vec<ListingRow>, ListingError> {
    let f = std::fs::File::open(path)?;
    load_listing(std::io::BufReader::new(f))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
id,url,display,description,format,name,date,keywords,filters,hide_all
profs,/data/uvm_profs_2023.csv,Professors,Faculty list,CSV,UVM Professors,09/15/2023,\"professors, research ,uvm\",faculty,
draft,/data/draft.csv,Draft,Not ready,CSV,Draft,01/02/2024,draft,,true
depts,/data/uvm_depts_to_colleges.csv,Departments,Dept map,CSV,UVM Departments,not-a-date,,\"org,\",
";

    #[test]
    fn test_load_listing_cleans_rows() {
        let rows = load_listing(CSV.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        let profs = &rows[0];
        assert_eq!(profs.id, "profs");
        assert_eq!(profs.date, NaiveDate::from_ymd_opt(2023, 9, 15));
        assert_eq!(profs.month.as_deref(), Some("Sep 2023"));
        assert_eq!(profs.keywords, vec!["professors", "research", "uvm"]);
        assert_eq!(profs.filters, vec!["faculty"]);

        let depts = &rows[1];
        assert_eq!(depts.date, None);
        assert_eq!(depts.month, None);
        assert!(depts.keywords.is_empty());
        assert_eq!(depts.filters, vec!["org"]);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" a , b,,c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_any_hide_flag_drops_row() {
        let csv = "id,url,hide_all\na,/a.csv,y\nb,/b.csv,hidden\nc,/c.csv,FALSE\nd,/d.csv,\ne,/e.csv,  \n";
        let rows = load_listing(csv.as_bytes()).unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "e"]);
    }
}
