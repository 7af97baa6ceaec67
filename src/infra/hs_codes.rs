//! HS code lookup with an ordered fallback chain.
//!
//! Sources are tried in order and the first non-empty list wins. When every
//! source fails the built-in list is used, so lookup never comes back empty.

use std::collections::HashMap;

use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;

use super::reference::{fetch_text, ReferenceError};
use crate::domain::HsCode;

/// Only six-digit subheadings are offered in the picker.
const SUBHEADING_LEVEL: &str = "6";

pub const BUILTIN_LABEL: &str = "built-in list";

#[derive(Clone, Debug, PartialEq)]
pub enum HsCodeSource {
    /// JSON array of `{code, description}` objects, optionally wrapped in `{data: [...]}`.
    RemoteJson(Url),
    /// Comma-separated code table (`section,hscode,description,parent,level`)
    /// plus a section-name table (`section,name`).
    FlatFiles { codes_url: Url, sections_url: Url },
    /// Fixed list supplied by the caller.
    Static { label: String, codes: Vec<HsCode> },
}

impl HsCodeSource {
    pub fn label(&self) -> String {
        match self {
            HsCodeSource::RemoteJson(url) => {
                format!("remote list ({})", url.host_str().unwrap_or("unknown host"))
            }
            HsCodeSource::FlatFiles { codes_url, .. } => format!(
                "code tables ({})",
                codes_url.host_str().unwrap_or("unknown host")
            ),
            HsCodeSource::Static { label, .. } => label.clone(),
        }
    }

    async fn fetch(&self, http: &Client) -> Result<Vec<HsCode>, ReferenceError> {
        match self {
            HsCodeSource::RemoteJson(url) => {
                let body = fetch_text(http, url.clone()).await?;
                parse_hs_json(&body)
            }
            HsCodeSource::FlatFiles {
                codes_url,
                sections_url,
            } => {
                let codes = fetch_text(http, codes_url.clone()).await?;
                let sections = match fetch_text(http, sections_url.clone()).await {
                    Ok(body) => parse_sections(&body),
                    Err(err) => {
                        warn!(error = %err, "HS section names unavailable; continuing without them");
                        HashMap::new()
                    }
                };
                parse_code_table(&codes, &sections)
            }
            HsCodeSource::Static { codes, .. } => Ok(codes.clone()),
        }
    }
}

/// Outcome of walking the chain.
#[derive(Clone, Debug, PartialEq)]
pub struct HsCodeLoad {
    pub codes: Vec<HsCode>,
    /// Label of the source that produced `codes`.
    pub source: String,
    /// One message per source that failed before `source` succeeded.
    pub failures: Vec<String>,
}

impl HsCodeLoad {
    pub fn is_fallback(&self) -> bool {
        !self.failures.is_empty()
    }
}

pub async fn load_chain(http: &Client, sources: &[HsCodeSource]) -> HsCodeLoad {
    let mut failures = Vec::new();

    for source in sources {
        let label = source.label();
        match source.fetch(http).await {
            Ok(codes) if !codes.is_empty() => {
                info!(source = %label, count = codes.len(), "loaded HS codes");
                return HsCodeLoad {
                    codes,
                    source: label,
                    failures,
                };
            }
            Ok(_) => {
                warn!(source = %label, "HS code source returned no entries");
                failures.push(format!("{label}: {}", ReferenceError::Empty("HS code source")));
            }
            Err(err) => {
                warn!(source = %label, error = %err, "HS code source failed");
                failures.push(format!("{label}: {err}"));
            }
        }
    }

    HsCodeLoad {
        codes: builtin_hs_codes(),
        source: BUILTIN_LABEL.to_string(),
        failures,
    }
}

/// Common product categories used when no source can be reached.
pub fn builtin_hs_codes() -> Vec<HsCode> {
    [
        ("8471.30", "Portable automatic data processing machines"),
        ("8517.12", "Mobile phones and smartphones"),
        ("8528.72", "Television reception apparatus, color"),
        (
            "8542.31",
            "Electronic integrated circuits - processors and controllers",
        ),
        ("8703.23", "Motor vehicles with spark-ignition engine"),
        ("8708.29", "Parts and accessories of motor vehicles"),
        ("9013.80", "Liquid crystal devices and optical appliances"),
        ("9504.50", "Video game consoles and machines"),
        ("6110.20", "Sweaters, pullovers, sweatshirts of cotton"),
        ("6204.43", "Women's or girls' dresses of synthetic fibers"),
    ]
    .into_iter()
    .map(|(code, description)| HsCode::new(code, description))
    .collect()
}

#[derive(Debug, Deserialize)]
struct HsCodeDto {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct HsCodeWrapper {
    data: Vec<HsCodeDto>,
}

pub fn parse_hs_json(body: &str) -> Result<Vec<HsCode>, ReferenceError> {
    let entries = match serde_json::from_str::<Vec<HsCodeDto>>(body) {
        Ok(entries) => entries,
        Err(_) => serde_json::from_str::<HsCodeWrapper>(body)?.data,
    };
    Ok(entries
        .into_iter()
        .filter(|dto| !dto.code.trim().is_empty())
        .map(|dto| HsCode::new(dto.code.trim(), dto.description.trim()))
        .collect())
}

/// Section numeral → section name.
pub fn parse_sections(body: &str) -> HashMap<String, String> {
    let mut lines = body.lines().filter(|line| !line.trim().is_empty());
    let Some(header) = lines.next().map(split_record) else {
        return HashMap::new();
    };
    let (Some(section_idx), Some(name_idx)) = (column(&header, "section"), column(&header, "name"))
    else {
        return HashMap::new();
    };

    lines
        .map(split_record)
        .filter_map(|fields| {
            let section = fields.get(section_idx)?.trim().to_string();
            let name = fields.get(name_idx)?.trim().to_string();
            (!section.is_empty()).then_some((section, name))
        })
        .collect()
}

pub fn parse_code_table(
    body: &str,
    sections: &HashMap<String, String>,
) -> Result<Vec<HsCode>, ReferenceError> {
    let mut lines = body.lines().filter(|line| !line.trim().is_empty());
    let header = lines
        .next()
        .map(split_record)
        .ok_or_else(|| ReferenceError::Decode("HS code table is empty".into()))?;

    let missing = |name: &str| ReferenceError::Decode(format!("HS code table has no `{name}` column"));
    let code_idx = column(&header, "hscode").ok_or_else(|| missing("hscode"))?;
    let desc_idx = column(&header, "description").ok_or_else(|| missing("description"))?;
    let section_idx = column(&header, "section");
    let level_idx = column(&header, "level");

    let codes = lines
        .map(split_record)
        .filter(|fields| {
            level_idx
                .and_then(|idx| fields.get(idx))
                .map(|level| level.trim() == SUBHEADING_LEVEL)
                .unwrap_or(true)
        })
        .filter_map(|fields| {
            let code = fields.get(code_idx)?.trim();
            if code.is_empty() {
                return None;
            }
            let description = fields.get(desc_idx).map(|d| d.trim()).unwrap_or_default();
            let section = section_idx
                .and_then(|idx| fields.get(idx))
                .and_then(|key| sections.get(key.trim()))
                .cloned();
            Some(HsCode {
                code: format_code(code),
                description: description.to_string(),
                section,
            })
        })
        .collect();

    Ok(codes)
}

/// `"847130"` → `"8471.30"`; anything that is not six digits is kept verbatim.
fn format_code(raw: &str) -> String {
    if raw.len() == 6 && raw.bytes().all(|b| b.is_ascii_digit()) {
        format!("{}.{}", &raw[..4], &raw[4..])
    } else {
        raw.to_string()
    }
}

fn column(header: &[String], name: &str) -> Option<usize> {
    header
        .iter()
        .position(|field| field.trim().eq_ignore_ascii_case(name))
}

/// Split one comma-separated record, honouring double quotes and `""` escapes.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}
