use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HeadingCounts {
    pub h1: u32,
    pub h2: u32,
    pub h3: u32,
    pub h4: u32,
    pub h5: u32,
    pub h6: u32,
}

impl HeadingCounts {
    /// Levels in document order, keyed by their lowercase tag name.
    pub fn levels(&self) -> [(&'static str, u32); 6] {
        [
            ("h1", self.h1),
            ("h2", self.h2),
            ("h3", self.h3),
            ("h4", self.h4),
            ("h5", self.h5),
            ("h6", self.h6),
        ]
    }

    pub fn total(&self) -> u32 {
        self.levels().iter().map(|(_, n)| n).sum()
    }
}

/// One analyzed page as reported by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CrawlItem {
    pub id: i64,
    #[serde(default, alias = "htmlVersion", deserialize_with = "null_as_default")]
    pub html_version: String,
    #[serde(default, alias = "pageTitle", deserialize_with = "null_as_default")]
    pub page_title: String,
    #[serde(default, alias = "headingCounts")]
    pub heading_counts: Option<HeadingCounts>,
    #[serde(default, alias = "internalLinkCount", deserialize_with = "null_as_default")]
    pub internal_link_count: u32,
    #[serde(default, alias = "externalLinkCount", deserialize_with = "null_as_default")]
    pub external_link_count: u32,
    #[serde(default, alias = "inaccessibleLinkCount", deserialize_with = "null_as_default")]
    pub inaccessible_link_count: u32,
    #[serde(default, alias = "hasLoginForm", deserialize_with = "null_as_default")]
    pub has_login_form: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub error: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CrawlItem {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            html_version: String::new(),
            page_title: String::new(),
            heading_counts: None,
            internal_link_count: 0,
            external_link_count: 0,
            inaccessible_link_count: 0,
            has_login_form: false,
            url: None,
            error: String::new(),
            created_at: None,
        }
    }

    /// An empty error string means the crawl succeeded.
    pub fn is_success(&self) -> bool {
        self.error.is_empty()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ListResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub list: Vec<CrawlItem>,
    #[serde(default, alias = "totalCount", deserialize_with = "null_as_default")]
    pub total_count: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmitResponse {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MessageResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitRequest<'a> {
    pub url: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteRequest<'a> {
    pub ids: &'a [i64],
}

/// Columns the backend accepts in the `sorting` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SortColumn {
    Id,
    PageTitle,
    Url,
    HtmlVersion,
    Error,
    CreatedAt,
}

impl SortColumn {
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Id,
        SortColumn::PageTitle,
        SortColumn::Url,
        SortColumn::HtmlVersion,
        SortColumn::Error,
        SortColumn::CreatedAt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::PageTitle => "page_title",
            SortColumn::Url => "url",
            SortColumn::HtmlVersion => "html_version",
            SortColumn::Error => "error",
            SortColumn::CreatedAt => "created_at",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "id" => Some(SortColumn::Id),
            "page_title" | "title" => Some(SortColumn::PageTitle),
            "url" => Some(SortColumn::Url),
            "html_version" | "version" => Some(SortColumn::HtmlVersion),
            "error" | "status" => Some(SortColumn::Error),
            "created_at" | "date" => Some(SortColumn::CreatedAt),
            _ => None,
        }
    }
}

/// The backend reads the boolean flag as "ascending".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_flag(&self) -> bool {
        matches!(self, SortDirection::Ascending)
    }

    pub fn from_flag(flag: bool) -> Self {
        if flag {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" | "true" => Some(SortDirection::Ascending),
            "desc" | "descending" | "false" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

/// Actively sorted columns. A column that is absent is unsorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    columns: BTreeMap<SortColumn, SortDirection>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by(column: SortColumn, direction: SortDirection) -> Self {
        let mut spec = Self::new();
        spec.columns.insert(column, direction);
        spec
    }

    pub fn get(&self, column: SortColumn) -> Option<SortDirection> {
        self.columns.get(&column).copied()
    }

    pub fn set(&mut self, column: SortColumn, direction: SortDirection) {
        self.columns.insert(column, direction);
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SortColumn, SortDirection)> + '_ {
        self.columns.iter().map(|(c, d)| (*c, *d))
    }

    /// Next spec after clicking `column`: unset -> `false` -> `true` -> `false`.
    /// Every other column is dropped.
    pub fn toggled(&self, column: SortColumn) -> Self {
        let next = match self.get(column) {
            None => SortDirection::Descending,
            Some(current) => SortDirection::from_flag(!current.as_flag()),
        };
        Self::by(column, next)
    }

    pub fn to_json(&self) -> String {
        // A map of string keys to booleans cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Serialize for SortSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, direction) in &self.columns {
            map.serialize_entry(column.as_str(), &direction.as_flag())?;
        }
        map.end()
    }
}

/// Parameters of one `GET /crawl/list` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub query: String,
    pub sorting: SortSpec,
}

impl ListQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("currPage", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("query", self.query.clone()),
            ("sorting", self.sorting.to_json()),
        ]
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            query: String::new(),
            sorting: SortSpec::new(),
        }
    }
}
