//! Derived, read-only views over the record collection.

use std::fmt;
use std::str::FromStr;

use crate::model::{Record, RecordKind, Status};

/// Status selector for the list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn matches(self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<Status>().map(StatusFilter::Only)
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{status}"),
        }
    }
}

/// Records of one kind, in collection order.
pub fn by_kind(records: &[Record], kind: RecordKind) -> Vec<&Record> {
    records.iter().filter(|r| r.kind() == kind).collect()
}

pub fn by_status(records: Vec<&Record>, filter: StatusFilter) -> Vec<&Record> {
    match filter {
        StatusFilter::All => records,
        StatusFilter::Only(_) => records
            .into_iter()
            .filter(|r| filter.matches(r.status()))
            .collect(),
    }
}

/// Selected tab and status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub kind: RecordKind,
    pub filter: StatusFilter,
}

impl ViewState {
    /// Switch tabs. The status filter goes back to `All`.
    pub fn select_kind(&mut self, kind: RecordKind) {
        self.kind = kind;
        self.filter = StatusFilter::All;
    }

    pub fn select_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }
}

/// What the list renders.
#[derive(Debug)]
pub struct View<'a> {
    pub items: Vec<&'a Record>,
    /// Records of the selected kind before status filtering.
    pub total_in_kind: usize,
}

impl View<'_> {
    /// Nothing of this kind exists at all, as opposed to nothing matching the filter.
    pub fn kind_is_empty(&self) -> bool {
        self.total_in_kind == 0
    }
}

pub fn view<'a>(records: &'a [Record], state: &ViewState) -> View<'a> {
    let in_kind = by_kind(records, state.kind);
    let total_in_kind = in_kind.len();
    View {
        items: by_status(in_kind, state.filter),
        total_in_kind,
    }
}
