// File: crates/tsplot-core/src/frame.rs
// Summary: Rectangular table (index + numeric columns) and the in-place reshaping the charts need.

use chrono::{NaiveDateTime, Timelike};

use crate::error::{PlotError, Result};

/// Row key of a [`Frame`].
#[derive(Clone, Debug, PartialEq)]
pub enum Index {
    DateTime(Vec<NaiveDateTime>),
    Number(Vec<f64>),
    Label(Vec<String>),
}

impl Index {
    pub fn len(&self) -> usize {
        match self {
            Index::DateTime(v) => v.len(),
            Index::Number(v) => v.len(),
            Index::Label(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn is_datetime(&self) -> bool { matches!(self, Index::DateTime(_)) }

    /// Position of row `i` on a numeric axis: days since the Unix epoch for
    /// dates, the value itself for numbers, the row number for labels.
    pub fn x_value(&self, i: usize) -> f64 {
        match self {
            Index::DateTime(v) => datetime_to_days(&v[i]),
            Index::Number(v) => v[i],
            Index::Label(_) => i as f64,
        }
    }

    pub fn x_values(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.x_value(i)).collect()
    }

    /// Display text for row `i` (bar categories, waterfall steps).
    pub fn label(&self, i: usize) -> String {
        match self {
            Index::DateTime(v) => {
                let t = v[i];
                if t.time().num_seconds_from_midnight() == 0 {
                    t.format("%Y-%m-%d").to_string()
                } else {
                    t.format("%Y-%m-%d %H:%M").to_string()
                }
            }
            Index::Number(v) => format_number(v[i]),
            Index::Label(v) => v[i].clone(),
        }
    }

    fn select(&self, rows: &[usize]) -> Index {
        match self {
            Index::DateTime(v) => Index::DateTime(rows.iter().map(|&r| v[r]).collect()),
            Index::Number(v) => Index::Number(rows.iter().map(|&r| v[r]).collect()),
            Index::Label(v) => Index::Label(rows.iter().map(|&r| v[r].clone()).collect()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self { name: name.into(), values }
    }

    /// Non-missing values in row order.
    pub fn valid(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|v| !v.is_nan()).collect()
    }
}

/// Which rows to drop because of missing values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DropNa {
    #[default]
    No,
    Any,
    All,
}

impl std::str::FromStr for DropNa {
    type Err = PlotError;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no" | "none" | "" => Ok(DropNa::No),
            "any" => Ok(DropNa::Any),
            "all" => Ok(DropNa::All),
            other => Err(PlotError::invalid("dropna", format!("expected no, any or all, got '{other}'"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub index: Index,
    pub columns: Vec<Column>,
}

impl Frame {
    /// Build a frame, checking every column matches the index length.
    pub fn new(index: Index, columns: Vec<Column>) -> Result<Self> {
        let n = index.len();
        if let Some(c) = columns.iter().find(|c| c.values.len() != n) {
            return Err(PlotError::invalid(
                "columns",
                format!("column '{}' has {} rows, index has {}", c.name, c.values.len(), n),
            ));
        }
        Ok(Self { index, columns })
    }

    pub fn nrows(&self) -> usize { self.index.len() }
    pub fn ncols(&self) -> usize { self.columns.len() }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, i: usize) -> &Column { &self.columns[i] }

    /// Keep only `rows`, in the given order.
    pub fn take_rows(&mut self, rows: &[usize]) {
        self.index = self.index.select(rows);
        for c in &mut self.columns {
            c.values = rows.iter().map(|&r| c.values[r]).collect();
        }
    }

    /// Pick, reorder or duplicate columns by 1-based number or by name.
    pub fn pick(&mut self, picks: &[String]) -> Result<()> {
        if picks.is_empty() { return Ok(()); }
        let mut out = Vec::with_capacity(picks.len());
        for p in picks {
            let p = p.trim();
            let idx = match p.parse::<usize>() {
                Ok(n) if n >= 1 && n <= self.columns.len() => n - 1,
                _ => self
                    .columns
                    .iter()
                    .position(|c| c.name == p)
                    .ok_or_else(|| PlotError::UnknownColumn(p.to_string()))?,
            };
            out.push(self.columns[idx].clone());
        }
        self.columns = out;
        Ok(())
    }

    pub fn drop_na(&mut self, how: DropNa) {
        if how == DropNa::No || self.columns.is_empty() { return; }
        let rows: Vec<usize> = (0..self.nrows())
            .filter(|&r| {
                let mut missing = self.columns.iter().map(|c| c.values[r].is_nan());
                match how {
                    DropNa::Any => !missing.any(|m| m),
                    DropNa::All => !missing.all(|m| m),
                    DropNa::No => true,
                }
            })
            .collect();
        if rows.len() != self.nrows() {
            tracing::debug!(dropped = self.nrows() - rows.len(), ?how, "dropped rows with missing values");
            self.take_rows(&rows);
        }
    }

    /// Sort the index ascending and keep the first of any duplicated keys.
    pub fn clean(&mut self) {
        let n = self.nrows();
        let mut rows: Vec<usize> = (0..n).collect();
        match &self.index {
            Index::DateTime(v) => {
                rows.sort_by_key(|&r| v[r]);
                rows.dedup_by(|a, b| v[*a] == v[*b]);
            }
            Index::Number(v) => {
                rows.sort_by(|&a, &b| v[a].total_cmp(&v[b]));
                rows.dedup_by(|a, b| v[*a] == v[*b]);
            }
            // labels keep their order, only duplicates go
            Index::Label(v) => {
                let mut seen = std::collections::HashSet::new();
                rows.retain(|&r| seen.insert(v[r].clone()));
            }
        }
        if rows.iter().copied().ne(0..n) {
            self.take_rows(&rows);
        }
    }

    /// Trim leading and trailing rows where every column is missing.
    pub fn trim_por(&mut self) {
        let has_value = |r: usize| self.columns.iter().any(|c| !c.values[r].is_nan());
        let n = self.nrows();
        let first = (0..n).find(|&r| has_value(r));
        let last = (0..n).rev().find(|&r| has_value(r));
        let rows: Vec<usize> = match (first, last) {
            (Some(f), Some(l)) => (f..=l).collect(),
            _ => Vec::new(),
        };
        if rows.len() != n {
            self.take_rows(&rows);
        }
    }

    /// Inclusive filter on the index; bounds are parsed like index values.
    pub fn filter_range(&mut self, start: Option<&str>, end: Option<&str>) -> Result<()> {
        if start.is_none() && end.is_none() { return Ok(()); }
        let rows: Vec<usize> = match &self.index {
            Index::DateTime(v) => {
                let s = start.map(|s| parse_bound("start_date", s)).transpose()?;
                let e = end.map(|s| parse_bound("end_date", s)).transpose()?;
                (0..v.len())
                    .filter(|&r| s.map_or(true, |s| v[r] >= s) && e.map_or(true, |e| v[r] <= e))
                    .collect()
            }
            Index::Number(v) => {
                let s = start.map(|s| parse_number_bound("start_date", s)).transpose()?;
                let e = end.map(|s| parse_number_bound("end_date", s)).transpose()?;
                (0..v.len())
                    .filter(|&r| s.map_or(true, |s| v[r] >= s) && e.map_or(true, |e| v[r] <= e))
                    .collect()
            }
            Index::Label(v) => {
                // positional slice between the matching labels
                let s = start.and_then(|s| v.iter().position(|l| l == s)).unwrap_or(0);
                let e = end.and_then(|e| v.iter().position(|l| l == e)).unwrap_or(v.len().saturating_sub(1));
                (s..=e.min(v.len().saturating_sub(1))).filter(|_| !v.is_empty()).collect()
            }
        };
        self.take_rows(&rows);
        Ok(())
    }

    /// Round a datetime index to the nearest unit (`D`, `H`, `T`/`min`, `S`); halves round up.
    pub fn round_index(&mut self, unit: &str) -> Result<()> {
        let Index::DateTime(v) = &mut self.index else { return Ok(()); };
        let secs: i64 = match unit.trim() {
            "D" | "d" => 86_400,
            "H" | "h" => 3_600,
            "T" | "min" => 60,
            "S" | "s" => 1,
            other => return Err(PlotError::invalid("round_index", format!("unknown unit '{other}'"))),
        };
        for t in v.iter_mut() {
            let ts = t.and_utc().timestamp();
            let rounded = (ts + secs / 2).div_euclid(secs) * secs;
            if let Some(r) = chrono::DateTime::from_timestamp(rounded, 0) {
                *t = r.naive_utc();
            }
        }
        Ok(())
    }

    /// Replace the index with row positions 0..n.
    pub fn reset_index(&mut self) {
        self.index = Index::Number((0..self.nrows()).map(|i| i as f64).collect());
    }

    pub fn rename(&mut self, names: &[String]) {
        for (c, n) in self.columns.iter_mut().zip(names) {
            c.name = n.clone();
        }
    }

    /// Running totals of every column; missing values contribute nothing.
    pub fn cumsum(&mut self) {
        for c in &mut self.columns {
            let mut acc = 0.0;
            for v in c.values.iter_mut() {
                if !v.is_nan() {
                    acc += *v;
                    *v = acc;
                }
            }
        }
    }

    /// Two-column sub-frame used by paired x/y charts.
    pub fn pair(&self, x: usize, y: usize) -> Frame {
        Frame { index: self.index.clone(), columns: vec![self.columns[x].clone(), self.columns[y].clone()] }
    }
}

pub fn datetime_to_days(t: &NaiveDateTime) -> f64 {
    let u = t.and_utc();
    u.timestamp() as f64 / 86_400.0 + u.timestamp_subsec_nanos() as f64 / 86_400e9
}

pub fn days_to_datetime(days: f64) -> Option<NaiveDateTime> {
    let secs = (days * 86_400.0).round() as i64;
    chrono::DateTime::from_timestamp(secs, 0).map(|d| d.naive_utc())
}

pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 { format!("{}", v as i64) } else { format!("{v}") }
}

fn parse_bound(option: &'static str, s: &str) -> Result<NaiveDateTime> {
    crate::ingest::parse_datetime(s).ok_or_else(|| PlotError::invalid(option, format!("'{s}' is not a date")))
}

fn parse_number_bound(option: &'static str, s: &str) -> Result<f64> {
    s.trim().parse::<f64>().map_err(|_| PlotError::invalid(option, format!("'{s}' is not a number")))
}
