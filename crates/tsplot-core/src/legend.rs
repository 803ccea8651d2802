// File: crates/tsplot-core/src/legend.rs
// Summary: Series-count checks and legend name resolution for a chart's input frame.

use std::collections::HashSet;

use crate::charts::PlotKind;
use crate::error::{PlotError, Result};
use crate::frame::Frame;

/// Validate the column count for `kind` and resolve one legend label per drawn trace.
///
/// Paired charts (`xy`, `double_mass`) get one label per x,y pair.
pub fn check_column_legend(kind: PlotKind, frame: &mut Frame, legend_names: &[String]) -> Result<Vec<String>> {
    let ncols = frame.ncols();
    if kind.single_series() && ncols != 1 {
        return Err(PlotError::SeriesCount { kind: kind.name(), expected: 1, found: ncols });
    }

    if legend_names.is_empty() {
        return Ok(default_labels(kind, frame));
    }

    let unique: HashSet<&String> = legend_names.iter().collect();
    if unique.len() != legend_names.len() {
        return Err(PlotError::DuplicateLegend { names: legend_names.to_vec() });
    }

    if kind.paired() {
        let npairs = if ncols == 1 { 1 } else { ncols / 2 };
        if legend_names.len() == npairs {
            if ncols == 1 {
                frame.columns[0].name = legend_names[0].clone();
            } else {
                for (pair, name) in legend_names.iter().enumerate() {
                    frame.columns[pair * 2 + 1].name = name.clone();
                }
            }
            return Ok(legend_names.to_vec());
        }
    }

    if legend_names.len() == ncols {
        frame.rename(legend_names);
        return Ok(default_labels(kind, frame));
    }

    Err(PlotError::LegendCount { columns: ncols, names: legend_names.len() })
}

fn default_labels(kind: PlotKind, frame: &Frame) -> Vec<String> {
    if kind.paired() && frame.ncols() > 1 {
        frame.columns.iter().skip(1).step_by(2).map(|c| c.name.clone()).collect()
    } else {
        frame.names()
    }
}

/// Fail unless a paired chart has an even number of columns (or a single y column).
pub fn check_pairs(kind: PlotKind, frame: &Frame) -> Result<usize> {
    let n = frame.ncols();
    if n == 1 {
        return Ok(1);
    }
    if n % 2 != 0 {
        return Err(PlotError::ColumnParity { kind: kind.name(), columns: n });
    }
    Ok(n / 2)
}
