//! Terminal line chart

/// Plot `values` as a `width` x `height` character chart with a labelled
/// y-axis. Returns `None` when there is nothing finite to draw.
pub fn line_chart(values: &[f64], width: usize, height: usize) -> Option<String> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || width == 0 || height < 2 {
        return None;
    }

    let columns = resample(&finite, width);
    let (min, max) = columns
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let span = (max - min).max(f64::EPSILON);

    let mut grid = vec![vec![' '; columns.len()]; height];
    for (x, value) in columns.iter().enumerate() {
        let level = ((value - min) / span * (height - 1) as f64).round() as usize;
        grid[height - 1 - level.min(height - 1)][x] = '•';
    }

    let top = format!("{max:.2}");
    let bottom = format!("{min:.2}");
    let label_width = top.len().max(bottom.len());

    let mut out = String::new();
    for (row, cells) in grid.iter().enumerate() {
        let label = match row {
            0 => top.as_str(),
            r if r == height - 1 => bottom.as_str(),
            _ => "",
        };
        let line: String = cells.iter().collect();
        out.push_str(&format!("{label:>label_width$} │{}\n", line.trim_end()));
    }
    out.push_str(&format!(
        "{:>label_width$} └{}",
        "",
        "─".repeat(columns.len())
    ));
    Some(out)
}

/// Down-sample to at most `width` points, keeping the last value per bucket
fn resample(values: &[f64], width: usize) -> Vec<f64> {
    if values.len() <= width {
        return values.to_vec();
    }
    (0..width)
        .map(|i| {
            let end = ((i + 1) * values.len()) / width;
            values[end.saturating_sub(1)]
        })
        .collect()
}
