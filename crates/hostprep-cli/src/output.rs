use hostprep_core::runner::ExecutionReport;

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    // Calculate column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  ").trim_end());

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

/// One row per action run: name, outcome, and the steps that failed.
pub fn summary_rows(report: &ExecutionReport) -> Vec<Vec<String>> {
    report
        .actions
        .iter()
        .map(|a| {
            let failed: Vec<&str> = a.failed_steps().map(|s| s.name.as_str()).collect();
            vec![a.name.clone(), a.outcome.to_string(), failed.join(", ")]
        })
        .collect()
}

pub fn print_summary(report: &ExecutionReport) {
    println!();
    print_table(&["ACTION", "OUTCOME", "FAILED STEPS"], summary_rows(report));
}
