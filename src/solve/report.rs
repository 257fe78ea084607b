//! Rendering of cutting plans.

use std::io::Write;

use anyhow::Result;
use itertools::Itertools;
use prettytable::*;

use super::interpret::CuttingPlan;

/// Write the human-readable report: status, rod count, then one table per used rod.
pub fn write_text<W: Write>(writer: &mut W, plan: &CuttingPlan) -> Result<()> {
    writeln!(writer, "Status: {}", plan.status)?;

    let Some(objective) = plan.objective else {
        return Ok(());
    };
    writeln!(writer, "Rods used: {}", objective)?;

    for rod in &plan.rods {
        let mut table = Table::new();
        table.set_titles(row!["Length", "Pieces", "Subtotal"]);
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);

        for cut in &rod.cuts {
            table.add_row(row![
                r->cut.length,
                r->cut.count,
                r->cut.length as u64 * cut.count as u64,
            ]);
        }

        let pattern = rod
            .cuts
            .iter()
            .map(|cut| format!("{}x{}", cut.count, cut.length))
            .join(" + ");

        writeln!(writer, "\nRod {}: {}", rod.slot + 1, pattern)?;
        table.print(writer)?;
        writeln!(writer, "Used length: {}", rod.used_length)?;
        writeln!(writer, "Waste: {}", rod.slack)?;
    }

    if plan.rods.len() > 1 {
        writeln!(writer, "\nTotal waste: {}", plan.total_waste())?;
    }

    Ok(())
}

/// Write the plan as pretty-printed JSON.
pub fn write_json<W: Write>(writer: &mut W, plan: &CuttingPlan) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, plan)?;
    writeln!(writer)?;
    Ok(())
}

/// Write one `rod,length,count` row per cut on each used rod. Rods are numbered from 1.
pub fn write_csv<W: Write>(writer: &mut W, plan: &CuttingPlan) -> Result<()> {
    writeln!(writer, "rod,length,count")?;
    for rod in &plan.rods {
        for cut in &rod.cuts {
            writeln!(writer, "{},{},{}", rod.slot + 1, cut.length, cut.count)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solve::interpret::{CutCount, RodReport, SolveStatus};

    fn reference_plan() -> CuttingPlan {
        CuttingPlan {
            status: SolveStatus::Optimal,
            objective: Some(1),
            rod_length: 600,
            rods: vec![RodReport {
                slot: 0,
                cuts: vec![
                    CutCount { cut_index: 0, length: 20, count: 5 },
                    CutCount { cut_index: 1, length: 30, count: 2 },
                ],
                used_length: 160,
                slack: 440,
            }],
        }
    }

    fn render<F>(plan: &CuttingPlan, write: F) -> String
    where
        F: Fn(&mut Vec<u8>, &CuttingPlan) -> Result<()>,
    {
        let mut buffer = Vec::new();
        write(&mut buffer, plan).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_text_report() {
        let text = render(&reference_plan(), write_text);

        assert!(text.starts_with("Status: Optimal\nRods used: 1\n"));
        assert!(text.contains("Rod 1: 5x20 + 2x30"));
        assert!(text.contains("Length"));
        assert!(text.contains("Subtotal"));
        assert!(text.contains("100"));
        assert!(text.contains("60"));
        assert!(text.contains("Used length: 160"));
        assert!(text.contains("Waste: 440"));
        assert!(!text.contains("Total waste"));
    }

    #[test]
    fn test_text_report_without_solution() {
        let plan = CuttingPlan::unsolved(SolveStatus::Infeasible, 10);
        let text = render(&plan, write_text);

        assert_eq!(text, "Status: Infeasible\n");
    }

    #[test]
    fn test_text_report_for_empty_optimal_plan() {
        let plan = CuttingPlan {
            status: SolveStatus::Optimal,
            objective: Some(0),
            rod_length: 600,
            rods: Vec::new(),
        };
        let text = render(&plan, write_text);

        assert_eq!(text, "Status: Optimal\nRods used: 0\n");
    }

    #[test]
    fn test_json_report() {
        let json = render(&reference_plan(), write_json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["status"], "Optimal");
        assert_eq!(value["objective"], 1);
        assert_eq!(value["rod_length"], 600);
        assert_eq!(value["rods"][0]["slack"], 440);
        assert_eq!(value["rods"][0]["cuts"][1]["length"], 30);
        assert_eq!(value["rods"][0]["cuts"][1]["count"], 2);
    }

    #[test]
    fn test_json_report_without_solution() {
        let plan = CuttingPlan::unsolved(SolveStatus::NotSolved, 600);
        let json = render(&plan, write_json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["status"], "NotSolved");
        assert!(value["objective"].is_null());
        assert_eq!(value["rods"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_csv_report() {
        let csv = render(&reference_plan(), write_csv);

        assert_eq!(csv, "rod,length,count\n1,20,5\n1,30,2\n");
    }
}
