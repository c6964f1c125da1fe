//! Printable document assembly and tabular export.
//!
//! The actual PDF pipeline is an external collaborator; this module only
//! assembles the renderable content, the page size and the filename stem,
//! then hands it to a plain-text renderer that writes the file.

use crate::dates;
use crate::grading::{subject_grade, summarize, GradeScale, MarkEntry};
use crate::models::{Fee, Report};
use anyhow::{Context, Result};
use chrono::Local;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    /// Report cards.
    A4,
    /// Fee receipts.
    A5,
}

impl PageSize {
    fn width(&self) -> usize {
        match self {
            PageSize::A4 => 72,
            PageSize::A5 => 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    pub page: PageSize,
    /// Filename without extension; the renderer appends its own.
    pub filename_stem: String,
    pub lines: Vec<String>,
}

fn sanitize_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| if c == '/' || c == '\\' || c == ':' { '-' } else { c })
        .collect()
}

fn rule(page: PageSize) -> String {
    "=".repeat(page.width())
}

fn thin_rule(page: PageSize) -> String {
    "-".repeat(page.width())
}

fn centered(text: &str, page: PageSize) -> String {
    let width = page.width();
    if text.len() >= width {
        return text.to_string();
    }
    let pad = (width - text.len()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// Assemble a report card for printing: `Report_{studentName}_{month}`.
pub fn build_report_card(report: &Report, scale: &GradeScale) -> Document {
    let page = PageSize::A4;
    let marks: Vec<MarkEntry> = report
        .report_marks
        .iter()
        .map(|m| MarkEntry {
            max: m.max_marks,
            obtained: m.total_marks,
        })
        .collect();
    let summary = summarize(&marks, scale);

    let mut lines = Vec::new();
    lines.push(rule(page));
    lines.push(centered("REPORT CARD", page));
    lines.push(centered("Tuition Management System", page));
    lines.push(rule(page));
    lines.push(format!("Student : {}", report.student.std_name));
    lines.push(format!("ID      : #{}", report.student.std_id));
    lines.push(format!("Class   : {}", report.student.class_study));
    lines.push(format!(
        "Exam    : {}  ({} {})",
        report.exam_name, report.month, report.year
    ));
    lines.push(format!("Date    : {}", dates::to_display(Some(&report.date))));
    lines.push(thin_rule(page));
    lines.push(format!(
        "{:<28} {:>10} {:>10} {:>7}",
        "Subject", "Max", "Obtained", "Grade"
    ));
    lines.push(thin_rule(page));

    for (mark, entry) in report.report_marks.iter().zip(&marks) {
        lines.push(format!(
            "{:<28} {:>10} {:>10} {:>7}",
            mark.subject_name,
            mark.max_marks,
            mark.total_marks,
            subject_grade(*entry, scale)
        ));
    }

    lines.push(thin_rule(page));
    lines.push(format!(
        "{:<28} {:>10} {:>10}",
        "Total", summary.total_max, summary.total_obtained
    ));
    lines.push(String::new());
    lines.push(format!("Percentage    : {:.1}%", summary.percentage));
    lines.push(format!("Overall Grade : {}", summary.grade));
    lines.push(format!("Remarks       : {}", summary.remark));
    lines.push(String::new());
    lines.push(String::new());
    lines.push(format!(
        "{:<36}{:>36}",
        "____________________", "____________________"
    ));
    lines.push(format!("{:<36}{:>36}", "Teacher Signature", "Principal Signature"));
    lines.push(rule(page));

    Document {
        title: "Report Card".to_string(),
        page,
        filename_stem: sanitize_stem(&format!(
            "Report_{}_{}",
            report.student.std_name, report.month
        )),
        lines,
    }
}

/// Assemble a fee receipt: `Receipt_{feesId}_{studentName}`.
pub fn build_receipt(fee: &Fee) -> Document {
    let page = PageSize::A5;
    let receipt_no = fee
        .fees_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut lines = Vec::new();
    lines.push(rule(page));
    lines.push(centered("FEE RECEIPT", page));
    lines.push(centered("Tuition Management System", page));
    lines.push(rule(page));
    lines.push(format!("Receipt No : #{}", receipt_no));
    lines.push(format!("Date       : {}", dates::to_display(Some(&fee.date))));
    if let Some(issued_by) = &fee.issued_by {
        lines.push(format!("Issued By  : {}", issued_by));
    }
    lines.push(thin_rule(page));
    lines.push(format!("Student    : {}", fee.student.std_name));
    lines.push(format!("ID         : {}", fee.student.std_id));
    lines.push(format!("Class      : {}", fee.student.class_study));
    lines.push(thin_rule(page));
    lines.push(format!("Tuition fee for {}", fee.month));
    lines.push(format!("{:>width$}", format!("{} Rs", fee.amount), width = page.width()));
    lines.push(thin_rule(page));
    lines.push(format!(
        "{:<width$}",
        format!("Payment Mode: {}", fee.payment_mode.label()),
        width = page.width()
    ));
    lines.push(String::new());
    lines.push(format!("{:>width$}", "____________________", width = page.width()));
    lines.push(format!("{:>width$}", "Signature", width = page.width()));
    lines.push(rule(page));

    Document {
        title: "Fee Receipt".to_string(),
        page,
        filename_stem: sanitize_stem(&format!("Receipt_{}_{}", receipt_no, fee.student.std_name)),
        lines,
    }
}

/// Render a document to a plain-text file in the working directory.
pub fn write_document(doc: &Document) -> Result<PathBuf> {
    let filepath = PathBuf::from(format!("{}.txt", doc.filename_stem));
    let content = doc.lines.join("\n") + "\n";
    std::fs::write(&filepath, content)
        .with_context(|| format!("Failed to write {}", filepath.display()))?;
    Ok(filepath)
}

/// Export fee history to a timestamped CSV file.
pub fn export_fees_csv(fees: &[Fee]) -> Result<PathBuf> {
    if fees.is_empty() {
        anyhow::bail!("No fee records to export");
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let filepath = PathBuf::from(format!("fees_{}.csv", timestamp));

    let mut wtr = csv::Writer::from_path(&filepath).context("Failed to create CSV file")?;

    wtr.write_record([
        "receipt_id",
        "date",
        "student_id",
        "student_name",
        "month",
        "amount",
        "payment_mode",
        "issued_by",
    ])
    .context("Failed to write CSV headers")?;

    for fee in fees {
        wtr.write_record([
            fee.fees_id.map(|id| id.to_string()).unwrap_or_default(),
            fee.date.clone(),
            fee.student.std_id.clone(),
            fee.student.std_name.clone(),
            fee.month.clone(),
            format!("{:.2}", fee.amount),
            fee.payment_mode.label().to_string(),
            fee.issued_by.clone().unwrap_or_default(),
        ])
        .context("Failed to write CSV record")?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;

    Ok(filepath)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentMode, PaymentOption, ReportMark, Student};

    fn student() -> Student {
        Student {
            std_id: "S-101".to_string(),
            std_name: "Ayesha Khan".to_string(),
            father_name: "Imran Khan".to_string(),
            phone_no: "03001234567".to_string(),
            class_study: 10,
            group_name: "Science".to_string(),
            classes_per_week: 5,
            payment_option: PaymentOption::AdvancePayment,
            monthly_fee: 2000.0,
        }
    }

    fn report() -> Report {
        Report {
            rep_id: Some(3),
            student: student(),
            report_marks: vec![
                ReportMark {
                    rep_marks_id: Some(1),
                    subject_name: "Mathematics".to_string(),
                    max_marks: 100.0,
                    total_marks: 95.0,
                    grade: None,
                    percentage: None,
                },
                ReportMark {
                    rep_marks_id: Some(2),
                    subject_name: "English".to_string(),
                    max_marks: 100.0,
                    total_marks: 64.0,
                    grade: None,
                    percentage: None,
                },
            ],
            month: "March".to_string(),
            year: "2024".to_string(),
            date: "2024-03-07".to_string(),
            exam_name: "Monthly Test".to_string(),
        }
    }

    fn fee() -> Fee {
        Fee {
            fees_id: Some(17),
            student: student(),
            amount: 2000.0,
            month: "March".to_string(),
            date: "2024-03-07".to_string(),
            payment_mode: PaymentMode::Cash,
            issued_by: Some("admin".to_string()),
        }
    }

    #[test]
    fn test_report_card_assembly() {
        let doc = build_report_card(&report(), &GradeScale::standard());
        assert_eq!(doc.page, PageSize::A4);
        assert_eq!(doc.filename_stem, "Report_Ayesha Khan_March");

        let body = doc.lines.join("\n");
        assert!(body.contains("Ayesha Khan"));
        assert!(body.contains("Mathematics"));
        assert!(body.contains("79.5%")); // 159/200
        assert!(body.contains("Overall Grade : B"));
        assert!(body.contains("07-03-2024"));
    }

    #[test]
    fn test_receipt_assembly() {
        let doc = build_receipt(&fee());
        assert_eq!(doc.page, PageSize::A5);
        assert_eq!(doc.filename_stem, "Receipt_17_Ayesha Khan");

        let body = doc.lines.join("\n");
        assert!(body.contains("Tuition fee for March"));
        assert!(body.contains("2000 Rs"));
        assert!(body.contains("Payment Mode: Cash"));
    }

    #[test]
    fn test_write_document_roundtrip() {
        let doc = build_receipt(&fee());
        let filepath = write_document(&doc).unwrap();
        assert!(filepath.exists());
        let content = std::fs::read_to_string(&filepath).unwrap();
        assert!(content.contains("FEE RECEIPT"));

        // Clean up
        std::fs::remove_file(filepath).ok();
    }

    #[test]
    fn test_export_fees_csv() {
        let filepath = export_fees_csv(&[fee()]).unwrap();
        assert!(filepath.exists());
        let content = std::fs::read_to_string(&filepath).unwrap();
        assert!(content.starts_with("receipt_id,date,student_id"));
        assert!(content.contains("17,2024-03-07,S-101,Ayesha Khan,March,2000.00,Cash,admin"));

        // Clean up
        std::fs::remove_file(filepath).ok();
    }

    #[test]
    fn test_export_empty_fees_is_error() {
        assert!(export_fees_csv(&[]).is_err());
    }

    #[test]
    fn test_filename_stem_sanitized() {
        let mut f = fee();
        f.student.std_name = "A/B".to_string();
        let doc = build_receipt(&f);
        assert_eq!(doc.filename_stem, "Receipt_17_A-B");
    }
}
