use crate::dates;
use crate::grading::{self, GradeScale, MarkEntry};
use crate::models::{Fee, Report, Student};
use crate::ui::state::{
    AppState, AttendancePage, ConfirmDelete, FeeField, FeeFormState, FeesPage, MarkCol, Notice,
    NoticeKind, ReportFocus, ReportFormState, ReportHeaderField, ReportViewState, ReportsPage,
    StudentDetailsState, StudentField, StudentFormState, StudentsPage, MENU_ITEMS,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn render_ui(frame: &mut Frame, state: &AppState, notice: Option<&Notice>, scale: &GradeScale) {
    match state {
        AppState::Menu { selected_index } => render_menu(frame, *selected_index),
        AppState::Loading { message } => render_loading(frame, message),
        AppState::Students(page) => render_students(frame, page),
        AppState::StudentForm(form) => render_student_form(frame, form),
        AppState::StudentDetails(details) => render_student_details(frame, details),
        AppState::Attendance(page) => render_attendance(frame, page),
        AppState::Fees(page) => render_fees(frame, page),
        AppState::FeeForm(form) => render_fee_form(frame, form),
        AppState::Reports(page) => render_reports(frame, page),
        AppState::ReportForm(form) => render_report_form(frame, form),
        AppState::ReportView(view) => render_report_view(frame, view, scale),
        AppState::ConfirmDelete(confirm) => render_confirm(frame, confirm),
    }

    if let Some(notice) = notice {
        render_notice(frame, notice);
    }
}

fn render_loading(frame: &mut Frame, message: &str) {
    let area = frame.area();
    let block = Block::default()
        .title("Tuition Center Console")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let text = if message.is_empty() { "Working..." } else { message };
    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

// Drawn last so it sits on top of whatever page is underneath.
fn render_notice(frame: &mut Frame, notice: &Notice) {
    let area = frame.area();
    if area.height < 3 {
        return;
    }

    let color = match notice.kind {
        NoticeKind::Info => Color::Cyan,
        NoticeKind::Success => Color::Green,
        NoticeKind::Error => Color::Red,
    };

    let bar = Rect {
        x: area.x,
        y: area.y + area.height - 3,
        width: area.width,
        height: 3,
    };

    let paragraph = Paragraph::new(notice.message.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, bar);
    frame.render_widget(paragraph, bar);
}

fn render_menu(frame: &mut Frame, selected_index: usize) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let items: Vec<ListItem> = MENU_ITEMS
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == selected_index {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let prefix = if i == selected_index { "> " } else { "  " };
            ListItem::new(format!("{}{}", prefix, item)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title("Tuition Center Console")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(list, chunks[0]);

    let help = Paragraph::new("[↑↓: Navigate | Enter: Select | q: Quit]")
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(help, chunks[1]);
}

fn list_title(base: &str, filter: &str, editing_filter: bool) -> String {
    if editing_filter {
        format!("{} (filter: {}_)", base, filter)
    } else if !filter.is_empty() {
        format!("{} (filter: {})", base, filter)
    } else {
        base.to_string()
    }
}

fn render_students(frame: &mut Frame, page: &StudentsPage) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let visible = page.visible();
    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, student)| {
            let style = if i == page.selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let prefix = if i == page.selected { "> " } else { "  " };
            let content = format!(
                "{}{:<8} {:<24} {:<12} Class {:<3} {:<10} {:>8.0} Rs",
                prefix,
                student.std_id,
                student.std_name,
                student.phone_no,
                student.class_study,
                student.group_name,
                student.monthly_fee
            );

            ListItem::new(content).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(list_title("Students", &page.filter, page.editing_filter))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(list, chunks[0]);

    let help = Paragraph::new(format!(
        "Found: {} student(s) | [↑↓ | n: New | e: Edit | v: Details | d: Delete | /: Filter | r: Refresh | Esc: Back | q: Quit]",
        visible.len()
    ))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);

    frame.render_widget(help, chunks[1]);
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool, editable: bool) {
    let style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let cursor = if focused && editable { "_" } else { "" };
    let paragraph = Paragraph::new(format!("{}: {}{}", label, value, cursor)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(style),
    );

    frame.render_widget(paragraph, area);
}

fn selector_value(label: &str, focused: bool) -> String {
    if focused {
        format!("◄ {} ►", label)
    } else {
        label.to_string()
    }
}

fn render_student_form(frame: &mut Frame, form: &StudentFormState) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(3), // id
            Constraint::Length(3), // name
            Constraint::Length(3), // father name
            Constraint::Length(3), // phone
            Constraint::Length(3), // class
            Constraint::Length(3), // group
            Constraint::Length(3), // classes/week
            Constraint::Length(3), // payment plan
            Constraint::Length(3), // monthly fee
            Constraint::Min(0),
            Constraint::Length(3), // help
        ])
        .split(area);

    let title = if form.editing {
        format!("Edit Student: {}", form.name)
    } else {
        "Enroll New Student".to_string()
    };
    let title = Paragraph::new(title)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let focused = |field: StudentField| form.focused == field;

    let id_value = if form.editing {
        format!("{} (locked)", form.id)
    } else {
        form.id.clone()
    };
    render_field(frame, chunks[1], "Student ID", &id_value, focused(StudentField::Id), !form.editing);
    render_field(frame, chunks[2], "Name", &form.name, focused(StudentField::Name), true);
    render_field(frame, chunks[3], "Father's Name", &form.father_name, focused(StudentField::FatherName), true);
    render_field(frame, chunks[4], "Phone (11 digits)", &form.phone, focused(StudentField::Phone), true);
    render_field(frame, chunks[5], "Class", &form.class_study, focused(StudentField::Class), true);
    render_field(frame, chunks[6], "Group", &form.group, focused(StudentField::Group), true);
    render_field(frame, chunks[7], "Classes / Week", &form.classes_per_week, focused(StudentField::ClassesPerWeek), true);
    render_field(
        frame,
        chunks[8],
        "Payment Plan",
        &selector_value(form.payment_option.label(), focused(StudentField::PaymentOption)),
        focused(StudentField::PaymentOption),
        false,
    );
    render_field(frame, chunks[9], "Monthly Fee", &form.monthly_fee, focused(StudentField::MonthlyFee), true);

    let help = Paragraph::new("[Tab: Next Field | ←→: Toggle Plan | Enter: Save | Esc: Cancel]")
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[11]);
}

fn render_student_details(frame: &mut Frame, details: &StudentDetailsState) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    let student = &details.student;
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let info = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Student: ", bold),
            Span::raw(format!("{} ({})", student.std_name, student.std_id)),
        ]),
        Line::from(vec![
            Span::styled("Father: ", bold),
            Span::raw(&student.father_name),
            Span::styled("   Phone: ", bold),
            Span::raw(&student.phone_no),
        ]),
        Line::from(vec![
            Span::styled("Class: ", bold),
            Span::raw(student.class_study.to_string()),
            Span::styled("   Group: ", bold),
            Span::raw(&student.group_name),
            Span::styled("   Classes/Week: ", bold),
            Span::raw(student.classes_per_week.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Payment: ", bold),
            Span::raw(student.payment_option.label()),
            Span::styled("   Monthly Fee: ", bold),
            Span::raw(format!("{:.0} Rs", student.monthly_fee)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Days Present: ", bold),
            Span::raw(details.present_count.to_string()),
            Span::styled("   Attendance: ", bold),
            Span::raw(format!("{:.1}%", details.attendance_percentage())),
        ]),
    ])
    .block(
        Block::default()
            .title("Student Details")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(info, chunks[0]);

    let items: Vec<ListItem> = details
        .history
        .iter()
        .map(|entry| {
            let (marker, style) = if entry.is_present == 1 {
                ("Present", Style::default().fg(Color::Green))
            } else {
                ("Absent ", Style::default().fg(Color::Red))
            };
            ListItem::new(format!(
                "  {}  {}",
                dates::to_display(Some(&entry.date)),
                marker
            ))
            .style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title("Attendance History (newest first)")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(list, chunks[1]);

    let help = Paragraph::new("[Esc: Back | q: Quit]")
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[2]);
}

fn render_attendance(frame: &mut Frame, page: &AttendancePage) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    let (total, present, absent) = page.stats();
    let header = Paragraph::new(format!(
        "Date: {}   Marked: {}   Present: {}   Absent: {}",
        dates::to_display(Some(&page.date)),
        total,
        present,
        absent
    ))
    .block(
        Block::default()
            .title(list_title("Daily Attendance", &page.filter, page.editing_filter))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    )
    .alignment(Alignment::Center);
    frame.render_widget(header, chunks[0]);

    if !page.loaded {
        let retry = Paragraph::new("Attendance could not be loaded. Press r to retry.")
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(retry, chunks[1]);
    } else {
        let visible = page.visible();
        let items: Vec<ListItem> = visible
            .iter()
            .enumerate()
            .map(|(i, student)| {
                let slot = page.slots.get(&student.std_id);
                let (marker, row_color) = match slot {
                    Some(slot) if slot.status == 1 => ("[P]", Color::Green),
                    Some(_) => ("[A]", Color::Red),
                    None => ("[ ]", Color::Reset),
                };
                let saved = match slot {
                    Some(slot) if slot.att_id.is_some() => "saved",
                    Some(_) => "unsaved",
                    None => "",
                };

                let style = if i == page.selected {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(row_color)
                };

                let prefix = if i == page.selected { "> " } else { "  " };
                let content = format!(
                    "{}{} {:<8} {:<24} {:<10} {}",
                    prefix, marker, student.std_id, student.std_name, student.group_name, saved
                );

                ListItem::new(content).style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title("Students")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(list, chunks[1]);
    }

    let help = Paragraph::new(
        "[p: Present | a: Absent | u: Unmark | s: Save | ←→: Change Day | /: Filter | r: Refresh | Esc: Back | q: Quit]",
    )
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);
    frame.render_widget(help, chunks[2]);
}

fn fee_row(fee: &Fee) -> String {
    let receipt = fee
        .fees_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "#{:<6} {:<24} {:<10} {:>10.2} Rs  {:<6} {}",
        receipt,
        fee.student.std_name,
        fee.month,
        fee.amount,
        fee.payment_mode.label(),
        dates::to_display(Some(&fee.date))
    )
}

fn render_fees(frame: &mut Frame, page: &FeesPage) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let visible = page.visible();
    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, fee)| {
            let style = if i == page.selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let prefix = if i == page.selected { "> " } else { "  " };
            ListItem::new(format!("{}{}", prefix, fee_row(fee))).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(list_title("Fee History (newest first)", &page.filter, page.editing_filter))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(list, chunks[0]);

    let help = Paragraph::new(format!(
        "Found: {} receipt(s) | [n: New | e: Edit | d: Delete | x: Receipt | c: CSV | /: Filter | r: Refresh | Esc: Back | q: Quit]",
        visible.len()
    ))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);
    frame.render_widget(help, chunks[1]);
}

fn render_fee_form(frame: &mut Frame, form: &FeeFormState) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(3), // student
            Constraint::Length(3), // amount
            Constraint::Length(3), // month
            Constraint::Length(3), // date
            Constraint::Length(3), // payment mode
            Constraint::Min(0),
            Constraint::Length(3), // help
        ])
        .split(area);

    let title = match form.editing {
        Some(id) => format!("Edit Fee Receipt #{}", id),
        None => "New Fee Receipt".to_string(),
    };
    let title = Paragraph::new(title)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let focused = |field: FeeField| form.focused == field;

    let student_label = form
        .student_index
        .and_then(|i| form.students.get(i))
        .map(|s: &Student| format!("{} ({})", s.std_name, s.std_id))
        .unwrap_or_else(|| "select a student".to_string());
    render_field(
        frame,
        chunks[1],
        "Student",
        &selector_value(&student_label, focused(FeeField::Student)),
        focused(FeeField::Student),
        false,
    );
    render_field(frame, chunks[2], "Amount", &form.amount, focused(FeeField::Amount), true);
    render_field(frame, chunks[3], "Month", &form.month, focused(FeeField::Month), true);
    render_field(frame, chunks[4], "Date (YYYY-MM-DD)", &form.date, focused(FeeField::Date), true);
    render_field(
        frame,
        chunks[5],
        "Payment Mode",
        &selector_value(form.payment_mode.label(), focused(FeeField::PaymentMode)),
        focused(FeeField::PaymentMode),
        false,
    );

    let help = Paragraph::new("[Tab: Next Field | ←→: Select / Toggle | Enter: Save | Esc: Cancel]")
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[7]);
}

fn render_reports(frame: &mut Frame, page: &ReportsPage) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let visible = page.visible();
    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(i, report)| {
            let style = if i == page.selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let prefix = if i == page.selected { "> " } else { "  " };
            let id = report
                .rep_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string());
            let content = format!(
                "{}#{:<6} {:<24} {:<16} {:<10} {}  ({} subjects)",
                prefix,
                id,
                report.student.std_name,
                report.exam_name,
                report.month,
                report.year,
                report.report_marks.len()
            );

            ListItem::new(content).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(list_title("Report Cards", &page.filter, page.editing_filter))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(list, chunks[0]);

    let help = Paragraph::new(format!(
        "Found: {} report(s) | [n: New | e: Edit | v: View | d: Delete | /: Filter | r: Refresh | Esc: Back | q: Quit]",
        visible.len()
    ))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);
    frame.render_widget(help, chunks[1]);
}

fn mark_cell(text: &str, focused: bool) -> String {
    if focused {
        format!("[{}_]", text)
    } else {
        format!(" {} ", text)
    }
}

fn render_report_form(frame: &mut Frame, form: &ReportFormState) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(3), // student
            Constraint::Length(3), // exam
            Constraint::Length(3), // month
            Constraint::Length(3), // year
            Constraint::Length(3), // date
            Constraint::Min(3),    // marks
            Constraint::Length(3), // help
        ])
        .split(area);

    let title = match &form.editing {
        Some(report) => format!("Edit Report for {}", report.student.std_name),
        None => "New Report Card".to_string(),
    };
    let title = Paragraph::new(title)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let focused = |field: ReportHeaderField| form.focus == ReportFocus::Header(field);

    let student_label = form
        .student_index
        .and_then(|i| form.students.get(i))
        .map(|s: &Student| format!("{} ({})", s.std_name, s.std_id))
        .unwrap_or_else(|| "select a student".to_string());
    let student_value = if form.editing.is_some() {
        format!("{} (locked)", student_label)
    } else {
        selector_value(&student_label, focused(ReportHeaderField::Student))
    };
    render_field(frame, chunks[1], "Student", &student_value, focused(ReportHeaderField::Student), false);
    render_field(frame, chunks[2], "Exam", &form.exam_name, focused(ReportHeaderField::ExamName), true);
    render_field(frame, chunks[3], "Month", &form.month, focused(ReportHeaderField::Month), true);
    render_field(frame, chunks[4], "Year", &form.year, focused(ReportHeaderField::Year), true);
    render_field(frame, chunks[5], "Date (YYYY-MM-DD)", &form.date, focused(ReportHeaderField::Date), true);

    let items: Vec<ListItem> = form
        .rows
        .iter()
        .enumerate()
        .map(|(row, mark)| {
            let cell_focus = |col: MarkCol| form.focus == ReportFocus::Mark { row, col };
            let focused_row = matches!(form.focus, ReportFocus::Mark { row: r, .. } if r == row);

            let style = if focused_row {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let content = format!(
                "  {:<24} obtained {:<8} / max {:<8}",
                mark_cell(&mark.subject, cell_focus(MarkCol::Subject)),
                mark_cell(&mark.obtained, cell_focus(MarkCol::Obtained)),
                mark_cell(&mark.max, cell_focus(MarkCol::Max)),
            );

            ListItem::new(content).style(style)
        })
        .collect();

    let marks = List::new(items).block(
        Block::default()
            .title("Subjects")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(marks, chunks[6]);

    let help = Paragraph::new(
        "[Tab: Next Field | Ins: Add Subject | Del: Remove Subject | Enter: Save | Esc: Cancel]",
    )
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);
    frame.render_widget(help, chunks[7]);
}

fn render_report_view(frame: &mut Frame, view: &ReportViewState, scale: &GradeScale) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let report: &Report = &view.report;
    let entries: Vec<MarkEntry> = report
        .report_marks
        .iter()
        .map(|m| MarkEntry { max: m.max_marks, obtained: m.total_marks })
        .collect();
    let summary = grading::summarize(&entries, scale);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut text = vec![
        Line::from(vec![
            Span::styled("Student: ", bold),
            Span::raw(format!("{} ({})", report.student.std_name, report.student.std_id)),
        ]),
        Line::from(vec![
            Span::styled("Exam: ", bold),
            Span::raw(&report.exam_name),
            Span::styled("   Month: ", bold),
            Span::raw(format!("{} {}", report.month, report.year)),
            Span::styled("   Date: ", bold),
            Span::raw(dates::to_display(Some(&report.date))),
        ]),
        Line::from(""),
    ];

    for mark in &report.report_marks {
        let entry = MarkEntry { max: mark.max_marks, obtained: mark.total_marks };
        text.push(Line::from(format!(
            "  {:<24} {:>7.1} / {:<7.1}  {}",
            mark.subject_name,
            mark.total_marks,
            mark.max_marks,
            grading::subject_grade(entry, scale)
        )));
    }

    text.push(Line::from(""));
    text.push(Line::from(format!(
        "  Total: {:.1} / {:.1}   Percentage: {:.1}%",
        summary.total_obtained, summary.total_max, summary.percentage
    )));
    text.push(Line::from(vec![
        Span::styled("  Grade: ", bold),
        Span::styled(summary.grade, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::styled("   Remarks: ", bold),
        Span::raw(summary.remark),
    ]));

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .title("Report Card")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(paragraph, chunks[0]);

    let help = Paragraph::new("[x: Export Report Card | Esc: Back | q: Quit]")
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[1]);
}

fn render_confirm(frame: &mut Frame, confirm: &ConfirmDelete) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let text = vec![
        Line::from(Span::styled(
            "Confirm Delete",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(confirm.message.as_str()),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, chunks[0]);

    let help = Paragraph::new("[y: Confirm | n: Cancel]")
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[1]);
}
