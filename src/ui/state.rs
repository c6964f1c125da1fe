use crate::dates;
use crate::models::{
    is_valid_phone, AttendanceEntry, Fee, FeeBody, PaymentMode, PaymentOption, Report,
    ReportBody, ReportMark, Student, StudentRef,
};
use crate::reconcile::{
    assemble_marks, AttendanceDraft, FeeDraft, MarkRemovalPolicy, ReportDraft,
};
use chrono::NaiveDate;
use indexmap::IndexMap;

// ============================================================================
// Transient notices (the toast bar)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, message: message.into() }
    }
}

// ============================================================================
// Page state machine
// ============================================================================

#[derive(Debug, Clone)]
pub enum AppState {
    Menu { selected_index: usize },
    Loading { message: String },
    Students(StudentsPage),
    StudentForm(StudentFormState),
    StudentDetails(StudentDetailsState),
    Attendance(AttendancePage),
    Fees(FeesPage),
    FeeForm(FeeFormState),
    Reports(ReportsPage),
    ReportForm(ReportFormState),
    ReportView(ReportViewState),
    ConfirmDelete(ConfirmDelete),
}

pub const MENU_ITEMS: [&str; 5] = ["Students", "Attendance", "Fees", "Reports", "Quit"];

#[derive(Debug, Clone)]
pub struct ConfirmDelete {
    pub message: String,
    pub action: DeleteAction,
}

#[derive(Debug, Clone)]
pub enum DeleteAction {
    Student(String),
    Fee(i64),
    Report(i64),
}

// ============================================================================
// Students
// ============================================================================

#[derive(Debug, Clone)]
pub struct StudentsPage {
    pub students: Vec<Student>,
    pub selected: usize,
    pub filter: String,
    pub editing_filter: bool,
}

impl StudentsPage {
    pub fn new(students: Vec<Student>) -> Self {
        Self { students, selected: 0, filter: String::new(), editing_filter: false }
    }

    /// Roster filtered by name or phone, matching the search box behavior.
    pub fn visible(&self) -> Vec<&Student> {
        let needle = self.filter.to_lowercase();
        self.students
            .iter()
            .filter(|s| {
                needle.is_empty()
                    || s.std_name.to_lowercase().contains(&needle)
                    || s.phone_no.contains(&needle)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentField {
    Id,
    Name,
    FatherName,
    Phone,
    Class,
    Group,
    ClassesPerWeek,
    PaymentOption,
    MonthlyFee,
}

impl StudentField {
    pub fn next(self) -> Self {
        use StudentField::*;
        match self {
            Id => Name,
            Name => FatherName,
            FatherName => Phone,
            Phone => Class,
            Class => Group,
            Group => ClassesPerWeek,
            ClassesPerWeek => PaymentOption,
            PaymentOption => MonthlyFee,
            MonthlyFee => Id,
        }
    }

    pub fn prev(self) -> Self {
        use StudentField::*;
        match self {
            Id => MonthlyFee,
            Name => Id,
            FatherName => Name,
            Phone => FatherName,
            Class => Phone,
            Group => Class,
            ClassesPerWeek => Group,
            PaymentOption => ClassesPerWeek,
            MonthlyFee => PaymentOption,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StudentFormState {
    /// When editing, the locked identity; the ID field rejects input.
    pub editing: bool,
    pub id: String,
    pub name: String,
    pub father_name: String,
    pub phone: String,
    pub class_study: String,
    pub group: String,
    pub classes_per_week: String,
    pub payment_option: PaymentOption,
    pub monthly_fee: String,
    pub focused: StudentField,
}

impl StudentFormState {
    pub fn new() -> Self {
        Self {
            editing: false,
            id: String::new(),
            name: String::new(),
            father_name: String::new(),
            phone: String::new(),
            class_study: String::new(),
            group: String::new(),
            classes_per_week: String::new(),
            payment_option: PaymentOption::AdvancePayment,
            monthly_fee: String::new(),
            focused: StudentField::Id,
        }
    }

    pub fn from_student(student: &Student) -> Self {
        Self {
            editing: true,
            id: student.std_id.clone(),
            name: student.std_name.clone(),
            father_name: student.father_name.clone(),
            phone: student.phone_no.clone(),
            class_study: student.class_study.to_string(),
            group: student.group_name.clone(),
            classes_per_week: student.classes_per_week.to_string(),
            payment_option: student.payment_option,
            monthly_fee: student.monthly_fee.to_string(),
            focused: StudentField::Name,
        }
    }

    /// Mutable access to the focused text field; `None` for selector fields
    /// and for the ID field once identity is locked.
    pub fn focused_text(&mut self) -> Option<&mut String> {
        match self.focused {
            StudentField::Id if self.editing => None,
            StudentField::Id => Some(&mut self.id),
            StudentField::Name => Some(&mut self.name),
            StudentField::FatherName => Some(&mut self.father_name),
            StudentField::Phone => Some(&mut self.phone),
            StudentField::Class => Some(&mut self.class_study),
            StudentField::Group => Some(&mut self.group),
            StudentField::ClassesPerWeek => Some(&mut self.classes_per_week),
            StudentField::PaymentOption => None,
            StudentField::MonthlyFee => Some(&mut self.monthly_fee),
        }
    }

    /// Validate and assemble the payload. Validation failures never reach
    /// the backend.
    pub fn build(&self) -> Result<Student, String> {
        if self.id.trim().is_empty() {
            return Err("Student ID is required".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("Student name is required".to_string());
        }
        if self.father_name.trim().is_empty() {
            return Err("Father's name is required".to_string());
        }
        if !is_valid_phone(self.phone.trim()) {
            return Err("Phone must be an 11-digit number starting with 0".to_string());
        }
        let class_study: u32 = self
            .class_study
            .trim()
            .parse()
            .map_err(|_| "Class must be a whole number".to_string())?;
        if self.group.trim().is_empty() {
            return Err("Group is required".to_string());
        }
        let classes_per_week: u32 = self
            .classes_per_week
            .trim()
            .parse()
            .map_err(|_| "Classes/week must be a whole number".to_string())?;
        let monthly_fee: f64 = self
            .monthly_fee
            .trim()
            .parse()
            .map_err(|_| "Monthly fee must be a number".to_string())?;
        if monthly_fee < 0.0 {
            return Err("Monthly fee cannot be negative".to_string());
        }

        Ok(Student {
            std_id: self.id.trim().to_string(),
            std_name: self.name.trim().to_string(),
            father_name: self.father_name.trim().to_string(),
            phone_no: self.phone.trim().to_string(),
            class_study,
            group_name: self.group.trim().to_string(),
            classes_per_week,
            payment_option: self.payment_option,
            monthly_fee,
        })
    }
}

#[derive(Debug, Clone)]
pub struct StudentDetailsState {
    pub student: Student,
    pub present_count: u64,
    /// Newest first.
    pub history: Vec<AttendanceEntry>,
}

impl StudentDetailsState {
    pub fn attendance_percentage(&self) -> f64 {
        if self.history.is_empty() {
            0.0
        } else {
            (self.present_count as f64 / self.history.len() as f64) * 100.0
        }
    }
}

// ============================================================================
// Attendance
// ============================================================================

/// Local editing state for one student on the day sheet. Unmarked students
/// have no slot at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttendanceSlot {
    /// 1 = present, 0 = absent.
    pub status: i64,
    /// Server id of the record persisted for this (student, date), if any.
    pub att_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct AttendancePage {
    pub date: String,
    pub students: Vec<Student>,
    /// Keyed by student id; keeps marking order stable across redraws.
    pub slots: IndexMap<String, AttendanceSlot>,
    pub selected: usize,
    pub filter: String,
    pub editing_filter: bool,
    pub loaded: bool,
}

impl AttendancePage {
    pub fn empty(date: String) -> Self {
        Self {
            date,
            students: Vec::new(),
            slots: IndexMap::new(),
            selected: 0,
            filter: String::new(),
            editing_filter: false,
            loaded: false,
        }
    }

    pub fn visible(&self) -> Vec<&Student> {
        let needle = self.filter.to_lowercase();
        self.students
            .iter()
            .filter(|s| {
                needle.is_empty()
                    || s.std_name.to_lowercase().contains(&needle)
                    || s.group_name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// (total students, marked present, marked absent)
    pub fn stats(&self) -> (usize, usize, usize) {
        let present = self.slots.values().filter(|s| s.status == 1).count();
        let absent = self.slots.values().filter(|s| s.status == 0).count();
        (self.students.len(), present, absent)
    }

    pub fn mark(&mut self, std_id: &str, status: i64) {
        match self.slots.get_mut(std_id) {
            Some(slot) => slot.status = status,
            None => {
                self.slots
                    .insert(std_id.to_string(), AttendanceSlot { status, att_id: None });
            }
        }
    }

    /// Clear a local-only mark. Persisted records stay; there is no delete
    /// endpoint for attendance.
    pub fn unmark(&mut self, std_id: &str) {
        if self.slots.get(std_id).is_some_and(|s| s.att_id.is_none()) {
            self.slots.shift_remove(std_id);
        }
    }

    /// Every slot becomes a draft; previously persisted records round-trip
    /// as idempotent updates.
    pub fn drafts(&self) -> Vec<AttendanceDraft> {
        self.slots
            .iter()
            .map(|(std_id, slot)| AttendanceDraft {
                std_id: std_id.clone(),
                att_id: slot.att_id,
                status: slot.status,
                date: self.date.clone(),
            })
            .collect()
    }
}

// ============================================================================
// Fees
// ============================================================================

#[derive(Debug, Clone)]
pub struct FeesPage {
    /// Sorted by date, newest first.
    pub fees: Vec<Fee>,
    pub selected: usize,
    pub filter: String,
    pub editing_filter: bool,
}

impl FeesPage {
    pub fn new(mut fees: Vec<Fee>) -> Self {
        fees.sort_by_key(|f| std::cmp::Reverse(dates::sort_key(&f.date)));
        Self { fees, selected: 0, filter: String::new(), editing_filter: false }
    }

    pub fn visible(&self) -> Vec<&Fee> {
        let needle = self.filter.to_lowercase();
        self.fees
            .iter()
            .filter(|f| {
                needle.is_empty()
                    || f.student.std_name.to_lowercase().contains(&needle)
                    || f.month.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeField {
    Student,
    Amount,
    Month,
    Date,
    PaymentMode,
}

impl FeeField {
    pub fn next(self) -> Self {
        use FeeField::*;
        match self {
            Student => Amount,
            Amount => Month,
            Month => Date,
            Date => PaymentMode,
            PaymentMode => Student,
        }
    }

    pub fn prev(self) -> Self {
        use FeeField::*;
        match self {
            Student => PaymentMode,
            Amount => Student,
            Month => Amount,
            Date => Month,
            PaymentMode => Date,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeeFormState {
    pub editing: Option<i64>,
    pub students: Vec<Student>,
    pub student_index: Option<usize>,
    pub amount: String,
    pub month: String,
    pub date: String,
    pub payment_mode: PaymentMode,
    pub issued_by: Option<String>,
    pub focused: FeeField,
}

impl FeeFormState {
    pub fn new(students: Vec<Student>, operator: Option<String>) -> Self {
        Self {
            editing: None,
            students,
            student_index: None,
            amount: String::new(),
            month: dates::current_month_name(),
            date: dates::today(),
            payment_mode: PaymentMode::Cash,
            issued_by: operator,
            focused: FeeField::Student,
        }
    }

    pub fn from_fee(students: Vec<Student>, fee: &Fee) -> Self {
        let student_index = students
            .iter()
            .position(|s| s.std_id == fee.student.std_id);
        Self {
            editing: fee.fees_id,
            students,
            student_index,
            amount: fee.amount.to_string(),
            month: fee.month.clone(),
            date: fee.date.clone(),
            payment_mode: fee.payment_mode,
            issued_by: fee.issued_by.clone(),
            focused: FeeField::Amount,
        }
    }

    /// Cycle the student selection; when creating, the amount follows the
    /// selected student's monthly fee.
    pub fn cycle_student(&mut self, delta: isize) {
        if self.students.is_empty() {
            return;
        }
        let len = self.students.len() as isize;
        let next = match self.student_index {
            Some(i) => (i as isize + delta).rem_euclid(len) as usize,
            None => {
                if delta >= 0 {
                    0
                } else {
                    (len - 1) as usize
                }
            }
        };
        self.student_index = Some(next);
        if self.editing.is_none() {
            self.amount = self.students[next].monthly_fee.to_string();
        }
    }

    pub fn focused_text(&mut self) -> Option<&mut String> {
        match self.focused {
            FeeField::Amount => Some(&mut self.amount),
            FeeField::Month => Some(&mut self.month),
            FeeField::Date => Some(&mut self.date),
            FeeField::Student | FeeField::PaymentMode => None,
        }
    }

    pub fn build(&self) -> Result<FeeDraft, String> {
        let Some(index) = self.student_index else {
            return Err("Please select a student".to_string());
        };
        let student = &self.students[index];

        let amount: f64 = self
            .amount
            .trim()
            .parse()
            .map_err(|_| "Amount must be a number".to_string())?;
        if amount < 0.0 {
            return Err("Amount cannot be negative".to_string());
        }
        if self.month.trim().is_empty() {
            return Err("Month is required".to_string());
        }
        if NaiveDate::parse_from_str(self.date.trim(), dates::CANONICAL_FORMAT).is_err() {
            return Err("Date must be YYYY-MM-DD".to_string());
        }

        Ok(FeeDraft {
            fees_id: self.editing,
            body: FeeBody {
                student: StudentRef { std_id: student.std_id.clone() },
                amount,
                month: self.month.trim().to_string(),
                date: self.date.trim().to_string(),
                payment_mode: self.payment_mode,
                issued_by: self.issued_by.clone(),
            },
        })
    }
}

// ============================================================================
// Reports
// ============================================================================

#[derive(Debug, Clone)]
pub struct ReportsPage {
    pub reports: Vec<Report>,
    pub selected: usize,
    pub filter: String,
    pub editing_filter: bool,
}

impl ReportsPage {
    pub fn new(reports: Vec<Report>) -> Self {
        Self { reports, selected: 0, filter: String::new(), editing_filter: false }
    }

    pub fn visible(&self) -> Vec<&Report> {
        let needle = self.filter.to_lowercase();
        self.reports
            .iter()
            .filter(|r| {
                needle.is_empty()
                    || r.student.std_name.to_lowercase().contains(&needle)
                    || r.month.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportHeaderField {
    Student,
    ExamName,
    Month,
    Year,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkCol {
    Subject,
    Obtained,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFocus {
    Header(ReportHeaderField),
    Mark { row: usize, col: MarkCol },
}

#[derive(Debug, Clone)]
pub struct MarkRow {
    pub rep_marks_id: Option<i64>,
    pub subject: String,
    pub obtained: String,
    pub max: String,
}

impl MarkRow {
    fn seeded(subject: &str) -> Self {
        Self {
            rep_marks_id: None,
            subject: subject.to_string(),
            obtained: "0".to_string(),
            max: "100".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportFormState {
    /// The last-fetched report when editing; its marks feed the removal
    /// policy and its student is locked.
    pub editing: Option<Report>,
    pub students: Vec<Student>,
    pub student_index: Option<usize>,
    pub exam_name: String,
    pub month: String,
    pub year: String,
    pub date: String,
    pub rows: Vec<MarkRow>,
    pub focus: ReportFocus,
}

impl ReportFormState {
    pub fn new(students: Vec<Student>) -> Self {
        Self {
            editing: None,
            students,
            student_index: None,
            exam_name: "Monthly Test".to_string(),
            month: dates::current_month_name(),
            year: dates::current_year(),
            date: dates::today(),
            rows: vec![
                MarkRow::seeded("Mathematics"),
                MarkRow::seeded("English"),
                MarkRow::seeded("Science"),
            ],
            focus: ReportFocus::Header(ReportHeaderField::Student),
        }
    }

    pub fn from_report(students: Vec<Student>, report: Report) -> Self {
        let student_index = students
            .iter()
            .position(|s| s.std_id == report.student.std_id);
        let rows = report
            .report_marks
            .iter()
            .map(|m| MarkRow {
                rep_marks_id: m.rep_marks_id,
                subject: m.subject_name.clone(),
                obtained: m.total_marks.to_string(),
                max: m.max_marks.to_string(),
            })
            .collect();
        Self {
            editing: Some(report.clone()),
            students,
            student_index,
            exam_name: report.exam_name.clone(),
            month: report.month.clone(),
            year: report.year.clone(),
            date: report.date.clone(),
            rows,
            focus: ReportFocus::Header(ReportHeaderField::ExamName),
        }
    }

    pub fn next_focus(&mut self) {
        use ReportHeaderField::*;
        self.focus = match self.focus {
            ReportFocus::Header(Student) => ReportFocus::Header(ExamName),
            ReportFocus::Header(ExamName) => ReportFocus::Header(Month),
            ReportFocus::Header(Month) => ReportFocus::Header(Year),
            ReportFocus::Header(Year) => ReportFocus::Header(Date),
            ReportFocus::Header(Date) => {
                if self.rows.is_empty() {
                    ReportFocus::Header(Student)
                } else {
                    ReportFocus::Mark { row: 0, col: MarkCol::Subject }
                }
            }
            ReportFocus::Mark { row, col } => match col {
                MarkCol::Subject => ReportFocus::Mark { row, col: MarkCol::Obtained },
                MarkCol::Obtained => ReportFocus::Mark { row, col: MarkCol::Max },
                MarkCol::Max => {
                    if row + 1 < self.rows.len() {
                        ReportFocus::Mark { row: row + 1, col: MarkCol::Subject }
                    } else {
                        ReportFocus::Header(Student)
                    }
                }
            },
        };
    }

    pub fn prev_focus(&mut self) {
        use ReportHeaderField::*;
        self.focus = match self.focus {
            ReportFocus::Header(Student) => {
                if self.rows.is_empty() {
                    ReportFocus::Header(Date)
                } else {
                    ReportFocus::Mark {
                        row: self.rows.len() - 1,
                        col: MarkCol::Max,
                    }
                }
            }
            ReportFocus::Header(ExamName) => ReportFocus::Header(Student),
            ReportFocus::Header(Month) => ReportFocus::Header(ExamName),
            ReportFocus::Header(Year) => ReportFocus::Header(Month),
            ReportFocus::Header(Date) => ReportFocus::Header(Year),
            ReportFocus::Mark { row, col } => match col {
                MarkCol::Subject => {
                    if row == 0 {
                        ReportFocus::Header(Date)
                    } else {
                        ReportFocus::Mark { row: row - 1, col: MarkCol::Max }
                    }
                }
                MarkCol::Obtained => ReportFocus::Mark { row, col: MarkCol::Subject },
                MarkCol::Max => ReportFocus::Mark { row, col: MarkCol::Obtained },
            },
        };
    }

    pub fn add_row(&mut self) {
        self.rows.push(MarkRow {
            rep_marks_id: None,
            subject: String::new(),
            obtained: "0".to_string(),
            max: "100".to_string(),
        });
        self.focus = ReportFocus::Mark {
            row: self.rows.len() - 1,
            col: MarkCol::Subject,
        };
    }

    /// Remove the focused subject row from the local list. Whether the
    /// persisted row survives the next save is the removal policy's call.
    pub fn remove_focused_row(&mut self) {
        if let ReportFocus::Mark { row, .. } = self.focus {
            if row < self.rows.len() {
                self.rows.remove(row);
            }
            self.focus = if self.rows.is_empty() {
                ReportFocus::Header(ReportHeaderField::Date)
            } else {
                ReportFocus::Mark {
                    row: row.min(self.rows.len() - 1),
                    col: MarkCol::Subject,
                }
            };
        }
    }

    pub fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            ReportFocus::Header(ReportHeaderField::Student) => None,
            ReportFocus::Header(ReportHeaderField::ExamName) => Some(&mut self.exam_name),
            ReportFocus::Header(ReportHeaderField::Month) => Some(&mut self.month),
            ReportFocus::Header(ReportHeaderField::Year) => Some(&mut self.year),
            ReportFocus::Header(ReportHeaderField::Date) => Some(&mut self.date),
            ReportFocus::Mark { row, col } => {
                let mark = self.rows.get_mut(row)?;
                Some(match col {
                    MarkCol::Subject => &mut mark.subject,
                    MarkCol::Obtained => &mut mark.obtained,
                    MarkCol::Max => &mut mark.max,
                })
            }
        }
    }

    pub fn cycle_student(&mut self, delta: isize) {
        // Identity is locked while editing an existing report.
        if self.editing.is_some() || self.students.is_empty() {
            return;
        }
        let len = self.students.len() as isize;
        let next = match self.student_index {
            Some(i) => (i as isize + delta).rem_euclid(len) as usize,
            None => {
                if delta >= 0 {
                    0
                } else {
                    (len - 1) as usize
                }
            }
        };
        self.student_index = Some(next);
    }

    pub fn build(&self, policy: MarkRemovalPolicy) -> Result<ReportDraft, String> {
        let Some(index) = self.student_index else {
            return Err("Please select a student".to_string());
        };
        let student = &self.students[index];

        if self.month.trim().is_empty() {
            return Err("Month is required".to_string());
        }
        if self.year.trim().is_empty() {
            return Err("Year is required".to_string());
        }
        if NaiveDate::parse_from_str(self.date.trim(), dates::CANONICAL_FORMAT).is_err() {
            return Err("Date must be YYYY-MM-DD".to_string());
        }
        if self.rows.is_empty() {
            return Err("Add at least one subject".to_string());
        }

        let mut local = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            if row.subject.trim().is_empty() {
                return Err("Every subject needs a name".to_string());
            }
            let max: f64 = row
                .max
                .trim()
                .parse()
                .map_err(|_| format!("Max marks for {} must be a number", row.subject))?;
            let obtained: f64 = row
                .obtained
                .trim()
                .parse()
                .map_err(|_| format!("Obtained marks for {} must be a number", row.subject))?;
            local.push(ReportMark {
                rep_marks_id: row.rep_marks_id,
                subject_name: row.subject.trim().to_string(),
                max_marks: max,
                total_marks: obtained,
                grade: None,
                percentage: None,
            });
        }

        let prior: &[ReportMark] = self
            .editing
            .as_ref()
            .map(|r| r.report_marks.as_slice())
            .unwrap_or(&[]);
        let report_marks = assemble_marks(local, prior, policy);

        Ok(ReportDraft {
            rep_id: self.editing.as_ref().and_then(|r| r.rep_id),
            body: ReportBody {
                student: StudentRef { std_id: student.std_id.clone() },
                month: self.month.trim().to_string(),
                year: self.year.trim().to_string(),
                date: self.date.trim().to_string(),
                exam_name: self.exam_name.trim().to_string(),
                report_marks,
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct ReportViewState {
    pub report: Report,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaymentOption;

    fn student(id: &str, name: &str) -> Student {
        Student {
            std_id: id.to_string(),
            std_name: name.to_string(),
            father_name: "Father".to_string(),
            phone_no: "03001234567".to_string(),
            class_study: 9,
            group_name: "Science".to_string(),
            classes_per_week: 5,
            payment_option: PaymentOption::AdvancePayment,
            monthly_fee: 1500.0,
        }
    }

    #[test]
    fn test_student_form_validation() {
        let mut form = StudentFormState::new();
        assert!(form.build().is_err());

        form.id = "S-1".to_string();
        form.name = "Ali".to_string();
        form.father_name = "Ahmed".to_string();
        form.phone = "03001234567".to_string();
        form.class_study = "10".to_string();
        form.group = "Science".to_string();
        form.classes_per_week = "5".to_string();
        form.monthly_fee = "2000".to_string();

        let built = form.build().unwrap();
        assert_eq!(built.std_id, "S-1");
        assert_eq!(built.monthly_fee, 2000.0);

        form.phone = "12345".to_string();
        assert!(form.build().is_err());
    }

    #[test]
    fn test_attendance_page_marking_and_drafts() {
        let mut page = AttendancePage::empty("2024-03-07".to_string());
        page.students = vec![student("S-1", "Ali"), student("S-2", "Sara")];

        page.mark("S-1", 1);
        page.mark("S-2", 0);
        page.mark("S-1", 0); // flip an existing local mark

        let (total, present, absent) = page.stats();
        assert_eq!((total, present, absent), (2, 0, 2));

        let drafts = page.drafts();
        assert_eq!(drafts.len(), 2);
        assert!(drafts.iter().all(|d| d.att_id.is_none()));
        assert!(drafts.iter().all(|d| d.date == "2024-03-07"));
    }

    #[test]
    fn test_unmark_only_clears_local_marks() {
        let mut page = AttendancePage::empty("2024-03-07".to_string());
        page.slots.insert(
            "S-1".to_string(),
            AttendanceSlot { status: 1, att_id: Some(42) },
        );
        page.mark("S-2", 1);

        page.unmark("S-1"); // persisted, stays
        page.unmark("S-2"); // local only, goes

        assert!(page.slots.contains_key("S-1"));
        assert!(!page.slots.contains_key("S-2"));
    }

    #[test]
    fn test_fee_form_requires_student() {
        let form = FeeFormState::new(vec![student("S-1", "Ali")], None);
        assert!(form.build().is_err());
    }

    #[test]
    fn test_fee_form_autofills_amount_from_monthly_fee() {
        let mut form = FeeFormState::new(vec![student("S-1", "Ali")], Some("admin".to_string()));
        form.cycle_student(1);

        let draft = form.build().unwrap();
        assert!(draft.fees_id.is_none());
        assert_eq!(draft.body.amount, 1500.0);
        assert_eq!(draft.body.issued_by.as_deref(), Some("admin"));
    }

    #[test]
    fn test_report_form_build_keeps_mark_ids() {
        let mut form = ReportFormState::new(vec![student("S-1", "Ali")]);
        form.cycle_student(1);
        form.rows[0].obtained = "88".to_string();
        form.rows[0].rep_marks_id = Some(5);

        let draft = form.build(MarkRemovalPolicy::Retain).unwrap();
        assert!(draft.rep_id.is_none());
        assert_eq!(draft.body.report_marks.len(), 3);
        assert_eq!(draft.body.report_marks[0].rep_marks_id, Some(5));
        assert_eq!(draft.body.report_marks[0].total_marks, 88.0);
    }

    #[test]
    fn test_report_focus_cycles_through_rows() {
        let mut form = ReportFormState::new(vec![student("S-1", "Ali")]);
        assert_eq!(form.focus, ReportFocus::Header(ReportHeaderField::Student));
        for _ in 0..5 {
            form.next_focus();
        }
        assert_eq!(form.focus, ReportFocus::Mark { row: 0, col: MarkCol::Subject });
        form.prev_focus();
        assert_eq!(form.focus, ReportFocus::Header(ReportHeaderField::Date));
    }

    #[test]
    fn test_remove_focused_row_adjusts_focus() {
        let mut form = ReportFormState::new(vec![student("S-1", "Ali")]);
        form.focus = ReportFocus::Mark { row: 2, col: MarkCol::Max };
        form.remove_focused_row();
        assert_eq!(form.rows.len(), 2);
        assert_eq!(form.focus, ReportFocus::Mark { row: 1, col: MarkCol::Subject });
    }

    #[test]
    fn test_fees_page_sorted_newest_first() {
        let mk = |id: i64, date: &str| Fee {
            fees_id: Some(id),
            student: student("S-1", "Ali"),
            amount: 1000.0,
            month: "March".to_string(),
            date: date.to_string(),
            payment_mode: PaymentMode::Cash,
            issued_by: None,
        };
        let page = FeesPage::new(vec![
            mk(1, "2024-01-10"),
            mk(2, "2024-03-07"),
            mk(3, "2023-11-20"),
        ]);
        let ids: Vec<i64> = page.fees.iter().filter_map(|f| f.fees_id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }
}
