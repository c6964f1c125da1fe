use crate::api::BackendClient;
use crate::dates;
use crate::export;
use crate::grading::GradeScale;
use crate::reconcile::{plan, MarkRemovalPolicy};
use crate::ui::render::render_ui;
use crate::ui::state::{
    AppState, AttendancePage, AttendanceSlot, ConfirmDelete, DeleteAction, FeeFormState,
    FeesPage, Notice, ReportFocus, ReportFormState, ReportHeaderField, ReportViewState,
    ReportsPage, StudentDetailsState, StudentFormState, StudentsPage, MENU_ITEMS,
};
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use indexmap::IndexMap;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

pub struct App {
    client: BackendClient,
    operator: Option<String>,
    removal_policy: MarkRemovalPolicy,
    grade_scale: GradeScale,
    state: AppState,
    notice: Option<Notice>,
    /// Bumped whenever a page load is superseded; a load whose generation is
    /// stale discards its response instead of applying it.
    fetch_generation: u64,
}

impl App {
    pub fn new(client: BackendClient, operator: Option<String>) -> Self {
        Self {
            client,
            operator,
            removal_policy: MarkRemovalPolicy::Retain,
            grade_scale: GradeScale::standard(),
            state: AppState::Menu { selected_index: 0 },
            notice: None,
            fetch_generation: 0,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main event loop
        let result = self.event_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        loop {
            // Always redraw the UI
            terminal.draw(|f| render_ui(f, &self.state, self.notice.as_ref(), &self.grade_scale))?;

            // Check for keyboard events with a short timeout
            if event::poll(std::time::Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if self.handle_key_event(key).await? {
                        break; // User quit
                    }
                }
            }

            // Small yield to allow other async tasks to run
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        Ok(())
    }

    fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    async fn handle_key_event(&mut self, key: KeyEvent) -> Result<bool> {
        // Notices are transient: any keypress dismisses the current one.
        self.notice = None;

        let current_state = std::mem::replace(
            &mut self.state,
            AppState::Loading { message: String::new() },
        );

        match current_state {
            AppState::Menu { mut selected_index } => match key.code {
                KeyCode::Char('q') => return Ok(true),
                KeyCode::Up => {
                    if selected_index > 0 {
                        selected_index -= 1;
                    }
                    self.state = AppState::Menu { selected_index };
                }
                KeyCode::Down => {
                    if selected_index < MENU_ITEMS.len() - 1 {
                        selected_index += 1;
                    }
                    self.state = AppState::Menu { selected_index };
                }
                KeyCode::Enter => match selected_index {
                    0 => self.load_students().await,
                    1 => self.load_attendance(dates::today()).await,
                    2 => self.load_fees().await,
                    3 => self.load_reports().await,
                    _ => return Ok(true),
                },
                _ => {
                    self.state = AppState::Menu { selected_index };
                }
            },

            AppState::Students(mut page) => {
                if page.editing_filter {
                    match key.code {
                        KeyCode::Char(c) => page.filter.push(c),
                        KeyCode::Backspace => {
                            page.filter.pop();
                        }
                        KeyCode::Enter | KeyCode::Esc => page.editing_filter = false,
                        _ => {}
                    }
                    page.selected = 0;
                    self.state = AppState::Students(page);
                    return Ok(false);
                }

                match key.code {
                    KeyCode::Char('q') => return Ok(true),
                    KeyCode::Esc => {
                        self.state = AppState::Menu { selected_index: 0 };
                    }
                    KeyCode::Up => {
                        page.selected = page.selected.saturating_sub(1);
                        self.state = AppState::Students(page);
                    }
                    KeyCode::Down => {
                        let len = page.visible().len();
                        if page.selected + 1 < len {
                            page.selected += 1;
                        }
                        self.state = AppState::Students(page);
                    }
                    KeyCode::Char('/') => {
                        page.editing_filter = true;
                        self.state = AppState::Students(page);
                    }
                    KeyCode::Char('r') => self.load_students().await,
                    KeyCode::Char('n') => {
                        self.state = AppState::StudentForm(StudentFormState::new());
                    }
                    KeyCode::Char('e') => {
                        let selected = page.visible().get(page.selected).map(|s| (*s).clone());
                        match selected {
                            Some(student) => {
                                self.state =
                                    AppState::StudentForm(StudentFormState::from_student(&student));
                            }
                            None => self.state = AppState::Students(page),
                        }
                    }
                    KeyCode::Char('d') => {
                        let selected = page.visible().get(page.selected).map(|s| (*s).clone());
                        match selected {
                            Some(student) => {
                                self.state = AppState::ConfirmDelete(ConfirmDelete {
                                    message: format!(
                                        "Delete student {} (#{})?",
                                        student.std_name, student.std_id
                                    ),
                                    action: DeleteAction::Student(student.std_id),
                                });
                            }
                            None => self.state = AppState::Students(page),
                        }
                    }
                    KeyCode::Char('v') => {
                        let selected = page.visible().get(page.selected).map(|s| (*s).clone());
                        match selected {
                            Some(student) => self.open_student_details(page, student).await,
                            None => self.state = AppState::Students(page),
                        }
                    }
                    _ => {
                        self.state = AppState::Students(page);
                    }
                }
            }

            AppState::StudentForm(mut form) => match key.code {
                KeyCode::Esc => self.load_students().await,
                KeyCode::Tab | KeyCode::Down => {
                    form.focused = form.focused.next();
                    self.state = AppState::StudentForm(form);
                }
                KeyCode::BackTab | KeyCode::Up => {
                    form.focused = form.focused.prev();
                    self.state = AppState::StudentForm(form);
                }
                KeyCode::Left | KeyCode::Right => {
                    if form.focused == crate::ui::state::StudentField::PaymentOption {
                        form.payment_option = form.payment_option.toggle();
                    }
                    self.state = AppState::StudentForm(form);
                }
                KeyCode::Char(c) => {
                    if let Some(text) = form.focused_text() {
                        text.push(c);
                    }
                    self.state = AppState::StudentForm(form);
                }
                KeyCode::Backspace => {
                    if let Some(text) = form.focused_text() {
                        text.pop();
                    }
                    self.state = AppState::StudentForm(form);
                }
                KeyCode::Enter => match form.build() {
                    Ok(student) => {
                        let result = if form.editing {
                            self.client.update_student(&student).await
                        } else {
                            self.client.add_student(&student).await
                        };
                        match result {
                            Ok(()) => {
                                self.notify(Notice::success(if form.editing {
                                    "Student updated successfully"
                                } else {
                                    "Student enrolled successfully"
                                }));
                                self.load_students().await;
                            }
                            Err(e) => {
                                self.notify(Notice::error(format!("Failed to save student: {}", e)));
                                self.state = AppState::StudentForm(form);
                            }
                        }
                    }
                    Err(message) => {
                        self.notify(Notice::error(message));
                        self.state = AppState::StudentForm(form);
                    }
                },
                _ => {
                    self.state = AppState::StudentForm(form);
                }
            },

            AppState::StudentDetails(details) => match key.code {
                KeyCode::Char('q') => return Ok(true),
                KeyCode::Esc | KeyCode::Enter => self.load_students().await,
                _ => {
                    self.state = AppState::StudentDetails(details);
                }
            },

            AppState::Attendance(mut page) => {
                if page.editing_filter {
                    match key.code {
                        KeyCode::Char(c) => page.filter.push(c),
                        KeyCode::Backspace => {
                            page.filter.pop();
                        }
                        KeyCode::Enter | KeyCode::Esc => page.editing_filter = false,
                        _ => {}
                    }
                    page.selected = 0;
                    self.state = AppState::Attendance(page);
                    return Ok(false);
                }

                match key.code {
                    KeyCode::Char('q') => return Ok(true),
                    KeyCode::Esc => {
                        self.state = AppState::Menu { selected_index: 1 };
                    }
                    KeyCode::Char('[') | KeyCode::Left => {
                        let date = dates::shift_days(&page.date, -1);
                        self.load_attendance(date).await;
                    }
                    KeyCode::Char(']') | KeyCode::Right => {
                        let date = dates::shift_days(&page.date, 1);
                        self.load_attendance(date).await;
                    }
                    KeyCode::Char('r') => {
                        let date = page.date.clone();
                        self.load_attendance(date).await;
                    }
                    KeyCode::Up => {
                        page.selected = page.selected.saturating_sub(1);
                        self.state = AppState::Attendance(page);
                    }
                    KeyCode::Down => {
                        let len = page.visible().len();
                        if page.selected + 1 < len {
                            page.selected += 1;
                        }
                        self.state = AppState::Attendance(page);
                    }
                    KeyCode::Char('/') => {
                        page.editing_filter = true;
                        self.state = AppState::Attendance(page);
                    }
                    KeyCode::Char('p') => {
                        let std_id = page.visible().get(page.selected).map(|s| s.std_id.clone());
                        if let Some(id) = std_id {
                            page.mark(&id, 1);
                        }
                        self.state = AppState::Attendance(page);
                    }
                    KeyCode::Char('a') => {
                        let std_id = page.visible().get(page.selected).map(|s| s.std_id.clone());
                        if let Some(id) = std_id {
                            page.mark(&id, 0);
                        }
                        self.state = AppState::Attendance(page);
                    }
                    KeyCode::Char('u') => {
                        let std_id = page.visible().get(page.selected).map(|s| s.std_id.clone());
                        if let Some(id) = std_id {
                            page.unmark(&id);
                        }
                        self.state = AppState::Attendance(page);
                    }
                    KeyCode::Char('s') => self.save_attendance(page).await,
                    _ => {
                        self.state = AppState::Attendance(page);
                    }
                }
            }

            AppState::Fees(mut page) => {
                if page.editing_filter {
                    match key.code {
                        KeyCode::Char(c) => page.filter.push(c),
                        KeyCode::Backspace => {
                            page.filter.pop();
                        }
                        KeyCode::Enter | KeyCode::Esc => page.editing_filter = false,
                        _ => {}
                    }
                    page.selected = 0;
                    self.state = AppState::Fees(page);
                    return Ok(false);
                }

                match key.code {
                    KeyCode::Char('q') => return Ok(true),
                    KeyCode::Esc => {
                        self.state = AppState::Menu { selected_index: 2 };
                    }
                    KeyCode::Up => {
                        page.selected = page.selected.saturating_sub(1);
                        self.state = AppState::Fees(page);
                    }
                    KeyCode::Down => {
                        let len = page.visible().len();
                        if page.selected + 1 < len {
                            page.selected += 1;
                        }
                        self.state = AppState::Fees(page);
                    }
                    KeyCode::Char('/') => {
                        page.editing_filter = true;
                        self.state = AppState::Fees(page);
                    }
                    KeyCode::Char('r') => self.load_fees().await,
                    KeyCode::Char('n') => self.open_fee_form(page, None).await,
                    KeyCode::Char('e') => {
                        let selected = page.visible().get(page.selected).map(|f| (*f).clone());
                        match selected {
                            Some(fee) => self.open_fee_form(page, Some(fee)).await,
                            None => self.state = AppState::Fees(page),
                        }
                    }
                    KeyCode::Char('d') => {
                        let selected = page.visible().get(page.selected).map(|f| (*f).clone());
                        match selected.and_then(|f| f.fees_id.map(|id| (id, f))) {
                            Some((id, fee)) => {
                                self.state = AppState::ConfirmDelete(ConfirmDelete {
                                    message: format!(
                                        "Delete fee receipt #{} for {}?",
                                        id, fee.student.std_name
                                    ),
                                    action: DeleteAction::Fee(id),
                                });
                            }
                            None => self.state = AppState::Fees(page),
                        }
                    }
                    KeyCode::Char('x') => {
                        let selected = page.visible().get(page.selected).map(|f| (*f).clone());
                        if let Some(fee) = selected {
                            let doc = export::build_receipt(&fee);
                            match export::write_document(&doc) {
                                Ok(path) => self.notify(Notice::success(format!(
                                    "Receipt saved to {}",
                                    path.display()
                                ))),
                                Err(e) => self.notify(Notice::error(format!(
                                    "Failed to export receipt: {}",
                                    e
                                ))),
                            }
                        }
                        self.state = AppState::Fees(page);
                    }
                    KeyCode::Char('c') => {
                        let visible: Vec<_> = page.visible().into_iter().cloned().collect();
                        match export::export_fees_csv(&visible) {
                            Ok(path) => self.notify(Notice::success(format!(
                                "Fee history exported to {}",
                                path.display()
                            ))),
                            Err(e) => {
                                self.notify(Notice::error(format!("Failed to export CSV: {}", e)))
                            }
                        }
                        self.state = AppState::Fees(page);
                    }
                    _ => {
                        self.state = AppState::Fees(page);
                    }
                }
            }

            AppState::FeeForm(mut form) => match key.code {
                KeyCode::Esc => self.load_fees().await,
                KeyCode::Tab | KeyCode::Down => {
                    form.focused = form.focused.next();
                    self.state = AppState::FeeForm(form);
                }
                KeyCode::BackTab | KeyCode::Up => {
                    form.focused = form.focused.prev();
                    self.state = AppState::FeeForm(form);
                }
                KeyCode::Left => {
                    match form.focused {
                        crate::ui::state::FeeField::Student => form.cycle_student(-1),
                        crate::ui::state::FeeField::PaymentMode => {
                            form.payment_mode = form.payment_mode.toggle()
                        }
                        _ => {}
                    }
                    self.state = AppState::FeeForm(form);
                }
                KeyCode::Right => {
                    match form.focused {
                        crate::ui::state::FeeField::Student => form.cycle_student(1),
                        crate::ui::state::FeeField::PaymentMode => {
                            form.payment_mode = form.payment_mode.toggle()
                        }
                        _ => {}
                    }
                    self.state = AppState::FeeForm(form);
                }
                KeyCode::Char(c) => {
                    if let Some(text) = form.focused_text() {
                        text.push(c);
                    }
                    self.state = AppState::FeeForm(form);
                }
                KeyCode::Backspace => {
                    if let Some(text) = form.focused_text() {
                        text.pop();
                    }
                    self.state = AppState::FeeForm(form);
                }
                KeyCode::Enter => match form.build() {
                    Ok(draft) => {
                        let editing = draft.fees_id.is_some();
                        let mut failed = None;
                        for op in plan(vec![draft]) {
                            if let Err(e) = self.client.apply_fee(op).await {
                                failed = Some(e);
                            }
                        }
                        match failed {
                            None => {
                                self.notify(Notice::success(if editing {
                                    "Fee receipt updated"
                                } else {
                                    "Fee receipt generated"
                                }));
                                self.load_fees().await;
                            }
                            Some(e) => {
                                self.notify(Notice::error(format!(
                                    "Failed to save fee receipt: {}",
                                    e
                                )));
                                self.state = AppState::FeeForm(form);
                            }
                        }
                    }
                    Err(message) => {
                        self.notify(Notice::error(message));
                        self.state = AppState::FeeForm(form);
                    }
                },
                _ => {
                    self.state = AppState::FeeForm(form);
                }
            },

            AppState::Reports(mut page) => {
                if page.editing_filter {
                    match key.code {
                        KeyCode::Char(c) => page.filter.push(c),
                        KeyCode::Backspace => {
                            page.filter.pop();
                        }
                        KeyCode::Enter | KeyCode::Esc => page.editing_filter = false,
                        _ => {}
                    }
                    page.selected = 0;
                    self.state = AppState::Reports(page);
                    return Ok(false);
                }

                match key.code {
                    KeyCode::Char('q') => return Ok(true),
                    KeyCode::Esc => {
                        self.state = AppState::Menu { selected_index: 3 };
                    }
                    KeyCode::Up => {
                        page.selected = page.selected.saturating_sub(1);
                        self.state = AppState::Reports(page);
                    }
                    KeyCode::Down => {
                        let len = page.visible().len();
                        if page.selected + 1 < len {
                            page.selected += 1;
                        }
                        self.state = AppState::Reports(page);
                    }
                    KeyCode::Char('/') => {
                        page.editing_filter = true;
                        self.state = AppState::Reports(page);
                    }
                    KeyCode::Char('r') => self.load_reports().await,
                    KeyCode::Char('n') => self.open_report_form(page, None).await,
                    KeyCode::Char('e') => {
                        let selected = page.visible().get(page.selected).map(|r| (*r).clone());
                        match selected {
                            Some(report) => self.open_report_form(page, Some(report)).await,
                            None => self.state = AppState::Reports(page),
                        }
                    }
                    KeyCode::Char('d') => {
                        let selected = page.visible().get(page.selected).map(|r| (*r).clone());
                        match selected.and_then(|r| r.rep_id.map(|id| (id, r))) {
                            Some((id, report)) => {
                                self.state = AppState::ConfirmDelete(ConfirmDelete {
                                    message: format!(
                                        "Delete report #{} for {}?",
                                        id, report.student.std_name
                                    ),
                                    action: DeleteAction::Report(id),
                                });
                            }
                            None => self.state = AppState::Reports(page),
                        }
                    }
                    KeyCode::Char('v') => {
                        let selected = page.visible().get(page.selected).map(|r| (*r).clone());
                        match selected {
                            Some(report) => {
                                self.state = AppState::ReportView(ReportViewState { report });
                            }
                            None => self.state = AppState::Reports(page),
                        }
                    }
                    _ => {
                        self.state = AppState::Reports(page);
                    }
                }
            }

            AppState::ReportForm(mut form) => match key.code {
                KeyCode::Esc => self.load_reports().await,
                KeyCode::Tab | KeyCode::Down => {
                    form.next_focus();
                    self.state = AppState::ReportForm(form);
                }
                KeyCode::BackTab | KeyCode::Up => {
                    form.prev_focus();
                    self.state = AppState::ReportForm(form);
                }
                KeyCode::Left => {
                    if form.focus == ReportFocus::Header(ReportHeaderField::Student) {
                        form.cycle_student(-1);
                    }
                    self.state = AppState::ReportForm(form);
                }
                KeyCode::Right => {
                    if form.focus == ReportFocus::Header(ReportHeaderField::Student) {
                        form.cycle_student(1);
                    }
                    self.state = AppState::ReportForm(form);
                }
                KeyCode::Insert => {
                    form.add_row();
                    self.state = AppState::ReportForm(form);
                }
                KeyCode::Delete => {
                    form.remove_focused_row();
                    self.state = AppState::ReportForm(form);
                }
                KeyCode::Char(c) => {
                    if let Some(text) = form.focused_text() {
                        text.push(c);
                    }
                    self.state = AppState::ReportForm(form);
                }
                KeyCode::Backspace => {
                    if let Some(text) = form.focused_text() {
                        text.pop();
                    }
                    self.state = AppState::ReportForm(form);
                }
                KeyCode::Enter => match form.build(self.removal_policy) {
                    Ok(draft) => {
                        let editing = draft.rep_id.is_some();
                        let mut failed = None;
                        for op in plan(vec![draft]) {
                            if let Err(e) = self.client.apply_report(op).await {
                                failed = Some(e);
                            }
                        }
                        match failed {
                            None => {
                                self.notify(Notice::success(if editing {
                                    "Report updated successfully"
                                } else {
                                    "Report generated successfully"
                                }));
                                self.load_reports().await;
                            }
                            Some(e) => {
                                self.notify(Notice::error(format!(
                                    "Failed to save report: {}",
                                    e
                                )));
                                self.state = AppState::ReportForm(form);
                            }
                        }
                    }
                    Err(message) => {
                        self.notify(Notice::error(message));
                        self.state = AppState::ReportForm(form);
                    }
                },
                _ => {
                    self.state = AppState::ReportForm(form);
                }
            },

            AppState::ReportView(view) => match key.code {
                KeyCode::Char('q') => return Ok(true),
                KeyCode::Esc | KeyCode::Enter => self.load_reports().await,
                KeyCode::Char('x') => {
                    let doc = export::build_report_card(&view.report, &self.grade_scale);
                    match export::write_document(&doc) {
                        Ok(path) => self.notify(Notice::success(format!(
                            "Report card saved to {}",
                            path.display()
                        ))),
                        Err(e) => {
                            self.notify(Notice::error(format!("Failed to export report: {}", e)))
                        }
                    }
                    self.state = AppState::ReportView(view);
                }
                _ => {
                    self.state = AppState::ReportView(view);
                }
            },

            AppState::ConfirmDelete(confirm) => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => match confirm.action {
                    DeleteAction::Student(std_id) => {
                        match self.client.delete_student(&std_id).await {
                            Ok(()) => self.notify(Notice::success("Student deleted successfully")),
                            Err(e) => {
                                self.notify(Notice::error(format!("Failed to delete student: {}", e)))
                            }
                        }
                        self.load_students().await;
                    }
                    DeleteAction::Fee(fees_id) => {
                        match self.client.delete_fee(fees_id).await {
                            Ok(()) => self.notify(Notice::success("Fee record deleted")),
                            Err(e) => {
                                self.notify(Notice::error(format!("Failed to delete fee record: {}", e)))
                            }
                        }
                        self.load_fees().await;
                    }
                    DeleteAction::Report(rep_id) => {
                        match self.client.delete_report(rep_id).await {
                            Ok(()) => self.notify(Notice::success("Report deleted successfully")),
                            Err(e) => {
                                self.notify(Notice::error(format!("Failed to delete report: {}", e)))
                            }
                        }
                        self.load_reports().await;
                    }
                },
                KeyCode::Char('n') | KeyCode::Esc => match confirm.action {
                    DeleteAction::Student(_) => self.load_students().await,
                    DeleteAction::Fee(_) => self.load_fees().await,
                    DeleteAction::Report(_) => self.load_reports().await,
                },
                _ => {
                    self.state = AppState::ConfirmDelete(confirm);
                }
            },

            state => {
                // Loading states ignore input
                self.state = state;
            }
        }

        Ok(false)
    }

    // ------------------------------------------------------------------
    // Page loads (always full re-fetches; fetched data is a snapshot)
    // ------------------------------------------------------------------

    async fn load_students(&mut self) {
        self.state = AppState::Loading {
            message: "Loading students...".to_string(),
        };
        match self.client.list_students().await {
            Ok(students) => {
                self.state = AppState::Students(StudentsPage::new(students));
            }
            Err(e) => {
                self.notify(Notice::error(format!("Failed to fetch students: {}", e)));
                self.state = AppState::Menu { selected_index: 0 };
            }
        }
    }

    async fn open_student_details(&mut self, page: StudentsPage, student: crate::models::Student) {
        self.state = AppState::Loading {
            message: format!("Loading attendance for {}...", student.std_name),
        };

        // Count and history are independent; fetch them together and trust
        // neither unless both arrive.
        let result = tokio::try_join!(
            self.client.present_count(&student.std_id),
            self.client.attendance_history(&student.std_id),
        );

        match result {
            Ok((present_count, mut history)) => {
                history.sort_by_key(|e| std::cmp::Reverse(dates::sort_key(&e.date)));
                self.state = AppState::StudentDetails(StudentDetailsState {
                    student,
                    present_count,
                    history,
                });
            }
            Err(e) => {
                self.notify(Notice::error(format!(
                    "Failed to fetch student details: {}",
                    e
                )));
                self.state = AppState::Students(page);
            }
        }
    }

    async fn load_attendance(&mut self, date: String) {
        self.fetch_generation += 1;
        let generation = self.fetch_generation;

        self.state = AppState::Loading {
            message: format!("Loading attendance for {}...", date),
        };

        let result = tokio::try_join!(
            self.client.list_students(),
            self.client.attendance_for_date(&date),
        );

        // A later load supersedes this one; drop the response rather than
        // overwrite newer state.
        if generation != self.fetch_generation {
            return;
        }

        match result {
            Ok((students, entries)) => {
                let mut slots = IndexMap::new();
                for entry in entries {
                    let Some(student) = entry.student else {
                        continue;
                    };
                    slots.insert(
                        student.std_id,
                        AttendanceSlot {
                            status: entry.is_present,
                            att_id: entry.att_id,
                        },
                    );
                }
                let mut page = AttendancePage::empty(date);
                page.students = students;
                page.slots = slots;
                page.loaded = true;
                self.state = AppState::Attendance(page);
            }
            Err(e) => {
                self.notify(Notice::error(format!("Failed to fetch attendance: {}", e)));
                self.state = AppState::Attendance(AttendancePage::empty(date));
            }
        }
    }

    /// Reconcile the day sheet into a create/update batch, issue it
    /// concurrently, and re-fetch on success so new records pick up ids.
    async fn save_attendance(&mut self, page: AttendancePage) {
        let ops = plan(page.drafts());
        if ops.is_empty() {
            self.notify(Notice::info("No attendance marked to save"));
            self.state = AppState::Attendance(page);
            return;
        }

        let total = ops.len();
        self.state = AppState::Loading {
            message: format!("Saving {} attendance records...", total),
        };

        // Operations are keyed by distinct (student, date) records, so the
        // batch is safe to issue concurrently.
        let mut handles = Vec::with_capacity(total);
        for op in ops {
            let client = self.client.clone();
            handles.push(tokio::spawn(async move { client.apply_attendance(op).await }));
        }

        let mut failed = 0usize;
        for handle in handles {
            match handle.await {
                Ok(Ok(())) => {}
                _ => failed += 1,
            }
        }

        if failed > 0 {
            // Some operations may have committed; the records are keyed, so
            // re-saving the same sheet is safe.
            self.notify(Notice::error(format!(
                "Failed to save attendance ({} of {} operations failed)",
                failed, total
            )));
            self.state = AppState::Attendance(page);
        } else {
            self.notify(Notice::success("Attendance saved successfully"));
            self.load_attendance(page.date).await;
        }
    }

    async fn load_fees(&mut self) {
        self.state = AppState::Loading {
            message: "Loading fee history...".to_string(),
        };
        match self.client.list_fees().await {
            Ok(fees) => {
                self.state = AppState::Fees(FeesPage::new(fees));
            }
            Err(e) => {
                self.notify(Notice::error(format!("Failed to fetch fees history: {}", e)));
                self.state = AppState::Menu { selected_index: 2 };
            }
        }
    }

    async fn open_fee_form(&mut self, page: FeesPage, fee: Option<crate::models::Fee>) {
        self.state = AppState::Loading {
            message: "Loading students...".to_string(),
        };
        match self.client.list_students().await {
            Ok(students) => {
                let form = match &fee {
                    Some(fee) => FeeFormState::from_fee(students, fee),
                    None => FeeFormState::new(students, self.operator.clone()),
                };
                self.state = AppState::FeeForm(form);
            }
            Err(e) => {
                self.notify(Notice::error(format!("Failed to load students: {}", e)));
                self.state = AppState::Fees(page);
            }
        }
    }

    async fn load_reports(&mut self) {
        self.state = AppState::Loading {
            message: "Loading reports...".to_string(),
        };
        match self.client.list_reports().await {
            Ok(reports) => {
                self.state = AppState::Reports(ReportsPage::new(reports));
            }
            Err(e) => {
                self.notify(Notice::error(format!("Failed to fetch reports: {}", e)));
                self.state = AppState::Menu { selected_index: 3 };
            }
        }
    }

    async fn open_report_form(&mut self, page: ReportsPage, report: Option<crate::models::Report>) {
        self.state = AppState::Loading {
            message: "Loading students...".to_string(),
        };
        match self.client.list_students().await {
            Ok(students) => {
                let form = match report {
                    Some(report) => ReportFormState::from_report(students, report),
                    None => ReportFormState::new(students),
                };
                self.state = AppState::ReportForm(form);
            }
            Err(e) => {
                self.notify(Notice::error(format!("Failed to load students: {}", e)));
                self.state = AppState::Reports(page);
            }
        }
    }
}
