// src/app.rs

use crossterm::event::KeyCode;
use ratatui::widgets::ScrollbarState;
use reconwatch::core::models::CompletedScan;
use reconwatch::core::service::Summary;
use reconwatch::logging;

pub const SPINNER_CHARS: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const LOG_LINES: usize = 200;

/// Shows or hides the log panel in every state, including while typing.
pub const LOG_TOGGLE_KEY: KeyCode = KeyCode::Tab;

pub enum ExportStatus {
    Idle,
    Success(String),
    Error(String),
}

pub enum AppState {
    Idle,
    Scanning,
    Finished,
}

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub input: String,
    pub show_disclaimer: bool,
    pub show_logs: bool,
    pub last_scan: Option<CompletedScan>,
    pub last_error: Option<String>,
    pub summary: Summary,
    pub scroll_offset: usize,
    pub report_scroll_state: ScrollbarState,
    pub export_status: ExportStatus,
    pub log_content: Vec<String>,
    log_len: Option<u64>,
    pub log_horizontal_scroll: usize,
    pub log_horizontal_scroll_state: ScrollbarState,
    pub spinner_frame: usize,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            state: AppState::Scanning,
            input: String::new(),
            show_disclaimer: true,
            show_logs: false,
            last_scan: None,
            last_error: None,
            summary: Summary::default(),
            scroll_offset: 0,
            report_scroll_state: ScrollbarState::default(),
            export_status: ExportStatus::Idle,
            log_content: Vec::new(),
            log_len: None,
            log_horizontal_scroll: 0,
            log_horizontal_scroll_state: ScrollbarState::default(),
            spinner_frame: 0,
        }
    }

    /// Lines shown in the results panel for the latest outcome.
    pub fn result_lines(&self) -> Vec<String> {
        match (&self.last_error, &self.last_scan) {
            (Some(error), _) => error.lines().map(String::from).collect(),
            (None, Some(scan)) => scan.result.lines(),
            (None, None) => Vec::new(),
        }
    }

    pub fn begin_scan(&mut self) {
        self.state = AppState::Scanning;
        self.export_status = ExportStatus::Idle;
    }

    pub fn finish_scan(&mut self, outcome: Result<CompletedScan, String>, summary: Summary) {
        match outcome {
            Ok(scan) => {
                self.last_scan = Some(scan);
                self.last_error = None;
            }
            Err(error) => self.last_error = Some(error),
        }
        self.summary = summary;
        self.scroll_offset = 0;
        self.report_scroll_state = ScrollbarState::new(self.result_lines().len()).position(0);
        self.state = AppState::Finished;
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
        self.report_scroll_state = self.report_scroll_state.position(self.scroll_offset);
    }

    pub fn scroll_down(&mut self) {
        let max = self.result_lines().len().saturating_sub(1);
        self.scroll_offset = self.scroll_offset.saturating_add(1).min(max);
        self.report_scroll_state = self.report_scroll_state.position(self.scroll_offset);
    }

    pub fn scroll_logs_left(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_sub(4);
        self.log_horizontal_scroll_state = self.log_horizontal_scroll_state.position(self.log_horizontal_scroll);
    }

    pub fn scroll_logs_right(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_add(4);
        self.log_horizontal_scroll_state = self.log_horizontal_scroll_state.position(self.log_horizontal_scroll);
    }

    pub fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
        if self.show_logs {
            self.log_len = None;
            self.refresh_logs();
        }
    }

    /// Re-reads the log tail only when the file size moved since the last read.
    pub fn refresh_logs(&mut self) {
        if self.log_changed(logging::log_file_len()) {
            self.log_content = logging::tail_log(LOG_LINES);
        }
    }

    fn log_changed(&mut self, len: Option<u64>) -> bool {
        if len.is_some() && len == self.log_len {
            return false;
        }
        self.log_len = len;
        true
    }

    pub fn on_tick(&mut self) {
        if matches!(self.state, AppState::Scanning) {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
        if self.show_logs {
            self.refresh_logs();
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Back to the command prompt, keeping the last results on screen.
    pub fn reset(&mut self) {
        self.state = AppState::Idle;
        self.input = String::new();
        self.export_status = ExportStatus::Idle;
    }
}
