// src/app.rs

use crate::commands::CommandResult;
use crate::logging;
use chrono::{DateTime, Local};
use ratatui::widgets::ScrollbarState;

pub const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

const LOG_TAIL_LINES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Disclaimer,
    Idle,
    Running,
    Finished,
}

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub input: String,
    pub last_command: Option<String>,
    pub result: Option<CommandResult>,
    pub finished_at: Option<DateTime<Local>>,
    pub spinner_frame: usize,
    pub scroll_offset: usize,
    pub report_scroll_state: ScrollbarState,
    pub show_logs: bool,
    pub log_content: Vec<String>,
    log_file_len: Option<u64>,
    pub log_horizontal_scroll: usize,
    pub log_horizontal_scroll_state: ScrollbarState,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            state: AppState::Disclaimer,
            input: String::new(),
            last_command: None,
            result: None,
            finished_at: None,
            spinner_frame: 0,
            scroll_offset: 0,
            report_scroll_state: ScrollbarState::default(),
            show_logs: false,
            log_content: Vec::new(),
            log_file_len: None,
            log_horizontal_scroll: 0,
            log_horizontal_scroll_state: ScrollbarState::default(),
        }
    }

    pub fn acknowledge_disclaimer(&mut self) {
        if self.state == AppState::Disclaimer {
            self.state = AppState::Idle;
        }
    }

    /// Moves to `Running` and hands back the submitted line.
    pub fn submit(&mut self) -> Option<String> {
        if self.state != AppState::Idle || self.input.trim().is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.input);
        self.last_command = Some(line.clone());
        self.state = AppState::Running;
        Some(line)
    }

    pub fn finish(&mut self, result: CommandResult) {
        self.result = Some(result);
        self.finished_at = Some(Local::now());
        self.scroll_offset = 0;
        self.report_scroll_state = ScrollbarState::default();
        self.state = AppState::Finished;
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
        self.report_scroll_state = self.report_scroll_state.position(self.scroll_offset);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
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
            self.log_file_len = None;
            self.refresh_logs();
        }
    }

    /// Re-reads the log tail, skipping the read while the file size is unchanged.
    pub fn refresh_logs(&mut self) {
        self.refresh_logs_with(logging::log_file_len(), || logging::tail_log(LOG_TAIL_LINES));
    }

    fn refresh_logs_with<F>(&mut self, current_len: Option<u64>, read_tail: F)
    where
        F: FnOnce() -> Vec<String>,
    {
        if current_len.is_some() && current_len == self.log_file_len {
            return;
        }
        self.log_file_len = current_len;
        self.log_content = read_tail();
    }

    pub fn on_tick(&mut self) {
        if self.state == AppState::Running {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        }
        if self.show_logs {
            self.refresh_logs();
        }
    }

    pub fn quit(&mut self) { self.should_quit = true; }

    pub fn reset(&mut self) {
        self.state = AppState::Idle;
        self.input = String::new();
        self.result = None;
        self.finished_at = None;
        self.spinner_frame = 0;
        self.scroll_offset = 0;
        self.report_scroll_state = ScrollbarState::default();
    }
}
