// Interactive review loop: one document at a time, label keys write straight
// into the in-memory dataset, exports are on-demand snapshots.

use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame, Terminal,
};

use trilabel_config::{CursorPolicy, Settings};
use trilabel_engine::present::{default_fields, present_row, FieldSpec};
use trilabel_engine::{eligible_rows, Dataset, Label, SessionCursor, Stage};
use trilabel_io::export_to_file;

use crate::util;

/// Snapshot written while labeling is still in progress.
pub const INTERIM_FILE: &str = "labeling_interim.xlsx";
/// Snapshot written from the completion view of the last stage.
pub const FINAL_FILE: &str = "labeling_final.xlsx";

pub struct ReviewApp {
    /// The single shared table; label keys are the only writers
    dataset: Dataset,
    settings: Settings,
    fields: Vec<FieldSpec>,
    /// The externally chosen pass; stages after it are invisible
    stage: Stage,
    /// Working set for the active stage, original table order
    eligible: Vec<usize>,
    cursor: SessionCursor,
    input_path: PathBuf,
    show_detail: bool,
    /// One-shot confirmation or error shown in the status bar
    status_line: Option<String>,
    should_quit: bool,
}

impl ReviewApp {
    pub fn new(dataset: Dataset, settings: Settings, input_path: PathBuf) -> Self {
        let stage = Stage::ALL[0];
        let eligible = eligible_rows(&dataset, stage);
        Self {
            dataset,
            settings,
            fields: default_fields(),
            stage,
            eligible,
            cursor: SessionCursor::new(),
            input_path,
            show_detail: true,
            status_line: None,
            should_quit: false,
        }
    }

    pub fn active_stage(&self) -> Stage {
        self.stage
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    pub fn eligible_len(&self) -> usize {
        self.eligible.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor.is_exhausted(self.eligible.len())
    }

    pub fn current_row(&self) -> Option<usize> {
        self.cursor.current_row(&self.eligible)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn status_line(&self) -> Option<&str> {
        self.status_line.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Stage display name (the label column name).
    fn stage_name(&self, stage: Stage) -> &str {
        &self.settings.label_columns[stage.index()]
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c @ '1'..='3') => {
                self.select_stage((c as usize) - ('1' as usize));
            }
            KeyCode::Char('d') => self.show_detail = !self.show_detail,
            KeyCode::Char('y') => self.apply_label(Label::Yes),
            KeyCode::Char('n') => self.apply_label(Label::No),
            KeyCode::Char('m') => self.apply_label(Label::Maybe),
            KeyCode::Enter | KeyCode::Right => self.next_document(),
            KeyCode::Char('s') => self.save_copy(false),
            KeyCode::Char('w') if self.is_exhausted() => {
                self.save_copy(self.stage.is_last());
            }
            _ => {}
        }
    }

    /// Switch the active stage and recompute the working set. The cursor
    /// follows the configured policy; `Keep` carries the raw position index,
    /// which may land on an unrelated row under the new filter.
    fn select_stage(&mut self, index: usize) {
        let Some(stage) = Stage::new(index) else {
            return;
        };
        if stage == self.stage {
            return;
        }
        self.stage = stage;
        self.eligible = eligible_rows(&self.dataset, self.stage);
        if self.settings.cursor_on_stage_change == CursorPolicy::Reset {
            self.cursor.reset();
        }
        self.status_line = None;
    }

    /// Write a label for the active stage at the current row. Writes are
    /// immediate; there is no separate save-row step. Choosing nothing
    /// (never pressing a label key) leaves the stored value alone.
    fn apply_label(&mut self, label: Label) {
        if let Some(row) = self.current_row() {
            self.dataset.set_label(row, self.stage, label);
            self.status_line = Some(format!("{} = {}", self.stage_name(self.stage), label));
        }
    }

    fn next_document(&mut self) {
        if !self.is_exhausted() {
            self.cursor.advance();
            self.status_line = None;
        }
    }

    fn export_path(&self, final_copy: bool) -> PathBuf {
        let name = if final_copy { FINAL_FILE } else { INTERIM_FILE };
        match self.input_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.join(name),
            _ => PathBuf::from(name),
        }
    }

    /// Export the current table state. A read-only snapshot: allowed at any
    /// point, never blocks further edits, never touches the source file.
    fn save_copy(&mut self, final_copy: bool) {
        let path = self.export_path(final_copy);
        self.status_line = Some(match export_to_file(&self.dataset, &path) {
            Ok(()) => {
                let kind = if final_copy { "final file" } else { "interim copy" };
                format!("saved {} to {}", kind, path.display())
            }
            Err(e) => format!("export failed: {}", e),
        });
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

        self.draw_title(frame, chunks[0]);
        self.draw_stage_bar(frame, chunks[1]);
        if self.is_exhausted() {
            self.draw_completion(frame, chunks[2]);
        } else {
            self.draw_document(frame, chunks[2]);
        }
        self.draw_status(frame, chunks[3]);
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let file_name = self
            .input_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.input_path.display().to_string());

        let counter = if self.is_exhausted() {
            format!("{} documents done", self.eligible.len())
        } else {
            format!(
                "document {} / {}",
                self.cursor.position() + 1,
                self.eligible.len()
            )
        };

        let title = format!(
            " trilabel: {} | stage {} | {} ",
            file_name,
            self.stage_name(self.stage),
            counter
        );
        let para = Paragraph::new(Line::from(vec![Span::styled(
            title,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]))
        .style(Style::default().bg(Color::Cyan));
        frame.render_widget(para, area);
    }

    fn draw_stage_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        for (i, stage) in Stage::ALL.iter().enumerate() {
            let label = format!(" {}:{} ", i + 1, self.stage_name(*stage));
            if *stage == self.stage {
                spans.push(Span::styled(
                    label,
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::styled(
                    label,
                    Style::default().fg(Color::Gray).bg(Color::DarkGray),
                ));
            }
            spans.push(Span::styled(" ", Style::default().bg(Color::Black)));
        }
        let para = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
        frame.render_widget(para, area);
    }

    fn draw_document(&self, frame: &mut Frame, area: Rect) {
        let label_panel_height = 2 + Stage::ALL.len() as u16;
        let chunks = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(label_panel_height),
        ])
        .split(area);

        self.draw_detail(frame, chunks[0]);
        self.draw_labels(frame, chunks[1]);
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect) {
        let Some(row) = self.current_row() else {
            return;
        };

        let mut lines: Vec<Line> = Vec::new();
        if !self.show_detail {
            lines.push(Line::from(Span::styled(
                "  d: show document details",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            let presented = present_row(
                &self.dataset,
                row,
                &self.fields,
                self.settings.content_preview_chars,
            );
            for field in presented {
                let name_style = Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD);
                let value_style = if field.is_link {
                    Style::default()
                        .fg(Color::Blue)
                        .add_modifier(Modifier::UNDERLINED)
                } else {
                    Style::default().fg(Color::White)
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("  {}: ", field.name), name_style),
                    Span::styled(field.text, value_style),
                ]));
            }
        }

        let para = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(para, area);
    }

    fn draw_labels(&self, frame: &mut Frame, area: Rect) {
        let Some(row) = self.current_row() else {
            return;
        };

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(Span::styled(
            "  labels",
            Style::default().fg(Color::DarkGray),
        )));

        // Prior stages read-only, the active stage as a radio row. Stages
        // after the active one are not rendered at all.
        for stage in Stage::ALL.iter().take(self.stage.index() + 1) {
            let name = self.stage_name(*stage);
            if *stage < self.stage {
                let stored = self
                    .dataset
                    .label(row, *stage)
                    .map(|l| l.as_str())
                    .unwrap_or("-");
                lines.push(Line::from(Span::styled(
                    format!("  {}: {}", name, stored),
                    Style::default().fg(Color::DarkGray),
                )));
            } else {
                let mut spans = vec![Span::styled(
                    format!("  {}: ", name),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )];
                let stored = self.dataset.raw_label(row, *stage);
                for choice in ["-", "Y", "N", "M"] {
                    let selected =
                        choice == stored || (choice == "-" && Label::parse(stored).is_none());
                    let style = if selected {
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Yellow)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    spans.push(Span::styled(format!("[{}]", choice), style));
                    spans.push(Span::raw(" "));
                }
                lines.push(Line::from(spans));
            }
        }

        let para = Paragraph::new(lines);
        frame.render_widget(para, area);
    }

    fn draw_completion(&self, frame: &mut Frame, area: Rect) {
        let name = if self.stage.is_last() {
            FINAL_FILE
        } else {
            INTERIM_FILE
        };
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {} labeling complete", self.stage_name(self.stage)),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("  w: write {}    1-3: switch stage    q: quit", name),
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let left = match &self.status_line {
            Some(msg) => format!(" {}", msg),
            None => " y/n/m: label  enter: next  s: save copy  d: detail".to_string(),
        };
        let right = "1-3: stage  q: quit ";

        let width = area.width as usize;
        let left = util::clip_display(&left, width.saturating_sub(right.len() + 1));
        let padding = width.saturating_sub(util::display_width(&left) + right.len());
        let status = format!("{}{:pad$}{}", left, "", right, pad = padding);

        let para = Paragraph::new(Line::from(vec![Span::styled(
            status,
            Style::default().fg(Color::Black).bg(Color::DarkGray),
        )]))
        .style(Style::default().bg(Color::DarkGray));
        frame.render_widget(para, area);
    }
}

/// Run the interactive review session until the operator quits.
pub fn run(app: ReviewApp) -> Result<(), String> {
    run_app(app)
}

fn run_app(mut app: ReviewApp) -> Result<(), String> {
    terminal::enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {}", e))?;
    stdout()
        .execute(EnterAlternateScreen)
        .map_err(|e| format!("failed to enter alternate screen: {}", e))?;

    struct Cleanup;
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = stdout().execute(LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
    let _cleanup = Cleanup;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("failed to create terminal: {}", e))?;

    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .map_err(|e| format!("draw error: {}", e))?;

        if event::poll(Duration::from_millis(100)).map_err(|e| format!("event poll error: {}", e))?
        {
            if let Event::Key(key) = event::read().map_err(|e| format!("event read error: {}", e))?
            {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::from(KeyCode::Char(c))
    }

    fn enter() -> KeyEvent {
        KeyEvent::from(KeyCode::Enter)
    }

    fn three_unlabeled_rows() -> Dataset {
        let columns = vec!["title".into(), "1차".into(), "2차".into(), "3차".into()];
        let rows = vec![
            vec!["a".into(), String::new(), String::new(), String::new()],
            vec!["b".into(), String::new(), String::new(), String::new()],
            vec!["c".into(), String::new(), String::new(), String::new()],
        ];
        Dataset::new(columns, rows, &Settings::default().label_columns).0
    }

    fn app_with(dataset: Dataset, settings: Settings) -> ReviewApp {
        ReviewApp::new(dataset, settings, PathBuf::from("input.xlsx"))
    }

    #[test]
    fn first_stage_labeling_pass() {
        // Three unset rows, stage 1차: label Y, N, M, advancing each time.
        let mut app = app_with(three_unlabeled_rows(), Settings::default());
        assert_eq!(app.eligible_len(), 3);

        for c in ['y', 'n', 'm'] {
            app.handle_key(key(c));
            app.handle_key(enter());
        }

        assert_eq!(app.position(), 3);
        assert!(app.is_exhausted());
        let stage = Stage::ALL[0];
        let labels: Vec<_> = (0..3).map(|r| app.dataset().raw_label(r, stage)).collect();
        assert_eq!(labels, vec!["Y", "N", "M"]);
    }

    #[test]
    fn relabeling_replaces_but_never_clears() {
        let mut app = app_with(three_unlabeled_rows(), Settings::default());
        app.handle_key(key('y'));
        app.handle_key(key('n'));
        // Not pressing a label key again is the "-" choice: no write.
        assert_eq!(app.dataset().label(0, Stage::ALL[0]), Some(Label::No));
    }

    #[test]
    fn advance_past_end_is_blocked() {
        let mut app = app_with(three_unlabeled_rows(), Settings::default());
        for _ in 0..10 {
            app.handle_key(enter());
        }
        assert_eq!(app.position(), 3);
        assert!(app.is_exhausted());
    }

    #[test]
    fn label_keys_ignored_when_exhausted() {
        let mut app = app_with(three_unlabeled_rows(), Settings::default());
        for _ in 0..3 {
            app.handle_key(enter());
        }
        let before = app.dataset().clone();
        app.handle_key(key('y'));
        assert_eq!(app.dataset().rows(), before.rows());
    }

    #[test]
    fn later_stage_with_empty_working_set_is_complete_immediately() {
        let mut app = app_with(three_unlabeled_rows(), Settings::default());
        app.handle_key(key('2'));
        assert_eq!(app.eligible_len(), 0);
        assert_eq!(app.position(), 0);
        assert!(app.is_exhausted());
    }

    #[test]
    fn stage_switch_resets_cursor_by_default() {
        let mut dataset = three_unlabeled_rows();
        for r in 0..3 {
            dataset.set_label(r, Stage::ALL[0], Label::Yes);
        }
        let mut app = app_with(dataset, Settings::default());
        app.handle_key(enter());
        app.handle_key(enter());
        app.handle_key(key('2'));
        assert_eq!(app.active_stage(), Stage::ALL[1]);
        assert_eq!(app.position(), 0);
    }

    #[test]
    fn stage_switch_keeps_cursor_under_keep_policy() {
        let mut dataset = three_unlabeled_rows();
        for r in 0..3 {
            dataset.set_label(r, Stage::ALL[0], Label::Yes);
        }
        let settings = Settings {
            cursor_on_stage_change: CursorPolicy::Keep,
            ..Settings::default()
        };
        let mut app = app_with(dataset, settings);
        app.handle_key(enter());
        app.handle_key(enter());
        app.handle_key(key('2'));
        // Position index survives; it points at position 2 of the new set.
        assert_eq!(app.position(), 2);
        assert_eq!(app.current_row(), Some(2));
    }

    #[test]
    fn switching_to_the_same_stage_is_a_no_op() {
        let mut app = app_with(three_unlabeled_rows(), Settings::default());
        app.handle_key(enter());
        app.handle_key(key('1'));
        assert_eq!(app.position(), 1);
    }

    #[test]
    fn labeling_writes_to_row_identity_not_position() {
        // Rows 0 and 2 are complete for stage 1; the working set is [0, 2].
        let mut dataset = three_unlabeled_rows();
        dataset.set_label(0, Stage::ALL[0], Label::Yes);
        dataset.set_label(2, Stage::ALL[0], Label::No);
        let mut app = app_with(dataset, Settings::default());
        app.handle_key(key('2'));
        assert_eq!(app.eligible_len(), 2);

        app.handle_key(enter()); // position 1 -> row identity 2
        app.handle_key(key('m'));
        let d = app.dataset();
        assert_eq!(d.label(2, Stage::ALL[1]), Some(Label::Maybe));
        assert_eq!(d.label(1, Stage::ALL[1]), None);
    }

    #[test]
    fn quit_keys() {
        let mut app = app_with(three_unlabeled_rows(), Settings::default());
        app.handle_key(key('q'));
        assert!(app.should_quit());

        let mut app = app_with(three_unlabeled_rows(), Settings::default());
        app.handle_key(KeyEvent::from(KeyCode::Esc));
        assert!(app.should_quit());
    }

    #[test]
    fn export_paths_sit_beside_the_input() {
        let app = ReviewApp::new(
            three_unlabeled_rows(),
            Settings::default(),
            PathBuf::from("/data/docs/input.xlsx"),
        );
        assert_eq!(
            app.export_path(false),
            PathBuf::from("/data/docs").join(INTERIM_FILE)
        );
        assert_eq!(
            app.export_path(true),
            PathBuf::from("/data/docs").join(FINAL_FILE)
        );
    }
}
