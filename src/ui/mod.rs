// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal preview for Lyra.
//!
//! Shows a song laid out in columns the way the current template would
//! place it, with a status bar and a help overlay. Template edits arrive
//! from the file watcher; keys tweak the template in memory.

mod columns;
mod status;

pub use columns::{ColumnsWidget, GridGeometry};
pub use status::StatusWidget;

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tracing::{debug, info, warn};

use crate::layout::{ColumnContent, LayoutSession};
use crate::song::ParsedSong;
use crate::template::{Template, TemplateEvent, TemplateWatcher, MAX_COLUMNS};

/// Largest transposition, in semitones either way
const MAX_TRANSPOSE: i8 = 11;

/// Preview state: the song, the live template and display flags
#[derive(Debug, Clone)]
pub struct UiState {
    /// Song being previewed
    pub song: ParsedSong,
    /// Template in effect (file contents plus key tweaks)
    pub template: Template,
    /// Help text visible
    pub show_help: bool,
    /// First visible row
    pub scroll: u16,
    /// Status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
}

impl UiState {
    /// Create preview state for a song
    pub fn new(song: ParsedSong, template: Template) -> Self {
        Self {
            song,
            template,
            show_help: false,
            scroll: 0,
            status_message: None,
            status_time: None,
        }
    }

    /// Set a status message that will be displayed temporarily
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_time = Some(Instant::now());
    }

    /// Clear expired status message
    pub fn clear_expired_status(&mut self) {
        if let Some(time) = self.status_time {
            if time.elapsed() > Duration::from_secs(3) {
                self.status_message = None;
                self.status_time = None;
            }
        }
    }

    /// Apply a key action to the state
    pub fn apply(&mut self, action: &KeyAction) {
        let template = &mut self.template;
        match action {
            KeyAction::ColumnsUp | KeyAction::ColumnsDown => {
                let count = if *action == KeyAction::ColumnsUp {
                    (template.column_count + 1).min(MAX_COLUMNS)
                } else {
                    template.column_count.saturating_sub(1).max(1)
                };
                if count != template.column_count {
                    template.column_count = count;
                    // configured ratios no longer match the column count
                    template.column_width_ratios = None;
                }
                let message = format!("Columns: {}", template.column_count);
                self.set_status(message);
            }
            KeyAction::ToggleStrategy => {
                template.column_balancing_strategy = template.column_balancing_strategy.toggled();
                let message = format!("Balancing: {}", template.column_balancing_strategy.name());
                self.set_status(message);
            }
            KeyAction::CycleStyle => {
                template.chord_positioning_style = template.chord_positioning_style.next();
                let message = format!("Chords: {}", template.chord_positioning_style.name());
                self.set_status(message);
            }
            KeyAction::CycleAlignment => {
                template.chord_alignment = template.chord_alignment.next();
                let message = format!("Alignment: {:?}", template.chord_alignment);
                self.set_status(message);
            }
            KeyAction::TransposeUp | KeyAction::TransposeDown => {
                let step = if *action == KeyAction::TransposeUp { 1 } else { -1 };
                template.transpose = (template.transpose + step).clamp(-MAX_TRANSPOSE, MAX_TRANSPOSE);
                let message = format!("Transpose: {:+}", template.transpose);
                self.set_status(message);
            }
            KeyAction::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            KeyAction::ScrollDown => self.scroll = self.scroll.saturating_add(1),
            KeyAction::ToggleHelp => self.show_help = !self.show_help,
            KeyAction::Quit | KeyAction::None => {}
        }
    }

    /// Apply an event from the template watcher
    pub fn apply_template_event(&mut self, event: TemplateEvent) {
        match event {
            TemplateEvent::Reloaded(template) => {
                info!(name = %template.name, "applying reloaded template");
                self.set_status(format!("Template reloaded: {}", template.name));
                self.template = *template;
            }
            TemplateEvent::Error(message) => {
                warn!(error = %message, "keeping previous template");
                self.set_status(message);
            }
            TemplateEvent::FileCreated(path) => {
                debug!(path = ?path, "template file created");
            }
            TemplateEvent::FileDeleted(path) => {
                self.set_status(format!("Template file removed: {}", path.display()));
            }
        }
    }
}

/// Key event result
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    /// No action needed
    None,
    /// Quit the application
    Quit,
    /// One more column
    ColumnsUp,
    /// One fewer column
    ColumnsDown,
    /// Switch between equal-count and equal-height
    ToggleStrategy,
    /// Next chord positioning style
    CycleStyle,
    /// Next alignment
    CycleAlignment,
    /// Transpose up a semitone
    TransposeUp,
    /// Transpose down a semitone
    TransposeDown,
    ScrollUp,
    ScrollDown,
    /// Toggle help
    ToggleHelp,
}

/// Map a key press to an action
pub fn map_key(code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
    match (code, modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            KeyAction::Quit
        }

        // '+' arrives with SHIFT on most layouts
        (KeyCode::Char('+') | KeyCode::Char('='), _) => KeyAction::ColumnsUp,
        (KeyCode::Char('-'), _) => KeyAction::ColumnsDown,

        (KeyCode::Char('b'), KeyModifiers::NONE) => KeyAction::ToggleStrategy,
        (KeyCode::Char('s'), KeyModifiers::NONE) => KeyAction::CycleStyle,
        (KeyCode::Char('a'), KeyModifiers::NONE) => KeyAction::CycleAlignment,

        (KeyCode::Char('t'), KeyModifiers::NONE) => KeyAction::TransposeUp,
        (KeyCode::Char('T'), _) => KeyAction::TransposeDown,

        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::ScrollUp,
        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::ScrollDown,

        (KeyCode::Char('?'), _) | (KeyCode::Char('h'), KeyModifiers::NONE) => KeyAction::ToggleHelp,

        _ => KeyAction::None,
    }
}

/// Terminal UI application
pub struct App {
    state: UiState,
    session: LayoutSession,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Target frame rate
    frame_rate: u32,
    running: bool,
}

impl App {
    /// Take over the terminal and create the preview
    pub fn new(state: UiState, session: LayoutSession) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            state,
            session,
            terminal,
            frame_rate: 30,
            running: true,
        })
    }

    /// Current preview state
    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Set frame rate
    pub fn set_frame_rate(&mut self, fps: u32) {
        self.frame_rate = fps.clamp(1, 120);
    }

    /// Check if running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the app
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Handle a key event
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
        let action = map_key(code, modifiers);
        if action == KeyAction::Quit {
            self.quit();
        }
        self.state.apply(&action);
        action
    }

    /// Poll for events with timeout
    pub fn poll_event(&self) -> io::Result<Option<Event>> {
        let timeout = Duration::from_millis(1000 / self.frame_rate as u64);
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    /// Run until the user quits, applying template reloads as they arrive
    pub fn run(&mut self, watcher: Option<&TemplateWatcher>) -> Result<()> {
        while self.running {
            if let Some(watcher) = watcher {
                for event in watcher.recv_all() {
                    self.state.apply_template_event(event);
                }
            }
            self.state.clear_expired_status();
            self.draw()?;

            match self.poll_event()? {
                Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    self.handle_key(key.code, key.modifiers);
                }
                // resizes are picked up by the next draw
                _ => {}
            }
        }
        Ok(())
    }

    /// Draw the UI
    pub fn draw(&mut self) -> io::Result<()> {
        let size = self.terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        let chunks = main_layout(area);
        let geometry = GridGeometry::new(&self.state.template, chunks[0].width);

        if let Err(e) =
            self.session
                .update_song(&self.state.song, &self.state.template, geometry.pixel_width())
        {
            warn!(error = %e, "layout failed");
            self.state.set_status(format!("Layout error: {}", e));
        }

        let state = &self.state;
        let columns = self.session.columns();
        self.terminal.draw(|frame| {
            render_preview(frame, state, columns, geometry);
        })?;
        Ok(())
    }

    /// Cleanup terminal on drop
    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Columns area on top, status line at the bottom
fn main_layout(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Columns
            Constraint::Length(1), // Status bar
        ])
        .split(area)
}

/// Draw one frame of the preview
pub fn render_preview(frame: &mut Frame, state: &UiState, columns: &[ColumnContent], geometry: GridGeometry) {
    let area = frame.area();
    let chunks = main_layout(area);

    frame.render_widget(
        ColumnsWidget::new(columns, &state.template, geometry).scroll(state.scroll),
        chunks[0],
    );
    frame.render_widget(StatusWidget::new(state), chunks[1]);

    if state.show_help {
        render_help_overlay(frame, area);
    }
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 44.min(area.width.saturating_sub(4));
    let height = 16.min(area.height.saturating_sub(2));
    let x = (area.width - width) / 2;
    let y = (area.height - height) / 2;
    let help_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let heading = Style::default().add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(Span::styled("Layout", heading)),
        Line::from("  +/-         More/fewer columns"),
        Line::from("  b           Toggle balancing"),
        Line::from("  s           Cycle chord style"),
        Line::from("  a           Cycle alignment"),
        Line::from(""),
        Line::from(Span::styled("Chords", heading)),
        Line::from("  t/T         Transpose up/down"),
        Line::from(""),
        Line::from(Span::styled("Other", heading)),
        Line::from("  Up/Down     Scroll"),
        Line::from("  h/?         Toggle help"),
        Line::from("  q/Ctrl+c    Quit"),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::{SongLine, SongSection};
    use crate::template::{ChordAlignment, ChordPositioningStyle, ColumnBalancingStrategy};
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;

    fn state() -> UiState {
        let song = ParsedSong::new(vec![
            SongSection::new("Verse", vec![SongLine::lyrics("one")]),
            SongSection::new("Chorus", vec![SongLine::lyrics("two")]),
        ]);
        UiState::new(song, Template::default())
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_key(KeyCode::Char('q'), KeyModifiers::NONE), KeyAction::Quit);
        assert_eq!(map_key(KeyCode::Char('c'), KeyModifiers::CONTROL), KeyAction::Quit);
        assert_eq!(map_key(KeyCode::Char('+'), KeyModifiers::SHIFT), KeyAction::ColumnsUp);
        assert_eq!(map_key(KeyCode::Char('-'), KeyModifiers::NONE), KeyAction::ColumnsDown);
        assert_eq!(map_key(KeyCode::Char('b'), KeyModifiers::NONE), KeyAction::ToggleStrategy);
        assert_eq!(map_key(KeyCode::Char('s'), KeyModifiers::NONE), KeyAction::CycleStyle);
        assert_eq!(map_key(KeyCode::Char('a'), KeyModifiers::NONE), KeyAction::CycleAlignment);
        assert_eq!(map_key(KeyCode::Char('t'), KeyModifiers::NONE), KeyAction::TransposeUp);
        assert_eq!(map_key(KeyCode::Char('T'), KeyModifiers::SHIFT), KeyAction::TransposeDown);
        assert_eq!(map_key(KeyCode::Char('?'), KeyModifiers::SHIFT), KeyAction::ToggleHelp);
        assert_eq!(map_key(KeyCode::Char('x'), KeyModifiers::NONE), KeyAction::None);
    }

    #[test]
    fn test_column_count_bounds() {
        let mut state = state();
        state.apply(&KeyAction::ColumnsDown);
        assert_eq!(state.template.column_count, 1);

        for _ in 0..10 {
            state.apply(&KeyAction::ColumnsUp);
        }
        assert_eq!(state.template.column_count, MAX_COLUMNS);
        assert_eq!(state.status_message, Some(format!("Columns: {}", MAX_COLUMNS)));
    }

    #[test]
    fn test_column_change_drops_ratios() {
        let mut state = state();
        state.template.column_count = 2;
        state.template.column_width_ratios = Some(vec![2.0, 1.0]);
        state.apply(&KeyAction::ColumnsUp);
        assert_eq!(state.template.column_width_ratios, None);
        assert!(state.template.validate().is_ok());
    }

    #[test]
    fn test_template_tweaks() {
        let mut state = state();
        state.apply(&KeyAction::ToggleStrategy);
        assert_eq!(
            state.template.column_balancing_strategy,
            ColumnBalancingStrategy::EqualHeight
        );
        state.apply(&KeyAction::CycleStyle);
        assert_ne!(
            state.template.chord_positioning_style,
            ChordPositioningStyle::ChordsOverLyrics
        );
        state.apply(&KeyAction::CycleAlignment);
        assert_eq!(state.template.chord_alignment, ChordAlignment::Centered);
    }

    #[test]
    fn test_transpose_clamped() {
        let mut state = state();
        state.apply(&KeyAction::TransposeDown);
        assert_eq!(state.template.transpose, -1);
        for _ in 0..20 {
            state.apply(&KeyAction::TransposeUp);
        }
        assert_eq!(state.template.transpose, MAX_TRANSPOSE);
    }

    #[test]
    fn test_help_and_scroll() {
        let mut state = state();
        state.apply(&KeyAction::ToggleHelp);
        assert!(state.show_help);
        state.apply(&KeyAction::ScrollUp);
        assert_eq!(state.scroll, 0);
        state.apply(&KeyAction::ScrollDown);
        assert_eq!(state.scroll, 1);
    }

    #[test]
    fn test_template_events() {
        let mut state = state();
        let reloaded = Template::two_column();
        state.apply_template_event(TemplateEvent::Reloaded(Box::new(reloaded.clone())));
        assert_eq!(state.template, reloaded);

        state.apply_template_event(TemplateEvent::Error("bad yaml".to_string()));
        assert_eq!(state.template, reloaded);
        assert_eq!(state.status_message, Some("bad yaml".to_string()));

        state.apply_template_event(TemplateEvent::FileDeleted(PathBuf::from("t.yaml")));
        assert_eq!(state.template, reloaded);
    }

    #[test]
    fn test_render_preview_frame() {
        let mut state = state();
        state.template.column_count = 2;
        let mut session = LayoutSession::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        let geometry = GridGeometry::new(&state.template, 60);

        session
            .update_song(&state.song, &state.template, geometry.pixel_width())
            .unwrap();
        state.show_help = true;
        terminal
            .draw(|frame| render_preview(frame, &state, session.columns(), geometry))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let top: String = buffer.content[..60].iter().map(|cell| cell.symbol()).collect();
        assert!(top.starts_with("Verse"));
        assert!(top.contains("Chorus"));
    }
}
