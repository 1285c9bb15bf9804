//! Interactive terminal grid.
//!
//! The terminal renders a [`MemorySurface`]; mouse drags drive the selection
//! tracker, a click (press and release on one cell) also gives that cell
//! edit focus, and typed characters go into the focused cell's text.

use std::io::stdout;
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use gridsync_core::GridAddress;
use gridsync_interact::{
    Action, ActiveElement, Clock, GridSession, Highlight, Key, KeyEvent, MemorySurface, Modifiers,
    Panel, RealClock, Surface,
};
use gridsync_protocol::RemoteSession;

use crate::replay::pass_through;

/// Width of the row-number gutter, including its trailing space.
const GUTTER: u16 = 5;
/// Width of one cell, including its trailing space.
const CELL_WIDTH: u16 = 10;
/// How long to wait for input before running a scheduler tick.
const POLL: Duration = Duration::from_millis(10);

type Session = GridSession<MemorySurface, Box<dyn RemoteSession>>;

struct GridApp {
    session: Session,
    clock: RealClock,
    label: String,
    /// Where the grid was last drawn, for mouse hit testing.
    grid_area: Rect,
    pressed: Option<GridAddress>,
    last_drag: Option<GridAddress>,
    last_action: Option<Action>,
    should_quit: bool,
}

/// Spreadsheet-style column label (A, B, ..., Z, AA, ...).
fn col_label(mut col: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

fn fit(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{:<width$}", truncated, width = width)
}

fn convert_key(key: event::KeyEvent) -> KeyEvent {
    let code = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        other => Key::Other(format!("{:?}", other)),
    };
    KeyEvent::new(
        code,
        Modifiers {
            control: key.modifiers.contains(KeyModifiers::CONTROL),
            alt: key.modifiers.contains(KeyModifiers::ALT),
            shift: key.modifiers.contains(KeyModifiers::SHIFT),
            platform: key.modifiers.contains(KeyModifiers::SUPER),
        },
    )
}

impl GridApp {
    fn new(session: Session, label: String) -> Self {
        Self {
            session,
            clock: RealClock,
            label,
            grid_area: Rect::default(),
            pressed: None,
            last_drag: None,
            last_action: None,
            should_quit: false,
        }
    }

    fn visible_cols(&self, area: Rect) -> usize {
        (area.width.saturating_sub(GUTTER) / CELL_WIDTH) as usize
    }

    /// Grid address under a terminal position.
    fn hit_test(&self, x: u16, y: u16) -> Option<GridAddress> {
        let area = self.grid_area;
        if x < area.x || y < area.y || x >= area.x + area.width || y >= area.y + area.height {
            return None;
        }
        let rel_x = x - area.x;
        let rel_y = y - area.y;
        let view = self.session.surface().view();
        let bounds = self.session.surface().bounds();

        let col = if rel_x < GUTTER {
            None
        } else {
            let c = view.origin_col + ((rel_x - GUTTER) / CELL_WIDTH) as usize;
            (c < bounds.cols).then_some(c)
        };
        if rel_y == 0 {
            return col.map(GridAddress::col_header);
        }
        let row = view.origin_row + (rel_y - 1) as usize;
        if row >= bounds.rows {
            return None;
        }
        match col {
            None if rel_x < GUTTER => Some(GridAddress::row_header(row)),
            None => None,
            Some(c) => Some(GridAddress::cell(row, c)),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let hit = self.hit_test(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(addr) = hit {
                    self.pressed = Some(addr);
                    self.last_drag = Some(addr);
                    let _ = self.session.pointer_down(addr);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(addr) = hit {
                    if self.last_drag != Some(addr) {
                        self.last_drag = Some(addr);
                        let _ = self.session.pointer_move(addr);
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                match hit.or(self.last_drag) {
                    Some(addr) => {
                        let _ = self.session.pointer_up(addr);
                        if self.pressed == Some(addr) && addr.is_cell() {
                            let _ = self.session.click(addr);
                        }
                    }
                    None => {
                        let _ = self.session.pointer_cancel();
                    }
                }
                self.pressed = None;
                self.last_drag = None;
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: event::KeyEvent) {
        let event = convert_key(key);
        let context = self.session.focus_context();
        let action = self.session.handle_key(&event);
        if action != Action::Ignore {
            self.last_action = Some(action);
            return;
        }
        let editing = self.session.surface().active_element() != ActiveElement::None;
        if event.key == Key::Char('q') && event.modifiers == Modifiers::none() && !editing {
            self.should_quit = true;
            return;
        }
        pass_through(self.session.surface_mut(), context, &event);
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

        self.grid_area = chunks[1];
        self.draw_title(frame, chunks[0]);
        self.draw_grid(frame, chunks[1]);
        self.draw_status(frame, chunks[2]);

        if self.session.surface().view().open_panel == Some(Panel::Help) {
            self.draw_help(frame, area);
        }
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let bounds = self.session.surface().bounds();
        let title = format!(
            " gridsync: {} | {} rows x {} cols ",
            self.label, bounds.rows, bounds.cols
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

    fn cell_style(&self, addr: GridAddress) -> Style {
        let surface = self.session.surface();
        if surface.has_highlight(addr, Highlight::EditingCurrent) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if surface.has_highlight(addr, Highlight::TrialSelection) {
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::UNDERLINED)
        } else if surface.has_highlight(addr, Highlight::Selected) {
            Style::default().fg(Color::White).bg(Color::Blue)
        } else {
            Style::default().fg(Color::Gray)
        }
    }

    fn draw_grid(&self, frame: &mut Frame, area: Rect) {
        let surface = self.session.surface();
        let bounds = surface.bounds();
        let view = surface.view();

        let end_col = (view.origin_col + self.visible_cols(area)).min(bounds.cols);
        let visible_rows = area.height.saturating_sub(1) as usize;
        let end_row = (view.origin_row + visible_rows).min(bounds.rows);
        let cell_w = (CELL_WIDTH - 1) as usize;

        let header_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let mut header = vec![Span::raw(" ".repeat(GUTTER as usize))];
        for c in view.origin_col..end_col {
            header.push(Span::styled(format!("{:^cell_w$} ", col_label(c)), header_style));
        }

        let mut lines: Vec<Line> = Vec::with_capacity(visible_rows + 1);
        lines.push(Line::from(header));

        for r in view.origin_row..end_row {
            let mut spans = vec![Span::styled(
                format!("{:>width$} ", r + 1, width = (GUTTER - 1) as usize),
                Style::default().fg(Color::DarkGray),
            )];
            for c in view.origin_col..end_col {
                let addr = GridAddress::cell(r, c);
                spans.push(Span::styled(fit(surface.text(addr), cell_w), self.cell_style(addr)));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let focus = match self.session.focus().focused() {
            Some(addr) => format!("{}{}", col_label(addr.col.max(0) as usize), addr.row + 1),
            None => "-".to_string(),
        };
        let selection = match self.session.selection().confirmed() {
            Some(rect) => {
                let n = rect.normalized();
                format!("({}, {})..({}, {})", n.start_row, n.start_col, n.end_row, n.end_col)
            }
            None => "-".to_string(),
        };
        let stats = self.session.stats();
        let action = self
            .last_action
            .map(|a| format!("{:?}", a))
            .unwrap_or_default();

        let left = format!(" focus: {}  selection: {}  {}", focus, selection, action);
        let right = format!(
            "calls {} failed {}  Ctrl+0: help  q: quit ",
            stats.remote_calls, stats.remote_failures
        );
        let padding = (area.width as usize)
            .saturating_sub(left.chars().count() + right.chars().count());
        let status = format!("{}{:pad$}{}", left, "", right, pad = padding);

        let para = Paragraph::new(Line::from(vec![Span::styled(
            status,
            Style::default().fg(Color::Black).bg(Color::DarkGray),
        )]))
        .style(Style::default().bg(Color::DarkGray));
        frame.render_widget(para, area);
    }

    fn draw_help(&self, frame: &mut Frame, area: Rect) {
        let help_lines = [
            "",
            "  Mouse",
            "  -----",
            "  drag              Select cells / rows / cols",
            "  click             Select and edit a cell",
            "",
            "  Keys",
            "  ----",
            "  arrows            Pan",
            "  Shift+arrows      Extend selection",
            "  Enter / Shift+Enter  Next / previous row",
            "  Esc               Stop editing",
            "  Ctrl+X/C/V        Cut / copy / paste",
            "  Ctrl+M/N          Move forward / backward",
            "  Ctrl+I, Ctrl+L    Insert, insert rows",
            "  Ctrl+Shift+L      Insert columns",
            "  Ctrl+Delete       Delete",
            "  Ctrl+H            Jump home",
            "  Ctrl+0            Toggle this help",
            "  q                 Quit",
            "",
        ];
        let help_width: u16 = 48;
        let help_height: u16 = help_lines.len() as u16 + 2;

        let x = area.width.saturating_sub(help_width) / 2;
        let y = area.height.saturating_sub(help_height) / 2;
        let popup = Rect::new(
            area.x + x,
            area.y + y,
            help_width.min(area.width),
            help_height.min(area.height),
        );

        let lines: Vec<Line> = help_lines
            .iter()
            .map(|s| Line::from(Span::styled(*s, Style::default().fg(Color::White))))
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Keybindings ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(Color::Black));

        frame.render_widget(Clear, popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }
}

/// Run the interactive grid until the user quits. Pending syncs are flushed
/// before returning.
pub fn run(session: Session, label: String) -> Result<(), String> {
    let mut app = GridApp::new(session, label);

    terminal::enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {}", e))?;
    stdout()
        .execute(EnterAlternateScreen)
        .map_err(|e| format!("failed to enter alternate screen: {}", e))?;
    stdout()
        .execute(EnableMouseCapture)
        .map_err(|e| format!("failed to enable mouse capture: {}", e))?;

    struct Cleanup;
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = stdout().execute(DisableMouseCapture);
            let _ = stdout().execute(LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
    let _cleanup = Cleanup;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("failed to create terminal: {}", e))?;

    while !app.should_quit {
        terminal
            .draw(|frame| app.draw(frame))
            .map_err(|e| format!("draw error: {}", e))?;

        if event::poll(POLL).map_err(|e| format!("event poll error: {}", e))? {
            match event::read().map_err(|e| format!("event read error: {}", e))? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        let now = app.clock.now();
        app.session.pump(now);
    }

    app.session.flush();
    Ok(())
}
