//! HelloPad Launcher
//!
//! Full-screen "hello world" demo for handheld devices. Walks the user through
//! mapping their controller on first run, then shows a counter screen and an
//! input visualizer. Keyboard events from the terminal are fed to the core as
//! host input; drawing only reflects the render data the core returns.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
};
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use hellopad_config::HelloPadConfig;
use hellopad_mapper::{App, DebugView, InputHandler, MainView, RenderData, SetupView};

/// Frame interval (~60 Hz)
const TICK_RATE: Duration = Duration::from_millis(16);

/// Host key name for a terminal key code
fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_lowercase().to_string(),
        KeyCode::Enter => "return".to_string(),
        KeyCode::Esc => "escape".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "pageup".to_string(),
        KeyCode::PageDown => "pagedown".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::F(n) => format!("f{}", n),
        _ => return None,
    };
    Some(name)
}

/// Feed a terminal key event to the app
fn handle_key(app: &mut App, key: KeyEvent) {
    let repeat = match key.kind {
        KeyEventKind::Press => false,
        KeyEventKind::Repeat => true,
        KeyEventKind::Release => return,
    };
    if let Some(name) = key_name(key.code) {
        app.on_key(&name, repeat);
    }
}

/// Draw the UI
fn draw_ui(frame: &mut Frame, render: &RenderData) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], render);

    match render {
        RenderData::Setup(view) => draw_setup_view(frame, chunks[1], view),
        RenderData::Main(view) => draw_main_view(frame, chunks[1], view),
        RenderData::Debug(view) => draw_debug_view(frame, chunks[1], view),
    }

    draw_footer(frame, chunks[2], render);
}

/// Draw header
fn draw_header(frame: &mut Frame, area: Rect, render: &RenderData) {
    let title = match render {
        RenderData::Setup(view) => format!("HelloPad - Setup {}/{}", view.step, view.total),
        RenderData::Main(_) => "HelloPad - Hello World".to_string(),
        RenderData::Debug(_) => "HelloPad - Input Debug".to_string(),
    };

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

/// Draw the capture wizard
fn draw_setup_view(frame: &mut Frame, area: Rect, view: &SetupView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let prompt_style = if view.waiting {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let prompt = vec![
        Line::from(Span::styled(view.instruction.as_str(), prompt_style)),
        Line::from(""),
        Line::from(if view.waiting {
            "Waiting for input...".to_string()
        } else {
            format!("Got it! Next in {} ms", view.cooldown_ms)
        }),
    ];
    frame.render_widget(
        Paragraph::new(prompt).block(Block::default().borders(Borders::ALL).title(view.key.as_str())),
        chunks[0],
    );

    let ratio = if view.total == 0 {
        0.0
    } else {
        (view.step.saturating_sub(1)) as f64 / view.total as f64
    };
    let progress = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio.clamp(0.0, 1.0));
    frame.render_widget(progress, chunks[1]);

    let items: Vec<ListItem> = view
        .captured
        .iter()
        .map(|row| {
            ListItem::new(format!(
                "{:<14} {}",
                row.key,
                row.binding.as_deref().unwrap_or("-")
            ))
        })
        .collect();
    frame.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title("Captured")),
        chunks[2],
    );
}

/// Draw the counter screen
fn draw_main_view(frame: &mut Frame, area: Rect, view: &MainView) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Hello World!",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Counter: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(view.counter.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Last button: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(view.last_button.as_deref().unwrap_or("-")),
        ]),
    ];

    if !view.issues.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Mapping issues:",
            Style::default().fg(Color::Red),
        )));
        for issue in &view.issues {
            lines.push(Line::from(format!("• {}", issue)));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Draw the input visualizer
fn draw_debug_view(frame: &mut Frame, area: Rect, view: &DebugView) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let title = if view.complete {
        "Mapping"
    } else {
        "Mapping (incomplete)"
    };
    let bindings: Vec<ListItem> = view
        .bindings
        .iter()
        .map(|row| {
            let style = if row.binding.is_some() {
                Style::default()
            } else {
                Style::default().fg(Color::Red)
            };
            ListItem::new(format!(
                "{:<14} {}",
                row.key,
                row.binding.as_deref().unwrap_or("unmapped")
            ))
            .style(style)
        })
        .collect();
    frame.render_widget(
        List::new(bindings).block(Block::default().borders(Borders::ALL).title(title)),
        chunks[0],
    );

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(chunks[1]);

    let axes: Vec<ListItem> = view
        .axes
        .iter()
        .map(|axis| {
            let style = if axis.active {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(format!("{:?} axis {}: {:+.2}", axis.source, axis.id, axis.value))
                .style(style)
        })
        .collect();
    frame.render_widget(
        List::new(axes).block(Block::default().borders(Borders::ALL).title("Axes")),
        right[0],
    );

    let recent: Vec<ListItem> = view
        .recent
        .iter()
        .map(|entry| {
            ListItem::new(format!(
                "{:>7.2}s {:<24} {}",
                entry.at.as_secs_f32(),
                entry.description,
                entry.button.as_deref().unwrap_or("")
            ))
        })
        .collect();
    frame.render_widget(
        List::new(recent).block(Block::default().borders(Borders::ALL).title("Recent input")),
        right[1],
    );
}

/// Draw footer
fn draw_footer(frame: &mut Frame, area: Rect, render: &RenderData) {
    let (help_text, status) = match render {
        RenderData::Setup(view) if view.remapping => ("[Esc] Cancel remap", ""),
        RenderData::Setup(_) => ("[Esc] Quit", ""),
        RenderData::Main(view) => (
            "[A] +1  [B] Reset  [Start] Debug  [Select] Remap  [Menu] Quit",
            view.status.as_str(),
        ),
        RenderData::Debug(_) => ("[Start/B] Back  [Select] Remap  [Menu] Quit", ""),
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));

    let status = Paragraph::new(status)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, chunks[0]);
    frame.render_widget(status, chunks[1]);
}

/// Open the log for appending so earlier sessions are kept
fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Setup logging to a file, since stdout belongs to the TUI
fn setup_logging(config: &HelloPadConfig) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let log_path = &config.paths.log_file;
    match open_log_file(log_path) {
        Ok(file) => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init(),
        Err(e) => {
            eprintln!("Cannot open log file {}: {}", log_path.display(), e);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::sink))
                .init();
        }
    }
}

fn main() -> Result<()> {
    let config = HelloPadConfig::load_default()?;

    // Setup logging
    setup_logging(&config);

    info!("HelloPad starting...");

    let mut app = App::new(&config, Box::new(config.mapping_file()));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let mut last_tick = Instant::now();

    let result = loop {
        let render = app.render();
        if let Err(e) = terminal.draw(|f| draw_ui(f, &render)) {
            break Err(e);
        }

        let timeout = TICK_RATE
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        match event::poll(timeout) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => handle_key(&mut app, key),
                Ok(_) => {}
                Err(e) => break Err(e),
            },
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= TICK_RATE {
            app.tick(elapsed);
            last_tick = Instant::now();
        }

        if app.should_quit() {
            break Ok(());
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        warn!("Terminal error: {}", e);
    }

    info!("HelloPad exiting");
    result?;
    Ok(())
}
