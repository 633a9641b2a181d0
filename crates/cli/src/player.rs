//! Terminal story pager
//!
//! Renders one progress bar per story and maps keys onto pager signals.
//! Playback itself runs in the engine session; this module only performs
//! the UI commands it emits.

use anyhow::{Context, Result};
use console::{style, Term};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use storyreel_config::{LikeStore, PlaybackConfig};
use storyreel_core::{Haptics, NoHaptics};
use storyreel_engine::{
    Feature, PagerDriver, PagerHost, PagerSignals, PlaybackState, Session, StoryAction, StoryFeature,
    UiCommand,
};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::time::{Instant, MissedTickBehavior};

const KEY_POLL_INTERVAL: Duration = Duration::from_millis(50);
const MIN_BAR_WIDTH: usize = 3;

/// Pager host that records what the terminal should show
#[derive(Debug, Default)]
pub struct TerminalPager {
    page: AtomicUsize,
    dismissed: AtomicBool,
}

impl TerminalPager {
    pub fn new(page: usize) -> Self {
        Self {
            page: AtomicUsize::new(page),
            dismissed: AtomicBool::new(false),
        }
    }

    pub fn page(&self) -> usize {
        self.page.load(Ordering::SeqCst)
    }

    pub fn is_dismissed(&self) -> bool {
        self.dismissed.load(Ordering::SeqCst)
    }
}

impl PagerHost for TerminalPager {
    fn scroll_to(&self, index: usize, animated: bool) {
        log::debug!("Showing story {} (animated: {})", index, animated);
        self.page.store(index, Ordering::SeqCst);
    }

    fn dismiss(&self) {
        self.dismissed.store(true, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerInput {
    Next,
    Previous,
    TogglePause,
    ToggleLike,
    Restart,
    Quit,
}

fn map_key(key: KeyEvent) -> Option<PlayerInput> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(PlayerInput::Quit);
    }
    match key.code {
        KeyCode::Right | KeyCode::Enter | KeyCode::Char('l') => Some(PlayerInput::Next),
        KeyCode::Left | KeyCode::Char('h') => Some(PlayerInput::Previous),
        KeyCode::Char(' ') => Some(PlayerInput::TogglePause),
        KeyCode::Char('f') => Some(PlayerInput::ToggleLike),
        KeyCode::Char('r') => Some(PlayerInput::Restart),
        KeyCode::Char('q') | KeyCode::Esc => Some(PlayerInput::Quit),
        _ => None,
    }
}

/// Restores the terminal however playback ends
struct RawModeGuard {
    term: Term,
}

impl RawModeGuard {
    fn enable(term: Term) -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw terminal mode")?;
        if term.hide_cursor().is_err() {
            log::warn!("Failed to hide cursor");
        }
        Ok(Self { term })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = self.term.show_cursor();
        let _ = disable_raw_mode();
    }
}

pub async fn start_playback(
    feature: StoryFeature,
    start: usize,
    mut likes: LikeStore,
    playback: &PlaybackConfig,
    title: &str,
) -> Result<()> {
    let term = Term::stdout();
    let interactive = term.is_term();

    let start = opening_page(&feature, start);
    let session = Session::spawn(feature);
    let host = Arc::new(TerminalPager::new(start));
    let haptics: Arc<dyn Haptics> = Arc::new(NoHaptics);
    let mut driver = PagerDriver::new(session.clone(), Arc::clone(&host), Arc::clone(&haptics))
        .with_scroll_animation(playback.scroll_animation());
    let signals = driver.signals();

    let (key_tx, mut key_rx) = mpsc::unbounded_channel();
    let stop_keys = Arc::new(AtomicBool::new(false));
    let guard = if interactive {
        let guard = RawModeGuard::enable(term.clone())?;
        spawn_key_reader(key_tx, Arc::clone(&stop_keys));
        Some(guard)
    } else {
        drop(key_tx);
        None
    };

    session.send(StoryAction::Begin { index: start })?;

    let mut ticker = tokio::time::interval(playback.tick());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut drawn_lines = 0;
    let mut last_page = None;

    let result: Result<()> = loop {
        tokio::select! {
            command = driver.next_command() => {
                let Some(command) = command else { break Ok(()) };
                if let Err(e) = driver.handle_command(command).await {
                    break Err(e.into());
                }
                if command == UiCommand::Finish {
                    break Ok(());
                }
            }
            _ = ticker.tick() => {
                let state = session.state();
                if interactive {
                    let frame = render_frame(
                        &state,
                        Instant::now(),
                        title,
                        host.page(),
                        &likes,
                        term_width(&term),
                    );
                    drawn_lines = match redraw(&term, drawn_lines, &frame) {
                        Ok(lines) => lines,
                        Err(e) => break Err(e),
                    };
                } else if last_page != Some(host.page()) {
                    last_page = Some(host.page());
                    println!("{}", story_line(&state, host.page(), &likes));
                }
            }
            Some(key) = key_rx.recv() => {
                let outcome = match map_key(key) {
                    Some(PlayerInput::Quit) => {
                        host.dismiss();
                        Ok(())
                    }
                    Some(PlayerInput::ToggleLike) => {
                        toggle_like(&mut likes, &session.state(), haptics.as_ref()).map(|_| ())
                    }
                    Some(input) => apply_input(input, &signals),
                    None => Ok(()),
                };
                if let Err(e) = outcome {
                    break Err(e);
                }
            }
        }

        if host.is_dismissed() {
            break Ok(());
        }
    };

    stop_keys.store(true, Ordering::SeqCst);
    drop(guard);
    if interactive {
        println!();
    }
    log::info!("Left story pager on story {}", host.page());
    result
}

/// Page the pager opens on
///
/// `Begin` clamps the start index without emitting a scroll, so the host has
/// to start out on the clamped page itself.
fn opening_page(feature: &StoryFeature, start: usize) -> usize {
    feature.initial_state().clamp_index(start)
}

/// Flips the like of the current story; returns the new flag, if any story
/// is showing
fn toggle_like(
    likes: &mut LikeStore,
    state: &PlaybackState,
    haptics: &dyn Haptics,
) -> Result<Option<bool>> {
    let Some(item) = state.current_item() else {
        return Ok(None);
    };
    let liked = likes
        .toggle(item.story.id)
        .with_context(|| format!("Failed to save like for story {}", item.story.id))?;
    haptics.trigger();
    Ok(Some(liked))
}

fn apply_input(input: PlayerInput, signals: &PagerSignals) -> Result<()> {
    let session = signals.session();
    match input {
        PlayerInput::Next => signals.tap()?,
        PlayerInput::Previous => {
            let index = session.state().index();
            if index > 0 {
                signals.page_changed(index - 1)?;
            }
        }
        PlayerInput::TogglePause => signals.dragging(!signals.is_dragging())?,
        PlayerInput::Restart => session.send(StoryAction::ResetAndPlay)?,
        PlayerInput::ToggleLike | PlayerInput::Quit => {}
    }
    Ok(())
}

/// Polls crossterm for key presses until `stop` is set
fn spawn_key_reader(tx: UnboundedSender<KeyEvent>, stop: Arc<AtomicBool>) {
    tokio::task::spawn_blocking(move || {
        while !stop.load(Ordering::SeqCst) {
            match event::poll(KEY_POLL_INTERVAL) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if tx.send(key).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        log::warn!("Failed to read key: {}", e);
                        break;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    log::warn!("Failed to poll keys: {}", e);
                    break;
                }
            }
        }
    });
}

fn term_width(term: &Term) -> usize {
    usize::from(term.size().1).max(20)
}

/// Replaces the previous frame; returns the number of lines now on screen
fn redraw(term: &Term, previous_lines: usize, frame: &[String]) -> Result<usize> {
    term.clear_last_lines(previous_lines)
        .context("Failed to clear frame")?;
    for line in frame {
        // raw mode needs the explicit carriage return
        term.write_str(&format!("{}\r\n", line))
            .context("Failed to draw frame")?;
    }
    Ok(frame.len())
}

fn render_frame(
    state: &PlaybackState,
    now: Instant,
    title: &str,
    page: usize,
    likes: &LikeStore,
    width: usize,
) -> Vec<String> {
    let count = state.items().len().max(1);
    let bar_width = (width.saturating_sub(count + 3) / count).max(MIN_BAR_WIDTH);
    let bars: Vec<String> = state
        .segment_fills(now)
        .into_iter()
        .map(|fill| render_bar(fill, bar_width))
        .collect();

    let mut status = story_line(state, page, likes);
    if state.is_paused() {
        status.push_str(&format!("  {}", style("paused").yellow()));
    } else {
        status.push_str(&format!(
            "  {}",
            style(format!("{:.1}s", state.remaining(now).as_secs_f64())).dim()
        ));
    }

    vec![
        format!("  {}", style(title).bold().cyan()),
        format!("  {}", bars.join(" ")),
        status,
        format!(
            "  {}",
            style("→ next  ← previous  space pause  f like  r restart  q quit").dim()
        ),
    ]
}

fn story_line(state: &PlaybackState, page: usize, likes: &LikeStore) -> String {
    let Some(item) = state.items().get(page) else {
        return format!("  {}/{}", page + 1, state.items().len());
    };
    let mut line = format!(
        "  {}/{} {}",
        page + 1,
        state.items().len(),
        style(&item.story.name).bold()
    );
    if likes.is_liked(item.story.id) {
        line.push_str(&format!(" {}", style("★").yellow()));
    }
    line
}

fn render_bar(fill: f64, width: usize) -> String {
    let filled = ((fill.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("{}{}", "━".repeat(filled), "─".repeat(width - filled))
}
