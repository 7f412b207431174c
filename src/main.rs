mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal,
    ExecutableCommand,
};
use log::info;
use rand::thread_rng;

use space_invaders::compute::{
    init_state, move_player_left, move_player_right, player_fire, restart, set_difficulty,
    stop_player, tick, toggle_help,
};
use space_invaders::entities::Difficulty;
use space_invaders::scores::HighScores;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// A key is considered "held" if its last press/repeat event arrived
/// within this many frames.  Covers terminals that don't emit
/// key-release events: the OS key-repeat rate keeps refreshing the
/// window before it expires.
const HOLD_WINDOW: u64 = 6;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn high_score_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".space_invaders_scores.json")
}

fn player_name() -> String {
    std::env::var("USER").unwrap_or_else(|_| "player".to_string())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: instead of acting on each key event individually, we
/// maintain a `key_frame` map that records the frame number of the
/// last press/repeat event for every key.  Each frame we check which
/// keys are still "fresh" (within `HOLD_WINDOW` frames) and apply all
/// their effects simultaneously, so move + fire can be held together.
fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    let mut scores = HighScores::load(high_score_path());
    let mut state = init_state(Difficulty::Normal, scores.best());
    let mut rng = thread_rng();

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut score_recorded = false;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            match kind {
                // Press: record key + handle one-shot actions
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(());
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') => {
                            state = toggle_help(&state);
                        }
                        KeyCode::Char('1') => state = set_difficulty(&state, Difficulty::Easy),
                        KeyCode::Char('2') => state = set_difficulty(&state, Difficulty::Normal),
                        KeyCode::Char('3') => state = set_difficulty(&state, Difficulty::Hard),
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if state.game_over || state.game_won =>
                        {
                            state = restart(&state);
                            score_recorded = false;
                        }
                        _ => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Apply held-key actions every frame ────────────────────────────────
        let left = is_held(&key_frame, &KeyCode::Left, frame)
            || is_held(&key_frame, &KeyCode::Char('a'), frame)
            || is_held(&key_frame, &KeyCode::Char('A'), frame);
        let right = is_held(&key_frame, &KeyCode::Right, frame)
            || is_held(&key_frame, &KeyCode::Char('d'), frame)
            || is_held(&key_frame, &KeyCode::Char('D'), frame);
        let fire = is_held(&key_frame, &KeyCode::Char(' '), frame);

        if left && !right {
            state = move_player_left(&state);
        } else if right && !left {
            state = move_player_right(&state);
        } else {
            state = stop_player(&state);
        }
        // The core's fire cooldown throttles a held space bar.
        if fire {
            state = player_fire(&state);
        }

        state = tick(&state, &mut rng);

        // Record the run once, the moment it ends.
        if (state.game_over || state.game_won) && !score_recorded {
            score_recorded = true;
            if scores.is_high_score(state.score) {
                let rank = scores.add_score(&player_name(), state.score, state.difficulty, state.level);
                info!("run ended: score {} ranks #{}", state.score, rank + 1);
            } else {
                info!("run ended: score {} below the table", state.score);
            }
        }

        let (term_width, term_height) = terminal::size()?;
        display::render(out, &state, term_width, term_height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let _ = simple_logging::log_to_file("space_invaders.log", log::LevelFilter::Info);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending
    // them through a channel so the game loop never blocks on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
