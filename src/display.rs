/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of
/// the game state.  No game logic is performed; this module only
/// translates state into terminal commands.  The 1024x768 logical
/// playfield is scaled onto whatever cell grid the terminal offers.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use space_invaders::entities::{
    Alien, AlienKind, AlienMissile, Explosion, ExplosionKind, GameState, HitSide, Missile,
    PowerUp, PowerUpKind,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_SCOUT: Color = Color::Red;
const C_ARMORED: Color = Color::Blue;
const C_ELITE: Color = Color::Green;
const C_MISSILE_PLAYER: Color = Color::Cyan;
const C_MISSILE_ALIEN: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;
const C_POWERUP_ACTIVE: Color = Color::Yellow;

// ── Coordinate scaling ────────────────────────────────────────────────────────

/// Maps logical playfield coordinates onto the terminal cell grid,
/// leaving the HUD row and border rows alone.
struct Viewport {
    term_width: u16,
    term_height: u16,
    play_width: f64,
    play_height: f64,
}

impl Viewport {
    fn new(state: &GameState, term_width: u16, term_height: u16) -> Self {
        Viewport {
            term_width,
            term_height,
            play_width: state.width,
            play_height: state.height,
        }
    }

    fn cell(&self, x: f64, y: f64) -> (u16, u16) {
        // Rows 0..=1 are HUD + top border; the last two rows are the
        // bottom border and hint line.
        let usable_w = self.term_width.saturating_sub(2).max(1) as f64;
        let usable_h = self.term_height.saturating_sub(4).max(1) as f64;
        let col = 1.0 + (x / self.play_width).clamp(0.0, 1.0) * (usable_w - 1.0);
        let row = 2.0 + (y / self.play_height).clamp(0.0, 1.0) * (usable_h - 1.0);
        (col as u16, row as u16)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &GameState,
    term_width: u16,
    term_height: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    if state.show_startup {
        draw_startup(out, term_width, term_height)?;
        out.flush()?;
        return Ok(());
    }

    let view = Viewport::new(state, term_width, term_height);

    draw_border(out, term_width, term_height)?;
    draw_hud(out, state, term_width)?;

    for alien in state.aliens.iter().filter(|a| a.alive) {
        draw_alien(out, &view, alien)?;
    }
    for power_up in &state.power_ups {
        draw_power_up(out, &view, power_up)?;
    }
    for missile in &state.missiles {
        draw_missile(out, &view, missile)?;
    }
    for missile in &state.alien_missiles {
        draw_alien_missile(out, &view, missile)?;
    }
    for explosion in &state.explosions {
        draw_explosion(out, &view, explosion)?;
    }

    draw_player(out, &view, state)?;
    draw_active_power_ups(out, state, term_width, term_height)?;
    draw_controls_hint(out, term_height)?;

    if state.level_complete && state.level < state.max_level {
        draw_banner(
            out,
            term_width,
            term_height,
            &format!("LEVEL {} COMPLETE!", state.level),
            Color::Green,
        )?;
    }
    if state.game_over {
        draw_end_overlay(out, state, term_width, term_height, "GAME  OVER", Color::Red)?;
    }
    if state.game_won {
        draw_end_overlay(out, state, term_width, term_height, "YOU  WIN!", Color::Green)?;
    }
    if state.help_active {
        draw_help(out, term_width, term_height)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, term_height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {:>7}", state.score)))?;

    let centre = format!(
        "High: {}   Level: {}/{}   [{}]",
        state.high_score,
        state.level,
        state.max_level,
        state.difficulty.label().to_uppercase()
    );
    let cx = (width / 2).saturating_sub(centre.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(cx, 0))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print(&centre))?;

    let hearts: String = "♥".repeat(state.player.lives as usize);
    let lives_text = format!("Lives: {}", hearts);
    let rx = width.saturating_sub(lives_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_text))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, view: &Viewport, state: &GameState) -> std::io::Result<()> {
    let p = &state.player;
    let (col, row) = view.cell(p.x, p.y);

    // Blink while invulnerable, damage flash takes precedence.
    if p.is_invulnerable() && p.damage_timer == 0 && (p.invulnerable_timer / 4) % 2 == 1 {
        return Ok(());
    }
    let color = if p.damage_timer > 0 && (p.damage_timer / 5) % 2 == 1 {
        Color::Red
    } else {
        C_PLAYER
    };

    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(col, row.saturating_sub(1)))?;
    out.queue(Print("▲"))?;
    out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
    out.queue(Print("/█\\"))?;

    if p.has_shield() {
        out.queue(style::SetForegroundColor(Color::Cyan))?;
        out.queue(cursor::MoveTo(col.saturating_sub(2).max(1), row))?;
        out.queue(Print("("))?;
        out.queue(cursor::MoveTo(col + 2, row))?;
        out.queue(Print(")"))?;
    }
    Ok(())
}

/// Aliens show their degradation stage: Armored lose the plate on the
/// struck side, Elites lose the shield first and then crack open.
fn draw_alien<W: Write>(out: &mut W, view: &Viewport, alien: &Alien) -> std::io::Result<()> {
    let (col, row) = view.cell(alien.x, alien.y);
    let (sprite, color) = match alien.kind {
        AlienKind::Scout => ("<▼>", C_SCOUT),
        AlienKind::Armored => {
            let sprite = if alien.has_armor {
                "[▼]"
            } else {
                match alien.last_hit_side {
                    Some(HitSide::Left) => " ▼]",
                    Some(HitSide::Right) => "[▼ ",
                    None => " ▼ ",
                }
            };
            (sprite, C_ARMORED)
        }
        AlienKind::Elite => {
            let sprite = if alien.has_armor {
                "(◉)"
            } else if alien.hull_intact {
                "|◉|"
            } else {
                "|✶|"
            };
            (sprite, C_ELITE)
        }
    };
    out.queue(style::SetForegroundColor(color))?;
    out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
    out.queue(Print(sprite))?;
    Ok(())
}

fn draw_missile<W: Write>(out: &mut W, view: &Viewport, missile: &Missile) -> std::io::Result<()> {
    let (col, row) = view.cell(missile.x, missile.y);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_MISSILE_PLAYER))?;
    out.queue(Print("║"))?;
    Ok(())
}

fn draw_alien_missile<W: Write>(
    out: &mut W,
    view: &Viewport,
    missile: &AlienMissile,
) -> std::io::Result<()> {
    let (col, row) = view.cell(missile.x, missile.y);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(C_MISSILE_ALIEN))?;
    out.queue(Print("↓"))?;
    Ok(())
}

fn draw_power_up<W: Write>(out: &mut W, view: &Viewport, power_up: &PowerUp) -> std::io::Result<()> {
    let (symbol, color) = match power_up.kind {
        PowerUpKind::Shield => ("◯", Color::Cyan),
        PowerUpKind::RapidFire => ("!", Color::Yellow),
        PowerUpKind::MultiShot => ("≡", Color::Green),
        PowerUpKind::ExtraLife => ("♥", Color::Magenta),
        PowerUpKind::SlowTime => ("⌛", Color::Blue),
    };
    let (col, row) = view.cell(power_up.x, power_up.y);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(symbol))?;
    Ok(())
}

fn draw_explosion<W: Write>(
    out: &mut W,
    view: &Viewport,
    explosion: &Explosion,
) -> std::io::Result<()> {
    let symbol = match explosion.frame {
        0..=9 => "✺",
        10..=19 => "✳",
        _ => "·",
    };
    let color = match explosion.kind {
        ExplosionKind::PlayerHit => Color::Red,
        ExplosionKind::AlienDestroyed => Color::Yellow,
        ExplosionKind::MissileHit => Color::DarkYellow,
    };
    let (col, row) = view.cell(explosion.x, explosion.y);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(symbol))?;
    Ok(())
}

/// Labels for running power-up timers, bottom-right corner.
fn draw_active_power_ups<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
) -> std::io::Result<()> {
    let mut labels: Vec<&str> = Vec::new();
    if state.player.has_shield() {
        labels.push("Shield");
    }
    if state.player.has_rapid_fire() {
        labels.push("Rapid Fire");
    }
    if state.player.has_multi_shot() {
        labels.push("Multi-Shot");
    }
    if state.player.has_slow_time() {
        labels.push("Slow Time");
    }

    out.queue(style::SetForegroundColor(C_POWERUP_ACTIVE))?;
    for (i, label) in labels.iter().enumerate() {
        let row = height.saturating_sub(3 + labels.len() as u16) + i as u16;
        let col = width.saturating_sub(label.chars().count() as u16 + 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print(*label))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "← → / A D : Move   SPACE : Fire   H : Help   1/2/3 : Difficulty   Q : Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn centred_line<W: Write>(
    out: &mut W,
    width: u16,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_startup<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let top = (height / 2).saturating_sub(8);
    centred_line(out, width, top, "★  SPACE  INVADERS  ★", Color::Green)?;
    centred_line(out, width, top + 1, "Enhanced Edition", Color::DarkGrey)?;

    let lines = [
        "Move with the arrow keys, fire with SPACE",
        "Press H in game for help, 1/2/3 to change difficulty",
        "",
        "Level 1: Scout ships — one hit",
        "Level 2: Armored ships — two hits, plating first",
        "Level 3: Elite ships — three hits, shield then hull",
        "",
        "Catch falling power-ups: Shield, Rapid Fire,",
        "Multi-Shot, Slow Time and Extra Life",
    ];
    for (i, line) in lines.iter().enumerate() {
        let color = if line.starts_with("Level") {
            Color::Yellow
        } else {
            Color::White
        };
        centred_line(out, width, top + 3 + i as u16, line, color)?;
    }
    centred_line(out, width, top + 13, "Press SPACE to start", Color::Cyan)?;
    Ok(())
}

fn draw_help<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let top = (height / 2).saturating_sub(6);
    centred_line(out, width, top, "─── HELP ───", Color::Yellow)?;
    let lines = [
        "← → or A D   move ship",
        "SPACE        fire missiles",
        "1 / 2 / 3    easy / normal / hard",
        "R            restart after game over",
        "Q or ESC     quit",
        "",
        "Destroy every alien before the formation",
        "reaches your ship.  Power-ups stack with",
        "each other but not with themselves.",
        "",
        "Press H to close",
    ];
    for (i, line) in lines.iter().enumerate() {
        centred_line(out, width, top + 2 + i as u16, line, Color::White)?;
    }
    Ok(())
}

fn draw_banner<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    centred_line(out, width, height / 2, text, color)
}

fn draw_end_overlay<W: Write>(
    out: &mut W,
    state: &GameState,
    width: u16,
    height: u16,
    title: &str,
    color: Color,
) -> std::io::Result<()> {
    let mid = height / 2;
    centred_line(out, width, mid.saturating_sub(2), "╔══════════════════╗", color)?;
    centred_line(out, width, mid.saturating_sub(1), &format!("║ {:^16} ║", title), color)?;
    centred_line(out, width, mid, "╚══════════════════╝", color)?;
    centred_line(
        out,
        width,
        mid + 1,
        &format!("Final Score: {}", state.score),
        Color::Yellow,
    )?;
    centred_line(out, width, mid + 3, "R - Play Again  Q - Quit", Color::White)?;
    Ok(())
}
