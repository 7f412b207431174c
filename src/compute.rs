/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a
/// brand-new `GameState`.  Side effects are limited to the injected
/// RNG, so a seeded RNG makes every transition deterministic.

use log::info;
use rand::Rng;

use crate::entities::{
    AlienMissile, Difficulty, EffectKind, Explosion, ExplosionKind, GameState, Player, PowerUp,
    PowerUpKind, VisualEffect, ALIEN_AIM_JITTER, ALIEN_FIRE_COOLDOWN_TICKS, MAX_PLAYER_MISSILES,
    PLAY_HEIGHT, PLAY_WIDTH, SLOW_TIME_FACTOR,
};
use crate::levels::{self, MAX_LEVEL};

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state: level 1 formation, fresh player,
/// startup overlay showing. `high_score` carries across restarts.
pub fn init_state(difficulty: Difficulty, high_score: u32) -> GameState {
    GameState {
        player: Player::new(PLAY_WIDTH, PLAY_HEIGHT),
        aliens: levels::create_aliens(1, difficulty, PLAY_WIDTH),
        missiles: Vec::new(),
        alien_missiles: Vec::new(),
        power_ups: Vec::new(),
        explosions: Vec::new(),
        effects: Vec::new(),
        alien_direction: 1.0,
        score: 0,
        high_score,
        level: 1,
        max_level: MAX_LEVEL,
        level_complete: false,
        game_over: false,
        game_won: false,
        show_startup: true,
        help_active: false,
        difficulty,
        frame: 0,
        width: PLAY_WIDTH,
        height: PLAY_HEIGHT,
    }
}

/// Full restart after game-over / win: everything back to initial
/// values except the difficulty choice and the in-memory high score.
pub fn restart(state: &GameState) -> GameState {
    let mut next = init_state(state.difficulty, state.high_score);
    // No need to sit through the instructions again.
    next.show_startup = false;
    next
}

// ── Input-driven state transitions ───────────────────────────────────────────

fn input_blocked(state: &GameState) -> bool {
    state.help_active || state.show_startup || state.game_over || state.game_won
}

pub fn move_player_left(state: &GameState) -> GameState {
    let mut next = state.clone();
    if !input_blocked(&next) {
        next.player.move_left();
    }
    next
}

pub fn move_player_right(state: &GameState) -> GameState {
    let mut next = state.clone();
    if !input_blocked(&next) {
        let width = next.width;
        next.player.move_right(width);
    }
    next
}

pub fn stop_player(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.player.stop_moving();
    next
}

/// Fire action. On the startup overlay this dismisses it instead.
/// Respects the player's fire cooldown and the on-screen missile cap.
pub fn player_fire(state: &GameState) -> GameState {
    let mut next = state.clone();
    if next.show_startup {
        next.show_startup = false;
        return next;
    }
    if next.help_active || next.game_over || next.game_won {
        return next;
    }
    if next.missiles.len() >= MAX_PLAYER_MISSILES {
        return next;
    }
    let frame = next.frame;
    let fired = next.player.fire(frame);
    next.missiles.extend(fired);
    next
}

pub fn toggle_help(state: &GameState) -> GameState {
    let mut next = state.clone();
    next.help_active = !next.help_active;
    next
}

/// Change difficulty mid-run: live aliens are rescaled to the new
/// multiplier immediately.
pub fn set_difficulty(state: &GameState, difficulty: Difficulty) -> GameState {
    let mut next = state.clone();
    next.difficulty = difficulty;
    let base_speed = levels::level_config(next.level).speed;
    for alien in next.aliens.iter_mut().filter(|a| a.alive) {
        alien.speed = base_speed * difficulty.multiplier();
    }
    next
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one tick.  No-op while an overlay is up
/// or a terminal state has been reached.
pub fn tick(state: &GameState, rng: &mut impl Rng) -> GameState {
    if state.help_active || state.show_startup || state.game_over || state.game_won {
        return state.clone();
    }

    let mut next = state.clone();
    next.frame += 1;

    // Player timers run every live tick, including the transition tick.
    next.player.update();

    // ── 1. Level-complete gate ───────────────────────────────────────────────
    if next.level_complete {
        if next.level < next.max_level {
            next.level += 1;
            next.level_complete = false;
            next.missiles.clear();
            next.alien_missiles.clear();
            next.power_ups.clear();
            next.explosions.clear();
            next.effects.clear();
            next.player.x = next.width / 2.0;
            next.player.stop_moving();
            next.player.level_up();
            next.aliens = levels::create_aliens(next.level, next.difficulty, next.width);
            next.alien_direction = 1.0;
            info!("starting level {}", next.level);
        } else {
            next.game_won = true;
            info!("final level cleared, score {}", next.score);
        }
        return next;
    }

    // ── 2. Missile integration ───────────────────────────────────────────────
    let (width, height) = (next.width, next.height);
    for missile in next.missiles.iter_mut() {
        missile.update(width);
    }
    next.missiles.retain(|m| m.active);
    for missile in next.alien_missiles.iter_mut() {
        missile.update(width, height);
    }
    next.alien_missiles.retain(|m| m.active);

    // ── 3. Formation bounce scan ─────────────────────────────────────────────
    // One flip per tick no matter how many aliens are past the edge.
    let mut move_down = false;
    for alien in next.aliens.iter().filter(|a| a.alive) {
        if (alien.x + alien.size / 2.0 > next.width && next.alien_direction > 0.0)
            || (alien.x - alien.size / 2.0 < 0.0 && next.alien_direction < 0.0)
        {
            next.alien_direction = -next.alien_direction;
            move_down = true;
            break;
        }
    }

    // ── 4. Alien motion & fire ───────────────────────────────────────────────
    let config = levels::level_config(next.level);
    let speed_multiplier = if next.player.has_slow_time() {
        SLOW_TIME_FACTOR
    } else {
        1.0
    };
    let fire_chance = config.alien_fire_chance * next.difficulty.multiplier();
    let (player_x, player_y) = (next.player.x, next.player.y);
    let player_top = next.player.y - next.player.height / 2.0;
    let direction = next.alien_direction;
    let frame = next.frame;

    let mut fired: Vec<AlienMissile> = Vec::new();
    for alien in next.aliens.iter_mut() {
        if !alien.alive {
            continue;
        }
        alien.advance(direction, speed_multiplier, rng);
        if move_down {
            alien.step_down(config.vertical_move);
        }

        // Formation reached the player's row: the run is lost.
        if alien.y + alien.size / 2.0 > player_top {
            next.game_over = true;
            break;
        }

        if rng.gen_bool(fire_chance) {
            let off_cooldown = alien
                .last_fire_frame
                .map_or(true, |last| frame.saturating_sub(last) >= ALIEN_FIRE_COOLDOWN_TICKS);
            if off_cooldown {
                alien.last_fire_frame = Some(frame);
                let jitter = rng.gen_range(-ALIEN_AIM_JITTER..=ALIEN_AIM_JITTER);
                fired.push(AlienMissile::aimed(
                    alien.x,
                    alien.y + alien.size / 2.0,
                    player_x + jitter,
                    player_y,
                ));
            }
        }
    }
    next.alien_missiles.extend(fired);

    // ── 5. Player missiles vs. aliens ────────────────────────────────────────
    // Stable creation order; each missile spends itself on the first
    // alien it overlaps.
    for missile in next.missiles.iter_mut() {
        if !missile.active {
            continue;
        }
        for alien in next.aliens.iter_mut() {
            if !alien.hit_by(missile) {
                continue;
            }
            let destroyed = alien.take_damage(missile.x, missile.damage);
            missile.active = false;
            next.explosions
                .push(Explosion::new(missile.x, missile.y, ExplosionKind::MissileHit));

            if destroyed {
                next.score += config.points;
                next.explosions
                    .push(Explosion::new(alien.x, alien.y, ExplosionKind::AlienDestroyed));
                if rng.gen_bool(config.power_up_chance) {
                    let kind = PowerUpKind::random(rng);
                    next.power_ups.push(PowerUp::new(alien.x, alien.y, kind));
                }
            } else {
                // Glancing hit absorbed by armor or shield.
                next.score += 5;
            }
            break;
        }
    }
    next.missiles.retain(|m| m.active);

    // ── 6. Alien missiles vs. player ─────────────────────────────────────────
    for missile in next.alien_missiles.iter_mut() {
        if !missile.active || !missile.hits_player(&next.player) {
            continue;
        }
        missile.active = false;
        next.explosions
            .push(Explosion::new(missile.x, missile.y, ExplosionKind::PlayerHit));
        if next.player.take_damage() && next.player.lives == 0 {
            next.game_over = true;
        }
    }
    next.alien_missiles.retain(|m| m.active);

    // ── 7. Power-up motion & pickup ──────────────────────────────────────────
    let mut picked: Vec<PowerUpKind> = Vec::new();
    for power_up in next.power_ups.iter_mut() {
        power_up.update(height);
        if power_up.active && power_up.collected_by(&next.player) {
            picked.push(power_up.kind);
            power_up.active = false;
        }
    }
    next.power_ups.retain(|p| p.active);
    for kind in picked {
        apply_power_up(&mut next, kind);
    }

    // ── 8. Explosion / effect aging ──────────────────────────────────────────
    for explosion in next.explosions.iter_mut() {
        explosion.update();
    }
    next.explosions.retain(|e| e.active);
    for effect in next.effects.iter_mut() {
        effect.update();
    }
    next.effects.retain(|e| e.active);

    // ── 9. Win check ─────────────────────────────────────────────────────────
    if next.aliens.iter().all(|a| !a.alive) {
        next.level_complete = true;
    }

    // ── 10. High-score bookkeeping ───────────────────────────────────────────
    if next.score > next.high_score {
        next.high_score = next.score;
    }

    next
}

/// Immediate effect of a collected power-up.  Re-pickup resets the
/// type's own timer rather than stacking.
fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Shield => {
            state.player.activate_shield();
            state.effects.push(VisualEffect::new(EffectKind::Shield));
        }
        PowerUpKind::RapidFire => state.player.activate_rapid_fire(),
        PowerUpKind::MultiShot => state.player.activate_multi_shot(),
        PowerUpKind::ExtraLife => {
            state.player.add_life();
        }
        PowerUpKind::SlowTime => {
            state.player.activate_slow_time();
            state.effects.push(VisualEffect::new(EffectKind::SlowTime));
        }
    }
}
