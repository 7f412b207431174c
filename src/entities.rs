/// All game entity types and their per-type behavior.
///
/// Positions are logical pixels on a 1024x768 playfield: origin
/// top-left, y grows downward. Every entity carries an `alive` /
/// `active` flag; once false it is dropped from its owning collection
/// by the end of the same tick and never reused.

use rand::Rng;

// ── Playfield & timing constants (ticks are 1/60 s) ──────────────────────────

pub const PLAY_WIDTH: f64 = 1024.0;
pub const PLAY_HEIGHT: f64 = 768.0;

/// Grace period after a damaging hit.
pub const INVULNERABLE_TICKS: u32 = 120;
/// Cosmetic damage flash.
pub const DAMAGE_FLASH_TICKS: u32 = 60;

pub const SHIELD_TICKS: u32 = 600;
pub const RAPID_FIRE_TICKS: u32 = 600;
pub const MULTI_SHOT_TICKS: u32 = 600;
pub const SLOW_TIME_TICKS: u32 = 360;
/// Alien horizontal speed multiplier while slow-time is active.
pub const SLOW_TIME_FACTOR: f64 = 0.5;

pub const FIRE_COOLDOWN_TICKS: u64 = 30;
pub const RAPID_FIRE_COOLDOWN_TICKS: u64 = 10;
/// On-screen player missile cap, to stop fire spam.
pub const MAX_PLAYER_MISSILES: usize = 15;

/// Minimum ticks between shots for one alien (3 s).
pub const ALIEN_FIRE_COOLDOWN_TICKS: u64 = 180;
/// Horizontal aim jitter applied to alien shots, in pixels.
pub const ALIEN_AIM_JITTER: f64 = 50.0;

/// Power-ups are culled this far below the bottom edge.
pub const POWERUP_CULL_MARGIN: f64 = 32.0;

// ── Difficulty ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Speed / fire-chance multiplier applied on top of level config.
    pub fn multiplier(self) -> f64 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }
}

// ── Aliens ───────────────────────────────────────────────────────────────────

/// Which side of an alien the last hit landed on. Picks the armor
/// plate to suppress when drawing; no gameplay effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitSide {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlienKind {
    /// One hit point; any hit is lethal.
    Scout,
    /// Two hit points; the first hit strips the armor plating.
    Armored,
    /// Three hit points; shield, then hull, then core.
    Elite,
}

impl AlienKind {
    pub fn size(self) -> f64 {
        match self {
            AlienKind::Scout | AlienKind::Armored => 30.0,
            AlienKind::Elite => 35.0,
        }
    }

    pub fn max_health(self) -> i32 {
        match self {
            AlienKind::Scout => 1,
            AlienKind::Armored => 2,
            AlienKind::Elite => 3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Alien {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
    pub kind: AlienKind,
    pub health: i32,
    pub max_health: i32,
    pub alive: bool,
    /// Armored plating / Elite shield — consumed before health runs out.
    pub has_armor: bool,
    /// Elite only: false once the hull is cracked and the core shows.
    pub hull_intact: bool,
    pub last_hit_side: Option<HitSide>,
    /// Frame of this alien's last shot, for the per-alien cooldown.
    pub last_fire_frame: Option<u64>,
}

impl Alien {
    pub fn new(kind: AlienKind, x: f64, y: f64, speed: f64) -> Self {
        Alien {
            x,
            y,
            size: kind.size(),
            speed,
            kind,
            health: kind.max_health(),
            max_health: kind.max_health(),
            alive: true,
            has_armor: matches!(kind, AlienKind::Armored | AlienKind::Elite),
            hull_intact: true,
            last_hit_side: None,
            last_fire_frame: None,
        }
    }

    /// Horizontal formation step. Elites drift slightly on the y axis.
    pub fn advance(&mut self, direction: f64, speed_multiplier: f64, rng: &mut impl Rng) {
        self.x += direction * self.speed * speed_multiplier;
        if self.kind == AlienKind::Elite {
            self.y += rng.gen_range(-0.5..0.5);
        }
    }

    pub fn step_down(&mut self, amount: f64) {
        self.y += amount;
    }

    /// Circle-vs-missile overlap: centers closer than the radius sum.
    pub fn hit_by(&self, missile: &Missile) -> bool {
        if !self.alive {
            return false;
        }
        let dx = self.x - missile.x;
        let dy = self.y - missile.y;
        (dx * dx + dy * dy).sqrt() < self.size / 2.0 + missile.width / 2.0
    }

    /// Apply one hit per the archetype's damage-stage policy.
    /// Returns true when the alien was destroyed by this hit.
    /// Stage transitions are one-way; surviving health never drops
    /// below 1 so `alive == (health > 0)` holds throughout.
    pub fn take_damage(&mut self, hit_x: f64, damage: i32) -> bool {
        self.last_hit_side = Some(if hit_x < self.x { HitSide::Left } else { HitSide::Right });

        match self.kind {
            AlienKind::Scout => {
                self.health = 0;
                self.alive = false;
                true
            }
            AlienKind::Armored => {
                if self.has_armor {
                    self.has_armor = false;
                    self.health = (self.health - damage).max(1);
                    false
                } else {
                    self.health = 0;
                    self.alive = false;
                    true
                }
            }
            AlienKind::Elite => {
                if self.has_armor {
                    self.has_armor = false;
                    self.health = (self.health - damage).max(1);
                    false
                } else if self.hull_intact {
                    self.hull_intact = false;
                    self.health = (self.health - damage).max(1);
                    false
                } else {
                    self.health = 0;
                    self.alive = false;
                    true
                }
            }
        }
    }
}

// ── Missiles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissileKind {
    Standard,
    /// Smaller and faster; fired while rapid-fire is active.
    Rapid,
    /// Larger, double damage.
    Powerful,
}

/// Player-fired missile. Travels upward (vy < 0).
#[derive(Clone, Debug)]
pub struct Missile {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub width: f64,
    pub height: f64,
    pub damage: i32,
    pub kind: MissileKind,
    pub active: bool,
}

impl Missile {
    pub fn new(x: f64, y: f64, vx: f64, kind: MissileKind) -> Self {
        let (width, height, vy, damage) = match kind {
            MissileKind::Standard => (4.0, 15.0, -7.0, 1),
            MissileKind::Rapid => (3.0, 12.0, -9.0, 1),
            MissileKind::Powerful => (6.0, 18.0, -7.0, 2),
        };
        Missile { x, y, vx, vy, width, height, damage, kind, active: true }
    }

    pub fn update(&mut self, width: f64) {
        self.x += self.vx;
        self.y += self.vy;
        if self.y < 0.0 || self.x < 0.0 || self.x > width {
            self.active = false;
        }
    }
}

/// Enemy-fired missile. Velocity is fixed at creation; no homing.
#[derive(Clone, Debug)]
pub struct AlienMissile {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub width: f64,
    pub height: f64,
    pub active: bool,
}

impl AlienMissile {
    /// Aim toward a target point: the normalized direction vector
    /// scaled to speed 4. Falls back to straight down if the target
    /// coincides with the origin.
    pub fn aimed(x: f64, y: f64, target_x: f64, target_y: f64) -> Self {
        let dx = target_x - x;
        let dy = target_y - y;
        let length = (dx * dx + dy * dy).sqrt();
        let (vx, vy) = if length > 0.0 {
            (dx / length * 4.0, dy / length * 4.0)
        } else {
            (0.0, 4.0)
        };
        AlienMissile { x, y, vx, vy, width: 6.0, height: 15.0, active: true }
    }

    pub fn update(&mut self, width: f64, height: f64) {
        self.x += self.vx;
        self.y += self.vy;
        if self.y < 0.0 || self.y > height || self.x < 0.0 || self.x > width {
            self.active = false;
        }
    }

    pub fn hits_player(&self, player: &Player) -> bool {
        rects_overlap(
            self.x, self.y, self.width, self.height,
            player.x, player.y, player.width, player.height,
        )
    }
}

/// Axis-aligned overlap between two center-anchored rectangles.
fn rects_overlap(
    ax: f64, ay: f64, aw: f64, ah: f64,
    bx: f64, by: f64, bw: f64, bh: f64,
) -> bool {
    (ax - bx).abs() < (aw + bw) / 2.0 && (ay - by).abs() < (ah + bh) / 2.0
}

// ── Power-ups ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    Shield,
    RapidFire,
    MultiShot,
    ExtraLife,
    SlowTime,
}

impl PowerUpKind {
    /// Weighted draw: extra lives are rare, slow-time uncommon.
    pub fn random(rng: &mut impl Rng) -> Self {
        let roll: f64 = rng.gen();
        if roll < 0.25 {
            PowerUpKind::Shield
        } else if roll < 0.50 {
            PowerUpKind::RapidFire
        } else if roll < 0.75 {
            PowerUpKind::MultiShot
        } else if roll < 0.85 {
            PowerUpKind::ExtraLife
        } else {
            PowerUpKind::SlowTime
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::Shield => "Shield",
            PowerUpKind::RapidFire => "Rapid Fire",
            PowerUpKind::MultiShot => "Multi-Shot",
            PowerUpKind::ExtraLife => "Extra Life",
            PowerUpKind::SlowTime => "Slow Time",
        }
    }
}

/// Falling pickup dropped by destroyed aliens.
#[derive(Clone, Debug)]
pub struct PowerUp {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub kind: PowerUpKind,
    pub speed: f64,
    pub active: bool,
}

impl PowerUp {
    pub fn new(x: f64, y: f64, kind: PowerUpKind) -> Self {
        PowerUp { x, y, width: 20.0, height: 20.0, kind, speed: 1.0, active: true }
    }

    pub fn update(&mut self, play_height: f64) {
        self.y += self.speed;
        if self.y > play_height + POWERUP_CULL_MARGIN {
            self.active = false;
        }
    }

    pub fn collected_by(&self, player: &Player) -> bool {
        rects_overlap(
            self.x, self.y, self.width, self.height,
            player.x, player.y, player.width, player.height,
        )
    }
}

// ── Transient visuals ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplosionKind {
    /// Small burst where a missile struck.
    MissileHit,
    /// Larger burst where an alien died.
    AlienDestroyed,
    /// Red-tinted burst on the player.
    PlayerHit,
}

#[derive(Clone, Debug)]
pub struct Explosion {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub kind: ExplosionKind,
    pub frame: u32,
    pub lifetime: u32,
    pub active: bool,
}

impl Explosion {
    pub fn new(x: f64, y: f64, kind: ExplosionKind) -> Self {
        let size = match kind {
            ExplosionKind::AlienDestroyed => 40.0,
            ExplosionKind::MissileHit | ExplosionKind::PlayerHit => 30.0,
        };
        Explosion { x, y, size, kind, frame: 0, lifetime: 30, active: true }
    }

    pub fn update(&mut self) {
        self.frame += 1;
        if self.frame >= self.lifetime {
            self.active = false;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    /// Glow around the player while shielded.
    Shield,
    /// Brief full-screen wash when slow-time kicks in.
    SlowTime,
}

impl EffectKind {
    pub fn duration(self) -> u32 {
        match self {
            EffectKind::Shield => 600,
            EffectKind::SlowTime => 60,
        }
    }
}

#[derive(Clone, Debug)]
pub struct VisualEffect {
    pub kind: EffectKind,
    pub frame: u32,
    pub active: bool,
}

impl VisualEffect {
    pub fn new(kind: EffectKind) -> Self {
        VisualEffect { kind, frame: 0, active: true }
    }

    pub fn update(&mut self) {
        self.frame += 1;
        if self.frame >= self.kind.duration() {
            self.active = false;
        }
    }
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Current horizontal velocity; halved into fired missiles.
    pub velocity: f64,
    pub max_speed: f64,
    pub lives: u32,
    pub max_lives: u32,
    /// Ship tier 1-3; grows on level advance. Cosmetic only.
    pub ship_level: u32,
    pub shield_timer: u32,
    pub rapid_fire_timer: u32,
    pub multi_shot_timer: u32,
    pub slow_time_timer: u32,
    pub invulnerable_timer: u32,
    pub damage_timer: u32,
    /// Frame of the last shot, for the fire cooldown.
    pub last_fire_frame: Option<u64>,
}

impl Player {
    pub fn new(play_width: f64, play_height: f64) -> Self {
        let mut player = Player {
            x: play_width / 2.0,
            y: play_height - 80.0,
            width: 40.0,
            height: 30.0,
            velocity: 0.0,
            max_speed: 5.0,
            lives: 3,
            max_lives: 3,
            ship_level: 1,
            shield_timer: 0,
            rapid_fire_timer: 0,
            multi_shot_timer: 0,
            slow_time_timer: 0,
            invulnerable_timer: 0,
            damage_timer: 0,
            last_fire_frame: None,
        };
        player.apply_ship_level();
        player
    }

    /// Hull dimensions per ship tier.
    fn apply_ship_level(&mut self) {
        let (width, height) = match self.ship_level {
            1 => (40.0, 30.0),
            2 => (44.0, 32.0),
            _ => (48.0, 35.0),
        };
        self.width = width;
        self.height = height;
    }

    pub fn level_up(&mut self) {
        self.ship_level = (self.ship_level + 1).min(3);
        self.apply_ship_level();
    }

    pub fn move_left(&mut self) {
        self.velocity = -self.max_speed;
        self.x = (self.x + self.velocity).max(self.width / 2.0);
    }

    pub fn move_right(&mut self, play_width: f64) {
        self.velocity = self.max_speed;
        self.x = (self.x + self.velocity).min(play_width - self.width / 2.0);
    }

    pub fn stop_moving(&mut self) {
        self.velocity = 0.0;
    }

    pub fn has_shield(&self) -> bool {
        self.shield_timer > 0
    }

    pub fn has_rapid_fire(&self) -> bool {
        self.rapid_fire_timer > 0
    }

    pub fn has_multi_shot(&self) -> bool {
        self.multi_shot_timer > 0
    }

    pub fn has_slow_time(&self) -> bool {
        self.slow_time_timer > 0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0
    }

    pub fn activate_shield(&mut self) {
        self.shield_timer = SHIELD_TICKS;
    }

    pub fn activate_rapid_fire(&mut self) {
        self.rapid_fire_timer = RAPID_FIRE_TICKS;
    }

    pub fn activate_multi_shot(&mut self) {
        self.multi_shot_timer = MULTI_SHOT_TICKS;
    }

    pub fn activate_slow_time(&mut self) {
        self.slow_time_timer = SLOW_TIME_TICKS;
    }

    /// Adds a life up to the cap. Returns false when already full.
    pub fn add_life(&mut self) -> bool {
        if self.lives < self.max_lives {
            self.lives += 1;
            true
        } else {
            false
        }
    }

    /// One incoming hit. Absorbed silently while shielded or inside
    /// the invulnerability window; otherwise costs a life and re-arms
    /// invulnerability if any lives remain. Returns true if damage
    /// actually landed.
    pub fn take_damage(&mut self) -> bool {
        if self.is_invulnerable() || self.has_shield() {
            return false;
        }
        self.lives = self.lives.saturating_sub(1);
        self.damage_timer = DAMAGE_FLASH_TICKS;
        if self.lives > 0 {
            self.invulnerable_timer = INVULNERABLE_TICKS;
        }
        true
    }

    /// Per-tick timer upkeep: invulnerability, damage flash and the
    /// four power-up countdowns.
    pub fn update(&mut self) {
        self.invulnerable_timer = self.invulnerable_timer.saturating_sub(1);
        self.damage_timer = self.damage_timer.saturating_sub(1);
        self.shield_timer = self.shield_timer.saturating_sub(1);
        self.rapid_fire_timer = self.rapid_fire_timer.saturating_sub(1);
        self.multi_shot_timer = self.multi_shot_timer.saturating_sub(1);
        self.slow_time_timer = self.slow_time_timer.saturating_sub(1);
    }

    /// Fire if the cooldown allows it. Multi-shot yields a fixed
    /// 3-missile spread, otherwise one missile (rapid variant while
    /// rapid-fire is running). Missiles inherit half the ship's
    /// current horizontal velocity.
    pub fn fire(&mut self, frame: u64) -> Vec<Missile> {
        let cooldown = if self.has_rapid_fire() {
            RAPID_FIRE_COOLDOWN_TICKS
        } else {
            FIRE_COOLDOWN_TICKS
        };
        if let Some(last) = self.last_fire_frame {
            if frame.saturating_sub(last) < cooldown {
                return Vec::new();
            }
        }
        self.last_fire_frame = Some(frame);

        let vx = self.velocity / 2.0;
        let nose_y = self.y - self.height / 2.0;
        if self.has_multi_shot() {
            vec![
                Missile::new(self.x - 15.0, nose_y, vx, MissileKind::Standard),
                Missile::new(self.x, nose_y - 5.0, vx, MissileKind::Standard),
                Missile::new(self.x + 15.0, nose_y, vx, MissileKind::Standard),
            ]
        } else {
            let kind = if self.has_rapid_fire() {
                MissileKind::Rapid
            } else {
                MissileKind::Standard
            };
            vec![Missile::new(self.x, nose_y, vx, kind)]
        }
    }
}

// ── Master game state ────────────────────────────────────────────────────────

/// The entire game state. Cloneable so the pure update functions in
/// `compute` can return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub aliens: Vec<Alien>,
    pub missiles: Vec<Missile>,
    pub alien_missiles: Vec<AlienMissile>,
    pub power_ups: Vec<PowerUp>,
    pub explosions: Vec<Explosion>,
    pub effects: Vec<VisualEffect>,
    /// Shared formation direction: +1 right, -1 left.
    pub alien_direction: f64,
    pub score: u32,
    /// In-memory running maximum of `score`.
    pub high_score: u32,
    /// Current level, 1-based.
    pub level: u32,
    pub max_level: u32,
    pub level_complete: bool,
    pub game_over: bool,
    pub game_won: bool,
    /// Instructions overlay shown until dismissed with Fire.
    pub show_startup: bool,
    /// Help overlay; freezes updates while open.
    pub help_active: bool,
    pub difficulty: Difficulty,
    /// Monotonic tick counter; all cooldowns key off this.
    pub frame: u64,
    pub width: f64,
    pub height: f64,
}
