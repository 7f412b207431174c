use space_invaders::entities::*;

// ── Alien damage stages ──────────────────────────────────────────────────────

#[test]
fn scout_dies_to_any_hit() {
    let mut a = Alien::new(AlienKind::Scout, 100.0, 100.0, 0.5);
    assert_eq!(a.max_health, 1);
    assert!(a.take_damage(90.0, 1));
    assert!(!a.alive);
    assert_eq!(a.health, 0);
}

#[test]
fn scout_dies_even_to_heavy_damage() {
    let mut a = Alien::new(AlienKind::Scout, 100.0, 100.0, 0.5);
    assert!(a.take_damage(90.0, 2));
    assert!(!a.alive);
}

#[test]
fn armored_loses_plating_first() {
    let mut a = Alien::new(AlienKind::Armored, 100.0, 100.0, 0.8);
    assert_eq!(a.max_health, 2);
    assert!(a.has_armor);

    assert!(!a.take_damage(90.0, 1)); // absorbed by the plating
    assert!(a.alive);
    assert!(!a.has_armor);
    assert_eq!(a.health, 1);

    assert!(a.take_damage(90.0, 1)); // now lethal
    assert!(!a.alive);
    assert_eq!(a.health, 0);
}

#[test]
fn armored_survives_heavy_first_hit_at_one_health() {
    // A double-damage hit on fresh plating still leaves the alien
    // standing with at least one point.
    let mut a = Alien::new(AlienKind::Armored, 100.0, 100.0, 0.8);
    assert!(!a.take_damage(90.0, 2));
    assert!(a.alive);
    assert!(a.health >= 1);
}

#[test]
fn elite_degrades_shield_hull_core_in_order() {
    let mut a = Alien::new(AlienKind::Elite, 100.0, 100.0, 1.2);
    assert_eq!(a.max_health, 3);
    assert!(a.has_armor && a.hull_intact);

    assert!(!a.take_damage(90.0, 1));
    assert!(!a.has_armor && a.hull_intact && a.alive);

    assert!(!a.take_damage(90.0, 1));
    assert!(!a.has_armor && !a.hull_intact && a.alive);

    assert!(a.take_damage(90.0, 1));
    assert!(!a.alive);
    assert_eq!(a.health, 0);
}

#[test]
fn hit_side_tracks_impact_point() {
    let mut a = Alien::new(AlienKind::Armored, 100.0, 100.0, 0.8);
    assert_eq!(a.last_hit_side, None);
    a.take_damage(90.0, 1);
    assert_eq!(a.last_hit_side, Some(HitSide::Left));
    a.take_damage(110.0, 1);
    assert_eq!(a.last_hit_side, Some(HitSide::Right));
}

#[test]
fn alien_health_never_negative() {
    for kind in [AlienKind::Scout, AlienKind::Armored, AlienKind::Elite] {
        let mut a = Alien::new(kind, 100.0, 100.0, 1.0);
        while a.alive {
            a.take_damage(90.0, 2);
            assert!(a.health >= 0);
            if a.alive {
                assert!(a.health >= 1);
            }
        }
        assert_eq!(a.health, 0);
    }
}

#[test]
fn alien_sizes_per_kind() {
    assert_eq!(AlienKind::Scout.size(), 30.0);
    assert_eq!(AlienKind::Armored.size(), 30.0);
    assert_eq!(AlienKind::Elite.size(), 35.0);
}

#[test]
fn hit_by_uses_circle_overlap() {
    let a = Alien::new(AlienKind::Scout, 100.0, 100.0, 0.5);
    // Radii: 15 (alien) + 2 (standard missile)
    let near = Missile::new(116.0, 100.0, 0.0, MissileKind::Standard);
    let far = Missile::new(117.5, 100.0, 0.0, MissileKind::Standard);
    assert!(a.hit_by(&near));
    assert!(!a.hit_by(&far));
}

#[test]
fn dead_alien_cannot_be_hit() {
    let mut a = Alien::new(AlienKind::Scout, 100.0, 100.0, 0.5);
    a.take_damage(100.0, 1);
    let m = Missile::new(100.0, 100.0, 0.0, MissileKind::Standard);
    assert!(!a.hit_by(&m));
}

// ── Missiles ─────────────────────────────────────────────────────────────────

#[test]
fn missile_stats_per_kind() {
    let standard = Missile::new(0.0, 0.0, 0.0, MissileKind::Standard);
    assert_eq!((standard.width, standard.height), (4.0, 15.0));
    assert_eq!((standard.vy, standard.damage), (-7.0, 1));

    let rapid = Missile::new(0.0, 0.0, 0.0, MissileKind::Rapid);
    assert_eq!((rapid.width, rapid.height), (3.0, 12.0));
    assert_eq!((rapid.vy, rapid.damage), (-9.0, 1));

    let powerful = Missile::new(0.0, 0.0, 0.0, MissileKind::Powerful);
    assert_eq!((powerful.width, powerful.height), (6.0, 18.0));
    assert_eq!((powerful.vy, powerful.damage), (-7.0, 2));
}

#[test]
fn missile_update_applies_both_velocities() {
    let mut m = Missile::new(100.0, 400.0, 2.5, MissileKind::Standard);
    m.update(1024.0);
    assert_eq!(m.x, 102.5);
    assert_eq!(m.y, 393.0);
    assert!(m.active);
}

#[test]
fn missile_deactivates_off_screen() {
    let mut top = Missile::new(100.0, 5.0, 0.0, MissileKind::Standard);
    top.update(1024.0);
    assert!(!top.active);

    let mut side = Missile::new(1023.0, 400.0, 3.0, MissileKind::Standard);
    side.update(1024.0);
    assert!(!side.active);
}

#[test]
fn alien_missile_aims_at_normalized_speed_4() {
    // A 3-4-5 triangle: direction (30, 40) scaled to length 4.
    let m = AlienMissile::aimed(0.0, 0.0, 30.0, 40.0);
    assert!((m.vx - 2.4).abs() < 1e-9);
    assert!((m.vy - 3.2).abs() < 1e-9);
    let speed = (m.vx * m.vx + m.vy * m.vy).sqrt();
    assert!((speed - 4.0).abs() < 1e-9);
}

#[test]
fn alien_missile_degenerate_aim_falls_straight_down() {
    let m = AlienMissile::aimed(50.0, 50.0, 50.0, 50.0);
    assert_eq!(m.vx, 0.0);
    assert_eq!(m.vy, 4.0);
}

#[test]
fn alien_missile_hits_player_rect() {
    let player = Player::new(1024.0, 768.0);
    let on_target = AlienMissile::aimed(player.x, player.y, player.x, player.y + 10.0);
    assert!(on_target.hits_player(&player));
    let wide = AlienMissile::aimed(player.x + 30.0, player.y, player.x + 30.0, player.y + 10.0);
    assert!(!wide.hits_player(&player));
}

// ── Power-ups ────────────────────────────────────────────────────────────────

#[test]
fn powerup_falls_and_culls_below_playfield() {
    let mut p = PowerUp::new(100.0, 799.5, PowerUpKind::Shield);
    p.update(768.0);
    assert!(!p.active); // crossed 768 + 32
    let mut p = PowerUp::new(100.0, 400.0, PowerUpKind::Shield);
    p.update(768.0);
    assert_eq!(p.y, 401.0);
    assert!(p.active);
}

#[test]
fn powerup_collected_on_overlap() {
    let player = Player::new(1024.0, 768.0);
    let near = PowerUp::new(player.x + 10.0, player.y, PowerUpKind::RapidFire);
    let far = PowerUp::new(player.x + 40.0, player.y, PowerUpKind::RapidFire);
    assert!(near.collected_by(&player));
    assert!(!far.collected_by(&player));
}

#[test]
fn powerup_labels() {
    assert_eq!(PowerUpKind::Shield.label(), "Shield");
    assert_eq!(PowerUpKind::ExtraLife.label(), "Extra Life");
    assert_eq!(PowerUpKind::SlowTime.label(), "Slow Time");
}

// ── Transient visuals ────────────────────────────────────────────────────────

#[test]
fn explosion_expires_after_lifetime() {
    let mut e = Explosion::new(100.0, 100.0, ExplosionKind::MissileHit);
    for _ in 0..29 {
        e.update();
        assert!(e.active);
    }
    e.update();
    assert!(!e.active);
}

#[test]
fn destroyed_alien_explosion_is_bigger() {
    let hit = Explosion::new(0.0, 0.0, ExplosionKind::MissileHit);
    let kill = Explosion::new(0.0, 0.0, ExplosionKind::AlienDestroyed);
    assert!(kill.size > hit.size);
}

#[test]
fn slow_time_wash_is_brief() {
    let mut e = VisualEffect::new(EffectKind::SlowTime);
    for _ in 0..60 {
        e.update();
    }
    assert!(!e.active);
}

// ── Player ───────────────────────────────────────────────────────────────────

#[test]
fn player_starts_centered_above_bottom_edge() {
    let p = Player::new(1024.0, 768.0);
    assert_eq!(p.x, 512.0);
    assert_eq!(p.y, 688.0);
    assert_eq!((p.width, p.height), (40.0, 30.0));
    assert_eq!(p.lives, 3);
}

#[test]
fn player_movement_clamps_to_playfield() {
    let mut p = Player::new(1024.0, 768.0);
    p.x = 22.0;
    p.move_left();
    assert_eq!(p.x, 20.0);
    p.x = 1002.0;
    p.move_right(1024.0);
    assert_eq!(p.x, 1004.0);
}

#[test]
fn ship_tier_grows_hull_and_caps_at_three() {
    let mut p = Player::new(1024.0, 768.0);
    p.level_up();
    assert_eq!(p.ship_level, 2);
    assert_eq!((p.width, p.height), (44.0, 32.0));
    p.level_up();
    p.level_up();
    p.level_up();
    assert_eq!(p.ship_level, 3);
    assert_eq!((p.width, p.height), (48.0, 35.0));
}

#[test]
fn take_damage_costs_life_and_arms_grace_period() {
    let mut p = Player::new(1024.0, 768.0);
    assert!(p.take_damage());
    assert_eq!(p.lives, 2);
    assert_eq!(p.invulnerable_timer, 120);
    assert_eq!(p.damage_timer, 60);

    // Grace period absorbs the follow-up hit
    assert!(!p.take_damage());
    assert_eq!(p.lives, 2);
}

#[test]
fn shield_absorbs_without_arming_invulnerability() {
    let mut p = Player::new(1024.0, 768.0);
    p.activate_shield();
    assert!(!p.take_damage());
    assert_eq!(p.lives, 3);
    assert_eq!(p.invulnerable_timer, 0);
}

#[test]
fn fatal_hit_does_not_rearm_invulnerability() {
    let mut p = Player::new(1024.0, 768.0);
    p.lives = 1;
    assert!(p.take_damage());
    assert_eq!(p.lives, 0);
    assert_eq!(p.invulnerable_timer, 0);
}

#[test]
fn add_life_respects_cap() {
    let mut p = Player::new(1024.0, 768.0);
    assert!(!p.add_life()); // already at max
    assert_eq!(p.lives, 3);
    p.lives = 1;
    assert!(p.add_life());
    assert_eq!(p.lives, 2);
}

#[test]
fn timers_tick_down_and_derived_flags_follow() {
    let mut p = Player::new(1024.0, 768.0);
    p.activate_shield();
    p.activate_rapid_fire();
    p.activate_multi_shot();
    p.activate_slow_time();
    assert!(p.has_shield() && p.has_rapid_fire() && p.has_multi_shot() && p.has_slow_time());

    for _ in 0..360 {
        p.update();
    }
    assert!(!p.has_slow_time()); // 360-tick timer just ran out
    assert!(p.has_shield() && p.has_rapid_fire() && p.has_multi_shot());
    assert_eq!(p.shield_timer, 240);

    for _ in 0..240 {
        p.update();
    }
    assert!(!p.has_shield() && !p.has_rapid_fire() && !p.has_multi_shot());
}

#[test]
fn fire_emits_single_missile_from_the_nose() {
    let mut p = Player::new(1024.0, 768.0);
    let missiles = p.fire(100);
    assert_eq!(missiles.len(), 1);
    assert_eq!(missiles[0].x, 512.0);
    assert_eq!(missiles[0].y, 673.0);
    assert_eq!(missiles[0].kind, MissileKind::Standard);
    assert_eq!(p.last_fire_frame, Some(100));
}

#[test]
fn fire_cooldown_blocks_then_releases() {
    let mut p = Player::new(1024.0, 768.0);
    assert_eq!(p.fire(100).len(), 1);
    assert!(p.fire(129).is_empty());
    assert_eq!(p.last_fire_frame, Some(100)); // blocked shot doesn't reset it
    assert_eq!(p.fire(130).len(), 1);
}

#[test]
fn rapid_fire_uses_short_cooldown_and_rapid_missiles() {
    let mut p = Player::new(1024.0, 768.0);
    p.activate_rapid_fire();
    assert_eq!(p.fire(100)[0].kind, MissileKind::Rapid);
    assert!(p.fire(105).is_empty());
    assert_eq!(p.fire(110).len(), 1);
}

#[test]
fn multi_shot_spread_geometry() {
    let mut p = Player::new(1024.0, 768.0);
    p.activate_multi_shot();
    p.velocity = 5.0;
    let missiles = p.fire(100);
    assert_eq!(missiles.len(), 3);
    assert_eq!(missiles[0].x, 497.0);
    assert_eq!(missiles[0].y, 673.0);
    assert_eq!(missiles[1].x, 512.0);
    assert_eq!(missiles[1].y, 668.0);
    assert_eq!(missiles[2].x, 527.0);
    // All three inherit half the ship's velocity
    assert!(missiles.iter().all(|m| m.vx == 2.5));
}
