//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per fixed step.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

/// Wall-clock delta clamp fed to the accumulator (avoids the
/// spiral-of-death after a stall).
pub const MAX_FRAME_DELTA: f32 = 0.1;

// --- Playfield (portrait design resolution) ---

pub const VIEW_W: f32 = 390.0;
pub const VIEW_H: f32 = 844.0;

/// Player position clamp margin from the playfield edges.
pub const PLAYER_MARGIN: f32 = 14.0;

/// Player spawn height as a fraction of the playfield.
pub const PLAYER_SPAWN_Y_FRAC: f32 = 0.82;

// --- Player ---

pub const PLAYER_HIT_W: f32 = 18.0;
pub const PLAYER_HIT_H: f32 = 22.0;

/// Invincibility window granted after taking a hit.
pub const PLAYER_INVINCIBLE_SECS: f32 = 1.5;

/// Shorter grace window after a shield absorbs a hit.
pub const SHIELD_GRACE_SECS: f32 = 0.5;

pub const MAX_FIRE_LEVEL: u8 = 5;

/// Base magnet attraction radius.
pub const MAGNET_RANGE: f32 = 150.0;

/// Speed at which a magnetized powerup seeks the player.
pub const MAGNET_ATTRACT_SPEED: f32 = 300.0;

/// Fan angles available to the spread powerup pattern.
pub const SPREAD_ANGLES: [f32; 5] = [-0.25, -0.12, 0.0, 0.12, 0.25];

pub const SPREAD_BULLET_SPEED: f32 = 400.0;

/// Vertical offset from the player center to the muzzle.
pub const MUZZLE_OFFSET: f32 = 14.0;

// --- Bullets ---

pub const PLAYER_BULLET_HIT_W: f32 = 5.0;
pub const PLAYER_BULLET_HIT_H: f32 = 10.0;
pub const ENEMY_BULLET_HIT: f32 = 6.0;

/// Off-screen margin beyond which bullets are removed.
pub const BULLET_OFFSCREEN_PAD: f32 = 20.0;

// --- Enemies ---

/// Aimed enemy bullet speed.
pub const ENEMY_BULLET_SPEED: f32 = 180.0;

/// Enemies only fire inside the band between y=0 and this fraction of
/// the playfield height.
pub const ENEMY_COMBAT_BAND_FRAC: f32 = 0.7;

/// Off-screen margin beyond which enemies are removed.
pub const ENEMY_OFFSCREEN_PAD: f32 = 60.0;

pub const ENEMY_SPAWN_Y: f32 = -30.0;

pub const ENEMY_CONTACT_DAMAGE: i32 = 1;

// --- Boss ---

pub const BOSS_SPAWN_Y: f32 = -80.0;
pub const BOSS_TARGET_Y: f32 = 100.0;
pub const BOSS_INTRO_SECS: f32 = 2.0;
pub const BOSS_CONTACT_DAMAGE: i32 = 2;

/// Base bullet speed for boss attack patterns.
pub const BOSS_BULLET_SPEED: f32 = 160.0;

/// Horizontal oscillation range as a fraction of the playfield width.
pub const BOSS_MOVE_RANGE_FRAC: f32 = 0.35;

pub const BOSS_LASER_SPEED: f32 = 220.0;
pub const BOSS_LASER_BURST: u32 = 8;
pub const BOSS_LASER_INTERVAL: f32 = 0.06;
pub const BOSS_LASER_ANGLE_STEP: f32 = 0.04;

pub const BOSS_TELEPORT_COOLDOWN: f32 = 8.0;
pub const BOSS_SUMMON_COOLDOWN: f32 = 12.0;
pub const BOSS_SHIELD_COOLDOWN: f32 = 15.0;
pub const BOSS_SHIELD_DURATION: f32 = 4.0;

// --- Powerups ---

pub const POWERUP_HIT: f32 = 24.0;
pub const POWERUP_FALL_SPEED: f32 = 60.0;
pub const POWERUP_LIFETIME_SECS: f32 = 8.0;
pub const POWERUP_OFFSCREEN_PAD: f32 = 30.0;

/// Flat boss damage dealt by the bomb powerup.
pub const BOMB_BOSS_DAMAGE: f32 = 15.0;

/// Hp restored by the heal powerup.
pub const HEAL_AMOUNT: i32 = 2;

// --- Score ---

/// Rolling window within which kills extend the combo.
pub const COMBO_WINDOW_SECS: f32 = 2.0;

/// Multiplier gains one step per this many combo kills.
pub const COMBO_STEP: u32 = 5;

pub const MULTIPLIER_STEP: f32 = 0.5;
pub const MULTIPLIER_CAP: f32 = 5.0;

// --- Waves ---

pub const WAVE_ANNOUNCE_SECS: f32 = 1.5;
pub const WAVE_CLEAR_SECS: f32 = 2.0;

/// Difficulty multiplier gained per full cycle of the wave table.
pub const DIFFICULTY_STEP: f32 = 0.25;

/// Fraction of the difficulty surplus applied to enemy speed.
pub const DIFFICULTY_SPEED_FACTOR: f32 = 0.3;

/// Horizontal margin used by spawn formations.
pub const FORMATION_MARGIN: f32 = 40.0;

// --- Session sequencing ---

pub const DEATH_SEQUENCE_SECS: f32 = 2.5;

/// Chapter banner duration before it auto-dismisses.
pub const CHAPTER_TRANSITION_SECS: f32 = 3.0;
