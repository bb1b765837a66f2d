//! Entity kinds. Each holds its own state struct and a per-tick
//! `update(dt, ..)`; spawned bullets, summons, and feedback events are
//! appended to caller-provided buffers rather than pushed through a
//! back-reference to the session.

pub mod boss;
pub mod bullet;
pub mod enemy;
pub mod player;
pub mod powerup;

pub use boss::Boss;
pub use bullet::Bullet;
pub use enemy::Enemy;
pub use player::Player;
pub use powerup::PowerUp;
