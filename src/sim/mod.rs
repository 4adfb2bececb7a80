//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module renders or touches
//! the platform:
//! - Time only advances through `tick`
//! - Seeded RNG only (one `Pcg32` per run)
//! - Entities update in a fixed order each frame

pub mod boss;
pub mod collision;
pub mod deferred;
pub mod enemy;
pub mod health;
pub mod item;
pub mod player;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod weapon;

pub use boss::{AttackPattern, Boss, BossKind, BossPhase, MovePattern, PendingShot, StaggeredShot};
pub use collision::{Circle, circles_overlap, nearest_within};
pub use deferred::DeferredQueue;
pub use enemy::{Enemy, EnemySpawner};
pub use health::{Damageable, Health};
pub use item::{Item, ItemKind, ItemSpawner};
pub use player::{Player, TimedBuff, WeaponGrant};
pub use projectile::{BossProjectile, BossProjectileKind, Projectile};
pub use state::{EntityIds, GamePhase, GameState};
pub use tick::{MovementKeys, TickInput, tick};
pub use weapon::{Weapon, WeaponKind};
