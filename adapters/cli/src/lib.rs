#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless host for Out of Angkorwat: configuration, the per-tick session
//! pipeline, presentation collaborators and a scripted autopilot.

mod autopilot;
mod config;
mod hud;
mod navigation;
mod session;

pub use autopilot::Autopilot;
pub use config::{ArenaSection, ConfigError, GameConfig, MazeSection, SessionSection};
pub use hud::{HealthBand, HpBar, LoggingAudio};
pub use session::{Frame, Session};
