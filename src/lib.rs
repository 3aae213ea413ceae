pub mod config;
pub mod ffi;
pub mod log;
pub mod session;

pub use config::BridgeConfig;
// Re-export session types for hosts and tests
pub use session::{
    create_session, shared_session, AudioSession, BridgedAudioSession, Category, CategoryOptions,
    Mode, NativeAccessor, NullDriver, SessionDriver, SessionError, SessionSnapshot,
    SetActiveOptions, StandInAudioSession,
};
