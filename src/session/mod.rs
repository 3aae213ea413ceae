// Session module - Apple audio session bridge
//
// Layers, each a straight pass-through:
// - driver: narrow seam over the OS audio session singleton (raw strings/bits)
// - native: string-level accessor the C boundary calls; logs instead of erroring
// - backend/bridge/stand_in: enum-level `AudioSession` interface and its two
//   implementations, picked once at startup
// - identifiers: fixed enum <-> platform string tables
// - snapshot: sorted-key JSON read of the whole session
//
//  host ──► AudioSession ──► NativeAccessor ──► SessionDriver ──► AVAudioSession
//            (enums)            (strings)         (raw bits)

pub mod backend;
pub mod bridge;
pub mod driver;
pub mod error;
pub mod identifiers;
pub mod native;
pub mod snapshot;
pub mod stand_in;
pub mod types;

// Platform-specific modules
#[cfg(avaudiosession)]
pub mod avaudiosession;

// Re-export commonly used types
pub use backend::{create_session, shared_session, AudioSession};
pub use bridge::BridgedAudioSession;
pub use driver::{NullDriver, PlatformDriver, SessionDriver};
pub use error::{Result, SessionError};
pub use identifiers::{parse_option_list, verify_tables, ParsedOptions};
pub use native::NativeAccessor;
pub use snapshot::SessionSnapshot;
pub use stand_in::StandInAudioSession;
pub use types::{
    Category, CategoryOptions, HardwareInfo, Mode, OsFeature, RouteDescription, RoutePort,
    SessionFlags, SetActiveOptions,
};

#[cfg(avaudiosession)]
pub use avaudiosession::AvAudioSessionDriver;
