//! Base plugin trait definition.
//!
//! Extractors and the embedding backend are long-lived components: built once at
//! startup, initialized when they are registered, and shut down when the server
//! stops. `Plugin` carries that lifecycle and the identifying metadata.

use crate::Result;

/// Lifecycle and identity shared by every pluggable component.
///
/// Implementations must be `Send + Sync`; a single instance serves all concurrent
/// requests and must not keep per-request state.
pub trait Plugin: Send + Sync {
    /// Unique, whitespace-free name used for registration and logging.
    fn name(&self) -> &str;

    fn version(&self) -> String;

    /// Called once when the plugin is registered.
    fn initialize(&self) -> Result<()>;

    /// Called once when the plugin is removed or the process shuts down.
    fn shutdown(&self) -> Result<()>;

    fn description(&self) -> &str {
        ""
    }
}
