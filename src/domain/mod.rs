//! Domain error types and the crate-wide `Result` alias.
//!
//! All fallible application operations return [`Result<T>`], which uses
//! [`PhiGuardError`]. Engine operations (registration, structured scrubbing)
//! return [`ScrubError`] directly and convert into `PhiGuardError` with `?`.
//!
//! ```rust
//! use phi_guard::domain::{PhiGuardError, Result, ScrubError};
//!
//! fn example() -> Result<()> {
//!     let failed: std::result::Result<(), ScrubError> = Ok(());
//!     failed?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::{PhiGuardError, ScrubError};
pub use result::Result;
