//! # till-register
//!
//! Wires `till-core` to disk: configuration, logging, the snapshot store and
//! CSV delivery.
//!
//! ## Module Organization
//! ```text
//! till_register/
//! ├── lib.rs          ◄─── You are here
//! ├── config.rs       ◄─── RegisterConfig (defaults → TOML → env)
//! ├── telemetry.rs    ◄─── tracing subscriber setup
//! ├── register.rs     ◄─── Register: cart, ledger, commit, exports
//! ├── sink.rs         ◄─── ExportSink / DirectorySink
//! └── error.rs        ◄─── RegisterError
//! ```
//!
//! ## Startup Sequence
//! 1. `telemetry::init_tracing()`
//! 2. `RegisterConfig::load(None)`
//! 3. `Register::open(&config)` restores cart and ledger from `data_dir`

pub mod config;
pub mod error;
pub mod register;
pub mod sink;
pub mod telemetry;

pub use config::RegisterConfig;
pub use error::{RegisterError, RegisterResult};
pub use register::Register;
pub use sink::{DirectorySink, ExportSink};
