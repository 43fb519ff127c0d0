//! SonataLink Flow - Setup wizard for linking a Sonata hub
//!
//! Implements the two-step setup flow as an explicit state machine:
//!
//! 1. **`User`**: collect the hub's network address.
//! 2. **`Link`**: confirm, then pair with the hub. Pairing polls the hub
//!    client for a token until the user approves the extension on the hub,
//!    or a timeout elapses.
//!
//! Failures never abort the flow: the current form is redisplayed with an
//! error code and can be resubmitted.
//!
//! # Example
//!
//! ```no_run
//! use sonatalink_client::SimulatedHub;
//! use sonatalink_flow::{SetupFlow, StepInput, StepOutcome};
//! use std::time::Duration;
//!
//! async fn example() {
//!     let hub = SimulatedHub::grants("secret", Duration::from_secs(10));
//!     let mut flow = SetupFlow::new(hub);
//!
//!     let _host_form = flow.step(None).await;
//!     flow.step(Some(StepInput::User { host: "192.168.1.50".into() })).await;
//!
//!     match flow.step(Some(StepInput::Link)).await {
//!         StepOutcome::CreateEntry { info, .. } => println!("paired with {}", info.host),
//!         StepOutcome::Form(form) => println!("failed: {:?}", form.error),
//!     }
//! }
//! ```

pub mod auth;
pub mod error;
pub mod flow;

pub use auth::{authenticate, AuthError, AuthResult, AUTH_TIMEOUT, POLL_INTERVAL};
pub use error::ErrorCode;
pub use flow::{app_info, FieldSpec, Form, SetupFlow, StepId, StepInput, StepOutcome};
