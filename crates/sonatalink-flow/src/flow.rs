//! The setup wizard state machine
//!
//! Two steps: `User` collects the hub's network address, `Link` confirms
//! and runs the pairing. Each call to [`SetupFlow::step`] either redisplays
//! a form or completes the flow with the data for a new configuration entry.

use crate::auth::authenticate;
use crate::error::ErrorCode;
use sonatalink_client::{AppInfo, Connect};
use sonatalink_core::{ConnectionInfo, DEFAULT_NAME};
use tracing::{debug, error, warn};

/// Wizard steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepId {
    /// Collect the hub's network address
    User,
    /// Confirm and pair with the hub
    Link,
}

impl StepId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::User => "user",
            StepId::Link => "link",
        }
    }
}

/// A single text field on a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
}

/// Form returned to the UI layer for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    /// Which step this form belongs to
    pub step: StepId,
    /// Fields to render; empty for a bare confirmation form
    pub fields: Vec<FieldSpec>,
    /// Error annotation from the previous submission, if any
    pub error: Option<ErrorCode>,
}

impl Form {
    fn user(error: Option<ErrorCode>) -> Self {
        Self {
            step: StepId::User,
            fields: vec![FieldSpec {
                name: "host",
                required: true,
            }],
            error,
        }
    }

    fn link(error: Option<ErrorCode>) -> Self {
        Self {
            step: StepId::Link,
            fields: Vec::new(),
            error,
        }
    }
}

/// Input submitted for a step
#[derive(Debug, Clone)]
pub enum StepInput {
    /// Submission of the host form
    User { host: String },
    /// Confirmation of the link form
    Link,
}

/// Result of advancing the flow one step
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// Display (or redisplay) a form
    Form(Form),
    /// Flow finished; persist this as a new configuration entry
    CreateEntry {
        title: String,
        info: ConnectionInfo,
    },
}

/// Setup wizard flow for linking one hub
pub struct SetupFlow<C: Connect> {
    connector: C,
    app: AppInfo,
    state: StepId,
    host: Option<String>,
}

impl<C: Connect> SetupFlow<C> {
    /// Create a flow that pairs through `connector`
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            app: app_info(),
            state: StepId::User,
            host: None,
        }
    }

    /// Step the flow is currently on
    pub fn step_id(&self) -> StepId {
        self.state
    }

    /// Advance the flow: `None` shows the current form, `Some` submits it
    pub async fn step(&mut self, input: Option<StepInput>) -> StepOutcome {
        match self.state {
            StepId::User => self.step_user(input),
            StepId::Link => self.step_link(input).await,
        }
    }

    fn step_user(&mut self, input: Option<StepInput>) -> StepOutcome {
        match input {
            Some(StepInput::User { host }) => {
                // Host validity is only checked when pairing; any value
                // moves the flow forward.
                self.host = Some(host.trim().to_string());
                self.state = StepId::Link;
                StepOutcome::Form(Form::link(None))
            }
            Some(other) => {
                debug!("Ignoring {:?} submitted to the user step", other);
                StepOutcome::Form(Form::user(None))
            }
            None => StepOutcome::Form(Form::user(None)),
        }
    }

    async fn step_link(&mut self, input: Option<StepInput>) -> StepOutcome {
        match input {
            Some(StepInput::Link) => self.link().await,
            Some(other) => {
                debug!("Ignoring {:?} submitted to the link step", other);
                StepOutcome::Form(Form::link(None))
            }
            None => StepOutcome::Form(Form::link(None)),
        }
    }

    async fn link(&mut self) -> StepOutcome {
        let host = match self.host.clone() {
            Some(host) => host,
            None => {
                error!("Link step reached without a host");
                self.state = StepId::User;
                return StepOutcome::Form(Form::user(Some(ErrorCode::Unknown)));
            }
        };

        match authenticate(&self.connector, &self.app, &host).await {
            Ok(token) => StepOutcome::CreateEntry {
                title: DEFAULT_NAME.to_string(),
                info: ConnectionInfo::new(host, token),
            },
            Err(err) => {
                let code = ErrorCode::from(&err);
                match code {
                    ErrorCode::Unknown => {
                        error!("Unexpected failure pairing with {}: {}", host, err)
                    }
                    _ => warn!("Pairing with {} failed: {}", host, err),
                }
                StepOutcome::Form(Form::link(Some(code)))
            }
        }
    }
}

/// Identity presented to the hub during pairing
pub fn app_info() -> AppInfo {
    AppInfo {
        extension_id: "sonatalink".to_string(),
        display_name: "SonataLink Smart Home Integration".to_string(),
        display_version: env!("CARGO_PKG_VERSION").to_string(),
        publisher: "Sonata Labs".to_string(),
        email: "hello@sonatalabs.io".to_string(),
        website: "https://sonatalabs.io".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AUTH_TIMEOUT;
    use sonatalink_client::{ClientError, ClientResult, SimulatedClient, SimulatedHub};
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    async fn advance_to_link<C: Connect>(flow: &mut SetupFlow<C>, host: &str) {
        match flow.step(Some(StepInput::User { host: host.to_string() })).await {
            StepOutcome::Form(form) => {
                assert_eq!(form.step, StepId::Link);
                assert!(form.error.is_none());
            }
            other => panic!("expected link form, got {:?}", other),
        }
    }

    fn form_of(outcome: StepOutcome) -> Form {
        match outcome {
            StepOutcome::Form(form) => form,
            other => panic!("expected form, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_form_requests_host() {
        let mut flow = SetupFlow::new(SimulatedHub::silent());
        let form = form_of(flow.step(None).await);

        assert_eq!(form.step, StepId::User);
        assert_eq!(form.fields.len(), 1);
        assert_eq!(form.fields[0].name, "host");
        assert!(form.fields[0].required);
        assert!(form.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_happy_path_creates_entry() {
        let hub = SimulatedHub::grants("secret-token", Duration::from_secs(10));
        let mut flow = SetupFlow::new(hub);

        advance_to_link(&mut flow, " 192.168.1.50 ").await;
        match flow.step(Some(StepInput::Link)).await {
            StepOutcome::CreateEntry { title, info } => {
                assert_eq!(title, DEFAULT_NAME);
                assert_eq!(info.host, "192.168.1.50");
                assert_eq!(info.token.as_str(), "secret-token");
            }
            other => panic!("expected entry, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_any_host_transitions_to_link() {
        let mut flow = SetupFlow::new(SimulatedHub::silent());
        advance_to_link(&mut flow, "not even an address").await;
        assert_eq!(flow.step_id(), StepId::Link);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_redisplays_link_with_cannot_connect() {
        let mut flow = SetupFlow::new(SimulatedHub::silent());
        advance_to_link(&mut flow, "192.168.1.50").await;

        let start = Instant::now();
        let form = form_of(flow.step(Some(StepInput::Link)).await);
        assert_eq!(form.step, StepId::Link);
        assert_eq!(form.error, Some(ErrorCode::CannotConnect));
        assert!(start.elapsed() >= AUTH_TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refused_connect_maps_to_cannot_connect() {
        let mut flow = SetupFlow::new(SimulatedHub::refusing());
        advance_to_link(&mut flow, "192.168.1.50").await;

        let form = form_of(flow.step(Some(StepInput::Link)).await);
        assert_eq!(form.error, Some(ErrorCode::CannotConnect));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_token_maps_to_invalid_auth() {
        let mut flow = SetupFlow::new(SimulatedHub::grants("", Duration::ZERO));
        advance_to_link(&mut flow, "192.168.1.50").await;

        let form = form_of(flow.step(Some(StepInput::Link)).await);
        assert_eq!(form.step, StepId::Link);
        assert_eq!(form.error, Some(ErrorCode::InvalidAuth));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_input_redisplays_current_form() {
        let mut flow = SetupFlow::new(SimulatedHub::silent());

        let form = form_of(flow.step(Some(StepInput::Link)).await);
        assert_eq!(form.step, StepId::User);
        assert!(form.error.is_none());
        assert_eq!(flow.step_id(), StepId::User);
    }

    /// Connector that refuses the first connection attempt, then behaves
    /// like the wrapped hub
    struct FlakyHub {
        attempts: Arc<AtomicUsize>,
        inner: SimulatedHub,
    }

    impl Connect for FlakyHub {
        type Client = SimulatedClient;

        fn connect(
            &self,
            app: &AppInfo,
            token_store: Option<&Path>,
            host: &str,
        ) -> ClientResult<SimulatedClient> {
            if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(ClientError::Connect("hub still booting".to_string()));
            }
            self.inner.connect(app, token_store, host)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_link_can_be_retried() {
        let hub = FlakyHub {
            attempts: Arc::new(AtomicUsize::new(0)),
            inner: SimulatedHub::grants("tok-3", Duration::ZERO),
        };
        let mut flow = SetupFlow::new(hub);
        advance_to_link(&mut flow, "192.168.1.50").await;

        let form = form_of(flow.step(Some(StepInput::Link)).await);
        assert_eq!(form.error, Some(ErrorCode::CannotConnect));

        // Resubmitting the same form succeeds once the hub comes up
        match flow.step(Some(StepInput::Link)).await {
            StepOutcome::CreateEntry { info, .. } => {
                assert_eq!(info.token.as_str(), "tok-3")
            }
            other => panic!("expected entry, got {:?}", other),
        }
    }

    /// Connector whose clients fail polls with an unclassified error
    struct BrokenHub;

    struct BrokenClient;

    impl Connect for BrokenHub {
        type Client = BrokenClient;

        fn connect(
            &self,
            _app: &AppInfo,
            _token_store: Option<&Path>,
            _host: &str,
        ) -> ClientResult<BrokenClient> {
            Ok(BrokenClient)
        }
    }

    impl sonatalink_client::HubClient for BrokenClient {
        fn token(&self) -> ClientResult<Option<String>> {
            Err(ClientError::Other("SDK worker died".to_string()))
        }

        fn stop(self) {}
    }

    #[tokio::test(start_paused = true)]
    async fn test_unclassified_failure_maps_to_unknown() {
        let mut flow = SetupFlow::new(BrokenHub);
        advance_to_link(&mut flow, "192.168.1.50").await;

        let form = form_of(flow.step(Some(StepInput::Link)).await);
        assert_eq!(form.error, Some(ErrorCode::Unknown));
    }
}
