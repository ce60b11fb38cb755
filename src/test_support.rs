//! In-memory doubles for store, router, and app tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use uuid::Uuid;

use crate::roles::Role;
use crate::router::{Location, NavigationError, Navigator};
use crate::services::analytics::{Analytics, AnalyticsEvent};
use crate::services::directory::{AuthorizationRecord, Directory, DirectoryError};
use crate::services::identity::{IdentityError, IdentityProvider, IdentityRecord};
use crate::services::toast::ToastQueue;
use crate::state::session::SessionUser;
use crate::store::{AccessPolicy, Store};

// =============================================================================
// FIXTURES
// =============================================================================

/// An enrolled record with zeroed attendance.
pub fn record(email: &str, role: Role) -> AuthorizationRecord {
    AuthorizationRecord {
        id: Uuid::new_v4(),
        name: "Test User".to_owned(),
        email: email.to_owned(),
        role,
        section: "A".to_owned(),
        enrolled: true,
        present: 0,
        excused: 0,
        dishonest: 0,
        last_attended: None,
    }
}

pub fn session_user(email: &str, role: Role) -> SessionUser {
    SessionUser::from_records(&[record(email, role)]).expect("one record yields a user")
}

pub fn identity(email: &str) -> IdentityRecord {
    IdentityRecord { email: email.to_owned(), name: None }
}

// =============================================================================
// IDENTITY PROVIDER
// =============================================================================

/// Provider whose sign-in completes with `code` as the email when `state` is
/// `"ok"`.
pub struct FakeIdentity {
    current: watch::Sender<Option<IdentityRecord>>,
    pub sign_outs: AtomicUsize,
    pub fail_sign_in: AtomicBool,
    pub fail_sign_out: AtomicBool,
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self {
            current: watch::Sender::new(None),
            sign_outs: AtomicUsize::new(0),
            fail_sign_in: AtomicBool::new(false),
            fail_sign_out: AtomicBool::new(false),
        }
    }

    pub fn emit(&self, identity: Option<IdentityRecord>) {
        self.current.send_replace(identity);
    }

    pub fn sign_out_count(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for FakeIdentity {
    fn subscribe(&self) -> watch::Receiver<Option<IdentityRecord>> {
        self.current.subscribe()
    }

    async fn sign_in_with_redirect(&self) -> Result<String, IdentityError> {
        if self.fail_sign_in.load(Ordering::SeqCst) {
            return Err(IdentityError::Redirect("offline".into()));
        }
        Ok("https://idp.test/authorize?state=ok".to_owned())
    }

    async fn complete_sign_in(&self, code: &str, state: &str) -> Result<(), IdentityError> {
        if state != "ok" {
            return Err(IdentityError::StateMismatch);
        }
        self.emit(Some(identity(code)));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(IdentityError::SignOut("offline".into()));
        }
        self.current.send_if_modified(|c| c.take().is_some());
        Ok(())
    }
}

// =============================================================================
// DIRECTORY
// =============================================================================

#[derive(Default)]
pub struct MemoryDirectory {
    pub records: Mutex<Vec<AuthorizationRecord>>,
    pub fail: AtomicBool,
}

impl MemoryDirectory {
    pub fn with(records: Vec<AuthorizationRecord>) -> Self {
        Self { records: Mutex::new(records), fail: AtomicBool::new(false) }
    }
}

#[async_trait::async_trait]
impl Directory for MemoryDirectory {
    async fn records_for_email(&self, email: &str) -> Result<Vec<AuthorizationRecord>, DirectoryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DirectoryError::Query(sqlx::Error::PoolTimedOut));
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.email == email)
            .cloned()
            .collect())
    }
}

// =============================================================================
// ANALYTICS / NAVIGATION
// =============================================================================

#[derive(Default)]
pub struct RecordingAnalytics {
    pub events: Mutex<Vec<AnalyticsEvent>>,
}

impl RecordingAnalytics {
    pub fn names(&self) -> Vec<String> {
        self.events.lock().unwrap().iter().map(AnalyticsEvent::name).collect()
    }
}

impl Analytics for RecordingAnalytics {
    fn log_event(&self, event: AnalyticsEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Navigator that accepts every target as-is.
#[derive(Default)]
pub struct RecordingNavigator {
    pub pushes: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl Navigator for RecordingNavigator {
    async fn push(&self, to: &str) -> Result<Location, NavigationError> {
        self.pushes.lock().unwrap().push(to.to_owned());
        Ok(Location::parse(to))
    }
}

// =============================================================================
// HARNESS
// =============================================================================

pub struct Harness {
    pub identity: Arc<FakeIdentity>,
    pub directory: Arc<MemoryDirectory>,
    pub analytics: Arc<RecordingAnalytics>,
    pub toasts: Arc<ToastQueue>,
    pub store: Arc<Store>,
}

pub fn harness(records: Vec<AuthorizationRecord>) -> Harness {
    let identity = Arc::new(FakeIdentity::new());
    let directory = Arc::new(MemoryDirectory::with(records));
    let analytics = Arc::new(RecordingAnalytics::default());
    let toasts = Arc::new(ToastQueue::new());
    let store = Arc::new(Store::new(
        identity.clone(),
        directory.clone(),
        analytics.clone(),
        toasts.clone(),
        AccessPolicy::default(),
    ));
    Harness { identity, directory, analytics, toasts, store }
}
