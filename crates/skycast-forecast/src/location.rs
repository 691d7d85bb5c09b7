//! Location resolution: turns platform permission/fix events into a forecast query.
//!
//! Resolution never fails outward. Denial, restriction, platform errors and an
//! event source that goes away all collapse to the fallback place name.

use async_trait::async_trait;
use tokio::sync::mpsc;

/// Place used whenever no location fix is available.
pub const DEFAULT_LOCATION: &str = "Moscow";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `"<lat>,<lon>"` as accepted by the `q` parameter.
    pub fn to_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Events reported by the platform location service
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    /// Permission has not been decided yet and the user is being asked.
    PermissionPrompted,
    AuthorizationGranted,
    AuthorizationDenied,
    AuthorizationRestricted,
    FixReceived(Coordinates),
    Failed(String),
}

/// Resolution state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LocationState {
    #[default]
    NotDetermined,
    Requesting,
    Granted(Coordinates),
    Denied,
}

impl LocationState {
    /// Pure transition function.
    pub fn transition(self, event: LocationEvent) -> Self {
        match (self, event) {
            // Terminal states ignore further events.
            (Self::Granted(c), _) => Self::Granted(c),
            (Self::Denied, _) => Self::Denied,

            (_, LocationEvent::FixReceived(c)) => Self::Granted(c),
            (_, LocationEvent::AuthorizationDenied)
            | (_, LocationEvent::AuthorizationRestricted) => Self::Denied,
            (_, LocationEvent::Failed(_)) => Self::Denied,
            (Self::NotDetermined, LocationEvent::PermissionPrompted) => Self::NotDetermined,
            (_, LocationEvent::AuthorizationGranted) | (Self::Requesting, _) => Self::Requesting,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Granted(_) | Self::Denied)
    }

    /// Query for a terminal state; `None` while still pending.
    pub fn resolved_query(&self, fallback: &str) -> Option<String> {
        match self {
            Self::Granted(c) => Some(c.to_query()),
            Self::Denied => Some(fallback.to_string()),
            Self::NotDetermined | Self::Requesting => None,
        }
    }
}

/// Produces the query string handed to the forecast client.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    async fn resolve(&self) -> String;
}

/// Always resolves to the same query.
#[derive(Debug, Clone)]
pub struct StaticLocation {
    query: String,
}

impl StaticLocation {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

impl Default for StaticLocation {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATION)
    }
}

#[async_trait]
impl LocationResolver for StaticLocation {
    async fn resolve(&self) -> String {
        self.query.clone()
    }
}

/// Drives [`LocationState`] from a stream of platform events.
///
/// Once a terminal state is reached it is remembered, so later `resolve`
/// calls return the same query. A resolve dropped mid-wait keeps the
/// receiver and any progress for the next call.
pub struct EventDrivenResolver {
    inner: tokio::sync::Mutex<ResolverState>,
    fallback: String,
}

struct ResolverState {
    /// `None` once the platform side has closed the channel
    events: Option<mpsc::Receiver<LocationEvent>>,
    state: LocationState,
}

impl EventDrivenResolver {
    pub fn new(events: mpsc::Receiver<LocationEvent>, fallback: impl Into<String>) -> Self {
        Self {
            inner: tokio::sync::Mutex::new(ResolverState {
                events: Some(events),
                state: LocationState::default(),
            }),
            fallback: fallback.into(),
        }
    }

    /// Last observed state.
    pub async fn state(&self) -> LocationState {
        self.inner.lock().await.state
    }

    /// Create a resolver plus the sender a platform adapter reports into.
    pub fn channel(fallback: impl Into<String>) -> (mpsc::Sender<LocationEvent>, Self) {
        let (tx, rx) = mpsc::channel(8);
        (tx, Self::new(rx, fallback))
    }
}

#[async_trait]
impl LocationResolver for EventDrivenResolver {
    async fn resolve(&self) -> String {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;

        if let Some(query) = inner.state.resolved_query(&self.fallback) {
            tracing::debug!("Reusing resolved location query: {}", query);
            return query;
        }

        let Some(rx) = inner.events.as_mut() else {
            tracing::debug!("Location events closed, using fallback");
            return self.fallback.clone();
        };

        while let Some(event) = rx.recv().await {
            tracing::debug!("Location event {:?} in state {:?}", event, inner.state);
            if let LocationEvent::Failed(reason) = &event {
                tracing::warn!("Location error: {}", reason);
            }
            inner.state = inner.state.transition(event);
            if let Some(query) = inner.state.resolved_query(&self.fallback) {
                tracing::info!("Resolved location query: {}", query);
                return query;
            }
        }

        tracing::warn!("Location events ended in {:?}, using fallback", inner.state);
        inner.events = None;
        self.fallback.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moscow() -> Coordinates {
        Coordinates::new(55.7558, 37.6173)
    }

    #[test]
    fn test_coordinates_query() {
        assert_eq!(moscow().to_query(), "55.7558,37.6173");
    }

    #[test]
    fn test_grant_then_fix() {
        let s = LocationState::NotDetermined
            .transition(LocationEvent::PermissionPrompted)
            .transition(LocationEvent::AuthorizationGranted);
        assert_eq!(s, LocationState::Requesting);
        let s = s.transition(LocationEvent::FixReceived(moscow()));
        assert_eq!(s, LocationState::Granted(moscow()));
        assert_eq!(
            s.resolved_query("Moscow").as_deref(),
            Some("55.7558,37.6173")
        );
    }

    #[test]
    fn test_denied_and_restricted_fall_back() {
        for event in [
            LocationEvent::AuthorizationDenied,
            LocationEvent::AuthorizationRestricted,
            LocationEvent::Failed("kCLErrorLocationUnknown".into()),
        ] {
            let s = LocationState::Requesting.transition(event);
            assert_eq!(s, LocationState::Denied);
            assert_eq!(s.resolved_query("Moscow").as_deref(), Some("Moscow"));
        }
    }

    #[test]
    fn test_terminal_states_are_sticky() {
        let granted = LocationState::Granted(moscow());
        assert_eq!(
            granted.transition(LocationEvent::AuthorizationDenied),
            granted
        );
        assert_eq!(
            LocationState::Denied.transition(LocationEvent::FixReceived(moscow())),
            LocationState::Denied
        );
    }

    #[test]
    fn test_pending_states_have_no_query() {
        assert!(LocationState::NotDetermined.resolved_query("x").is_none());
        assert!(LocationState::Requesting.resolved_query("x").is_none());
        assert!(!LocationState::Requesting.is_terminal());
    }

    #[tokio::test]
    async fn test_static_location() {
        assert_eq!(StaticLocation::default().resolve().await, "Moscow");
        assert_eq!(StaticLocation::new("Paris").resolve().await, "Paris");
    }

    #[tokio::test]
    async fn test_event_driven_fix() {
        let (tx, resolver) = EventDrivenResolver::channel(DEFAULT_LOCATION);
        tx.send(LocationEvent::AuthorizationGranted).await.unwrap();
        tx.send(LocationEvent::FixReceived(moscow())).await.unwrap();
        assert_eq!(resolver.resolve().await, "55.7558,37.6173");
    }

    #[tokio::test]
    async fn test_event_driven_closed_channel_falls_back() {
        let (tx, resolver) = EventDrivenResolver::channel("Berlin");
        tx.send(LocationEvent::PermissionPrompted).await.unwrap();
        drop(tx);
        assert_eq!(resolver.resolve().await, "Berlin");
        // Second resolve has no events left.
        assert_eq!(resolver.resolve().await, "Berlin");
        assert_eq!(resolver.state().await, LocationState::NotDetermined);
    }

    #[tokio::test]
    async fn test_event_driven_keeps_granted_fix() {
        let (tx, resolver) = EventDrivenResolver::channel(DEFAULT_LOCATION);
        tx.send(LocationEvent::AuthorizationGranted).await.unwrap();
        tx.send(LocationEvent::FixReceived(moscow())).await.unwrap();

        assert_eq!(resolver.resolve().await, "55.7558,37.6173");
        drop(tx);
        assert_eq!(resolver.resolve().await, "55.7558,37.6173");
        assert_eq!(resolver.state().await, LocationState::Granted(moscow()));
    }

    #[tokio::test]
    async fn test_event_driven_keeps_denial() {
        let (tx, resolver) = EventDrivenResolver::channel("Berlin");
        tx.send(LocationEvent::AuthorizationDenied).await.unwrap();
        assert_eq!(resolver.resolve().await, "Berlin");

        // Events after a terminal state don't change the answer.
        tx.send(LocationEvent::FixReceived(moscow())).await.unwrap();
        assert_eq!(resolver.resolve().await, "Berlin");
    }

    #[tokio::test]
    async fn test_dropped_resolve_keeps_progress() {
        let (tx, resolver) = EventDrivenResolver::channel(DEFAULT_LOCATION);
        tx.send(LocationEvent::AuthorizationGranted).await.unwrap();

        let pending =
            tokio::time::timeout(std::time::Duration::from_millis(50), resolver.resolve()).await;
        assert!(pending.is_err());
        assert_eq!(resolver.state().await, LocationState::Requesting);

        tx.send(LocationEvent::FixReceived(moscow())).await.unwrap();
        assert_eq!(resolver.resolve().await, "55.7558,37.6173");
    }
}
