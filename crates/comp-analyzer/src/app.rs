// Analysis orchestration.
//
// Runs one analysis end to end: validate the form values, post the match to
// the analysis service, and either reconcile its reply or fall back to the
// local classifier. Progress is reported through an optional event channel
// so the presentation layer never has to poll.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, warn};

use crate::analysis::heuristic;
use crate::analysis::reconcile::{reconcile, RemoteReply};
use crate::analysis::Analysis;
use crate::comp::player::{self, PlayerSelection};
use crate::comp::roster::Roster;
use crate::comp::ValidationError;
use crate::remote::client::RemoteClient;
pub use crate::remote::payload::AnalysisMode;
use crate::remote::payload::MatchRequest;

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// Form values for one analysis. Built fresh by the caller for every request.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeRequest {
    pub mode: AnalysisMode,
    pub blue: Roster,
    pub red: Roster,
    /// Read only in `PlayerStrategy` mode.
    pub player: PlayerSelection,
}

impl AnalyzeRequest {
    pub fn spectator(blue: Roster, red: Roster) -> Self {
        Self {
            mode: AnalysisMode::Spectator,
            blue,
            red,
            player: PlayerSelection::default(),
        }
    }

    pub fn player_strategy(blue: Roster, red: Roster, player: PlayerSelection) -> Self {
        Self {
            mode: AnalysisMode::PlayerStrategy,
            blue,
            red,
            player,
        }
    }
}

/// Where an analysis currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    Idle,
    Validating,
    Calling,
    Reconciling,
    Classifying,
    Done,
    Failed,
}

/// The result shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// The analysis service answered.
    Remote(RemoteReply),
    /// The service failed; this came from the local classifier (blue side only).
    LocalFallback(Analysis),
}

impl AnalysisOutcome {
    /// The structured analysis, if the outcome carries one.
    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            AnalysisOutcome::Remote(RemoteReply::Structured(a)) => Some(a),
            AnalysisOutcome::LocalFallback(a) => Some(a),
            AnalysisOutcome::Remote(_) => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, AnalysisOutcome::LocalFallback(_))
    }
}

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisEvent {
    PhaseChanged(AnalysisPhase),
    ValidationFailed(ValidationError),
    /// The service call failed and local analysis is being substituted.
    RemoteFailed { message: String },
    Finished(AnalysisOutcome),
}

#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Another analysis is still running on this orchestrator.
    #[error("an analysis is already in progress")]
    Busy,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("analysis endpoint is not configured")]
    NotConfigured,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Normalize both rosters and, in player strategy mode, validate the player.
///
/// Roster completeness is checked first; player details are only looked at
/// once both teams are full.
pub fn build_match_request(
    request: &AnalyzeRequest,
    timestamp: DateTime<Utc>,
) -> Result<MatchRequest, ValidationError> {
    let (Some(blue), Some(red)) = (request.blue.complete_picks(), request.red.complete_picks())
    else {
        return Err(ValidationError::MissingChampions);
    };

    match request.mode {
        AnalysisMode::Spectator => Ok(MatchRequest::spectator(blue, red, timestamp)),
        AnalysisMode::PlayerStrategy => {
            let ctx = player::validate(&request.player)?;
            Ok(MatchRequest::player_strategy(blue, red, ctx, timestamp))
        }
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Clears the busy flag when dropped, so every exit path releases it.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Sequences validation, the remote call, and reconciliation or fallback.
///
/// At most one analysis runs at a time per instance; a call made while
/// another is in flight returns `AnalyzeError::Busy` immediately.
pub struct Orchestrator {
    client: RemoteClient,
    busy: AtomicBool,
    phase: Mutex<AnalysisPhase>,
    events: Option<mpsc::Sender<AnalysisEvent>>,
}

impl Orchestrator {
    pub fn new(client: RemoteClient) -> Self {
        Self {
            client,
            busy: AtomicBool::new(false),
            phase: Mutex::new(AnalysisPhase::Idle),
            events: None,
        }
    }

    /// Report progress through `tx`.
    ///
    /// Events are offered without waiting: when the channel is full or closed
    /// the event is dropped, so a slow consumer never holds up an analysis.
    pub fn with_events(mut self, tx: mpsc::Sender<AnalysisEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Phase of the latest analysis. `Idle` until the first request arrives;
    /// afterwards the last phase reached, which is `Done` or `Failed` once a
    /// call has returned.
    pub fn phase(&self) -> AnalysisPhase {
        self.phase
            .lock()
            .map(|p| *p)
            .unwrap_or(AnalysisPhase::Idle)
    }

    /// Run one analysis.
    ///
    /// Validation and configuration problems are returned as errors and no
    /// request is sent. Once the service has been called, any failure
    /// (network, status, malformed body) is logged and replaced by the local
    /// classifier's verdict on the blue roster, so the result is always `Ok`.
    pub async fn analyze(&self, request: AnalyzeRequest) -> Result<AnalysisOutcome, AnalyzeError> {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            debug!("analysis already in flight, rejecting request");
            return Err(AnalyzeError::Busy);
        };

        self.set_phase(AnalysisPhase::Validating);

        let match_request = match build_match_request(&request, Utc::now()) {
            Ok(r) => r,
            Err(e) => {
                info!("Analysis request rejected: {}", e);
                self.emit(AnalysisEvent::ValidationFailed(e));
                self.set_phase(AnalysisPhase::Failed);
                return Err(AnalyzeError::Validation(e));
            }
        };

        if !self.client.is_configured() {
            warn!("Analysis endpoint not configured, request not sent");
            self.set_phase(AnalysisPhase::Failed);
            return Err(AnalyzeError::NotConfigured);
        }

        self.set_phase(AnalysisPhase::Calling);

        let outcome = match self.client.send(&match_request).await {
            Ok(reply) => {
                self.set_phase(AnalysisPhase::Reconciling);
                let reply = reconcile(&reply);
                info!("Analysis service replied ({})", reply.kind());
                AnalysisOutcome::Remote(reply)
            }
            Err(e) if !e.is_fallback_eligible() => {
                self.set_phase(AnalysisPhase::Failed);
                return Err(AnalyzeError::NotConfigured);
            }
            Err(e) => {
                warn!("Analysis service call failed, using local analysis: {}", e);
                self.emit(AnalysisEvent::RemoteFailed {
                    message: e.to_string(),
                });
                self.set_phase(AnalysisPhase::Classifying);
                AnalysisOutcome::LocalFallback(heuristic::classify(match_request.blue()))
            }
        };

        self.set_phase(AnalysisPhase::Done);
        self.emit(AnalysisEvent::Finished(outcome.clone()));
        Ok(outcome)
    }

    fn set_phase(&self, phase: AnalysisPhase) {
        debug!(?phase, "analysis phase");
        if let Ok(mut current) = self.phase.lock() {
            *current = phase;
        }
        self.emit(AnalysisEvent::PhaseChanged(phase));
    }

    fn emit(&self, event: AnalysisEvent) {
        let Some(tx) = &self.events else {
            return;
        };
        match tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                debug!(?event, "event channel full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comp::player::{LeaguePoints, Subdivision, Tier};
    use crate::comp::role::{Role, Side};

    fn full(names: [&str; 5]) -> Roster {
        Roster::from_names(&names).unwrap()
    }

    fn blue() -> Roster {
        full(["Malphite", "Ornn", "Azir", "Jinx", "Leona"])
    }

    fn red() -> Roster {
        full(["Darius", "Vi", "Ahri", "Ezreal", "Lulu"])
    }

    fn drain(rx: &mut mpsc::Receiver<AnalysisEvent>) -> Vec<AnalysisEvent> {
        let mut events = Vec::new();
        while let Ok(e) = rx.try_recv() {
            events.push(e);
        }
        events
    }

    fn phases(events: &[AnalysisEvent]) -> Vec<AnalysisPhase> {
        events
            .iter()
            .filter_map(|e| match e {
                AnalysisEvent::PhaseChanged(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn incomplete_roster_is_missing_champions() {
        let mut partial = blue();
        partial.set_pick(Role::Support, "  ");
        let err = build_match_request(&AnalyzeRequest::spectator(partial, red()), Utc::now())
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingChampions);

        let err = build_match_request(&AnalyzeRequest::spectator(blue(), Roster::empty()), Utc::now())
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingChampions);
    }

    #[test]
    fn roster_check_precedes_player_check() {
        let request =
            AnalyzeRequest::player_strategy(Roster::empty(), red(), PlayerSelection::default());
        assert_eq!(
            build_match_request(&request, Utc::now()).unwrap_err(),
            ValidationError::MissingChampions
        );
    }

    #[test]
    fn spectator_mode_ignores_player_selection() {
        let request = AnalyzeRequest::spectator(blue(), red());
        let built = build_match_request(&request, Utc::now()).unwrap();
        assert_eq!(built.mode(), AnalysisMode::Spectator);
        assert!(built.player().is_none());
        assert_eq!(built.blue().len(), 5);
    }

    #[test]
    fn player_mode_attaches_validated_context() {
        let selection = PlayerSelection {
            tier: Some(Tier::Emerald),
            subdivision: Subdivision::new(1),
            points: LeaguePoints::new(10),
            role: Role::Adc,
            side: Side::Blue,
        };
        let built =
            build_match_request(&AnalyzeRequest::player_strategy(blue(), red(), selection), Utc::now())
                .unwrap();
        assert_eq!(built.mode(), AnalysisMode::PlayerStrategy);
        let ctx = built.player().expect("player context");
        assert_eq!(ctx.full_tier_label(), "에메랄드 1단계");
        assert!(ctx.points().is_none());
    }

    #[test]
    fn player_mode_surfaces_validator_error() {
        let selection = PlayerSelection {
            tier: Some(Tier::Challenger),
            ..PlayerSelection::default()
        };
        let err =
            build_match_request(&AnalyzeRequest::player_strategy(blue(), red(), selection), Utc::now())
                .unwrap_err();
        assert_eq!(err, ValidationError::MissingPoints);
    }

    #[test]
    fn outcome_accessors() {
        let local = AnalysisOutcome::LocalFallback(heuristic::classify_names(&["Garen"][..]));
        assert!(local.is_local());
        assert!(local.analysis().is_some());

        let narrative = AnalysisOutcome::Remote(RemoteReply::Narrative("hi".into()));
        assert!(!narrative.is_local());
        assert!(narrative.analysis().is_none());
    }

    #[test]
    fn busy_guard_releases_on_drop() {
        let flag = AtomicBool::new(false);
        let guard = BusyGuard::acquire(&flag).expect("first acquire");
        assert!(flag.load(Ordering::SeqCst));
        assert!(BusyGuard::acquire(&flag).is_none());
        drop(guard);
        assert!(!flag.load(Ordering::SeqCst));
        assert!(BusyGuard::acquire(&flag).is_some());
    }

    #[tokio::test]
    async fn validation_failure_reaches_failed_and_clears_busy() {
        let (tx, mut rx) = mpsc::channel(32);
        let orchestrator =
            Orchestrator::new(RemoteClient::from_endpoint("http://127.0.0.1:9/hook")).with_events(tx);

        let err = orchestrator
            .analyze(AnalyzeRequest::spectator(blue(), Roster::empty()))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::Validation(ValidationError::MissingChampions)));
        assert!(!orchestrator.is_busy());

        let events = drain(&mut rx);
        assert_eq!(
            phases(&events),
            vec![AnalysisPhase::Validating, AnalysisPhase::Failed]
        );
        assert!(events.contains(&AnalysisEvent::ValidationFailed(
            ValidationError::MissingChampions
        )));
    }

    #[tokio::test]
    async fn unconfigured_endpoint_fails_without_fallback() {
        let (tx, mut rx) = mpsc::channel(32);
        let orchestrator = Orchestrator::new(RemoteClient::Disabled).with_events(tx);

        let err = orchestrator
            .analyze(AnalyzeRequest::spectator(blue(), red()))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::NotConfigured));
        assert!(!orchestrator.is_busy());

        let events = drain(&mut rx);
        assert_eq!(
            phases(&events),
            vec![AnalysisPhase::Validating, AnalysisPhase::Failed]
        );
        assert!(!events.iter().any(|e| matches!(e, AnalysisEvent::Finished(_))));
    }

    #[tokio::test]
    async fn transport_failure_falls_back_to_blue_roster() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (tx, mut rx) = mpsc::channel(32);
        let orchestrator =
            Orchestrator::new(RemoteClient::from_endpoint(&format!("http://{addr}"))).with_events(tx);

        let outcome = orchestrator
            .analyze(AnalyzeRequest::spectator(blue(), red()))
            .await
            .expect("fallback always yields an outcome");

        assert_eq!(
            outcome,
            AnalysisOutcome::LocalFallback(heuristic::classify_names(
                &["Malphite", "Ornn", "Azir", "Jinx", "Leona"][..]
            ))
        );
        assert_eq!(
            outcome.analysis().map(|a| a.archetype.as_str()),
            Some(heuristic::ARCHETYPE_TANK)
        );
        assert!(!orchestrator.is_busy());

        let events = drain(&mut rx);
        assert_eq!(
            phases(&events),
            vec![
                AnalysisPhase::Validating,
                AnalysisPhase::Calling,
                AnalysisPhase::Classifying,
                AnalysisPhase::Done
            ]
        );
        assert!(events
            .iter()
            .any(|e| matches!(e, AnalysisEvent::RemoteFailed { message } if message.starts_with("network error"))));
        assert_eq!(events.last(), Some(&AnalysisEvent::Finished(outcome)));
    }

    #[tokio::test]
    async fn stalled_event_consumer_does_not_hold_busy() {
        // Capacity one and never read: every event after the first is dropped.
        let (tx, mut rx) = mpsc::channel(1);
        let orchestrator = Orchestrator::new(RemoteClient::Disabled).with_events(tx);

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(500),
            orchestrator.analyze(AnalyzeRequest::spectator(blue(), red())),
        )
        .await
        .expect("analysis must not wait on the event consumer");
        assert!(matches!(result, Err(AnalyzeError::NotConfigured)));
        assert!(!orchestrator.is_busy());

        // The next call is not rejected as busy.
        let again = orchestrator
            .analyze(AnalyzeRequest::spectator(Roster::empty(), red()))
            .await;
        assert!(matches!(again, Err(AnalyzeError::Validation(_))));

        assert_eq!(
            drain(&mut rx),
            vec![AnalysisEvent::PhaseChanged(AnalysisPhase::Validating)]
        );
    }

    #[tokio::test]
    async fn closed_event_channel_is_ignored() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let orchestrator = Orchestrator::new(RemoteClient::Disabled).with_events(tx);
        let err = orchestrator
            .analyze(AnalyzeRequest::spectator(blue(), red()))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::NotConfigured));
        assert!(!orchestrator.is_busy());
    }

    #[tokio::test]
    async fn phase_starts_idle_and_ends_terminal() {
        let orchestrator = Orchestrator::new(RemoteClient::Disabled);
        assert_eq!(orchestrator.phase(), AnalysisPhase::Idle);

        let _ = orchestrator
            .analyze(AnalyzeRequest::spectator(Roster::empty(), red()))
            .await;
        assert_eq!(orchestrator.phase(), AnalysisPhase::Failed);
    }

    #[tokio::test]
    async fn phase_is_done_after_fallback() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let orchestrator = Orchestrator::new(RemoteClient::from_endpoint(&format!("http://{addr}")));
        let outcome = orchestrator
            .analyze(AnalyzeRequest::spectator(blue(), red()))
            .await
            .unwrap();
        assert!(outcome.is_local());
        assert_eq!(orchestrator.phase(), AnalysisPhase::Done);
    }

    #[tokio::test]
    async fn works_without_event_channel() {
        let orchestrator = Orchestrator::new(RemoteClient::Disabled);
        let err = orchestrator
            .analyze(AnalyzeRequest::spectator(Roster::empty(), Roster::empty()))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyzeError::Validation(_)));
    }
}
