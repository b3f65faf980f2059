//! Monitor lifecycle controller.
//!
//! [`BlockMonitor`] owns startup, reconnection and coordinated shutdown:
//!
//! ```text
//! Idle -> Running -> (Reconnecting -> Running)* -> Stopped
//! ```
//!
//! Three tasks run while the monitor is up: the ingestion session (which also drives
//! reconnects), the periodic reporter and the listener. All of them observe a single
//! `watch` channel for cancellation. The listener runs the stop sequence when the
//! shutdown signal fires or the session gives up on the transport, so the monitor
//! reaches `Stopped` without a caller having to wait on it.

mod reconnect;

pub use reconnect::{backoff_delays, reconnect, Reconnect};

use std::{future::Future, sync::Arc, time::Duration};
use tokio::{
	sync::{watch, Mutex},
	task::JoinHandle,
	time::{timeout_at, Instant},
};

use crate::{
	models::{ConfigError, ConfigLoader, FinalReport, MonitorConfig, ReconnectPolicy, Report},
	services::{
		aggregator::{SharedAggregator, StatsAggregator},
		alert::AlertEngine,
		blockchain::BlockChainClient,
		blockwatcher::{BlockIngestor, BlockWatcherError, HeadSubscription, HeadTransport, SessionEnd},
		notification::NotificationSink,
		reporter::Reporter,
	},
};

/// Lifecycle states of a monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
	Idle,
	Running,
	Reconnecting,
	Stopped,
}

/// How a monitoring session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorOutcome {
	/// Shutdown was requested
	Shutdown,
	/// The transport failed and could not be re-established
	TransportFailed { reason: String },
}

/// Supervises a single monitoring session
pub struct BlockMonitor<C> {
	transport: Arc<dyn HeadTransport>,
	reconnect_policy: ReconnectPolicy,
	aggregator: SharedAggregator,
	ingestor: Mutex<Option<BlockIngestor<C>>>,
	control: Arc<Control>,
}

/// Shutdown machinery shared between the monitor handle and its listener task
struct Control {
	reporter: Reporter,
	shutdown_grace: Duration,
	state: watch::Sender<MonitorState>,
	shutdown: watch::Sender<bool>,
	outcome: watch::Sender<Option<MonitorOutcome>>,
	tasks: Mutex<Vec<JoinHandle<()>>>,
	final_report: Mutex<Option<FinalReport>>,
}

impl<C: BlockChainClient + 'static> BlockMonitor<C> {
	/// Creates an idle monitor.
	///
	/// `client` is used for block fetches; `transport` delivers head notifications.
	///
	/// # Errors
	/// Returns a `ValidationError` if `config` does not pass validation.
	pub fn new(
		config: &MonitorConfig,
		client: C,
		transport: Arc<dyn HeadTransport>,
		alerts: AlertEngine,
		notifier: Arc<dyn NotificationSink>,
	) -> Result<Self, ConfigError> {
		config.validate()?;

		let aggregator = StatsAggregator::new(config.history_capacity, chrono::Utc::now()).shared();
		let reporter = Reporter::new(
			aggregator.clone(),
			notifier.clone(),
			Duration::from_secs(config.report_interval_secs),
		);
		let ingestor = BlockIngestor::new(
			client,
			aggregator.clone(),
			Arc::new(alerts),
			notifier,
			Duration::from_millis(config.fetch_timeout_ms),
		);

		Ok(Self {
			transport,
			reconnect_policy: config.reconnect.clone(),
			aggregator,
			ingestor: Mutex::new(Some(ingestor)),
			control: Arc::new(Control {
				reporter,
				shutdown_grace: Duration::from_millis(config.shutdown_grace_ms),
				state: watch::channel(MonitorState::Idle).0,
				shutdown: watch::channel(false).0,
				outcome: watch::channel(None).0,
				tasks: Mutex::new(Vec::new()),
				final_report: Mutex::new(None),
			}),
		})
	}

	pub fn state(&self) -> MonitorState {
		*self.control.state.borrow()
	}

	/// Receiver observing every state transition
	pub fn subscribe_state(&self) -> watch::Receiver<MonitorState> {
		self.control.state.subscribe()
	}

	pub fn aggregator(&self) -> SharedAggregator {
		self.aggregator.clone()
	}

	/// Acquires the transport and launches the monitoring tasks.
	///
	/// `shutdown_signal` may be any future; its first completion stops the monitor.
	///
	/// # Errors
	/// Returns a `StateError` if the monitor was already started. If the transport
	/// cannot be acquired the monitor is stopped (emitting the final report) and the
	/// acquisition error is returned.
	pub async fn start<F>(&self, shutdown_signal: F) -> Result<(), BlockWatcherError>
	where
		F: Future<Output = ()> + Send + 'static,
	{
		let control = &self.control;
		let started = control.state.send_if_modified(|state| {
			if *state == MonitorState::Idle {
				*state = MonitorState::Running;
				true
			} else {
				false
			}
		});
		if !started {
			return Err(BlockWatcherError::state_error(
				format!("Monitor cannot be started from state {:?}", self.state()),
				None,
				None,
			));
		}

		let ingestor = self.ingestor.lock().await.take().ok_or_else(|| {
			BlockWatcherError::state_error("Monitor was already started", None, None)
		})?;

		tracing::info!(mode = ?self.transport.mode(), "Starting block monitor");
		let subscription = match self.transport.acquire().await {
			Ok(subscription) => subscription,
			Err(error) => {
				control.set_outcome(MonitorOutcome::TransportFailed {
					reason: error.to_string(),
				});
				control.stop().await;
				return Err(error);
			}
		};

		let session = tokio::spawn(run_session(Session {
			ingestor,
			subscription,
			transport: self.transport.clone(),
			policy: self.reconnect_policy.clone(),
			shutdown: control.shutdown.subscribe(),
			control: control.clone(),
		}));

		let reporter = tokio::spawn(control.reporter.clone().run(control.shutdown.subscribe()));
		control.tasks.lock().await.extend([session, reporter]);

		// Not tracked in `tasks`: the listener may itself be running `stop`.
		let listener = control.clone();
		tokio::spawn(async move {
			let mut stopped = listener.shutdown.subscribe();
			let mut outcome = listener.outcome.subscribe();
			tokio::select! {
				_ = shutdown_signal => {
					tracing::info!("Shutdown signal received, stopping monitor");
					listener.stop().await;
				}
				_ = async { let _ = outcome.wait_for(|outcome| matches!(outcome, Some(MonitorOutcome::TransportFailed { .. }))).await; } => {
					tracing::error!("Head transport lost for good, stopping monitor");
					listener.stop().await;
				}
				_ = async { let _ = stopped.wait_for(|stopped| *stopped).await; } => {}
			}
		});

		tracing::info!("Block monitor running");
		Ok(())
	}

	/// Waits until the session ends, stops the monitor and returns how it ended.
	pub async fn wait(&self) -> MonitorOutcome {
		let mut outcome = self.control.outcome.subscribe();
		let result = match outcome.wait_for(|outcome| outcome.is_some()).await {
			Ok(outcome) => outcome.clone(),
			Err(_) => None,
		};
		self.control.stop().await;
		result.unwrap_or(MonitorOutcome::Shutdown)
	}

	/// Stops the monitor and returns the final report.
	///
	/// Signals shutdown, gives the tasks `shutdown_grace` to finish and aborts the
	/// rest, which also releases the subscription. The final report is emitted once;
	/// later calls return the cached report without emitting anything.
	pub async fn stop(&self) -> FinalReport {
		self.control.stop().await
	}
}

impl Control {
	async fn stop(&self) -> FinalReport {
		let mut cached = self.final_report.lock().await;
		if let Some(report) = cached.as_ref() {
			return report.clone();
		}

		self.shutdown.send_replace(true);

		let tasks = std::mem::take(&mut *self.tasks.lock().await);
		let deadline = Instant::now() + self.shutdown_grace;
		for mut task in tasks {
			if timeout_at(deadline, &mut task).await.is_err() {
				tracing::warn!("Task did not stop within the grace period, aborting");
				task.abort();
			}
		}

		let report = self.reporter.final_report().await;
		self.reporter.emit(Report::Final(report.clone())).await;

		self.set_outcome(MonitorOutcome::Shutdown);
		self.state.send_replace(MonitorState::Stopped);
		tracing::info!(blocks = report.block_count, "Block monitor stopped");

		*cached = Some(report.clone());
		report
	}

	/// Records how the session ended; only the first outcome sticks
	fn set_outcome(&self, value: MonitorOutcome) {
		self.outcome.send_if_modified(|current| {
			if current.is_none() {
				*current = Some(value);
				true
			} else {
				false
			}
		});
	}
}

struct Session<C> {
	ingestor: BlockIngestor<C>,
	subscription: HeadSubscription,
	transport: Arc<dyn HeadTransport>,
	policy: ReconnectPolicy,
	shutdown: watch::Receiver<bool>,
	control: Arc<Control>,
}

/// Runs ingestion sessions back to back, reconnecting between them, until shutdown
/// or until the reconnect policy gives up.
async fn run_session<C: BlockChainClient + 'static>(session: Session<C>) {
	let Session {
		mut ingestor,
		mut subscription,
		transport,
		policy,
		mut shutdown,
		control,
	} = session;

	let result = loop {
		let end = ingestor
			.run(&mut subscription.notifications, &mut shutdown)
			.await;
		subscription.handle.unsubscribe();

		let error = match end {
			SessionEnd::Shutdown => break MonitorOutcome::Shutdown,
			SessionEnd::TransportFailed(error) => error,
		};

		tracing::warn!(
			error = %error,
			last_block = ?ingestor.last_block(),
			"Head subscription lost"
		);
		control.state.send_replace(MonitorState::Reconnecting);

		match reconnect(transport.as_ref(), &policy, &mut shutdown).await {
			Reconnect::Acquired(next) => {
				subscription = next;
				control.state.send_if_modified(|current| {
					if *current == MonitorState::Reconnecting {
						*current = MonitorState::Running;
						true
					} else {
						false
					}
				});
			}
			Reconnect::Shutdown => break MonitorOutcome::Shutdown,
			Reconnect::GaveUp => {
				break MonitorOutcome::TransportFailed {
					reason: error.to_string(),
				}
			}
		}
	};

	tracing::debug!(outcome = ?result, "Ingestion session finished");
	control.set_outcome(result);
}
