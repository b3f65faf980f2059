//! Notification sink capturing everything it receives.

use std::sync::{Arc, Mutex};

use chain_event_monitor::{
	models::{Alert, FinalReport, Report},
	services::notification::{CallbackNotifier, NotificationEvent, NotificationSink},
};

#[derive(Clone, Default)]
pub struct CapturedEvents(Arc<Mutex<Vec<NotificationEvent>>>);

impl CapturedEvents {
	pub fn alerts(&self) -> Vec<Alert> {
		self.0
			.lock()
			.unwrap()
			.iter()
			.filter_map(|event| match event {
				NotificationEvent::Alert(alert) => Some(alert.clone()),
				_ => None,
			})
			.collect()
	}

	pub fn final_reports(&self) -> Vec<FinalReport> {
		self.0
			.lock()
			.unwrap()
			.iter()
			.filter_map(|event| match event {
				NotificationEvent::Report(Report::Final(report)) => Some(report.clone()),
				_ => None,
			})
			.collect()
	}

	pub fn periodic_count(&self) -> usize {
		self.0
			.lock()
			.unwrap()
			.iter()
			.filter(|event| matches!(event, NotificationEvent::Report(Report::Periodic(_))))
			.count()
	}
}

/// Creates a sink and a handle to the events it captures
pub fn capturing_notifier() -> (Arc<dyn NotificationSink>, CapturedEvents) {
	let events = CapturedEvents::default();
	let sink = events.0.clone();
	let notifier = CallbackNotifier::new(move |event| sink.lock().unwrap().push(event));
	(Arc::new(notifier), events)
}
