use tokio::task;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::Instrument;

/// Keeps track of background work (login verifications) so it can be cancelled and awaited on
/// shutdown.
#[derive(Debug, Default, Clone)]
pub(crate) struct TaskManager
{
	#[debug("{}", tasks.len())]
	tasks: TaskTracker,

	#[debug(skip)]
	cancellation_token: CancellationToken,
}

impl TaskManager
{
	/// A token that is cancelled once [`TaskManager::shutdown()`] is called.
	pub(crate) fn cancellation_token(&self) -> CancellationToken
	{
		self.cancellation_token.child_token()
	}

	/// Spawns a task that runs inside `span`.
	///
	/// Returns `None` if the manager is already shutting down.
	pub(crate) fn spawn<F>(
		&self,
		span: tracing::Span,
		make_task: impl FnOnce(CancellationToken) -> F,
	) -> Option<task::JoinHandle<()>>
	where
		F: Future<Output = ()> + Send + 'static,
	{
		if self.tasks.is_closed() {
			tracing::warn!("not spawning task because we are shutting down");
			return None;
		}

		let current_span = tracing::Span::current();

		if !current_span.is_disabled() {
			span.follows_from(current_span);
		}

		let task = make_task(self.cancellation_token.child_token()).instrument(span);

		Some(self.tasks.spawn(task))
	}

	#[tracing::instrument(level = "debug")]
	pub(crate) async fn shutdown(self)
	{
		self.tasks.close();
		tracing::trace!("closed task tracker");

		self.cancellation_token.cancel();
		tracing::trace!("cancelled tasks");

		self.tasks.wait().await;
		tracing::trace!("all tasks have exited");
	}
}
