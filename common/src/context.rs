use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// A cancellable scope shared by every task that should stop on shutdown.
///
/// Each clone keeps the scope alive: [`Handler::cancel`] only returns once all
/// clones have been dropped.
#[derive(Clone)]
pub struct Context {
	token: CancellationToken,
	_alive: mpsc::Sender<()>,
}

pub struct Handler {
	token: CancellationToken,
	alive: mpsc::Receiver<()>,
}

impl Context {
	#[must_use]
	pub fn new() -> (Self, Handler) {
		let token = CancellationToken::new();
		let (alive_send, alive_recv) = mpsc::channel(1);

		(
			Self {
				token: token.clone(),
				_alive: alive_send,
			},
			Handler {
				token,
				alive: alive_recv,
			},
		)
	}

	/// Resolves once the context has been cancelled.
	pub async fn done(&self) {
		self.token.cancelled().await
	}

	pub fn is_done(&self) -> bool {
		self.token.is_cancelled()
	}
}

impl Handler {
	/// Waits until every clone of the context has been dropped.
	pub async fn done(&mut self) {
		while self.alive.recv().await.is_some() {}
	}

	pub async fn cancel(mut self) {
		self.token.cancel();
		self.done().await;
	}
}

impl Drop for Handler {
	fn drop(&mut self) {
		self.token.cancel();
	}
}
