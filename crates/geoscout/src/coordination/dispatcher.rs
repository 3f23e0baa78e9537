use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
    time::{Instant, sleep_until},
};
use tracing::{debug, trace};

use crate::model::QueryIntent;

/// Default idle period before a keystroke burst turns into a query.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// What to do with a submission that is empty after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyQueryPolicy {
    /// Emit it like any other text and let the consumer decide.
    #[default]
    Forward,
    /// Drop it silently (it still cancels any pending emission).
    Suppress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceConfig {
    pub delay: Duration,
    pub empty_query: EmptyQueryPolicy,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            delay: DEFAULT_DEBOUNCE_DELAY,
            empty_query: EmptyQueryPolicy::default(),
        }
    }
}

enum Command {
    Submit(QueryIntent),
    Reset,
}

/// Turns a keystroke stream into at most one [`QueryIntent`] per idle period.
///
/// A background task owns the timer. Every [`submit`](Self::submit) replaces the
/// pending text and restarts the delay; only the most recent text is ever
/// emitted. Dropping the dispatcher stops the task and closes the intent stream.
///
/// Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct DebouncedDispatcher {
    commands: UnboundedSender<Command>,
    sequence: Arc<AtomicU64>,
    task: JoinHandle<()>,
}

impl DebouncedDispatcher {
    /// Start the dispatcher and hand back the receiving end for the consumer.
    pub fn spawn(config: DebounceConfig) -> (Self, UnboundedReceiver<QueryIntent>) {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (intents, intent_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(run(config, command_rx, intents));

        let dispatcher = Self {
            commands,
            sequence: Arc::new(AtomicU64::new(0)),
            task,
        };
        (dispatcher, intent_rx)
    }

    /// Record `text` as the latest input and restart the delay.
    ///
    /// Returns the sequence number assigned to this submission.
    pub fn submit(&self, text: impl Into<String>) -> u64 {
        let sequence = self.sequence.fetch_add(1, Ordering::AcqRel) + 1;
        let intent = QueryIntent {
            text: text.into(),
            sequence,
        };
        trace!(sequence, "Query submitted");
        // The task only stops when `self` is dropped.
        let _ = self.commands.send(Command::Submit(intent));
        sequence
    }

    /// Cancel any pending emission without notifying the consumer.
    pub fn reset(&self) {
        let _ = self.commands.send(Command::Reset);
    }

    /// Sequence number of the newest submission (0 before the first one).
    pub fn latest_sequence(&self) -> u64 {
        self.sequence.load(Ordering::Acquire)
    }

    /// Shared view of the sequence counter, for consumers that outlive a borrow.
    pub fn sequence_handle(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.sequence)
    }
}

impl Drop for DebouncedDispatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    config: DebounceConfig,
    mut commands: UnboundedReceiver<Command>,
    intents: UnboundedSender<QueryIntent>,
) {
    let mut pending: Option<(QueryIntent, Instant)> = None;

    loop {
        let Some(deadline) = pending.as_ref().map(|(_, deadline)| *deadline) else {
            match commands.recv().await {
                Some(command) => pending = apply(command, config, None),
                None => return,
            }
            continue;
        };

        tokio::select! {
            biased;
            command = commands.recv() => match command {
                Some(command) => pending = apply(command, config, pending.take()),
                None => return,
            },
            () = sleep_until(deadline) => {
                if let Some((intent, _)) = pending.take() {
                    debug!(sequence = intent.sequence, "Emitting query intent");
                    if intents.send(intent).is_err() {
                        debug!("Query intent consumer went away; stopping dispatcher");
                        return;
                    }
                }
            }
        }
    }
}

fn apply(
    command: Command,
    config: DebounceConfig,
    pending: Option<(QueryIntent, Instant)>,
) -> Option<(QueryIntent, Instant)> {
    match command {
        Command::Reset => {
            if let Some((intent, _)) = pending {
                trace!(sequence = intent.sequence, "Pending query cancelled");
            }
            None
        }
        Command::Submit(intent)
            if config.empty_query == EmptyQueryPolicy::Suppress && intent.text.trim().is_empty() =>
        {
            trace!(sequence = intent.sequence, "Empty query suppressed");
            None
        }
        Command::Submit(intent) => Some((intent, Instant::now() + config.delay)),
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::{self, Instant};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_only_last_text() {
        let (dispatcher, mut intents) = DebouncedDispatcher::spawn(DebounceConfig::default());

        dispatcher.submit("u");
        dispatcher.submit("un");
        let last = dispatcher.submit("uni");

        let intent = intents.recv().await.unwrap();
        assert_eq!(intent.text, "uni");
        assert_eq!(intent.sequence, last);
        assert_eq!(dispatcher.latest_sequence(), 3);

        time::sleep(Duration::from_secs(5)).await;
        assert!(intents.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_submit_restarts_the_delay() {
        let (dispatcher, mut intents) = DebouncedDispatcher::spawn(DebounceConfig::default());
        let start = Instant::now();

        for text in ["b", "br", "bro", "broa"] {
            dispatcher.submit(text);
            time::sleep(Duration::from_millis(300)).await;
        }

        let intent = intents.recv().await.unwrap();
        assert_eq!(intent.text, "broa");
        // Last submit happened at 900ms, so the emission lands at 1400ms.
        assert_eq!(start.elapsed(), Duration::from_millis(1400));
        assert!(intents.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_pauses_emit_separately() {
        let (dispatcher, mut intents) = DebouncedDispatcher::spawn(DebounceConfig::default());

        dispatcher.submit("first");
        time::sleep(Duration::from_secs(1)).await;
        dispatcher.submit("second");

        assert_eq!(intents.recv().await.unwrap().text, "first");
        assert_eq!(intents.recv().await.unwrap().text, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_pending_emission() {
        let (dispatcher, mut intents) = DebouncedDispatcher::spawn(DebounceConfig::default());

        dispatcher.submit("cancel me");
        dispatcher.reset();
        time::sleep(Duration::from_secs(2)).await;
        assert!(intents.try_recv().is_err());

        dispatcher.submit("keep me");
        assert_eq!(intents.recv().await.unwrap().text, "keep me");
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_forwarded_by_default() {
        let (dispatcher, mut intents) = DebouncedDispatcher::spawn(DebounceConfig::default());

        dispatcher.submit("");
        assert_eq!(intents.recv().await.unwrap().text, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_query_suppressed_when_configured() {
        let config = DebounceConfig {
            empty_query: EmptyQueryPolicy::Suppress,
            ..DebounceConfig::default()
        };
        let (dispatcher, mut intents) = DebouncedDispatcher::spawn(config);

        dispatcher.submit("abc");
        dispatcher.submit("  ");
        time::sleep(Duration::from_secs(2)).await;
        assert!(intents.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_closes_intent_stream() {
        let (dispatcher, mut intents) = DebouncedDispatcher::spawn(DebounceConfig::default());
        dispatcher.submit("never");
        drop(dispatcher);

        assert!(intents.recv().await.is_none());
    }
}
