use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use ledger_domain::{Transaction, TransactionError, TransactionRequest, TransactionResult};
use ledger_engine::{HistoryProcessor, ProcessorState};
use ledger_store::TransactionStore;
use tokio::sync::RwLock;

/// Owns the mutable ledger state, the monotonic id counter, and the durable
/// store, and is the only thing in the service that ever takes the state
/// lock. Pure queries take the read side; everything else takes the write
/// side, and the classification is by action tag alone (`is_pure_query`),
/// never by the outcome.
pub struct Envelope<S: TransactionStore> {
    state: RwLock<ProcessorState>,
    next_id: AtomicU64,
    store: S,
}

impl<S: TransactionStore> Envelope<S> {
    pub fn new(store: S, state: ProcessorState, next_id: u64) -> Self {
        Self { state: RwLock::new(state), next_id: AtomicU64::new(next_id), store }
    }

    /// External entry point: rejects a request with no `access_token`
    /// before any lock is taken.
    pub async fn apply_untrusted(
        &self,
        request: TransactionRequest,
    ) -> Result<TransactionResult, TransactionError> {
        if request.access_token.is_none() {
            return Err(TransactionError::Unauthorized);
        }
        self.apply_trusted(request).await
    }

    /// Internal entry point, used e.g. to bootstrap the root token at boot.
    /// Skips the token-presence gate; the processor's own authentication
    /// still runs.
    pub async fn apply_trusted(
        &self,
        request: TransactionRequest,
    ) -> Result<TransactionResult, TransactionError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let transaction = Transaction::stamp(request, id, now_utc());
        let history = HistoryProcessor::new(&self.store);

        if transaction.action.is_pure_query() {
            let state = self.state.read().await;
            history.apply(&transaction, &state).map(|(_, result)| result)
        } else {
            let mut state = self.state.write().await;
            let (next, result) = history.apply(&transaction, &state)?;
            *state = next;
            Ok(result)
        }
    }
}

fn now_utc() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("system clock before epoch").as_nanos()
}
