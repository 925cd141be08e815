//! Per-instance mailbox and execution loop.
//!
//! Every activated instance runs in its own task and drains a bounded
//! mailbox. The mailbox is the only way to reach the instance state, so
//! method executions on one instance never overlap and run in the order
//! their invocations were enqueued.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use super::InvokeError;
use crate::actor::{Actor, ActorContext, Args, CapabilityTable};

// =============================================================================
// Messages
// =============================================================================

/// One queued method invocation.
pub(crate) struct Invocation {
    method: String,
    args: Args,
    reply: oneshot::Sender<Result<Value, InvokeError>>,
}

// =============================================================================
// Actor Handle
// =============================================================================

/// Handle for sending invocations to one actor instance.
#[derive(Clone)]
pub struct ActorHandle {
    /// Sender for the instance mailbox.
    tx: mpsc::Sender<Invocation>,

    /// Instance id for logging.
    instance_id: Arc<str>,
}

impl ActorHandle {
    /// Enqueue an invocation and wait for the method to run to completion.
    pub async fn invoke(
        &self,
        method: impl Into<String>,
        args: Args,
    ) -> Result<Value, InvokeError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Invocation {
                method: method.into(),
                args,
                reply,
            })
            .await
            .map_err(|_| InvokeError::Stopped)?;

        rx.await.map_err(|_| InvokeError::Stopped)?
    }

    /// Get the instance id.
    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Returns true if both handles reach the same activation.
    pub fn same_instance(&self, other: &ActorHandle) -> bool {
        self.tx.same_channel(&other.tx)
    }
}

impl std::fmt::Debug for ActorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorHandle")
            .field("instance_id", &self.instance_id)
            .finish()
    }
}

// =============================================================================
// Instance Loop
// =============================================================================

/// Activate a fresh instance of `A` on `tasks` and return a handle to its
/// mailbox.
pub(crate) fn spawn_instance<A: Actor>(
    tasks: &mut JoinSet<()>,
    instance_id: &str,
    table: Arc<CapabilityTable<A>>,
    mailbox_size: usize,
) -> ActorHandle {
    let (tx, rx) = mpsc::channel(mailbox_size);
    let ctx = ActorContext::new(instance_id, A::TYPE_NAME);

    tasks.spawn(run_instance_loop(A::default(), table, rx, ctx));

    ActorHandle {
        tx,
        instance_id: Arc::from(instance_id),
    }
}

/// Run the instance loop until every handle to the mailbox is gone.
async fn run_instance_loop<A: Actor>(
    mut actor: A,
    table: Arc<CapabilityTable<A>>,
    mut rx: mpsc::Receiver<Invocation>,
    mut ctx: ActorContext,
) {
    actor.on_activate(&ctx).await;
    debug!(
        instance_id = %ctx.instance_id,
        actor_type = ctx.actor_type,
        "Actor instance started"
    );

    while let Some(Invocation {
        method,
        args,
        reply,
    }) = rx.recv().await
    {
        ctx.invocations += 1;

        let result = match table.resolve(&method) {
            None => Err(InvokeError::UndefinedMethod),
            Some(handler) => {
                // A panicking body fails only its own invocation.
                match AssertUnwindSafe(handler(&mut actor, args, &ctx))
                    .catch_unwind()
                    .await
                {
                    Ok(result) => result.map_err(InvokeError::from),
                    Err(_) => {
                        error!(
                            instance_id = %ctx.instance_id,
                            method = %method,
                            "Actor method panicked"
                        );
                        Err(InvokeError::Panicked)
                    }
                }
            }
        };

        if reply.send(result).is_err() {
            debug!(
                instance_id = %ctx.instance_id,
                method = %method,
                "Caller went away before the reply was delivered"
            );
        }
    }

    actor.on_deactivate(&ctx).await;

    info!(
        instance_id = %ctx.instance_id,
        actor_type = ctx.actor_type,
        invocations = ctx.invocations,
        "Actor instance stopped"
    );
}
