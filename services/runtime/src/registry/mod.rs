//! Actor registry: lazy activation and explicit deactivation.
//!
//! The registry owns the mapping from instance id to live instance. An id is
//! never declared up front; the first invocation that names it activates a
//! fresh instance. Deactivation removes the mapping immediately, so the next
//! invocation for the same id starts again from default state.
//!
//! Instances are local to this process. Two runtime replicas that both see
//! traffic for one id hold two unrelated instances; keeping an id on one
//! replica is the job of the session-aware router in front of the runtime.

mod instance;

use std::collections::HashMap;
use std::sync::Arc;

use kactor_protocol::InvocationError;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::actor::{Actor, Args, CapabilityError, MethodError};

pub use instance::ActorHandle;

/// Default mailbox capacity per instance.
pub const DEFAULT_MAILBOX_SIZE: usize = 64;

// =============================================================================
// Errors
// =============================================================================

/// Errors returned by an invocation routed through the registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvokeError {
    /// The method is not in the actor type's capability table.
    #[error("undefined method")]
    UndefinedMethod,

    /// The method body returned an error.
    #[error(transparent)]
    Method(#[from] MethodError),

    /// The method body panicked.
    #[error("actor method panicked")]
    Panicked,

    /// The instance task is gone.
    #[error("actor instance stopped")]
    Stopped,
}

impl From<InvokeError> for InvocationError {
    fn from(err: InvokeError) -> Self {
        match err {
            InvokeError::UndefinedMethod => InvocationError::UndefinedMethod,
            InvokeError::Method(e) => InvocationError::Method(e.0),
            InvokeError::Panicked | InvokeError::Stopped => InvocationError::internal(),
        }
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Registry configuration.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Invocations that may wait in one instance's mailbox before callers
    /// start waiting for space.
    pub mailbox_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            mailbox_size: DEFAULT_MAILBOX_SIZE,
        }
    }
}

type Spawner = Box<dyn Fn(&mut JoinSet<()>, &str) -> ActorHandle + Send + Sync>;

/// In-process mapping from instance id to actor instance.
pub struct Registry {
    /// Actor type hosted by this registry.
    actor_type: &'static str,

    /// Method names of the actor type.
    methods: Vec<&'static str>,

    /// Live instances by id.
    instances: Mutex<HashMap<String, ActorHandle>>,

    /// Instance tasks, including deactivated ones still draining.
    tasks: Mutex<JoinSet<()>>,

    /// Activates a fresh instance for an id.
    spawn: Spawner,
}

impl Registry {
    /// Create an empty registry hosting actor type `A`.
    ///
    /// The capability table of `A` is built and validated here, once.
    pub fn new<A: Actor>(config: RegistryConfig) -> Result<Self, CapabilityError> {
        let table = Arc::new(A::capabilities()?);
        let methods = table.method_names();
        let mailbox_size = config.mailbox_size.max(1);

        info!(
            actor_type = A::TYPE_NAME,
            methods = ?methods,
            mailbox_size,
            "Registered actor type"
        );

        let spawn: Spawner = Box::new(move |tasks: &mut JoinSet<()>, instance_id: &str| {
            instance::spawn_instance::<A>(tasks, instance_id, Arc::clone(&table), mailbox_size)
        });

        Ok(Self {
            actor_type: A::TYPE_NAME,
            methods,
            instances: Mutex::new(HashMap::new()),
            tasks: Mutex::new(JoinSet::new()),
            spawn,
        })
    }

    /// Return the instance for `instance_id`, activating it if absent.
    pub async fn activate(&self, instance_id: &str) -> ActorHandle {
        let mut instances = self.instances.lock().await;
        if let Some(handle) = instances.get(instance_id) {
            return handle.clone();
        }

        let handle = {
            let mut tasks = self.tasks.lock().await;
            // Reap instances that have already stopped.
            while tasks.try_join_next().is_some() {}
            (self.spawn)(&mut *tasks, instance_id)
        };
        instances.insert(instance_id.to_string(), handle.clone());

        info!(
            instance_id = %instance_id,
            actor_type = self.actor_type,
            active = instances.len(),
            "Activated actor instance"
        );

        handle
    }

    /// Remove and discard the instance for `instance_id`.
    ///
    /// Returns whether an instance was active. Deactivating an unknown id is
    /// not an error. Invocations already queued on the removed instance
    /// still run against its state before it stops.
    pub async fn deactivate(&self, instance_id: &str) -> bool {
        let removed = self.instances.lock().await.remove(instance_id);

        match removed {
            Some(_) => {
                info!(instance_id = %instance_id, "Deactivated actor instance");
                true
            }
            None => {
                debug!(instance_id = %instance_id, "Deactivation of inactive instance");
                false
            }
        }
    }

    /// Activate `instance_id` if needed and run `method` on it.
    pub async fn invoke(
        &self,
        instance_id: &str,
        method: &str,
        args: Args,
    ) -> Result<Value, InvokeError> {
        self.activate(instance_id).await.invoke(method, args).await
    }

    /// Deactivate every instance. Returns how many were active.
    pub async fn deactivate_all(&self) -> usize {
        let drained = std::mem::take(&mut *self.instances.lock().await);
        if !drained.is_empty() {
            info!(count = drained.len(), "Deactivated all actor instances");
        }
        drained.len()
    }

    /// Deactivate every instance and wait until each has drained its
    /// mailbox and run its deactivation hook. Returns how many were active.
    ///
    /// Instances still referenced by an in-flight invocation keep running
    /// until that invocation returns.
    pub async fn shutdown(&self) -> usize {
        let discarded = self.deactivate_all().await;

        let mut tasks = std::mem::replace(&mut *self.tasks.lock().await, JoinSet::new());
        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                error!(error = %e, "Actor instance task failed");
            }
        }

        discarded
    }

    /// Number of active instances.
    pub async fn active_count(&self) -> usize {
        self.instances.lock().await.len()
    }

    /// Returns true if `instance_id` is active.
    pub async fn contains(&self, instance_id: &str) -> bool {
        self.instances.lock().await.contains_key(instance_id)
    }

    /// Actor type name.
    pub fn actor_type(&self) -> &'static str {
        self.actor_type
    }

    /// Method names exposed by the actor type.
    pub fn methods(&self) -> &[&'static str] {
        &self.methods
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("actor_type", &self.actor_type)
            .field("methods", &self.methods)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActorContext, CapabilityTable, MethodResult};
    use async_trait::async_trait;
    use futures_util::future::{join_all, BoxFuture, FutureExt};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct Counter {
        count: i64,
        log: Vec<Value>,
    }

    #[async_trait]
    impl Actor for Counter {
        const TYPE_NAME: &'static str = "Counter";

        fn capabilities() -> Result<CapabilityTable<Self>, CapabilityError> {
            CapabilityTable::builder()
                .method("incr", Self::incr)
                .method("count", Self::count)
                .method("append", Self::append)
                .method("log", Self::log)
                .method("fail", Self::fail)
                .method("explode", Self::explode)
                .method("sleep", Self::sleep)
                .build()
        }
    }

    impl Counter {
        /// Read-modify-write split by a suspension point.
        fn incr<'a>(
            &'a mut self,
            _args: Args,
            _ctx: &'a ActorContext,
        ) -> BoxFuture<'a, MethodResult> {
            async move {
                let current = self.count;
                tokio::task::yield_now().await;
                self.count = current + 1;
                Ok(json!(self.count))
            }
            .boxed()
        }

        fn count<'a>(
            &'a mut self,
            _args: Args,
            _ctx: &'a ActorContext,
        ) -> BoxFuture<'a, MethodResult> {
            async move { Ok(json!(self.count)) }.boxed()
        }

        fn append<'a>(
            &'a mut self,
            mut args: Args,
            _ctx: &'a ActorContext,
        ) -> BoxFuture<'a, MethodResult> {
            async move {
                self.log.push(args.take(0));
                Ok(Value::Null)
            }
            .boxed()
        }

        fn log<'a>(
            &'a mut self,
            _args: Args,
            _ctx: &'a ActorContext,
        ) -> BoxFuture<'a, MethodResult> {
            async move { Ok(Value::Array(self.log.clone())) }.boxed()
        }

        /// Mutates state, then fails.
        fn fail<'a>(
            &'a mut self,
            _args: Args,
            _ctx: &'a ActorContext,
        ) -> BoxFuture<'a, MethodResult> {
            async move {
                self.count += 100;
                Err(MethodError::new("counter overflow"))
            }
            .boxed()
        }

        fn explode<'a>(
            &'a mut self,
            _args: Args,
            _ctx: &'a ActorContext,
        ) -> BoxFuture<'a, MethodResult> {
            async move {
                self.count += 1;
                if self.count > 0 {
                    panic!("boom");
                }
                Ok(Value::Null)
            }
            .boxed()
        }

        fn sleep<'a>(
            &'a mut self,
            args: Args,
            _ctx: &'a ActorContext,
        ) -> BoxFuture<'a, MethodResult> {
            async move {
                let millis: u64 = args.parse(0)?;
                tokio::time::sleep(Duration::from_millis(millis)).await;
                Ok(Value::Null)
            }
            .boxed()
        }
    }

    fn registry() -> Registry {
        Registry::new::<Counter>(RegistryConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_activate_is_idempotent() {
        let registry = registry();
        let first = registry.activate("a1").await;
        let second = registry.activate("a1").await;

        assert!(first.same_instance(&second));
        assert_eq!(registry.active_count().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_ids_are_isolated() {
        let registry = registry();
        let a = registry.activate("a1").await;
        let b = registry.activate("b1").await;
        assert!(!a.same_instance(&b));

        registry.invoke("a1", "incr", Args::default()).await.unwrap();
        registry.invoke("a1", "incr", Args::default()).await.unwrap();

        assert_eq!(registry.invoke("a1", "count", Args::default()).await.unwrap(), json!(2));
        assert_eq!(registry.invoke("b1", "count", Args::default()).await.unwrap(), json!(0));
    }

    #[tokio::test]
    async fn test_deactivate_discards_state() {
        let registry = registry();
        registry.invoke("a1", "incr", Args::default()).await.unwrap();

        assert!(registry.deactivate("a1").await);
        assert!(!registry.contains("a1").await);

        assert_eq!(registry.invoke("a1", "count", Args::default()).await.unwrap(), json!(0));
    }

    #[tokio::test]
    async fn test_deactivate_unknown_is_noop() {
        let registry = registry();
        assert!(!registry.deactivate("never-seen").await);
        assert!(!registry.deactivate("never-seen").await);
        assert_eq!(registry.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_undefined_method_still_activates() {
        let registry = registry();
        let err = registry.invoke("a1", "bogus", Args::default()).await.unwrap_err();

        assert_eq!(err, InvokeError::UndefinedMethod);
        assert!(registry.contains("a1").await);
    }

    #[tokio::test]
    async fn test_method_error_keeps_partial_state() {
        let registry = registry();
        let err = registry.invoke("a1", "fail", Args::default()).await.unwrap_err();

        assert_eq!(err, InvokeError::Method(MethodError::new("counter overflow")));
        assert_eq!(registry.invoke("a1", "count", Args::default()).await.unwrap(), json!(100));
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let registry = registry();
        let err = registry.invoke("a1", "explode", Args::default()).await.unwrap_err();
        assert_eq!(err, InvokeError::Panicked);

        // The instance survives with the state the body left behind.
        assert_eq!(registry.invoke("a1", "count", Args::default()).await.unwrap(), json!(1));
        assert_eq!(registry.invoke("b1", "incr", Args::default()).await.unwrap(), json!(1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_instance_is_serialized() {
        let registry = Arc::new(registry());

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.invoke("a1", "incr", Args::default()).await })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(registry.invoke("a1", "count", Args::default()).await.unwrap(), json!(50));
    }

    #[tokio::test]
    async fn test_fifo_per_instance() {
        let registry = registry();
        let handle = registry.activate("a1").await;

        let calls = (0..20).map(|i| handle.invoke("append", Args::new(vec![json!(i)])));
        join_all(calls).await;

        let expected: Vec<Value> = (0..20).map(|i| json!(i)).collect();
        assert_eq!(
            registry.invoke("a1", "log", Args::default()).await.unwrap(),
            Value::Array(expected)
        );
    }

    #[tokio::test]
    async fn test_distinct_instances_run_concurrently() {
        let registry = registry();
        let slow = registry.invoke("a1", "sleep", Args::new(vec![json!(5_000)]));
        let fast = registry.invoke("b1", "count", Args::default());

        tokio::select! {
            _ = slow => panic!("slow instance finished first"),
            value = fast => assert_eq!(value.unwrap(), json!(0)),
        }
    }

    #[tokio::test]
    async fn test_queued_invocation_survives_deactivation() {
        let registry = registry();
        let handle = registry.activate("a1").await;
        registry.deactivate("a1").await;

        // The old activation still answers callers holding its handle.
        assert_eq!(handle.invoke("incr", Args::default()).await.unwrap(), json!(1));
        assert_eq!(registry.invoke("a1", "count", Args::default()).await.unwrap(), json!(0));
    }

    #[tokio::test]
    async fn test_deactivate_all() {
        let registry = registry();
        registry.activate("a1").await;
        registry.activate("b1").await;

        assert_eq!(registry.deactivate_all().await, 2);
        assert_eq!(registry.active_count().await, 0);
    }

    static STOPPED: AtomicUsize = AtomicUsize::new(0);

    /// Counts completed deactivation hooks.
    #[derive(Debug, Default)]
    struct Hooked;

    #[async_trait]
    impl Actor for Hooked {
        const TYPE_NAME: &'static str = "Hooked";

        fn capabilities() -> Result<CapabilityTable<Self>, CapabilityError> {
            CapabilityTable::builder().method("noop", Self::noop).build()
        }

        async fn on_deactivate(&mut self, _ctx: &ActorContext) {
            tokio::time::sleep(Duration::from_millis(20)).await;
            STOPPED.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl Hooked {
        fn noop<'a>(
            &'a mut self,
            _args: Args,
            _ctx: &'a ActorContext,
        ) -> BoxFuture<'a, MethodResult> {
            async move { Ok(Value::Null) }.boxed()
        }
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_deactivation_hooks() {
        let registry = Registry::new::<Hooked>(RegistryConfig::default()).unwrap();
        registry.invoke("a1", "noop", Args::default()).await.unwrap();
        registry.invoke("b1", "noop", Args::default()).await.unwrap();

        assert_eq!(registry.shutdown().await, 2);
        assert_eq!(STOPPED.load(Ordering::SeqCst), 2);
        assert_eq!(registry.active_count().await, 0);
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_deactivated_instances() {
        let registry = registry();
        let handle = registry.activate("a1").await;
        registry.deactivate("a1").await;

        let slow = tokio::spawn(async move {
            handle.invoke("sleep", Args::new(vec![json!(50)])).await
        });
        tokio::task::yield_now().await;

        assert_eq!(registry.shutdown().await, 0);
        assert!(slow.is_finished());
        slow.await.unwrap().unwrap();
    }

    #[test]
    fn test_invoke_error_mapping() {
        assert_eq!(
            InvocationError::from(InvokeError::UndefinedMethod),
            InvocationError::UndefinedMethod
        );
        assert_eq!(
            InvocationError::from(InvokeError::Method(MethodError::new("nope"))),
            InvocationError::Method("nope".to_string())
        );
        assert_eq!(
            InvocationError::from(InvokeError::Panicked).to_string(),
            "internal error"
        );
    }
}
