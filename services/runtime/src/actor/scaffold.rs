//! The starter actor every new project begins with.

use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt};
use serde_json::Value;
use tokio::net::UdpSocket;

use super::{
    Actor, ActorContext, Args, CapabilityError, CapabilityTable, MethodError, MethodResult,
};

/// Address used to pick the outbound interface. Connecting a UDP socket
/// sends no packets.
const OUTBOUND_ROUTE_ADDR: &str = "8.8.8.8:80";

/// Holds a single JSON value.
///
/// - `set(v)` stores `v` and returns `"OK"`
/// - `get()` returns the stored value, `null` until set
/// - `ip()` returns the address of the runtime's outbound interface
#[derive(Debug, Default)]
pub struct ScaffoldActor {
    value: Value,
}

#[async_trait]
impl Actor for ScaffoldActor {
    const TYPE_NAME: &'static str = "Actor";

    fn capabilities() -> Result<CapabilityTable<Self>, CapabilityError> {
        CapabilityTable::builder()
            .method("set", Self::set)
            .method("get", Self::get)
            .method("ip", Self::ip)
            .build()
    }
}

impl ScaffoldActor {
    fn set<'a>(
        &'a mut self,
        mut args: Args,
        _ctx: &'a ActorContext,
    ) -> BoxFuture<'a, MethodResult> {
        async move {
            self.value = args.take(0);
            Ok(Value::from("OK"))
        }
        .boxed()
    }

    fn get<'a>(
        &'a mut self,
        _args: Args,
        _ctx: &'a ActorContext,
    ) -> BoxFuture<'a, MethodResult> {
        async move { Ok(self.value.clone()) }.boxed()
    }

    fn ip<'a>(
        &'a mut self,
        _args: Args,
        _ctx: &'a ActorContext,
    ) -> BoxFuture<'a, MethodResult> {
        async move {
            let socket = UdpSocket::bind("0.0.0.0:0").await?;
            socket.connect(OUTBOUND_ROUTE_ADDR).await?;
            let addr = socket.local_addr()?;
            if addr.ip().is_unspecified() {
                return Err(MethodError::new("no network interface available"));
            }
            Ok(Value::from(addr.ip().to_string()))
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn call(actor: &mut ScaffoldActor, method: &str, args: Vec<Value>) -> MethodResult {
        let table = ScaffoldActor::capabilities().unwrap();
        let handler = table.resolve(method).unwrap();
        let ctx = ActorContext::new("a1", ScaffoldActor::TYPE_NAME);
        handler(actor, Args::new(args), &ctx).await
    }

    #[test]
    fn test_capabilities() {
        let table = ScaffoldActor::capabilities().unwrap();
        assert_eq!(table.method_names(), vec!["get", "ip", "set"]);
    }

    #[tokio::test]
    async fn test_get_before_set_is_null() {
        let mut actor = ScaffoldActor::default();
        assert_eq!(call(&mut actor, "get", vec![]).await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let mut actor = ScaffoldActor::default();
        let v = json!({"nested": {"list": [1, "two", null]}});

        assert_eq!(call(&mut actor, "set", vec![v.clone()]).await.unwrap(), json!("OK"));
        assert_eq!(call(&mut actor, "get", vec![]).await.unwrap(), v);
    }

    #[tokio::test]
    async fn test_set_without_argument_clears() {
        let mut actor = ScaffoldActor::default();
        call(&mut actor, "set", vec![json!(1)]).await.unwrap();
        call(&mut actor, "set", vec![]).await.unwrap();
        assert_eq!(call(&mut actor, "get", vec![]).await.unwrap(), Value::Null);
    }
}
