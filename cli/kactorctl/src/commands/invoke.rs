//! Invoke and deactivate actor instances.

use anyhow::Result;
use clap::Args;
use kactor_client::{InvocationClient, ServiceAddress, DEFAULT_CLUSTER_DOMAIN, DEFAULT_NAMESPACE};

use crate::error::CliError;

/// How to reach the target service.
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Target actor service.
    #[arg(short, long)]
    service: String,

    /// Target actor instance.
    #[arg(short, long)]
    instance: String,

    /// Target namespace.
    #[arg(short, long, env = "KACTOR_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// Target cluster domain.
    #[arg(long, env = "KACTOR_CLUSTER", default_value = DEFAULT_CLUSTER_DOMAIN)]
    cluster: String,

    /// Base URL to send requests to, bypassing service addressing.
    #[arg(long, env = "KACTOR_URL")]
    url: Option<String>,
}

impl TargetArgs {
    fn client(&self) -> Result<InvocationClient, CliError> {
        let client = match &self.url {
            Some(url) => InvocationClient::new(url)?,
            None => InvocationClient::for_service(
                &ServiceAddress::new(&self.service)
                    .with_namespace(&self.namespace)
                    .with_cluster_domain(&self.cluster),
            )?,
        };
        Ok(client)
    }
}

#[derive(Debug, Args)]
pub struct InvokeCommand {
    #[command(flatten)]
    target: TargetArgs,

    /// Target actor method.
    #[arg(short, long)]
    method: String,

    /// Argument as a JSON literal; repeat for each argument.
    #[arg(short, long = "data", allow_hyphen_values = true)]
    data: Vec<String>,
}

impl InvokeCommand {
    pub async fn run(self) -> Result<()> {
        let client = self.target.client()?;
        let value = client
            .invoke_raw(&self.target.instance, &self.method, &self.data)
            .await
            .map_err(CliError::from)?;

        println!("{}", serde_json::to_string(&value)?);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct DeactivateCommand {
    #[command(flatten)]
    target: TargetArgs,
}

impl DeactivateCommand {
    pub async fn run(self) -> Result<()> {
        let client = self.target.client()?;
        client
            .deactivate(&self.target.instance)
            .await
            .map_err(CliError::from)?;

        println!("OK");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::Cli;
    use super::*;
    use clap::Parser;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn parse_invoke(args: &[&str]) -> InvokeCommand {
        let mut argv = vec!["kactor", "invoke"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            super::super::Commands::Invoke(cmd) => cmd,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_invoke_defaults() {
        let cmd = parse_invoke(&["-s", "counter", "-i", "a1", "-m", "get"]);

        assert_eq!(cmd.target.service, "counter");
        assert_eq!(cmd.target.instance, "a1");
        assert_eq!(cmd.method, "get");
        assert!(cmd.data.is_empty());
        assert_eq!(
            cmd.target.client().unwrap().base_url().as_str(),
            "http://counter.default.127.0.0.1.sslip.io/"
        );
    }

    #[test]
    fn test_invoke_repeated_data() {
        let cmd = parse_invoke(&[
            "-s", "counter", "-i", "a1", "-m", "set", "-d", "1", "-d", r#"{"k":"v"}"#,
            "-n", "prod", "--cluster", "example.com",
        ]);

        assert_eq!(cmd.data, vec!["1".to_string(), r#"{"k":"v"}"#.to_string()]);
        assert_eq!(
            cmd.target.client().unwrap().base_url().host_str(),
            Some("counter.prod.example.com")
        );
    }

    #[test]
    fn test_invoke_requires_method() {
        assert!(Cli::try_parse_from(["kactor", "invoke", "-s", "counter", "-i", "a1"]).is_err());
    }

    #[tokio::test]
    async fn test_invoke_against_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/actor/v1/invoke/a1/set"))
            .and(header("K-Session", "a1"))
            .and(body_string(r#"["hello"]"#))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"value":"OK"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let uri = server.uri();
        let cmd = parse_invoke(&[
            "-s", "counter", "-i", "a1", "-m", "set", "-d", r#""hello""#, "--url", uri.as_str(),
        ]);
        cmd.run().await.unwrap();
    }

    #[tokio::test]
    async fn test_invoke_error_envelope_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(400).set_body_string(r#"{"error":"undefined method"}"#),
            )
            .mount(&server)
            .await;

        let uri = server.uri();
        let cmd = parse_invoke(&[
            "-s", "counter", "-i", "a1", "-m", "bogus", "--url", uri.as_str(),
        ]);
        let err = cmd.run().await.unwrap_err();
        assert_eq!(err.to_string(), "undefined method");
    }
}
