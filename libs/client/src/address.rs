//! Service addressing.

/// Namespace used when none is given.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Cluster domain used when none is given.
pub const DEFAULT_CLUSTER_DOMAIN: &str = "127.0.0.1.sslip.io";

/// Location of an actor service inside a cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAddress {
    pub service: String,
    pub namespace: String,
    pub cluster_domain: String,
}

impl ServiceAddress {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            cluster_domain: DEFAULT_CLUSTER_DOMAIN.to_string(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_cluster_domain(mut self, cluster_domain: impl Into<String>) -> Self {
        self.cluster_domain = cluster_domain.into();
        self
    }

    /// Host name of the service: `{service}.{namespace}.{cluster-domain}`.
    pub fn host(&self) -> String {
        let mut host = format!("{}.{}", self.service, self.namespace);
        if !self.cluster_domain.is_empty() {
            host.push('.');
            host.push_str(&self.cluster_domain);
        }
        host
    }

    /// Base URL of the service.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.host())
    }
}
