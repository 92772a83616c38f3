use crate::error::{Error, Result};
use futures::io::AsyncRead;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{ListParams, LogParams};
use kube::{Api, Client};
use std::future::Future;
use std::pin::Pin;

/// A following byte stream of one pod's log output.
pub type LogStream<'a> = Pin<Box<dyn AsyncRead + Send + 'a>>;

/// Read-only view of the pods in one namespace.
///
/// Everything the resolver and the tailers need from the cluster goes
/// through this trait, so both can run against an in-memory fake.
pub trait ClusterApi: Send + Sync {
    fn namespace(&self) -> &str;

    /// Returns `Ok(None)` when the pod does not exist.
    fn get_pod(&self, name: &str) -> impl Future<Output = Result<Option<Pod>>> + Send;

    /// Lists pods in list-query order, optionally filtered by a label selector.
    fn list_pods(&self, selector: Option<&str>) -> impl Future<Output = Result<Vec<Pod>>> + Send;

    /// Opens a following log stream starting `tail_lines` lines back.
    fn open_log_stream<'a>(
        &'a self,
        name: &'a str,
        tail_lines: i64,
    ) -> impl Future<Output = Result<LogStream<'a>>> + Send + 'a;
}

/// `ClusterApi` backed by the Kubernetes API server.
#[derive(Clone)]
pub struct KubeCluster {
    pods: Api<Pod>,
    namespace: String,
    container: Option<String>,
}

impl KubeCluster {
    pub fn new(client: Client, namespace: &str, container: Option<String>) -> Self {
        Self {
            pods: Api::namespaced(client, namespace),
            namespace: namespace.to_string(),
            container,
        }
    }
}

impl ClusterApi for KubeCluster {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn get_pod(&self, name: &str) -> Result<Option<Pod>> {
        Ok(self.pods.get_opt(name).await?)
    }

    async fn list_pods(&self, selector: Option<&str>) -> Result<Vec<Pod>> {
        let lp = match selector {
            Some(selector) => ListParams::default().labels(selector),
            None => ListParams::default(),
        };
        Ok(self.pods.list(&lp).await?.items)
    }

    async fn open_log_stream<'a>(&'a self, name: &'a str, tail_lines: i64) -> Result<LogStream<'a>> {
        let lp = LogParams {
            follow: true,
            container: self.container.clone(),
            tail_lines: Some(tail_lines),
            ..Default::default()
        };
        let stream = self
            .pods
            .log_stream(name, &lp)
            .await
            .map_err(|e| Error::StreamOpen {
                pod: name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Box::pin(stream))
    }
}
