use crate::error::{Error, Result};
use crate::kubernetes::ClusterApi;
use crate::types::{ControllerClassification, ControllerKind, Resolution};
use crate::utils::{label_selector, pod_names};
use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::ResourceExt;
use tracing::{debug, info, warn};

/// Pod labels probed, in priority order, for pods owned by a custom resource.
pub const CUSTOM_RESOURCE_LABEL_KEYS: [&str; 3] = ["app", "name", "component"];

/// Classify a pod's owner. Only the first owner reference is ever consulted.
pub fn classify(owner: Option<&OwnerReference>) -> ControllerClassification {
    let Some(owner) = owner else {
        return ControllerClassification::unowned();
    };
    let native = ControllerKind::native(&owner.kind, &owner.api_version);
    ControllerClassification {
        kind: native.unwrap_or(ControllerKind::CustomResource),
        name: owner.name.clone(),
        owner_kind: owner.kind.clone(),
        is_native: native.is_some(),
    }
}

/// How sibling pods are located for a given controller kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryStrategy {
    /// No controller; the pod is its own only sibling.
    SelfOnly,
    /// Try each selector in order and keep the first non-empty result. When
    /// every selector comes back empty, the namespace is listed unfiltered.
    Selectors(Vec<String>),
    /// Use the first of these labels present on the pod itself. Falls back
    /// to the pod alone.
    PodLabels(&'static [&'static str]),
}

impl DiscoveryStrategy {
    pub fn for_controller(controller: &ControllerClassification, pod_name: &str) -> Self {
        let name = controller.name.as_str();
        match controller.kind {
            // The pod-name label is 1:1, so this only ever matches the pod itself.
            ControllerKind::StatefulSet => Self::Selectors(vec![label_selector(
                "statefulset.kubernetes.io/pod-name",
                pod_name,
            )]),
            ControllerKind::Job => Self::Selectors(vec![label_selector("job-name", name)]),
            ControllerKind::CronJob => Self::Selectors(vec![label_selector("cronjob-name", name)]),
            ControllerKind::Deployment => Self::Selectors(vec![label_selector("app", name)]),
            ControllerKind::DaemonSet => Self::Selectors(vec![
                label_selector("name", name),
                label_selector("k8s-app", name),
            ]),
            ControllerKind::CustomResource => Self::PodLabels(&CUSTOM_RESOURCE_LABEL_KEYS),
            ControllerKind::Unowned => Self::SelfOnly,
        }
    }
}

/// Find the controller owning `pod_name` and every pod it governs.
pub async fn resolve<C: ClusterApi>(cluster: &C, pod_name: &str) -> Result<Resolution> {
    let Some(pod) = cluster.get_pod(pod_name).await? else {
        let message = format!(
            "Pod {} not found in namespace {}",
            pod_name,
            cluster.namespace()
        );
        return Err(unmatched(cluster, message).await);
    };

    let controller = classify(pod.owner_references().first());
    info!(
        "Pod {} is owned by {} (native: {})",
        pod_name,
        controller.describe(),
        controller.is_native
    );

    let strategy = DiscoveryStrategy::for_controller(&controller, pod_name);
    let pods = discover(cluster, &pod, &controller, &strategy).await?;
    debug!("Discovered {} sibling pod(s): {:?}", pods.len(), pods);

    Ok(Resolution { controller, pods })
}

async fn discover<C: ClusterApi>(
    cluster: &C,
    pod: &Pod,
    controller: &ControllerClassification,
    strategy: &DiscoveryStrategy,
) -> Result<Vec<String>> {
    let pod_name = pod.name_any();
    match strategy {
        DiscoveryStrategy::SelfOnly => Ok(vec![pod_name]),
        DiscoveryStrategy::Selectors(selectors) => {
            let mut last_error = None;
            let mut listed_any = false;
            for selector in selectors {
                info!(
                    "Trying label selector: {} in namespace: {}",
                    selector,
                    cluster.namespace()
                );
                match cluster.list_pods(Some(selector)).await {
                    Ok(pods) if !pods.is_empty() => return Ok(pod_names(&pods)),
                    Ok(_) => listed_any = true,
                    Err(e) => {
                        warn!("Listing pods with selector {} failed: {}", selector, e);
                        last_error = Some(e);
                    }
                }
            }
            // Only surface a listing error when no selector could be evaluated at all.
            if !listed_any && let Some(e) = last_error {
                return Err(e);
            }
            let message = format!("No pods found for controller {}", controller.name);
            Err(unmatched(cluster, message).await)
        }
        DiscoveryStrategy::PodLabels(keys) => {
            let labels = pod.labels();
            let Some((key, value)) = keys
                .iter()
                .find_map(|key| labels.get(*key).map(|value| (*key, value)))
            else {
                debug!("Pod {} carries none of {:?}; tailing it alone", pod_name, keys);
                return Ok(vec![pod_name]);
            };

            let selector = label_selector(key, value);
            info!(
                "Trying label selector: {} in namespace: {}",
                selector,
                cluster.namespace()
            );
            match cluster.list_pods(Some(&selector)).await {
                Ok(pods) if !pods.is_empty() => Ok(pod_names(&pods)),
                Ok(_) => Ok(vec![pod_name]),
                Err(e) => {
                    warn!("Listing pods with selector {} failed: {}", selector, e);
                    Ok(vec![pod_name])
                }
            }
        }
    }
}

/// Build the error for a lookup that matched nothing: `NotFound` for an empty
/// namespace, otherwise `AmbiguousTarget` listing every pod as a candidate.
async fn unmatched<C: ClusterApi>(cluster: &C, message: String) -> Error {
    match cluster.list_pods(None).await {
        Ok(pods) if pods.is_empty() => Error::NotFound {
            namespace: cluster.namespace().to_string(),
        },
        Ok(pods) => Error::AmbiguousTarget {
            message,
            candidates: pod_names(&pods),
        },
        Err(e) => e,
    }
}
