use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;
use ratatui::style::Color;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Build an equality label selector (`key=value`).
pub fn label_selector(key: &str, value: &str) -> String {
    format!("{}={}", key, value)
}

/// Pod names in the order the list query returned them.
pub fn pod_names(pods: &[Pod]) -> Vec<String> {
    pods.iter().map(|p| p.name_any()).collect()
}

/// Border colour for a pod's pane, stable for a given name. Red is left out
/// of the palette; it marks a failed stream.
pub fn pane_color(pod: &str) -> Color {
    const PALETTE: [Color; 8] = [
        Color::Green,
        Color::Blue,
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::LightGreen,
        Color::LightBlue,
        Color::LightMagenta,
    ];
    let mut hasher = DefaultHasher::new();
    pod.hash(&mut hasher);
    PALETTE[(hasher.finish() % PALETTE.len() as u64) as usize]
}
