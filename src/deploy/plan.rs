// ABOUTME: The choices made before a run starts.
// ABOUTME: Target, ordered service selection, and the three optional phases.

use nonempty::NonEmpty;

#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Target key or display title.
    pub target: String,
    /// Service titles in the order they should be processed.
    pub services: NonEmpty<String>,
    pub clone_sources: bool,
    pub apply_load_balancers: bool,
    pub apply_node_ports: bool,
}

impl RunPlan {
    pub fn new(target: impl Into<String>, services: NonEmpty<String>) -> Self {
        Self {
            target: target.into(),
            services,
            clone_sources: false,
            apply_load_balancers: false,
            apply_node_ports: false,
        }
    }

    pub fn clone_sources(mut self, yes: bool) -> Self {
        self.clone_sources = yes;
        self
    }

    pub fn apply_load_balancers(mut self, yes: bool) -> Self {
        self.apply_load_balancers = yes;
        self
    }

    pub fn apply_node_ports(mut self, yes: bool) -> Self {
        self.apply_node_ports = yes;
        self
    }
}
