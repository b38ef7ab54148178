pub mod config;
pub mod events;
pub mod logging;
pub mod node;
pub mod telemetry;
pub mod workflow;

pub use config::NodeConfig;
pub use events::{EventBus, NodeEvent};
pub use node::{AetherNode, Collaborators};
pub use workflow::{StepStatus, WorkflowStep};
