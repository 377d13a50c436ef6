//! Use cases: the workflow's nodes plus the executor that wires them.

pub mod call_tool;
pub mod classify_intent;
pub mod react_controller;
pub mod respond;
pub(crate) mod shared;
pub mod workflow;

pub use call_tool::ToolCallNode;
pub use classify_intent::IntentClassifierNode;
pub use react_controller::ReactController;
pub use respond::ResponderNode;
pub use workflow::WorkflowExecutor;
