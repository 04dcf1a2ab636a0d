//! Card application toolkit service seam
//!
//! The toolkit service lives for as long as slot 0 of a card is populated.
//! Starting and reinitialising it are fire-and-forget from the card's side.

use std::sync::Arc;

use crate::application::CardApplication;

/// What a toolkit service is bound to
#[derive(Debug, Clone)]
pub struct ToolkitBinding {
    /// Slot id of the owning card
    pub slot: usize,
    /// Application in slot 0 of the card
    pub application: Arc<CardApplication>,
}

/// A running toolkit service
pub trait ToolkitService: Send {
    /// Rebind the service after a new status report
    fn reinitialize(&mut self, binding: &ToolkitBinding);

    /// Stop the service and release its resources
    fn dispose(&mut self);
}

/// Factory for toolkit services
pub trait ToolkitFactory: Send + Sync {
    /// Start a service bound to `binding`
    fn start(&self, binding: &ToolkitBinding) -> Box<dyn ToolkitService>;
}

impl<F> ToolkitFactory for F
where
    F: Fn(&ToolkitBinding) -> Box<dyn ToolkitService> + Send + Sync,
{
    fn start(&self, binding: &ToolkitBinding) -> Box<dyn ToolkitService> {
        self(binding)
    }
}

/// Toolkit for devices without one, does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopToolkit;

impl ToolkitService for NoopToolkit {
    fn reinitialize(&mut self, _binding: &ToolkitBinding) {}

    fn dispose(&mut self) {}
}

impl ToolkitFactory for NoopToolkit {
    fn start(&self, _binding: &ToolkitBinding) -> Box<dyn ToolkitService> {
        Box::new(Self)
    }
}
