/// A capability a provider object may or may not support. Implementers
/// downcast a tagged provider union; a missing capability is an explicit
/// dispatch error, never a silent no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCapability {
    GitHub,
    Git,
}

impl ProviderCapability {
    pub fn name(self) -> &'static str {
        match self {
            ProviderCapability::GitHub => "GitHub",
            ProviderCapability::Git => "Git",
        }
    }
}

/// Queried once per evaluation to decide whether the provider can satisfy
/// the rule type's required capability.
pub trait ProviderCapabilities {
    fn supports(&self, capability: ProviderCapability) -> bool;
}
