use depsentry_eval::{ProviderCapabilities, ProviderCapability};

/// A provider backed by the GitHub client. Satisfies the `GitHub` capability
/// only.
pub struct GitHubProvider;

impl ProviderCapabilities for GitHubProvider {
    fn supports(&self, capability: ProviderCapability) -> bool {
        matches!(capability, ProviderCapability::GitHub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_provider_supports_only_github() {
        let provider = GitHubProvider;
        assert!(provider.supports(ProviderCapability::GitHub));
        assert!(!provider.supports(ProviderCapability::Git));
    }
}
