use anyhow::Result;
use xdeb_sync::{PackageListManifest, ProviderDefinition};

const MAX_NAME_WIDTH: usize = 24;

pub fn run(manifest: &PackageListManifest) -> Result<()> {
    print_provider_table(&manifest.providers);
    Ok(())
}

fn print_provider_table(providers: &[ProviderDefinition]) {
    if providers.is_empty() {
        println!("No providers available.");
        return;
    }

    let name_width = providers
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_NAME_WIDTH);

    for provider in providers {
        println!(
            "  {:<width$}  {:<6}  {}  [{}]",
            provider.name,
            kind_label(provider),
            provider.distributions.join(", "),
            provider.components.join(", "),
            width = name_width
        );
    }

    let jobs: usize = providers.iter().map(ProviderDefinition::job_count).sum();
    println!("\n{} providers, {jobs} repositories", providers.len());
}

fn kind_label(provider: &ProviderDefinition) -> &str {
    if provider.custom { "custom" } else { "apt" }
}
