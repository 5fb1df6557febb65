//! Command handlers. Each handler loads and validates the client before
//! touching the output directory.

use std::path::Path;
use std::sync::Arc;

use sitegrid_core::{load_client, AppConfig, Client};
use sitegrid_pipeline::artifacts::MATRIX_FILE;
use sitegrid_pipeline::{
    generate_matrix, load_sources, ArtifactStore, CollectorConfig, Orchestrator, PipelineResult,
};
use sitegrid_providers::{DataForSeoClient, FirecrawlClient};

const QUICK_WINS_SHOWN: usize = 5;

pub(crate) fn run_validate(path: &Path) -> anyhow::Result<()> {
    let client = load_client(path)?;
    println!("{}", client_summary(&client));
    Ok(())
}

pub(crate) async fn run_plan(path: &Path, root: &Path) -> anyhow::Result<()> {
    let client = load_client(path)?;
    let matrix = generate_matrix(&client)?;
    let written = ArtifactStore::new(root, &client.id)
        .write(MATRIX_FILE, &matrix)
        .await?;

    let summary = &matrix.summary;
    println!(
        "matrix for {}: {} cells, {} dedicated pages ({} service, {} service-area), {} merged, {} keywords",
        client.id,
        matrix.cells.len(),
        summary.total_pages_needed,
        summary.service_pages,
        summary.service_area_pages,
        summary.merged_pages,
        summary.total_keywords,
    );
    println!("wrote {}", written.display());
    Ok(())
}

/// Full pipeline. Providers are built from config only when collection
/// actually runs, so replaying saved sources needs no credentials.
pub(crate) async fn run_pipeline(
    config: &AppConfig,
    path: &Path,
    root: &Path,
    sources: Option<&Path>,
) -> anyhow::Result<()> {
    let client = load_client(path)?;
    let orchestrator = Orchestrator::new(root);

    let result = if let Some(sources_path) = sources {
        let saved = load_sources(sources_path).await?;
        tracing::info!(
            path = %sources_path.display(),
            sources = saved.len(),
            "replaying saved sources"
        );
        orchestrator.run_with_sources(&client, saved).await
    } else {
        let ranking = DataForSeoClient::from_app_config(config)?;
        let content = FirecrawlClient::from_app_config(config)?;
        orchestrator
            .with_providers(Arc::new(ranking), Arc::new(content))
            .with_collector_config(CollectorConfig::from_app_config(config))
            .run(&client)
            .await
    };

    print_result(&result);

    if !result.is_success() {
        anyhow::bail!(
            "pipeline failed for '{}': {}",
            result.client_id,
            result.errors.join("; ")
        );
    }
    Ok(())
}

fn client_summary(client: &Client) -> String {
    let money = client.money_services().count();
    let primary = client
        .primary_location()
        .map_or("none", |l| l.name.as_str());
    format!(
        "{} ({}) is valid: vertical {}, {} services ({money} money), {} locations, primary {primary}",
        client.name,
        client.id,
        client.vertical,
        client.services.len(),
        client.locations.len(),
    )
}

fn print_result(result: &PipelineResult) {
    let stats = &result.stats;
    println!("status: {:?}", result.status);
    println!(
        "cells {} | sources {} ({} failed) | competitors {} | gaps {} | findings {} | insights {} | pages {}",
        stats.total_cells,
        stats.total_sources,
        stats.failed_sources,
        stats.total_competitors,
        stats.normalization_gaps,
        stats.total_findings,
        stats.total_insights,
        stats.total_pages,
    );

    if let Some(report) = &result.insights {
        let wins = report.quick_wins();
        if !wins.is_empty() {
            println!("quick wins:");
            for insight in wins.iter().take(QUICK_WINS_SHOWN) {
                println!("  [{:.1}] {}", insight.priority_score, insight.title);
            }
        }
    }

    for (name, path) in &result.artifacts {
        println!("  {name}: {}", path.display());
    }
    for err in &result.errors {
        println!("error: {err}");
    }
}
