use anyhow::{Context, Result, bail};

use crate::api::DocumentApi;

/// Check whether the backend is up
#[tracing::instrument(skip(api))]
pub async fn health<A: DocumentApi>(api: &A, services: bool) -> Result<()> {
    if services {
        return services_health(api).await;
    }

    let status = api
        .health()
        .await
        .context("Failed to reach the backend")?;

    println!("Backend status: {}", status.status);

    if !status.is_healthy() {
        match status.error {
            Some(error) => bail!("Backend is {}: {}", status.status, error),
            None => bail!("Backend is {}", status.status),
        }
    }
    Ok(())
}

async fn services_health<A: DocumentApi>(api: &A) -> Result<()> {
    let report = api
        .services_health()
        .await
        .context("Failed to reach the backend")?;

    println!("Backend status: {}", report.status);
    for (name, service) in &report.services {
        match &service.error {
            Some(error) => println!("  {}: {} ({})", name, service.status, error),
            None => println!("  {}: {}", name, service.status),
        }
    }

    if !report.is_healthy() {
        let unhealthy: Vec<&str> = report.unhealthy_services().collect();
        if unhealthy.is_empty() {
            bail!("Backend is {}", report.status);
        }
        bail!("Backend is {}: {} unhealthy", report.status, unhealthy.join(", "));
    }
    Ok(())
}
