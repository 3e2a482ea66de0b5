use std::sync::Arc;

use eyre::Result;
use packdeck_instances::{Enumerator, Instance, InstanceStore, LauncherConfig};
use tracing::{info, warn};

pub async fn handle_list_command(
    launcher: &LauncherConfig,
    selected_only: bool,
    unsorted: bool,
) -> Result<()> {
    info!(
        "Listing instances in {} against {}",
        launcher.instances_dir.display(),
        launcher.packages_url
    );
    let store = Arc::new(InstanceStore::new());
    let enumerator = Enumerator::from_config(store.clone(), launcher)?;

    let outcome = enumerator.call().await;
    // Update records are written in the background; make sure they land before exit
    enumerator.commits().flush().await;

    if !unsorted {
        store.sort();
    }
    let instances = if selected_only {
        store.selected()
    } else {
        store.snapshot()
    };
    print_instances(&instances);

    match outcome {
        Ok(summary) => {
            info!(
                "Enumerated {} local and {} remote instance(s)",
                summary.local, summary.remote
            );
            if summary.updates > 0 {
                println!("\n{} instance(s) have an update pending.", summary.updates);
            }
            Ok(())
        }
        Err(e) => {
            warn!("Enumeration failed: {}", e);
            println!("\n❌ {}", e.user_message());
            Err(e.into())
        }
    }
}

fn print_instances(instances: &[Instance]) {
    if instances.is_empty() {
        println!("No instances found.");
        return;
    }

    println!("Instances ({} total):", instances.len());
    println!(
        "{:<30} {:<20} {:<12} {:<15}",
        "TITLE", "NAME", "VERSION", "STATE"
    );
    println!("{}", "-".repeat(80));
    for instance in instances {
        println!("{}", format_row(instance));
    }
}

fn format_row(instance: &Instance) -> String {
    format!(
        "{:<30} {:<20} {:<12} {:<15}",
        truncate(instance.display_title(), 30),
        truncate(&instance.name, 20),
        instance.version.as_deref().unwrap_or("-"),
        instance.state().to_string()
    )
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let kept: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
