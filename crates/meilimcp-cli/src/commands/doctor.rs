use anyhow::{Result, bail};
use meilimcp_core::config::{Config, EngineConfig};
use meilimcp_search::SearchBackend;

pub fn run(config: &Config) -> Result<()> {
    let (engine, client) = super::connect(config)?;
    print_config(&engine);

    let mut failures = 0;

    match client.health() {
        Ok(body) => {
            let status = body.get("status").and_then(|s| s.as_str()).unwrap_or("ok");
            println!("  [OK] Meilisearch reachable (status: {})", status);
        }
        Err(e) => {
            println!("  [FAIL] Meilisearch unreachable: {}", e);
            failures += 1;
        }
    }

    match client.filterable_attributes() {
        Ok(metadata) if metadata.is_empty() => {
            println!(
                "  [WARN] Index '{}' declares no filterable attributes",
                engine.index
            );
        }
        Ok(metadata) => {
            println!(
                "  [OK] Filterable attributes: {}",
                metadata.filterable_attributes().join(", ")
            );
        }
        Err(e) => {
            println!("  [FAIL] Could not read index settings: {}", e);
            failures += 1;
        }
    }

    if engine.embedder.is_none() {
        println!("  [WARN] No embedder configured; hybrid_search calls will fail");
    }

    if failures > 0 {
        bail!("{} check(s) failed", failures);
    }
    println!("\nAll checks passed.");
    Ok(())
}

fn print_config(engine: &EngineConfig) {
    println!("meilimcp doctor\n");
    println!("  host:       {}", engine.host);
    println!("  index:      {}", engine.index);
    println!(
        "  api key:    {}",
        engine.masked_api_key().as_deref().unwrap_or("(none)")
    );
    println!(
        "  embedder:   {}",
        engine.embedder.as_deref().unwrap_or("(none)")
    );
    println!("  timeout:    {} ms", engine.timeout_ms);
    if engine.strict_filter_attributes {
        println!("  filters:    strict attribute validation");
    }
    println!();
}
