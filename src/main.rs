//! Domain Scout - DNS-based domain availability scouting
//!
//! Checks a base name across many TLDs by cross-referencing
//! DNS-over-HTTPS answers from public resolvers and prints the
//! inferred status of every combination.

use anyhow::Context;
use domain_scout::{
    catalog, BatchCoordinator, CheckConfig, DomainChecker, DomainStatus, GroupedResults,
    ProgressState,
};
use indicatif::{ProgressBar, ProgressStyle};
use inquire::Text;
use std::env;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize the library
    domain_scout::init().context("Failed to initialize")?;

    // Get command line arguments
    let args: Vec<String> = env::args().collect();

    // Check for help
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        print_help();
        return Ok(());
    }
    if args.len() > 1 && (args[1] == "--version" || args[1] == "-V") {
        println!("domain-scout {}", domain_scout::VERSION);
        return Ok(());
    }

    let (base_name, tlds) = match resolve_inputs(&args) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("❌ {}", e.user_message());
            process::exit(1);
        }
    };

    // Run the main flow
    if let Err(e) = run_scout(&base_name, &tlds).await {
        eprintln!("❌ {}", e.user_message());
        process::exit(1);
    }

    Ok(())
}

/// Base name from the first argument or an interactive prompt; TLDs
/// from the remaining arguments, expanding catalog names along the way.
fn resolve_inputs(args: &[String]) -> domain_scout::Result<(String, Vec<String>)> {
    let base_name = if args.len() > 1 {
        args[1].clone()
    } else {
        Text::new("Base name to scout:")
            .with_help_message("Checked against every TLD, e.g. 'acme' becomes acme.com, acme.io, ...")
            .prompt()
            .map_err(|e| {
                domain_scout::DomainScoutError::config(format!("Prompt failed: {}", e))
            })?
    };

    let tlds = if args.len() > 2 {
        expand_tlds(&args[2..])
    } else {
        catalog::get_tld_catalog("popular").unwrap_or_default()
    };

    Ok((base_name, tlds))
}

/// Each argument is either a catalog name or a literal TLD
fn expand_tlds(args: &[String]) -> Vec<String> {
    let mut tlds = Vec::new();
    for arg in args {
        match catalog::get_tld_catalog(arg) {
            Some(catalog_tlds) => tlds.extend(catalog_tlds),
            None => tlds.push(arg.clone()),
        }
    }
    tlds
}

/// Main scouting workflow
async fn run_scout(base_name: &str, tlds: &[String]) -> domain_scout::Result<()> {
    println!("🔭 Domain Scout - DNS-based domain availability scouting");
    println!("════════════════════════════════════════════════════════");
    println!();
    println!("🎯 Scouting \"{}\" across {} TLD(s)", base_name, tlds.len());
    println!();

    let checker = DomainChecker::with_config(CheckConfig::default());
    let coordinator = BatchCoordinator::new(checker);

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let progress_bar = bar.clone();
    let scout_start = std::time::Instant::now();
    let grouped = coordinator
        .run_batch(base_name, tlds, move |state: &ProgressState| {
            progress_bar.set_position(state.percentage.round() as u64);
            progress_bar.set_message(state.detailed_message.clone());
        })
        .await?;
    bar.finish_and_clear();

    display_grouped_results(&grouped);
    display_summary(&grouped, &coordinator, scout_start.elapsed());

    Ok(())
}

/// Display results grouped by status, available domains first
fn display_grouped_results(grouped: &GroupedResults) {
    if !grouped.available.is_empty() {
        println!("🎉 Available ({}):", grouped.available.len());
        println!("───────────────────");
        for result in &grouped.available {
            println!("✅ {} - AVAILABLE", result.domain);
            println!("   🔗 {}", result.link);
        }
        println!();
    }

    if !grouped.premium.is_empty() {
        println!("💎 Premium / For Sale ({}):", grouped.premium.len());
        println!("──────────────────────────");
        for result in &grouped.premium {
            println!("💎 {} - listed on a marketplace", result.domain);
            println!("   🔗 {}", result.link);
        }
        println!();
    }

    if !grouped.registered.is_empty() {
        println!("❌ Registered ({}):", grouped.registered.len());
        println!("───────────────────");
        for result in &grouped.registered {
            print!("❌ {} - REGISTERED", result.domain);
            let mut notes = Vec::new();
            if result.is_parked_by_ns || result.is_parked_by_txt {
                notes.push("parked");
            }
            if result.wildcard_detected {
                notes.push("wildcard DNS");
            }
            if result.dnssec_validated {
                notes.push("DNSSEC");
            }
            if !notes.is_empty() {
                print!(" ({})", notes.join(", "));
            }
            println!();
        }
        println!();
    }

    if !grouped.other.is_empty() {
        println!("⚠️  Inconclusive ({}):", grouped.other.len());
        println!("─────────────────────");
        for result in &grouped.other {
            match result.status {
                DomainStatus::Error => println!(
                    "⚠️  {} - {}",
                    result.domain,
                    result.error_message.as_deref().unwrap_or("check failed")
                ),
                _ => println!("⚠️  {} - signals disagree, verify manually", result.domain),
            }
            println!("   🔗 {}", result.link);
        }
        println!();
    }
}

/// Performance summary
fn display_summary(grouped: &GroupedResults, coordinator: &BatchCoordinator, elapsed: Duration) {
    let metrics = coordinator.checker().get_metrics_snapshot();

    println!("📈 Summary:");
    println!("   ✅ Available: {}", grouped.available.len());
    println!("   💎 Premium: {}", grouped.premium.len());
    println!("   ❌ Registered: {}", grouped.registered.len());
    if !grouped.other.is_empty() {
        println!("   ⚠️  Inconclusive: {}", grouped.other.len());
    }
    println!("   📊 Total checked: {}", grouped.total());
    println!("   ⏱️  Total time: {:.2}s", elapsed.as_secs_f32());
    println!("   📡 DNS queries sent: {}", metrics.queries_sent);
    if metrics.retries_attempted > 0 {
        println!("   🔁 Retries: {}", metrics.retries_attempted);
    }
    if metrics.domains_checked > 0 {
        println!("   📊 Average check time: {}ms", metrics.avg_check_time_ms);
    }

    if !grouped.available.is_empty() {
        println!();
        println!(
            "🎉 Great! {} name(s) look available to register!",
            grouped.available.len()
        );
    } else {
        println!();
        println!("😔 Nothing available in this batch. Try other TLDs or another base name!");
    }
}

/// Print help information
fn print_help() {
    println!("🔭 Domain Scout - DNS-based domain availability scouting");
    println!("════════════════════════════════════════════════════════");
    println!();
    println!("USAGE:");
    println!("    domain-scout [BASE_NAME] [TLDS...]");
    println!();
    println!("EXAMPLES:");
    println!("    domain-scout                      # Prompt for a name, scout popular TLDs");
    println!("    domain-scout acme                 # Scout acme across popular TLDs");
    println!("    domain-scout acme com io dev      # Scout specific TLDs");
    println!("    domain-scout acme country         # Scout a TLD catalog by name");
    println!();
    println!("TLD CATALOGS:");
    println!("    popular    {}", catalog::POPULAR_TLDS.join(" "));
    println!("    country    {}", catalog::COUNTRY_TLDS.join(" "));
    println!("    niche      {}", catalog::NICHE_TLDS.join(" "));
    println!();
    println!("HOW IT WORKS:");
    println!("    • Queries Cloudflare, Google, and Quad9 DNS-over-HTTPS resolvers");
    println!("    • Cross-references NS/TXT/SOA answers and NXDOMAIN consensus");
    println!("    • Detects wildcard DNS, parking nameservers, and for-sale TXT markers");
    println!("    • Never talks to WHOIS or RDAP; inference only, not authoritative");
    println!();
    println!("Made with ❤️ and 🦀 Rust");
}
