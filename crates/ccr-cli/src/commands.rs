use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use ccr_ledger::{CreditState, InMemoryLedger, LedgerEntry, LedgerReader, OwnershipResolver};
use ccr_market::{MintGrant, MintingPipeline, TradingEngine};
use ccr_types::{CreditId, EntityId};
use ccr_verify::reduction::{estimated_reduction_kg, ReductionSubmission};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let path = cli.ledger.clone();
    match cli.command {
        Command::Submit(args) => cmd_submit(&path, args),
        Command::Mint(args) => cmd_mint(&path, args),
        Command::Buy(args) => cmd_buy(&path, args),
        Command::Retire(args) => cmd_retire(&path, args),
        Command::Owner(args) => cmd_owner(&path, args),
        Command::Portfolio(args) => cmd_portfolio(&path, args),
        Command::History(args) => cmd_history(&path, args),
        Command::Log(args) => cmd_log(&path, args),
        Command::Verify(_) => cmd_verify(&path),
    }
}

fn load_entries(path: &str) -> anyhow::Result<Vec<LedgerEntry>> {
    if !Path::new(path).exists() {
        return Ok(Vec::new());
    }
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read ledger file {path}"))?;
    serde_json::from_str(&data).with_context(|| format!("failed to parse ledger file {path}"))
}

fn open_ledger(path: &str) -> anyhow::Result<InMemoryLedger> {
    let entries = load_entries(path)?;
    InMemoryLedger::from_entries(entries)
        .with_context(|| format!("ledger file {path} failed integrity verification"))
}

fn save_ledger(path: &str, ledger: &InMemoryLedger) -> anyhow::Result<()> {
    let entries = ledger.entries()?;
    let data = serde_json::to_string_pretty(&entries)?;
    std::fs::write(path, data).with_context(|| format!("failed to write ledger file {path}"))
}

fn parse_credit(s: &str) -> anyhow::Result<CreditId> {
    s.parse().with_context(|| format!("invalid credit id {s}"))
}

fn cmd_submit(path: &str, args: SubmitArgs) -> anyhow::Result<()> {
    let submission = ReductionSubmission {
        solar_capacity_kw: args.solar_capacity_kw,
        annual_generation_kwh: args.annual_generation_kwh,
        baseline_energy_kwh: args.baseline_energy_kwh,
        post_project_energy_kwh: args.post_project_energy_kwh,
        waste_recycled_kg: args.waste_recycled_kg,
    };
    let reduction_kg = estimated_reduction_kg(&submission)?;
    println!(
        "Verified reduction for project {}: {} kg CO2",
        args.project.yellow(),
        reduction_kg.to_string().bold()
    );

    cmd_mint(
        path,
        MintArgs {
            project: args.project,
            owner: args.owner,
            kg: reduction_kg,
            limit: None,
        },
    )
}

fn cmd_mint(path: &str, args: MintArgs) -> anyhow::Result<()> {
    let ledger = open_ledger(path)?;
    let receipt = MintingPipeline::new(&ledger).mint_batch(
        &MintGrant {
            project_id: args.project.clone(),
            project_owner: EntityId::new(args.owner),
            reduction_kg: args.kg,
        },
        args.limit,
    )?;
    save_ledger(path, &ledger)?;

    println!(
        "{} Minted {} credit(s) for project {}",
        "✓".green().bold(),
        receipt.minted.to_string().bold(),
        args.project.yellow()
    );
    for credit in &receipt.credit_ids {
        println!("  {}", credit.to_string().cyan());
    }
    if receipt.remaining > 0 {
        println!("  {} unit(s) left unminted by --limit", receipt.remaining);
    }
    Ok(())
}

fn cmd_buy(path: &str, args: BuyArgs) -> anyhow::Result<()> {
    let ledger = open_ledger(path)?;
    let credit = parse_credit(&args.credit)?;
    let entry = TradingEngine::new(&ledger).buy(&credit, &EntityId::new(args.buyer.clone()))?;
    save_ledger(path, &ledger)?;

    println!(
        "{} {} bought credit {} (seq {})",
        "✓".green().bold(),
        args.buyer.bold(),
        credit.short_id().cyan(),
        entry.sequence
    );
    Ok(())
}

fn cmd_retire(path: &str, args: RetireArgs) -> anyhow::Result<()> {
    let ledger = open_ledger(path)?;
    let credit = parse_credit(&args.credit)?;
    let entry = TradingEngine::new(&ledger).retire(&credit, &EntityId::new(args.holder.clone()))?;
    save_ledger(path, &ledger)?;

    println!(
        "{} {} retired credit {} (seq {})",
        "✓".green().bold(),
        args.holder.bold(),
        credit.short_id().cyan(),
        entry.sequence
    );
    Ok(())
}

fn cmd_owner(path: &str, args: OwnerArgs) -> anyhow::Result<()> {
    let ledger = open_ledger(path)?;
    let credit = parse_credit(&args.credit)?;

    match OwnershipResolver::credit_state(&ledger, &credit)? {
        None => println!("Credit {} does not exist.", credit.short_id().cyan()),
        Some(CreditState::OnMarket) => {
            println!("Credit {} is {}.", credit.short_id().cyan(), "on the market".green())
        }
        Some(CreditState::Owned(owner)) => {
            println!("Credit {} is owned by {}.", credit.short_id().cyan(), owner.to_string().bold())
        }
        Some(CreditState::Retired) => {
            println!("Credit {} is {}.", credit.short_id().cyan(), "retired".red())
        }
    }
    Ok(())
}

fn cmd_portfolio(path: &str, args: PortfolioArgs) -> anyhow::Result<()> {
    let ledger = open_ledger(path)?;
    let entity = EntityId::new(args.entity.clone());

    let credits = if args.retired {
        OwnershipResolver::credits_retired_by(&ledger, &entity)?
    } else {
        OwnershipResolver::credits_owned_by(&ledger, &entity)?
    };

    let label = if args.retired { "retired" } else { "holds" };
    println!(
        "{} {} {} credit(s)",
        args.entity.bold(),
        label,
        credits.len().to_string().bold()
    );
    for credit in credits {
        println!("  {}", credit.to_string().cyan());
    }
    Ok(())
}

fn cmd_history(path: &str, args: HistoryArgs) -> anyhow::Result<()> {
    let ledger = open_ledger(path)?;
    let credit = parse_credit(&args.credit)?;
    let history = OwnershipResolver::history(&ledger, &credit)?;

    if history.is_empty() {
        println!("Credit {} does not exist.", credit.short_id().cyan());
        return Ok(());
    }

    for entry in history {
        print_entry(&entry);
    }
    Ok(())
}

fn cmd_log(path: &str, args: LogArgs) -> anyhow::Result<()> {
    let ledger = open_ledger(path)?;
    let entries = ledger.read_all()?;

    for entry in entries.iter().rev().take(args.limit) {
        print_entry(entry);
    }
    Ok(())
}

fn cmd_verify(path: &str) -> anyhow::Result<()> {
    let entries = load_entries(path)?;
    match InMemoryLedger::from_entries(entries) {
        Ok(ledger) => {
            let count = ledger.verify_integrity()?;
            println!(
                "{} Ledger integrity verified ({} entries)",
                "✓".green().bold(),
                count.to_string().bold()
            );
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "✗".red().bold(), e.to_string().red());
            Err(e.into())
        }
    }
}

fn print_entry(entry: &LedgerEntry) {
    println!(
        "{}  {}  {} {} {} {}  {}",
        format!("#{}", entry.sequence).yellow(),
        entry.kind.to_string().bold(),
        entry.credit_id.short_id().cyan(),
        entry.from_entity.to_string().dimmed(),
        "→".dimmed(),
        entry.to_entity.to_string().dimmed(),
        entry.hash[..8].dimmed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccr_types::EventKind;

    fn ledger_path(dir: &tempfile::TempDir) -> String {
        dir.path().join("ledger.json").to_string_lossy().into_owned()
    }

    #[test]
    fn mint_buy_retire_roundtrip_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = ledger_path(&dir);

        cmd_mint(
            &path,
            MintArgs {
                project: "proj-1".into(),
                owner: "producer-1".into(),
                kg: 2.9,
                limit: None,
            },
        )
        .unwrap();

        let ledger = open_ledger(&path).unwrap();
        assert_eq!(ledger.entry_count().unwrap(), 2);
        let credit = ledger.read_all().unwrap()[0].credit_id;

        cmd_buy(
            &path,
            BuyArgs {
                credit: credit.to_string(),
                buyer: "org-a".into(),
            },
        )
        .unwrap();
        cmd_retire(
            &path,
            RetireArgs {
                credit: credit.to_string(),
                holder: "org-a".into(),
            },
        )
        .unwrap();

        let ledger = open_ledger(&path).unwrap();
        let history = OwnershipResolver::history(&ledger, &credit).unwrap();
        let kinds: Vec<EventKind> = history.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Mint, EventKind::Trade, EventKind::Retire]
        );

        cmd_verify(&path).unwrap();
    }

    #[test]
    fn submit_verifies_then_mints() {
        let dir = tempfile::tempdir().unwrap();
        let path = ledger_path(&dir);

        // Solar rule: 10 kWh * 0.7 = 7 whole units.
        cmd_submit(
            &path,
            SubmitArgs {
                project: "proj-solar".into(),
                owner: "producer-1".into(),
                solar_capacity_kw: Some(5.0),
                annual_generation_kwh: Some(10.0),
                baseline_energy_kwh: None,
                post_project_energy_kwh: None,
                waste_recycled_kg: None,
            },
        )
        .unwrap();

        let ledger = open_ledger(&path).unwrap();
        assert_eq!(ledger.entry_count().unwrap(), 7);
        assert_eq!(
            OwnershipResolver::credits_owned_by(&ledger, &EntityId::market())
                .unwrap()
                .len(),
            7
        );
    }

    #[test]
    fn empty_submission_mints_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = ledger_path(&dir);

        cmd_submit(
            &path,
            SubmitArgs {
                project: "proj-empty".into(),
                owner: "producer-1".into(),
                solar_capacity_kw: None,
                annual_generation_kwh: None,
                baseline_energy_kwh: None,
                post_project_energy_kwh: None,
                waste_recycled_kg: None,
            },
        )
        .unwrap();

        let ledger = open_ledger(&path).unwrap();
        assert_eq!(ledger.entry_count().unwrap(), 0);
    }

    #[test]
    fn missing_file_is_an_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = ledger_path(&dir);

        let ledger = open_ledger(&path).unwrap();
        assert_eq!(ledger.entry_count().unwrap(), 0);
        cmd_verify(&path).unwrap();
    }

    #[test]
    fn hand_edited_file_fails_verification() {
        let dir = tempfile::tempdir().unwrap();
        let path = ledger_path(&dir);

        cmd_mint(
            &path,
            MintArgs {
                project: "proj-1".into(),
                owner: "producer-1".into(),
                kg: 2.0,
                limit: None,
            },
        )
        .unwrap();

        // Edit an entity name directly in the file.
        let data = std::fs::read_to_string(&path).unwrap();
        let tampered = data.replace("producer-1", "shadow-producer");
        std::fs::write(&path, tampered).unwrap();

        assert!(cmd_verify(&path).is_err());
        assert!(open_ledger(&path).is_err());
    }

    #[test]
    fn double_retire_fails_at_the_cli_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let path = ledger_path(&dir);

        cmd_mint(
            &path,
            MintArgs {
                project: "proj-1".into(),
                owner: "producer-1".into(),
                kg: 1.0,
                limit: None,
            },
        )
        .unwrap();
        let ledger = open_ledger(&path).unwrap();
        let credit = ledger.read_all().unwrap()[0].credit_id;

        cmd_buy(
            &path,
            BuyArgs {
                credit: credit.to_string(),
                buyer: "org-a".into(),
            },
        )
        .unwrap();
        cmd_retire(
            &path,
            RetireArgs {
                credit: credit.to_string(),
                holder: "org-a".into(),
            },
        )
        .unwrap();
        assert!(cmd_retire(
            &path,
            RetireArgs {
                credit: credit.to_string(),
                holder: "org-a".into(),
            },
        )
        .is_err());
    }
}
