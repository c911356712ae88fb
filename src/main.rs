// career-ledger CLI
// Drives the mock contracts against an on-disk store

use career_ledger::chain::{generate_tx_hash, simulate_delay, TxSpeed};
use career_ledger::storage::SledStore;
use career_ledger::types::TOKEN_DECIMALS;
use career_ledger::{Amount, LedgerConfig, LedgerError, MockContracts};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::exit;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "career-ledger", version, about = "Mock bounty and gig contracts")]
struct Cli {
    /// Directory holding the ledger database
    #[arg(long, default_value = ".career-ledger")]
    data_dir: PathBuf,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Simulated confirmation speed
    #[arg(long, default_value_t = TxSpeed::Normal)]
    speed: TxSpeed,

    /// Require allowances for escrow deposits
    #[arg(long)]
    strict_allowances: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a token balance
    Balance { address: String },
    /// Set an allowance
    Approve {
        owner: String,
        spender: String,
        amount: String,
    },
    /// Open a bounty
    CreateBounty {
        creator: String,
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = 0)]
        category: u8,
        /// Unix seconds
        #[arg(long, default_value_t = 0)]
        deadline: u64,
        reward: String,
    },
    /// Submit work to a bounty
    Submit {
        bounty_id: u64,
        submitter: String,
        main_uri: String,
        #[arg(long = "evidence")]
        evidence: Vec<String>,
    },
    /// Pay winners, e.g. --winner 0xb:60 --winner 0xc:40
    SelectWinners {
        bounty_id: u64,
        #[arg(long = "winner", required = true)]
        winners: Vec<String>,
    },
    CancelBounty { bounty_id: u64, caller: String },
    ShowBounty { bounty_id: u64 },
    /// Post a gig
    PostGig {
        poster: String,
        title: String,
        #[arg(long, default_value = "")]
        short_description: String,
        #[arg(long, default_value = "")]
        details_uri: String,
        amount: String,
        #[arg(long, default_value = "0")]
        native_stake: String,
        #[arg(long, default_value_t = 30)]
        duration: u32,
        #[arg(long, default_value_t = 7)]
        proposal_duration: u32,
    },
    Propose {
        gig_id: u64,
        proposer: String,
        proposal_uri: String,
    },
    WithdrawProposal { gig_id: u64, proposer: String },
    SelectProposal {
        gig_id: u64,
        index: u32,
        caller: String,
    },
    CompleteGig { gig_id: u64, caller: String },
    CancelGig { gig_id: u64, caller: String },
    ShowGig { gig_id: u64 },
    /// List every bounty and gig
    List,
    /// Wipe all ledger data
    Reset,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli).await {
        error!("{}", e);
        exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), LedgerError> {
    let config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| LedgerError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
            LedgerConfig::from_json(&text)?
        }
        None => LedgerConfig::default(),
    };
    let config = if cli.strict_allowances {
        config.with_strict_allowances(true)
    } else {
        config
    };

    let store = SledStore::open(&cli.data_dir)?;
    let mut contracts = MockContracts::open(store, config)?;
    let speed = cli.speed;

    match cli.command {
        Command::Balance { address } => {
            let balance = contracts.get_balance(address.as_str());
            println!("{} USDT", balance.format_units(TOKEN_DECIMALS));
        }
        Command::Approve {
            owner,
            spender,
            amount,
        } => {
            contracts.approve(owner.as_str(), spender.as_str(), parse_amount(&amount)?);
            confirm(speed).await;
        }
        Command::CreateBounty {
            creator,
            name,
            description,
            category,
            deadline,
            reward,
        } => {
            let id = contracts.create_bounty(
                creator.as_str(),
                &name,
                &description,
                category,
                deadline,
                parse_amount(&reward)?,
            )?;
            confirm(speed).await;
            println!("bounty id: {}", id);
        }
        Command::Submit {
            bounty_id,
            submitter,
            main_uri,
            evidence,
        } => {
            let evidence: Vec<&str> = evidence.iter().map(String::as_str).collect();
            contracts.submit_to_bounty(bounty_id, submitter.as_str(), &main_uri, &evidence)?;
            confirm(speed).await;
        }
        Command::SelectWinners { bounty_id, winners } => {
            let mut addrs = Vec::new();
            let mut percentages = Vec::new();
            for spec in &winners {
                let (addr, pct) = spec.rsplit_once(':').ok_or_else(|| {
                    LedgerError::InvalidSplit(format!("expected address:percent, got '{}'", spec))
                })?;
                let pct: u8 = pct
                    .parse()
                    .map_err(|_| LedgerError::InvalidSplit(format!("bad percentage '{}'", pct)))?;
                addrs.push(addr.to_string());
                percentages.push(pct);
            }
            let payouts = contracts.select_winners(bounty_id, addrs, &percentages)?;
            confirm(speed).await;
            for (winner, amount) in payouts {
                println!("{} <- {} USDT", winner, amount.format_units(TOKEN_DECIMALS));
            }
        }
        Command::CancelBounty { bounty_id, caller } => {
            let refund = contracts.cancel_bounty(bounty_id, caller.as_str())?;
            confirm(speed).await;
            println!("refunded {} USDT", refund.format_units(TOKEN_DECIMALS));
        }
        Command::ShowBounty { bounty_id } => match contracts.get_bounty(bounty_id) {
            Some(bounty) => {
                println!(
                    "BOUNTY {}: \n\t creator: {} \n\t name: {} \n\t reward: {} USDT \
                     \n\t status: {} \n\t submissions: {}",
                    bounty.id(),
                    bounty.creator(),
                    bounty.name(),
                    bounty.total_reward().format_units(TOKEN_DECIMALS),
                    bounty.status(),
                    bounty.submission_count()
                );
                for s in contracts.submissions(bounty_id) {
                    println!("\t - {} {}", s.submitter(), s.main_uri());
                }
            }
            None => println!("bounty {} not found", bounty_id),
        },
        Command::PostGig {
            poster,
            title,
            short_description,
            details_uri,
            amount,
            native_stake,
            duration,
            proposal_duration,
        } => {
            let id = contracts.post_gig(
                poster.as_str(),
                &title,
                &short_description,
                &details_uri,
                parse_amount(&amount)?,
                parse_amount(&native_stake)?,
                duration,
                proposal_duration,
            )?;
            confirm(speed).await;
            println!("gig id: {}", id);
        }
        Command::Propose {
            gig_id,
            proposer,
            proposal_uri,
        } => {
            contracts.submit_proposal(gig_id, proposer.as_str(), &proposal_uri)?;
            confirm(speed).await;
        }
        Command::WithdrawProposal { gig_id, proposer } => {
            contracts.withdraw_proposal(gig_id, proposer.as_str())?;
            confirm(speed).await;
        }
        Command::SelectProposal {
            gig_id,
            index,
            caller,
        } => {
            contracts.select_proposal(gig_id, index, caller.as_str())?;
            confirm(speed).await;
        }
        Command::CompleteGig { gig_id, caller } => {
            let paid = contracts.complete_gig(gig_id, caller.as_str())?;
            confirm(speed).await;
            if let Some((payee, amount)) = paid {
                println!("{} <- {} USDT", payee, amount.format_units(TOKEN_DECIMALS));
            }
        }
        Command::CancelGig { gig_id, caller } => {
            let refund = contracts.cancel_gig(gig_id, caller.as_str())?;
            confirm(speed).await;
            println!("refunded {} USDT", refund.format_units(TOKEN_DECIMALS));
        }
        Command::ShowGig { gig_id } => match contracts.get_gig(gig_id) {
            Some(gig) => {
                println!(
                    "GIG {}: \n\t poster: {} \n\t title: {} \n\t budget: {} USDT \
                     \n\t status: {} \n\t proposals: {} \n\t selected: {}",
                    gig.id(),
                    gig.poster(),
                    gig.title(),
                    gig.usdt_amount().format_units(TOKEN_DECIMALS),
                    gig.status(),
                    gig.proposal_count(),
                    gig.selected_proposal()
                );
                for (i, p) in contracts.proposals(gig_id).iter().enumerate() {
                    let flag = if p.is_withdrawn() { " (withdrawn)" } else { "" };
                    println!("\t #{} {} {}{}", i + 1, p.proposer(), p.proposal_uri(), flag);
                }
            }
            None => println!("gig {} not found", gig_id),
        },
        Command::List => {
            for b in contracts.bounty_ledger().bounties() {
                println!("bounty {} [{}] {}", b.id(), b.status(), b.name());
            }
            for g in contracts.gig_ledger().gigs() {
                println!("gig {} [{}] {}", g.id(), g.status(), g.title());
            }
        }
        Command::Reset => {
            contracts.clear_all_data()?;
            println!("ledger cleared");
        }
    }
    Ok(())
}

fn parse_amount(s: &str) -> Result<Amount, LedgerError> {
    Ok(Amount::parse_units(s, TOKEN_DECIMALS)?)
}

async fn confirm(speed: TxSpeed) {
    simulate_delay(speed).await;
    println!("tx: {}", generate_tx_hash());
}
