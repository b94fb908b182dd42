use bookpay::application::engine::PaymentEngine;
use bookpay::domain::settings::{PaymentType, ProcessingMode, SettingsUpdate};
use bookpay::domain::transaction::{PaymentForm, PaymentTransaction};
use bookpay::infrastructure::gateway::SimulatedGateway;
use bookpay::infrastructure::in_memory::{InMemorySettingsStore, InMemoryTransactionStore};
use bookpay::interfaces::csv::form_reader::FormReader;
use bookpay::interfaces::csv::transaction_writer::TransactionWriter;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). Requires the
    /// storage-rocksdb feature; without it an in-memory store is used and
    /// nothing survives the process.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Make the simulated gateway decline every charge with this reason.
    #[arg(long, global = true, value_name = "REASON")]
    simulate_decline: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Submit a single payment for a booking
    Submit {
        #[arg(long)]
        amount: Decimal,
        #[arg(long, default_value = "USD")]
        currency: String,
        /// Payment method (credit_card, debit_card, mobile_money,
        /// bank_transfer, cash)
        #[arg(long)]
        method: String,
        #[arg(long)]
        booking: String,
        #[arg(long)]
        user: String,
        /// Metadata entries as key=value, repeatable
        #[arg(long = "meta", value_name = "KEY=VALUE")]
        meta: Vec<String>,
    },
    /// Submit a CSV batch of payment forms
    /// (columns: amount,currency,method,booking,user,note)
    Import { file: PathBuf },
    /// Resolve a queued transaction
    Verify {
        id: String,
        #[arg(long)]
        admin: String,
        #[arg(long, conflicts_with = "reject")]
        approve: bool,
        #[arg(long)]
        reject: bool,
        #[arg(long)]
        notes: Option<String>,
    },
    /// List transactions awaiting processing or review
    Pending,
    /// List transactions for a booking
    Booking { booking_id: String },
    /// Render a receipt for a transaction
    Receipt { id: String },
    /// List the payment method catalog
    Methods,
    /// Inspect or change payment settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    Show,
    Set {
        #[arg(long)]
        mode: Option<ProcessingMode>,
        #[arg(long)]
        auto_approve_below: Option<Decimal>,
        #[arg(long)]
        require_manual_above: Option<Decimal>,
        #[arg(long)]
        max_transaction: Option<Decimal>,
        /// Enable a payment method, repeatable
        #[arg(long)]
        enable: Vec<String>,
        /// Disable a payment method, repeatable
        #[arg(long)]
        disable: Vec<String>,
    },
}

fn build_engine(cli: &Cli) -> Result<PaymentEngine> {
    let gateway: bookpay::domain::ports::PaymentGatewayBox = match &cli.simulate_decline {
        Some(reason) => Box::new(SimulatedGateway::declining(reason)),
        None => Box::new(SimulatedGateway::approving()),
    };

    match &cli.db_path {
        Some(path) => {
            #[cfg(feature = "storage-rocksdb")]
            {
                let store =
                    bookpay::infrastructure::rocksdb::RocksDbStore::open(path).into_diagnostic()?;
                Ok(PaymentEngine::new(
                    Box::new(store.clone()),
                    Box::new(store),
                    gateway,
                ))
            }
            #[cfg(not(feature = "storage-rocksdb"))]
            {
                let _ = path;
                Err(miette!(
                    "--db-path requires building with the storage-rocksdb feature"
                ))
            }
        }
        None => Ok(PaymentEngine::new(
            Box::new(InMemorySettingsStore::new()),
            Box::new(InMemoryTransactionStore::new()),
            gateway,
        )),
    }
}

fn parse_method(s: &str) -> Result<PaymentType> {
    let method = PaymentType::from(s);
    if method == PaymentType::Unknown && s != "unknown" {
        tracing::warn!(method = %s, "unrecognized payment method, recording as unknown");
    }
    Ok(method)
}

fn parse_meta(entries: &[String]) -> Result<HashMap<String, String>> {
    entries
        .iter()
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| miette!("metadata entry '{entry}' is not key=value"))
        })
        .collect()
}

fn print_transactions(transactions: &[PaymentTransaction]) -> Result<()> {
    let stdout = io::stdout();
    let mut writer = TransactionWriter::new(stdout.lock());
    writer.write_transactions(transactions).into_diagnostic()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let engine = build_engine(&cli)?;

    match cli.command {
        Command::Submit {
            amount,
            currency,
            method,
            booking,
            user,
            meta,
        } => {
            let form = PaymentForm {
                amount: amount.try_into().into_diagnostic()?,
                currency,
                method: parse_method(&method)?,
                metadata: parse_meta(&meta)?,
            };
            let tx = engine.submit(form, &booking, &user).await.into_diagnostic()?;
            print_transactions(std::slice::from_ref(&tx))?;
        }
        Command::Import { file } => {
            let source = File::open(&file).into_diagnostic()?;
            let mut results = Vec::new();
            for submission in FormReader::new(source).submissions() {
                match submission {
                    Ok(submission) => {
                        match engine
                            .submit(submission.form, &submission.booking_id, &submission.user_id)
                            .await
                        {
                            Ok(tx) => results.push(tx),
                            Err(e) => eprintln!("Error processing submission: {e}"),
                        }
                    }
                    Err(e) => eprintln!("Error reading submission: {e}"),
                }
            }
            print_transactions(&results)?;
        }
        Command::Verify {
            id,
            admin,
            approve,
            reject,
            notes,
        } => {
            if approve == reject {
                return Err(miette!("pass exactly one of --approve or --reject"));
            }
            let tx = engine
                .verify(&id, &admin, approve, notes)
                .await
                .into_diagnostic()?;
            print_transactions(std::slice::from_ref(&tx))?;
        }
        Command::Pending => {
            let transactions = engine.list_pending().await.into_diagnostic()?;
            print_transactions(&transactions)?;
        }
        Command::Booking { booking_id } => {
            let transactions = engine.list_by_booking(&booking_id).await.into_diagnostic()?;
            print_transactions(&transactions)?;
        }
        Command::Receipt { id } => {
            let receipt = engine.generate_receipt(&id).await.into_diagnostic()?;
            println!("{}", receipt.document);
        }
        Command::Methods => {
            let methods = engine.payment_methods().await.into_diagnostic()?;
            println!("id,name,enabled,auto_approve,manual_verification,max_amount");
            for m in methods {
                println!(
                    "{},{},{},{},{},{}",
                    m.id,
                    m.display_name,
                    m.enabled,
                    m.config.auto_approve,
                    m.config.requires_manual_verification,
                    m.config.max_amount
                );
            }
        }
        Command::Settings { action } => match action {
            SettingsAction::Show => {
                let settings = engine.settings().load().await.into_diagnostic()?;
                println!(
                    "{}",
                    serde_json::to_string_pretty(&settings).into_diagnostic()?
                );
            }
            SettingsAction::Set {
                mode,
                auto_approve_below,
                require_manual_above,
                max_transaction,
                enable,
                disable,
            } => {
                let enabled_methods = if enable.is_empty() && disable.is_empty() {
                    None
                } else {
                    // Shallow merge: supply the complete set.
                    let mut methods = engine
                        .settings()
                        .load()
                        .await
                        .into_diagnostic()?
                        .enabled_methods;
                    for m in &enable {
                        methods.insert(parse_method(m)?);
                    }
                    for m in &disable {
                        methods.remove(&parse_method(m)?);
                    }
                    Some(methods)
                };

                let settings = engine
                    .settings()
                    .update(SettingsUpdate {
                        enabled_methods,
                        processing_mode: mode,
                        auto_approve_below,
                        require_manual_verification_above: require_manual_above,
                        max_transaction_amount: max_transaction,
                        ..Default::default()
                    })
                    .await
                    .into_diagnostic()?;
                println!(
                    "{}",
                    serde_json::to_string_pretty(&settings).into_diagnostic()?
                );
            }
        },
    }

    Ok(())
}
