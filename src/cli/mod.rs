use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;

use crate::application::LedgerService;
use crate::application::BestPeriodReport;
use crate::domain::{
    Cents, PaymentType, PeriodType, Seller, SellerId, SellerPatch, TimeWindow, TransactionId,
    format_cents, now, parse_cents, parse_timestamp,
};

/// Seller Ledger - sellers, their transactions and income analytics
#[derive(Parser)]
#[command(name = "seller-ledger")]
#[command(about = "CRUD backend and analytics for sellers and their transactions")]
#[command(version)]
pub struct Cli {
    /// Database URL or file path
    #[arg(
        short,
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:seller-ledger.db",
        global = true
    )]
    pub database: String,

    /// Log level filter, overridden by RUST_LOG
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON", global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
        bind: SocketAddr,
    },

    /// Seller management commands
    #[command(subcommand)]
    Seller(SellerCommands),

    /// Transaction commands
    #[command(subcommand)]
    Transaction(TransactionCommands),

    /// Income analytics
    #[command(subcommand)]
    Analytics(AnalyticsCommands),

    /// Export data to CSV or JSON
    Export {
        /// What to export: sellers, transactions, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum SellerCommands {
    /// Register a new seller
    Create {
        /// Seller name
        name: String,

        /// Contact information (e-mail, phone...)
        #[arg(short, long)]
        contact: String,
    },

    /// List all sellers
    List,

    /// Show a seller and its transactions
    Show {
        /// Seller ID
        id: SellerId,
    },

    /// Change a seller's name and/or contact information
    Update {
        /// Seller ID
        id: SellerId,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New contact information
        #[arg(short, long)]
        contact: Option<String>,
    },

    /// Delete a seller without transactions
    Delete {
        /// Seller ID
        id: SellerId,
    },
}

#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a payment for a seller
    Create {
        /// Seller ID
        seller_id: SellerId,

        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Payment type: card, cash, transfer
        #[arg(short = 't', long = "type")]
        payment_type: String,

        /// Date of the transaction (ISO 8601, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// List transactions
    List {
        /// Only transactions of this seller
        #[arg(long)]
        seller: Option<SellerId>,
    },

    /// Show a transaction
    Show {
        /// Transaction ID
        id: TransactionId,
    },
}

#[derive(Subcommand)]
pub enum AnalyticsCommands {
    /// Seller with the highest income in a period
    Top {
        /// Start date (ISO 8601, defaults to start of current month)
        #[arg(long)]
        from: Option<String>,

        /// End date (ISO 8601, defaults to now)
        #[arg(long)]
        to: Option<String>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Sellers whose income in a period is below a threshold
    Below {
        /// Income threshold (e.g., "150" or "150.00")
        threshold: String,

        /// Start date (ISO 8601, defaults to start of current month)
        #[arg(long)]
        from: Option<String>,

        /// End date (ISO 8601, defaults to now)
        #[arg(long)]
        to: Option<String>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Most profitable period of a seller
    BestPeriod {
        /// Seller ID
        seller_id: SellerId,

        /// Period: day, week, month, year
        #[arg(long, default_value = "month")]
        period: String,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let database_url = database_url(&self.database);

        match self.command {
            Commands::Init => {
                LedgerService::init(&database_url).await?;
                println!("Database initialized: {}", database_url);
            }

            Commands::Serve { bind } => {
                let service = LedgerService::init(&database_url).await?;
                crate::api::serve(service, bind).await?;
            }

            Commands::Seller(cmd) => {
                let service = LedgerService::connect(&database_url).await?;
                run_seller_command(&service, cmd).await?;
            }

            Commands::Transaction(cmd) => {
                let service = LedgerService::connect(&database_url).await?;
                run_transaction_command(&service, cmd).await?;
            }

            Commands::Analytics(cmd) => {
                let service = LedgerService::connect(&database_url).await?;
                run_analytics_command(&service, cmd).await?;
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = LedgerService::connect(&database_url).await?;
                run_export_command(&service, &export_type, output.as_deref()).await?;
            }
        }

        Ok(())
    }
}

/// Accept either a full `sqlite:` URL or a bare file path.
fn database_url(database: &str) -> String {
    if database.starts_with("sqlite:") {
        database.to_string()
    } else {
        format!("sqlite:{}", database)
    }
}

async fn run_seller_command(service: &LedgerService, cmd: SellerCommands) -> Result<()> {
    match cmd {
        SellerCommands::Create { name, contact } => {
            let seller = service.create_seller(name, contact).await?;
            println!("Created seller #{}: {}", seller.id, seller.name);
        }

        SellerCommands::List => {
            let sellers = service.list_sellers().await?;
            if sellers.is_empty() {
                println!("No sellers found.");
            } else {
                println!(
                    "{:>6} {:<24} {:<28} {:<20}",
                    "ID", "NAME", "CONTACT", "REGISTERED"
                );
                println!("{}", "-".repeat(81));
                for seller in sellers {
                    println!(
                        "{:>6} {:<24} {:<28} {:<20}",
                        seller.id,
                        truncate(&seller.name, 24),
                        truncate(&seller.contact_info, 28),
                        seller.registration_date.format("%Y-%m-%d %H:%M:%S")
                    );
                }
            }
        }

        SellerCommands::Show { id } => {
            let seller = service.get_seller(id).await?;
            let transactions = service.list_transactions_for_seller(id).await?;
            let total: i64 = transactions
                .iter()
                .map(|info| info.transaction.amount_cents)
                .sum();

            println!("Seller #{}", seller.id);
            println!("  Name:           {}", seller.name);
            println!("  Contact:        {}", seller.contact_info);
            println!(
                "  Registered:     {}",
                seller.registration_date.format("%Y-%m-%d %H:%M:%S")
            );
            println!();
            println!("  Transactions:   {}", transactions.len());
            println!("  Total income:   {}", format_cents(total));
        }

        SellerCommands::Update { id, name, contact } => {
            let patch = SellerPatch {
                name,
                contact_info: contact,
            };
            if patch.is_empty() {
                anyhow::bail!("Nothing to update. Pass --name and/or --contact");
            }
            let seller = service.patch_seller(id, patch).await?;
            println!("Updated seller #{}: {}", seller.id, seller.name);
        }

        SellerCommands::Delete { id } => {
            service.delete_seller(id).await?;
            println!("Deleted seller #{}", id);
        }
    }
    Ok(())
}

async fn run_transaction_command(service: &LedgerService, cmd: TransactionCommands) -> Result<()> {
    match cmd {
        TransactionCommands::Create {
            seller_id,
            amount,
            payment_type,
            date,
        } => {
            let amount_cents = parse_cents(&amount)
                .with_context(|| format!("Invalid amount '{}'. Use '50.00' or '50'", amount))?;
            let payment_type: PaymentType =
                payment_type.parse().map_err(anyhow::Error::msg)?;

            let info = match date {
                Some(date_str) => {
                    let at = parse_date(&date_str)?;
                    service
                        .record_transaction_at(seller_id, amount_cents, payment_type, at)
                        .await?
                }
                None => {
                    service
                        .create_transaction(seller_id, amount_cents, payment_type)
                        .await?
                }
            };

            println!(
                "Recorded transaction #{}: {} {} for {}",
                info.transaction.id,
                format_cents(info.transaction.amount_cents),
                info.transaction.payment_type,
                info.seller.name
            );
        }

        TransactionCommands::List { seller } => {
            let transactions = match seller {
                Some(seller_id) => service.list_transactions_for_seller(seller_id).await?,
                None => service.list_transactions().await?,
            };

            if transactions.is_empty() {
                println!("No transactions found.");
            } else {
                println!(
                    "{:>6} {:<20} {:<24} {:>12} {:<10}",
                    "ID", "DATE", "SELLER", "AMOUNT", "TYPE"
                );
                println!("{}", "-".repeat(76));
                for info in transactions {
                    println!(
                        "{:>6} {:<20} {:<24} {:>12} {:<10}",
                        info.transaction.id,
                        info.transaction
                            .transaction_date
                            .format("%Y-%m-%d %H:%M:%S"),
                        truncate(&info.seller.name, 24),
                        format_cents(info.transaction.amount_cents),
                        info.transaction.payment_type
                    );
                }
            }
        }

        TransactionCommands::Show { id } => {
            let info = service.get_transaction(id).await?;
            let transaction = &info.transaction;

            println!("Transaction #{}", transaction.id);
            println!(
                "  Date:    {}",
                transaction.transaction_date.format("%Y-%m-%d %H:%M:%S%.6f UTC")
            );
            println!("  Seller:  #{} {}", info.seller.id, info.seller.name);
            println!("  Amount:  {}", format_cents(transaction.amount_cents));
            println!("  Type:    {}", transaction.payment_type);
        }
    }
    Ok(())
}

async fn run_analytics_command(service: &LedgerService, cmd: AnalyticsCommands) -> Result<()> {
    match cmd {
        AnalyticsCommands::Top { from, to, format } => {
            let window = parse_date_range(from, to)?;
            let report = service.find_top_seller_by_period(window).await?;

            match format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                "csv" => {
                    write_income_csv(std::io::stdout(), [(&report.seller, report.total)])?;
                }
                _ => {
                    println!("Top Seller");
                    print_period(window);
                    println!();
                    println!("  Seller:  #{} {}", report.seller.id, report.seller.name);
                    println!("  Income:  {}", format_cents(report.total));
                }
            }
        }

        AnalyticsCommands::Below {
            threshold,
            from,
            to,
            format,
        } => {
            let threshold_cents = parse_cents(&threshold).with_context(|| {
                format!("Invalid threshold '{}'. Use '150.00' or '150'", threshold)
            })?;
            let window = parse_date_range(from, to)?;
            let report = service
                .find_sellers_with_income_below_threshold(threshold_cents, window)
                .await?;

            match format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                "csv" => {
                    write_income_csv(
                        std::io::stdout(),
                        report.sellers.iter().map(|entry| (&entry.seller, entry.total)),
                    )?;
                }
                _ => {
                    println!(
                        "Sellers with income below {}",
                        format_cents(report.threshold)
                    );
                    print_period(window);
                    println!();
                    if report.sellers.is_empty() {
                        println!("No sellers found.");
                    } else {
                        println!("{:>6} {:<24} {:>12}", "ID", "SELLER", "INCOME");
                        println!("{}", "-".repeat(44));
                        for entry in &report.sellers {
                            println!(
                                "{:>6} {:<24} {:>12}",
                                entry.seller.id,
                                truncate(&entry.seller.name, 24),
                                format_cents(entry.total)
                            );
                        }
                    }
                }
            }
        }

        AnalyticsCommands::BestPeriod {
            seller_id,
            period,
            format,
        } => {
            let period: PeriodType = period.parse().map_err(anyhow::Error::msg)?;
            let report = service
                .find_best_period_for_seller(seller_id, period)
                .await?;

            match format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                "csv" => {
                    write_best_period_csv(std::io::stdout(), &report)?;
                }
                _ => {
                    println!(
                        "Best {} for #{} {}",
                        report.period, report.seller.id, report.seller.name
                    );
                    println!();
                    println!(
                        "  Period:        {} to {}",
                        report.period_start.format("%Y-%m-%d"),
                        report.period_end.format("%Y-%m-%d")
                    );
                    println!("  Income:        {}", format_cents(report.total));
                    println!("  Transactions:  {}", report.transaction_count);
                }
            }
        }
    }
    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "sellers" => {
            let count = exporter.export_sellers_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} sellers", count);
            }
        }
        "transactions" => {
            let count = exporter.export_transactions_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported full database: {} sellers, {} transactions",
                    snapshot.sellers.len(),
                    snapshot.transactions.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: sellers, transactions, full",
                export_type
            );
        }
    }

    Ok(())
}

fn parse_date_range(from: Option<String>, to: Option<String>) -> Result<TimeWindow> {
    let now = now();

    // Default to_date is now
    let to_date = match to {
        Some(date_str) => parse_date(&date_str)?,
        None => now,
    };

    // Default from_date is start of current month
    let from_date = match from {
        Some(date_str) => parse_date(&date_str)?,
        None => PeriodType::Month.bounds(now).0,
    };

    Ok(TimeWindow::new(from_date, to_date)?)
}

fn print_period(window: TimeWindow) {
    println!(
        "Period: {} to {}",
        window.start.format("%Y-%m-%d %H:%M:%S"),
        window.end.format("%Y-%m-%d %H:%M:%S")
    );
}

fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    parse_timestamp(date_str).with_context(|| {
        format!(
            "Invalid date '{}'. Use YYYY-MM-DD or an ISO 8601 date-time",
            date_str
        )
    })
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

fn write_income_csv<'a, W: std::io::Write>(
    writer: W,
    rows: impl IntoIterator<Item = (&'a Seller, Cents)>,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["seller_id", "name", "total"])?;
    for (seller, total) in rows {
        csv_writer.write_record([
            seller.id.to_string(),
            seller.name.clone(),
            format_cents(total),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn write_best_period_csv<W: std::io::Write>(writer: W, report: &BestPeriodReport) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "seller_id",
        "name",
        "period",
        "period_start",
        "period_end",
        "total",
        "count",
    ])?;
    csv_writer.write_record([
        report.seller.id.to_string(),
        report.seller.name.clone(),
        report.period.to_string(),
        report.period_start.format("%Y-%m-%d").to_string(),
        report.period_end.format("%Y-%m-%d").to_string(),
        format_cents(report.total),
        report.transaction_count.to_string(),
    ])?;
    csv_writer.flush()?;
    Ok(())
}
