use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tipsplit_client::{Calculation, CalculationRequest, CalculationResponse, TipSplitClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tipsplit")]
#[command(about = "Split a bill and tip across a party", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "TIPSPLIT_API_URL", default_value = tipsplit_client::client::DEFAULT_API_URL)]
    api_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a split; saved to history unless --dry-run
    Calc {
        #[arg(long)]
        bill: Decimal,

        #[arg(long)]
        tip: Decimal,

        #[arg(long, default_value = "1")]
        people: Decimal,

        #[arg(long)]
        dry_run: bool,
    },
    History {
        #[arg(long, default_value_t = 50)]
        limit: i64,

        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
    Show {
        id: i64,
    },
    Delete {
        id: i64,
    },
    /// Delete every saved calculation
    Clear,
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tipsplit={},tipsplit_client={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = TipSplitClient::new(cli.api_url)?;

    match cli.command {
        Commands::Calc {
            bill,
            tip,
            people,
            dry_run,
        } => {
            let request = CalculationRequest::new(bill, tip, people);
            handle_calc(&client, &request, dry_run).await?;
        }
        Commands::History { limit, offset } => {
            let history = client.history(limit, offset).await?;
            for calculation in &history.calculations {
                print_calculation(calculation);
            }
            let pagination = history.pagination;
            println!(
                "Showing {} of {} (offset {}){}",
                history.calculations.len(),
                pagination.total,
                pagination.offset,
                if pagination.has_more { ", more available" } else { "" }
            );
        }
        Commands::Show { id } => {
            let calculation = client.get_calculation(id).await?;
            print_calculation(&calculation);
        }
        Commands::Delete { id } => {
            client.delete_calculation(id).await?;
            println!("Deleted calculation #{}", id);
        }
        Commands::Clear => {
            client.delete_all().await?;
            println!("History cleared");
        }
        Commands::Health => {
            if client.check_health().await {
                println!("Backend at {} is up", client.base_url());
            } else {
                return Err(format!("Backend at {} is not reachable", client.base_url()).into());
            }
        }
    }

    Ok(())
}

async fn handle_calc(
    client: &TipSplitClient,
    request: &CalculationRequest,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if dry_run {
        let response = client.validate(request).await?;
        print_result(&response);
        return Ok(());
    }

    let outcome = client.calculate_with_fallback(request).await?;
    print_result(&outcome.response);

    match (outcome.response.calculation_id, outcome.backend_connected) {
        (Some(id), _) => println!("Saved as #{}", id),
        (None, false) => println!("Backend unavailable: computed locally, not saved"),
        (None, true) => {}
    }

    Ok(())
}

fn print_result(response: &CalculationResponse) {
    println!("Tip:        {:.2}", response.tip_amount);
    println!("Total:      {:.2}", response.total_with_tip);
    println!("Per person: {:.2}", response.amount_per_person);
}

fn print_calculation(calculation: &Calculation) {
    println!(
        "#{:<5} {}  bill {:.2} + {}% tip = {:.2} / {} = {:.2} each",
        calculation.id,
        calculation.created_at.format("%Y-%m-%d %H:%M:%S"),
        calculation.bill_amount,
        calculation.tip_percent,
        calculation.total_with_tip,
        calculation.number_of_people,
        calculation.amount_per_person
    );
}
