use clap::{Parser, Subcommand, ValueEnum};
use gopay::application::lifecycle::{PaymentLifecycle, build_command_request};
use gopay::application::signature::SignatureService;
use gopay::config::{Config, ConfigHandle};
use gopay::domain::message::{
    Buyer, PaymentCommand, PaymentIdentity, PaymentResult, PaymentSession, PaymentStatus,
    Signable, from_fields,
};
use gopay::infrastructure::in_memory::InMemoryGateway;
use gopay::interfaces::csv::payment_reader::PaymentReader;
use gopay::interfaces::csv::payment_writer::PaymentWriter;
use miette::{IntoDiagnostic, Result, miette};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file. `GOPAY_*` environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign a single message given as a JSON object of its fields
    Sign {
        #[arg(long, value_enum)]
        kind: MessageKind,
        #[arg(long)]
        fields: String,
    },
    /// Verify the signature of a single message
    Verify {
        #[arg(long, value_enum)]
        kind: MessageKind,
        #[arg(long)]
        fields: String,
        #[arg(long)]
        signature: String,
    },
    /// Sign every payment of a CSV file (product_name,price,variable_symbol)
    SignBatch { input: PathBuf },
    /// Create and confirm every payment of a CSV file against a simulated gateway
    Simulate { input: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum MessageKind {
    PaymentCommand,
    PaymentResult,
    PaymentStatus,
    PaymentSession,
    PaymentIdentity,
    Buyer,
}

fn build_message(kind: MessageKind, fields: &str) -> gopay::error::Result<Box<dyn Signable>> {
    Ok(match kind {
        MessageKind::PaymentCommand => Box::new(from_fields::<PaymentCommand>(fields)?),
        MessageKind::PaymentResult => Box::new(from_fields::<PaymentResult>(fields)?),
        MessageKind::PaymentStatus => Box::new(from_fields::<PaymentStatus>(fields)?),
        MessageKind::PaymentSession => Box::new(from_fields::<PaymentSession>(fields)?),
        MessageKind::PaymentIdentity => Box::new(from_fields::<PaymentIdentity>(fields)?),
        MessageKind::Buyer => Box::new(from_fields::<Buyer>(fields)?),
    })
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).into_diagnostic()?;
    let signer = SignatureService::default();

    match cli.command {
        Command::Sign { kind, fields } => {
            let message = build_message(kind, &fields).into_diagnostic()?;
            let signature = signer.sign(&*message, &config.secret).into_diagnostic()?;
            println!("{}", signature);
        }
        Command::Verify {
            kind,
            fields,
            signature,
        } => {
            let message = build_message(kind, &fields).into_diagnostic()?;
            if !signer.verify(&*message, &config.secret, &signature) {
                return Err(miette!("signature rejected"));
            }
            println!("authentic");
        }
        Command::SignBatch { input } => {
            let file = File::open(input).into_diagnostic()?;
            let reader = PaymentReader::new(file);
            let stdout = io::stdout();
            let mut writer = PaymentWriter::new(stdout.lock());

            for payment in reader.payments() {
                match payment {
                    Ok(payment) => {
                        let request =
                            build_command_request(&signer, &config, &payment).into_diagnostic()?;
                        writer.write_signed(&request).into_diagnostic()?;
                    }
                    Err(e) => {
                        eprintln!("Error reading payment: {}", e);
                    }
                }
            }
            writer.flush().into_diagnostic()?;
        }
        Command::Simulate { input } => {
            let gateway = InMemoryGateway::new(config.clone());
            let lifecycle = PaymentLifecycle::new(
                Arc::new(ConfigHandle::new(config)),
                signer,
                Box::new(gateway),
            );

            let file = File::open(input).into_diagnostic()?;
            let reader = PaymentReader::new(file);
            let stdout = io::stdout();
            let mut writer = PaymentWriter::new(stdout.lock());

            for payment in reader.payments() {
                match payment {
                    Ok(payment) => match lifecycle.create(&payment).await {
                        Ok(outcome) => {
                            writer
                                .write_outcome(&payment.variable_symbol, outcome.state())
                                .into_diagnostic()?;
                        }
                        Err(e) => {
                            eprintln!("Error creating payment: {}", e);
                        }
                    },
                    Err(e) => {
                        eprintln!("Error reading payment: {}", e);
                    }
                }
            }
            writer.flush().into_diagnostic()?;
        }
    }

    Ok(())
}
